#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid configuration for {var}: {message}")]
    Config { var: &'static str, message: String },
}
