//! Shared threshold validation helpers.
//!
//! Provides reusable numeric checks used by the threshold configuration and
//! product snapshot validation.

use crate::error::CoreError;

/// Validate that a value is a finite number (not NaN or infinite).
///
/// Returns a `CoreError::Validation` naming the field otherwise.
pub fn validate_finite(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate that every bound is finite and each one is strictly greater than
/// the one before it.
pub fn validate_strictly_increasing(bounds: &[(&str, f64)]) -> Result<(), CoreError> {
    for (name, value) in bounds {
        validate_finite(*value, name)?;
    }
    for pair in bounds.windows(2) {
        let (lower_name, lower) = pair[0];
        let (upper_name, upper) = pair[1];
        if lower >= upper {
            return Err(CoreError::Validation(format!(
                "{lower_name} ({lower}) must be less than {upper_name} ({upper})"
            )));
        }
    }
    Ok(())
}
