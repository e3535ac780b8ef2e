//! Margin alert domain logic.
//!
//! Everything in this crate is pure (no I/O, no clocks except where a
//! timestamp is passed in) so it can be tested in isolation. The stateful
//! engine and the background purge task live in `margin-engine`.

pub mod alert;
pub mod classify;
pub mod error;
pub mod product;
pub mod repeat_policy;
pub mod stats;
pub mod threshold_validation;
pub mod thresholds;
pub mod types;

pub use alert::{AlertSeverity, MarginAlert};
pub use classify::{classify_products, validate_snapshot, Classification, RejectedProduct};
pub use error::CoreError;
pub use product::ProductMargin;
pub use repeat_policy::RepeatPolicy;
pub use stats::AlertStats;
pub use thresholds::MarginThresholds;
