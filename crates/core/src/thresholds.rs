//! Margin severity thresholds.
//!
//! Each bound is an upper-exclusive percentage: a margin strictly below
//! `critical` is critical, below `low` is low, below `warning` is a warning,
//! and anything at or above `warning` is healthy.

use serde::Serialize;

use crate::alert::AlertSeverity;
use crate::error::CoreError;
use crate::threshold_validation::validate_strictly_increasing;

// ---------------------------------------------------------------------------
// Default bounds
// ---------------------------------------------------------------------------

/// Margins below this percentage are critical.
pub const CRITICO: f64 = 15.0;
/// Margins below this percentage (and at or above [`CRITICO`]) are low.
pub const BAJO: f64 = 25.0;
/// Margins below this percentage (and at or above [`BAJO`]) are a warning.
pub const ADVERTENCIA: f64 = 35.0;

// ---------------------------------------------------------------------------
// MarginThresholds
// ---------------------------------------------------------------------------

/// Overridable threshold configuration.
///
/// Always satisfies `critical < low < warning` with finite bounds when built
/// through [`MarginThresholds::new`] or [`Default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarginThresholds {
    critical: f64,
    low: f64,
    warning: f64,
}

impl MarginThresholds {
    /// Build a validated threshold set.
    pub fn new(critical: f64, low: f64, warning: f64) -> Result<Self, CoreError> {
        validate_strictly_increasing(&[
            ("critical", critical),
            ("low", low),
            ("warning", warning),
        ])?;
        Ok(Self {
            critical,
            low,
            warning,
        })
    }

    pub fn critical(&self) -> f64 {
        self.critical
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn warning(&self) -> f64 {
        self.warning
    }

    /// The upper-exclusive bound of the band for `severity`.
    pub fn bound(&self, severity: AlertSeverity) -> f64 {
        match severity {
            AlertSeverity::Critical => self.critical,
            AlertSeverity::Low => self.low,
            AlertSeverity::Warning => self.warning,
        }
    }

    /// Classify a margin into a severity band.
    ///
    /// Bands are checked critical first, then low, then warning; the first
    /// match wins. Returns `None` for healthy margins and for NaN.
    pub fn classify(&self, margin_percent: f64) -> Option<AlertSeverity> {
        if margin_percent < self.critical {
            Some(AlertSeverity::Critical)
        } else if margin_percent < self.low {
            Some(AlertSeverity::Low)
        } else if margin_percent < self.warning {
            Some(AlertSeverity::Warning)
        } else {
            None
        }
    }
}

impl Default for MarginThresholds {
    fn default() -> Self {
        Self {
            critical: CRITICO,
            low: BAJO,
            warning: ADVERTENCIA,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn defaults_match_named_constants() {
        let t = MarginThresholds::default();
        assert_eq!(t.critical(), 15.0);
        assert_eq!(t.low(), 25.0);
        assert_eq!(t.warning(), 35.0);
    }

    #[test]
    fn bands_are_upper_exclusive() {
        let t = MarginThresholds::default();
        assert_eq!(t.classify(14.99), Some(AlertSeverity::Critical));
        assert_eq!(t.classify(15.0), Some(AlertSeverity::Low));
        assert_eq!(t.classify(24.99), Some(AlertSeverity::Low));
        assert_eq!(t.classify(25.0), Some(AlertSeverity::Warning));
        assert_eq!(t.classify(34.99), Some(AlertSeverity::Warning));
        assert_eq!(t.classify(35.0), None);
        assert_eq!(t.classify(80.0), None);
    }

    #[test]
    fn negative_margin_is_critical() {
        let t = MarginThresholds::default();
        assert_eq!(t.classify(-40.0), Some(AlertSeverity::Critical));
    }

    #[test]
    fn nan_margin_is_not_classified() {
        assert_eq!(MarginThresholds::default().classify(f64::NAN), None);
    }

    #[test]
    fn custom_thresholds_shift_bands() {
        let t = MarginThresholds::new(5.0, 10.0, 20.0).expect("valid thresholds");
        assert_eq!(t.classify(7.0), Some(AlertSeverity::Low));
        assert_eq!(t.classify(15.0), Some(AlertSeverity::Warning));
        assert_eq!(t.classify(25.0), None);
        assert_eq!(t.bound(AlertSeverity::Low), 10.0);
    }

    #[test]
    fn rejects_out_of_order_thresholds() {
        assert_matches!(
            MarginThresholds::new(25.0, 15.0, 35.0),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            MarginThresholds::new(15.0, 35.0, 35.0),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_non_finite_thresholds() {
        assert!(MarginThresholds::new(f64::NAN, 25.0, 35.0).is_err());
        assert!(MarginThresholds::new(15.0, 25.0, f64::INFINITY).is_err());
    }
}
