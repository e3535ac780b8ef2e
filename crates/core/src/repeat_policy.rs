//! Re-alert suppression rules.
//!
//! By default a product that stays below a threshold is alerted again on
//! every classification pass. The stricter policies skip a product that was
//! already alerted, either while that alert is unread or within a cooldown
//! window.

use std::str::FromStr;

use crate::alert::MarginAlert;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Whether a product that already has alerts may be alerted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatPolicy {
    /// Every pass may add a new alert for the same product.
    #[default]
    Always,
    /// Skip products that already have an unread alert.
    SuppressWhileUnread,
    /// Skip products alerted less than this long ago.
    Cooldown(chrono::Duration),
}

impl RepeatPolicy {
    /// Check whether `product_id` may be alerted at `now` given `existing` alerts.
    pub fn allows(&self, product_id: &str, existing: &[MarginAlert], now: Timestamp) -> bool {
        let mut previous = existing.iter().filter(|a| a.product_id == product_id);
        match self {
            Self::Always => true,
            Self::SuppressWhileUnread => !previous.any(|a| !a.read),
            Self::Cooldown(window) => {
                !previous.any(|a| now.signed_duration_since(a.created_at) < *window)
            }
        }
    }
}

impl FromStr for RepeatPolicy {
    type Err = CoreError;

    /// Parse `always`, `suppress_unread` or `cooldown:<seconds>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "always" => Ok(Self::Always),
            "suppress_unread" => Ok(Self::SuppressWhileUnread),
            other => {
                let secs = other
                    .strip_prefix("cooldown:")
                    .and_then(|v| v.trim().parse::<u32>().ok())
                    .ok_or_else(|| {
                        CoreError::Validation(format!(
                            "unknown repeat policy '{other}', expected always, suppress_unread or cooldown:<seconds>"
                        ))
                    })?;
                Ok(Self::Cooldown(chrono::Duration::seconds(i64::from(secs))))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertSeverity;
    use crate::product::ProductMargin;
    use crate::thresholds::MarginThresholds;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn alert_for(product_id: &str, created_at: Timestamp, read: bool) -> MarginAlert {
        let product = ProductMargin::from_prices(product_id, "P", 100.0, 95.0, "c");
        let mut alert = MarginAlert::new(
            Uuid::new_v4(),
            &product,
            AlertSeverity::Critical,
            &MarginThresholds::default(),
            created_at,
        );
        alert.read = read;
        alert
    }

    #[test]
    fn always_allows_repeats() {
        let now = Utc::now();
        let existing = vec![alert_for("p1", now, false)];
        assert!(RepeatPolicy::Always.allows("p1", &existing, now));
    }

    #[test]
    fn suppress_while_unread() {
        let now = Utc::now();
        let policy = RepeatPolicy::SuppressWhileUnread;

        let unread = vec![alert_for("p1", now, false)];
        assert!(!policy.allows("p1", &unread, now));
        assert!(policy.allows("p2", &unread, now));

        let read = vec![alert_for("p1", now, true)];
        assert!(policy.allows("p1", &read, now));
    }

    #[test]
    fn cooldown_window() {
        let now = Utc::now();
        let policy = RepeatPolicy::Cooldown(Duration::minutes(10));

        let recent = vec![alert_for("p1", now - Duration::minutes(5), true)];
        assert!(!policy.allows("p1", &recent, now));

        let old = vec![alert_for("p1", now - Duration::minutes(15), false)];
        assert!(policy.allows("p1", &old, now));
    }

    #[test]
    fn parses_known_policies() {
        assert_eq!("always".parse::<RepeatPolicy>().unwrap(), RepeatPolicy::Always);
        assert_eq!(
            " suppress_unread ".parse::<RepeatPolicy>().unwrap(),
            RepeatPolicy::SuppressWhileUnread
        );
        assert_eq!(
            "cooldown:3600".parse::<RepeatPolicy>().unwrap(),
            RepeatPolicy::Cooldown(Duration::hours(1))
        );
    }

    #[test]
    fn rejects_unknown_policy() {
        assert_matches!("never".parse::<RepeatPolicy>(), Err(CoreError::Validation(_)));
        assert_matches!("cooldown:-5".parse::<RepeatPolicy>(), Err(CoreError::Validation(_)));
    }
}
