//! Aggregate counts over an alert collection.

use serde::Serialize;

use crate::alert::{AlertSeverity, MarginAlert};

/// Summary shown by the dashboard's alert badge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertStats {
    pub total: usize,
    pub unread: usize,
    pub critical: usize,
    pub low: usize,
    pub warning: usize,
    pub has_alerts: bool,
    pub has_critical_alerts: bool,
}

impl AlertStats {
    /// Count alerts by severity and read state.
    pub fn from_alerts(alerts: &[MarginAlert]) -> Self {
        let mut stats = alerts.iter().fold(Self::default(), |mut acc, alert| {
            acc.total += 1;
            if !alert.read {
                acc.unread += 1;
            }
            match alert.severity {
                AlertSeverity::Critical => acc.critical += 1,
                AlertSeverity::Low => acc.low += 1,
                AlertSeverity::Warning => acc.warning += 1,
            }
            acc
        });
        stats.has_alerts = stats.total > 0;
        stats.has_critical_alerts = stats.critical > 0;
        stats
    }
}
