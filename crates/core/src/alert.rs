//! Margin alert types and message templates.

use serde::{Deserialize, Serialize};

use crate::product::ProductMargin;
use crate::thresholds::MarginThresholds;
use crate::types::{AlertId, Timestamp};

/// Severity band of a margin alert.
///
/// Variants are declared in ascending order so that the derived `Ord` gives
/// `Critical > Low > Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Margin below the warning bound but at or above the low bound.
    Warning,
    /// Margin below the low bound but at or above the critical bound.
    Low,
    /// Margin below the critical bound.
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Low => "low",
            Self::Critical => "critical",
        }
    }

    /// Short notification title for this severity.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Critical => "Margen crítico",
            Self::Low => "Margen bajo",
            Self::Warning => "Margen en advertencia",
        }
    }
}

/// Build the human-readable message for an alert.
///
/// The margin is always rendered with one decimal place.
pub fn alert_message(
    severity: AlertSeverity,
    product_name: &str,
    margin_percent: f64,
    thresholds: &MarginThresholds,
) -> String {
    let bound = thresholds.bound(severity);
    match severity {
        AlertSeverity::Critical => format!(
            "\"{product_name}\" tiene un margen de {margin_percent:.1}%, por debajo del {bound}% mínimo."
        ),
        AlertSeverity::Low => format!(
            "\"{product_name}\" tiene un margen de {margin_percent:.1}%, por debajo del {bound}% recomendado."
        ),
        AlertSeverity::Warning => format!(
            "\"{product_name}\" tiene un margen de {margin_percent:.1}%, cerca del {bound}% objetivo."
        ),
    }
}

/// A margin alert raised for a single product.
///
/// Everything except `read` is a snapshot taken when the alert was generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginAlert {
    pub id: AlertId,
    pub product_id: String,
    pub product_name: String,
    pub severity: AlertSeverity,
    /// The margin that triggered the alert (not updated afterwards).
    pub margin_percent: f64,
    pub message: String,
    pub created_at: Timestamp,
    pub read: bool,
}

impl MarginAlert {
    /// Create an unread alert for `product`.
    pub fn new(
        id: AlertId,
        product: &ProductMargin,
        severity: AlertSeverity,
        thresholds: &MarginThresholds,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            severity,
            margin_percent: product.margin_percent,
            message: alert_message(severity, &product.name, product.margin_percent, thresholds),
            created_at,
            read: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn severity_ordering() {
        assert!(AlertSeverity::Critical > AlertSeverity::Low);
        assert!(AlertSeverity::Low > AlertSeverity::Warning);
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&AlertSeverity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        assert_eq!(AlertSeverity::Low.as_str(), "low");
    }

    #[test]
    fn message_uses_one_decimal_place() {
        let t = MarginThresholds::default();
        let msg = alert_message(AlertSeverity::Critical, "Zapatilla X", 10.0, &t);
        assert!(msg.contains("Zapatilla X"));
        assert!(msg.contains("10.0%"));

        let msg = alert_message(AlertSeverity::Warning, "Bota", 27.456, &t);
        assert!(msg.contains("27.5%"));
        assert!(msg.contains("35%"));
    }

    #[test]
    fn messages_differ_per_severity() {
        let t = MarginThresholds::default();
        let critical = alert_message(AlertSeverity::Critical, "A", 20.0, &t);
        let low = alert_message(AlertSeverity::Low, "A", 20.0, &t);
        let warning = alert_message(AlertSeverity::Warning, "A", 20.0, &t);
        assert_ne!(critical, low);
        assert_ne!(low, warning);
    }

    #[test]
    fn new_alert_snapshots_product_and_starts_unread() {
        let product = ProductMargin::from_prices("p9", "Sandalia", 100.0, 80.0, "calzado");
        let now = Utc::now();
        let alert = MarginAlert::new(
            Uuid::new_v4(),
            &product,
            AlertSeverity::Low,
            &MarginThresholds::default(),
            now,
        );
        assert_eq!(alert.product_id, "p9");
        assert_eq!(alert.product_name, "Sandalia");
        assert_eq!(alert.margin_percent, 20.0);
        assert_eq!(alert.created_at, now);
        assert!(!alert.read);
    }
}
