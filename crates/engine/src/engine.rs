//! The stateful margin alert engine.
//!
//! [`AlertEngine`] owns the alert collection (newest first), classifies
//! product snapshots into new alerts, dispatches toasts through the injected
//! [`NotificationSink`], and exposes the read/remove/purge lifecycle plus the
//! queries the dashboard needs.
//!
//! All operations are synchronous and take `&mut self`, so a single owner is
//! the only writer. When the engine is shared with the purge task it is
//! wrapped in a [`SharedEngine`].

use std::sync::Arc;

use chrono::Utc;
use margin_core::types::{AlertId, Timestamp};
use margin_core::{
    classify_products, validate_snapshot, AlertSeverity, AlertStats, CoreError, MarginAlert,
    MarginThresholds, ProductMargin, RejectedProduct, RepeatPolicy,
};
use margin_events::{NotificationSink, Toast};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::EngineConfig;

/// Alerts older than this many days are removed by the purge.
pub const DEFAULT_MAX_AGE_DAYS: u32 = 7;

/// An engine shared between the UI-facing owner and background tasks.
pub type SharedEngine = Arc<Mutex<AlertEngine>>;

/// The delta produced by one classification pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassificationResult {
    /// Alerts added by this pass, in input order.
    pub alerts: Vec<MarginAlert>,
    /// Products that received an alert in this pass.
    pub flagged_products: Vec<ProductMargin>,
    /// Products skipped because their data failed validation.
    pub rejected: Vec<RejectedProduct>,
    /// Alerts dropped by the repeat policy.
    pub suppressed: usize,
}

// ---------------------------------------------------------------------------
// AlertEngine
// ---------------------------------------------------------------------------

pub struct AlertEngine {
    thresholds: MarginThresholds,
    repeat_policy: RepeatPolicy,
    /// Newest first.
    alerts: Vec<MarginAlert>,
    sink: Arc<dyn NotificationSink>,
}

impl AlertEngine {
    /// Create an engine with the given thresholds and the default
    /// [`RepeatPolicy::Always`].
    pub fn new(thresholds: MarginThresholds, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            thresholds,
            repeat_policy: RepeatPolicy::default(),
            alerts: Vec::new(),
            sink,
        }
    }

    /// Create an engine from loaded configuration.
    pub fn from_config(config: &EngineConfig, sink: Arc<dyn NotificationSink>) -> Self {
        Self::new(config.thresholds, sink).with_repeat_policy(config.repeat_policy)
    }

    pub fn with_repeat_policy(mut self, repeat_policy: RepeatPolicy) -> Self {
        self.repeat_policy = repeat_policy;
        self
    }

    /// Wrap the engine for sharing with background tasks.
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    pub fn thresholds(&self) -> &MarginThresholds {
        &self.thresholds
    }

    pub fn repeat_policy(&self) -> RepeatPolicy {
        self.repeat_policy
    }

    // -- Classification -----------------------------------------------------

    /// Classify a snapshot at the current time.
    pub fn classify(&mut self, products: &[ProductMargin]) -> ClassificationResult {
        self.classify_at(products, Utc::now())
    }

    /// Classify a snapshot, stamping new alerts with `now`.
    ///
    /// Invalid products are skipped and reported once through a single
    /// aggregate toast. Every new alert is announced with its own toast and
    /// the batch is prepended to the collection.
    pub fn classify_at(&mut self, products: &[ProductMargin], now: Timestamp) -> ClassificationResult {
        let classification = classify_products(products, &self.thresholds, now, Uuid::now_v7);

        let mut result = ClassificationResult {
            rejected: classification.rejected,
            ..Default::default()
        };

        for (alert, product) in classification
            .alerts
            .into_iter()
            .zip(classification.flagged_products)
        {
            let allowed = self.repeat_policy.allows(&alert.product_id, &self.alerts, now)
                && self.repeat_policy.allows(&alert.product_id, &result.alerts, now);
            if allowed {
                result.alerts.push(alert);
                result.flagged_products.push(product);
            } else {
                result.suppressed += 1;
            }
        }

        if !result.rejected.is_empty() {
            let ids: Vec<&str> = result
                .rejected
                .iter()
                .map(|r| r.product_id.as_str())
                .collect();
            tracing::warn!(
                count = result.rejected.len(),
                product_ids = ?ids,
                "Skipped products with invalid margin data"
            );
            self.sink.notify(Toast::invalid_data(result.rejected.len()));
        }

        for alert in &result.alerts {
            self.sink.notify(Toast::for_alert(alert));
        }

        if !result.alerts.is_empty() || result.suppressed > 0 {
            tracing::info!(
                new_alerts = result.alerts.len(),
                suppressed = result.suppressed,
                total = self.alerts.len() + result.alerts.len(),
                "Margin classification complete"
            );
        }

        let previous = std::mem::replace(&mut self.alerts, result.alerts.clone());
        self.alerts.extend(previous);
        result
    }

    /// Classify a snapshot only if every product in it is valid.
    ///
    /// On a validation error nothing is dispatched and the alert collection
    /// is left unchanged.
    pub fn classify_strict(
        &mut self,
        products: &[ProductMargin],
    ) -> Result<ClassificationResult, CoreError> {
        validate_snapshot(products)?;
        Ok(self.classify(products))
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Mark one alert as read. Unknown ids are ignored.
    ///
    /// Returns `true` if an alert matched.
    pub fn mark_read(&mut self, alert_id: AlertId) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == alert_id) {
            Some(alert) => {
                alert.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for alert in &mut self.alerts {
            alert.read = true;
        }
    }

    /// Remove one alert. Unknown ids are ignored.
    ///
    /// Returns `true` if an alert was removed.
    pub fn remove(&mut self, alert_id: AlertId) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != alert_id);
        self.alerts.len() != before
    }

    /// Remove alerts created more than `max_age_days` days ago.
    ///
    /// Returns the number of alerts removed.
    pub fn purge_older_than(&mut self, max_age_days: u32) -> usize {
        self.purge_older_than_at(chrono::Duration::days(i64::from(max_age_days)), Utc::now())
    }

    /// Remove alerts whose `created_at` is strictly before `now - max_age`.
    ///
    /// A cutoff earlier than any representable time removes nothing.
    pub fn purge_older_than_at(&mut self, max_age: chrono::Duration, now: Timestamp) -> usize {
        let Some(cutoff) = now.checked_sub_signed(max_age) else {
            tracing::debug!(
                max_age_days = max_age.num_days(),
                "Purge cutoff out of range, keeping all alerts"
            );
            return 0;
        };
        let before = self.alerts.len();
        self.alerts.retain(|a| a.created_at >= cutoff);
        before - self.alerts.len()
    }

    // -- Queries ------------------------------------------------------------

    /// All alerts, newest first.
    pub fn alerts(&self) -> &[MarginAlert] {
        &self.alerts
    }

    pub fn get(&self, alert_id: AlertId) -> Option<&MarginAlert> {
        self.alerts.iter().find(|a| a.id == alert_id)
    }

    pub fn stats(&self) -> AlertStats {
        AlertStats::from_alerts(&self.alerts)
    }

    pub fn by_severity(&self, severity: AlertSeverity) -> Vec<MarginAlert> {
        self.alerts
            .iter()
            .filter(|a| a.severity == severity)
            .cloned()
            .collect()
    }

    pub fn unread(&self) -> Vec<MarginAlert> {
        self.alerts.iter().filter(|a| !a.read).cloned().collect()
    }

    /// Whether an unread alert exists for `product_id`.
    pub fn has_alerts_for_product(&self, product_id: &str) -> bool {
        self.alerts
            .iter()
            .any(|a| a.product_id == product_id && !a.read)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use margin_events::CollectingSink;

    fn product(id: &str, margin: f64) -> ProductMargin {
        ProductMargin {
            id: id.to_string(),
            name: format!("Producto {id}"),
            price: 100.0,
            cost: 100.0 - margin,
            margin_percent: margin,
            category: "general".to_string(),
        }
    }

    fn engine() -> (AlertEngine, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        (AlertEngine::new(MarginThresholds::default(), sink.clone()), sink)
    }

    #[test]
    fn new_batch_is_prepended_in_input_order() {
        let (mut engine, _) = engine();
        engine.classify(&[product("old", 5.0)]);
        engine.classify(&[product("a", 5.0), product("b", 20.0)]);

        let order: Vec<_> = engine.alerts().iter().map(|a| a.product_id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "old"]);
    }

    #[test]
    fn one_toast_per_alert() {
        let (mut engine, sink) = engine();
        engine.classify(&[product("a", 5.0), product("b", 20.0), product("c", 90.0)]);
        assert_eq!(sink.toasts().len(), 2);
    }

    #[test]
    fn rejected_products_raise_single_aggregate_toast() {
        let (mut engine, sink) = engine();
        let result = engine.classify(&[
            product("x", f64::NAN),
            product("y", f64::INFINITY),
            product("ok", 50.0),
        ]);
        assert_eq!(result.rejected.len(), 2);
        assert!(result.alerts.is_empty());

        let toasts = sink.toasts();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].description.starts_with("2 productos"));
    }

    #[test]
    fn suppressed_products_are_not_flagged() {
        let (engine, sink) = engine();
        let mut engine = engine.with_repeat_policy(RepeatPolicy::SuppressWhileUnread);

        engine.classify(&[product("a", 5.0)]);
        let second = engine.classify(&[product("a", 5.0), product("b", 5.0)]);

        assert_eq!(second.suppressed, 1);
        assert_eq!(second.flagged_products.len(), 1);
        assert_eq!(second.flagged_products[0].id, "b");
        assert_eq!(engine.alerts().len(), 2);
        assert_eq!(sink.toasts().len(), 2);
    }

    #[test]
    fn suppression_applies_within_one_batch() {
        let (engine, _) = engine();
        let mut engine = engine.with_repeat_policy(RepeatPolicy::SuppressWhileUnread);
        let result = engine.classify(&[product("a", 5.0), product("a", 6.0)]);
        assert_eq!(result.alerts.len(), 1);
        assert_eq!(result.suppressed, 1);
    }

    #[test]
    fn remove_reports_whether_anything_changed() {
        let (mut engine, _) = engine();
        let id = engine.classify(&[product("a", 5.0)]).alerts[0].id;
        assert!(engine.remove(id));
        assert!(!engine.remove(id));
        assert!(engine.alerts().is_empty());
    }

    #[test]
    fn purge_with_huge_age_keeps_everything() {
        let (mut engine, _) = engine();
        engine.classify(&[product("a", 5.0)]);
        assert_eq!(engine.purge_older_than(100_000_000), 0);
        assert_eq!(engine.purge_older_than(u32::MAX), 0);
        assert_eq!(engine.alerts().len(), 1);
    }

    #[test]
    fn get_finds_alert_by_id() {
        let (mut engine, _) = engine();
        let id = engine.classify(&[product("a", 5.0)]).alerts[0].id;
        assert_eq!(engine.get(id).map(|a| a.product_id.as_str()), Some("a"));
        assert!(engine.get(Uuid::now_v7()).is_none());
    }
}
