//! Classification of product snapshots into margin alerts.
//!
//! Pure logic. The caller supplies the clock and the id generator so that
//! results are reproducible in tests.

use serde::Serialize;

use crate::alert::MarginAlert;
use crate::error::CoreError;
use crate::product::{validate_product, ProductMargin};
use crate::thresholds::MarginThresholds;
use crate::types::{AlertId, Timestamp};

/// A product that could not be classified, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedProduct {
    pub product_id: String,
    pub reason: String,
}

/// Outcome of one classification pass. All vectors follow input order.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub alerts: Vec<MarginAlert>,
    pub flagged_products: Vec<ProductMargin>,
    pub rejected: Vec<RejectedProduct>,
}

/// Classify every product against `thresholds`.
///
/// Invalid products are reported in `rejected` and never alerted. Each valid
/// product yields at most one alert.
pub fn classify_products(
    products: &[ProductMargin],
    thresholds: &MarginThresholds,
    now: Timestamp,
    mut next_id: impl FnMut() -> AlertId,
) -> Classification {
    let mut result = Classification::default();

    for product in products {
        if let Err(e) = validate_product(product) {
            result.rejected.push(RejectedProduct {
                product_id: product.id.clone(),
                reason: e.to_string(),
            });
            continue;
        }

        let Some(severity) = thresholds.classify(product.margin_percent) else {
            continue;
        };

        result
            .alerts
            .push(MarginAlert::new(next_id(), product, severity, thresholds, now));
        result.flagged_products.push(product.clone());
    }

    result
}

/// Validate a whole snapshot, failing on the first invalid product.
pub fn validate_snapshot(products: &[ProductMargin]) -> Result<(), CoreError> {
    products.iter().try_for_each(validate_product)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
