//! Product margin snapshots handed in by the product data source.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::threshold_validation::validate_finite;

/// A read-only snapshot of a product and its margin.
///
/// Field names follow the dashboard's JSON export (`marginPercent`). A missing
/// or `null` margin deserializes to NaN so that classification rejects it
/// instead of treating the product as healthy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMargin {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub cost: f64,
    #[serde(default = "missing_margin", deserialize_with = "nullable_margin")]
    pub margin_percent: f64,
    #[serde(default)]
    pub category: String,
}

impl ProductMargin {
    /// Build a snapshot, computing the margin from price and cost.
    ///
    /// When the margin is undefined (non-positive price) it is stored as NaN.
    pub fn from_prices(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        cost: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            cost,
            margin_percent: margin_percent(price, cost).unwrap_or(f64::NAN),
            category: category.into(),
        }
    }
}

/// Margin as a percentage of price: `(price - cost) / price * 100`.
///
/// Returns `None` if the price is not positive or either input is not finite.
pub fn margin_percent(price: f64, cost: f64) -> Option<f64> {
    if !price.is_finite() || !cost.is_finite() || price <= 0.0 {
        return None;
    }
    Some((price - cost) / price * 100.0)
}

/// Check that a snapshot can be classified.
pub fn validate_product(product: &ProductMargin) -> Result<(), CoreError> {
    if product.id.trim().is_empty() {
        return Err(CoreError::Validation("product id is required".to_string()));
    }
    if product.name.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "product {} has an empty name",
            product.id
        )));
    }
    validate_finite(
        product.margin_percent,
        &format!("marginPercent of product {}", product.id),
    )?;
    validate_finite(product.price, &format!("price of product {}", product.id))?;
    validate_finite(product.cost, &format!("cost of product {}", product.id))?;
    Ok(())
}

fn missing_margin() -> f64 {
    f64::NAN
}

fn nullable_margin<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
