//! `margin-alerts` -- classify a product snapshot and report margin alerts.
//!
//! Reads a JSON array of products (the dashboard's `ProductMargin` export),
//! runs one classification pass, logs every toast, and prints the resulting
//! alert statistics as JSON on stdout.
//!
//! # Usage
//!
//! ```text
//! margin-alerts <snapshot.json>
//! ```
//!
//! # Environment variables
//!
//! | Variable            | Required | Default | Description                              |
//! |---------------------|----------|---------|------------------------------------------|
//! | `PRODUCTS_SNAPSHOT` | no       | --      | Snapshot path when no argument is given  |
//!
//! Threshold and policy variables are documented on [`EngineConfig`].

use std::sync::Arc;

use anyhow::Context;
use margin_core::ProductMargin;
use margin_engine::{AlertEngine, EngineConfig};
use margin_events::TracingSink;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "margin_engine=info,margin_events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PRODUCTS_SNAPSHOT").ok())
        .context("usage: margin-alerts <snapshot.json> (or set PRODUCTS_SNAPSHOT)")?;

    let config = EngineConfig::from_env().context("invalid engine configuration")?;

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read snapshot {path}"))?;
    let products: Vec<ProductMargin> =
        serde_json::from_str(&raw).with_context(|| format!("malformed snapshot {path}"))?;

    tracing::info!(
        path = %path,
        products = products.len(),
        critical = config.thresholds.critical(),
        low = config.thresholds.low(),
        warning = config.thresholds.warning(),
        "Classifying snapshot",
    );

    let mut engine = AlertEngine::from_config(&config, Arc::new(TracingSink));
    let result = engine.classify(&products);

    tracing::info!(
        flagged = result.flagged_products.len(),
        rejected = result.rejected.len(),
        "Snapshot classified",
    );

    println!("{}", serde_json::to_string_pretty(&engine.stats())?);
    Ok(())
}
