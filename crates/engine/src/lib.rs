//! `margin-engine` library crate.
//!
//! Holds the stateful [`AlertEngine`], its environment-driven
//! [`EngineConfig`], and the background purge task. The binary entrypoint
//! lives in `main.rs`.

pub mod background;
pub mod config;
pub mod engine;

pub use background::purge::PurgeTask;
pub use config::EngineConfig;
pub use engine::{AlertEngine, ClassificationResult, SharedEngine, DEFAULT_MAX_AGE_DAYS};
