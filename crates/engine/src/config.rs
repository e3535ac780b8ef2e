use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use margin_core::thresholds::{ADVERTENCIA, BAJO, CRITICO};
use margin_core::{CoreError, MarginThresholds, RepeatPolicy};

use crate::engine::DEFAULT_MAX_AGE_DAYS;

/// Default purge interval: once a day.
const DEFAULT_PURGE_INTERVAL_SECS: u64 = 86_400;

/// Upper bound accepted for `ALERT_MAX_AGE_DAYS` (about 100 years).
pub const MAX_ALERT_AGE_DAYS: u32 = 36_500;

/// Engine configuration loaded from environment variables.
///
/// All fields have defaults matching the dashboard's built-in behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Severity band bounds, validated to be strictly increasing.
    pub thresholds: MarginThresholds,
    /// Alerts older than this many days are purged (default: `7`).
    pub max_age_days: u32,
    /// How often the background purge runs (default: one day).
    pub purge_interval: Duration,
    /// Re-alert behavior for products that are already alerted.
    pub repeat_policy: RepeatPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: MarginThresholds::default(),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            purge_interval: Duration::from_secs(DEFAULT_PURGE_INTERVAL_SECS),
            repeat_policy: RepeatPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default  |
    /// |-----------------------------|----------|
    /// | `MARGIN_CRITICAL_THRESHOLD` | `15`     |
    /// | `MARGIN_LOW_THRESHOLD`      | `25`     |
    /// | `MARGIN_WARNING_THRESHOLD`  | `35`     |
    /// | `ALERT_MAX_AGE_DAYS`        | `7`      |
    /// | `ALERT_PURGE_INTERVAL_SECS` | `86400`  |
    /// | `ALERT_REPEAT_POLICY`       | `always` |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let thresholds = MarginThresholds::new(
            parse_var(&lookup, "MARGIN_CRITICAL_THRESHOLD", CRITICO)?,
            parse_var(&lookup, "MARGIN_LOW_THRESHOLD", BAJO)?,
            parse_var(&lookup, "MARGIN_WARNING_THRESHOLD", ADVERTENCIA)?,
        )?;

        let max_age_days = parse_var(&lookup, "ALERT_MAX_AGE_DAYS", DEFAULT_MAX_AGE_DAYS)?;
        if max_age_days > MAX_ALERT_AGE_DAYS {
            return Err(CoreError::Config {
                var: "ALERT_MAX_AGE_DAYS",
                message: format!("must be at most {MAX_ALERT_AGE_DAYS}, got {max_age_days}"),
            });
        }

        let purge_interval_secs: u64 = parse_var(
            &lookup,
            "ALERT_PURGE_INTERVAL_SECS",
            DEFAULT_PURGE_INTERVAL_SECS,
        )?;
        if purge_interval_secs == 0 {
            return Err(CoreError::Config {
                var: "ALERT_PURGE_INTERVAL_SECS",
                message: "must be greater than zero".to_string(),
            });
        }

        let repeat_policy = parse_var(&lookup, "ALERT_REPEAT_POLICY", RepeatPolicy::Always)?;

        Ok(Self {
            thresholds,
            max_age_days,
            purge_interval: Duration::from_secs(purge_interval_secs),
            repeat_policy,
        })
    }
}

/// Parse `var` if set (and non-blank), otherwise return `default`.
fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, CoreError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(var) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|e: T::Err| CoreError::Config {
                var,
                message: format!("'{raw}': {e}"),
            })
        }
        _ => Ok(default),
    }
}
