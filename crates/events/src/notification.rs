//! Toast payloads and the notification sink seam.

use std::sync::{Mutex, PoisonError};

use margin_core::{AlertSeverity, MarginAlert};
use serde::{Deserialize, Serialize};

/// On-screen duration for critical alerts.
pub const CRITICAL_TOAST_DURATION_MS: u64 = 10_000;

/// On-screen duration for low and warning alerts.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 5_000;

/// Title of the aggregate toast raised for malformed product data.
pub const INVALID_DATA_TITLE: &str = "Datos de margen inválidos";

// ---------------------------------------------------------------------------
// Toast
// ---------------------------------------------------------------------------

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// A transient notification for the presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    pub duration_ms: u64,
}

impl Toast {
    /// Build the toast announcing a newly generated alert.
    ///
    /// Critical alerts use destructive styling and stay on screen longer.
    pub fn for_alert(alert: &MarginAlert) -> Self {
        let (variant, duration_ms) = match alert.severity {
            AlertSeverity::Critical => (ToastVariant::Destructive, CRITICAL_TOAST_DURATION_MS),
            AlertSeverity::Low | AlertSeverity::Warning => {
                (ToastVariant::Default, DEFAULT_TOAST_DURATION_MS)
            }
        };
        Self {
            title: alert.severity.title().to_string(),
            description: alert.message.clone(),
            variant,
            duration_ms,
        }
    }

    /// Build the single aggregate toast for `count` products that failed
    /// validation in one classification pass.
    pub fn invalid_data(count: usize) -> Self {
        let description = if count == 1 {
            "1 producto tiene datos de margen inválidos y no fue evaluado.".to_string()
        } else {
            format!("{count} productos tienen datos de margen inválidos y no fueron evaluados.")
        };
        Self {
            title: INVALID_DATA_TITLE.to_string(),
            description,
            variant: ToastVariant::Default,
            duration_ms: DEFAULT_TOAST_DURATION_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Receives toasts from the alert engine.
///
/// Delivery is fire-and-forget: implementations must not block and have no
/// way to report failure back to the engine.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Sink that writes every toast to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, toast: Toast) {
        match toast.variant {
            ToastVariant::Destructive => tracing::warn!(
                title = %toast.title,
                duration_ms = toast.duration_ms,
                "{}",
                toast.description
            ),
            ToastVariant::Default => tracing::info!(
                title = %toast.title,
                duration_ms = toast.duration_ms,
                "{}",
                toast.description
            ),
        }
    }
}

/// Sink that keeps every toast in memory, in delivery order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    toasts: Mutex<Vec<Toast>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the toasts received so far.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the toasts received so far.
    pub fn take(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl NotificationSink for CollectingSink {
    fn notify(&self, toast: Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
