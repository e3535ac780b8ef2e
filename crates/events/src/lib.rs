//! Notification delivery for margin alerts.
//!
//! This crate provides the building blocks the alert engine uses to surface
//! alerts to a presenter:
//!
//! - [`Toast`] — the transient notification payload (title, description,
//!   visual variant, on-screen duration).
//! - [`NotificationSink`] — the injected delivery seam.
//! - [`ToastBus`] — in-process fan-out sink backed by
//!   `tokio::sync::broadcast`.
//! - [`TracingSink`] and [`CollectingSink`] — sinks that log or record toasts.

pub mod bus;
pub mod notification;

pub use bus::ToastBus;
pub use notification::{CollectingSink, NotificationSink, Toast, ToastVariant, TracingSink};
