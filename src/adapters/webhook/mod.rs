//! Run outcome notification

pub mod notifier;

pub use notifier::{LogType, Notifier, RunNotification, WebhookNotifier};
