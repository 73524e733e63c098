//! UI-side ports driven by the submission controller.

use crate::identifiers::RoutePath;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// Positive confirmation.
    Success,
    /// Non-field failure.
    Error,
}

/// A transient, non-field message (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Localized text.
    pub message: String,
}

impl Notification {
    /// A success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// An error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Displays transient notifications.
pub trait Notifier: Send + Sync {
    /// Shows `notification` to the user.
    fn notify(&self, notification: &Notification);
}

/// Performs client-side navigation.
pub trait Navigator: Send + Sync {
    /// Navigates to `route`.
    fn navigate(&self, route: &RoutePath);
}
