//! Transient user notifications ("toasts").
//!
//! A [`Notification`] is a short-lived, fire-and-forget message describing a
//! state change that just happened. Producers hand notifications to a
//! [`NotificationSink`]; no acknowledgment or delivery guarantee exists.

use tokio::sync::mpsc;

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Informational message.
    #[default]
    Default,
    /// A failed or rejected user action.
    Destructive,
}

/// A message for the toast/alert surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short headline.
    pub title: String,
    /// Longer explanation (may be empty).
    pub description: String,
    /// Display severity.
    pub severity: Severity,
}

impl Notification {
    /// Creates an informational notification.
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Default,
        }
    }

    /// Creates a destructive notification with no description.
    #[must_use]
    pub fn destructive(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            severity: Severity::Destructive,
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.description.is_empty() {
            write!(f, "[{}]", self.title)
        } else {
            write!(f, "[{}] {}", self.title, self.description)
        }
    }
}

/// Receives notifications. Implementations must not block.
pub trait NotificationSink: Send + Sync {
    /// Shows (or forwards) a notification.
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Default => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
            Severity::Destructive => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "notification"
            ),
        }
    }
}

/// Forwards notifications over a bounded channel.
///
/// Uses `try_send`: a full or closed channel drops the notification.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Notification>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that drains it.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(n)) => {
                tracing::warn!(title = %n.title, "notification dropped, channel full");
            }
            Err(mpsc::error::TrySendError::Closed(n)) => {
                tracing::debug!(title = %n.title, "notification dropped, receiver gone");
            }
        }
    }
}
