//! Collaborator seams for user feedback and navigation.
//!
//! The engine reports outcomes through these traits and knows nothing about
//! toast timing, dismissal, or routing structure.

use tracing::{error, info};

/// The kind of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Error,
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Receives transient user-visible notifications.
pub trait Notifier: Send + Sync {
    /// Display a notification of the given kind.
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Invoked with a single target identifier after a successful submission.
pub trait Navigator: Send + Sync {
    /// Navigate to the given target.
    fn navigate(&self, target: &str);
}

/// A notifier that emits through `tracing` (used by the CLI).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => info!(target: "gatecheck::notify", "{message}"),
            NoticeKind::Error => error!(target: "gatecheck::notify", "{message}"),
        }
    }
}

/// A navigator that logs the target instead of routing (used by the CLI).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, target: &str) {
        info!(target: "gatecheck::notify", "navigate to {target}");
    }
}
