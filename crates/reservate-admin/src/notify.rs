//! User-visible notifications

use reservate_client::ServiceError;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::{error, info};

/// Sink for the short success/error messages shown after an action
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Report a successful action
    fn success(&self, message: &str);

    /// Report a failed action
    fn error(&self, message: &str);
}

/// `prefix`, followed by the error's detail when there is one
#[must_use]
pub fn describe_failure(prefix: &str, err: &ServiceError) -> String {
    err.detail()
        .map_or_else(|| prefix.to_string(), |detail| format!("{prefix}: {detail}"))
}

/// Prints notifications to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, message: &str) {
        info!(message, "Notification");
        println!("[ok] {message}");
    }

    fn error(&self, message: &str) {
        error!(message, "Notification");
        eprintln!("[error] {message}");
    }
}

/// A notification captured by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Success message
    Success(String),
    /// Error message
    Error(String),
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded error messages
    pub fn errors(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Error(message) => Some(message),
                Notification::Success(_) => None,
            })
            .collect()
    }

    fn push(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Notification::Error(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe_failure_appends_detail() {
        let err = ServiceError::status("http://api/reservate/1/update", 400, "state is invalid");
        assert_eq!(
            describe_failure("Error updating reservation", &err),
            "Error updating reservation: state is invalid"
        );
    }

    #[test]
    fn test_describe_failure_without_detail() {
        let err = ServiceError::status("http://api/reservate", 500, "");
        assert_eq!(
            describe_failure("Error loading reservations", &err),
            "Error loading reservations"
        );
    }

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.success("saved");
        notifier.error("boom");

        assert_eq!(
            notifier.notifications(),
            vec![
                Notification::Success("saved".to_string()),
                Notification::Error("boom".to_string())
            ]
        );
        assert_eq!(notifier.errors(), vec!["boom".to_string()]);
    }
}
