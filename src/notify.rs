//! User-facing notifications ("toasts") raised by board operations.

use std::sync::Mutex;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// A single notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Sink for success and error notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Prints toasts to stderr and mirrors them into the log.
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        tracing::debug!(toast = message, "Success toast");
        eprintln!("✅ {}", message);
    }

    fn error(&self, message: &str) {
        tracing::debug!(toast = message, "Error toast");
        eprintln!("❌ {}", message);
    }
}

/// Keeps every toast in memory, in order.
#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All toasts raised so far.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// Messages of the error toasts raised so far.
    pub fn errors(&self) -> Vec<String> {
        self.messages(ToastLevel::Error)
    }

    /// Messages of the success toasts raised so far.
    pub fn successes(&self) -> Vec<String> {
        self.messages(ToastLevel::Success)
    }

    fn messages(&self, level: ToastLevel) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter(|t| t.level == level)
            .map(|t| t.message)
            .collect()
    }

    fn record(&self, level: ToastLevel, message: &str) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(Toast {
                level,
                message: message.to_string(),
            });
        }
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.record(ToastLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.record(ToastLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_order_and_level() {
        let notifier = RecordingNotifier::new();
        notifier.success("The Job was Created Successfully");
        notifier.error("Unable to Load the Jobs");

        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].level, ToastLevel::Success);
        assert_eq!(notifier.errors(), vec!["Unable to Load the Jobs".to_string()]);
        assert_eq!(notifier.successes().len(), 1);
    }
}
