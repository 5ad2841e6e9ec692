//! Seam to the host OS notification facility.
//!
//! The reminder scheduler talks to this trait only; a platform shell
//! provides the real implementation. Delivery timing past the trigger is
//! the host's background-scheduling contract, not ours.

use crate::reminders::ScheduledReminder;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Notification facility errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification permission denied")]
    PermissionDenied,

    #[error("scheduling failed: {0}")]
    SchedulingFailed(String),
}

/// Scheduled-notification facility.
pub trait Notifier: Send + Sync {
    /// Schedule one reminder under its identifier, replacing any pending
    /// notification with the same identifier.
    fn schedule(&self, reminder: &ScheduledReminder) -> Result<(), NotifyError>;

    /// Cancel the given identifiers. Unknown identifiers are ignored.
    fn cancel(&self, identifiers: &[String]);

    /// Identifiers of all currently pending notifications.
    fn pending_identifiers(&self) -> Vec<String>;
}

/// In-memory notifier for tests and headless runs.
#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    pending: Mutex<HashMap<String, ScheduledReminder>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending reminder for an identifier, if any.
    pub fn get(&self, identifier: &str) -> Option<ScheduledReminder> {
        self.pending.lock().unwrap().get(identifier).cloned()
    }

    /// Number of pending notifications.
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap().is_empty()
    }
}

impl Notifier for InMemoryNotifier {
    fn schedule(&self, reminder: &ScheduledReminder) -> Result<(), NotifyError> {
        self.pending
            .lock()
            .unwrap()
            .insert(reminder.identifier(), reminder.clone());
        Ok(())
    }

    fn cancel(&self, identifiers: &[String]) {
        let mut pending = self.pending.lock().unwrap();
        for id in identifiers {
            pending.remove(id);
        }
    }

    fn pending_identifiers(&self) -> Vec<String> {
        self.pending.lock().unwrap().keys().cloned().collect()
    }
}
