//! Reminder value types and notification identifiers.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Identifier prefix for pre-departure reminders.
pub const PRE_DEPARTURE_PREFIX: &str = "class-";

/// Identifier prefix for leave-now reminders.
pub const LEAVE_NOW_PREFIX: &str = "class-depart-";

/// The two deadline categories per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// Heads-up 20 minutes before class start
    PreDeparture,
    /// Fire at the moment the user must leave
    LeaveNow,
}

impl ReminderKind {
    /// Notification identifier prefix owned by this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            ReminderKind::PreDeparture => PRE_DEPARTURE_PREFIX,
            ReminderKind::LeaveNow => LEAVE_NOW_PREFIX,
        }
    }
}

/// Title, body, and deep link delivered with the notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub deep_link: String,
}

/// One scheduled local alert.
///
/// At most one live reminder of each kind exists per class: the composite
/// identifier below is the replacement key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledReminder {
    /// Class this reminder belongs to
    pub class_id: String,
    /// Deadline category
    pub kind: ReminderKind,
    /// Absolute local trigger time
    pub trigger_at: DateTime<Local>,
    /// Notification content
    pub payload: NotificationPayload,
}

impl ScheduledReminder {
    /// Composite notification identifier, `class-{id}` or
    /// `class-depart-{id}`.
    pub fn identifier(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.class_id)
    }
}

/// Whether a pending notification identifier belongs to this scheduler.
///
/// `class-` is a prefix of `class-depart-`, so one check covers both.
pub fn is_owned_identifier(identifier: &str) -> bool {
    identifier.starts_with(PRE_DEPARTURE_PREFIX)
}

/// Both identifiers for one class.
pub fn identifiers_for_class(class_id: &str) -> [String; 2] {
    [
        format!("{PRE_DEPARTURE_PREFIX}{class_id}"),
        format!("{LEAVE_NOW_PREFIX}{class_id}"),
    ]
}
