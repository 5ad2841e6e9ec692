//! Class departure reminders.
//!
//! Two deadline kinds per class: a pre-departure heads-up 20 minutes
//! before class, and a leave-now alert at the best depart time minus the
//! user's buffer. The scheduler replaces its whole reminder set on every
//! run, so repeated recomputation never accumulates duplicates.

pub mod scheduler;
pub mod types;

pub use scheduler::{cancel_for_class, legacy_min_minutes, ReminderScheduler, ScheduleRunSummary};
pub use types::{is_owned_identifier, NotificationPayload, ReminderKind, ScheduledReminder};
