//! Reminder computation and idempotent replacement.

use crate::clock::Clock;
use crate::notify::Notifier;
use crate::reminders::types::{
    identifiers_for_class, is_owned_identifier, NotificationPayload, ReminderKind,
    ScheduledReminder,
};
use crate::routes::CachedRouteSummary;
use crate::schedule::{classes_today, ClassInfo};
use chrono::{DateTime, Duration, Local};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Minutes before class start that the pre-departure heads-up fires.
const PRE_DEPARTURE_LEAD_MINUTES: i64 = 20;

/// Counters from one scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleRunSummary {
    /// Pending reminders canceled before recreation
    pub canceled: usize,
    /// Reminders created this run
    pub scheduled: usize,
    /// Classes excluded (not today, dismissed, or already missed)
    pub skipped: usize,
    /// Notification permission was denied; the run stopped scheduling.
    /// Terminal for this attempt, the user must act outside this core.
    pub permission_denied: bool,
}

/// Computes today's reminders and replaces the pending set.
pub struct ReminderScheduler {
    clock: Arc<dyn Clock>,
    /// Extra minutes subtracted ahead of the depart offset
    buffer_minutes: i64,
}

impl ReminderScheduler {
    pub fn new(clock: Arc<dyn Clock>, buffer_minutes: i64) -> Self {
        Self {
            clock,
            buffer_minutes,
        }
    }

    /// Recompute and replace all reminders owned by this scheduler.
    ///
    /// Every pending identifier under the two class prefixes is canceled
    /// first, then the fresh set is created, so reruns never leave
    /// duplicates or orphans. Both halves run before returning.
    pub fn run(
        &self,
        classes: &[ClassInfo],
        summaries: &HashMap<String, CachedRouteSummary>,
        walked_today: &HashSet<String>,
        notifier: &dyn Notifier,
    ) -> ScheduleRunSummary {
        let now = self.clock.now();
        let mut summary = ScheduleRunSummary::default();
        let mut fresh: Vec<ScheduledReminder> = Vec::new();

        for class in classes_today(classes, now) {
            if walked_today.contains(&class.class_id) {
                tracing::debug!(class = %class.title, "skipping, already walking today");
                summary.skipped += 1;
                continue;
            }

            let reminders = self.reminders_for_class(class, summaries.get(&class.class_id), now);
            if reminders.is_empty() {
                summary.skipped += 1;
                continue;
            }
            fresh.extend(reminders);
        }

        let stale: Vec<String> = notifier
            .pending_identifiers()
            .into_iter()
            .filter(|id| is_owned_identifier(id))
            .collect();
        summary.canceled = stale.len();
        notifier.cancel(&stale);

        for reminder in &fresh {
            match notifier.schedule(reminder) {
                Ok(()) => summary.scheduled += 1,
                Err(crate::notify::NotifyError::PermissionDenied) => {
                    tracing::warn!("notification permission denied, aborting run");
                    summary.permission_denied = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!(id = %reminder.identifier(), error = %e, "failed to schedule reminder")
                }
            }
        }

        tracing::info!(
            canceled = summary.canceled,
            scheduled = summary.scheduled,
            skipped = summary.skipped,
            "reminder set replaced"
        );
        summary
    }

    /// Future-dated reminders for one class occurring today.
    fn reminders_for_class(
        &self,
        class: &ClassInfo,
        summary: Option<&CachedRouteSummary>,
        now: DateTime<Local>,
    ) -> Vec<ScheduledReminder> {
        let class_start = class.start_on_day(now);
        let deep_link = format!("classwalk://class/{}", class.class_id);

        // Structured depart offset first; the legacy text parse only
        // backfills when no structured summary exists.
        let best_depart_minutes = summary.and_then(|s| {
            s.best_depart_minutes
                .or_else(|| s.summary_text.as_deref().and_then(legacy_min_minutes))
        });

        let mut reminders = Vec::with_capacity(2);

        let pre_at = class_start - Duration::minutes(PRE_DEPARTURE_LEAD_MINUTES);
        if pre_at > now {
            let body = match (summary, best_depart_minutes) {
                (Some(s), Some(depart)) if s.has_structured_data() => {
                    let leave_by = class_start - minutes_duration(depart);
                    let mut body = format!(
                        "Leave by {} to make {}.",
                        leave_by.format("%-I:%M %p"),
                        class.title
                    );
                    if !s.option_labels.is_empty() {
                        body.push_str(&format!(" Options: {}.", s.option_labels.join(", ")));
                    }
                    body
                }
                _ => format!(
                    "{} starts at {}. Open the app to plan your walk.",
                    class.title,
                    class_start.format("%-I:%M %p")
                ),
            };
            reminders.push(ScheduledReminder {
                class_id: class.class_id.clone(),
                kind: ReminderKind::PreDeparture,
                trigger_at: pre_at,
                payload: NotificationPayload {
                    title: class.title.clone(),
                    body,
                    deep_link: deep_link.clone(),
                },
            });
        }

        // Leave-now needs a known, positive depart offset
        if let Some(depart) = best_depart_minutes.filter(|d| *d > 0.0) {
            let leave_at =
                class_start - minutes_duration(depart) - Duration::minutes(self.buffer_minutes);
            if leave_at > now {
                reminders.push(ScheduledReminder {
                    class_id: class.class_id.clone(),
                    kind: ReminderKind::LeaveNow,
                    trigger_at: leave_at,
                    payload: NotificationPayload {
                        title: format!("Time to leave for {}", class.title),
                        body: format!(
                            "{} starts at {}. Head out now to make it.",
                            class.title,
                            class_start.format("%-I:%M %p")
                        ),
                        deep_link,
                    },
                });
            }
        }

        reminders
    }
}

/// Cancel both reminders for one class (user marked "I'm walking").
pub fn cancel_for_class(notifier: &dyn Notifier, class_id: &str) {
    notifier.cancel(&identifiers_for_class(class_id));
}

/// Legacy fallback: smallest number embedded in a free-text summary,
/// read as minutes. Non-numeric text yields `None`, never an error.
pub fn legacy_min_minutes(text: &str) -> Option<f64> {
    let mut smallest: Option<u64> = None;
    let mut digits = String::new();

    for c in text.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if !digits.is_empty() {
            if let Ok(value) = digits.parse::<u64>() {
                smallest = Some(smallest.map_or(value, |s| s.min(value)));
            }
            digits.clear();
        }
    }

    smallest.map(|s| s as f64)
}

/// Fractional-minute offsets become whole seconds.
fn minutes_duration(minutes: f64) -> Duration {
    Duration::seconds((minutes * 60.0).round() as i64)
}
