//! Reminder scheduling against a pinned clock, covering the documented
//! deadline arithmetic and idempotency guarantees.

use chrono::Timelike;
use classwalk::clock::{Clock, FixedClock};
use classwalk::notify::InMemoryNotifier;
use classwalk::reminders::{cancel_for_class, ReminderScheduler};
use classwalk::routes::CachedRouteSummary;
use classwalk::schedule::{ClassInfo, Destination};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

fn class(title: &str, days: &[&str], start: &str) -> ClassInfo {
    ClassInfo::new(
        title,
        days,
        start,
        Destination::Building {
            building_id: "siebel".to_string(),
        },
    )
    .unwrap()
}

fn summary(depart: f64) -> CachedRouteSummary {
    CachedRouteSummary {
        fetched_at: FixedClock::at(2025, 3, 3, 8, 0).now(),
        best_depart_minutes: Some(depart),
        option_labels: vec!["Bus 22 (12 min)".to_string(), "Walk (18 min)".to_string()],
        summary_text: Some("Bus 22 (12 min)".to_string()),
    }
}

// 2025-03-03 is a Monday
fn scheduler(hour: u32, minute: u32, buffer: i64) -> ReminderScheduler {
    ReminderScheduler::new(Arc::new(FixedClock::at(2025, 3, 3, hour, minute)), buffer)
}

#[test]
fn test_documented_deadline_arithmetic() {
    // Class at 14:30, best depart 12 min, buffer 5 min:
    // pre-departure 14:10, leave-by label 14:18, leave-now 14:13
    let scheduler = scheduler(9, 0, 5);
    let notifier = InMemoryNotifier::new();
    let c = class("CS 225", &["MON"], "14:30");
    let mut summaries = HashMap::new();
    summaries.insert(c.class_id.clone(), summary(12.0));

    scheduler.run(
        std::slice::from_ref(&c),
        &summaries,
        &HashSet::new(),
        &notifier,
    );

    let pre = notifier.get(&format!("class-{}", c.class_id)).unwrap();
    assert_eq!((pre.trigger_at.hour(), pre.trigger_at.minute()), (14, 10));
    assert!(pre.payload.body.contains("2:18 PM"));

    let leave = notifier
        .get(&format!("class-depart-{}", c.class_id))
        .unwrap();
    assert_eq!((leave.trigger_at.hour(), leave.trigger_at.minute()), (14, 13));
}

#[test]
fn test_started_class_gets_nothing() {
    // 09:05, class started 09:00: both triggers are past
    let scheduler = scheduler(9, 5, 5);
    let notifier = InMemoryNotifier::new();
    let c = class("CS 101", &["MON"], "09:00");
    let mut summaries = HashMap::new();
    summaries.insert(c.class_id.clone(), summary(10.0));

    let run = scheduler.run(
        std::slice::from_ref(&c),
        &summaries,
        &HashSet::new(),
        &notifier,
    );
    assert_eq!(run.scheduled, 0);
    assert!(notifier.is_empty());
}

#[test]
fn test_double_reschedule_never_duplicates() {
    let scheduler = scheduler(9, 0, 5);
    let notifier = InMemoryNotifier::new();
    let classes = vec![
        class("CS 225", &["MON"], "14:30"),
        class("PHYS 211", &["MON"], "16:00"),
    ];
    let mut summaries = HashMap::new();
    for c in &classes {
        summaries.insert(c.class_id.clone(), summary(12.0));
    }

    scheduler.run(&classes, &summaries, &HashSet::new(), &notifier);
    scheduler.run(&classes, &summaries, &HashSet::new(), &notifier);

    // Exactly one of each kind per class
    assert_eq!(notifier.len(), 4);
    for c in &classes {
        assert!(notifier.get(&format!("class-{}", c.class_id)).is_some());
        assert!(notifier
            .get(&format!("class-depart-{}", c.class_id))
            .is_some());
    }
}

#[test]
fn test_schedule_change_drops_orphaned_reminders() {
    let scheduler = scheduler(9, 0, 5);
    let notifier = InMemoryNotifier::new();
    let dropped = class("Dropped", &["MON"], "14:30");
    let kept = class("Kept", &["MON"], "16:00");
    let mut summaries = HashMap::new();
    summaries.insert(dropped.class_id.clone(), summary(12.0));
    summaries.insert(kept.class_id.clone(), summary(12.0));

    scheduler.run(
        &[dropped.clone(), kept.clone()],
        &summaries,
        &HashSet::new(),
        &notifier,
    );
    assert_eq!(notifier.len(), 4);

    // The dropped class disappears from the schedule entirely
    scheduler.run(
        std::slice::from_ref(&kept),
        &summaries,
        &HashSet::new(),
        &notifier,
    );
    assert_eq!(notifier.len(), 2);
    assert!(notifier.get(&format!("class-{}", dropped.class_id)).is_none());
}

#[test]
fn test_mark_walking_cancels_both_kinds() {
    let scheduler = scheduler(9, 0, 5);
    let notifier = InMemoryNotifier::new();
    let c = class("CS 225", &["MON"], "14:30");
    let mut summaries = HashMap::new();
    summaries.insert(c.class_id.clone(), summary(12.0));

    scheduler.run(
        std::slice::from_ref(&c),
        &summaries,
        &HashSet::new(),
        &notifier,
    );
    assert_eq!(notifier.len(), 2);

    cancel_for_class(&notifier, &c.class_id);
    assert!(notifier.is_empty());
}
