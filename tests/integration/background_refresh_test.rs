//! Background refresh over a SQLite-backed cache: degraded runs keep the
//! last-known route data flowing into reminders.

use chrono::{Local, TimeZone, Timelike};
use classwalk::background::{BackgroundRefresher, RefreshOutcome};
use classwalk::clock::FixedClock;
use classwalk::geo::Coordinate;
use classwalk::notify::InMemoryNotifier;
use classwalk::routes::CachedRouteSummary;
use classwalk::schedule::{ClassInfo, Destination};
use classwalk::storage::{
    CacheStore, Database, NotificationSettings, ProfileSettings, SqliteKeyValueStore,
};
use std::sync::{Arc, Mutex};

fn sqlite_cache() -> CacheStore {
    let database = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
    CacheStore::new(Arc::new(SqliteKeyValueStore::new(database)))
}

fn class(title: &str, start: &str) -> ClassInfo {
    // 2025-03-03 is a Monday
    ClassInfo::new(
        title,
        &["MON"],
        start,
        Destination::Building {
            building_id: "siebel".to_string(),
        },
    )
    .unwrap()
}

fn refresher(
    cache: CacheStore,
    notifier: Arc<InMemoryNotifier>,
) -> BackgroundRefresher {
    BackgroundRefresher::new(
        Arc::new(FixedClock::at(2025, 3, 3, 9, 0)),
        cache,
        None,
        notifier,
        ProfileSettings::default(),
    )
}

#[tokio::test]
async fn test_stale_summary_still_drives_reminders() {
    let cache = sqlite_cache();
    let c = class("CS 225", "14:30");
    cache.set_classes(std::slice::from_ref(&c));
    cache.set_last_known_location(Coordinate::new(40.11, -88.22));
    cache.set_route_summary(
        &c.class_id,
        &CachedRouteSummary {
            fetched_at: Local.with_ymd_and_hms(2025, 3, 3, 8, 30, 0).unwrap(),
            best_depart_minutes: Some(12.0),
            option_labels: vec!["Bus 22 (12 min)".to_string()],
            summary_text: Some("Bus 22 (12 min)".to_string()),
        },
    );

    let notifier = Arc::new(InMemoryNotifier::new());
    let outcome = refresher(cache, notifier.clone()).run().await;

    // No backend available, but the cached summary still produced both
    // reminders at the documented times
    assert_eq!(outcome, RefreshOutcome::NoData);
    let leave = notifier
        .get(&format!("class-depart-{}", c.class_id))
        .unwrap();
    assert_eq!((leave.trigger_at.hour(), leave.trigger_at.minute()), (14, 13));
}

#[tokio::test]
async fn test_disabled_notifications_short_circuit() {
    let cache = sqlite_cache();
    cache.set_notification_settings(&NotificationSettings {
        class_notifications_enabled: false,
        buffer_minutes: 5,
    });
    cache.set_classes(&[class("CS 225", "14:30")]);
    cache.set_last_known_location(Coordinate::new(40.11, -88.22));

    let notifier = Arc::new(InMemoryNotifier::new());
    let outcome = refresher(cache, notifier.clone()).run().await;

    assert_eq!(outcome, RefreshOutcome::NoData);
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn test_repeated_runs_keep_one_reminder_set() {
    let cache = sqlite_cache();
    let c = class("CS 225", "14:30");
    cache.set_classes(std::slice::from_ref(&c));
    cache.set_last_known_location(Coordinate::new(40.11, -88.22));
    cache.set_route_summary(
        &c.class_id,
        &CachedRouteSummary {
            fetched_at: Local.with_ymd_and_hms(2025, 3, 3, 8, 30, 0).unwrap(),
            best_depart_minutes: Some(12.0),
            option_labels: vec!["Bus 22 (12 min)".to_string()],
            summary_text: None,
        },
    );

    let notifier = Arc::new(InMemoryNotifier::new());
    let refresher = refresher(cache, notifier.clone());
    for _ in 0..3 {
        refresher.run().await;
    }

    assert_eq!(notifier.len(), 2);
}

#[tokio::test]
async fn test_empty_cache_is_a_no_op() {
    let notifier = Arc::new(InMemoryNotifier::new());
    let outcome = refresher(sqlite_cache(), notifier.clone()).run().await;
    assert_eq!(outcome, RefreshOutcome::NoData);
    assert!(notifier.is_empty());
}
