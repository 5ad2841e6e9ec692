//! End-to-end navigation flows: walk-only and transit trips driven by a
//! synthetic position stream, with persistence through SQLite.

use classwalk::activity::ActivityLog;
use classwalk::geo::Coordinate;
use classwalk::navigation::session::Phase;
use classwalk::navigation::{NavigationService, WalkingMode};
use classwalk::routes::{RouteKind, RouteOption, Step};
use classwalk::storage::{Database, SqliteActivityLog};
use std::sync::{Arc, Mutex};

// ~0.000899 degrees of latitude is ~100 m
const LAT_PER_100M: f64 = 0.000899;

fn at_meters(m: f64) -> Coordinate {
    Coordinate::new(40.11 + LAT_PER_100M * m / 100.0, -88.22)
}

fn walk_option(dest_m: f64) -> RouteOption {
    let dest = at_meters(dest_m);
    RouteOption {
        kind: RouteKind::Walk,
        summary: "Walk (6 min)".to_string(),
        eta_minutes: 6.0,
        depart_in_minutes: 1.0,
        steps: vec![Step::WalkToDest {
            building_lat: dest.lat,
            building_lng: dest.lng,
            duration_minutes: 6.0,
        }],
    }
}

fn transit_option(boarding_m: f64, alighting_m: f64) -> RouteOption {
    let boarding = at_meters(boarding_m);
    let alighting = at_meters(alighting_m);
    RouteOption {
        kind: RouteKind::Transit,
        summary: "Bus 22 (12 min)".to_string(),
        eta_minutes: 12.0,
        depart_in_minutes: 4.0,
        steps: vec![
            Step::WalkToStop {
                stop_id: "IT:1".to_string(),
                stop_name: "Transit Plaza".to_string(),
                stop_lat: boarding.lat,
                stop_lng: boarding.lng,
                duration_minutes: 3.0,
            },
            Step::Wait {
                stop_id: "IT:1".to_string(),
                duration_minutes: 2.0,
            },
            Step::Ride {
                route: "22".to_string(),
                headsign: "Illini North".to_string(),
                stop_id: "IT:1".to_string(),
                duration_minutes: 5.0,
                alighting_stop_id: "IT:8".to_string(),
                alighting_stop_lat: alighting.lat,
                alighting_stop_lng: alighting.lng,
            },
            Step::WalkToDest {
                building_lat: alighting.lat,
                building_lng: alighting.lng,
                duration_minutes: 2.0,
            },
        ],
    }
}

fn sqlite_log() -> Arc<SqliteActivityLog> {
    let database = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
    Arc::new(SqliteActivityLog::new(database))
}

#[tokio::test]
async fn test_walk_trip_persists_activity_entry() {
    let log = sqlite_log();
    let (handle, _view, service) = NavigationService::start(
        walk_option(200.0),
        WalkingMode::Walk,
        70.0,
        "Grainger Library".to_string(),
        None,
        Some(log.clone() as Arc<dyn ActivityLog>),
    )
    .unwrap();

    for meters in [0.0, 60.0, 120.0] {
        handle.position(at_meters(meters));
    }
    handle.steps(260);
    handle.position(at_meters(180.0));

    let completed = service.run().await.expect("walk should arrive");
    assert!(completed.snapshot.distance_m > 150.0);
    assert_eq!(completed.snapshot.step_count, 260);

    let entries = log.recent(5).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].to, "Grainger Library");
    assert_eq!(entries[0].from, "Current location");
    assert!(entries[0].calories_burned > 0.0);
}

#[tokio::test]
async fn test_transit_trip_passes_through_on_transit() {
    let (handle, view, service) = NavigationService::start(
        transit_option(150.0, 800.0),
        WalkingMode::Walk,
        70.0,
        "Siebel Center".to_string(),
        None,
        None,
    )
    .unwrap();

    // Walk to the boarding stop, ride, arrive at the alighting stop
    for meters in [0.0, 70.0, 130.0, 400.0, 650.0, 790.0] {
        handle.position(at_meters(meters));
    }

    let completed = service.run().await.expect("transit trip should arrive");
    assert_eq!(view.borrow().phase, Some(Phase::Arrived));

    // Walked distance covers only the walking leg, not the ride
    assert!(
        completed.snapshot.distance_m < 200.0,
        "ride distance leaked into walked distance: {}",
        completed.snapshot.distance_m
    );
}

#[tokio::test]
async fn test_gps_jump_does_not_inflate_distance() {
    let log = sqlite_log();
    let (handle, _view, service) = NavigationService::start(
        walk_option(150.0),
        WalkingMode::Walk,
        70.0,
        "Union".to_string(),
        None,
        Some(log.clone() as Arc<dyn ActivityLog>),
    )
    .unwrap();

    handle.position(at_meters(0.0));
    // Teleport far past the jump threshold, then arrive normally
    handle.position(at_meters(5000.0));
    handle.position(at_meters(60.0));
    handle.position(at_meters(130.0));

    let completed = service.run().await.expect("should arrive");
    assert!(
        completed.snapshot.distance_m < 200.0,
        "jump delta was accumulated: {}",
        completed.snapshot.distance_m
    );
}

#[tokio::test]
async fn test_cancel_leaves_activity_log_empty() {
    let log = sqlite_log();
    let (handle, _view, service) = NavigationService::start(
        transit_option(300.0, 900.0),
        WalkingMode::Brisk,
        70.0,
        "Siebel Center".to_string(),
        None,
        Some(log.clone() as Arc<dyn ActivityLog>),
    )
    .unwrap();

    handle.position(at_meters(0.0));
    handle.position(at_meters(80.0));
    handle.cancel().await;

    assert!(service.run().await.is_none());
    assert!(log.recent(5).unwrap().is_empty());
}
