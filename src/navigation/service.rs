//! Async owner of one live navigation session.
//!
//! Sensor events arrive on a single mpsc channel and are processed one at
//! a time, so the state machine needs no locking. Collaborator fetches
//! are best-effort with short timeouts; a failure only costs the optional
//! enhancement (stop overlay, encouragement text), never a transition.

use crate::activity::{ActivityEntry, ActivityLog};
use crate::api::{ApiClient, TransitLegDetail};
use crate::geo::Coordinate;
use crate::navigation::machine::{NavigationError, Navigator, RideRef, Transition};
use crate::navigation::mode::WalkingMode;
use crate::navigation::session::{Phase, SessionSnapshot};
use crate::routes::RouteOption;
use chrono::Local;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

/// Timeout for best-effort collaborator fetches.
const COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(5);

/// Sensor event channel depth.
const EVENT_BUFFER: usize = 64;

/// Events delivered to the session owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavEvent {
    /// New position fix
    Position(Coordinate),
    /// Cumulative pedometer reading
    Steps(u64),
    /// User-initiated cancel; terminal, nothing is persisted
    Cancel,
}

/// Sender half handed to the host's sensor callbacks.
#[derive(Clone)]
pub struct SessionHandle {
    events: mpsc::Sender<NavEvent>,
}

impl SessionHandle {
    /// Deliver a position fix. Returns false once the session ended.
    pub fn position(&self, coordinate: Coordinate) -> bool {
        self.events.try_send(NavEvent::Position(coordinate)).is_ok()
    }

    /// Deliver a pedometer reading. Returns false once the session ended.
    pub fn steps(&self, cumulative: u64) -> bool {
        self.events.try_send(NavEvent::Steps(cumulative)).is_ok()
    }

    /// Cancel the session.
    pub async fn cancel(&self) {
        let _ = self.events.send(NavEvent::Cancel).await;
    }
}

/// Read-only view of the live session for display.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub phase: Option<Phase>,
    pub walked_distance_m: f64,
    pub step_count: u64,
    pub elapsed_seconds: u64,
    pub calories_kcal: f64,
    /// Minutes to the current target; `None` renders as "—"
    pub eta_minutes: Option<u64>,
    pub distance_to_target_m: Option<f64>,
    /// Stop sequence and shape while riding, when the fetch succeeded
    pub transit_detail: Option<TransitLegDetail>,
}

/// Final result of a session that reached ARRIVED.
#[derive(Debug, Clone)]
pub struct CompletedSession {
    pub snapshot: SessionSnapshot,
    /// Short message from the encouragement collaborator; omitted when
    /// the fetch failed or timed out
    pub encouragement: Option<String>,
}

/// Runs one navigation session to arrival or cancellation.
pub struct NavigationService {
    navigator: Navigator,
    events: mpsc::Receiver<NavEvent>,
    view_tx: watch::Sender<SessionView>,
    api: Option<Arc<ApiClient>>,
    activity_log: Option<Arc<dyn ActivityLog>>,
    destination_name: String,
    transit_detail: Option<TransitLegDetail>,
}

impl NavigationService {
    /// Start a session for a chosen route option.
    ///
    /// Returns the event handle for sensor callbacks, a watch receiver
    /// for display updates, and the service future to drive with
    /// [`NavigationService::run`].
    pub fn start(
        option: RouteOption,
        mode: WalkingMode,
        body_weight_kg: f64,
        destination_name: String,
        api: Option<Arc<ApiClient>>,
        activity_log: Option<Arc<dyn ActivityLog>>,
    ) -> Result<(SessionHandle, watch::Receiver<SessionView>, Self), NavigationError> {
        let navigator = Navigator::new(option, mode, body_weight_kg)?;
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (view_tx, view_rx) = watch::channel(SessionView::default());

        let service = Self {
            navigator,
            events: events_rx,
            view_tx,
            api,
            activity_log,
            destination_name,
            transit_detail: None,
        };

        Ok((SessionHandle { events: events_tx }, view_rx, service))
    }

    /// Process events until arrival or cancellation.
    ///
    /// Returns the completion summary, or `None` when the session was
    /// canceled (nothing is persisted in that case).
    pub async fn run(mut self) -> Option<CompletedSession> {
        while let Some(event) = self.events.recv().await {
            match event {
                NavEvent::Cancel => {
                    tracing::info!("navigation canceled, session discarded");
                    return None;
                }
                NavEvent::Steps(cumulative) => {
                    self.navigator.on_steps(cumulative, Instant::now());
                    self.publish();
                }
                NavEvent::Position(coordinate) => {
                    let transition = self.navigator.on_position(coordinate, Instant::now());
                    match transition {
                        Some(Transition::EnteredTransit { ride }) => {
                            self.transit_detail = self.fetch_transit_detail(&ride).await;
                            self.publish();
                        }
                        Some(Transition::Arrived { snapshot }) => {
                            self.publish();
                            let encouragement = self.fetch_encouragement(&snapshot).await;
                            self.persist(&snapshot);
                            return Some(CompletedSession {
                                snapshot,
                                encouragement,
                            });
                        }
                        None => self.publish(),
                    }
                }
            }
        }

        // All senders dropped without an explicit cancel; same outcome.
        tracing::info!("event stream closed, session discarded");
        None
    }

    /// Best-effort stop-sequence fetch on boarding.
    async fn fetch_transit_detail(&self, ride: &RideRef) -> Option<TransitLegDetail> {
        let api = self.api.as_ref()?;
        let time_of_day = Local::now().format("%H:%M").to_string();

        match tokio::time::timeout(COLLABORATOR_TIMEOUT, api.transit_leg(ride, &time_of_day)).await
        {
            Ok(Ok(detail)) => Some(detail),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "transit detail unavailable");
                None
            }
            Err(_) => {
                tracing::warn!("transit detail fetch timed out");
                None
            }
        }
    }

    /// Best-effort encouragement fetch on arrival.
    async fn fetch_encouragement(&self, snapshot: &SessionSnapshot) -> Option<String> {
        let api = self.api.as_ref()?;

        match tokio::time::timeout(
            COLLABORATOR_TIMEOUT,
            api.encouragement(
                snapshot.mode,
                snapshot.distance_m,
                snapshot.calories_kcal,
                &self.destination_name,
            ),
        )
        .await
        {
            Ok(Ok(message)) => Some(message),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "encouragement unavailable");
                None
            }
            Err(_) => {
                tracing::warn!("encouragement fetch timed out");
                None
            }
        }
    }

    /// Persist the completed session as an activity entry.
    fn persist(&self, snapshot: &SessionSnapshot) {
        let Some(log) = self.activity_log.as_ref() else {
            return;
        };
        let entry = ActivityEntry::from_snapshot(
            snapshot,
            Local::now().date_naive(),
            "Current location".to_string(),
            self.destination_name.clone(),
        );
        if let Err(e) = log.append(&entry) {
            tracing::warn!(error = %e, "failed to persist activity entry");
        }
    }

    /// Publish the current session view for display.
    fn publish(&self) {
        let session = self.navigator.session();
        self.view_tx.send_replace(SessionView {
            phase: Some(session.phase),
            walked_distance_m: session.walked_distance_m,
            step_count: session.step_count,
            elapsed_seconds: session.elapsed_seconds,
            calories_kcal: session.calories_kcal,
            eta_minutes: self.navigator.eta_minutes(),
            distance_to_target_m: self.navigator.distance_to_target(),
            transit_detail: self.transit_detail.clone(),
        });
    }
}
