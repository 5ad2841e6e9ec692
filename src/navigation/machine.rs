//! Navigation phase state machine.
//!
//! Synchronous core: position and pedometer events go in, phase
//! transitions come out as typed [`Transition`] values. The async service
//! layer performs the side effects (transit-detail fetch, persistence) so
//! a slow or failed collaborator can never block a transition.

use crate::geo::Coordinate;
use crate::navigation::arrival::ArrivalDetector;
use crate::navigation::fusion::PositionFusion;
use crate::navigation::mode::{calories_kcal, WalkingMode};
use crate::navigation::session::{NavigationSession, Phase, SessionSnapshot};
use crate::routes::{RouteError, RouteKind, RouteOption, Step};
use std::time::Instant;
use thiserror::Error;

/// Errors creating or driving a navigation session.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error(transparent)]
    InvalidRoute(#[from] RouteError),

    #[error("route option has no target coordinate for the first leg")]
    MissingTarget,
}

/// Reference to the ride leg, handed to the transit-detail collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideRef {
    pub route: String,
    pub headsign: String,
    pub boarding_stop_id: String,
    pub alighting_stop_id: String,
}

/// A phase transition produced by an arrival signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Reached the boarding stop; now riding toward the alighting stop.
    /// The ride reference is for the best-effort stop-sequence fetch.
    EnteredTransit { ride: RideRef },
    /// Reached the final target; the session is frozen.
    Arrived { snapshot: SessionSnapshot },
}

/// Drives one [`NavigationSession`] against a chosen route option.
pub struct Navigator {
    option: RouteOption,
    mode: WalkingMode,
    body_weight_kg: f64,
    session: NavigationSession,
    fusion: PositionFusion,
    arrival: ArrivalDetector,
    started_at: Option<Instant>,
}

impl Navigator {
    /// Start navigating a validated route option.
    ///
    /// The first target is the boarding stop for transit options and the
    /// destination for walk-only options.
    pub fn new(
        option: RouteOption,
        mode: WalkingMode,
        body_weight_kg: f64,
    ) -> Result<Self, NavigationError> {
        option.validate()?;

        let initial_target = match option.kind {
            RouteKind::Transit => option.boarding_stop(),
            RouteKind::Walk => option.destination(),
        }
        .ok_or(NavigationError::MissingTarget)?;

        tracing::info!(kind = %option.kind, "navigation session started");

        Ok(Self {
            session: NavigationSession::new(initial_target),
            arrival: ArrivalDetector::new(initial_target),
            fusion: PositionFusion::new(),
            option,
            mode,
            body_weight_kg,
            started_at: None,
        })
    }

    /// Feed one position sample.
    ///
    /// Returns a transition when this sample completes the current leg.
    /// Samples after arrival are ignored.
    pub fn on_position(&mut self, sample: Coordinate, at: Instant) -> Option<Transition> {
        if self.session.phase == Phase::Arrived {
            return None;
        }

        self.tick(at);

        // Walking legs accumulate distance; the bus ride only tracks the
        // raw position for arrival detection.
        match self.session.phase {
            Phase::Walking => {
                self.fusion.on_position(sample);
            }
            Phase::OnTransit => {
                self.fusion.observe(sample);
            }
            Phase::Arrived => unreachable!(),
        }

        self.session.walked_distance_m = self.fusion.walked_distance_m();
        if self.session.walked_distance_m > 0.0 {
            self.session.calories_kcal =
                calories_kcal(self.mode, self.body_weight_kg, self.session.walked_distance_m);
        }

        if self.arrival.check(sample) {
            return Some(self.advance());
        }
        None
    }

    /// Feed one pedometer reading. Ignored after arrival.
    pub fn on_steps(&mut self, cumulative_steps: u64, at: Instant) {
        if self.session.phase == Phase::Arrived {
            return;
        }
        self.tick(at);
        self.fusion.on_steps(cumulative_steps);
        self.session.step_count = self.fusion.step_count();
    }

    /// Advance the phase after an arrival signal.
    fn advance(&mut self) -> Transition {
        let first_arrival = self.session.phase == Phase::Walking;
        let is_transit = self.option.kind == RouteKind::Transit;

        if is_transit && first_arrival {
            // Boarding stop reached. Re-target the alighting stop; the
            // validate() in new() guarantees a ride leg exists.
            let alighting = self
                .option
                .alighting_stop()
                .unwrap_or(self.session.current_target);
            self.session.phase = Phase::OnTransit;
            self.session.current_target = alighting;
            self.arrival.retarget(alighting);

            tracing::info!("boarded transit, tracking toward alighting stop");
            return Transition::EnteredTransit {
                ride: self.ride_ref(),
            };
        }

        self.session.phase = Phase::Arrived;
        tracing::info!(
            distance_m = self.session.walked_distance_m,
            elapsed_s = self.session.elapsed_seconds,
            "arrived"
        );
        Transition::Arrived {
            snapshot: self.session.snapshot(self.mode),
        }
    }

    /// Update elapsed time; frozen once arrived.
    fn tick(&mut self, at: Instant) {
        match self.started_at {
            None => self.started_at = Some(at),
            Some(start) => {
                self.session.elapsed_seconds = at.saturating_duration_since(start).as_secs();
            }
        }
    }

    fn ride_ref(&self) -> RideRef {
        match self.option.ride() {
            Some(Step::Ride {
                route,
                headsign,
                stop_id,
                alighting_stop_id,
                ..
            }) => RideRef {
                route: route.clone(),
                headsign: headsign.clone(),
                boarding_stop_id: stop_id.clone(),
                alighting_stop_id: alighting_stop_id.clone(),
            },
            _ => unreachable!("transit option validated to carry a ride leg"),
        }
    }

    /// The live session state.
    pub fn session(&self) -> &NavigationSession {
        &self.session
    }

    /// The route option being navigated.
    pub fn option(&self) -> &RouteOption {
        &self.option
    }

    /// Meters from the latest position to the current target, once a
    /// position fix exists.
    pub fn distance_to_target(&self) -> Option<f64> {
        self.fusion
            .current_position()
            .map(|p| self.arrival.distance_to_target(p))
    }

    /// Walking minutes to the current target: `ceil(d / speed / 60)`.
    /// `None` (displayed as "—") before the first position fix.
    pub fn eta_minutes(&self) -> Option<u64> {
        self.distance_to_target()
            .map(|d| (d / self.mode.speed_mps() / 60.0).ceil() as u64)
    }
}
