//! Live session state for one in-progress trip.

use crate::geo::Coordinate;
use crate::navigation::mode::WalkingMode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Navigation phase for the current leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Walking toward the boarding stop (transit) or the destination (walk-only)
    Walking,
    /// Riding the bus toward the alighting stop
    OnTransit,
    /// Trip complete; session is frozen
    Arrived,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Walking => write!(f, "Walking"),
            Phase::OnTransit => write!(f, "On transit"),
            Phase::Arrived => write!(f, "Arrived"),
        }
    }
}

/// Mutable state of one live navigation session.
///
/// Owned exclusively by the navigation state machine; created when
/// navigation starts, discarded on cancel, frozen into a
/// [`SessionSnapshot`] on arrival.
#[derive(Debug, Clone)]
pub struct NavigationSession {
    /// Session identifier
    pub id: Uuid,
    /// Current phase
    pub phase: Phase,
    /// Coordinate the arrival detector measures against
    pub current_target: Coordinate,
    /// Cumulative walked distance in meters (walking legs only)
    pub walked_distance_m: f64,
    /// Latest cumulative step count
    pub step_count: u64,
    /// Elapsed trip seconds; frozen when the session arrives
    pub elapsed_seconds: u64,
    /// Estimated calories, one-decimal
    pub calories_kcal: f64,
}

impl NavigationSession {
    /// Create a fresh session targeting the first leg.
    pub fn new(initial_target: Coordinate) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Walking,
            current_target: initial_target,
            walked_distance_m: 0.0,
            step_count: 0,
            elapsed_seconds: 0,
            calories_kcal: 0.0,
        }
    }

    /// Freeze the session into its completion snapshot.
    pub fn snapshot(&self, mode: WalkingMode) -> SessionSnapshot {
        SessionSnapshot {
            mode,
            distance_m: self.walked_distance_m,
            step_count: self.step_count,
            duration_seconds: self.elapsed_seconds,
            calories_kcal: self.calories_kcal,
        }
    }
}

/// Immutable completion summary presented to the caller for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Walking mode the session ran under
    pub mode: WalkingMode,
    /// Total walked distance in meters
    pub distance_m: f64,
    /// Final step count
    pub step_count: u64,
    /// Total trip duration in seconds
    pub duration_seconds: u64,
    /// Estimated calories
    pub calories_kcal: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_walking() {
        let session = NavigationSession::new(Coordinate::new(40.11, -88.22));
        assert_eq!(session.phase, Phase::Walking);
        assert_eq!(session.walked_distance_m, 0.0);
        assert_eq!(session.elapsed_seconds, 0);
    }

    #[test]
    fn test_snapshot_copies_totals() {
        let mut session = NavigationSession::new(Coordinate::new(40.11, -88.22));
        session.walked_distance_m = 820.0;
        session.step_count = 1100;
        session.elapsed_seconds = 600;
        session.calories_kcal = 40.2;

        let snap = session.snapshot(WalkingMode::Brisk);
        assert_eq!(snap.distance_m, 820.0);
        assert_eq!(snap.step_count, 1100);
        assert_eq!(snap.duration_seconds, 600);
        assert_eq!(snap.calories_kcal, 40.2);
        assert_eq!(snap.mode, WalkingMode::Brisk);
    }
}
