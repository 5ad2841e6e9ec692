//! Position and pedometer fusion.
//!
//! Filters the live coordinate stream for implausible jumps and
//! accumulates walked distance; the device step counter is cumulative and
//! authoritative, so pedometer events overwrite rather than accumulate.

use crate::geo::Coordinate;

/// Position deltas at or above this are treated as GPS noise and excluded
/// from distance accumulation.
pub const JUMP_THRESHOLD_M: f64 = 100.0;

/// Outcome of feeding one coordinate sample into the fusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// First sample; seeds state without contributing distance
    Seeded,
    /// Accepted; walked distance grew by the delta
    Accepted { delta_m: f64 },
    /// Rejected as a jump; walked distance unchanged
    RejectedJump { delta_m: f64 },
}

/// Fuses the position stream with the pedometer stream.
#[derive(Debug, Clone, Default)]
pub struct PositionFusion {
    /// Last sample accepted for distance accumulation
    last_accepted: Option<Coordinate>,
    /// Raw last sample, jump or not (used for target distance / ETA)
    last_raw: Option<Coordinate>,
    /// Cumulative walked distance in meters, walking legs only
    walked_distance_m: f64,
    /// Latest cumulative device step count
    step_count: u64,
}

impl PositionFusion {
    /// Create an empty fusion state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one coordinate sample.
    ///
    /// The raw sample always updates the current position (arrival and ETA
    /// measure against it); only plausible deltas accumulate distance.
    pub fn on_position(&mut self, sample: Coordinate) -> SampleOutcome {
        self.last_raw = Some(sample);

        let previous = match self.last_accepted {
            Some(p) => p,
            None => {
                self.last_accepted = Some(sample);
                return SampleOutcome::Seeded;
            }
        };

        let delta_m = previous.distance_m(&sample);
        if delta_m >= JUMP_THRESHOLD_M {
            tracing::debug!(delta_m, "rejected position jump");
            return SampleOutcome::RejectedJump { delta_m };
        }

        self.last_accepted = Some(sample);
        self.walked_distance_m += delta_m;
        SampleOutcome::Accepted { delta_m }
    }

    /// Record a raw position without distance accumulation.
    ///
    /// Used while riding transit: the vehicle moves the position, not the
    /// pedestrian's legs.
    pub fn observe(&mut self, sample: Coordinate) {
        self.last_raw = Some(sample);
    }

    /// Feed one pedometer reading (cumulative device counter).
    pub fn on_steps(&mut self, cumulative_steps: u64) {
        self.step_count = cumulative_steps;
    }

    /// Latest raw position, if any sample arrived yet.
    pub fn current_position(&self) -> Option<Coordinate> {
        self.last_raw
    }

    /// Cumulative walked distance in meters.
    pub fn walked_distance_m(&self) -> f64 {
        self.walked_distance_m
    }

    /// Latest step count.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Clear all state for a new session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
