//! Edge-triggered arrival detection.

use crate::geo::Coordinate;

/// Distance at or below which the current leg is considered complete.
pub const ARRIVAL_THRESHOLD_M: f64 = 30.0;

/// Detects the first crossing of the arrival threshold for one target.
///
/// The latch holds after firing: staying under the threshold does not
/// re-signal. [`ArrivalDetector::retarget`] clears the latch for the next
/// leg.
#[derive(Debug, Clone)]
pub struct ArrivalDetector {
    target: Coordinate,
    latched: bool,
}

impl ArrivalDetector {
    /// Create a detector for the given target coordinate.
    pub fn new(target: Coordinate) -> Self {
        Self {
            target,
            latched: false,
        }
    }

    /// The coordinate arrival is measured against.
    pub fn target(&self) -> Coordinate {
        self.target
    }

    /// Distance from a position to the current target, in meters.
    pub fn distance_to_target(&self, position: Coordinate) -> f64 {
        position.distance_m(&self.target)
    }

    /// Feed a position sample; true exactly once per target when the
    /// distance first reaches the threshold.
    pub fn check(&mut self, position: Coordinate) -> bool {
        if self.latched {
            return false;
        }
        if self.distance_to_target(position) <= ARRIVAL_THRESHOLD_M {
            self.latched = true;
            return true;
        }
        false
    }

    /// Point the detector at the next leg's target and clear the latch.
    pub fn retarget(&mut self, target: Coordinate) {
        self.target = target;
        self.latched = false;
    }
}
