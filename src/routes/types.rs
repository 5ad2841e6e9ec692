//! Typed route options and steps.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a received route option violates its invariants.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route option has no steps")]
    EmptySteps,

    #[error("transit option has no ride leg")]
    MissingRideLeg,

    #[error("transit option has no boarding stop")]
    MissingBoardingStop,
}

/// Kind of route option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteKind {
    /// Pure walk to the destination
    #[serde(rename = "WALK")]
    Walk,
    /// Walk to a stop, ride a bus, walk to the destination
    #[serde(rename = "BUS")]
    Transit,
}

impl std::fmt::Display for RouteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteKind::Walk => write!(f, "Walk"),
            RouteKind::Transit => write!(f, "Bus"),
        }
    }
}

/// One leg of a route option, tagged for a stable wire schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Step {
    /// Walk from the current position to the boarding stop.
    #[serde(rename = "WALK_TO_STOP")]
    WalkToStop {
        stop_id: String,
        stop_name: String,
        stop_lat: f64,
        stop_lng: f64,
        duration_minutes: f64,
    },
    /// Wait at the boarding stop for the bus.
    #[serde(rename = "WAIT")]
    Wait {
        stop_id: String,
        duration_minutes: f64,
    },
    /// Ride a bus between the boarding and alighting stops.
    #[serde(rename = "RIDE")]
    Ride {
        route: String,
        headsign: String,
        stop_id: String,
        duration_minutes: f64,
        alighting_stop_id: String,
        alighting_stop_lat: f64,
        alighting_stop_lng: f64,
    },
    /// Walk from the alighting stop (or origin) to the destination building.
    #[serde(rename = "WALK_TO_DEST")]
    WalkToDest {
        building_lat: f64,
        building_lng: f64,
        duration_minutes: f64,
    },
}

impl Step {
    /// Duration of this leg in minutes.
    pub fn duration_minutes(&self) -> f64 {
        match self {
            Step::WalkToStop {
                duration_minutes, ..
            }
            | Step::Wait {
                duration_minutes, ..
            }
            | Step::Ride {
                duration_minutes, ..
            }
            | Step::WalkToDest {
                duration_minutes, ..
            } => *duration_minutes,
        }
    }
}

/// A ranked route option produced by the recommendation service.
///
/// Immutable once received; the navigation core never mutates steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOption {
    /// Option kind (serialized as `WALK` / `BUS`)
    #[serde(rename = "type")]
    pub kind: RouteKind,
    /// Human-readable one-line summary, e.g. "Bus 22 (12 min)"
    #[serde(default)]
    pub summary: String,
    /// Total trip minutes
    pub eta_minutes: f64,
    /// Minutes until the user must leave to realize this ETA
    pub depart_in_minutes: f64,
    /// Ordered legs
    pub steps: Vec<Step>,
}

impl RouteOption {
    /// Validate the structural invariants of a received option.
    ///
    /// Steps must be non-empty; a transit option must carry a ride leg
    /// bounded by a boarding and an alighting stop reference.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.steps.is_empty() {
            return Err(RouteError::EmptySteps);
        }
        if self.kind == RouteKind::Transit {
            if !self.steps.iter().any(|s| matches!(s, Step::Ride { .. })) {
                return Err(RouteError::MissingRideLeg);
            }
            if self.boarding_stop().is_none() {
                return Err(RouteError::MissingBoardingStop);
            }
        }
        Ok(())
    }

    /// Coordinate of the boarding stop, for transit options.
    pub fn boarding_stop(&self) -> Option<Coordinate> {
        self.steps.iter().find_map(|s| match s {
            Step::WalkToStop {
                stop_lat, stop_lng, ..
            } => Some(Coordinate::new(*stop_lat, *stop_lng)),
            _ => None,
        })
    }

    /// Coordinate of the alighting stop, for transit options.
    pub fn alighting_stop(&self) -> Option<Coordinate> {
        self.steps.iter().find_map(|s| match s {
            Step::Ride {
                alighting_stop_lat,
                alighting_stop_lng,
                ..
            } => Some(Coordinate::new(*alighting_stop_lat, *alighting_stop_lng)),
            _ => None,
        })
    }

    /// Coordinate of the final destination.
    pub fn destination(&self) -> Option<Coordinate> {
        self.steps.iter().rev().find_map(|s| match s {
            Step::WalkToDest {
                building_lat,
                building_lng,
                ..
            } => Some(Coordinate::new(*building_lat, *building_lng)),
            _ => None,
        })
    }

    /// The ride leg of a transit option.
    pub fn ride(&self) -> Option<&Step> {
        self.steps.iter().find(|s| matches!(s, Step::Ride { .. }))
    }

    /// Short display label, e.g. "Walk (18 min)" or "Bus 22 (12 min)".
    pub fn label(&self) -> String {
        let eta = self.eta_minutes.round() as i64;
        match self.kind {
            RouteKind::Walk => format!("Walk ({} min)", eta),
            RouteKind::Transit => {
                let route = self.steps.iter().find_map(|s| match s {
                    Step::Ride { route, .. } => Some(route.as_str()),
                    _ => None,
                });
                match route {
                    Some(r) => format!("Bus {} ({} min)", r, eta),
                    None => format!("Bus ({} min)", eta),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_option() -> RouteOption {
        RouteOption {
            kind: RouteKind::Walk,
            summary: "Walk (18 min)".to_string(),
            eta_minutes: 18.0,
            depart_in_minutes: 2.0,
            steps: vec![Step::WalkToDest {
                building_lat: 40.1106,
                building_lng: -88.2284,
                duration_minutes: 18.0,
            }],
        }
    }

    fn transit_option() -> RouteOption {
        RouteOption {
            kind: RouteKind::Transit,
            summary: "Bus 22 (12 min)".to_string(),
            eta_minutes: 12.0,
            depart_in_minutes: 4.0,
            steps: vec![
                Step::WalkToStop {
                    stop_id: "IT:1".to_string(),
                    stop_name: "Transit Plaza".to_string(),
                    stop_lat: 40.1100,
                    stop_lng: -88.2291,
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
                    alighting_stop_lat: 40.1138,
                    alighting_stop_lng: -88.2249,
                },
                Step::WalkToDest {
                    building_lat: 40.1142,
                    building_lng: -88.2244,
                    duration_minutes: 2.0,
                },
            ],
        }
    }

    #[test]
    fn test_walk_option_validates() {
        assert!(walk_option().validate().is_ok());
    }

    #[test]
    fn test_empty_steps_rejected() {
        let mut option = walk_option();
        option.steps.clear();
        assert!(matches!(option.validate(), Err(RouteError::EmptySteps)));
    }

    #[test]
    fn test_transit_without_ride_rejected() {
        let mut option = transit_option();
        option.steps.retain(|s| !matches!(s, Step::Ride { .. }));
        assert!(matches!(option.validate(), Err(RouteError::MissingRideLeg)));
    }

    #[test]
    fn test_target_coordinates() {
        let option = transit_option();
        let boarding = option.boarding_stop().unwrap();
        let alighting = option.alighting_stop().unwrap();
        let dest = option.destination().unwrap();
        assert!((boarding.lat - 40.1100).abs() < 1e-9);
        assert!((alighting.lat - 40.1138).abs() < 1e-9);
        assert!((dest.lat - 40.1142).abs() < 1e-9);
    }

    #[test]
    fn test_labels() {
        assert_eq!(walk_option().label(), "Walk (18 min)");
        assert_eq!(transit_option().label(), "Bus 22 (12 min)");
    }

    #[test]
    fn test_step_wire_tags() {
        let json = serde_json::to_string(&Step::Wait {
            stop_id: "IT:1".to_string(),
            duration_minutes: 2.0,
        })
        .unwrap();
        assert!(json.contains("\"type\":\"WAIT\""));
    }

    #[test]
    fn test_option_wire_roundtrip() {
        let json = r#"{
            "type": "BUS",
            "summary": "Bus 22 (12 min)",
            "eta_minutes": 12.0,
            "depart_in_minutes": 4.0,
            "steps": [
                {"type": "WALK_TO_STOP", "stop_id": "IT:1", "stop_name": "Transit Plaza",
                 "stop_lat": 40.11, "stop_lng": -88.2291, "duration_minutes": 3.0},
                {"type": "RIDE", "route": "22", "headsign": "Illini North", "stop_id": "IT:1",
                 "duration_minutes": 5.0, "alighting_stop_id": "IT:8",
                 "alighting_stop_lat": 40.1138, "alighting_stop_lng": -88.2249},
                {"type": "WALK_TO_DEST", "building_lat": 40.1142, "building_lng": -88.2244,
                 "duration_minutes": 2.0}
            ]
        }"#;
        let option: RouteOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.kind, RouteKind::Transit);
        assert!(option.validate().is_ok());
        assert_eq!(option.steps.len(), 3);
    }
}
