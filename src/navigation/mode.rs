//! Walking modes with their speed and intensity tables.

use serde::{Deserialize, Serialize};

/// Walking intensity selected by the user.
///
/// Closed set: speed and MET are bound in exhaustive matches below, so a
/// new mode cannot gain one table entry without the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkingMode {
    /// Casual walk
    #[default]
    Walk,
    /// Brisk walk
    Brisk,
    /// Fast, deliberate walking
    Speedwalk,
    /// Light jog
    Jog,
}

impl WalkingMode {
    /// Assumed pace in meters per second.
    pub fn speed_mps(&self) -> f64 {
        match self {
            WalkingMode::Walk => 1.4,
            WalkingMode::Brisk => 1.8,
            WalkingMode::Speedwalk => 2.2,
            WalkingMode::Jog => 2.7,
        }
    }

    /// Metabolic equivalent used for calorie estimation.
    pub fn met(&self) -> f64 {
        match self {
            WalkingMode::Walk => 3.5,
            WalkingMode::Brisk => 5.0,
            WalkingMode::Speedwalk => 6.5,
            WalkingMode::Jog => 8.3,
        }
    }

    /// All modes, for settings UIs.
    pub fn all() -> [WalkingMode; 4] {
        [
            WalkingMode::Walk,
            WalkingMode::Brisk,
            WalkingMode::Speedwalk,
            WalkingMode::Jog,
        ]
    }
}

impl std::fmt::Display for WalkingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalkingMode::Walk => write!(f, "Walk"),
            WalkingMode::Brisk => write!(f, "Brisk"),
            WalkingMode::Speedwalk => write!(f, "Speedwalk"),
            WalkingMode::Jog => write!(f, "Jog"),
        }
    }
}

/// Estimate calories for a walked distance at the given mode and body weight.
///
/// `kcal = MET × weight_kg × hours`, where hours is the time the distance
/// takes at the mode's pace. Rounded to one decimal.
pub fn calories_kcal(mode: WalkingMode, body_weight_kg: f64, distance_m: f64) -> f64 {
    if distance_m <= 0.0 {
        return 0.0;
    }
    let hours = distance_m / mode.speed_mps() / 3600.0;
    let kcal = mode.met() * body_weight_kg * hours;
    (kcal * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed reference weight used across calorie tests.
    const REFERENCE_WEIGHT_KG: f64 = 70.0;

    #[test]
    fn test_speeds_increase_with_intensity() {
        let speeds: Vec<f64> = WalkingMode::all().iter().map(|m| m.speed_mps()).collect();
        assert!(speeds.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_mets_increase_with_intensity() {
        let mets: Vec<f64> = WalkingMode::all().iter().map(|m| m.met()).collect();
        assert!(mets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_every_mode_has_speed_and_met() {
        for mode in WalkingMode::all() {
            assert!(mode.speed_mps() > 0.0);
            assert!(mode.met() > 0.0);
        }
    }

    #[test]
    fn test_calories_formula() {
        // 1008 m at 1.4 m/s = 720 s = 0.2 h; 3.5 × 70 × 0.2 = 49.0
        let kcal = calories_kcal(WalkingMode::Walk, REFERENCE_WEIGHT_KG, 1008.0);
        assert_eq!(kcal, 49.0);
    }

    #[test]
    fn test_calories_rounded_to_one_decimal() {
        let kcal = calories_kcal(WalkingMode::Brisk, REFERENCE_WEIGHT_KG, 333.0);
        assert_eq!(kcal, (kcal * 10.0).round() / 10.0);
    }

    #[test]
    fn test_no_calories_for_zero_distance() {
        assert_eq!(calories_kcal(WalkingMode::Jog, REFERENCE_WEIGHT_KG, 0.0), 0.0);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&WalkingMode::Brisk).unwrap(), "\"brisk\"");
    }
}
