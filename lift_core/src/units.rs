//! Unit conversion at the presentation boundary.
//!
//! The engine computes and stores kilograms, kilometres and minutes per
//! kilometre. Nothing in here is called from inside a formula.

use serde::{Deserialize, Serialize};

const LB_PER_KG: f64 = 2.204_622_621_8;
const KM_PER_MILE: f64 = 1.609_344;

/// Measurement system a user prefers to read values in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn weight_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        }
    }

    pub fn distance_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }

    pub fn pace_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "min/km",
            UnitSystem::Imperial => "min/mi",
        }
    }

    /// Kilograms to the display unit
    pub fn weight_to_display(self, kg: f64) -> f64 {
        match self {
            UnitSystem::Metric => kg,
            UnitSystem::Imperial => kg * LB_PER_KG,
        }
    }

    /// Display unit to kilograms
    pub fn weight_from_display(self, value: f64) -> f64 {
        match self {
            UnitSystem::Metric => value,
            UnitSystem::Imperial => value / LB_PER_KG,
        }
    }

    /// Kilometres to the display unit
    pub fn distance_to_display(self, km: f64) -> f64 {
        match self {
            UnitSystem::Metric => km,
            UnitSystem::Imperial => km / KM_PER_MILE,
        }
    }

    /// Minutes per kilometre to minutes per display distance unit
    pub fn pace_to_display(self, min_per_km: f64) -> f64 {
        match self {
            UnitSystem::Metric => min_per_km,
            UnitSystem::Imperial => min_per_km * KM_PER_MILE,
        }
    }
}

/// Format minutes as `m:ss`
pub fn format_minutes(minutes: f64) -> String {
    if !minutes.is_finite() || minutes < 0.0 {
        return "-".to_string();
    }
    let total_secs = (minutes * 60.0).round() as u64;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Format seconds as `h:mm:ss` or `m:ss`
pub fn format_duration(secs: u32) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_is_identity() {
        let units = UnitSystem::Metric;
        assert_eq!(units.weight_to_display(100.0), 100.0);
        assert_eq!(units.weight_from_display(100.0), 100.0);
        assert_eq!(units.distance_to_display(5.0), 5.0);
        assert_eq!(units.pace_to_display(5.0), 5.0);
    }

    #[test]
    fn test_imperial_conversions() {
        let units = UnitSystem::Imperial;
        assert!((units.weight_to_display(100.0) - 220.462).abs() < 1e-3);
        assert!((units.weight_from_display(220.462_262_18) - 100.0).abs() < 1e-6);
        assert!((units.distance_to_display(1.609_344) - 1.0).abs() < 1e-9);
        assert!((units.pace_to_display(5.0) - 8.04672).abs() < 1e-9);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_minutes(5.0), "5:00");
        assert_eq!(format_minutes(4.5), "4:30");
        assert_eq!(format_minutes(f64::NAN), "-");
        assert_eq!(format_duration(600), "10:00");
        assert_eq!(format_duration(3725), "1:02:05");
    }
}
