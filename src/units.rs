//! Unit conversion and display formatting.
//!
//! Stored values are always metric (meters, meters per second); the unit
//! system only applies at display time. Conversions are pure functions -
//! the active system is an explicit parameter everywhere, never hidden
//! global state.

use serde::{Deserialize, Serialize};

const METERS_PER_MILE: f64 = 1_609.344;
const FEET_PER_METER: f64 = 3.28084;

/// User-selected display unit system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Long distances: meters -> kilometers or miles.
    pub fn distance_from_meters(&self, meters: f64) -> f64 {
        match self {
            UnitSystem::Metric => meters / 1000.0,
            UnitSystem::Imperial => meters / METERS_PER_MILE,
        }
    }

    /// Short distances (elevation, ascent): meters -> meters or feet.
    pub fn short_distance_from_meters(&self, meters: f64) -> f64 {
        match self {
            UnitSystem::Metric => meters,
            UnitSystem::Imperial => meters * FEET_PER_METER,
        }
    }

    /// Speeds: m/s -> km/h or mph.
    pub fn speed_from_mps(&self, mps: f64) -> f64 {
        match self {
            UnitSystem::Metric => mps * 3.6,
            UnitSystem::Imperial => mps * 3600.0 / METERS_PER_MILE,
        }
    }

    pub fn distance_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }

    pub fn short_distance_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "ft",
        }
    }

    pub fn speed_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }

    pub fn pace_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "min/km",
            UnitSystem::Imperial => "min/mi",
        }
    }

    /// Format a distance in meters, e.g. "12.34 km".
    pub fn format_distance(&self, meters: f64) -> String {
        format!("{:.2} {}", self.distance_from_meters(meters), self.distance_unit())
    }

    /// Format a short distance in meters, e.g. "321 m".
    pub fn format_short_distance(&self, meters: f64) -> String {
        format!(
            "{:.0} {}",
            self.short_distance_from_meters(meters),
            self.short_distance_unit()
        )
    }

    /// Format a speed in m/s, e.g. "11.5 km/h".
    pub fn format_speed(&self, mps: f64) -> String {
        format!("{:.1} {}", self.speed_from_mps(mps), self.speed_unit())
    }

    /// Format a pace given in minutes per kilometer, e.g. "5:30 min/km".
    pub fn format_pace(&self, min_per_km: f64) -> String {
        let minutes = match self {
            UnitSystem::Metric => min_per_km,
            UnitSystem::Imperial => min_per_km * METERS_PER_MILE / 1000.0,
        };
        let whole = minutes.floor();
        let seconds = ((minutes - whole) * 60.0).round();
        format!("{}:{:02} {}", whole as u64, seconds as u64, self.pace_unit())
    }

    /// Format energy consumption relative to distance, e.g. "61 kcal/km".
    pub fn format_relative_energy(&self, kcal_per_km: f64) -> String {
        let value = match self {
            UnitSystem::Metric => kcal_per_km,
            UnitSystem::Imperial => kcal_per_km * METERS_PER_MILE / 1000.0,
        };
        format!("{:.0} kcal/{}", value, self.distance_unit())
    }
}

/// Format a duration in milliseconds as "h:mm:ss".
pub fn hour_minute_second(duration_ms: u64) -> String {
    let total_seconds = duration_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}
