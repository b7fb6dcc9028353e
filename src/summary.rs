//! Save-time workout summary statistics.
//!
//! Computed once when a recording is saved and attached to the workout
//! record; the show-workout screen only formats these values, it never
//! recomputes them. Distance integrates haversine segment lengths,
//! ascent/descent integrate median-filtered elevation deltas, and the
//! calorie figure is the usual MET x weight x hours estimate.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackViewError};
use crate::smoothing::median_elevation;
use crate::{SportKind, WorkoutSample};

/// Aggregate statistics for one workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    /// Total distance in meters
    pub distance_m: f64,
    /// Elapsed time from first to last sample, in milliseconds
    pub duration_ms: u64,
    /// Time spent paused (recording gaps), in milliseconds
    pub pause_duration_ms: u64,
    /// Average moving speed in m/s
    pub avg_speed_mps: f64,
    /// Fastest instantaneous speed in m/s
    pub top_speed_mps: f64,
    /// Average pace in minutes per kilometer
    pub avg_pace_min_per_km: f64,
    /// Estimated energy expenditure in kcal
    pub calories_kcal: u32,
    /// Total climb in meters
    pub ascent_m: f64,
    /// Total descent in meters
    pub descent_m: f64,
}

/// Configuration for the summary computation.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Sport kind, selects the MET value for the calorie estimate
    pub kind: SportKind,
    /// Athlete weight in kilograms. Default: 75.0
    pub athlete_weight_kg: f64,
    /// A gap between consecutive samples longer than this counts as
    /// paused rather than moving. Default: 5000 ms
    pub pause_gap_ms: u64,
}

impl SummaryConfig {
    pub fn for_kind(kind: SportKind) -> Self {
        Self {
            kind,
            athlete_weight_kg: 75.0,
            pause_gap_ms: 5_000,
        }
    }
}

/// Compute the summary for an ordered sample sequence.
///
/// Needs at least two samples; below that there is neither a distance nor
/// a duration to report.
pub fn compute_summary(samples: &[WorkoutSample], config: &SummaryConfig) -> Result<WorkoutSummary> {
    if samples.len() < 2 {
        return Err(TrackViewError::insufficient(2, samples.len()));
    }

    let mut distance_m = 0.0;
    for pair in samples.windows(2) {
        distance_m += pair[0].position.distance_m(&pair[1].position);
    }

    let duration_ms = samples[samples.len() - 1].offset_ms - samples[0].offset_ms;

    // Gaps longer than the threshold are recording pauses, not movement
    let mut moving_ms: u64 = 0;
    for pair in samples.windows(2) {
        let gap = pair[1].offset_ms - pair[0].offset_ms;
        if gap <= config.pause_gap_ms {
            moving_ms += gap;
        }
    }
    let pause_duration_ms = duration_ms - moving_ms;

    let moving_s = moving_ms as f64 / 1000.0;
    let avg_speed_mps = if moving_s > 0.0 {
        distance_m / moving_s
    } else {
        0.0
    };
    let top_speed_mps = samples
        .iter()
        .map(|s| s.speed_mps)
        .fold(0.0f64, f64::max);

    let avg_pace_min_per_km = if distance_m > 0.0 {
        (moving_s / 60.0) / (distance_m / 1000.0)
    } else {
        0.0
    };

    // Ascent/descent over median-filtered elevation so single-sample GPS
    // glitches do not inflate the totals
    let elevation = median_elevation(samples);
    let mut ascent_m = 0.0;
    let mut descent_m = 0.0;
    for pair in elevation.windows(2) {
        let delta = pair[1] - pair[0];
        if delta > 0.0 {
            ascent_m += delta;
        } else {
            descent_m -= delta;
        }
    }

    let hours = moving_s / 3600.0;
    let calories_kcal = (config.kind.met() * config.athlete_weight_kg * hours).round() as u32;

    info!(
        "[Summary] {:.0}m in {} ({}ms paused), {:.1} m/s avg",
        distance_m,
        crate::units::hour_minute_second(duration_ms),
        pause_duration_ms,
        avg_speed_mps
    );

    Ok(WorkoutSummary {
        distance_m,
        duration_ms,
        pause_duration_ms,
        avg_speed_mps,
        top_speed_mps,
        avg_pace_min_per_km,
        calories_kcal,
        ascent_m,
        descent_m,
    })
}
