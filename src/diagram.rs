//! Diagram builder: converts the ordered sample sequence into plotted
//! series (speed over time, elevation over time).
//!
//! The converter is a tagged variant ([`DiagramKind`]) rather than an open
//! interface - elevation and speed are the only two diagrams and share all
//! builder logic. Each sample yields exactly one [`DiagramPoint`], in input
//! order, and every point records the index of its originating sample so
//! selection lookup is O(1).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackViewError};
use crate::smoothing::smooth_speed;
use crate::units::UnitSystem;
use crate::WorkoutSample;

/// Which value a diagram plots over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum DiagramKind {
    /// Elevation over time, in the unit system's short distance unit
    Elevation,
    /// Smoothed speed over time, in the unit system's speed unit
    Speed,
}

impl DiagramKind {
    /// Series name shown as the dataset label.
    pub fn name(&self) -> &'static str {
        match self {
            DiagramKind::Elevation => "Height",
            DiagramKind::Speed => "Speed",
        }
    }

    /// Axis description, e.g. "min - km/h".
    pub fn axis_description(&self, units: UnitSystem) -> String {
        match self {
            DiagramKind::Elevation => format!("min - {}", units.short_distance_unit()),
            DiagramKind::Speed => format!("min - {}", units.speed_unit()),
        }
    }
}

/// A derived (time, value) pair plotted for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct DiagramPoint {
    /// Time since workout start, in minutes
    pub time_min: f64,
    /// Display value after unit conversion (and smoothing for speed)
    pub value: f64,
    /// Index of the originating sample in the workout's sample sequence
    pub sample_index: u32,
}

/// A complete plotted series for one diagram.
///
/// This is a derived view over the sample sequence: it owns the smoothed
/// display values and the point-to-sample pairing, so the persisted samples
/// are never mutated. Rebuilt whenever the diagram is rebuilt, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSeries {
    pub kind: DiagramKind,
    /// Dataset label
    pub name: String,
    /// Axis description, e.g. "min - km/h"
    pub axis_description: String,
    /// One point per sample, in sample order
    pub points: Vec<DiagramPoint>,
    /// Unit system the values were converted with
    pub units: UnitSystem,
}

impl DiagramSeries {
    /// Resolve a plotted point back to the index of its originating sample.
    ///
    /// Returns `None` when `point_index` does not address a plotted point.
    pub fn sample_index_of(&self, point_index: usize) -> Option<usize> {
        self.points.get(point_index).map(|p| p.sample_index as usize)
    }
}

/// Build a plotted series from the workout's ordered sample sequence.
///
/// The speed diagram runs the smoothing pre-pass over the whole sequence
/// before conversion; elevation plots raw values. Both convert through the
/// given unit system.
///
/// Returns [`TrackViewError::InsufficientSamples`] for an empty sequence
/// so the caller can show an "insufficient data" state instead of an empty
/// chart feeding first/last lookups downstream.
pub fn build_series(
    kind: DiagramKind,
    samples: &[WorkoutSample],
    units: UnitSystem,
) -> Result<DiagramSeries> {
    if samples.is_empty() {
        return Err(TrackViewError::insufficient(1, 0));
    }

    // Pre-pass: one display value per sample, smoothing included for speed
    let values: Vec<f64> = match kind {
        DiagramKind::Elevation => samples
            .iter()
            .map(|s| units.short_distance_from_meters(s.elevation_m))
            .collect(),
        DiagramKind::Speed => smooth_speed(samples)
            .into_iter()
            .map(|v| units.speed_from_mps(v))
            .collect(),
    };

    let points: Vec<DiagramPoint> = samples
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (sample, value))| DiagramPoint {
            time_min: sample.offset_ms as f64 / 1000.0 / 60.0,
            value,
            sample_index: i as u32,
        })
        .collect();

    debug!(
        "[Diagram] Built {} series: {} points",
        kind.name(),
        points.len()
    );

    Ok(DiagramSeries {
        kind,
        name: kind.name().to_string(),
        axis_description: kind.axis_description(units),
        points,
        units,
    })
}
