//! # Trackview
//!
//! Workout visualization core for GPS activity trackers.
//!
//! This library turns a recorded workout (an ordered sequence of GPS samples
//! plus summary statistics) into render-ready models that a thin native UI
//! layer draws:
//!
//! - Diagram series (speed over time, elevation over time)
//! - A map route overlay with start/end markers and a fitted camera
//! - Scene state for switching between overview and fullscreen views
//! - Selection highlights linking diagram points back to map positions
//!
//! ## Features
//!
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//!
//! ## Quick Start
//!
//! ```rust
//! use trackview::{DiagramKind, GeoPoint, UnitSystem, WorkoutSample, build_series};
//!
//! let samples = vec![
//!     WorkoutSample::new(0, GeoPoint::new(51.5074, -0.1278), 12.0, 2.5),
//!     WorkoutSample::new(5_000, GeoPoint::new(51.5080, -0.1290), 13.0, 2.7),
//!     WorkoutSample::new(10_000, GeoPoint::new(51.5090, -0.1300), 14.0, 2.9),
//! ];
//!
//! let series = build_series(DiagramKind::Elevation, &samples, UnitSystem::Metric).unwrap();
//! assert_eq!(series.points.len(), samples.len());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrackViewError};

// Unit conversion and display formatting
pub mod units;
pub use units::{hour_minute_second, UnitSystem};

// Smoothing passes for diagram and summary input
pub mod smoothing;
pub use smoothing::{median_elevation, smooth_speed};

// Diagram builder (sample sequence -> plotted series)
pub mod diagram;
pub use diagram::{build_series, DiagramKind, DiagramPoint, DiagramSeries};

// Map overlay renderer (route polyline, markers, fitted camera)
pub mod overlay;
pub use overlay::{CameraPosition, Marker, MarkerKind, OverlayConfig, RouteOverlay, Viewport};

// Scene coordination (overview / fullscreen switching)
pub mod scene;
pub use scene::{Scene, SceneAction, SceneCoordinator, SceneTransition};

// Selection highlighting (diagram point -> map marker)
pub mod highlight;
pub use highlight::SelectionHighlighter;

// Remote tile source descriptions and the local tile cache
pub mod tilesource;
pub use tilesource::{tile_source_by_name, TileCache, TileSource, HUMANITARIAN, MAPNIK};

// Save-time summary statistics
pub mod summary;
pub use summary::{compute_summary, SummaryConfig, WorkoutSummary};

// Sample store seam (persistence is an external collaborator)
pub mod store;
pub use store::{MemorySampleStore, SampleStore};

// Background export with completion events
pub mod export;
pub use export::{export_in_background, ExportEvent, ExportHandle, TrackExporter};

// Show-workout view model
pub mod viewer;
pub use viewer::{OverviewEntry, ViewerConfig, WorkoutViewer};

// FFI bindings for mobile platforms (iOS/Android)
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("TrackviewRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// Mean earth radius in meters, used for haversine distances and
/// meter-to-degree conversions.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use trackview::GeoPoint;
/// let point = GeoPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Haversine distance to another point, in meters.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlng = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

/// Bounding box over GPS positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    /// Create bounds from GPS points. Returns `None` for empty input.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Expand the bounds by a fixed margin in meters on every side.
    ///
    /// The margin holds strictly: a point the requested distance outside
    /// the original edge still measures inside after the degree round-trip.
    pub fn extend_meters(&self, meters: f64) -> Self {
        let dlat = (meters * (1.0 + 1e-6) / EARTH_RADIUS_M).to_degrees();
        // Longitude degrees shrink with latitude; use the widest applicable factor
        let lat = self
            .min_lat
            .abs()
            .max(self.max_lat.abs())
            .to_radians()
            .cos()
            .max(0.01);
        let dlng = dlat / lat;

        Self {
            min_lat: (self.min_lat - dlat).max(-90.0),
            max_lat: (self.max_lat + dlat).min(90.0),
            min_lng: (self.min_lng - dlng).max(-180.0),
            max_lng: (self.max_lng + dlng).min(180.0),
        }
    }

    /// Check whether a point lies inside the bounds.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lng
            && point.longitude <= self.max_lng
    }
}

/// One timestamped GPS/elevation/speed reading within a workout.
///
/// Samples are immutable after recording; all per-view derived values
/// (smoothed speed, diagram point pairing) live in [`DiagramSeries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct WorkoutSample {
    /// Time since workout start, in milliseconds. Monotonic non-decreasing
    /// across the sequence.
    pub offset_ms: u64,
    /// Geographic position
    pub position: GeoPoint,
    /// Elevation in meters
    pub elevation_m: f64,
    /// Instantaneous speed in meters per second
    pub speed_mps: f64,
}

impl WorkoutSample {
    pub fn new(offset_ms: u64, position: GeoPoint, elevation_m: f64, speed_mps: f64) -> Self {
        Self {
            offset_ms,
            position,
            elevation_m,
            speed_mps,
        }
    }
}

/// Sport kind of a recorded workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum SportKind {
    Running,
    Hiking,
    Cycling,
}

impl SportKind {
    /// Human-readable name for titles and list entries.
    pub fn display_name(&self) -> &'static str {
        match self {
            SportKind::Running => "Running",
            SportKind::Hiking => "Hiking",
            SportKind::Cycling => "Cycling",
        }
    }

    /// Typical metabolic equivalent used for the calorie estimate.
    pub fn met(&self) -> f64 {
        match self {
            SportKind::Running => 9.8,
            SportKind::Hiking => 6.0,
            SportKind::Cycling => 7.5,
        }
    }
}

/// One completed recording session with summary statistics.
///
/// Summary fields are computed once at save time and read-mostly after;
/// only `comment` is user-editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub kind: SportKind,
    /// Free-text comment, editable after the fact
    pub comment: String,
    /// Wall-clock start of the recording
    pub start: DateTime<Utc>,
    /// Wall-clock end of the recording
    pub end: DateTime<Utc>,
    /// Aggregate statistics computed at save time
    pub summary: WorkoutSummary,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> Vec<WorkoutSample> {
        vec![
            WorkoutSample::new(0, GeoPoint::new(51.5074, -0.1278), 10.0, 2.0),
            WorkoutSample::new(5_000, GeoPoint::new(51.5080, -0.1290), 12.0, 2.5),
            WorkoutSample::new(10_000, GeoPoint::new(51.5090, -0.1300), 15.0, 3.0),
            WorkoutSample::new(15_000, GeoPoint::new(51.5100, -0.1310), 13.0, 2.8),
            WorkoutSample::new(20_000, GeoPoint::new(51.5110, -0.1320), 11.0, 2.6),
        ]
    }

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(51.5074, -0.1278).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 181.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_haversine_distance() {
        let a = GeoPoint::new(51.5074, -0.1278);
        let b = GeoPoint::new(51.5080, -0.1290);
        let d = a.distance_m(&b);
        // Roughly 100m apart
        assert!(d > 50.0 && d < 200.0, "unexpected distance {}", d);
        assert!(a.distance_m(&a) < 0.001);
    }

    #[test]
    fn test_bounds_from_points() {
        let points: Vec<GeoPoint> = sample_track().iter().map(|s| s.position).collect();
        let bounds = GeoBounds::from_points(&points).unwrap();

        assert_eq!(bounds.min_lat, 51.5074);
        assert_eq!(bounds.max_lat, 51.5110);
        assert_eq!(bounds.min_lng, -0.1320);
        assert_eq!(bounds.max_lng, -0.1278);

        assert!(GeoBounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_bounds_extend_meters() {
        let points: Vec<GeoPoint> = sample_track().iter().map(|s| s.position).collect();
        let bounds = GeoBounds::from_points(&points).unwrap();
        let extended = bounds.extend_meters(50.0);

        // Every original point stays inside, with real margin on each side
        for p in &points {
            assert!(extended.contains(p));
        }
        let corner = GeoPoint::new(extended.min_lat, extended.min_lng);
        let original_corner = GeoPoint::new(bounds.min_lat, bounds.min_lng);
        assert!(corner.distance_m(&original_corner) >= 50.0);

        // The latitude edge alone carries the full margin, measured back
        // through the haversine round-trip
        let north = GeoPoint::new(extended.max_lat, bounds.min_lng);
        let raw_north = GeoPoint::new(bounds.max_lat, bounds.min_lng);
        assert!(north.distance_m(&raw_north) >= 50.0);
        let south = GeoPoint::new(extended.min_lat, bounds.min_lng);
        let raw_south = GeoPoint::new(bounds.min_lat, bounds.min_lng);
        assert!(south.distance_m(&raw_south) >= 50.0);
    }
}
