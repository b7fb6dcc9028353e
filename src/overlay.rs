//! Map overlay renderer: projects the sample sequence onto a route
//! polyline with start/end markers and a fitted camera.
//!
//! The overlay never talks to a map widget directly. It produces plain
//! render models; the native map layer draws them and reports readiness
//! through [`RouteOverlay::on_map_ready`], at which point the fitted
//! camera is computed for the actual viewport, so the fit never races
//! the map's initial layout pass.

use geo::algorithm::simplify::Simplify;
use geo::{Coord, LineString};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackViewError};
use crate::{GeoBounds, GeoPoint, WorkoutSample};

/// Margin added around the route's bounding box when fitting the camera,
/// in meters.
pub const FIT_MARGIN_M: f64 = 50.0;

/// Configuration for overlay construction.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Margin around the route bounds for the fitted camera, in meters.
    /// Default: 50.0
    pub fit_margin_m: f64,
    /// Douglas-Peucker tolerance for the simplified display polyline
    /// (in degrees). Default: 0.0001 (~11 meters)
    pub simplification_tolerance: f64,
    /// Highest zoom the fitted camera may pick. Default: 19
    pub max_zoom: u8,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            fit_margin_m: FIT_MARGIN_M,
            simplification_tolerance: 0.0001,
            max_zoom: 19,
        }
    }
}

/// Pixel dimensions of the map widget, reported when the map is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Viewport {
    pub width_px: u32,
    pub height_px: u32,
    /// Tile size of the map renderer, typically 256 or 512
    pub tile_size: u32,
}

/// What a map marker denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum MarkerKind {
    /// Green circle at the first sample
    Start,
    /// Red circle at the last sample
    End,
    /// Blue circle at the currently selected sample
    Highlight,
}

/// A fixed-pixel circular marker on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Marker {
    pub position: GeoPoint,
    pub kind: MarkerKind,
    /// Radius in screen pixels, independent of zoom
    pub radius_px: f32,
}

/// Camera position handed to the map layer after fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct CameraPosition {
    pub center: GeoPoint,
    pub zoom: u8,
}

/// Route polyline, markers and camera constraints for one workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOverlay {
    /// Every sample position, in recording order
    pub route: Vec<GeoPoint>,
    /// Douglas-Peucker-simplified route for low-zoom rendering
    pub simplified_route: Vec<GeoPoint>,
    /// Google-encoded polyline of the full route
    pub encoded_polyline: String,
    /// Marker at the first sample
    pub start_marker: Marker,
    /// Marker at the last sample
    pub end_marker: Marker,
    /// Route bounding box expanded by the fit margin; the camera fits this
    /// box, and it doubles as the pan/zoom limit
    pub fitted_bounds: GeoBounds,
    /// Highest zoom the fitted camera may pick, from [`OverlayConfig`]
    pub max_zoom: u8,
}

impl RouteOverlay {
    /// Build the overlay from the workout's ordered sample sequence.
    ///
    /// Needs at least one sample for the start/end markers; returns
    /// [`TrackViewError::InsufficientSamples`] otherwise, and
    /// [`TrackViewError::InvalidCoordinates`] when every position is
    /// outside the valid WGS84 range.
    pub fn from_samples(samples: &[WorkoutSample], config: &OverlayConfig) -> Result<Self> {
        if samples.is_empty() {
            return Err(TrackViewError::insufficient(1, 0));
        }

        let route: Vec<GeoPoint> = samples.iter().map(|s| s.position).collect();
        if !route.iter().any(GeoPoint::is_valid) {
            return Err(TrackViewError::InvalidCoordinates {
                message: "no valid positions in sample sequence".to_string(),
            });
        }

        let coords: Vec<Coord> = route
            .iter()
            .filter(|p| p.is_valid())
            .map(|p| Coord {
                x: p.longitude,
                y: p.latitude,
            })
            .collect();
        let line = LineString::new(coords);

        // Douglas-Peucker needs a segment to split; shorter lines pass
        // through unchanged
        let simplified_route: Vec<GeoPoint> = if line.0.len() < 2 {
            line.0.iter().map(|c| GeoPoint::new(c.y, c.x)).collect()
        } else {
            line.simplify(&config.simplification_tolerance)
                .0
                .iter()
                .map(|c| GeoPoint::new(c.y, c.x))
                .collect()
        };

        let encoded_polyline =
            polyline::encode_coordinates(line, 5).map_err(|e| TrackViewError::InvalidCoordinates {
                message: e.to_string(),
            })?;

        let bounds = GeoBounds::from_points(&route).ok_or_else(|| {
            TrackViewError::InvalidCoordinates {
                message: "empty route".to_string(),
            }
        })?;
        let fitted_bounds = bounds.extend_meters(config.fit_margin_m);

        let start_marker = Marker {
            position: route[0],
            kind: MarkerKind::Start,
            radius_px: 20.0,
        };
        let end_marker = Marker {
            position: route[route.len() - 1],
            kind: MarkerKind::End,
            radius_px: 20.0,
        };

        info!(
            "[Overlay] Built route overlay: {} positions ({} simplified)",
            route.len(),
            simplified_route.len()
        );

        Ok(Self {
            route,
            simplified_route,
            encoded_polyline,
            start_marker,
            end_marker,
            fitted_bounds,
            max_zoom: config.max_zoom,
        })
    }

    /// Fit the camera once the map layer reports it is laid out.
    ///
    /// Picks the highest zoom at which the fitted bounds still fit the
    /// viewport, centered on the bounds.
    pub fn on_map_ready(&self, viewport: &Viewport) -> CameraPosition {
        let zoom = zoom_for_bounds(&self.fitted_bounds, viewport, self.max_zoom);
        let camera = CameraPosition {
            center: self.fitted_bounds.center(),
            zoom,
        };
        debug!(
            "[Overlay] Map ready ({}x{}px), fitted camera at zoom {}",
            viewport.width_px, viewport.height_px, camera.zoom
        );
        camera
    }

    /// Pan/zoom limit the map must enforce: the user cannot pan away from
    /// the recorded route.
    pub fn pan_limit(&self) -> GeoBounds {
        self.fitted_bounds
    }
}

// ============================================================================
// Web Mercator Math
// ============================================================================

/// Convert longitude to tile X coordinate at given zoom
#[inline]
pub fn lon_to_tile_x(lon: f64, zoom: u8) -> f64 {
    let n = 2.0_f64.powi(zoom as i32);
    (lon + 180.0) / 360.0 * n
}

/// Convert latitude to tile Y coordinate at given zoom
#[inline]
pub fn lat_to_tile_y(lat: f64, zoom: u8) -> f64 {
    let n = 2.0_f64.powi(zoom as i32);
    let lat_rad = lat.to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0 * n
}

/// Highest zoom at which `bounds` fits into `viewport`.
///
/// Walks down from `max_zoom` comparing the bounds' pixel span against the
/// viewport at each level. Degenerate bounds (a single position) fit at
/// every level and get `max_zoom`.
pub fn zoom_for_bounds(bounds: &GeoBounds, viewport: &Viewport, max_zoom: u8) -> u8 {
    for zoom in (0..=max_zoom).rev() {
        let span_x =
            (lon_to_tile_x(bounds.max_lng, zoom) - lon_to_tile_x(bounds.min_lng, zoom)).abs();
        // Tile Y grows southward
        let span_y =
            (lat_to_tile_y(bounds.min_lat, zoom) - lat_to_tile_y(bounds.max_lat, zoom)).abs();

        let px_x = span_x * viewport.tile_size as f64;
        let px_y = span_y * viewport.tile_size as f64;

        if px_x <= viewport.width_px as f64 && px_y <= viewport.height_px as f64 {
            return zoom;
        }
    }
    0
}
