//! Selection highlighting: synchronizes a tap on a diagram point with a
//! marker on the map at the corresponding sample location.
//!
//! At most one highlight marker exists at a time; selecting a new point
//! replaces it and clearing the selection removes it. The originating
//! sample is resolved through the index the diagram builder stored on the
//! point, so lookup is O(1) regardless of sample count.

use log::debug;

use crate::diagram::DiagramSeries;
use crate::overlay::{Marker, MarkerKind};
use crate::WorkoutSample;

/// Radius of the highlight circle in screen pixels.
const HIGHLIGHT_RADIUS_PX: f32 = 10.0;

/// Tracks the single highlight marker for the map.
#[derive(Debug, Clone, Default)]
pub struct SelectionHighlighter {
    marker: Option<Marker>,
}

impl SelectionHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a plotted point; returns the marker to draw.
    ///
    /// Resolves the point's originating sample and replaces any existing
    /// marker. A point index that addresses nothing (a tap outside the
    /// plotted data) clears the selection and returns `None`.
    pub fn select(
        &mut self,
        series: &DiagramSeries,
        point_index: usize,
        samples: &[WorkoutSample],
    ) -> Option<Marker> {
        let sample = series
            .sample_index_of(point_index)
            .and_then(|i| samples.get(i));

        match sample {
            Some(sample) => {
                let marker = Marker {
                    position: sample.position,
                    kind: MarkerKind::Highlight,
                    radius_px: HIGHLIGHT_RADIUS_PX,
                };
                debug!(
                    "[Highlight] Point {} of {} series -> sample at ({:.5}, {:.5})",
                    point_index,
                    series.name,
                    sample.position.latitude,
                    sample.position.longitude
                );
                self.marker = Some(marker);
                Some(marker)
            }
            None => {
                self.clear();
                None
            }
        }
    }

    /// Remove the highlight marker, if any.
    pub fn clear(&mut self) {
        self.marker = None;
    }

    /// The marker currently on the map, if a point is selected.
    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{build_series, DiagramKind};
    use crate::units::UnitSystem;
    use crate::GeoPoint;

    fn track() -> Vec<WorkoutSample> {
        (0..5)
            .map(|i| {
                WorkoutSample::new(
                    i as u64 * 5_000,
                    GeoPoint::new(51.5074 + i as f64 * 0.001, -0.1278),
                    10.0 + i as f64,
                    2.0 + i as f64 * 0.1,
                )
            })
            .collect()
    }

    #[test]
    fn test_select_third_of_five_speed_points() {
        // Tapping the 3rd of 5 plotted speed points shows exactly one
        // marker at the 3rd sample's coordinates.
        let samples = track();
        let series = build_series(DiagramKind::Speed, &samples, UnitSystem::Metric).unwrap();
        let mut highlighter = SelectionHighlighter::new();

        let marker = highlighter.select(&series, 2, &samples).unwrap();
        assert_eq!(marker.position, samples[2].position);
        assert_eq!(marker.kind, MarkerKind::Highlight);
        assert!(highlighter.marker().is_some());
    }

    #[test]
    fn test_new_selection_replaces_marker() {
        let samples = track();
        let series = build_series(DiagramKind::Elevation, &samples, UnitSystem::Metric).unwrap();
        let mut highlighter = SelectionHighlighter::new();

        highlighter.select(&series, 1, &samples);
        let second = highlighter.select(&series, 3, &samples).unwrap();

        // Only the latest marker exists
        assert_eq!(highlighter.marker(), Some(&second));
        assert_eq!(second.position, samples[3].position);
    }

    #[test]
    fn test_tap_outside_plotted_data_clears() {
        let samples = track();
        let series = build_series(DiagramKind::Speed, &samples, UnitSystem::Metric).unwrap();
        let mut highlighter = SelectionHighlighter::new();

        highlighter.select(&series, 0, &samples);
        assert!(highlighter.marker().is_some());

        assert!(highlighter.select(&series, 99, &samples).is_none());
        assert!(highlighter.marker().is_none());
    }

    #[test]
    fn test_clear() {
        let samples = track();
        let series = build_series(DiagramKind::Speed, &samples, UnitSystem::Metric).unwrap();
        let mut highlighter = SelectionHighlighter::new();

        highlighter.select(&series, 4, &samples);
        highlighter.clear();
        assert!(highlighter.marker().is_none());
    }

    #[test]
    fn test_reverse_lookup_identity() {
        // Reverse lookup must return the exact originating sample, not a
        // value-equal neighbor: give two samples identical readings.
        let mut samples = track();
        samples[1].elevation_m = samples[2].elevation_m;
        samples[1].speed_mps = samples[2].speed_mps;

        let series = build_series(DiagramKind::Elevation, &samples, UnitSystem::Metric).unwrap();
        assert_eq!(series.sample_index_of(1), Some(1));
        assert_eq!(series.sample_index_of(2), Some(2));

        let mut highlighter = SelectionHighlighter::new();
        let marker = highlighter.select(&series, 1, &samples).unwrap();
        assert_eq!(marker.position, samples[1].position);
    }
}
