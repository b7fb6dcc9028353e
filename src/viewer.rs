//! Show-workout view model.
//!
//! Ties the pipeline together the way the screen uses it: load the sample
//! sequence from the store, format the overview stats, build both
//! diagrams and the map overlay, and own the scene coordinator and the
//! selection highlighter. The native layer renders what this struct
//! exposes and feeds user interactions back in.

use log::info;

use crate::diagram::{build_series, DiagramKind, DiagramSeries};
use crate::error::{Result, TrackViewError};
use crate::highlight::SelectionHighlighter;
use crate::overlay::{CameraPosition, Marker, OverlayConfig, RouteOverlay, Viewport};
use crate::scene::{SceneAction, SceneCoordinator, SceneTransition};
use crate::store::SampleStore;
use crate::units::{hour_minute_second, UnitSystem};
use crate::{Workout, WorkoutSample};

use serde::{Deserialize, Serialize};

/// One key/value row in the overview stats list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct OverviewEntry {
    pub label: String,
    pub value: String,
}

/// Configuration for viewer construction.
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    pub units: UnitSystem,
    pub overlay: OverlayConfig,
}

/// The show-workout screen as a headless view model.
#[derive(Debug)]
pub struct WorkoutViewer {
    workout: Workout,
    samples: Vec<WorkoutSample>,
    units: UnitSystem,
    speed_diagram: DiagramSeries,
    height_diagram: DiagramSeries,
    overlay: RouteOverlay,
    scenes: SceneCoordinator,
    highlighter: SelectionHighlighter,
}

impl WorkoutViewer {
    /// Open a workout: load its samples and build all render models.
    ///
    /// Fails with [`TrackViewError::InsufficientSamples`] when the stored
    /// sequence is too short to visualize, so the caller can show an
    /// "insufficient data" state instead of a broken screen.
    pub fn open<S: SampleStore>(
        store: &S,
        workout: Workout,
        config: &ViewerConfig,
    ) -> Result<Self> {
        let samples = store.samples_of_workout(&workout.id)?;
        if samples.is_empty() {
            return Err(TrackViewError::insufficient_for(&workout.id, 1, 0));
        }

        let speed_diagram = build_series(DiagramKind::Speed, &samples, config.units)?;
        let height_diagram = build_series(DiagramKind::Elevation, &samples, config.units)?;
        let overlay = RouteOverlay::from_samples(&samples, &config.overlay)?;

        info!(
            "[Viewer] Opened workout '{}' ({}, {} samples)",
            workout.id,
            workout.kind.display_name(),
            samples.len()
        );

        Ok(Self {
            workout,
            samples,
            units: config.units,
            speed_diagram,
            height_diagram,
            overlay,
            scenes: SceneCoordinator::new(),
            highlighter: SelectionHighlighter::new(),
        })
    }

    /// Screen title: the sport kind.
    pub fn title(&self) -> &'static str {
        self.workout.kind.display_name()
    }

    /// The key/value rows of the overview layout, in display order.
    pub fn overview_entries(&self) -> Vec<OverviewEntry> {
        let s = &self.workout.summary;
        let u = self.units;
        let kcal_per_km = if s.distance_m > 0.0 {
            s.calories_kcal as f64 / (s.distance_m / 1000.0)
        } else {
            0.0
        };

        vec![
            entry("Comment", self.workout.comment.clone()),
            entry("Date", self.workout.start.format("%Y-%m-%d").to_string()),
            entry("Duration", hour_minute_second(s.duration_ms)),
            entry("Pause duration", hour_minute_second(s.pause_duration_ms)),
            entry(
                "Start time",
                self.workout.start.format("%H:%M:%S").to_string(),
            ),
            entry("End time", self.workout.end.format("%H:%M:%S").to_string()),
            entry("Distance", u.format_distance(s.distance_m)),
            entry("Pace", u.format_pace(s.avg_pace_min_per_km)),
            entry("Avg speed", u.format_speed(s.avg_speed_mps)),
            entry("Top speed", u.format_speed(s.top_speed_mps)),
            entry("Energy", format!("{} kcal", s.calories_kcal)),
            entry("Energy consumption", u.format_relative_energy(kcal_per_km)),
            entry("Ascent", u.format_short_distance(s.ascent_m)),
            entry("Descent", u.format_short_distance(s.descent_m)),
        ]
    }

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn samples(&self) -> &[WorkoutSample] {
        &self.samples
    }

    pub fn speed_diagram(&self) -> &DiagramSeries {
        &self.speed_diagram
    }

    pub fn height_diagram(&self) -> &DiagramSeries {
        &self.height_diagram
    }

    pub fn overlay(&self) -> &RouteOverlay {
        &self.overlay
    }

    pub fn scenes(&self) -> &SceneCoordinator {
        &self.scenes
    }

    /// Forward a scene action; `None` means the action was a no-op in the
    /// current scene.
    pub fn handle_scene(&mut self, action: SceneAction) -> Option<SceneTransition> {
        self.scenes.handle(action)
    }

    /// The map layer finished its initial layout; fit the camera.
    pub fn on_map_ready(&self, viewport: &Viewport) -> CameraPosition {
        self.overlay.on_map_ready(viewport)
    }

    /// Tap on a speed diagram point.
    pub fn select_speed_point(&mut self, point_index: usize) -> Option<Marker> {
        self.highlighter
            .select(&self.speed_diagram, point_index, &self.samples)
    }

    /// Tap on a height diagram point.
    pub fn select_height_point(&mut self, point_index: usize) -> Option<Marker> {
        self.highlighter
            .select(&self.height_diagram, point_index, &self.samples)
    }

    /// Tap on empty chart area.
    pub fn clear_selection(&mut self) {
        self.highlighter.clear();
    }

    /// The highlight marker currently on the map, if any.
    pub fn highlight_marker(&self) -> Option<&Marker> {
        self.highlighter.marker()
    }

    /// Apply an edited comment and persist it.
    pub fn set_comment<S: SampleStore>(&mut self, store: &mut S, comment: &str) -> Result<()> {
        self.workout.comment = comment.to_string();
        store.update_workout(&self.workout)
    }

    /// Delete the workout; consumes the viewer since the screen closes.
    pub fn delete<S: SampleStore>(self, store: &mut S) -> Result<()> {
        store.delete_workout(&self.workout.id)
    }
}

fn entry(label: &str, value: String) -> OverviewEntry {
    OverviewEntry {
        label: label.to_string(),
        value,
    }
}
