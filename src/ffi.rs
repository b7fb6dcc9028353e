//! FFI bindings for mobile platforms (iOS/Android).
//!
//! Exposes the show-workout pipeline to Kotlin and Swift through UniFFI.
//! Simple values cross as records; structured render models cross as JSON
//! strings so the native side can hand them straight to its chart and map
//! components. All functions are prefixed with `ffi_` to avoid naming
//! conflicts with the internal API.

use std::sync::Mutex;

use log::info;
use once_cell::sync::Lazy;

use crate::diagram::{build_series, DiagramKind};
use crate::init_logging;
use crate::overlay::{OverlayConfig, RouteOverlay, Viewport};
use crate::scene::SceneAction;
use crate::store::MemorySampleStore;
use crate::units::UnitSystem;
use crate::viewer::{ViewerConfig, WorkoutViewer};
use crate::{Workout, WorkoutSample};

/// The viewer for the currently open show-workout screen. One screen is
/// visible at a time, matching the app's navigation.
static VIEWER: Lazy<Mutex<Option<WorkoutViewer>>> = Lazy::new(|| Mutex::new(None));

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

/// Build one diagram series without opening a viewer (list previews).
#[uniffi::export]
pub fn ffi_build_series(
    kind: DiagramKind,
    samples: Vec<WorkoutSample>,
    units: UnitSystem,
) -> String {
    init_logging();
    match build_series(kind, &samples, units) {
        Ok(series) => to_json(&series),
        Err(e) => to_json(&serde_json::json!({ "error": e.to_string() })),
    }
}

/// Build a route overlay without opening a viewer.
#[uniffi::export]
pub fn ffi_build_overlay(samples: Vec<WorkoutSample>) -> String {
    init_logging();
    match RouteOverlay::from_samples(&samples, &OverlayConfig::default()) {
        Ok(overlay) => to_json(&overlay),
        Err(e) => to_json(&serde_json::json!({ "error": e.to_string() })),
    }
}

/// Open a workout for viewing. `workout_json` is the serialized
/// [`Workout`]; samples come straight from the app's database layer.
/// Returns an error message, or `None` on success.
#[uniffi::export]
pub fn ffi_open_workout(
    workout_json: String,
    samples: Vec<WorkoutSample>,
    units: UnitSystem,
) -> Option<String> {
    init_logging();

    let workout: Workout = match serde_json::from_str(&workout_json) {
        Ok(w) => w,
        Err(e) => return Some(format!("invalid workout: {}", e)),
    };

    let mut store = MemorySampleStore::new();
    store.insert(workout.clone(), samples);

    let config = ViewerConfig {
        units,
        overlay: OverlayConfig::default(),
    };
    match WorkoutViewer::open(&store, workout, &config) {
        Ok(viewer) => {
            info!("[TrackviewRust] Opened workout '{}'", viewer.workout().id);
            *VIEWER.lock().expect("viewer lock") = Some(viewer);
            None
        }
        Err(e) => Some(e.to_string()),
    }
}

/// Close the current viewer when the screen is dismissed.
#[uniffi::export]
pub fn ffi_close_workout() {
    *VIEWER.lock().expect("viewer lock") = None;
}

/// Overview rows of the open workout as JSON.
#[uniffi::export]
pub fn ffi_overview_entries() -> String {
    match VIEWER.lock().expect("viewer lock").as_ref() {
        Some(viewer) => to_json(&viewer.overview_entries()),
        None => "[]".to_string(),
    }
}

/// The open workout's diagram series as JSON.
#[uniffi::export]
pub fn ffi_diagram(kind: DiagramKind) -> String {
    match VIEWER.lock().expect("viewer lock").as_ref() {
        Some(viewer) => match kind {
            DiagramKind::Speed => to_json(viewer.speed_diagram()),
            DiagramKind::Elevation => to_json(viewer.height_diagram()),
        },
        None => "{}".to_string(),
    }
}

/// The open workout's route overlay as JSON.
#[uniffi::export]
pub fn ffi_overlay() -> String {
    match VIEWER.lock().expect("viewer lock").as_ref() {
        Some(viewer) => to_json(viewer.overlay()),
        None => "{}".to_string(),
    }
}

/// The map finished its initial layout; returns the fitted camera as JSON.
#[uniffi::export]
pub fn ffi_map_ready(viewport: Viewport) -> String {
    match VIEWER.lock().expect("viewer lock").as_ref() {
        Some(viewer) => to_json(&viewer.on_map_ready(&viewport)),
        None => "{}".to_string(),
    }
}

/// Forward a scene action; returns the transition as JSON, or `{}` for a
/// no-op.
#[uniffi::export]
pub fn ffi_scene_action(action: SceneAction) -> String {
    match VIEWER.lock().expect("viewer lock").as_mut() {
        Some(viewer) => match viewer.handle_scene(action) {
            Some(transition) => to_json(&transition),
            None => "{}".to_string(),
        },
        None => "{}".to_string(),
    }
}

/// Select a diagram point; returns the highlight marker as JSON, or `{}`
/// when the tap cleared the selection.
#[uniffi::export]
pub fn ffi_select_point(kind: DiagramKind, point_index: u32) -> String {
    match VIEWER.lock().expect("viewer lock").as_mut() {
        Some(viewer) => {
            let marker = match kind {
                DiagramKind::Speed => viewer.select_speed_point(point_index as usize),
                DiagramKind::Elevation => viewer.select_height_point(point_index as usize),
            };
            match marker {
                Some(marker) => to_json(&marker),
                None => "{}".to_string(),
            }
        }
        None => "{}".to_string(),
    }
}

/// Clear the diagram selection and its map marker.
#[uniffi::export]
pub fn ffi_clear_selection() {
    if let Some(viewer) = VIEWER.lock().expect("viewer lock").as_mut() {
        viewer.clear_selection();
    }
}
