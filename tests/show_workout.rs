//! End-to-end scenarios for the show-workout pipeline: open a stored
//! workout, walk the scenes, tap diagram points, and check the map
//! models - the way the native screen drives the library.

use chrono::TimeZone;
use trackview::{
    compute_summary, GeoBounds, GeoPoint, MarkerKind, MemorySampleStore, Scene, SceneAction,
    SportKind, SummaryConfig, UnitSystem, ViewerConfig, Viewport, Workout, WorkoutSample,
    WorkoutViewer,
};

fn recorded_workout() -> (MemorySampleStore, Workout) {
    // A ~1.3km loop in central London, 5s sampling, mild climb then descent
    let mut samples = Vec::new();
    for i in 0u64..120 {
        let t = i as f64;
        samples.push(WorkoutSample::new(
            i * 5_000,
            GeoPoint::new(51.5074 + t * 0.0001, -0.1278 - (t * 0.05).sin() * 0.0004),
            25.0 + (t * 0.1).sin() * 8.0,
            2.4 + (t * 0.07).cos() * 0.5,
        ));
    }

    let summary = compute_summary(&samples, &SummaryConfig::for_kind(SportKind::Running)).unwrap();
    let workout = Workout {
        id: "2024-06-01-morning".to_string(),
        kind: SportKind::Running,
        comment: String::new(),
        start: chrono::Utc.with_ymd_and_hms(2024, 6, 1, 7, 12, 0).unwrap(),
        end: chrono::Utc.with_ymd_and_hms(2024, 6, 1, 7, 22, 0).unwrap(),
        summary,
    };

    let mut store = MemorySampleStore::new();
    store.insert(workout.clone(), samples);
    (store, workout)
}

#[test]
fn open_workout_and_walk_all_scenes() {
    let (store, workout) = recorded_workout();
    let mut viewer = WorkoutViewer::open(&store, workout, &ViewerConfig::default()).unwrap();

    assert_eq!(viewer.scenes().current(), Scene::Overview);

    // Visit every fullscreen view and come back; the shared map view
    // always has exactly one host
    for (enter, target) in [
        (SceneAction::EnterMap, Scene::MapFullscreen),
        (SceneAction::EnterSpeedDiagram, Scene::SpeedDiagramFullscreen),
        (SceneAction::EnterHeightDiagram, Scene::HeightDiagramFullscreen),
    ] {
        let t = viewer.handle_scene(enter).unwrap();
        assert_eq!(t.to, target);
        assert!(t.reparent_map);
        assert_eq!(viewer.scenes().map_host(), viewer.scenes().current());

        let back = viewer.handle_scene(SceneAction::ReturnToOverview).unwrap();
        assert_eq!(back.to, Scene::Overview);
        assert_eq!(viewer.scenes().map_host(), Scene::Overview);
    }
}

#[test]
fn diagrams_cover_every_sample_and_resolve_back() {
    let (store, workout) = recorded_workout();
    let viewer = WorkoutViewer::open(&store, workout, &ViewerConfig::default()).unwrap();

    let n = viewer.samples().len();
    for series in [viewer.speed_diagram(), viewer.height_diagram()] {
        assert_eq!(series.points.len(), n);
        for (i, point) in series.points.iter().enumerate() {
            assert_eq!(series.sample_index_of(i), Some(point.sample_index as usize));
            assert_eq!(point.sample_index as usize, i);
        }
    }
}

#[test]
fn map_models_fit_the_route() {
    let (store, workout) = recorded_workout();
    let viewer = WorkoutViewer::open(&store, workout, &ViewerConfig::default()).unwrap();
    let overlay = viewer.overlay();

    let raw = GeoBounds::from_points(&overlay.route).unwrap();
    for p in &overlay.route {
        assert!(overlay.fitted_bounds.contains(p));
    }
    // Margin: the fitted box is strictly larger than the raw box
    assert!(overlay.fitted_bounds.min_lat < raw.min_lat);
    assert!(overlay.fitted_bounds.max_lat > raw.max_lat);

    assert_eq!(overlay.start_marker.position, viewer.samples()[0].position);
    assert_eq!(
        overlay.end_marker.position,
        viewer.samples()[viewer.samples().len() - 1].position
    );

    let camera = viewer.on_map_ready(&Viewport {
        width_px: 1080,
        height_px: 810,
        tile_size: 256,
    });
    assert!(overlay.fitted_bounds.contains(&camera.center));
    assert!(camera.zoom > 0);
}

#[test]
fn selection_marks_the_map_and_clears() {
    let (store, workout) = recorded_workout();
    let mut viewer = WorkoutViewer::open(&store, workout, &ViewerConfig::default()).unwrap();

    let marker = viewer.select_speed_point(2).unwrap();
    assert_eq!(marker.kind, MarkerKind::Highlight);
    assert_eq!(marker.position, viewer.samples()[2].position);

    // A new selection replaces the marker, never accumulates
    let marker = viewer.select_height_point(50).unwrap();
    assert_eq!(marker.position, viewer.samples()[50].position);
    assert_eq!(viewer.highlight_marker(), Some(&marker));

    viewer.clear_selection();
    assert!(viewer.highlight_marker().is_none());
}

#[test]
fn overview_formats_with_the_chosen_units() {
    let (store, workout) = recorded_workout();

    let metric = WorkoutViewer::open(&store, workout.clone(), &ViewerConfig::default()).unwrap();
    let metric_distance = metric
        .overview_entries()
        .into_iter()
        .find(|e| e.label == "Distance")
        .unwrap();
    assert!(metric_distance.value.ends_with("km"));

    let config = ViewerConfig {
        units: UnitSystem::Imperial,
        ..Default::default()
    };
    let imperial = WorkoutViewer::open(&store, workout, &config).unwrap();
    let imperial_distance = imperial
        .overview_entries()
        .into_iter()
        .find(|e| e.label == "Distance")
        .unwrap();
    assert!(imperial_distance.value.ends_with("mi"));
}

#[test]
fn edit_comment_then_delete() {
    let (mut store, workout) = recorded_workout();
    let mut viewer = WorkoutViewer::open(&store, workout, &ViewerConfig::default()).unwrap();

    viewer.set_comment(&mut store, "tempo session").unwrap();
    assert_eq!(
        store.workout("2024-06-01-morning").unwrap().comment,
        "tempo session"
    );

    viewer.delete(&mut store).unwrap();
    assert!(store.is_empty());
}
