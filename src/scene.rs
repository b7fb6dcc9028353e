//! Scene coordination for the show-workout screen.
//!
//! The screen presents one of four mutually exclusive layouts: the
//! overview (stats, embedded map and diagrams) or a fullscreen view of
//! the map, the speed diagram or the height diagram. Tile-backed map
//! views are expensive to construct, so a single map view instance is
//! shared between scenes; switching emits a reparenting instruction
//! instead of ever creating a second instance.
//!
//! Transitions are animated by the UI layer but complete synchronously
//! from the caller's perspective - the coordinator's state is final when
//! [`SceneCoordinator::handle`] returns.

use log::debug;
use serde::{Deserialize, Serialize};

/// One of the fixed set of mutually exclusive layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum Scene {
    /// Stats list with embedded map and diagrams
    Overview,
    /// Fullscreen map
    MapFullscreen,
    /// Fullscreen speed diagram (map on top, chart below)
    SpeedDiagramFullscreen,
    /// Fullscreen height diagram (map on top, chart below)
    HeightDiagramFullscreen,
}

impl Scene {
    pub fn is_fullscreen(&self) -> bool {
        !matches!(self, Scene::Overview)
    }
}

/// User interactions that drive scene switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum SceneAction {
    /// Tap on the embedded map
    EnterMap,
    /// Tap on the embedded speed chart
    EnterSpeedDiagram,
    /// Tap on the embedded height chart
    EnterHeightDiagram,
    /// The single action every fullscreen state exposes
    ReturnToOverview,
}

/// Result of a handled scene action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct SceneTransition {
    pub from: Scene,
    pub to: Scene,
    /// The shared map view must be detached from `from`'s layout and
    /// attached to `to`'s
    pub reparent_map: bool,
}

/// Keeps exactly one scene visible and tracks which scene currently hosts
/// the shared map view.
#[derive(Debug, Clone)]
pub struct SceneCoordinator {
    current: Scene,
    map_host: Scene,
}

impl Default for SceneCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneCoordinator {
    /// Start in the overview, which hosts the embedded map.
    pub fn new() -> Self {
        Self {
            current: Scene::Overview,
            map_host: Scene::Overview,
        }
    }

    pub fn current(&self) -> Scene {
        self.current
    }

    /// The scene whose layout currently owns the shared map view.
    pub fn map_host(&self) -> Scene {
        self.map_host
    }

    /// Apply a user action.
    ///
    /// Entering a fullscreen view is only meaningful from the overview
    /// (that is where the embedded views live); the return action only
    /// from a fullscreen view. Anything else is a no-op returning `None`.
    pub fn handle(&mut self, action: SceneAction) -> Option<SceneTransition> {
        let target = match (self.current, action) {
            (Scene::Overview, SceneAction::EnterMap) => Scene::MapFullscreen,
            (Scene::Overview, SceneAction::EnterSpeedDiagram) => Scene::SpeedDiagramFullscreen,
            (Scene::Overview, SceneAction::EnterHeightDiagram) => Scene::HeightDiagramFullscreen,
            (from, SceneAction::ReturnToOverview) if from.is_fullscreen() => Scene::Overview,
            _ => return None,
        };

        let transition = SceneTransition {
            from: self.current,
            to: target,
            // Every scene layout embeds the map, so switching always moves
            // the single instance
            reparent_map: self.map_host != target,
        };

        self.current = target;
        self.map_host = target;

        debug!(
            "[Scene] {:?} -> {:?} (reparent_map: {})",
            transition.from, transition.to, transition.reparent_map
        );

        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let scenes = SceneCoordinator::new();
        assert_eq!(scenes.current(), Scene::Overview);
        assert_eq!(scenes.map_host(), Scene::Overview);
    }

    #[test]
    fn test_enter_and_return() {
        let mut scenes = SceneCoordinator::new();

        let t = scenes.handle(SceneAction::EnterMap).unwrap();
        assert_eq!(t.to, Scene::MapFullscreen);
        assert!(t.reparent_map);
        assert_eq!(scenes.current(), Scene::MapFullscreen);

        let t = scenes.handle(SceneAction::ReturnToOverview).unwrap();
        assert_eq!(t.to, Scene::Overview);
        assert_eq!(scenes.current(), Scene::Overview);
    }

    #[test]
    fn test_return_reaches_overview_from_every_fullscreen_state() {
        for enter in [
            SceneAction::EnterMap,
            SceneAction::EnterSpeedDiagram,
            SceneAction::EnterHeightDiagram,
        ] {
            let mut scenes = SceneCoordinator::new();
            scenes.handle(enter).unwrap();
            assert!(scenes.current().is_fullscreen());
            scenes.handle(SceneAction::ReturnToOverview).unwrap();
            assert_eq!(scenes.current(), Scene::Overview);
        }
    }

    #[test]
    fn test_map_never_duplicated() {
        // The shared-ownership invariant: after every transition the map
        // has exactly one host, the visible scene.
        let mut scenes = SceneCoordinator::new();
        let actions = [
            SceneAction::EnterSpeedDiagram,
            SceneAction::ReturnToOverview,
            SceneAction::EnterHeightDiagram,
            SceneAction::ReturnToOverview,
            SceneAction::EnterMap,
            SceneAction::ReturnToOverview,
        ];
        for action in actions {
            scenes.handle(action).unwrap();
            assert_eq!(scenes.map_host(), scenes.current());
        }
    }

    #[test]
    fn test_invalid_actions_are_noops() {
        let mut scenes = SceneCoordinator::new();
        // Return from overview does nothing
        assert!(scenes.handle(SceneAction::ReturnToOverview).is_none());
        assert_eq!(scenes.current(), Scene::Overview);

        // Entering a second fullscreen view from fullscreen does nothing
        scenes.handle(SceneAction::EnterMap).unwrap();
        assert!(scenes.handle(SceneAction::EnterSpeedDiagram).is_none());
        assert_eq!(scenes.current(), Scene::MapFullscreen);
    }
}
