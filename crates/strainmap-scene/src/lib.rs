//! Strainmap Scene - Bevy rendering, picking and overlay for the body viewer
//!
//! Every plugin here reads and writes the shared [`SessionResource`]; the
//! session owns the state and these systems only translate between it and
//! bevy entities, materials, input and egui.

pub mod camera;
pub mod highlight;
pub mod models;
pub mod picking;
pub mod scene;
pub mod types;
pub mod ui;

use bevy::prelude::*;
use strainmap_core::{build_body, Session, StrainConfig};

/// Frame ordering of the viewer systems
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum StrainSet {
    /// Viewport tracking and orbit input
    Camera,
    /// Pointer presses into the session
    Press,
    /// Expiry and material writes
    Feedback,
}

/// Plugin that sets up the body viewer
pub struct StrainScenePlugin {
    pub config: StrainConfig,
}

impl Plugin for StrainScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SessionResource(Session::new(build_body(), &self.config)))
            .insert_resource(StrainSettings(self.config.clone()))
            .configure_sets(
                Update,
                (StrainSet::Camera, StrainSet::Press, StrainSet::Feedback).chain(),
            )
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(picking::PickingPlugin)
            .add_plugins(highlight::HighlightPlugin)
            .add_plugins(ui::UiPlugin);
    }
}

// Re-export commonly used types
pub use types::*;
