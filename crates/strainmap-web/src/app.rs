//! Bevy application setup

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};
use strainmap_core::StrainConfig;
use strainmap_scene::StrainScenePlugin;

use crate::form_bridge::FormBridgePlugin;

/// Run the Bevy application
pub fn run(config: StrainConfig) {
    App::new()
        .insert_resource(ClearColor(Color::srgb_u8(0xf0, 0xf2, 0xf5))) // Matches the host page background
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Strainmap - Body Strain Check".to_string(),
                        canvas: Some("#strainmap-canvas".to_string()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Model paths are relative to the page
                    file_path: "".to_string(),
                    // Don't look for .meta files - static hosting doesn't have them
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // DefaultPickingPlugins and MeshPickingPlugin must be added BEFORE EguiPlugin
        // so it can detect PickingPlugin; MeshPickingPlugin also provides MeshRayCast
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .add_plugins(StrainScenePlugin { config })
        .add_plugins(FormBridgePlugin)
        .run();
}
