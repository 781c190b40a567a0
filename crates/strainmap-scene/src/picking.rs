//! Pointer presses on the figure
//!
//! The procedural body is hit-tested analytically by the session. Imported
//! figures are ray cast against their meshes, using the same session camera
//! ray so both paths agree with what is on screen.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;
use bevy_picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use strainmap_core::{PressOutcome, SegmentKey};

use crate::types::*;
use crate::StrainSet;

pub struct PickingPlugin;

impl Plugin for PickingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, handle_press.in_set(StrainSet::Press));
    }
}

/// Pointer position of a left press or touch start this frame
fn press_position(
    mouse_button: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    window: Option<&Window>,
) -> Option<Vec2> {
    if let Some(touch) = touch_input.iter_just_pressed().next() {
        return Some(touch.position());
    }
    if mouse_button.just_pressed(MouseButton::Left) {
        return window.and_then(Window::cursor_position);
    }
    None
}

fn handle_press(
    mut session: ResMut<SessionResource>,
    state: Res<FigureState>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut contexts: EguiContexts,
    mut ray_cast: MeshRayCast,
    parts: Query<&ImportedPart>,
    mut part_materials: ResMut<PartMaterials>,
    materials: Res<Assets<StandardMaterial>>,
    time: Res<Time>,
) {
    if !state.is_ready() {
        return;
    }

    let Some(pointer) = press_position(&mouse_button, &touch_input, windows.single().ok()) else {
        return;
    };

    // Presses on the overlay belong to egui
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);
    if egui_wants_pointer {
        return;
    }

    let now = time.elapsed();
    let outcome = match *state {
        FigureState::Procedural => session.press(pointer, now),
        FigureState::Imported => {
            let Some(ray) = session.pointer_ray(pointer) else {
                return;
            };
            let Ok(direction) = Dir3::new(ray.direction) else {
                return;
            };

            let filter = |entity: Entity| parts.contains(entity);
            let settings = MeshRayCastSettings::default().with_filter(&filter);
            let Some(&(entity, _)) = ray_cast.cast_ray(Ray3d::new(ray.origin, direction), &settings).first() else {
                return;
            };
            let Ok(part) = parts.get(entity) else {
                return;
            };
            let Some(label) = part.label.as_deref() else {
                tracing::debug!("Press on unclassified imported part");
                return;
            };

            let key = SegmentKey::External(part.key);
            let emissive = part_materials
                .handles
                .get(&key)
                .and_then(|handle| materials.get(handle))
                .map(|material| material.emissive)
                .unwrap_or(LinearRgba::BLACK);
            let already_flashing = session.is_highlighted(key);

            let outcome = session.press_external(part.key, label, from_emissive(emissive), now);
            if outcome.is_some() && !already_flashing {
                part_materials.save_original(key, emissive);
            }
            outcome
        }
        FigureState::Pending | FigureState::Loading(_) => None,
    };

    if let Some(PressOutcome { label, effect, .. }) = &outcome {
        tracing::debug!("Pressed {} -> {}", label, effect.message);
    }
}
