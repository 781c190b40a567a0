//! Feedback expiry and emissive highlight sync

use bevy::prelude::*;

use crate::types::*;
use crate::StrainSet;

pub struct HighlightPlugin;

impl Plugin for HighlightPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (tick_session, apply_emissive_changes).chain().in_set(StrainSet::Feedback),
        );
    }
}

/// Expire highlights, pulses and toasts against the frame clock
fn tick_session(mut session: ResMut<SessionResource>, time: Res<Time>) {
    session.tick(time.elapsed());
}

/// Write the session's emissive changes onto each part's own material
fn apply_emissive_changes(
    mut session: ResMut<SessionResource>,
    mut part_materials: ResMut<PartMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (key, color) in session.take_emissive_changes() {
        // A change for a part that is no longer flashing is its restore
        let emissive = part_materials.resolve_emissive(key, color, !session.is_highlighted(key));
        let Some(handle) = part_materials.handles.get(&key) else {
            tracing::debug!(?key, "No material for highlighted part");
            continue;
        };
        if let Some(material) = materials.get_mut(handle) {
            material.emissive = emissive;
        }
    }
}
