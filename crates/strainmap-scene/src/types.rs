//! Shared resources, components and color conversions

use bevy::prelude::*;
use std::collections::HashMap;
use strainmap_core::{NodeId, Rgb, SegmentKey, Session, StrainConfig};

/// The per-page session, shared by every viewer system
#[derive(Resource, Deref, DerefMut)]
pub struct SessionResource(pub Session);

/// Configuration the viewer was started with
#[derive(Resource, Debug, Clone, Deref)]
pub struct StrainSettings(pub StrainConfig);

/// Which figure is on screen
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub enum FigureState {
    /// Nothing spawned yet
    #[default]
    Pending,
    /// Waiting on the glTF asset
    Loading(Handle<Gltf>),
    Procedural,
    Imported,
}

impl FigureState {
    /// Picking stays inert until a figure is in place
    pub fn is_ready(&self) -> bool {
        matches!(self, FigureState::Procedural | FigureState::Imported)
    }
}

/// Marker for the top entity of the figure
#[derive(Component)]
pub struct FigureRoot;

/// Mesh entity of a procedural body segment
#[derive(Component, Debug, Clone, Copy)]
pub struct BodySegment {
    pub node: NodeId,
}

/// Mesh entity under an imported figure
#[derive(Component, Debug, Clone)]
pub struct ImportedPart {
    pub key: u64,
    /// Nearest classifiable name on the mesh or its ancestors
    pub label: Option<String>,
}

/// Material instance owned by each highlightable part
#[derive(Resource, Default)]
pub struct PartMaterials {
    pub handles: HashMap<SegmentKey, Handle<StandardMaterial>>,
    /// Exact emissive of imported parts while they flash
    originals: HashMap<SegmentKey, LinearRgba>,
}

impl PartMaterials {
    /// Remember the emissive a part showed before its flash started
    pub fn save_original(&mut self, key: SegmentKey, emissive: LinearRgba) {
        self.originals.insert(key, emissive);
    }

    /// Emissive to write for a session change.
    ///
    /// A restore of a part with a saved original gets that exact value back,
    /// since packed colors cannot hold HDR or unquantized emissives.
    pub fn resolve_emissive(&mut self, key: SegmentKey, color: Rgb, restoring: bool) -> LinearRgba {
        if restoring {
            if let Some(original) = self.originals.remove(&key) {
                return original;
            }
        }
        to_emissive(color)
    }
}

/// Packed sRGB color to a bevy color
pub fn to_color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.bytes();
    Color::srgb_u8(r, g, b)
}

/// Packed sRGB color to the linear emissive a material expects
pub fn to_emissive(rgb: Rgb) -> LinearRgba {
    to_color(rgb).to_linear()
}

/// Emissive read back from a material, quantized to packed sRGB
pub fn from_emissive(emissive: LinearRgba) -> Rgb {
    let srgb = Srgba::from(emissive);
    Rgb::from_array([srgb.red, srgb.green, srgb.blue])
}
