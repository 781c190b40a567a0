//! Figure spawning: the procedural body, or an imported glTF with fallback

use bevy::asset::LoadState;
use bevy::prelude::*;
use strainmap_core::{Body, BodyRegion, NodeKind, SegmentKey, Shape, SurfaceKind};

use crate::types::*;

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FigureState>()
            .init_resource::<PartMaterials>()
            .add_systems(Startup, start_figure)
            .add_systems(Update, (poll_model_load, tag_imported_parts).chain());
    }
}

/// Spawn the procedural body right away, or start loading the configured model
fn start_figure(
    mut commands: Commands,
    settings: Res<StrainSettings>,
    asset_server: Res<AssetServer>,
    session: Res<SessionResource>,
    mut state: ResMut<FigureState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut part_materials: ResMut<PartMaterials>,
) {
    match &settings.figure.model_path {
        Some(path) => {
            tracing::info!("Starting to load figure model: {}", path);
            let handle: Handle<Gltf> = asset_server.load(path.clone());
            *state = FigureState::Loading(handle);
        }
        None => {
            spawn_procedural_body(&mut commands, session.body(), &mut meshes, &mut materials, &mut part_materials);
            *state = FigureState::Procedural;
        }
    }
}

/// Check loading state and spawn the model's scene, falling back on failure
fn poll_model_load(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    session: Res<SessionResource>,
    mut state: ResMut<FigureState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut part_materials: ResMut<PartMaterials>,
) {
    let FigureState::Loading(handle) = &*state else {
        return;
    };

    // Use the first scene if there is no default
    let scene = gltf_assets
        .get(handle)
        .and_then(|gltf| gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()));

    match model_load_outcome(asset_server.get_load_state(handle.id()).as_ref(), scene) {
        ModelLoad::Pending => {}
        ModelLoad::Spawn(scene_handle) => {
            tracing::info!("Figure model loaded");
            commands.spawn((
                SceneRoot(scene_handle),
                Transform::default(),
                Visibility::default(),
                FigureRoot,
                Name::new("Figure"),
            ));
            *state = FigureState::Imported;
        }
        ModelLoad::Fallback => {
            spawn_procedural_body(&mut commands, session.body(), &mut meshes, &mut materials, &mut part_materials);
            *state = FigureState::Procedural;
        }
    }
}

/// Next step for a figure model that is being loaded
#[derive(Debug, Clone, PartialEq)]
pub enum ModelLoad {
    /// Still loading
    Pending,
    /// Loaded, spawn this scene
    Spawn(Handle<Scene>),
    /// Missing, invalid or empty, use the procedural body
    Fallback,
}

/// Decide what a model load has come to
pub fn model_load_outcome(load_state: Option<&LoadState>, scene: Option<Handle<Scene>>) -> ModelLoad {
    match load_state {
        Some(LoadState::Loaded) => match scene {
            Some(scene) => ModelLoad::Spawn(scene),
            None => {
                tracing::warn!("Figure model has no scenes, using procedural body");
                ModelLoad::Fallback
            }
        },
        Some(LoadState::Failed(err)) => {
            tracing::warn!("Failed to load figure model, using procedural body: {}", err);
            ModelLoad::Fallback
        }
        _ => ModelLoad::Pending,
    }
}

/// First classifiable name on the walk from a mesh up to the figure root
pub fn part_label<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<String> {
    names
        .into_iter()
        .find(|name| BodyRegion::from_label(name).is_some())
        .map(str::to_string)
}
/// Spawn one entity per body node, each segment with its own material
pub fn spawn_procedural_body(
    commands: &mut Commands,
    body: &Body,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    part_materials: &mut PartMaterials,
) {
    let palette = body.palette();
    // Parents always precede children, so their entities exist already
    let mut entities: Vec<Entity> = Vec::with_capacity(body.len());

    for (id, node) in body.nodes() {
        let mut entity = commands.spawn((
            Transform::from_translation(node.translation),
            Visibility::default(),
            Name::new(node.label.clone()),
        ));

        match &node.kind {
            NodeKind::Group => {
                if node.parent.is_none() {
                    entity.insert(FigureRoot);
                }
            }
            NodeKind::Segment(segment) => {
                let def = palette.get(segment.surface);
                let material = materials.add(StandardMaterial {
                    base_color: to_color(def.base_color),
                    perceptual_roughness: def.roughness,
                    metallic: def.metalness,
                    emissive: to_emissive(segment.emissive),
                    ..default()
                });
                part_materials.handles.insert(SegmentKey::Node(id), material.clone());

                entity.insert((
                    Mesh3d(meshes.add(segment_mesh(&segment.shape, segment.surface))),
                    MeshMaterial3d(material),
                    BodySegment { node: id },
                ));
            }
        }

        let child = entity.id();
        if let Some(parent) = node.parent.and_then(|p| entities.get(p.0)) {
            commands.entity(*parent).add_child(child);
        }
        entities.push(child);
    }

    tracing::info!(
        "Spawned procedural body: {} segments",
        body.segments().count()
    );
}

fn segment_mesh(shape: &Shape, surface: SurfaceKind) -> Mesh {
    match *shape {
        Shape::Box { size } => Cuboid::new(size.x, size.y, size.z).into(),
        Shape::Sphere { radius } => {
            // Eyes are tiny, keep them cheap
            let (sectors, stacks) = if surface == SurfaceKind::Eye { (8, 8) } else { (16, 16) };
            Sphere::new(radius).mesh().uv(sectors, stacks)
        }
        Shape::Cylinder {
            radius_top,
            radius_bottom,
            height,
        } => ConicalFrustum {
            radius_top,
            radius_bottom,
            height,
        }
        .mesh()
        .resolution(12)
        .build(),
    }
}

/// Tag every mesh under an imported figure.
///
/// The label is the first name, walking from the mesh up to the figure root,
/// that classifies to a region. Classified parts get their own material copy
/// so a flash only touches that part.
fn tag_imported_parts(
    mut commands: Commands,
    state: Res<FigureState>,
    untagged: Query<(Entity, Option<&MeshMaterial3d<StandardMaterial>>), (With<Mesh3d>, Without<ImportedPart>, Without<BodySegment>)>,
    parents: Query<&ChildOf>,
    names: Query<&Name>,
    roots: Query<(), With<FigureRoot>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut part_materials: ResMut<PartMaterials>,
) {
    if *state != FigureState::Imported {
        return;
    }

    for (entity, material) in untagged.iter() {
        let mut under_figure = false;
        let mut chain: Vec<&str> = Vec::new();
        let mut current = Some(entity);

        while let Some(e) = current {
            if let Ok(name) = names.get(e) {
                chain.push(name.as_str());
            }
            if roots.contains(e) {
                under_figure = true;
                break;
            }
            current = parents.get(e).ok().map(ChildOf::parent);
        }

        if !under_figure {
            continue;
        }
        let label = part_label(chain);

        let key = entity.to_bits();
        if label.is_some() {
            if let Some(original) = material.and_then(|m| materials.get(&m.0)).cloned() {
                let handle = materials.add(original);
                part_materials.handles.insert(SegmentKey::External(key), handle.clone());
                commands.entity(entity).insert(MeshMaterial3d(handle));
            } else {
                tracing::warn!("Imported part {:?} has no StandardMaterial, it will not flash", label);
            }
        }

        tracing::debug!(?label, "Tagged imported part");
        commands.entity(entity).insert(ImportedPart { key, label });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::io::AssetReaderError;
    use bevy::asset::AssetLoadError;
    use std::sync::Arc;

    #[test]
    fn test_missing_model_falls_back() {
        let err = AssetLoadError::from(AssetReaderError::NotFound("models/human.glb".into()));
        let failed = LoadState::Failed(Arc::new(err));
        assert_eq!(model_load_outcome(Some(&failed), None), ModelLoad::Fallback);
    }

    #[test]
    fn test_model_without_scenes_falls_back() {
        assert_eq!(model_load_outcome(Some(&LoadState::Loaded), None), ModelLoad::Fallback);
    }

    #[test]
    fn test_loaded_model_spawns_scene() {
        let scene: Handle<Scene> = Handle::default();
        assert_eq!(
            model_load_outcome(Some(&LoadState::Loaded), Some(scene.clone())),
            ModelLoad::Spawn(scene)
        );
    }

    #[test]
    fn test_model_still_loading() {
        assert_eq!(model_load_outcome(Some(&LoadState::Loading), None), ModelLoad::Pending);
        assert_eq!(model_load_outcome(None, None), ModelLoad::Pending);
        // Picking waits for the figure
        assert!(!FigureState::Loading(Handle::default()).is_ready());
    }

    #[test]
    fn test_part_label_takes_nearest_classifiable_name() {
        assert_eq!(part_label(["Mesh.012", "LeftEye", "Head", "Figure"]).as_deref(), Some("LeftEye"));
        assert_eq!(part_label(["Cube", "Spine_Back", "Armature"]).as_deref(), Some("Spine_Back"));
        assert_eq!(part_label(["Cube", "Scene_Root", "Figure"]), None);
        assert_eq!(part_label(std::iter::empty()), None);
    }
}
