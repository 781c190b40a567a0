//! Camera controls and orbit navigation

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::{SessionResource, StrainSet};

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Pixel-unit scroll deltas per wheel line
const PIXELS_PER_LINE: f32 = 100.0;

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(
                Update,
                (track_viewport, update_camera).chain().in_set(StrainSet::Camera),
            );
    }
}

fn spawn_camera(mut commands: Commands, session: Res<SessionResource>) {
    let lens = session.lens();
    let camera = session.camera();

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: lens.fov_y,
            near: lens.near,
            far: lens.far,
            ..default()
        }),
        Transform::from_translation(camera.eye()).looking_at(camera.focus, Vec3::Y),
        // Ambient fill
        AmbientLight {
            color: Color::WHITE,
            brightness: 600.0,
            ..default()
        },
        MainCamera,
    ));
}

/// Keep the session viewport in step with the window, in logical pixels
fn track_viewport(windows: Query<&Window, With<PrimaryWindow>>, mut session: ResMut<SessionResource>) {
    if let Ok(window) = windows.single() {
        session.resize(window.width(), window.height());
    }
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut session: ResMut<SessionResource>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    time: Res<Time>,
    mut contexts: EguiContexts,
) {
    // Don't steer the camera while the pointer is over the overlay
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let camera = session.camera_mut();

    if !egui_wants_pointer {
        let drag = mouse_motion.delta;

        // Orbit with left mouse drag
        if mouse_button.pressed(MouseButton::Left) && drag != Vec2::ZERO {
            camera.orbit(drag);
        }

        // Pan with right mouse drag
        if mouse_button.pressed(MouseButton::Right) && drag != Vec2::ZERO {
            camera.pan(drag);
        }

        let scroll = match mouse_scroll.unit {
            MouseScrollUnit::Line => mouse_scroll.delta.y,
            MouseScrollUnit::Pixel => mouse_scroll.delta.y / PIXELS_PER_LINE,
        };
        if scroll != 0.0 {
            camera.zoom(scroll);
        }

        // Single finger orbits
        if touch_input.iter().count() == 1 {
            for touch in touch_input.iter() {
                let delta = touch.delta();
                if delta != Vec2::ZERO {
                    camera.orbit(delta);
                }
            }
        }

        // Pinch to zoom
        let touches: Vec<_> = touch_input.iter().collect();
        if let [t1, t2] = touches.as_slice() {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            camera.dolly(prev_dist / curr_dist.max(1.0));
        }
    }

    camera.update(time.delta_secs());

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = camera.eye();
        transform.look_at(camera.focus, Vec3::Y);
    }
}
