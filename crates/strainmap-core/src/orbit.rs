//! Damped orbit camera (Y up)
//!
//! Input moves goal values; `update` eases the live values toward them every
//! frame so drags, pans and zooms glide to a stop.

use glam::{Vec2, Vec3};

use crate::picking::PerspectiveView;

/// Elevation limit, just short of the poles
const MAX_ELEVATION: f32 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub distance: f32,
    pub target_distance: f32,
    pub azimuth: f32,
    pub target_azimuth: f32,
    pub elevation: f32,
    pub target_elevation: f32,
    /// Current orbit center
    pub focus: Vec3,
    /// Orbit center the camera is easing toward
    pub target_focus: Vec3,
    /// Radians per dragged pixel
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 1.5, 3.0), Vec3::new(0.0, 1.0, 0.0))
    }
}

impl OrbitCamera {
    /// Start at rest at `eye`, orbiting `target`
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(1e-3);
        let elevation = (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-MAX_ELEVATION, MAX_ELEVATION);
        let azimuth = offset.x.atan2(offset.z);

        Self {
            distance,
            target_distance: distance,
            azimuth,
            target_azimuth: azimuth,
            elevation,
            target_elevation: elevation,
            focus: target,
            target_focus: target,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            smooth_factor: 0.15,
            min_distance: 0.5,
            max_distance: 10.0,
        }
    }

    /// Rotate around the focus by a pointer drag in pixels
    pub fn orbit(&mut self, drag: Vec2) {
        self.target_azimuth -= drag.x * self.sensitivity;
        self.target_elevation =
            (self.target_elevation + drag.y * self.sensitivity).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Slide the focus in the camera's screen plane by a pointer drag in pixels
    pub fn pan(&mut self, drag: Vec2) {
        let forward = (self.focus - self.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        let speed = self.distance * 0.002;
        self.target_focus += (-right * drag.x + up * drag.y) * speed;
    }

    /// Scroll zoom; positive `scroll` moves closer
    pub fn zoom(&mut self, scroll: f32) {
        self.dolly(1.0 - scroll * self.zoom_speed * 0.3);
    }

    /// Scale the goal distance, e.g. by a pinch ratio
    pub fn dolly(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.target_distance = (self.target_distance * factor).clamp(self.min_distance, self.max_distance);
        }
    }

    /// Ease live values toward their goals
    pub fn update(&mut self, dt_secs: f32) {
        let lerp = 1.0 - (-self.smooth_factor * 60.0 * dt_secs).exp();
        self.distance += (self.target_distance - self.distance) * lerp;
        self.azimuth += (self.target_azimuth - self.azimuth) * lerp;
        self.elevation += (self.target_elevation - self.elevation) * lerp;
        self.focus += (self.target_focus - self.focus) * lerp;
    }

    /// Whether all live values have reached their goals
    pub fn is_settled(&self) -> bool {
        const EPS: f32 = 1e-4;
        (self.target_distance - self.distance).abs() < EPS
            && (self.target_azimuth - self.azimuth).abs() < EPS
            && (self.target_elevation - self.elevation).abs() < EPS
            && self.target_focus.distance(self.focus) < EPS
    }

    pub fn eye(&self) -> Vec3 {
        let horizontal = self.distance * self.elevation.cos();
        self.focus
            + Vec3::new(
                horizontal * self.azimuth.sin(),
                self.distance * self.elevation.sin(),
                horizontal * self.azimuth.cos(),
            )
    }

    pub fn view(&self, fov_y: f32, near: f32, far: f32) -> PerspectiveView {
        PerspectiveView {
            eye: self.eye(),
            target: self.focus,
            up: Vec3::Y,
            fov_y,
            near,
            far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looking_at_round_trips_eye() {
        let eye = Vec3::new(0.0, 1.5, 3.0);
        let camera = OrbitCamera::looking_at(eye, Vec3::new(0.0, 1.0, 0.0));
        assert!(camera.eye().distance(eye) < 1e-5);

        let eye = Vec3::new(-2.0, 0.5, 1.0);
        let camera = OrbitCamera::looking_at(eye, Vec3::ZERO);
        assert!(camera.eye().distance(eye) < 1e-5);
        assert!(camera.is_settled());
    }

    #[test]
    fn test_orbit_is_damped() {
        let mut camera = OrbitCamera::default();
        let start = camera.azimuth;
        camera.orbit(Vec2::new(100.0, 0.0));

        // Goal moves at once, live value only after updates
        assert!((camera.target_azimuth - (start - 0.5)).abs() < 1e-6);
        assert_eq!(camera.azimuth, start);

        camera.update(1.0 / 60.0);
        assert!(camera.azimuth < start && camera.azimuth > camera.target_azimuth);

        for _ in 0..600 {
            camera.update(1.0 / 60.0);
        }
        assert!(camera.is_settled());
    }

    #[test]
    fn test_elevation_clamped() {
        let mut camera = OrbitCamera::default();
        camera.orbit(Vec2::new(0.0, 10_000.0));
        assert_eq!(camera.target_elevation, MAX_ELEVATION);
        camera.orbit(Vec2::new(0.0, -100_000.0));
        assert_eq!(camera.target_elevation, -MAX_ELEVATION);
    }

    #[test]
    fn test_zoom_limits() {
        let mut camera = OrbitCamera::default();
        for _ in 0..200 {
            camera.zoom(5.0);
        }
        assert_eq!(camera.target_distance, camera.min_distance);
        for _ in 0..200 {
            camera.zoom(-5.0);
        }
        assert_eq!(camera.target_distance, camera.max_distance);
    }

    #[test]
    fn test_dolly_ignores_degenerate_factors() {
        let mut camera = OrbitCamera::default();
        let start = camera.target_distance;
        camera.dolly(0.0);
        camera.dolly(f32::NAN);
        assert_eq!(camera.target_distance, start);
        camera.dolly(0.5);
        assert!((camera.target_distance - start * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_pan_moves_focus_sideways() {
        let mut camera = OrbitCamera::default();
        let before = camera.target_focus;
        camera.pan(Vec2::new(50.0, 0.0));
        let moved = camera.target_focus - before;
        // Looking down -Z, horizontal drag slides along X only
        assert!(moved.x.abs() > 0.0);
        assert!(moved.y.abs() < 1e-6 && moved.z.abs() < 1e-6);
    }

    #[test]
    fn test_view_targets_focus() {
        let camera = OrbitCamera::default();
        let view = camera.view(0.8, 0.1, 100.0);
        assert_eq!(view.target, camera.focus);
        assert_eq!(view.up, Vec3::Y);
    }
}
