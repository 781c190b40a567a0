//! Pointer to ray conversion and body hit testing

use glam::{Mat4, Vec2, Vec3};

use crate::body::{Body, Hit};
use crate::geometry::Ray;

/// Drawing surface rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge of the surface in pointer coordinates
    pub x: f32,
    /// Top edge of the surface in pointer coordinates
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::sized(1920.0, 1080.0)
    }
}

impl Viewport {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Pointer pixels to normalized device coordinates, Y up.
    ///
    /// Returns `None` while the surface has no area (e.g. collapsed canvas).
    pub fn to_ndc(&self, pointer: Vec2) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            (pointer.x - self.x) / self.width * 2.0 - 1.0,
            -((pointer.y - self.y) / self.height) * 2.0 + 1.0,
        ))
    }
}

/// Perspective camera pose and lens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveView {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveView {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    /// Ray from the eye through a point in normalized device coordinates
    pub fn ray_through_ndc(&self, ndc: Vec2, aspect: f32) -> Option<Ray> {
        let clip_to_world = (self.projection_matrix(aspect) * self.view_matrix()).inverse();
        // glam's perspective_rh maps the far plane to depth 1
        let far = clip_to_world.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::towards(self.eye, far)
    }
}

/// Find the body segment under a pointer position.
///
/// Every segment below the root is tested, nested children included; the hit
/// with the smallest ray parameter wins.
pub fn hit_test(body: &Body, view: &PerspectiveView, viewport: &Viewport, pointer: Vec2) -> Option<Hit> {
    let ndc = viewport.to_ndc(pointer)?;
    let ray = view.ray_through_ndc(ndc, viewport.aspect())?;
    body.hit_test(&ray)
}
