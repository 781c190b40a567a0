//! Primitive shapes and analytic ray intersection
//!
//! Segments are never rotated or scaled, so every test works on an
//! axis-aligned shape placed at a world-space center.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Rays closer to parallel than this are treated as missing a surface
const EPSILON: f32 = 1e-7;

/// Half-line `origin + t * direction`, `t >= 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. Returns `None` for a zero direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Ray from `origin` passing through `target`
    pub fn towards(origin: Vec3, target: Vec3) -> Option<Self> {
        Self::new(origin, target - origin)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Segment geometry, centered on the segment's origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box with full edge lengths
    Box { size: Vec3 },
    /// Cylinder along +Y; tapered when the radii differ
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
    Sphere { radius: f32 },
}

impl Shape {
    pub fn cuboid(x: f32, y: f32, z: f32) -> Self {
        Shape::Box { size: Vec3::new(x, y, z) }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32) -> Self {
        Shape::Cylinder {
            radius_top,
            radius_bottom,
            height,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere { radius }
    }

    /// Nearest non-negative ray parameter where the ray meets the surface
    pub fn intersect(&self, center: Vec3, ray: &Ray) -> Option<f32> {
        // Work in shape-local coordinates
        let origin = ray.origin - center;
        let dir = ray.direction;

        match *self {
            Shape::Sphere { radius } => intersect_sphere(origin, dir, radius),
            Shape::Box { size } => intersect_box(origin, dir, size * 0.5),
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => intersect_frustum(origin, dir, radius_top, radius_bottom, height),
        }
    }
}

fn smallest_non_negative(candidates: impl IntoIterator<Item = f32>) -> Option<f32> {
    candidates
        .into_iter()
        .filter(|t| t.is_finite() && *t >= 0.0)
        .min_by(|a, b| a.total_cmp(b))
}

fn intersect_sphere(origin: Vec3, dir: Vec3, radius: f32) -> Option<f32> {
    // |o + t d|^2 = r^2 with |d| = 1
    let b = origin.dot(dir);
    let c = origin.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    smallest_non_negative([-b - sq, -b + sq])
}

fn intersect_box(origin: Vec3, dir: Vec3, half: Vec3) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let h = half[axis];

        if d.abs() < EPSILON {
            // Parallel to this slab: must already be inside it
            if o < -h || o > h {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (-h - o) * inv;
        let mut t1 = (h - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }

    smallest_non_negative([t_min, t_max])
}

fn intersect_frustum(
    origin: Vec3,
    dir: Vec3,
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
) -> Option<f32> {
    let half_h = height * 0.5;
    if half_h <= 0.0 {
        return None;
    }

    // Radius varies linearly along Y: r(y) = r_mid + k * y
    let k = (radius_top - radius_bottom) / height;
    let r_mid = (radius_top + radius_bottom) * 0.5;
    let radius_at = |y: f32| r_mid + k * y;

    let mut hits: Vec<f32> = Vec::with_capacity(4);

    // Lateral surface: x^2 + z^2 = (r_mid + k (oy + t dy))^2
    let r0 = r_mid + k * origin.y;
    let a = dir.x * dir.x + dir.z * dir.z - k * k * dir.y * dir.y;
    let b = 2.0 * (origin.x * dir.x + origin.z * dir.z - k * r0 * dir.y);
    let c = origin.x * origin.x + origin.z * origin.z - r0 * r0;

    let mut side = |t: f32| {
        let y = origin.y + t * dir.y;
        // Reject the mirrored nappe of the cone and anything past the caps
        if y.abs() <= half_h && radius_at(y) >= 0.0 {
            hits.push(t);
        }
    };

    if a.abs() < EPSILON {
        if b.abs() >= EPSILON {
            side(-c / b);
        }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            side((-b - sq) / (2.0 * a));
            side((-b + sq) / (2.0 * a));
        }
    }

    // End caps
    if dir.y.abs() >= EPSILON {
        for (cap_y, cap_r) in [(half_h, radius_top), (-half_h, radius_bottom)] {
            let t = (cap_y - origin.y) / dir.y;
            let x = origin.x + t * dir.x;
            let z = origin.z + t * dir.z;
            if x * x + z * z <= cap_r * cap_r {
                hits.push(t);
            }
        }
    }

    smallest_non_negative(hits)
}
