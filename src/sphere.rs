//! Sphere primitive for ray tracing.
//!
//! Implements ray-sphere intersection using the half-b quadratic form.

use glam::Vec3A;

use crate::hittable::{HitRecord, Hittable};
use crate::interval::Interval;
use crate::ray::Ray;

/// Discriminants below this count as a miss (grazing or degenerate ray).
const DISCRIMINANT_EPSILON: f32 = 1e-12;

/// Sphere primitive defined by center, signed radius, and material index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Index into the scene's material list.
    pub material_index: usize,

    /// Center point of the sphere in world coordinates.
    pub center: Vec3A,

    /// Signed radius.
    ///
    /// The surface is the same for `r` and `-r`, but the reported normal is
    /// `(p - center) / radius`, so a negative radius yields inward-facing
    /// normals. Nested inside a glass sphere this gives a hollow glass shell.
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere. Negative radii are kept as given.
    pub fn new(center: Vec3A, radius: f32, material_index: usize) -> Self {
        Self {
            material_index,
            center,
            radius,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord> {
        // Vector from ray origin to sphere center
        let oc = self.center - r.origin;

        let a = r.direction.length_squared();
        let h = r.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if a < DISCRIMINANT_EPSILON || discriminant < DISCRIMINANT_EPSILON {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root that lies in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = r.at(root);
        Some(HitRecord {
            t: root,
            p,
            normal: (p - self.center) / self.radius,
            material_index: self.material_index,
        })
    }
}
