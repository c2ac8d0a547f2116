//! Ray-object intersection system.
//!
//! Defines the Hittable trait for geometric primitives and HitRecord for
//! storing intersection data. The scene is a flat slice of spheres scanned
//! linearly for the nearest hit.

use glam::Vec3A;

use crate::interval::Interval;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Ray-object intersection information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point where the ray intersects the object
    pub p: Vec3A,
    /// Geometric unit normal. Points outward for positive radii and inward
    /// for negative ones; materials orient it themselves.
    pub normal: Vec3A,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Material of the object at the hit point
    pub material_index: usize,
}

/// Trait for objects that can be intersected by rays.
///
/// Must be thread-safe (Sync + Send) for parallel rendering.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection strictly inside `ray_t`.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord>;
}

impl Hittable for [Sphere] {
    /// Nearest hit across all spheres.
    ///
    /// Each sphere is tested against the range shrunk to the closest hit so
    /// far, so a later sphere only wins with a strictly smaller `t`.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for sphere in self {
            if let Some(rec) = sphere.hit(r, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}

impl Hittable for Vec<Sphere> {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.as_slice().hit(r, ray_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray() -> Ray {
        Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn empty_list_never_hits() {
        let spheres: Vec<Sphere> = Vec::new();
        assert!(spheres.hit(&ray(), Interval::HIT_RANGE).is_none());
    }

    #[test]
    fn nearest_hit_independent_of_order() {
        let near = Sphere::new(Vec3A::new(0.0, 0.0, -2.0), 0.5, 1);
        let far = Sphere::new(Vec3A::new(0.0, 0.0, -6.0), 0.5, 2);

        let forward = vec![near, far];
        let backward = vec![far, near];
        let a = forward.hit(&ray(), Interval::HIT_RANGE).unwrap();
        let b = backward.hit(&ray(), Interval::HIT_RANGE).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.material_index, 1);
        assert!((a.t - 1.5).abs() < 1e-6);
    }

    #[test]
    fn moving_another_sphere_further_away_keeps_result() {
        let near = Sphere::new(Vec3A::new(0.0, 0.0, -2.0), 0.5, 1);
        let baseline = vec![near, Sphere::new(Vec3A::new(0.0, 0.0, -4.0), 0.5, 2)];
        let expected = baseline.hit(&ray(), Interval::HIT_RANGE).unwrap();

        for distance in [5.0, 10.0, 100.0, 1000.0] {
            let moved = vec![near, Sphere::new(Vec3A::new(0.0, 0.0, -distance), 0.5, 2)];
            assert_eq!(moved.hit(&ray(), Interval::HIT_RANGE), Some(expected));
        }
    }

    #[test]
    fn overlapping_spheres_pick_smallest_t() {
        let big = Sphere::new(Vec3A::new(0.0, 0.0, -3.0), 2.0, 0);
        let small = Sphere::new(Vec3A::new(0.0, 0.0, -1.2), 0.1, 1);
        let rec = [big, small].hit(&ray(), Interval::HIT_RANGE).unwrap();
        assert_eq!(rec.material_index, 0);
        assert!((rec.t - 1.0).abs() < 1e-6);
    }
}
