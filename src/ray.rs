//! Ray segment used for one bounce of the integrator.

use glam::Vec3A;

/// Semi-infinite line `r(t) = origin + t * direction`.
///
/// The direction is kept as produced by its source (camera or material) and
/// is not normalized here; sphere intersection divides by `|direction|²` and
/// the materials normalize where they need a unit vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// World-space start point.
    pub origin: Vec3A,
    /// Travel direction, arbitrary non-zero length.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a ray from an origin and a direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self { origin, direction }
    }

    /// Point reached at parameter `t`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_scales_unnormalized_direction() {
        let ray = Ray::new(Vec3A::new(1.0, 0.0, 0.0), Vec3A::new(0.0, 0.0, -2.0));
        assert_eq!(ray.at(0.0), ray.origin);
        assert_eq!(ray.at(1.5), Vec3A::new(1.0, 0.0, -3.0));
    }
}
