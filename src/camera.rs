//! Thin-lens camera and primary ray generation.

use glam::{Vec2, Vec3A};
use rand::Rng;

use crate::random;
use crate::ray::Ray;

/// Inputs from which a [`Camera`] is derived each frame.
///
/// `up` must not be parallel to `origin - look_at`, and the field of view
/// and focus distance must be positive. These are preconditions; the camera
/// does not guard against them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Point camera is looking from (camera position)
    pub origin: Vec3A,
    /// Point camera is looking at (look target)
    pub look_at: Vec3A,
    /// Camera-relative "up" direction vector
    pub up: Vec3A,
    /// Vertical field of view in degrees
    pub vertical_fov_degrees: f32,
    /// Image width over height
    pub aspect_ratio: f32,
    /// Lens diameter; 0 gives a pinhole camera
    pub aperture: f32,
    /// Distance from the origin to the plane of perfect focus
    pub focus_distance: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            origin: Vec3A::ZERO,
            look_at: Vec3A::new(0.0, 0.0, -1.0),
            up: Vec3A::Y,
            vertical_fov_degrees: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_distance: 1.0,
        }
    }
}

/// Immutable per-frame camera snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub origin: Vec3A,
    /// Image-plane corner at `(s, t) = (0, 0)` on the focus plane
    pub lower_left_corner: Vec3A,
    /// Full image-plane width vector
    pub horizontal: Vec3A,
    /// Full image-plane height vector
    pub vertical: Vec3A,
    /// Camera frame basis vector pointing right
    pub u: Vec3A,
    /// Camera frame basis vector pointing up
    pub v: Vec3A,
    /// Camera frame basis vector pointing opposite view direction
    pub w: Vec3A,
    /// Half the aperture
    pub lens_radius: f32,
}

impl Camera {
    /// Derive the camera basis and image plane from `params`.
    pub fn new(params: &CameraParams) -> Self {
        let theta = params.vertical_fov_degrees.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = params.aspect_ratio * half_height;
        let focus = params.focus_distance;

        let w = (params.origin - params.look_at).normalize();
        let u = params.up.cross(w).normalize();
        let v = w.cross(u);

        Self {
            origin: params.origin,
            lower_left_corner: params.origin
                - half_width * focus * u
                - half_height * focus * v
                - focus * w,
            horizontal: 2.0 * half_width * focus * u,
            vertical: 2.0 * half_height * focus * v,
            u,
            v,
            w,
            lens_radius: params.aperture / 2.0,
        }
    }

    /// Ray through image-plane coordinates `(s, t)` in `[0, 1]²`.
    ///
    /// `lens` is a point in the unit disk; it is scaled by the lens radius,
    /// so with a zero radius every ray starts at the camera origin.
    #[inline]
    pub fn ray(&self, s: f32, t: f32, lens: Vec2) -> Ray {
        let rd = self.lens_radius * (lens.x * self.u + lens.y * self.v);
        let origin = self.origin + rd;
        let direction = self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin - rd;
        Ray::new(origin, direction)
    }

    /// Ray through `(s, t)` with a lens sample drawn from `rng`.
    #[inline]
    pub fn sample_ray<R: Rng + ?Sized>(&self, s: f32, t: f32, rng: &mut R) -> Ray {
        let lens = random::random_in_unit_disk(rng);
        self.ray(s, t, Vec2::new(lens.x, lens.y))
    }
}
