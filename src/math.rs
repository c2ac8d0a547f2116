//! Vector helpers shared by the camera, intersection and material code.
//!
//! `glam::Vec3A` is the three-component vector for positions, directions and
//! colors alike. The functions here add the optics the kernel needs on top of
//! glam's dot/cross/length, each guarded so degenerate input yields a finite
//! fallback instead of NaN.

use glam::Vec3A;

/// RGB color type using Vec3A for SIMD optimization.
///
/// Linear radiance, not clamped; quantization is the host's job.
pub type Color = Vec3A;

/// Squared lengths below this are treated as zero.
pub const DEGENERATE_EPSILON: f32 = 1e-8;

/// Linear interpolation `a + (b - a) * t`.
#[inline]
pub fn lerp(a: Vec3A, b: Vec3A, t: f32) -> Vec3A {
    a + (b - a) * t
}

/// True when every component is close enough to zero to be unusable as a direction.
#[inline]
pub fn near_zero(v: Vec3A) -> bool {
    v.length_squared() < DEGENERATE_EPSILON
}

/// Normalize `v`, returning `fallback` when `v` has (nearly) zero length.
#[inline]
pub fn safe_normalize(v: Vec3A, fallback: Vec3A) -> Vec3A {
    let len_sq = v.length_squared();
    if len_sq < DEGENERATE_EPSILON {
        fallback
    } else {
        v / len_sq.sqrt()
    }
}

/// Reflect `v` about the surface normal `n`.
#[inline]
pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

/// Refract unit vector `uv` through a surface with unit normal `n` facing it.
///
/// `eta` is the ratio of refraction indices (incident over transmitted).
/// Returns `None` on total internal reflection, when Snell's discriminant is
/// not positive.
#[inline]
pub fn refract(uv: Vec3A, n: Vec3A, eta: f32) -> Option<Vec3A> {
    let dt = uv.dot(n);
    let discriminant = 1.0 - eta * eta * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(eta * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Fresnel reflectance by Schlick's approximation.
#[inline]
pub fn schlick(cosine: f32, refraction_index: f32) -> f32 {
    let r0 = (1.0 - refraction_index) / (1.0 + refraction_index);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine.clamp(0.0, 1.0)).powi(5)
}
