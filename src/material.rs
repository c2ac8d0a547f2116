//! Material system for ray tracing.
//!
//! Implements three material types: Lambertian (diffuse), Metal (specular),
//! and Dielectric (transparent). Scattering is a closed `match` over the enum;
//! unknown kinds are rejected when the scene is loaded, never per bounce.

use glam::Vec3A;
use rand::Rng;

use crate::hittable::HitRecord;
use crate::math::{self, Color};
use crate::random;
use crate::ray::Ray;

/// Host-side kind tag of a Lambertian material.
pub const KIND_LAMBERTIAN: i32 = 0;
/// Host-side kind tag of a Metal material.
pub const KIND_METAL: i32 = 1;
/// Host-side kind tag of a Dielectric material.
pub const KIND_DIELECTRIC: i32 = 2;

/// Surface material, referenced from spheres by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Lambertian diffuse material for matte surfaces.
    Lambertian {
        /// Surface color/reflectance.
        albedo: Color,
    },

    /// Metallic material with specular reflection.
    Metal {
        /// Metal color.
        albedo: Color,
        /// Reflection perturbation radius, expected in [0, 1] (0.0 = mirror).
        fuzziness: f32,
    },

    /// Dielectric (transparent) material with refraction.
    Dielectric {
        /// Index of refraction (1.0 = air, 1.5 = glass, etc.).
        refraction_index: f32,
    },
}

/// Outcome of a scattering event that did not absorb the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Continuation ray leaving the hit point.
    pub ray: Ray,
    /// Per-channel throughput multiplier.
    pub attenuation: Color,
}

impl Material {
    /// Host-side integer tag for this kind.
    pub fn kind_tag(&self) -> i32 {
        match self {
            Material::Lambertian { .. } => KIND_LAMBERTIAN,
            Material::Metal { .. } => KIND_METAL,
            Material::Dielectric { .. } => KIND_DIELECTRIC,
        }
    }

    /// Compute ray scattering for this material.
    ///
    /// Returns `None` when the path is absorbed.
    pub fn scatter<R: Rng + ?Sized>(&self, r_in: &Ray, rec: &HitRecord, rng: &mut R) -> Option<Scatter> {
        match *self {
            Material::Lambertian { albedo } => Some(scatter_lambertian(albedo, rec, rng)),
            Material::Metal { albedo, fuzziness } => scatter_metal(albedo, fuzziness, r_in, rec, rng),
            Material::Dielectric { refraction_index } => {
                Some(scatter_dielectric(refraction_index, r_in, rec, rng))
            }
        }
    }
}

/// Lambertian diffuse scattering with cosine-weighted distribution.
fn scatter_lambertian<R: Rng + ?Sized>(albedo: Color, rec: &HitRecord, rng: &mut R) -> Scatter {
    let scatter_direction = rec.normal + random::random_unit_vector(rng);

    // Opposite unit vector cancels the normal
    let scatter_direction = if math::near_zero(scatter_direction) {
        rec.normal
    } else {
        scatter_direction
    };

    Scatter {
        ray: Ray::new(rec.p, scatter_direction),
        attenuation: albedo,
    }
}

/// Metallic reflection with optional surface roughness.
fn scatter_metal<R: Rng + ?Sized>(
    albedo: Color,
    fuzziness: f32,
    r_in: &Ray,
    rec: &HitRecord,
    rng: &mut R,
) -> Option<Scatter> {
    let unit_direction = math::safe_normalize(r_in.direction, -rec.normal);
    let reflected = math::reflect(unit_direction, rec.normal)
        + fuzziness * random::random_unit_vector(rng);

    // Fuzz pushed the reflection below the surface
    if reflected.dot(rec.normal) <= 0.0 {
        return None;
    }

    Some(Scatter {
        ray: Ray::new(rec.p, reflected),
        attenuation: albedo,
    })
}

/// Dielectric scattering with reflection and refraction using Schlick's Fresnel term.
fn scatter_dielectric<R: Rng + ?Sized>(
    refraction_index: f32,
    r_in: &Ray,
    rec: &HitRecord,
    rng: &mut R,
) -> Scatter {
    let (normal, eta) = dielectric_orientation(r_in.direction, rec.normal, refraction_index);

    let unit_direction = math::safe_normalize(r_in.direction, -normal);
    let cos_theta = (-unit_direction).dot(normal).min(1.0);

    let direction = match math::refract(unit_direction, normal, eta) {
        Some(refracted) if math::schlick(cos_theta, refraction_index) <= random::random_f32(rng) => refracted,
        _ => math::reflect(unit_direction, normal),
    };

    Scatter {
        ray: Ray::new(rec.p, direction),
        attenuation: Vec3A::ONE,
    }
}

/// Orient a dielectric surface against the incoming direction.
///
/// Returns the normal facing the incoming ray and the index ratio to use.
/// A ray travelling along the geometric normal is leaving the medium, so the
/// normal is flipped and the ratio is `refraction_index`; otherwise it is
/// entering with ratio `1 / refraction_index`. Spheres with negative radius
/// report inward normals, which swaps the two cases and makes them hollow.
pub fn dielectric_orientation(direction: Vec3A, normal: Vec3A, refraction_index: f32) -> (Vec3A, f32) {
    if direction.dot(normal) > 0.0 {
        (-normal, refraction_index)
    } else {
        (normal, 1.0 / refraction_index)
    }
}
