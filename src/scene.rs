//! Scene model: spheres and the materials they reference by index.
//!
//! A [`Scene`] is immutable while a frame renders and is replaced wholesale
//! by the host between frames. Construction validates every material index
//! once so the per-bounce lookups can index directly.
//!
//! [`RawSphere`] and [`RawMaterial`] are the flat `#[repr(C)]` records a host
//! keeps in its upload buffers; [`Scene::from_raw`] and [`Scene::to_raw`]
//! convert between the two forms.

use bytemuck::{Pod, Zeroable};
use glam::Vec3A;
use log::debug;
use rand::Rng;

use crate::error::SceneError;
use crate::hittable::{HitRecord, Hittable};
use crate::interval::Interval;
use crate::material::{Material, KIND_DIELECTRIC, KIND_LAMBERTIAN, KIND_METAL};
use crate::random;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Host-shared sphere record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RawSphere {
    /// Material index (signed on the host side)
    pub material: i32,
    /// Sphere center
    pub center: [f32; 3],
    /// Signed radius
    pub radius: f32,
}

/// Host-shared material record. Unused fields are ignored for each kind.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RawMaterial {
    /// 0 = Lambertian, 1 = Metal, 2 = Dielectric
    pub kind: i32,
    /// Albedo for Lambertian and Metal
    pub albedo: [f32; 3],
    /// Metal fuzziness
    pub fuzziness: f32,
    /// Dielectric refraction index
    pub refraction: f32,
}

impl From<&Material> for RawMaterial {
    fn from(material: &Material) -> Self {
        let kind = material.kind_tag();
        match *material {
            Material::Lambertian { albedo } => Self { kind, albedo: albedo.to_array(), fuzziness: 0.0, refraction: 0.0 },
            Material::Metal { albedo, fuzziness } => Self { kind, albedo: albedo.to_array(), fuzziness, refraction: 0.0 },
            Material::Dielectric { refraction_index } => Self { kind, albedo: [0.0; 3], fuzziness: 0.0, refraction: refraction_index },
        }
    }
}

impl RawMaterial {
    /// Decode the record, `index` is only used for the error message.
    fn decode(&self, index: usize) -> Result<Material, SceneError> {
        let albedo = Vec3A::from_array(self.albedo);
        match self.kind {
            KIND_LAMBERTIAN => Ok(Material::Lambertian { albedo }),
            KIND_METAL => Ok(Material::Metal { albedo, fuzziness: self.fuzziness }),
            KIND_DIELECTRIC => Ok(Material::Dielectric { refraction_index: self.refraction }),
            kind => Err(SceneError::UnknownMaterialKind { index, kind }),
        }
    }
}

/// Spheres plus the materials they reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    spheres: Vec<Sphere>,
    materials: Vec<Material>,
}

impl Scene {
    /// Build a scene, checking that every sphere's material index is in range.
    pub fn new(spheres: Vec<Sphere>, materials: Vec<Material>) -> Result<Self, SceneError> {
        if let Some((sphere, bad)) = spheres
            .iter()
            .enumerate()
            .find(|(_, s)| s.material_index >= materials.len())
        {
            return Err(SceneError::MaterialIndexOutOfRange {
                sphere,
                material: bad.material_index as i64,
                count: materials.len(),
            });
        }

        debug!("Scene loaded: {} spheres, {} materials", spheres.len(), materials.len());
        Ok(Self { spheres, materials })
    }

    /// Build a scene from host records, rejecting unknown material kinds and
    /// negative or out-of-range material indices.
    pub fn from_raw(spheres: &[RawSphere], materials: &[RawMaterial]) -> Result<Self, SceneError> {
        let materials = materials
            .iter()
            .enumerate()
            .map(|(index, raw)| raw.decode(index))
            .collect::<Result<Vec<_>, _>>()?;

        let spheres = spheres
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let material_index = usize::try_from(raw.material).map_err(|_| SceneError::MaterialIndexOutOfRange {
                    sphere: index,
                    material: raw.material as i64,
                    count: materials.len(),
                })?;
                Ok(Sphere::new(Vec3A::from_array(raw.center), raw.radius, material_index))
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        Self::new(spheres, materials)
    }

    /// Build a scene straight from the host's byte buffers.
    pub fn from_bytes(spheres: &[u8], materials: &[u8]) -> Result<Self, SceneError> {
        let spheres: &[RawSphere] = bytemuck::try_cast_slice(spheres).map_err(|e| SceneError::BufferLayout {
            what: "sphere",
            reason: e.to_string(),
        })?;
        let materials: &[RawMaterial] = bytemuck::try_cast_slice(materials).map_err(|e| SceneError::BufferLayout {
            what: "material",
            reason: e.to_string(),
        })?;
        Self::from_raw(spheres, materials)
    }

    /// Flatten into host records, the inverse of [`Scene::from_raw`].
    pub fn to_raw(&self) -> (Vec<RawSphere>, Vec<RawMaterial>) {
        let spheres = self
            .spheres
            .iter()
            .map(|s| RawSphere {
                material: s.material_index as i32,
                center: s.center.to_array(),
                radius: s.radius,
            })
            .collect();
        let materials = self.materials.iter().map(RawMaterial::from).collect();
        (spheres, materials)
    }

    /// All spheres in scan order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// All materials.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Material referenced by a hit. Indices were validated at load time.
    #[inline]
    pub fn material(&self, rec: &HitRecord) -> &Material {
        &self.materials[rec.material_index]
    }

    /// Single diffuse sphere of radius 0.5 at `(0, 0, -1)`.
    pub fn single_sphere() -> Self {
        Self {
            spheres: vec![Sphere::new(Vec3A::new(0.0, 0.0, -1.0), 0.5, 0)],
            materials: vec![Material::Lambertian { albedo: Vec3A::new(0.8, 0.3, 0.3) }],
        }
    }

    /// Ground, a diffuse sphere, a hollow glass sphere and a mirror.
    ///
    /// The glass sphere is built from two spheres at the same center: an
    /// outer one with radius 0.5 and an inner one with radius -0.45.
    pub fn showcase() -> Self {
        let spheres = vec![
            Sphere::new(Vec3A::new(0.0, -100.5, -1.0), 100.0, 0),
            Sphere::new(Vec3A::new(0.0, 0.0, -1.0), 0.5, 1),
            Sphere::new(Vec3A::new(-1.0, 0.0, -1.0), 0.5, 2),
            Sphere::new(Vec3A::new(-1.0, 0.0, -1.0), -0.45, 2),
            Sphere::new(Vec3A::new(1.0, 0.0, -1.0), 0.5, 3),
        ];
        let materials = vec![
            Material::Lambertian { albedo: Vec3A::new(0.8, 0.8, 0.0) },
            Material::Lambertian { albedo: Vec3A::new(0.1, 0.2, 0.5) },
            Material::Dielectric { refraction_index: 1.5 },
            Material::Metal { albedo: Vec3A::new(0.8, 0.6, 0.2), fuzziness: 0.0 },
        ];
        Self { spheres, materials }
    }

    /// Book cover scene: a 22x22 grid of small random spheres, a ground
    /// sphere and three large feature spheres.
    pub fn book_cover<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut spheres = Vec::new();
        let mut materials = Vec::new();

        for a in -11..11 {
            for b in -11..11 {
                let choose_mat = random::random_f32(rng);
                let center = Vec3A::new(
                    a as f32 + 0.9 * random::random_f32(rng),
                    0.2,
                    b as f32 + 0.9 * random::random_f32(rng),
                );

                // Keep clear of the large metal sphere
                if (center - Vec3A::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                    continue;
                }

                let material = if choose_mat < 0.8 {
                    let albedo = random::random_color(rng) * random::random_color(rng);
                    Material::Lambertian { albedo }
                } else if choose_mat < 0.95 {
                    let albedo = random::random_color_range(rng, 0.5, 1.0);
                    let fuzziness = random::random_f32_range(rng, 0.0, 0.5);
                    Material::Metal { albedo, fuzziness }
                } else {
                    Material::Dielectric { refraction_index: 1.5 }
                };
                spheres.push(Sphere::new(center, 0.2, materials.len()));
                materials.push(material);
            }
        }

        let mut add = |center: Vec3A, radius: f32, material: Material| {
            spheres.push(Sphere::new(center, radius, materials.len()));
            materials.push(material);
        };
        add(Vec3A::new(0.0, -1000.0, 0.0), 1000.0, Material::Lambertian { albedo: Vec3A::splat(0.5) });
        add(Vec3A::new(0.0, 1.0, 0.0), 1.0, Material::Dielectric { refraction_index: 1.5 });
        add(Vec3A::new(-4.0, 1.0, 0.0), 1.0, Material::Lambertian { albedo: Vec3A::new(0.4, 0.2, 0.1) });
        add(Vec3A::new(4.0, 1.0, 0.0), 1.0, Material::Metal { albedo: Vec3A::new(0.7, 0.6, 0.5), fuzziness: 0.0 });

        Self { spheres, materials }
    }
}

impl Hittable for Scene {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.spheres.as_slice().hit(r, ray_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rejects_out_of_range_material_index() {
        let spheres = vec![Sphere::new(Vec3A::ZERO, 1.0, 0), Sphere::new(Vec3A::ONE, 1.0, 2)];
        let materials = vec![Material::Lambertian { albedo: Vec3A::ONE }; 2];
        let err = Scene::new(spheres, materials).unwrap_err();
        assert_eq!(err, SceneError::MaterialIndexOutOfRange { sphere: 1, material: 2, count: 2 });
    }

    #[test]
    fn raw_records_have_host_layout() {
        assert_eq!(std::mem::size_of::<RawSphere>(), 20);
        assert_eq!(std::mem::size_of::<RawMaterial>(), 24);
    }

    #[test]
    fn from_raw_rejects_unknown_kind_and_negative_index() {
        let good = RawMaterial { kind: 0, albedo: [0.5; 3], fuzziness: 0.0, refraction: 0.0 };
        let bad = RawMaterial { kind: 7, ..good };
        let sphere = RawSphere { material: 0, center: [0.0; 3], radius: 1.0 };

        assert_eq!(
            Scene::from_raw(&[sphere], &[good, bad]).unwrap_err(),
            SceneError::UnknownMaterialKind { index: 1, kind: 7 }
        );

        let negative = RawSphere { material: -1, ..sphere };
        assert!(matches!(
            Scene::from_raw(&[negative], &[good]),
            Err(SceneError::MaterialIndexOutOfRange { sphere: 0, material: -1, .. })
        ));
    }

    #[test]
    fn raw_conversion_preserves_showcase() {
        let scene = Scene::showcase();
        let (spheres, materials) = scene.to_raw();
        assert_eq!(spheres[3].radius, -0.45);
        let back = Scene::from_bytes(bytemuck::cast_slice(&spheres), bytemuck::cast_slice(&materials)).unwrap();
        assert_eq!(back, scene);
    }

    #[test]
    fn from_bytes_rejects_partial_records() {
        let materials = [RawMaterial { kind: 0, albedo: [1.0; 3], fuzziness: 0.0, refraction: 0.0 }];
        let bytes: &[u8] = bytemuck::cast_slice(&materials);
        let no_spheres: &[u8] = bytemuck::cast_slice::<RawSphere, u8>(&[]);
        let err = Scene::from_bytes(no_spheres, &bytes[..bytes.len() - 4]).unwrap_err();
        assert!(matches!(err, SceneError::BufferLayout { what: "material", .. }));
    }

    #[test]
    fn book_cover_indices_are_valid_and_reproducible() {
        let a = Scene::book_cover(&mut ChaCha8Rng::seed_from_u64(11));
        let b = Scene::book_cover(&mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(a, b);
        assert_eq!(a.spheres().len(), a.materials().len());
        assert!(a.spheres().len() > 4);
        assert!(Scene::new(a.spheres().to_vec(), a.materials().to_vec()).is_ok());
        let last = a.spheres().last().unwrap();
        assert_eq!(a.materials()[last.material_index].kind_tag(), KIND_METAL);
    }
}
