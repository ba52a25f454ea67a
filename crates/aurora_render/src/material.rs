//! Surface scattering model.
//!
//! A closed set of four scattering behaviors matched exhaustively in
//! [`Material::scatter`]. Materials live in a render-wide table and are
//! referenced by index from the intersector's hit records, never
//! duplicated per primitive.

use aurora_math::{Ray, Vec3};
use rand::RngCore;

use crate::intersect::HitRecord;
use crate::sampling::{cosine_sample_hemisphere, gen_f32};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Offset applied along the normal when respawning a ray at a surface,
/// to avoid immediate self-intersection.
const SURFACE_EPSILON: f32 = 0.01;

/// Larger offset used by the refractive branch, which respawns rays on
/// either side of the interface.
const INTERFACE_EPSILON: f32 = 0.1;

/// Scattering behavior of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Cosine-weighted diffuse reflection
    Diffuse,
    /// Perfect specular reflection
    Mirror { reflectiveness: f32 },
    /// Specular reflection with optional roughness blur
    Metal { reflectiveness: f32, roughness: f32 },
    /// Dielectric with Schlick-weighted reflect/refract choice
    Refractive { roughness: f32, ior: f32 },
}

/// One entry of the render-wide material table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    /// Albedo multiplied into the path throughput at every bounce
    pub color: Color,
    /// Emitted radiance scale; emitted light is `emission * color`
    pub emission: f32,
}

/// Result of scattering a ray at a surface.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    /// The outgoing ray, origin offset off the surface
    pub ray: Ray,
    /// Reflectance weight multiplied into the path throughput
    pub reflectance: f32,
}

impl Material {
    /// Create a non-emissive material.
    pub fn new(kind: MaterialKind, color: Color) -> Self {
        Self {
            kind,
            color,
            emission: 0.0,
        }
    }

    /// Create an emissive material.
    pub fn emissive(kind: MaterialKind, color: Color, emission: f32) -> Self {
        Self {
            kind,
            color,
            emission,
        }
    }

    /// Scatter an incoming ray at a surface hit.
    ///
    /// Pure given the inputs and the generator; every variant produces
    /// exactly one outgoing ray.
    pub fn scatter(&self, ray: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Scatter {
        match self.kind {
            MaterialKind::Diffuse => scatter_diffuse(hit, rng),
            MaterialKind::Mirror { reflectiveness } => scatter_mirror(ray, hit, reflectiveness),
            MaterialKind::Metal {
                reflectiveness,
                roughness,
            } => scatter_metal(ray, hit, reflectiveness, roughness, rng),
            MaterialKind::Refractive { ior, .. } => scatter_refractive(ray, hit, ior, rng),
        }
    }
}

fn scatter_diffuse(hit: &HitRecord, rng: &mut dyn RngCore) -> Scatter {
    let sample = oriented_hemisphere_sample(hit.normal, rng);
    let direction = (hit.normal + sample).normalize();

    Scatter {
        ray: Ray::new(hit.position + hit.normal * SURFACE_EPSILON, direction),
        reflectance: hit.normal.dot(direction).max(0.0),
    }
}

fn scatter_mirror(ray: &Ray, hit: &HitRecord, reflectiveness: f32) -> Scatter {
    Scatter {
        ray: Ray::new(
            hit.position + hit.normal * SURFACE_EPSILON,
            reflect(ray.direction, hit.normal),
        ),
        reflectance: reflectiveness,
    }
}

fn scatter_metal(
    ray: &Ray,
    hit: &HitRecord,
    reflectiveness: f32,
    roughness: f32,
    rng: &mut dyn RngCore,
) -> Scatter {
    let reflected = reflect(ray.direction, hit.normal).normalize();

    let direction = if roughness > 0.0 {
        let sample = oriented_hemisphere_sample(hit.normal, rng);
        (reflected + roughness * sample).normalize()
    } else {
        reflected
    };

    Scatter {
        ray: Ray::new(hit.position + hit.normal * SURFACE_EPSILON, direction),
        reflectance: reflectiveness,
    }
}

fn scatter_refractive(ray: &Ray, hit: &HitRecord, ior: f32, rng: &mut dyn RngCore) -> Scatter {
    let reflected = reflect(ray.direction, hit.normal);

    // Entering vs. exiting the medium decides the interface orientation
    let (outward_normal, nit, cosine) = if ray.direction.dot(hit.normal) > 0.0 {
        (hit.normal, ior, ior * ray.direction.dot(hit.normal))
    } else {
        (-hit.normal, 1.0 / ior, -ray.direction.dot(hit.normal))
    };

    // Total internal reflection leaves the reflect chance at 1
    let mut reflect_chance = 1.0;
    let refracted = refract(ray.direction, outward_normal, nit);
    if refracted.is_some() {
        reflect_chance = schlick(cosine, ior);
    }

    let (origin, direction) = if gen_f32(rng) < reflect_chance {
        (hit.position + outward_normal * INTERFACE_EPSILON, reflected)
    } else {
        (
            hit.position - outward_normal * INTERFACE_EPSILON,
            refracted.unwrap_or(reflected),
        )
    };

    Scatter {
        ray: Ray::new(origin, direction),
        reflectance: 1.0,
    }
}

/// Cosine-hemisphere sample flipped into the hemisphere of `normal`.
fn oriented_hemisphere_sample(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let x = gen_f32(rng);
    let y = gen_f32(rng);
    let mut sample = cosine_sample_hemisphere(x, y);
    if sample.dot(normal) < 0.0 {
        sample = -sample;
    }
    sample
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface, or `None` when refraction is
/// geometrically impossible (total internal reflection).
fn refract(v: Vec3, n: Vec3, nit: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - nit * nit * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some((uv - n * dt) * nit - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation of Fresnel reflectance.
pub(crate) fn schlick(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_hit(normal: Vec3) -> HitRecord {
        HitRecord {
            distance: 1.0,
            position: Vec3::new(0.0, 0.0, -1.0),
            normal,
            material: 0,
        }
    }

    #[test]
    fn test_schlick_normal_incidence() {
        // At cosine = 1 the approximation collapses to r0 exactly.
        for ior in [1.0f32, 1.33, 1.5, 2.4, 10.0] {
            let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
            assert!(
                (schlick(1.0, ior) - r0).abs() < 1e-6,
                "ior {ior}: {} != {r0}",
                schlick(1.0, ior)
            );
        }
    }

    #[test]
    fn test_diffuse_reflectance_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        let hit = test_hit(Vec3::Y);
        let material = Material::new(MaterialKind::Diffuse, Color::new(0.8, 0.8, 0.8));

        for _ in 0..200 {
            let scatter = material.scatter(&Ray::new(Vec3::ZERO, -Vec3::Y), &hit, &mut rng);
            assert!((0.0..=1.0).contains(&scatter.reflectance));
            // Cosine weighting: reflectance equals n.dot(direction)
            let cos = hit.normal.dot(scatter.ray.direction);
            assert!((scatter.reflectance - cos.max(0.0)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_energy_non_amplification() {
        // One bounce of diffuse or metal with color <= 1 and
        // reflectiveness <= 1 never increases any throughput channel.
        let mut rng = StdRng::seed_from_u64(2);
        let hit = test_hit(Vec3::Y);
        let incoming = Ray::new(Vec3::new(0.0, 1.0, -2.0), Vec3::new(0.0, -1.0, 1.0).normalize());

        let materials = [
            Material::new(MaterialKind::Diffuse, Color::new(0.9, 0.5, 0.2)),
            Material::new(
                MaterialKind::Metal {
                    reflectiveness: 0.8,
                    roughness: 0.3,
                },
                Color::new(1.0, 0.7, 0.4),
            ),
        ];

        for material in materials {
            for _ in 0..100 {
                let throughput = Vec3::new(0.7, 0.7, 0.7);
                let scatter = material.scatter(&incoming, &hit, &mut rng);
                let after = throughput * material.color * scatter.reflectance;
                assert!(after.x <= throughput.x);
                assert!(after.y <= throughput.y);
                assert!(after.z <= throughput.z);
            }
        }
    }

    #[test]
    fn test_mirror_reflects_about_normal() {
        let mut rng = StdRng::seed_from_u64(3);
        let hit = test_hit(Vec3::Y);
        let material = Material::new(
            MaterialKind::Mirror {
                reflectiveness: 0.95,
            },
            Color::ONE,
        );

        let incoming = Ray::new(Vec3::ZERO, Vec3::new(1.0, -1.0, 0.0).normalize());
        let scatter = material.scatter(&incoming, &hit, &mut rng);

        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((scatter.ray.direction.normalize() - expected).length() < 1e-5);
        assert_eq!(scatter.reflectance, 0.95);
        // Origin is pushed off the surface along the normal
        assert!(scatter.ray.origin.y > hit.position.y);
    }

    #[test]
    fn test_smooth_metal_is_a_mirror() {
        let mut rng = StdRng::seed_from_u64(4);
        let hit = test_hit(Vec3::Y);
        let material = Material::new(
            MaterialKind::Metal {
                reflectiveness: 1.0,
                roughness: 0.0,
            },
            Color::ONE,
        );

        let incoming = Ray::new(Vec3::ZERO, Vec3::new(1.0, -1.0, 0.0).normalize());
        let scatter = material.scatter(&incoming, &hit, &mut rng);
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((scatter.ray.direction - expected).length() < 1e-5);
    }

    #[test]
    fn test_refractive_produces_unit_direction() {
        let mut rng = StdRng::seed_from_u64(5);
        let hit = test_hit(Vec3::Y);
        let material = Material::new(
            MaterialKind::Refractive {
                roughness: 0.0,
                ior: 1.5,
            },
            Color::ONE,
        );

        let incoming = Ray::new(Vec3::ZERO, Vec3::new(0.3, -1.0, 0.1).normalize());
        for _ in 0..50 {
            let scatter = material.scatter(&incoming, &hit, &mut rng);
            assert!((scatter.ray.direction.length() - 1.0).abs() < 1e-4);
            assert_eq!(scatter.reflectance, 1.0);
        }
    }
}
