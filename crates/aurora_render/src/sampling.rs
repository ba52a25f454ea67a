//! Random sampling helpers shared by the materials and the integrator.

use aurora_math::Vec3;
use rand::RngCore;

/// Draw a uniform f32 in [0, 1) from an untyped generator.
///
/// Uses the top 24 bits of the next u32 so the result is exactly
/// representable and never reaches 1.0.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
}

/// Map two uniform randoms to a cosine-weighted hemisphere direction.
///
/// Standard concentric-free mapping: radius `sqrt(x)` and angle `2*pi*y`
/// on the unit disk, projected up to height `sqrt(1 - x)`. The returned
/// vector is on the hemisphere around +Z; callers orient it themselves.
pub fn cosine_sample_hemisphere(x: f32, y: f32) -> Vec3 {
    let r = x.sqrt();
    let theta = std::f32::consts::TAU * y;

    let u = r * theta.cos();
    let v = r * theta.sin();

    Vec3::new(u, v, (1.0 - x).max(0.0).sqrt())
}
