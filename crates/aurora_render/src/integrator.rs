//! The path-tracing integrator.
//!
//! Iterative bounce loop with throughput/radiance accumulators, no
//! recursion. One call to [`render_tile`] is the unit of work handed to
//! a pool worker; it renders its pixel rectangle start to finish and
//! stores each finished pixel into the shared frame buffer exactly once.

use aurora_math::{Ray, Vec3};
use rand::RngCore;

use crate::environment::sample_environment;
use crate::material::Color;
use crate::renderer::RenderContext;
use crate::sampling::gen_f32;
use crate::tile::Tile;

/// Estimate the radiance carried along one camera ray.
///
/// `max_bounces` bounds the number of scatter events: the camera ray is
/// always cast, so with `max_bounces = 0` a miss still resolves to the
/// background sample while a hit contributes nothing.
pub fn trace_path(ray: Ray, ctx: &RenderContext, rng: &mut dyn RngCore) -> Color {
    let mut throughput = Vec3::ONE;
    let mut radiance = Vec3::ZERO;
    let mut ray = ray;

    for bounce in 0..=ctx.config.max_bounces {
        let Some(hit) = ctx.intersector.intersect(&ray) else {
            radiance += throughput
                * sample_environment(ray.direction, ctx.environment.as_deref(), &ctx.sky);
            break;
        };

        if bounce == ctx.config.max_bounces {
            // Bounce budget exhausted; the accumulated radiance stands
            break;
        }

        // An index outside the material table violates the intersector
        // contract; treat the path as absorbed rather than panic a worker.
        let Some(material) = ctx.materials.get(hit.material) else {
            log::warn!("hit references material {} outside the table", hit.material);
            break;
        };

        let scatter = material.scatter(&ray, &hit, rng);
        radiance += throughput * material.emission * material.color;
        throughput *= material.color * scatter.reflectance;
        ray = scatter.ray;
    }

    radiance
}

/// Average `samples_per_pixel` jittered path samples for pixel (x, y).
pub fn render_pixel(x: u32, y: u32, ctx: &RenderContext, rng: &mut dyn RngCore) -> Color {
    let width = ctx.config.width as f32;
    let height = ctx.config.height as f32;

    let mut total = Vec3::ZERO;
    for _ in 0..ctx.config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width;
        let t = (y as f32 + gen_f32(rng)) / height;
        total += trace_path(ctx.camera.get_ray(s, t), ctx, rng);
    }

    total / ctx.config.samples_per_pixel as f32
}

/// Render one tile's pixel rectangle into the shared frame buffer.
pub fn render_tile(tile: &Tile, ctx: &RenderContext, rng: &mut dyn RngCore) {
    for y in tile.y..tile.y + tile.height {
        for x in tile.x..tile.x + tile.width {
            let color = render_pixel(x, y, ctx, rng);
            ctx.framebuffer.store(x, y, color);
        }
    }
    log::trace!("rendered tile at ({}, {})", tile.x, tile.y);
}
