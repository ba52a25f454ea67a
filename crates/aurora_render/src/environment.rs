//! Background radiance for rays that leave the scene.
//!
//! Misses sample either an equirectangular environment image or, when
//! none is loaded, a vertical sky gradient. Absence of an environment
//! image is a valid, recoverable state.

use aurora_math::{Vec2, Vec3};

use crate::material::Color;

/// Map a unit direction to equirectangular texture coordinates.
///
/// `u = 0.5 + atan2(z, x) / 2pi`, `v = 0.5 - asin(y) / pi`; both land in
/// [0, 1] with v = 0 at the zenith.
pub fn direction_to_uv(direction: Vec3) -> Vec2 {
    Vec2::new(
        0.5 + direction.z.atan2(direction.x) / std::f32::consts::TAU,
        0.5 - direction.y.asin() / std::f32::consts::PI,
    )
}

/// A decoded environment image addressable by normalized (u, v).
#[derive(Debug, Clone)]
pub struct EnvironmentMap {
    width: u32,
    height: u32,
    texels: Vec<Color>,
}

impl EnvironmentMap {
    /// Build from raw 8-bit RGB data, row-major, `width * height * 3`
    /// bytes. Returns `None` when the buffer size does not match.
    pub fn from_rgb8(width: u32, height: u32, data: &[u8]) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != (width * height * 3) as usize {
            return None;
        }

        let texels = data
            .chunks_exact(3)
            .map(|px| Color::new(px[0] as f32, px[1] as f32, px[2] as f32) / 255.0)
            .collect();

        Some(Self {
            width,
            height,
            texels,
        })
    }

    /// Build from a decoded RGB image.
    pub fn from_image(image: &image::RgbImage) -> Option<Self> {
        Self::from_rgb8(image.width(), image.height(), image.as_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-texel lookup at normalized (u, v).
    pub fn sample(&self, uv: Vec2) -> Color {
        let x = ((uv.x.clamp(0.0, 1.0) * self.width as f32) as u32).min(self.width - 1);
        let y = ((uv.y.clamp(0.0, 1.0) * self.height as f32) as u32).min(self.height - 1);
        self.texels[(x + y * self.width) as usize]
    }
}

/// Fallback sky: a vertical gradient keyed on the equirectangular v.
#[derive(Debug, Clone, Copy)]
pub struct SkyGradient {
    /// Color at v = 0 (straight up)
    pub zenith: Color,
    /// Color at v = 1 (straight down)
    pub nadir: Color,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            zenith: Color::new(1.0, 1.0, 1.0),
            nadir: Color::new(0.4, 0.4, 1.0),
        }
    }
}

impl SkyGradient {
    pub fn sample(&self, v: f32) -> Color {
        self.zenith.lerp(self.nadir, v)
    }
}

/// Sample the background radiance for a missed ray.
pub fn sample_environment(
    direction: Vec3,
    environment: Option<&EnvironmentMap>,
    sky: &SkyGradient,
) -> Color {
    let uv = direction_to_uv(direction);
    match environment {
        Some(map) => map.sample(uv),
        None => sky.sample(uv.y),
    }
}
