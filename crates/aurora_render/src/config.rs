//! Render parameters and their validation.

use thiserror::Error;

/// Errors surfaced by the render configuration and orchestration layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("resolution must be non-zero, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("samples per pixel must be at least 1")]
    InvalidSampleCount,

    #[error("tile count {tile_count} must be between 1 and the smallest image dimension {limit}")]
    InvalidTileCount { tile_count: u32, limit: u32 },

    #[error("worker pool is running; stop it before mutating the scene or configuration")]
    PoolRunning,
}

/// Parameters of one progressive render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Independent path samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum scatter events per path; 0 casts camera rays only
    pub max_bounces: u32,
    /// Tiles per image axis (the grid is `tile_count` squared)
    pub tile_count: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            samples_per_pixel: 4,
            max_bounces: 5,
            tile_count: 8,
        }
    }
}

impl RenderConfig {
    /// Width / height as used by the camera.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Reject parameter combinations that would divide by zero or break
    /// the tile partition before any frame is submitted.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSampleCount);
        }

        let limit = self.width.min(self.height);
        if self.tile_count == 0 || self.tile_count > limit {
            return Err(RenderError::InvalidTileCount {
                tile_count: self.tile_count,
                limit,
            });
        }

        Ok(())
    }
}
