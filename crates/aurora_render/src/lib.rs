//! Aurora - CPU Path Tracing
//!
//! A tile-parallel Monte Carlo path tracer: camera, material table, and
//! a nearest-hit query service in; packed RGBA frame buffer out. Scene
//! geometry, model loading, and display live behind the
//! [`SceneIntersector`] seam and the frame-buffer export.

mod camera;
mod config;
mod environment;
mod framebuffer;
mod integrator;
mod intersect;
mod material;
mod pool;
mod renderer;
mod sampling;
mod tile;

pub use camera::Camera;
pub use config::{RenderConfig, RenderError};
pub use environment::{direction_to_uv, sample_environment, EnvironmentMap, SkyGradient};
pub use framebuffer::{pack_rgba, unpack_rgba, FrameBuffer};
pub use integrator::{render_pixel, render_tile, trace_path};
pub use intersect::{EmptyScene, HitRecord, SceneIntersector};
pub use material::{Color, Material, MaterialKind, Scatter};
pub use pool::{Task, WorkerPool};
pub use renderer::{RenderContext, Renderer};
pub use tile::{generate_tiles, Tile};

/// Re-export Vec3 and common math types from aurora_math
pub use aurora_math::{Ray, Vec2, Vec3};
