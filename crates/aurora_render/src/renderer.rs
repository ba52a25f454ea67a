//! Render orchestration: owns the worker pool and the scene state,
//! snapshots a [`RenderContext`] per frame, and submits one task per
//! tile.
//!
//! Scene and configuration are read-only while the pool runs; any
//! rebuild must follow the stop-before-mutate protocol (`stop()`,
//! mutate, `start()`, resubmit). The mutators enforce this by returning
//! [`RenderError::PoolRunning`] instead of racing the workers.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::config::{RenderConfig, RenderError};
use crate::environment::{EnvironmentMap, SkyGradient};
use crate::framebuffer::FrameBuffer;
use crate::integrator::render_tile;
use crate::intersect::SceneIntersector;
use crate::material::Material;
use crate::pool::{Task, WorkerPool};
use crate::tile::generate_tiles;

/// Immutable per-frame snapshot shared by every tile task.
///
/// Workers read the scene through this value only; nothing in it
/// changes for the lifetime of a submitted frame.
pub struct RenderContext {
    pub config: RenderConfig,
    pub camera: Camera,
    pub materials: Vec<Material>,
    pub intersector: Arc<dyn SceneIntersector>,
    pub environment: Option<Arc<EnvironmentMap>>,
    pub sky: SkyGradient,
    pub framebuffer: Arc<FrameBuffer>,
}

/// The interactive renderer: worker pool plus current scene state.
pub struct Renderer {
    pool: WorkerPool,
    config: RenderConfig,
    camera: Camera,
    materials: Vec<Material>,
    intersector: Arc<dyn SceneIntersector>,
    environment: Option<Arc<EnvironmentMap>>,
    sky: SkyGradient,
    framebuffer: Arc<FrameBuffer>,
    frame_counter: u64,
}

impl Renderer {
    /// Create a renderer with a Stopped pool of `thread_count` workers.
    pub fn new(
        config: RenderConfig,
        camera: Camera,
        intersector: Arc<dyn SceneIntersector>,
        thread_count: usize,
    ) -> Result<Self, RenderError> {
        config.validate()?;

        Ok(Self {
            pool: WorkerPool::new(thread_count),
            config,
            camera,
            materials: Vec::new(),
            intersector,
            environment: None,
            sky: SkyGradient::default(),
            framebuffer: Arc::new(FrameBuffer::new(config.width, config.height)),
            frame_counter: 0,
        })
    }

    pub fn is_running(&self) -> bool {
        self.pool.is_running()
    }

    /// Start the worker pool.
    pub fn start(&mut self) {
        self.pool.start();
    }

    /// Stop the worker pool, dropping any queued tiles. In-flight tiles
    /// finish first.
    pub fn stop(&mut self) {
        self.pool.stop();
    }

    /// Block until every submitted tile has been rendered.
    pub fn wait_idle(&self) {
        self.pool.wait_idle();
    }

    /// The shared output buffer consumed by the display layer.
    pub fn framebuffer(&self) -> Arc<FrameBuffer> {
        Arc::clone(&self.framebuffer)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replace the material table, intersector, and environment map.
    ///
    /// Refused while the pool is running: workers read the scene with no
    /// synchronization, so mutation must happen between `stop()` and
    /// `start()`.
    pub fn set_scene(
        &mut self,
        materials: Vec<Material>,
        intersector: Arc<dyn SceneIntersector>,
        environment: Option<Arc<EnvironmentMap>>,
    ) -> Result<(), RenderError> {
        if self.is_running() {
            return Err(RenderError::PoolRunning);
        }

        self.materials = materials;
        self.intersector = intersector;
        self.environment = environment;
        Ok(())
    }

    /// Replace the sky gradient used when no environment map is loaded.
    pub fn set_sky(&mut self, sky: SkyGradient) -> Result<(), RenderError> {
        if self.is_running() {
            return Err(RenderError::PoolRunning);
        }
        self.sky = sky;
        Ok(())
    }

    /// Replace the render configuration and camera, reallocating the
    /// frame buffer when the resolution changes. Refused while running.
    pub fn set_config(&mut self, config: RenderConfig, camera: Camera) -> Result<(), RenderError> {
        if self.is_running() {
            return Err(RenderError::PoolRunning);
        }
        config.validate()?;

        if (config.width, config.height) != (self.config.width, self.config.height) {
            self.framebuffer = Arc::new(FrameBuffer::new(config.width, config.height));
        }
        self.config = config;
        self.camera = camera;
        Ok(())
    }

    /// Submit one full frame: one task per tile, enqueued as a batch.
    ///
    /// Each tile task owns a deterministic generator seeded from the
    /// frame counter and the tile coordinates, so a given frame renders
    /// identically regardless of worker count.
    pub fn submit_frame(&mut self) -> Result<(), RenderError> {
        self.config.validate()?;

        let context = Arc::new(RenderContext {
            config: self.config,
            camera: self.camera,
            materials: self.materials.clone(),
            intersector: Arc::clone(&self.intersector),
            environment: self.environment.clone(),
            sky: self.sky,
            framebuffer: Arc::clone(&self.framebuffer),
        });

        let frame = self.frame_counter;
        self.frame_counter += 1;

        let tiles = generate_tiles(self.config.width, self.config.height, self.config.tile_count);
        log::debug!(
            "submitting frame {} as {} tiles ({} spp, {} bounces)",
            frame,
            tiles.len(),
            self.config.samples_per_pixel,
            self.config.max_bounces
        );

        let tasks = tiles.into_iter().map(|tile| {
            let context = Arc::clone(&context);
            let seed = frame ^ (u64::from(tile.x) << 32 | u64::from(tile.y));
            Box::new(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                render_tile(&tile, &context, &mut rng);
            }) as Task
        });

        self.pool.add_tasks(tasks);
        Ok(())
    }
}
