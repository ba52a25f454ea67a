//! Nearest-hit query contract consumed by the integrator.
//!
//! The core performs no triangle math itself; scene geometry lives
//! behind [`SceneIntersector`], typically backed by a third-party
//! acceleration structure.

use aurora_math::{Ray, Vec3};

/// Record of the nearest ray-scene intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Distance along the ray to the intersection point
    pub distance: f32,
    /// Point of intersection in world space
    pub position: Vec3,
    /// Geometric surface normal at the intersection (unit length)
    pub normal: Vec3,
    /// Index of the struck primitive's material in the render-wide table
    pub material: usize,
}

/// Nearest-hit query service over the loaded scene geometry.
///
/// Implementations must be safe to query concurrently from many worker
/// threads; the renderer guarantees the scene is never mutated while a
/// pool is running (stop-before-mutate protocol).
pub trait SceneIntersector: Send + Sync {
    /// Return the nearest hit before infinity, or `None` on a miss.
    ///
    /// A scene with no geometry loaded is a valid state and always
    /// returns `None`.
    fn intersect(&self, ray: &Ray) -> Option<HitRecord>;
}

/// An intersector with no geometry: every ray misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyScene;

impl SceneIntersector for EmptyScene {
    fn intersect(&self, _ray: &Ray) -> Option<HitRecord> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scene_always_misses() {
        let scene = EmptyScene;
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(scene.intersect(&ray).is_none());
    }
}
