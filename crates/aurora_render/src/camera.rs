//! Pinhole camera for ray generation.

use aurora_math::{Ray, Vec3};

/// Camera mapping normalized pixel-plane coordinates to world-space rays.
///
/// The viewing basis is computed once at construction and never changes;
/// build a new camera whenever the pose, field of view, or aspect ratio
/// changes. `look_at == origin` leaves the basis undefined; callers must
/// pass distinct points.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Vec3,

    // Cached basis (fixed for the camera's lifetime)
    center: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Create a camera at `origin` looking towards `look_at`.
    ///
    /// `fov_degrees` is the vertical field of view; `aspect` is
    /// width / height of the target image.
    pub fn new(origin: Vec3, look_at: Vec3, fov_degrees: f32, aspect: f32) -> Self {
        let theta = fov_degrees.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = aspect * half_height;

        // Orthonormal basis from the view direction and world up
        let up = Vec3::new(0.0, 1.0, 0.0);
        let w = (look_at - origin).normalize();
        let u = up.cross(w).normalize();
        let v = w.cross(u);

        Self {
            origin,
            center: origin + w,
            horizontal: u * half_width,
            vertical: v * half_height,
        }
    }

    /// Generate the ray through pixel-plane coordinates `(s, t)`.
    ///
    /// `s` and `t` are in [0, 1]; (0.5, 0.5) is the image center and
    /// t = 0 the bottom edge. Pure function, safe to call concurrently.
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        let x_offset = self.horizontal * (s * 2.0 - 1.0);
        let y_offset = self.vertical * (t * 2.0 - 1.0);
        let direction = ((self.center + x_offset + y_offset) - self.origin).normalize();
        Ray::new(self.origin, direction)
    }

    /// Camera position in world space.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_matches_view_direction() {
        // For any fov/aspect, the (0.5, 0.5) ray is the view direction.
        let cases = [
            (Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 90.0, 1.0),
            (Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.5, 8.0), 35.0, 16.0 / 9.0),
            (Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, 5.0, 10.0), 60.0, 2.0),
        ];

        for (origin, look_at, fov, aspect) in cases {
            let camera = Camera::new(origin, look_at, fov, aspect);
            let ray = camera.get_ray(0.5, 0.5);
            let expected = (look_at - origin).normalize();

            assert_eq!(ray.origin, origin);
            assert!(
                (ray.direction - expected).length() < 1e-5,
                "center ray {:?} != view direction {:?}",
                ray.direction,
                expected
            );
        }
    }

    #[test]
    fn test_rays_are_unit_length() {
        let camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 90.0, 2.0);
        for &(s, t) in &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.25, 0.75)] {
            let ray = camera.get_ray(s, t);
            assert!((ray.direction.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_corner_rays_span_the_frustum() {
        let camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 90.0, 1.0);

        let left = camera.get_ray(0.0, 0.5);
        let right = camera.get_ray(1.0, 0.5);
        let top = camera.get_ray(0.5, 1.0);
        let bottom = camera.get_ray(0.5, 0.0);

        // Horizontal edges land on opposite sides, vertical edges above/below
        assert!(left.direction.x * right.direction.x < 0.0);
        assert!(top.direction.y > 0.0 && bottom.direction.y < 0.0);
    }
}
