//! Headless demo: render two analytic spheres against the gradient sky
//! and save the result as a PNG.
//!
//! The sphere intersector stands in for a real triangle-mesh
//! acceleration structure behind the `SceneIntersector` seam.

use std::sync::Arc;

use aurora_render::{
    Camera, HitRecord, Material, MaterialKind, Ray, RenderConfig, Renderer, SceneIntersector, Vec3,
};

/// An analytic sphere with a material table index.
struct Sphere {
    center: Vec3,
    radius: f32,
    material: usize,
}

impl Sphere {
    fn hit(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let near = (-half_b - sqrt_d) / a;
        if near > 1e-4 {
            return Some(near);
        }
        let far = (-half_b + sqrt_d) / a;
        (far > 1e-4).then_some(far)
    }
}

struct SphereScene {
    spheres: Vec<Sphere>,
}

impl SceneIntersector for SphereScene {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let mut best: Option<HitRecord> = None;
        for sphere in &self.spheres {
            if let Some(distance) = sphere.hit(ray) {
                if best.map_or(true, |b| distance < b.distance) {
                    let position = ray.at(distance);
                    best = Some(HitRecord {
                        distance,
                        position,
                        normal: (position - sphere.center).normalize(),
                        material: sphere.material,
                    });
                }
            }
        }
        best
    }
}

fn main() {
    env_logger::init();

    let config = RenderConfig {
        width: 640,
        height: 480,
        samples_per_pixel: 64,
        max_bounces: 6,
        tile_count: 8,
    };
    let camera = Camera::new(
        Vec3::new(0.0, 1.0, 3.0),
        Vec3::new(0.0, 0.5, -1.0),
        60.0,
        config.aspect(),
    );

    let materials = vec![
        Material::new(MaterialKind::Diffuse, Vec3::new(0.8, 0.3, 0.3)),
        Material::new(
            MaterialKind::Metal {
                reflectiveness: 0.9,
                roughness: 0.1,
            },
            Vec3::new(0.8, 0.8, 0.9),
        ),
        Material::new(MaterialKind::Diffuse, Vec3::new(0.5, 0.5, 0.5)),
    ];
    let scene = Arc::new(SphereScene {
        spheres: vec![
            Sphere {
                center: Vec3::new(-0.7, 0.5, -1.0),
                radius: 0.5,
                material: 0,
            },
            Sphere {
                center: Vec3::new(0.7, 0.5, -1.0),
                radius: 0.5,
                material: 1,
            },
            // Ground sphere
            Sphere {
                center: Vec3::new(0.0, -100.0, -1.0),
                radius: 100.0,
                material: 2,
            },
        ],
    });

    let mut renderer = Renderer::new(config, camera, Arc::clone(&scene) as _, 8)
        .expect("valid render config");
    renderer
        .set_scene(materials, scene, None)
        .expect("pool is stopped");

    renderer.start();
    renderer.submit_frame().expect("valid render config");
    renderer.wait_idle();
    renderer.stop();

    // Rows come out bottom-first; flip for the PNG's top-left origin.
    let buffer = renderer.framebuffer();
    let bytes = buffer.as_rgba_bytes();
    let row = (config.width * 4) as usize;
    let flipped: Vec<u8> = bytes.chunks_exact(row).rev().flatten().copied().collect();

    let image =
        image::RgbaImage::from_raw(config.width, config.height, flipped).expect("buffer size");
    image.save("render_sphere.png").expect("writable cwd");
    println!("wrote render_sphere.png");
}
