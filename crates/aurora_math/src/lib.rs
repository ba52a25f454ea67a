// Re-export glam for convenience
pub use glam::*;

// Aurora math types
mod ray;
pub use ray::Ray;
