//! Shared output pixel store.
//!
//! One packed RGBA u32 per pixel, written concurrently by the tile
//! workers. Tiles partition the image into disjoint rectangles, so no
//! two workers ever contend on a pixel; atomic stores keep the sharing
//! sound without any locking, and each finished pixel replaces its slot
//! outright (no accumulation).
//!
//! Layout: row-major, row 0 is the bottom scanline (camera t = 0), byte
//! order R, G, B, A.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::material::Color;

/// Pack a linear color into RGBA bytes, clamping each channel to [0, 1].
pub fn pack_rgba(color: Color) -> u32 {
    let r = (color.x.clamp(0.0, 1.0) * 255.0) as u32;
    let g = (color.y.clamp(0.0, 1.0) * 255.0) as u32;
    let b = (color.z.clamp(0.0, 1.0) * 255.0) as u32;
    r | (g << 8) | (b << 16) | (0xff << 24)
}

/// Unpack a pixel back into its RGBA bytes.
pub fn unpack_rgba(pixel: u32) -> [u8; 4] {
    [
        pixel as u8,
        (pixel >> 8) as u8,
        (pixel >> 16) as u8,
        (pixel >> 24) as u8,
    ]
}

/// Flat image buffer shared between the render workers and the display
/// layer.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<AtomicU32>,
}

impl FrameBuffer {
    /// Create a buffer of `width * height` opaque black pixels.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = Vec::with_capacity((width * height) as usize);
        pixels.resize_with((width * height) as usize, || AtomicU32::new(0xff00_0000));

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Store the final color for one pixel, replacing the previous value.
    pub fn store(&self, x: u32, y: u32, color: Color) {
        debug_assert!(x < self.width && y < self.height);
        let index = (x + y * self.width) as usize;
        self.pixels[index].store(pack_rgba(color), Ordering::Relaxed);
    }

    /// Read one pixel back as RGBA bytes.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        debug_assert!(x < self.width && y < self.height);
        let index = (x + y * self.width) as usize;
        unpack_rgba(self.pixels[index].load(Ordering::Relaxed))
    }

    /// Reset every pixel to opaque black.
    pub fn clear(&self) {
        for pixel in &self.pixels {
            pixel.store(0xff00_0000, Ordering::Relaxed);
        }
    }

    /// Export the buffer as `width * height * 4` RGBA bytes, row-major
    /// with row 0 at the bottom of the image.
    pub fn as_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&unpack_rgba(pixel.load(Ordering::Relaxed)));
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_roundtrip() {
        let packed = pack_rgba(Color::new(1.0, 0.5, 0.0));
        let [r, g, b, a] = unpack_rgba(packed);
        assert_eq!(r, 255);
        assert_eq!(g, 127);
        assert_eq!(b, 0);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_pack_clamps_out_of_range() {
        let [r, g, b, _] = unpack_rgba(pack_rgba(Color::new(2.0, -1.0, 0.25)));
        assert_eq!(r, 255);
        assert_eq!(g, 0);
        assert_eq!(b, 63);
    }

    #[test]
    fn test_store_replaces_pixel() {
        let buffer = FrameBuffer::new(4, 4);
        buffer.store(1, 2, Color::new(1.0, 0.0, 0.0));
        assert_eq!(buffer.pixel(1, 2), [255, 0, 0, 255]);

        // A second full render of the pixel overwrites, never accumulates
        buffer.store(1, 2, Color::new(0.0, 1.0, 0.0));
        assert_eq!(buffer.pixel(1, 2), [0, 255, 0, 255]);
    }

    #[test]
    fn test_export_shape_and_order() {
        let buffer = FrameBuffer::new(2, 2);
        buffer.store(1, 0, Color::new(0.0, 0.0, 1.0));

        let bytes = buffer.as_rgba_bytes();
        assert_eq!(bytes.len(), 2 * 2 * 4);
        // Pixel (1, 0) is the second pixel of the first row
        assert_eq!(&bytes[4..8], &[0, 0, 255, 255]);
    }

    #[test]
    fn test_clear_resets_to_black() {
        let buffer = FrameBuffer::new(2, 1);
        buffer.store(0, 0, Color::ONE);
        buffer.clear();
        assert_eq!(buffer.pixel(0, 0), [0, 0, 0, 255]);
    }
}
