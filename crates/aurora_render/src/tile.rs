//! Image partitioning for tile-parallel rendering.
//!
//! Divides the image into a `tile_count` by `tile_count` grid of
//! disjoint rectangles. Tiles are the unit of scheduling: each is
//! rendered start-to-finish by one worker, in no guaranteed order.

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's first pixel
    pub x: u32,
    /// Y coordinate of the tile's first pixel
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
}

impl Tile {
    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Partition a `width` by `height` image into `tile_count` tiles per
/// axis.
///
/// The base tile size is the integer quotient `resolution / tile_count`;
/// the last row and column absorb the remainder, so the union of all
/// tiles covers the image exactly with no gap or overlap. An overlap or
/// gap here would silently corrupt the frame-buffer sharing invariant,
/// hence the debug assertions on the partition bounds.
///
/// Callers must validate `1 <= tile_count <= min(width, height)` first
/// (see `RenderConfig::validate`).
pub fn generate_tiles(width: u32, height: u32, tile_count: u32) -> Vec<Tile> {
    debug_assert!(tile_count >= 1);
    debug_assert!(tile_count <= width && tile_count <= height);

    let tile_width = width / tile_count;
    let tile_height = height / tile_count;

    let mut tiles = Vec::with_capacity((tile_count * tile_count) as usize);
    for ty in 0..tile_count {
        let y0 = ty * tile_height;
        let y1 = if ty + 1 == tile_count {
            height
        } else {
            y0 + tile_height
        };

        for tx in 0..tile_count {
            let x0 = tx * tile_width;
            let x1 = if tx + 1 == tile_count {
                width
            } else {
                x0 + tile_width
            };

            tiles.push(Tile {
                x: x0,
                y: y0,
                width: x1 - x0,
                height: y1 - y0,
            });
        }
    }

    debug_assert_eq!(
        tiles.iter().map(Tile::pixel_count).sum::<u32>(),
        width * height
    );
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Paint every tile into a per-pixel counter and check each pixel
    /// was covered exactly once.
    fn assert_exact_cover(width: u32, height: u32, tile_count: u32) {
        let tiles = generate_tiles(width, height, tile_count);
        assert_eq!(tiles.len(), (tile_count * tile_count) as usize);

        let mut covered = vec![0u8; (width * height) as usize];
        for tile in &tiles {
            for y in tile.y..tile.y + tile.height {
                for x in tile.x..tile.x + tile.width {
                    covered[(x + y * width) as usize] += 1;
                }
            }
        }

        assert!(
            covered.iter().all(|&c| c == 1),
            "{}x{} with {} tiles per axis has a gap or overlap",
            width,
            height,
            tile_count
        );
    }

    #[test]
    fn test_partition_covers_exactly() {
        for tile_count in [1, 7, 16, 17] {
            assert_exact_cover(512, 512, tile_count);
        }
    }

    #[test]
    fn test_partition_non_square_image() {
        assert_exact_cover(640, 360, 9);
        assert_exact_cover(33, 100, 5);
    }

    #[test]
    fn test_single_tile_is_whole_image() {
        let tiles = generate_tiles(512, 512, 1);
        assert_eq!(
            tiles,
            vec![Tile {
                x: 0,
                y: 0,
                width: 512,
                height: 512
            }]
        );
    }

    #[test]
    fn test_last_row_and_column_absorb_remainder() {
        let tiles = generate_tiles(512, 512, 7);
        // 512 / 7 = 73, so interior tiles are 73 wide and the last
        // column takes 512 - 6 * 73 = 74.
        assert_eq!(tiles[0].width, 73);
        assert_eq!(tiles[6].width, 74);
        assert_eq!(tiles.last().unwrap().height, 74);
    }
}
