//! Clipped pixel copy into the 8×8 grid
//!
//! The grid is 64 native-endian u16 cells, row-major. A source
//! rectangle is translated so its origin lands at the destination
//! offset; only the part that overlaps the grid is written.

use crate::constants::{FB_REGION_LEN, GRID_HEIGHT, GRID_WIDTH, PIXEL_BYTES};
use crate::error::{DeviceError, Result};

/// Caller-owned row-major pixels in the device's native encoding (RGB565)
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    pixels: &'a [u16],
    width: usize,
    height: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap `pixels` as a `width` × `height` image.
    ///
    /// Extra trailing pixels are ignored; too few is an error.
    pub fn new(pixels: &'a [u16], width: usize, height: usize) -> Result<Self> {
        let needed = width.checked_mul(height);
        match needed {
            Some(n) if n <= pixels.len() => Ok(Self {
                pixels,
                width,
                height,
            }),
            _ => Err(DeviceError::BufferSize {
                len: pixels.len(),
                width,
                height,
            }),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn get(&self, x: usize, y: usize) -> u16 {
        self.pixels[y * self.width + x]
    }
}

/// Store one pixel into the grid region
#[inline]
pub(crate) fn write_cell(region: &mut [u8], index: usize, value: u16) {
    let off = index * PIXEL_BYTES;
    region[off..off + PIXEL_BYTES].copy_from_slice(&value.to_ne_bytes());
}

/// Load one pixel from the grid region
#[inline]
pub(crate) fn read_cell(region: &[u8], index: usize) -> u16 {
    let off = index * PIXEL_BYTES;
    u16::from_ne_bytes([region[off], region[off + 1]])
}

/// Copy `src` into `region` with its origin at grid cell (`dest_x`, `dest_y`).
///
/// Source pixel (x1, y1) lands on grid cell (x1 + dest_x, y1 + dest_y).
/// Cells left or above the grid are skipped; the scan of a row stops at
/// the first cell past the right edge, and the scan of rows stops at the
/// first row past the bottom edge. Cells outside the overlap keep their
/// previous value.
pub fn blit(region: &mut [u8], src: &PixelBuffer<'_>, dest_x: i32, dest_y: i32) {
    debug_assert_eq!(region.len(), FB_REGION_LEN);

    for y1 in 0..src.height {
        let fby = y1 as isize + dest_y as isize;
        if fby < 0 {
            continue;
        }
        if fby >= GRID_HEIGHT as isize {
            break;
        }

        for x1 in 0..src.width {
            let fbx = x1 as isize + dest_x as isize;
            if fbx < 0 {
                continue;
            }
            if fbx >= GRID_WIDTH as isize {
                break;
            }

            let index = fby as usize * GRID_WIDTH + fbx as usize;
            write_cell(region, index, src.get(x1, y1));
        }
    }
}
