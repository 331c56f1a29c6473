//! LED matrix framebuffer access
//!
//! Finds the Sense HAT framebuffer among /dev/fbN by its fixed screen
//! info id, maps its 128-byte pixel region shared with the driver, and
//! draws into it.

use log::{info, warn};
use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::path::{Path, PathBuf};

use crate::config::FramebufferConfig;
use crate::constants::{
    FB_REGION_LEN, GAMMA_TABLE_LEN, GRID_CELLS, GRID_HEIGHT, GRID_WIDTH,
    SENSE_HAT_FB_GAMMA_DEFAULT, SENSE_HAT_FB_GAMMA_LOW,
};
use crate::device::{find_devices, ioctl_helpers, probe};
use crate::error::{DeviceError, DeviceKind, Result};
use crate::fb::blit::{self, read_cell, write_cell, PixelBuffer};

/// Open, mapped LED matrix
pub struct Framebuffer {
    // Fields drop in declaration order: the region is unmapped
    // before the descriptor is closed.
    map: MmapMut,
    file: File,
    path: PathBuf,
}

impl Framebuffer {
    /// Find and map the framebuffer whose id is `name` under /dev
    pub fn open(name: &str) -> Result<Self> {
        let config = FramebufferConfig {
            name: name.to_string(),
            ..FramebufferConfig::default()
        };
        Self::open_with(&config)
    }

    /// Find and map the framebuffer described by `config`.
    ///
    /// Candidates whose id does not match are closed before this returns.
    /// The display starts blank.
    pub fn open_with(config: &FramebufferConfig) -> Result<Self> {
        let candidates = find_devices(&config.dir, &config.prefix);

        let found = probe(
            &candidates,
            &config.name,
            |path| OpenOptions::new().read(true).write(true).open(path),
            |file| ioctl_helpers::fb_fix_screeninfo(file.as_raw_fd()).map(|fix| fix.id()),
        );

        let Some((file, node)) = found else {
            warn!(
                "No framebuffer with id {:?} in {} ({} candidate(s))",
                config.name,
                config.dir.display(),
                candidates.len()
            );
            return Err(DeviceError::NotFound {
                kind: DeviceKind::Framebuffer,
                name: config.name.clone(),
            });
        };

        let fb = Self::from_file(file, node.path)?;
        info!("Opened framebuffer {:?}: {}", node.reported_name, fb.path.display());
        Ok(fb)
    }

    /// Map an already open framebuffer device and blank it.
    ///
    /// On failure `file` is closed before the error is returned.
    pub fn from_file(file: File, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let map = unsafe { MmapOptions::new().len(FB_REGION_LEN).map_mut(&file) };
        let mut map = match map {
            Ok(map) => map,
            Err(source) => {
                warn!("mmap of {} failed: {}", path.display(), source);
                drop(file);
                return Err(DeviceError::MapFailed { path, source });
            }
        };

        map.fill(0);
        Ok(Self { map, file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy `src` into the grid with its origin at (`dest_x`, `dest_y`).
    /// Only the overlap with the grid is written.
    pub fn blit(&mut self, src: &PixelBuffer<'_>, dest_x: i32, dest_y: i32) {
        blit::blit(&mut self.map, src, dest_x, dest_y);
    }

    /// `blit` from a bare slice
    pub fn blit_pixels(
        &mut self,
        pixels: &[u16],
        width: usize,
        height: usize,
        dest_x: i32,
        dest_y: i32,
    ) -> Result<()> {
        let src = PixelBuffer::new(pixels, width, height)?;
        self.blit(&src, dest_x, dest_y);
        Ok(())
    }

    /// Set every cell to 0 (all LEDs off)
    pub fn clear(&mut self) {
        self.map.fill(0);
    }

    /// Pixel at (`x`, `y`), or None outside the grid
    pub fn pixel(&self, x: usize, y: usize) -> Option<u16> {
        if x >= GRID_WIDTH || y >= GRID_HEIGHT {
            return None;
        }
        Some(read_cell(&self.map, y * GRID_WIDTH + x))
    }

    /// Write one pixel. Coordinates outside the grid are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: u16) {
        if x < GRID_WIDTH && y < GRID_HEIGHT {
            write_cell(&mut self.map, y * GRID_WIDTH + x, value);
        }
    }

    /// All 64 cells, row-major
    pub fn pixels(&self) -> [u16; GRID_CELLS] {
        let mut out = [0u16; GRID_CELLS];
        for (i, px) in out.iter_mut().enumerate() {
            *px = read_cell(&self.map, i);
        }
        out
    }

    /// Switch between the dimmed and the full brightness gamma table.
    /// Returns whether the driver accepted the request.
    pub fn set_low_light(&self, enabled: bool) -> bool {
        let table = if enabled {
            SENSE_HAT_FB_GAMMA_LOW
        } else {
            SENSE_HAT_FB_GAMMA_DEFAULT
        };
        match ioctl_helpers::fb_reset_gamma(self.file.as_raw_fd(), table) {
            Ok(()) => true,
            Err(e) => {
                warn!("Gamma reset on {} failed: {}", self.path.display(), e);
                false
            }
        }
    }

    /// Current gamma table
    pub fn gamma(&self) -> Result<[u8; GAMMA_TABLE_LEN]> {
        ioctl_helpers::fb_get_gamma(self.file.as_raw_fd())
    }

    /// Install a user gamma table
    pub fn set_gamma(&self, table: &[u8; GAMMA_TABLE_LEN]) -> Result<()> {
        ioctl_helpers::fb_set_gamma(self.file.as_raw_fd(), table)
    }

    /// Write mapped changes through to the device
    pub fn flush(&self) -> Result<()> {
        self.map.flush().map_err(|source| DeviceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Unmap the region, then close the device
    pub fn close(self) {
        let Self { map, file, path } = self;
        drop(map);
        drop(file);
        info!("Closed framebuffer {}", path.display());
    }
}

impl AsFd for Framebuffer {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl AsRawFd for Framebuffer {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("path", &self.path)
            .field("fd", &self.file.as_raw_fd())
            .finish_non_exhaustive()
    }
}
