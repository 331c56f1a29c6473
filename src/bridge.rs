//! Call surface for an embedding runtime
//!
//! A scripting host only deals in integers, booleans and byte strings.
//! `Bridge` owns every device opened through it and hands out integer
//! handles; every failure comes back as a sentinel (`None`, `false`,
//! an empty list) and is logged instead of propagated.

use log::{debug, warn};
use std::collections::HashMap;

use crate::config::DeviceConfig;
use crate::constants::PIXEL_BYTES;
use crate::fb::{Framebuffer, PixelBuffer};
use crate::input::InputDevice;

/// Integer handle for a device opened through the bridge. Never reused.
pub type Handle = i32;

/// Device table shared with the embedding runtime
pub struct Bridge {
    config: DeviceConfig,
    inputs: HashMap<Handle, InputDevice>,
    framebuffers: HashMap<Handle, Framebuffer>,
    next_handle: Handle,
}

impl Bridge {
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            inputs: HashMap::new(),
            framebuffers: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Bridge using `DeviceConfig::from_env()`
    pub fn from_env() -> Self {
        Self::new(DeviceConfig::from_env())
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Next unused handle, or None once the handle space is spent
    fn allocate(&mut self) -> Option<Handle> {
        let handle = self.next_handle;
        match handle.checked_add(1) {
            Some(next) => {
                self.next_handle = next;
                Some(handle)
            }
            None => {
                warn!("Out of device handles");
                None
            }
        }
    }

    /// Take ownership of an already open input device.
    /// The device is closed if no handle is left for it.
    pub fn adopt_input(&mut self, device: InputDevice) -> Option<Handle> {
        let handle = self.allocate()?;
        self.inputs.insert(handle, device);
        Some(handle)
    }

    /// Take ownership of an already mapped framebuffer.
    /// The framebuffer is closed if no handle is left for it.
    pub fn adopt_framebuffer(&mut self, fb: Framebuffer) -> Option<Handle> {
        let handle = self.allocate()?;
        self.framebuffers.insert(handle, fb);
        Some(handle)
    }

    /// Open the input device reporting `name`
    pub fn input_open(&mut self, name: &str) -> Option<Handle> {
        let mut config = self.config.input.clone();
        config.name = name.to_string();

        match InputDevice::open_with(&config) {
            Ok(device) => self.adopt_input(device),
            Err(e) => {
                warn!("input_open({:?}): {}", name, e);
                None
            }
        }
    }

    pub fn input_close(&mut self, handle: Handle) -> bool {
        match self.inputs.remove(&handle) {
            Some(device) => {
                device.close();
                true
            }
            None => {
                debug!("input_close: unknown handle {}", handle);
                false
            }
        }
    }

    /// Next key press/hold code, if one is waiting
    pub fn input_read(&mut self, handle: Handle) -> Option<i32> {
        let device = self.inputs.get_mut(&handle)?;
        device.read_event().map(|ev| i32::from(ev.code))
    }

    /// Every key held right now, ascending
    pub fn input_keys(&self, handle: Handle) -> Vec<i32> {
        match self.inputs.get(&handle) {
            Some(device) => device.key_state().pressed().map(i32::from).collect(),
            None => Vec::new(),
        }
    }

    pub fn input_key_down(&self, handle: Handle, key: i32) -> bool {
        let Ok(code) = u16::try_from(key) else {
            return false;
        };
        self.inputs
            .get(&handle)
            .map_or(false, |device| device.is_key_down(code))
    }

    /// Open and map the framebuffer whose id is `name`
    pub fn fb_open(&mut self, name: &str) -> Option<Handle> {
        let mut config = self.config.framebuffer.clone();
        config.name = name.to_string();

        match Framebuffer::open_with(&config) {
            Ok(fb) => self.adopt_framebuffer(fb),
            Err(e) => {
                warn!("fb_open({:?}): {}", name, e);
                None
            }
        }
    }

    pub fn fb_close(&mut self, handle: Handle) -> bool {
        match self.framebuffers.remove(&handle) {
            Some(fb) => {
                fb.close();
                true
            }
            None => {
                debug!("fb_close: unknown handle {}", handle);
                false
            }
        }
    }

    /// Blit a `width` × `height` image given as native-endian RGB565 bytes
    pub fn fb_blit(
        &mut self,
        handle: Handle,
        bytes: &[u8],
        width: i32,
        height: i32,
        dest_x: i32,
        dest_y: i32,
    ) -> bool {
        let Some(fb) = self.framebuffers.get_mut(&handle) else {
            debug!("fb_blit: unknown handle {}", handle);
            return false;
        };
        let (Ok(width), Ok(height)) = (usize::try_from(width), usize::try_from(height)) else {
            return false;
        };

        let pixels: Vec<u16> = bytes
            .chunks_exact(PIXEL_BYTES)
            .map(|px| u16::from_ne_bytes([px[0], px[1]]))
            .collect();

        match PixelBuffer::new(&pixels, width, height) {
            Ok(src) => {
                fb.blit(&src, dest_x, dest_y);
                true
            }
            Err(e) => {
                warn!("fb_blit: {}", e);
                false
            }
        }
    }

    pub fn fb_low_light(&self, handle: Handle, enabled: bool) -> bool {
        self.framebuffers
            .get(&handle)
            .map_or(false, |fb| fb.set_low_light(enabled))
    }

    /// Read back the grid, row-major
    pub fn fb_pixels(&self, handle: Handle) -> Option<Vec<u16>> {
        self.framebuffers.get(&handle).map(|fb| fb.pixels().to_vec())
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(DeviceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FramebufferConfig, InputConfig};
    use crate::constants::{EV_KEY, FB_REGION_LEN};
    use crate::input::evdev::tests::event_bytes;
    use std::fs::{File, OpenOptions};
    use std::io::{Seek, SeekFrom, Write};

    fn empty_dir_config(dir: &std::path::Path) -> DeviceConfig {
        DeviceConfig {
            input: InputConfig {
                dir: dir.to_path_buf(),
                ..InputConfig::default()
            },
            framebuffer: FramebufferConfig {
                dir: dir.to_path_buf(),
                ..FramebufferConfig::default()
            },
        }
    }

    fn mapped_fb(backing: &tempfile::NamedTempFile) -> Framebuffer {
        backing.as_file().set_len(FB_REGION_LEN as u64).unwrap();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(backing.path())
            .unwrap();
        Framebuffer::from_file(file, backing.path()).unwrap()
    }

    #[test]
    fn test_open_failures_are_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut bridge = Bridge::new(empty_dir_config(dir.path()));
        assert_eq!(bridge.input_open("Raspberry Pi Sense HAT Joystick"), None);
        assert_eq!(bridge.fb_open("RPi-Sense FB"), None);
    }

    #[test]
    fn test_unknown_handles() {
        let mut bridge = Bridge::default();
        assert_eq!(bridge.input_read(7), None);
        assert!(bridge.input_keys(7).is_empty());
        assert!(!bridge.input_key_down(7, 103));
        assert!(!bridge.input_close(7));
        assert!(!bridge.fb_blit(7, &[0, 0], 1, 1, 0, 0));
        assert!(!bridge.fb_low_light(7, true));
        assert!(!bridge.fb_close(7));
        assert_eq!(bridge.fb_pixels(7), None);
    }

    #[test]
    fn test_input_roundtrip() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(&event_bytes(EV_KEY, 106, 1)).unwrap();
        file.write_all(&event_bytes(EV_KEY, 106, 0)).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        let mut bridge = Bridge::default();
        let handle = bridge
            .adopt_input(InputDevice::from_file(file, "recorded", "joystick"))
            .unwrap();

        assert_eq!(bridge.input_read(handle), Some(106));
        assert_eq!(bridge.input_read(handle), None);
        // key state query fails on a plain file and reports nothing held
        assert!(bridge.input_keys(handle).is_empty());
        assert!(!bridge.input_key_down(handle, 106));
        assert!(!bridge.input_key_down(handle, -1));
        assert!(bridge.input_close(handle));
        assert!(!bridge.input_close(handle));
    }

    #[test]
    fn test_fb_blit_bytes() {
        let backing = tempfile::NamedTempFile::new().unwrap();
        let mut bridge = Bridge::default();
        let handle = bridge.adopt_framebuffer(mapped_fb(&backing)).unwrap();

        let bytes: Vec<u8> = [0xF800u16, 0x07E0]
            .iter()
            .flat_map(|px| px.to_ne_bytes())
            .collect();
        assert!(bridge.fb_blit(handle, &bytes, 2, 1, 6, 7));
        let pixels = bridge.fb_pixels(handle).unwrap();
        assert_eq!(pixels[7 * 8 + 6], 0xF800);
        assert_eq!(pixels[7 * 8 + 7], 0x07E0);

        // too few bytes, negative size
        assert!(!bridge.fb_blit(handle, &bytes, 2, 2, 0, 0));
        assert!(!bridge.fb_blit(handle, &bytes, -1, 1, 0, 0));
        assert!(!bridge.fb_low_light(handle, true));
        assert!(bridge.fb_close(handle));
        assert_eq!(bridge.fb_pixels(handle), None);
    }

    #[test]
    fn test_handles_are_distinct() {
        let a = tempfile::NamedTempFile::new().unwrap();
        let b = tempfile::NamedTempFile::new().unwrap();
        let mut bridge = Bridge::default();
        let ha = bridge.adopt_framebuffer(mapped_fb(&a)).unwrap();
        let hi = bridge
            .adopt_input(InputDevice::from_file(
                File::open(b.path()).unwrap(),
                b.path(),
                "joystick",
            ))
            .unwrap();
        assert_ne!(ha, hi);
        assert!(bridge.fb_close(ha));
        let hb = bridge.adopt_framebuffer(mapped_fb(&b)).unwrap();
        assert_ne!(ha, hb);
    }

    #[test]
    fn test_handle_space_exhausted() {
        let backing = tempfile::NamedTempFile::new().unwrap();
        let mut bridge = Bridge::default();
        bridge.next_handle = Handle::MAX - 1;

        let last = bridge.adopt_framebuffer(mapped_fb(&backing)).unwrap();
        assert_eq!(last, Handle::MAX - 1);
        assert_eq!(bridge.adopt_framebuffer(mapped_fb(&backing)), None);
        assert_eq!(
            bridge.adopt_input(InputDevice::from_file(
                File::open(backing.path()).unwrap(),
                backing.path(),
                "joystick",
            )),
            None
        );

        // existing handles keep working
        assert!(bridge.fb_blit(last, &0x07E0u16.to_ne_bytes(), 1, 1, 0, 0));
        assert_eq!(bridge.fb_pixels(last).unwrap()[0], 0x07E0);
        assert!(bridge.fb_close(last));
    }
}
