//! evdev joystick access
//!
//! Finds the joystick among /dev/input/eventN by its driver-reported
//! name and reads key presses from it without ever blocking.

use log::{debug, info, warn};
use std::fs::{File, OpenOptions};
use std::io::Read;
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::path::{Path, PathBuf};

use crate::config::InputConfig;
use crate::constants::{
    EV_KEY, KEY_STATE_BYTES, KEY_VALUE_PRESS, KEY_VALUE_RELEASE, KEY_VALUE_REPEAT,
};
use crate::device::{find_devices, ioctl_helpers, probe};
use crate::error::{DeviceError, DeviceKind, Result};
use crate::input::keycodes::JoystickKey;
use crate::input::keystate::KeyStateSnapshot;

/// Size of one `struct input_event` record on this target
pub const INPUT_EVENT_SIZE: usize = std::mem::size_of::<libc::input_event>();

/// A key press or autorepeat. Releases are never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: u16,
}

impl KeyEvent {
    /// Joystick position, if the code is one of the five
    pub fn joystick(&self) -> Option<JoystickKey> {
        JoystickKey::from_code(self.code)
    }
}

/// Decode one raw event record into a press/hold.
///
/// Returns None for non-key events and for releases.
pub fn decode_event(raw: &[u8; INPUT_EVENT_SIZE]) -> Option<KeyEvent> {
    // SAFETY: input_event is plain old data and raw is exactly its size
    let ev: libc::input_event = unsafe { std::ptr::read_unaligned(raw.as_ptr().cast()) };

    if ev.type_ != EV_KEY {
        return None;
    }
    match ev.value {
        KEY_VALUE_PRESS | KEY_VALUE_REPEAT => Some(KeyEvent { code: ev.code }),
        KEY_VALUE_RELEASE => None,
        other => {
            debug!("Ignoring key {} with value {}", ev.code, other);
            None
        }
    }
}

/// Open evdev node, read-only
pub struct InputDevice {
    file: File,
    path: PathBuf,
    name: String,
}

impl InputDevice {
    /// Find and open the device reporting `name` under the default
    /// /dev/input directory
    pub fn open(name: &str) -> Result<Self> {
        let config = InputConfig {
            name: name.to_string(),
            ..InputConfig::default()
        };
        Self::open_with(&config)
    }

    /// Find and open the device described by `config`.
    ///
    /// Every candidate that is opened but does not match is closed
    /// before this returns.
    pub fn open_with(config: &InputConfig) -> Result<Self> {
        let candidates = find_devices(&config.dir, &config.prefix);

        let found = probe(
            &candidates,
            &config.name,
            |path| OpenOptions::new().read(true).open(path),
            |file| ioctl_helpers::input_device_name(file.as_raw_fd()),
        );

        match found {
            Some((file, node)) => {
                info!("Opened input device {:?}: {}", node.reported_name, node.path.display());
                Ok(Self {
                    file,
                    path: node.path,
                    name: node.reported_name,
                })
            }
            None => {
                warn!(
                    "No input device named {:?} in {} ({} candidate(s))",
                    config.name,
                    config.dir.display(),
                    candidates.len()
                );
                Err(DeviceError::NotFound {
                    kind: DeviceKind::Input,
                    name: config.name.clone(),
                })
            }
        }
    }

    /// Wrap an already open event device (e.g. one handed over by a
    /// session manager)
    pub fn from_file(file: File, path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            file,
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name the driver reported when the device was opened
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the next key press or autorepeat, if one is waiting.
    ///
    /// Polls with a zero timeout and returns None straight away when no
    /// data is ready. Otherwise reads exactly one event record; records
    /// that are not key presses/holds also yield None.
    pub fn read_event(&mut self) -> Option<KeyEvent> {
        let mut pfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&mut pfd, 1, 0) };
        if ready <= 0 {
            return None;
        }

        let mut raw = [0u8; INPUT_EVENT_SIZE];
        match self.file.read(&mut raw) {
            Ok(n) if n == INPUT_EVENT_SIZE => decode_event(&raw),
            Ok(0) => None,
            Ok(n) => {
                debug!("Short event read on {}: {} bytes", self.path.display(), n);
                None
            }
            Err(e) => {
                debug!("Event read failed on {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Query which keys are held right now.
    ///
    /// A failed query reports no keys down.
    pub fn key_state(&self) -> KeyStateSnapshot {
        let mut bits = [0u8; KEY_STATE_BYTES];
        match ioctl_helpers::input_key_state(self.file.as_raw_fd(), &mut bits) {
            Ok(()) => KeyStateSnapshot::from_bytes(bits),
            Err(e) => {
                warn!("Key state query on {} failed: {}", self.path.display(), e);
                KeyStateSnapshot::empty()
            }
        }
    }

    /// Is `code` held right now
    pub fn is_key_down(&self, code: u16) -> bool {
        self.key_state().is_down(code)
    }

    /// All held key codes, ascending
    pub fn pressed_keys(&self) -> Vec<u16> {
        self.key_state().pressed().collect()
    }

    /// Release the device
    pub fn close(self) {
        info!("Closing input device {}", self.path.display());
    }
}

impl AsFd for InputDevice {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl AsRawFd for InputDevice {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl std::fmt::Debug for InputDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputDevice")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("fd", &self.file.as_raw_fd())
            .finish()
    }
}
