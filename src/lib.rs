//! sensehat - Raspberry Pi Sense HAT joystick and LED matrix access
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │        Bridge (integer handles)          │
//! ├────────────────────┬─────────────────────┤
//! │  InputDevice       │  Framebuffer        │
//! │  (evdev, poll)     │  (fbdev, mmap)      │
//! │        ↓           │        ↓            │
//! │  KeyStateSnapshot  │  clipped blit       │
//! ├────────────────────┴─────────────────────┤
//! │  device::find_devices / probe (ioctl)    │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Both devices are located by scanning their directory and asking each
//! candidate node for its name. Everything is synchronous; the only
//! wait-like call is a zero-timeout poll when reading joystick events.

pub mod bridge;
pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod fb;
pub mod input;
pub mod utils;

pub use bridge::{Bridge, Handle};
pub use config::DeviceConfig;
pub use error::{DeviceError, DeviceKind, Result};
pub use fb::{Framebuffer, PixelBuffer};
pub use input::{InputDevice, JoystickKey, KeyEvent, KeyStateSnapshot};
