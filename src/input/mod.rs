//! Input handling
//!
//! Joystick access through evdev.
//! - Device lookup by driver-reported name
//! - Non-blocking key press reads
//! - Full key state queries decoded from the kernel bitmask

pub mod evdev;
pub mod keycodes;
pub mod keystate;

pub use evdev::{decode_event, InputDevice, KeyEvent};
pub use keycodes::{JoystickKey, KEY_DOWN, KEY_ENTER, KEY_LEFT, KEY_RIGHT, KEY_UP};
pub use keystate::{set_bit, test_bit, KeyStateSnapshot};
