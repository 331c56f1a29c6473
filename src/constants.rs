//! Global constants for sensehat
//!
//! Hardware geometry, kernel ABI numbers and board driver values
//! gathered in one place so the clipping and decoding code has no
//! magic numbers.

// ============================================================================
// LED Matrix Geometry
// ============================================================================

/// LED matrix width in pixels
pub const GRID_WIDTH: usize = 8;

/// LED matrix height in pixels
pub const GRID_HEIGHT: usize = 8;

/// Number of cells in the matrix
pub const GRID_CELLS: usize = GRID_WIDTH * GRID_HEIGHT;

/// Bytes per pixel (RGB565)
pub const PIXEL_BYTES: usize = 2;

/// Size of the mapped framebuffer region
pub const FB_REGION_LEN: usize = GRID_CELLS * PIXEL_BYTES;

const _: () = assert!(FB_REGION_LEN == 128);

// ============================================================================
// Input Event ABI (<linux/input-event-codes.h>)
// ============================================================================

/// Key/button event type
pub const EV_KEY: u16 = 0x01;

/// Release
pub const KEY_VALUE_RELEASE: i32 = 0;

/// Press
pub const KEY_VALUE_PRESS: i32 = 1;

/// Autorepeat while held
pub const KEY_VALUE_REPEAT: i32 = 2;

/// Highest key code the kernel defines
pub const KEY_MAX: usize = 0x2ff;

/// Bytes needed for one bit per key code in [0, KEY_MAX)
pub const KEY_STATE_BYTES: usize = (KEY_MAX + 7) / 8;

// ============================================================================
// Sense HAT Framebuffer Driver
// ============================================================================

/// Read the 32-entry user gamma table
pub const SENSE_HAT_FB_FBIOGET_GAMMA: libc::c_ulong = 0xF100;

/// Write the 32-entry user gamma table
pub const SENSE_HAT_FB_FBIOSET_GAMMA: libc::c_ulong = 0xF101;

/// Reset gamma to one of the built-in tables
pub const SENSE_HAT_FB_FBIORESET_GAMMA: libc::c_ulong = 0xF102;

/// Built-in full brightness table
pub const SENSE_HAT_FB_GAMMA_DEFAULT: libc::c_int = 0;

/// Built-in dimmed table
pub const SENSE_HAT_FB_GAMMA_LOW: libc::c_int = 1;

/// Entries in a gamma table
pub const GAMMA_TABLE_LEN: usize = 32;

// ============================================================================
// Device Discovery
// ============================================================================

/// Directory holding evdev nodes
pub const DEV_INPUT_EVENT: &str = "/dev/input";

/// evdev node name prefix
pub const EVENT_DEV_NAME: &str = "event";

/// Directory holding fbdev nodes
pub const DEV_FB: &str = "/dev";

/// fbdev node name prefix
pub const FB_DEV_NAME: &str = "fb";

/// Name reported by the joystick driver via EVIOCGNAME
pub const JOYSTICK_DEVICE_NAME: &str = "Raspberry Pi Sense HAT Joystick";

/// `id` reported by the LED matrix driver via FBIOGET_FSCREENINFO
pub const FB_DEVICE_ID: &str = "RPi-Sense FB";

/// Buffer size for EVIOCGNAME
pub const DEVICE_NAME_LEN: usize = 256;
