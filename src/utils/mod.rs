//! Utility modules

pub mod color;

pub use color::{parse_hex_color, parse_hex_pixel, rgb565, rgb565_to_rgb};
