//! LED matrix output
//!
//! Memory-mapped access to the 8×8 Sense HAT framebuffer.

pub mod blit;
pub mod framebuffer;

pub use blit::PixelBuffer;
pub use framebuffer::Framebuffer;
