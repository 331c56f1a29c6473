//! Color helpers
//!
//! The LED matrix takes RGB565: 5 bits red, 6 bits green, 5 bits blue.

/// Pack 8-bit channels into an RGB565 pixel
#[inline]
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

/// Expand an RGB565 pixel back to 8-bit channels.
/// Low bits are filled by replicating the high bits.
#[inline]
pub const fn rgb565_to_rgb(px: u16) -> (u8, u8, u8) {
    let r = ((px >> 11) & 0x1f) as u8;
    let g = ((px >> 5) & 0x3f) as u8;
    let b = (px & 0x1f) as u8;
    ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
}

/// Parse `rrggbb` or short `rgb`, with or without a leading `#`.
/// The short form widens each digit (`f` -> `ff`).
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        6 => Some(((value >> 16) as u8, (value >> 8) as u8, value as u8)),
        3 => {
            let widen = |shift: u32| ((value >> shift) & 0xf) as u8 * 0x11;
            Some((widen(8), widen(4), widen(0)))
        }
        _ => None,
    }
}

/// Parse a hex color straight to an LED matrix pixel
pub fn parse_hex_pixel(hex: &str) -> Option<u16> {
    parse_hex_color(hex).map(|(r, g, b)| rgb565(r, g, b))
}
