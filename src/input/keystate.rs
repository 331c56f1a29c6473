//! Key state bitmask decoding
//!
//! EVIOCGKEY fills a packed array with one bit per key code: code `k`
//! lives in byte `k >> 3` at bit `k & 7`.

use crate::constants::{KEY_MAX, KEY_STATE_BYTES};

/// Test one bit of a packed key bitmask. Bits past the end read as clear.
#[inline]
pub fn test_bit(bits: &[u8], bit: usize) -> bool {
    bits.get(bit >> 3)
        .map_or(false, |byte| byte & (1 << (bit & 0x07)) != 0)
}

/// Set one bit of a packed key bitmask. Bits past the end are ignored.
#[inline]
pub fn set_bit(bits: &mut [u8], bit: usize) {
    if let Some(byte) = bits.get_mut(bit >> 3) {
        *byte |= 1 << (bit & 0x07);
    }
}

/// Keys held down at the moment of one EVIOCGKEY query
#[derive(Clone, PartialEq, Eq)]
pub struct KeyStateSnapshot {
    bits: [u8; KEY_STATE_BYTES],
}

impl KeyStateSnapshot {
    /// No keys down
    pub fn empty() -> Self {
        Self {
            bits: [0; KEY_STATE_BYTES],
        }
    }

    pub fn from_bytes(bits: [u8; KEY_STATE_BYTES]) -> Self {
        Self { bits }
    }

    /// Snapshot with exactly the given codes down
    pub fn from_codes(codes: impl IntoIterator<Item = u16>) -> Self {
        let mut snapshot = Self::empty();
        for code in codes {
            if usize::from(code) < KEY_MAX {
                set_bit(&mut snapshot.bits, usize::from(code));
            }
        }
        snapshot
    }

    pub fn as_bytes(&self) -> &[u8; KEY_STATE_BYTES] {
        &self.bits
    }

    pub fn is_down(&self, code: u16) -> bool {
        usize::from(code) < KEY_MAX && test_bit(&self.bits, usize::from(code))
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// Held key codes in ascending order
    pub fn pressed(&self) -> impl Iterator<Item = u16> + '_ {
        (0..KEY_MAX)
            .filter(move |&k| test_bit(&self.bits, k))
            .map(|k| k as u16)
    }
}

impl Default for KeyStateSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for KeyStateSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.pressed()).finish()
    }
}
