//! Joystick key codes
//!
//! The Sense HAT joystick driver reports the five positions as ordinary
//! keyboard codes from <linux/input-event-codes.h>.

/// Enter key (joystick pressed in)
pub const KEY_ENTER: u16 = 28;

/// Up arrow key
pub const KEY_UP: u16 = 103;

/// Left arrow key
pub const KEY_LEFT: u16 = 105;

/// Right arrow key
pub const KEY_RIGHT: u16 = 106;

/// Down arrow key
pub const KEY_DOWN: u16 = 108;

/// One joystick position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoystickKey {
    Up,
    Down,
    Left,
    Right,
    /// Stick pushed straight in
    Enter,
}

impl JoystickKey {
    pub const ALL: [JoystickKey; 5] = [
        JoystickKey::Up,
        JoystickKey::Down,
        JoystickKey::Left,
        JoystickKey::Right,
        JoystickKey::Enter,
    ];

    /// Map an evdev key code to a joystick position
    #[inline]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            KEY_UP => Some(JoystickKey::Up),
            KEY_DOWN => Some(JoystickKey::Down),
            KEY_LEFT => Some(JoystickKey::Left),
            KEY_RIGHT => Some(JoystickKey::Right),
            KEY_ENTER => Some(JoystickKey::Enter),
            _ => None,
        }
    }

    #[inline]
    pub const fn code(self) -> u16 {
        match self {
            JoystickKey::Up => KEY_UP,
            JoystickKey::Down => KEY_DOWN,
            JoystickKey::Left => KEY_LEFT,
            JoystickKey::Right => KEY_RIGHT,
            JoystickKey::Enter => KEY_ENTER,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            JoystickKey::Up => "up",
            JoystickKey::Down => "down",
            JoystickKey::Left => "left",
            JoystickKey::Right => "right",
            JoystickKey::Enter => "enter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_mapping() {
        for key in JoystickKey::ALL {
            assert_eq!(JoystickKey::from_code(key.code()), Some(key));
        }
        assert_eq!(JoystickKey::from_code(KEY_UP), Some(JoystickKey::Up));
        assert_eq!(JoystickKey::from_code(1), None);
    }
}
