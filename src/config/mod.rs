//! Device lookup settings
//!
//! There is no config file. Defaults match the real board, and each field
//! can be overridden from the environment so the accessors can be pointed
//! at another directory (a test fixture, a board with renamed drivers).

use log::info;
use std::path::PathBuf;

use crate::constants::{
    DEV_FB, DEV_INPUT_EVENT, EVENT_DEV_NAME, FB_DEVICE_ID, FB_DEV_NAME, JOYSTICK_DEVICE_NAME,
};

/// Environment variable overriding the evdev directory
pub const ENV_INPUT_DIR: &str = "SENSEHAT_INPUT_DIR";

/// Environment variable overriding the fbdev directory
pub const ENV_FB_DIR: &str = "SENSEHAT_FB_DIR";

/// Environment variable overriding the joystick name
pub const ENV_JOYSTICK_NAME: &str = "SENSEHAT_JOYSTICK_NAME";

/// Environment variable overriding the framebuffer id
pub const ENV_FB_NAME: &str = "SENSEHAT_FB_NAME";

/// Where to look for the two devices and what they call themselves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Input settings
    pub input: InputConfig,
    /// Framebuffer settings
    pub framebuffer: FramebufferConfig,
}

/// Joystick lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    /// Directory scanned for event nodes
    pub dir: PathBuf,
    /// Node name prefix ("event")
    pub prefix: String,
    /// Name the driver reports via EVIOCGNAME
    pub name: String,
}

/// LED matrix lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferConfig {
    /// Directory scanned for fb nodes
    pub dir: PathBuf,
    /// Node name prefix ("fb")
    pub prefix: String,
    /// `id` the driver reports via FBIOGET_FSCREENINFO
    pub name: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEV_INPUT_EVENT),
            prefix: EVENT_DEV_NAME.to_string(),
            name: JOYSTICK_DEVICE_NAME.to_string(),
        }
    }
}

impl Default for FramebufferConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEV_FB),
            prefix: FB_DEV_NAME.to_string(),
            name: FB_DEVICE_ID.to_string(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            framebuffer: FramebufferConfig::default(),
        }
    }
}

impl DeviceConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(dir) = get(ENV_INPUT_DIR) {
            info!("Input directory override: {}", dir);
            cfg.input.dir = PathBuf::from(dir);
        }
        if let Some(name) = get(ENV_JOYSTICK_NAME) {
            info!("Joystick name override: {}", name);
            cfg.input.name = name;
        }
        if let Some(dir) = get(ENV_FB_DIR) {
            info!("Framebuffer directory override: {}", dir);
            cfg.framebuffer.dir = PathBuf::from(dir);
        }
        if let Some(name) = get(ENV_FB_NAME) {
            info!("Framebuffer name override: {}", name);
            cfg.framebuffer.name = name;
        }

        cfg
    }
}
