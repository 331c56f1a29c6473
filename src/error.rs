//! Error types for device access
//!
//! Every failure the accessors can report. Callers on the scripting side
//! never see these directly; the bridge folds them into sentinel values.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which device class a lookup was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// evdev node under /dev/input
    Input,
    /// fbdev node under /dev
    Framebuffer,
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceKind::Input => f.write_str("input device"),
            DeviceKind::Framebuffer => f.write_str("framebuffer device"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeviceError {
    /// No enumerated node reported the requested name
    #[error("{kind} {name:?} not found")]
    NotFound { kind: DeviceKind, name: String },

    /// The device opened but its memory could not be mapped.
    /// The descriptor has already been closed when this is returned.
    #[error("cannot map {}: {source}", .path.display())]
    MapFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An ioctl returned an error
    #[error("{name} failed: {source}")]
    ControlCall {
        name: &'static str,
        #[source]
        source: nix::Error,
    },

    /// Plain I/O failure on an already opened device, such as
    /// syncing the mapped region
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Pixel slice is shorter than width * height
    #[error("pixel buffer holds {len} pixels, too few for {width}x{height}")]
    BufferSize {
        len: usize,
        width: usize,
        height: usize,
    },
}

impl DeviceError {
    /// True for the "feature unavailable" case
    pub fn is_not_found(&self) -> bool {
        matches!(self, DeviceError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DeviceError::NotFound {
            kind: DeviceKind::Framebuffer,
            name: "RPi-Sense FB".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "framebuffer device \"RPi-Sense FB\" not found");
    }

    #[test]
    fn test_buffer_size_message() {
        let err = DeviceError::BufferSize {
            len: 3,
            width: 2,
            height: 2,
        };
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "pixel buffer holds 3 pixels, too few for 2x2");
    }

    #[test]
    fn test_io_message_names_path() {
        let err = DeviceError::Io {
            path: PathBuf::from("/dev/fb1"),
            source: io::Error::from(io::ErrorKind::InvalidInput),
        };
        assert!(err.to_string().starts_with("I/O error on /dev/fb1: "));
    }
}
