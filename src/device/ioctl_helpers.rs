//! Safe wrappers for the device control calls
//!
//! The raw ioctls are generated with nix's macros. Each wrapper owns the
//! buffer it hands to the kernel and attaches the call name to any error,
//! so the accessors stay free of unsafe blocks.

use std::os::unix::io::RawFd;

use crate::constants::{
    DEVICE_NAME_LEN, GAMMA_TABLE_LEN, KEY_STATE_BYTES, SENSE_HAT_FB_FBIOGET_GAMMA,
    SENSE_HAT_FB_FBIORESET_GAMMA, SENSE_HAT_FB_FBIOSET_GAMMA,
};
use crate::error::{DeviceError, Result};

const EVIO_IOC_MAGIC: u8 = b'E';
const EVIOCGNAME: u8 = 0x06;
const EVIOCGKEY: u8 = 0x18;

/// Legacy fbdev request number (no direction/size encoding)
const FBIOGET_FSCREENINFO: libc::c_ulong = 0x4602;

nix::ioctl_read_buf!(evdev_get_name, EVIO_IOC_MAGIC, EVIOCGNAME, u8);
nix::ioctl_read_buf!(evdev_get_key_state, EVIO_IOC_MAGIC, EVIOCGKEY, u8);
nix::ioctl_read_bad!(fb_get_fix_screeninfo, FBIOGET_FSCREENINFO, FbFixScreeninfo);
nix::ioctl_read_bad!(sense_hat_get_gamma, SENSE_HAT_FB_FBIOGET_GAMMA, [u8; GAMMA_TABLE_LEN]);
nix::ioctl_write_ptr_bad!(sense_hat_set_gamma, SENSE_HAT_FB_FBIOSET_GAMMA, [u8; GAMMA_TABLE_LEN]);
nix::ioctl_write_int_bad!(sense_hat_reset_gamma, SENSE_HAT_FB_FBIORESET_GAMMA);

/// `struct fb_fix_screeninfo` from <linux/fb.h>
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FbFixScreeninfo {
    pub id: [u8; 16],
    pub smem_start: libc::c_ulong,
    pub smem_len: u32,
    pub type_: u32,
    pub type_aux: u32,
    pub visual: u32,
    pub xpanstep: u16,
    pub ypanstep: u16,
    pub ywrapstep: u16,
    pub line_length: u32,
    pub mmio_start: libc::c_ulong,
    pub mmio_len: u32,
    pub accel: u32,
    pub capabilities: u16,
    pub reserved: [u16; 2],
}

impl FbFixScreeninfo {
    /// Driver identifier, up to the first NUL
    pub fn id(&self) -> String {
        c_str_field(&self.id)
    }
}

/// Decode a fixed-size, NUL-padded kernel string field.
///
/// A field that fills the whole buffer without a terminator is taken
/// in full.
pub fn c_str_field(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Run a raw control call and name it in the error.
fn control<T>(name: &'static str, call: impl FnOnce() -> nix::Result<T>) -> Result<T> {
    call().map_err(|source| DeviceError::ControlCall { name, source })
}

/// EVIOCGNAME: human-readable device name
pub fn input_device_name(fd: RawFd) -> Result<String> {
    let mut buf = [0u8; DEVICE_NAME_LEN];
    control("EVIOCGNAME", || unsafe { evdev_get_name(fd, &mut buf) })?;
    Ok(c_str_field(&buf))
}

/// EVIOCGKEY: one bit per key code, set while held.
///
/// `buf` is zeroed first so bits the kernel does not write stay clear.
pub fn input_key_state(fd: RawFd, buf: &mut [u8; KEY_STATE_BYTES]) -> Result<()> {
    buf.fill(0);
    control("EVIOCGKEY", || unsafe { evdev_get_key_state(fd, &mut buf[..]) })?;
    Ok(())
}

/// FBIOGET_FSCREENINFO
pub fn fb_fix_screeninfo(fd: RawFd) -> Result<FbFixScreeninfo> {
    let mut info = FbFixScreeninfo::default();
    control("FBIOGET_FSCREENINFO", || unsafe {
        fb_get_fix_screeninfo(fd, &mut info)
    })?;
    Ok(info)
}

/// Select one of the driver's built-in gamma tables
pub fn fb_reset_gamma(fd: RawFd, table: libc::c_int) -> Result<()> {
    control("SENSE_HAT_FB_FBIORESET_GAMMA", || unsafe {
        sense_hat_reset_gamma(fd, table)
    })?;
    Ok(())
}

/// Read the current gamma table
pub fn fb_get_gamma(fd: RawFd) -> Result<[u8; GAMMA_TABLE_LEN]> {
    let mut table = [0u8; GAMMA_TABLE_LEN];
    control("SENSE_HAT_FB_FBIOGET_GAMMA", || unsafe {
        sense_hat_get_gamma(fd, &mut table)
    })?;
    Ok(table)
}

/// Install a user gamma table
pub fn fb_set_gamma(fd: RawFd, table: &[u8; GAMMA_TABLE_LEN]) -> Result<()> {
    control("SENSE_HAT_FB_FBIOSET_GAMMA", || unsafe {
        sense_hat_set_gamma(fd, table)
    })?;
    Ok(())
}
