//! Character device discovery and control calls

pub mod enumerate;
pub mod ioctl_helpers;

pub use enumerate::{find_devices, probe, version_cmp, CandidateNode};
pub use ioctl_helpers::FbFixScreeninfo;
