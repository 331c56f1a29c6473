//! Joystick reads through the public API, with a socket standing in
//! for the event device.

use std::fs::File;
use std::io::Write;
use std::os::unix::io::OwnedFd;
use std::os::unix::net::UnixStream;
use std::time::{Duration, Instant};

use sensehat::constants::EV_KEY;
use sensehat::input::evdev::INPUT_EVENT_SIZE;
use sensehat::{InputDevice, JoystickKey};

fn event(type_: u16, code: u16, value: i32) -> Vec<u8> {
    let ev = libc::input_event {
        time: libc::timeval {
            tv_sec: 0,
            tv_usec: 0,
        },
        type_,
        code,
        value,
    };
    let ptr = &ev as *const libc::input_event as *const u8;
    unsafe { std::slice::from_raw_parts(ptr, INPUT_EVENT_SIZE) }.to_vec()
}

fn joystick() -> (InputDevice, UnixStream) {
    let (reader, writer) = UnixStream::pair().unwrap();
    let device = InputDevice::from_file(
        File::from(OwnedFd::from(reader)),
        "/dev/input/event0",
        "Raspberry Pi Sense HAT Joystick",
    );
    (device, writer)
}

#[test]
fn empty_queue_returns_immediately() {
    let (mut device, _writer) = joystick();
    let start = Instant::now();
    for _ in 0..100 {
        assert_eq!(device.read_event(), None);
    }
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn presses_and_holds_surface_releases_do_not() {
    let (mut device, mut writer) = joystick();
    for (code, value) in [(103, 1), (103, 2), (103, 0), (28, 1), (28, 0)] {
        writer.write_all(&event(EV_KEY, code, value)).unwrap();
    }

    let mut seen = Vec::new();
    for _ in 0..5 {
        if let Some(ev) = device.read_event() {
            seen.push(ev.joystick());
        }
    }
    assert_eq!(
        seen,
        [
            Some(JoystickKey::Up),
            Some(JoystickKey::Up),
            Some(JoystickKey::Enter)
        ]
    );
    assert_eq!(device.read_event(), None);
}
