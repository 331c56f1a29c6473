//! Independently opened framebuffers do not affect each other.

use std::fs::OpenOptions;
use std::path::Path;

use sensehat::constants::{FB_REGION_LEN, GRID_CELLS};
use sensehat::{Framebuffer, PixelBuffer};

fn backing_file() -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    file.as_file().set_len(FB_REGION_LEN as u64).unwrap();
    file
}

fn map(path: &Path) -> Framebuffer {
    let file = OpenOptions::new().read(true).write(true).open(path).unwrap();
    Framebuffer::from_file(file, path).unwrap()
}

#[test]
fn closing_one_framebuffer_leaves_the_other_intact() {
    let _ = env_logger::builder().is_test(true).try_init();

    let a_file = backing_file();
    let b_file = backing_file();
    let mut a = map(a_file.path());
    let mut b = map(b_file.path());

    let red = [0xF800u16; GRID_CELLS];
    let blue = [0x001Fu16; 4];
    a.blit(&PixelBuffer::new(&red, 8, 8).unwrap(), 0, 0);
    b.blit(&PixelBuffer::new(&blue, 2, 2).unwrap(), 3, 3);

    a.close();

    let pixels = b.pixels();
    for y in 0..8 {
        for x in 0..8 {
            let expected = if (3..5).contains(&x) && (3..5).contains(&y) {
                0x001F
            } else {
                0
            };
            assert_eq!(pixels[y * 8 + x], expected);
        }
    }

    // still writable after the other mapping is gone
    b.set_pixel(0, 0, 0x07E0);
    assert_eq!(b.pixel(0, 0), Some(0x07E0));
    b.close();

    let a_bytes = std::fs::read(a_file.path()).unwrap();
    assert!(a_bytes
        .chunks_exact(2)
        .all(|px| u16::from_ne_bytes([px[0], px[1]]) == 0xF800));
}

#[test]
fn grid_clipping_against_device_memory() {
    let file = backing_file();
    let mut fb = map(file.path());

    let source: Vec<u16> = (1..=64).collect();
    fb.blit_pixels(&source, 8, 8, -2, 0).unwrap();

    for y in 0..8 {
        for x in 0..6 {
            assert_eq!(fb.pixel(x, y), Some(source[y * 8 + x + 2]));
        }
        assert_eq!(fb.pixel(6, y), Some(0));
        assert_eq!(fb.pixel(7, y), Some(0));
    }
    fb.close();
}
