//! sensehat-probe - check the Sense HAT devices from a shell
//!
//! Lists candidate device nodes, echoes joystick presses and draws a
//! test pattern on the LED matrix.

use anyhow::{Context, Result};
use log::info;
use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::time::Duration;

use sensehat::constants::{GRID_CELLS, GRID_HEIGHT, GRID_WIDTH};
use sensehat::device::{find_devices, ioctl_helpers};
use sensehat::utils::{parse_hex_pixel, rgb565, rgb565_to_rgb};
use sensehat::{DeviceConfig, Framebuffer, InputDevice, JoystickKey};

/// Delay between joystick polls
const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn print_help() {
    println!("sensehat-probe {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("  sensehat-probe [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -l, --list         List candidate nodes and their reported names (default)");
    println!("  -k, --keys         Echo joystick presses until the stick is pushed in");
    println!("  -p, --pattern      Draw a test pattern on the LED matrix");
    println!("  -c, --clear        Turn all LEDs off");
    println!("      --color <HEX>  Fill the matrix with one color (rrggbb or rgb)");
    println!("  -d, --dump         Print the matrix contents as hex colors");
    println!("      --low-light    Select the dimmed gamma table");
    println!("      --full-light   Select the default gamma table");
    println!("  -h, --help         Show this help");
    println!("  -V, --version      Show version");
    println!();
    println!("ENVIRONMENT:");
    println!("  SENSEHAT_INPUT_DIR, SENSEHAT_JOYSTICK_NAME");
    println!("  SENSEHAT_FB_DIR, SENSEHAT_FB_NAME");
    println!("  RUST_LOG (default: warn)");
}

/// Print every candidate node in `dir` with what it reports
fn list_nodes(dir: &Path, prefix: &str, query: impl Fn(&File) -> Option<String>, write: bool) {
    println!("{}/{}*:", dir.display(), prefix);
    let nodes = find_devices(dir, prefix);
    if nodes.is_empty() {
        println!("  (none)");
    }
    for path in nodes {
        let reported = OpenOptions::new()
            .read(true)
            .write(write)
            .open(&path)
            .map_err(|e| e.to_string())
            .map(|file| query(&file).unwrap_or_else(|| "-".to_string()));
        match reported {
            Ok(name) => println!("  {:<24} {}", path.display(), name),
            Err(e) => println!("  {:<24} ({})", path.display(), e),
        }
    }
}

fn list(config: &DeviceConfig) {
    list_nodes(
        &config.input.dir,
        &config.input.prefix,
        |file| ioctl_helpers::input_device_name(file.as_raw_fd()).ok(),
        false,
    );
    list_nodes(
        &config.framebuffer.dir,
        &config.framebuffer.prefix,
        |file| {
            ioctl_helpers::fb_fix_screeninfo(file.as_raw_fd())
                .ok()
                .map(|fix| fix.id())
        },
        true,
    );
}

fn echo_keys(config: &DeviceConfig) -> Result<()> {
    let mut joystick = InputDevice::open_with(&config.input)
        .with_context(|| format!("Cannot open joystick from {}", config.input.dir.display()))?;
    println!("Reading {} (push the stick in to stop)", joystick.path().display());

    loop {
        while let Some(event) = joystick.read_event() {
            let held: Vec<&str> = joystick
                .key_state()
                .pressed()
                .filter_map(JoystickKey::from_code)
                .map(JoystickKey::name)
                .collect();
            match event.joystick() {
                Some(key) => println!("{:<6} held: {:?}", key.name(), held),
                None => println!("code {} held: {:?}", event.code, held),
            }
            if event.joystick() == Some(JoystickKey::Enter) {
                joystick.close();
                return Ok(());
            }
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Hue sweep across columns, fading down the rows
fn test_pattern() -> Vec<u16> {
    let mut pixels = Vec::with_capacity(GRID_WIDTH * GRID_HEIGHT);
    for y in 0..GRID_HEIGHT {
        let level = (255 - y * 28) as u8;
        for x in 0..GRID_WIDTH {
            let t = (x * 255 / (GRID_WIDTH - 1)) as u8;
            let (r, g, b) = match x % 3 {
                0 => (level, t / 2, 0),
                1 => (0, level, t / 2),
                _ => (t / 2, 0, level),
            };
            pixels.push(rgb565(r, g, b));
        }
    }
    pixels
}

/// Parse the `--color` argument
fn fill_color(arg: &str) -> Result<u16> {
    parse_hex_pixel(arg).with_context(|| format!("Invalid color {:?}, expected rrggbb or rgb", arg))
}

/// One line of `#rrggbb` cells per matrix row
fn dump_rows(pixels: &[u16; GRID_CELLS]) -> Vec<String> {
    pixels
        .chunks_exact(GRID_WIDTH)
        .map(|row| {
            row.iter()
                .map(|&px| {
                    let (r, g, b) = rgb565_to_rgb(px);
                    format!("#{:02x}{:02x}{:02x}", r, g, b)
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn open_fb(config: &DeviceConfig) -> Result<Framebuffer> {
    Framebuffer::open_with(&config.framebuffer).with_context(|| {
        format!(
            "Cannot open framebuffer {:?} from {}",
            config.framebuffer.name,
            config.framebuffer.dir.display()
        )
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let has = |names: &[&str]| args.iter().any(|a| names.contains(&a.as_str()));

    if has(&["-h", "--help"]) {
        print_help();
        return Ok(());
    }
    if has(&["-V", "--version"]) {
        println!("sensehat-probe {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = DeviceConfig::from_env();
    info!("Device config: {:?}", config);

    let low_light = has(&["--low-light"]);
    let full_light = has(&["--full-light"]);
    let pattern = has(&["-p", "--pattern"]);
    let clear = has(&["-c", "--clear"]);
    let keys = has(&["-k", "--keys"]);
    let dump = has(&["-d", "--dump"]);
    let color = match args.iter().position(|a| a == "--color") {
        Some(i) => {
            let arg = args.get(i + 1).context("--color needs a value")?;
            Some(fill_color(arg)?)
        }
        None => None,
    };
    let draws = pattern || clear || dump || color.is_some();
    let did_something = low_light || full_light || draws || keys;

    if has(&["-l", "--list"]) || !did_something {
        list(&config);
    }

    if low_light || full_light || draws {
        // opening blanks the display
        let mut fb = open_fb(&config)?;
        if low_light || full_light {
            let ok = fb.set_low_light(low_light);
            println!(
                "gamma {}: {}",
                if low_light { "low" } else { "default" },
                if ok { "ok" } else { "failed" }
            );
        }
        if clear {
            fb.clear();
        }
        if let Some(px) = color {
            fb.blit_pixels(&[px; GRID_CELLS], GRID_WIDTH, GRID_HEIGHT, 0, 0)?;
        }
        if pattern {
            let pixels = test_pattern();
            fb.blit_pixels(&pixels, GRID_WIDTH, GRID_HEIGHT, 0, 0)?;
        }
        fb.flush()?;
        if dump {
            for row in dump_rows(&fb.pixels()) {
                println!("{}", row);
            }
        }
        fb.close();
    }

    if keys {
        echo_keys(&config)?;
    }

    Ok(())
}
