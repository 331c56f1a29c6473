//! Device node discovery
//!
//! Lists candidate nodes in a device directory in a stable order and
//! probes them one by one until a node identifies itself with the
//! wanted name. Rejected nodes are dropped (and so closed) before the
//! next one is tried.

use log::debug;
use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A probed node and the name it reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateNode {
    pub path: PathBuf,
    pub reported_name: String,
}

/// List nodes in `dir` whose file name matches `prefix`, in version order.
///
/// Only the leading `prefix.len() - 1` characters are compared, so
/// "event" accepts anything starting with "even". An unreadable
/// directory yields an empty list.
pub fn find_devices(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let stem = prefix_stem(prefix);

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot scan {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(stem))
        .collect();
    names.sort_by(|a, b| version_cmp(a, b));

    debug!(
        "{} candidate(s) for {:?} in {}: {:?}",
        names.len(),
        prefix,
        dir.display(),
        names
    );

    names.into_iter().map(|name| dir.join(name)).collect()
}

/// `prefix` without its final character
fn prefix_stem(prefix: &str) -> &str {
    let mut chars = prefix.chars();
    chars.next_back();
    chars.as_str()
}

/// Version-aware string comparison.
///
/// Runs of ASCII digits compare by numeric value, so "event2" sorts
/// before "event10". Equal values with more leading zeros sort first.
pub fn version_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.as_bytes();
    let mut b = b.as_bytes();

    loop {
        match (a.first(), b.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (num_a, rest_a) = split_digits(a);
                let (num_b, rest_b) = split_digits(b);
                let ord = cmp_numeric(num_a, num_b);
                if ord != Ordering::Equal {
                    return ord;
                }
                a = rest_a;
                b = rest_b;
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(y);
                }
                a = &a[1..];
                b = &b[1..];
            }
        }
    }
}

fn split_digits(s: &[u8]) -> (&[u8], &[u8]) {
    let n = s.iter().take_while(|c| c.is_ascii_digit()).count();
    s.split_at(n)
}

fn cmp_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let trim = |s: &[u8]| -> usize { s.iter().take_while(|&&c| c == b'0').count() };
    let va = &a[trim(a)..];
    let vb = &b[trim(b)..];

    va.len()
        .cmp(&vb.len())
        .then_with(|| va.cmp(vb))
        .then_with(|| b.len().cmp(&a.len()))
}

/// Open each candidate in turn and keep the first whose reported name
/// equals `wanted`.
///
/// Nodes that fail to open are skipped. Nodes that cannot report a name,
/// or report a different one, are dropped before moving on, so at most
/// one opened device survives this call.
pub fn probe<T, O, I>(
    candidates: &[PathBuf],
    wanted: &str,
    mut open: O,
    mut identify: I,
) -> Option<(T, CandidateNode)>
where
    O: FnMut(&Path) -> io::Result<T>,
    I: FnMut(&T) -> Result<String>,
{
    for path in candidates {
        let device = match open(path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        match identify(&device) {
            Ok(reported_name) if reported_name == wanted => {
                return Some((
                    device,
                    CandidateNode {
                        path: path.clone(),
                        reported_name,
                    },
                ));
            }
            Ok(reported_name) => {
                debug!("Rejected {}: reports {:?}", path.display(), reported_name);
            }
            Err(e) => {
                debug!("Rejected {}: {}", path.display(), e);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeviceError;
    use std::cell::Cell;
    use std::fs::File;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_version_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["event2", "event10", "event1"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let found = find_devices(dir.path(), "event");
        assert_eq!(names(&found), ["event1", "event2", "event10"]);
        assert!(found.iter().all(|p| p.starts_with(dir.path())));
    }

    #[test]
    fn test_prefix_ignores_last_char() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["fb0", "fb1", "full", "mem", "tty0"] {
            File::create(dir.path().join(name)).unwrap();
        }
        assert_eq!(names(&find_devices(dir.path(), "fb")), ["fb0", "fb1", "full"]);

        for name in ["eventX", "evens", "mice"] {
            File::create(dir.path().join(name)).unwrap();
        }
        assert_eq!(names(&find_devices(dir.path(), "event")), ["evens", "eventX"]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_devices(&dir.path().join("nope"), "event").is_empty());
        assert!(find_devices(dir.path(), "event").is_empty());
    }

    #[test]
    fn test_version_cmp() {
        assert_eq!(version_cmp("event2", "event10"), Ordering::Less);
        assert_eq!(version_cmp("event10", "event9"), Ordering::Greater);
        assert_eq!(version_cmp("fb0", "fb0"), Ordering::Equal);
        assert_eq!(version_cmp("fb", "fb0"), Ordering::Less);
        assert_eq!(version_cmp("event01", "event1"), Ordering::Less);
        assert_eq!(version_cmp("a1b2", "a1b10"), Ordering::Less);
        assert_eq!(version_cmp("abc", "abd"), Ordering::Less);
    }

    struct Tracked<'a> {
        name: &'static str,
        live: &'a Cell<usize>,
    }

    impl Drop for Tracked<'_> {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    #[test]
    fn test_probe_keeps_first_match_and_drops_rest() {
        let live = Cell::new(0);
        let paths: Vec<PathBuf> = ["a", "b", "c", "d"].iter().map(PathBuf::from).collect();
        let reported = |p: &Path| match p.to_str().unwrap() {
            "a" => "mouse",
            "b" => "joystick",
            "c" => "joystick",
            _ => "keyboard",
        };

        let found = probe(
            &paths,
            "joystick",
            |p| {
                live.set(live.get() + 1);
                Ok(Tracked {
                    name: reported(p),
                    live: &live,
                })
            },
            |t| Ok(t.name.to_string()),
        );

        let (device, node) = found.unwrap();
        assert_eq!(node.path, PathBuf::from("b"));
        assert_eq!(node.reported_name, "joystick");
        // "a" was opened and dropped; "c" and "d" never opened
        assert_eq!(live.get(), 1);
        drop(device);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_probe_no_match_closes_everything() {
        let live = Cell::new(0);
        let paths: Vec<PathBuf> = ["a", "b", "c"].iter().map(PathBuf::from).collect();

        let found = probe(
            &paths,
            "joystick",
            |p| {
                if p == Path::new("b") {
                    return Err(io::Error::from(io::ErrorKind::PermissionDenied));
                }
                live.set(live.get() + 1);
                Ok(Tracked {
                    name: "other",
                    live: &live,
                })
            },
            |t| {
                if t.name == "other" {
                    Err(DeviceError::ControlCall {
                        name: "EVIOCGNAME",
                        source: nix::Error::ENOTTY,
                    })
                } else {
                    Ok(t.name.to_string())
                }
            },
        );

        assert!(found.is_none());
        assert_eq!(live.get(), 0);
    }
}
