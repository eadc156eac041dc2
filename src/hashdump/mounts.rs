//! Mount-point detection.

use std::path::{Path, PathBuf};

/// Default location of the current process's mount table.
const MOUNTINFO_PATH: &str = "/proc/self/mountinfo";

/// Answers whether a directory has a filesystem mounted on it.
pub trait MountTable {
    /// Returns true if `path` is a mount point.
    fn is_mount_point(&self, path: &Path) -> bool;
}

/// Mount table read from `/proc/self/mountinfo`.
///
/// An unreadable table reports no mount points.
#[derive(Debug, Clone)]
pub struct ProcMountInfo {
    path: PathBuf,
}

impl ProcMountInfo {
    /// Creates a reader for the current process's mount table.
    #[must_use]
    pub fn new() -> Self {
        Self::at(MOUNTINFO_PATH)
    }

    /// Creates a reader for a mountinfo-format file at `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcMountInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl MountTable for ProcMountInfo {
    fn is_mount_point(&self, path: &Path) -> bool {
        let table = match std::fs::read_to_string(&self.path) {
            Ok(table) => table,
            Err(e) => {
                tracing::debug!("Cannot read {}: {e}", self.path.display());
                return false;
            }
        };

        let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        is_mount_point(&resolved.to_string_lossy(), &table)
    }
}

/// Returns true if `path` appears as a mount point in `mountinfo`.
///
/// `mountinfo` uses the `/proc/<pid>/mountinfo` format, where the fifth
/// field is the mount point with whitespace escaped as octal (`\040`).
#[must_use]
pub fn is_mount_point(path: &str, mountinfo: &str) -> bool {
    let target = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    mountinfo
        .lines()
        .filter_map(|line| line.split_whitespace().nth(4))
        .any(|mount_point| unescape_octal(mount_point) == target)
}

fn unescape_octal(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(value) = bytes
                .get(i + 1..i + 4)
                .and_then(|digits| std::str::from_utf8(digits).ok())
                .and_then(|digits| u8::from_str_radix(digits, 8).ok())
            {
                out.push(value);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
