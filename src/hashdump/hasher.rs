//! Content hashing of filesystem entries.

use std::fmt;
use std::fs::{self, File, Metadata};
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::xattrs;

/// Hash of one filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHash {
    /// Lowercase hex digest.
    pub hash: String,
    /// True if the entry is a directory.
    pub is_dir: bool,
}

/// Computes manifest hashes.
pub trait FileHasher {
    /// Hashes the entry at `path` without following a final symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry or its attributes cannot be read.
    fn hash(&self, path: &Path, use_xattrs: bool) -> io::Result<FileHash>;
}

/// SHA-256 hasher over an entry's metadata header, payload and attributes.
///
/// The header covers type, mode, owner and size. The payload is the file
/// contents for regular files and the link target for symlinks; directories
/// have none. Extended attributes are folded in sorted by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl EntryKind {
    fn of(meta: &Metadata) -> Self {
        let file_type = meta.file_type();
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Directory => "dir",
            Self::Symlink => "link",
            Self::Other => "other",
        })
    }
}

impl FileHasher for Sha256Hasher {
    fn hash(&self, path: &Path, use_xattrs: bool) -> io::Result<FileHash> {
        let meta = fs::symlink_metadata(path)?;
        let kind = EntryKind::of(&meta);

        let mut hasher = Sha256::new();
        hasher.update(header(&meta, kind).as_bytes());

        match kind {
            EntryKind::File => {
                let mut file = File::open(path)?;
                io::copy(&mut file, &mut hasher)?;
            }
            EntryKind::Symlink => {
                let target = fs::read_link(path)?;
                hasher.update(target.as_os_str().as_encoded_bytes());
            }
            EntryKind::Directory | EntryKind::Other => {}
        }

        if use_xattrs {
            for (name, value) in xattrs::read_all(path)? {
                hasher.update(&name);
                hasher.update(&value);
            }
        }

        Ok(FileHash {
            hash: format!("{:x}", hasher.finalize()),
            is_dir: kind == EntryKind::Directory,
        })
    }
}

// Directory sizes depend on the filesystem, so they hash as zero.
#[cfg(unix)]
fn header(meta: &Metadata, kind: EntryKind) -> String {
    use std::os::unix::fs::MetadataExt;

    let size = if kind == EntryKind::Directory {
        0
    } else {
        meta.size()
    };
    format!("{kind}:{:o}:{}:{}:{size}", meta.mode(), meta.uid(), meta.gid())
}

#[cfg(not(unix))]
fn header(meta: &Metadata, kind: EntryKind) -> String {
    let size = if kind == EntryKind::Directory {
        0
    } else {
        meta.len()
    };
    format!("{kind}:{size}")
}
