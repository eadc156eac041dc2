//! The `hashdump` tool: print the manifest hash of a single file.
//!
//! This module provides:
//! - The tool's flow on top of [`Settings`] ([`run`], [`HashDump`])
//! - The hashing seam ([`FileHasher`]) and its default [`Sha256Hasher`]
//! - Mount-point detection ([`MountTable`], [`ProcMountInfo`])

mod hasher;
mod mounts;
mod xattrs;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use hasher::{FileHash, FileHasher, Sha256Hasher};
pub use mounts::{MountTable, ProcMountInfo, is_mount_point};

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{ConfigError, HashDumpArgs, Settings};

/// Errors from the `hashdump` tool.
#[derive(Debug, Error)]
pub enum HashDumpError {
    /// The `--path` argument was rejected.
    #[error("Invalid --path argument: {0}")]
    InvalidPath(#[source] ConfigError),

    /// The default path prefix could not be established.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Hash computation failed.
    #[error("Failed to compute hash for '{}': {source}", path.display())]
    Hash {
        /// File being hashed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result of a successful hash dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashDump {
    /// Path that was hashed.
    pub path: PathBuf,
    /// Lowercase hex hash.
    pub hash: String,
    /// True if `path` is a directory with a filesystem mounted on it.
    ///
    /// The hash of a mount point may not match the one recorded in a manifest.
    pub mounted: bool,
}

/// Hashes the file named by `args`.
///
/// With `--path`, the filename is taken relative to that prefix; otherwise
/// it is used as given, so relative names resolve against the current
/// directory.
///
/// # Errors
///
/// Returns [`HashDumpError::InvalidPath`] for a rejected `--path`, and
/// [`HashDumpError::Hash`] if the file cannot be hashed.
pub fn run(
    args: &HashDumpArgs,
    settings: &mut Settings,
    hasher: &impl FileHasher,
    mounts: &impl MountTable,
) -> Result<HashDump, HashDumpError> {
    let use_prefix = match args.path.as_deref() {
        Some(path) => {
            settings
                .set_path_prefix(Some(path))
                .map_err(HashDumpError::InvalidPath)?;
            true
        }
        None => false,
    };
    settings.set_path_prefix(None)?;

    let path = if use_prefix {
        PathBuf::from(settings.full_filename(&args.filename.to_string_lossy()))
    } else {
        args.filename.clone()
    };

    let use_xattrs = !args.no_xattrs;
    tracing::info!(
        "Calculating hash {} xattrs for: {}",
        if use_xattrs { "with" } else { "without" },
        path.display()
    );

    let file_hash = hasher
        .hash(&path, use_xattrs)
        .map_err(|source| HashDumpError::Hash {
            path: path.clone(),
            source,
        })?;

    let mounted = file_hash.is_dir && mounts.is_mount_point(&path);

    Ok(HashDump {
        path,
        hash: file_hash.hash,
        mounted,
    })
}
