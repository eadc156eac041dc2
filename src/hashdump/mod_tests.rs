//! Tests for the hashdump tool.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::{HashDumpArgs, Settings};
use crate::hashdump::{FileHash, FileHasher, HashDumpError, MountTable, Sha256Hasher, run};

/// Records the paths it was asked to hash.
#[derive(Default)]
struct RecordingHasher {
    is_dir: bool,
    fail: bool,
    calls: RefCell<Vec<(PathBuf, bool)>>,
}

impl FileHasher for RecordingHasher {
    fn hash(&self, path: &Path, use_xattrs: bool) -> io::Result<FileHash> {
        self.calls.borrow_mut().push((path.to_path_buf(), use_xattrs));
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        }
        Ok(FileHash {
            hash: "abc123".to_string(),
            is_dir: self.is_dir,
        })
    }
}

struct FixedMounts(bool);

impl MountTable for FixedMounts {
    fn is_mount_point(&self, _path: &Path) -> bool {
        self.0
    }
}

fn args(path: Option<&str>, filename: &str, no_xattrs: bool) -> HashDumpArgs {
    HashDumpArgs {
        no_xattrs,
        path: path.map(str::to_string),
        filename: PathBuf::from(filename),
    }
}

fn settings() -> Settings {
    Settings::new()
}

mod flow {
    use super::*;

    #[test]
    fn filename_used_as_given_without_path() {
        let hasher = RecordingHasher::default();

        let dump = run(
            &args(None, "relative/file", false),
            &mut settings(),
            &hasher,
            &FixedMounts(false),
        )
        .unwrap();

        assert_eq!(dump.path, PathBuf::from("relative/file"));
        assert_eq!(dump.hash, "abc123");
        assert_eq!(
            hasher.calls.borrow().as_slice(),
            &[(PathBuf::from("relative/file"), true)]
        );
    }

    #[test]
    fn path_option_prefixes_filename() {
        let dir = TempDir::new().unwrap();
        let hasher = RecordingHasher::default();
        let mut settings = settings();

        let dump = run(
            &args(dir.path().to_str(), "/usr/bin/ls", true),
            &mut settings,
            &hasher,
            &FixedMounts(false),
        )
        .unwrap();

        assert_eq!(dump.path, dir.path().join("usr/bin/ls"));
        assert!(!hasher.calls.borrow()[0].1);
        assert_eq!(
            settings.path_prefix(),
            Some(format!("{}/", dir.path().display()).as_str())
        );
    }

    #[test]
    fn invalid_path_option_is_rejected() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let hasher = RecordingHasher::default();

        let result = run(
            &args(missing.to_str(), "file", false),
            &mut settings(),
            &hasher,
            &FixedMounts(false),
        );

        assert!(matches!(result, Err(HashDumpError::InvalidPath(_))));
        assert!(hasher.calls.borrow().is_empty());
    }

    #[test]
    fn hash_failure_is_reported() {
        let hasher = RecordingHasher {
            fail: true,
            ..RecordingHasher::default()
        };

        let result = run(
            &args(None, "/nope", false),
            &mut settings(),
            &hasher,
            &FixedMounts(false),
        );

        match result {
            Err(HashDumpError::Hash { path, .. }) => assert_eq!(path, PathBuf::from("/nope")),
            other => panic!("Expected Hash error, got {other:?}"),
        }
    }

    #[test]
    fn mounted_directory_is_flagged() {
        let hasher = RecordingHasher {
            is_dir: true,
            ..RecordingHasher::default()
        };

        let dump = run(
            &args(None, "/boot", false),
            &mut settings(),
            &hasher,
            &FixedMounts(true),
        )
        .unwrap();

        assert!(dump.mounted);
    }

    #[test]
    fn mount_check_only_applies_to_directories() {
        let hasher = RecordingHasher::default();

        let dump = run(
            &args(None, "/boot/file", false),
            &mut settings(),
            &hasher,
            &FixedMounts(true),
        )
        .unwrap();

        assert!(!dump.mounted);
    }
}

mod sha256_hasher {
    use super::*;

    #[test]
    fn identical_files_hash_identically() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, "same content").unwrap();
        std::fs::write(&b, "same content").unwrap();

        let hash_a = Sha256Hasher.hash(&a, false).unwrap();
        let hash_b = Sha256Hasher.hash(&b, false).unwrap();

        assert_eq!(hash_a, hash_b);
        assert_eq!(hash_a.hash.len(), 64);
        assert!(hash_a.hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(!hash_a.is_dir);
    }

    #[test]
    fn content_changes_hash() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, "one").unwrap();
        std::fs::write(&b, "two").unwrap();

        assert_ne!(
            Sha256Hasher.hash(&a, false).unwrap(),
            Sha256Hasher.hash(&b, false).unwrap()
        );
    }

    #[test]
    fn directory_is_marked() {
        let dir = TempDir::new().unwrap();

        let hash = Sha256Hasher.hash(dir.path(), true).unwrap();

        assert!(hash.is_dir);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_hashes_target_not_contents() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        std::fs::write(&target, "payload").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let link_hash = Sha256Hasher.hash(&link, false).unwrap();
        let file_hash = Sha256Hasher.hash(&target, false).unwrap();

        assert_ne!(link_hash, file_hash);
        assert!(!link_hash.is_dir);
    }

    #[test]
    fn missing_file_fails() {
        let dir = TempDir::new().unwrap();

        assert!(Sha256Hasher.hash(&dir.path().join("missing"), true).is_err());
    }
}
