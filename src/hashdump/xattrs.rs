//! Extended attribute access for hashing.

use std::io;
use std::path::Path;

/// Name/value pairs of an entry's extended attributes, sorted by name.
pub type Attributes = Vec<(Vec<u8>, Vec<u8>)>;

/// Reads every extended attribute of `path`, without following symlinks.
///
/// A filesystem without xattr support yields no attributes.
#[cfg(target_os = "linux")]
pub fn read_all(path: &Path) -> io::Result<Attributes> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = to_cstring(path.as_os_str().as_bytes())?;

    // SAFETY: `c_path` is NUL-terminated and `buf` is valid for `len` bytes.
    let names = query(|buf, len| unsafe { libc::llistxattr(c_path.as_ptr(), buf.cast(), len) });
    let names = match names {
        Ok(names) => names,
        Err(e) if e.raw_os_error() == Some(libc::ENOTSUP) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut attrs = Vec::new();
    for name in names.split(|b| *b == 0).filter(|name| !name.is_empty()) {
        let c_name: CString = to_cstring(name)?;
        // SAFETY: both strings are NUL-terminated and `buf` is valid for `len` bytes.
        let value = query(|buf, len| unsafe {
            libc::lgetxattr(c_path.as_ptr(), c_name.as_ptr(), buf.cast(), len)
        })?;
        attrs.push((name.to_vec(), value));
    }

    attrs.sort();
    Ok(attrs)
}

#[cfg(not(target_os = "linux"))]
pub fn read_all(_path: &Path) -> io::Result<Attributes> {
    Ok(Vec::new())
}

#[cfg(target_os = "linux")]
fn to_cstring(bytes: &[u8]) -> io::Result<std::ffi::CString> {
    std::ffi::CString::new(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

/// Runs a size-query-then-fill syscall pair.
///
/// `call` is invoked first with a null buffer to learn the length, then
/// with a buffer of that length.
#[cfg(target_os = "linux")]
fn query(call: impl Fn(*mut u8, usize) -> isize) -> io::Result<Vec<u8>> {
    let len = call(std::ptr::null_mut(), 0);
    let len = usize::try_from(len).map_err(|_| io::Error::last_os_error())?;

    let mut buf = vec![0u8; len];
    if buf.is_empty() {
        return Ok(buf);
    }

    let filled = call(buf.as_mut_ptr(), buf.len());
    let filled = usize::try_from(filled).map_err(|_| io::Error::last_os_error())?;
    buf.truncate(filled);
    Ok(buf)
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn plain_file_reads_without_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain");
        std::fs::write(&path, "data").unwrap();

        let attrs = read_all(&path).unwrap();

        assert!(attrs.windows(2).all(|pair| pair[0].0 <= pair[1].0));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();

        assert!(read_all(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn interior_nul_is_rejected() {
        let err = to_cstring(b"bad\0name").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
