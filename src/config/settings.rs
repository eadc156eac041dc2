//! Layered resolution of the update client's durable settings.
//!
//! Each setting resolves with the same precedence: an explicit value wins,
//! then a one-line default-value file under the path prefix, then a
//! build-time constant. [`Settings::init`] fills every unset field in
//! dependency order.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

use crate::download::is_local_download;

use super::defaults::{self, BuildDefaults};
use super::error::{ConfigError, field};
use super::format::FormatId;

/// Setter signature shared by the fallback-capable settings.
type Setter = fn(&mut Settings, Option<&str>) -> Result<(), ConfigError>;

/// The update client's configuration context.
///
/// Constructed once at startup, filled by explicit overrides and then by
/// [`Settings::init`], and passed by reference to everything downstream.
///
/// # Assignment rules
///
/// | Setting | Explicit value | No value |
/// |---------|----------------|----------|
/// | `path_prefix`, `state_dir` | always replaces | keeps current, else default |
/// | `version_url`, `content_url`, `format_string`, `cert_path` | ignored once set | keeps current, else default |
#[derive(Debug, Default)]
pub struct Settings {
    defaults: BuildDefaults,
    state_dir: Option<String>,
    /// Always absolute and slash-terminated once set.
    path_prefix: Option<String>,
    version_url: Option<String>,
    content_url: Option<String>,
    format_string: Option<String>,
    cert_path: Option<String>,
    local_download: bool,
    start_time: Option<SystemTime>,
}

/// Read-only view of the resolved settings for serialization.
#[derive(Debug, Serialize)]
pub struct ConfigSnapshot<'a> {
    /// Persistent state directory
    pub state_dir: Option<&'a str>,
    /// Filesystem root for all other paths
    pub path_prefix: Option<&'a str>,
    /// On-disk format id
    pub format: Option<&'a str>,
    /// Version server location
    pub version_url: Option<&'a str>,
    /// Content server location
    pub content_url: Option<&'a str>,
    /// Whether content is read from the local filesystem
    pub local_download: bool,
    /// Certificate used for signature checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_path: Option<&'a str>,
}

impl Settings {
    /// Creates an empty context using the build-time fallbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(BuildDefaults::compiled())
    }

    /// Creates an empty context with custom fallbacks.
    #[must_use]
    pub fn with_defaults(defaults: BuildDefaults) -> Self {
        Self {
            defaults,
            state_dir: None,
            path_prefix: None,
            version_url: None,
            content_url: None,
            format_string: None,
            cert_path: None,
            local_download: false,
            start_time: None,
        }
    }

    /// Sets the filesystem root all other paths resolve against.
    ///
    /// An explicit `path` is made absolute against the current directory
    /// and slash-terminated, replacing any previous value. With no `path`,
    /// an existing value is kept as is; otherwise `/` is used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] if the resolved prefix is not an
    /// existing directory, or [`ConfigError::CurrentDir`] if a relative path
    /// cannot be resolved. The previous value is kept on failure.
    pub fn set_path_prefix(&mut self, path: Option<&str>) -> Result<(), ConfigError> {
        let prefix = match path {
            Some(path) if path.starts_with('/') => normalize_path_prefix(path, Path::new("/")),
            Some(path) => {
                let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
                normalize_path_prefix(path, &cwd)
            }
            None if self.path_prefix.is_some() => return Ok(()),
            None => defaults::PATH_PREFIX.to_string(),
        };

        ensure_directory(&prefix)?;
        tracing::debug!("Path prefix set to {prefix}");
        self.path_prefix = Some(prefix);
        Ok(())
    }

    /// Sets the persistent state directory.
    ///
    /// An explicit `path` must be absolute and replaces any previous value.
    /// With no `path`, an existing value is kept; otherwise the build-time
    /// default is used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] if `path` is not absolute.
    pub fn set_state_dir(&mut self, path: Option<&str>) -> Result<(), ConfigError> {
        match path {
            Some(path) if !path.starts_with('/') => Err(ConfigError::invalid_path(
                path,
                "statepath must be a full path starting with '/'",
            )),
            Some(path) => {
                self.state_dir = Some(path.to_string());
                Ok(())
            }
            None => {
                if self.state_dir.is_none() {
                    self.state_dir = Some(self.defaults.state_dir.to_string());
                }
                Ok(())
            }
        }
    }

    /// Sets the on-disk format id.
    ///
    /// Once a format is set, further calls succeed without changing it.
    /// With no `value`, the format is read from the default-value file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFormat`] for a value that is neither
    /// `staging` nor a positive integer, or a file error if the default
    /// cannot be read.
    pub fn set_format_string(&mut self, value: Option<&str>) -> Result<(), ConfigError> {
        if self.format_string.is_some() {
            return Ok(());
        }

        let value = match value {
            Some(value) => value.to_string(),
            None => self.read_default_value(defaults::FORMAT_FILE)?,
        };

        value.parse::<FormatId>()?;
        self.format_string = Some(value);
        Ok(())
    }

    /// Sets the version server location.
    ///
    /// Only the first successful assignment takes effect.
    ///
    /// # Errors
    ///
    /// Returns a file error if no `url` is given and the default-value file
    /// cannot be read.
    pub fn set_version_url(&mut self, url: Option<&str>) -> Result<(), ConfigError> {
        if self.version_url.is_none() {
            self.version_url = Some(self.url_value(url, defaults::VERSION_URL_FILE)?);
        }
        Ok(())
    }

    /// Sets the content server location.
    ///
    /// Only the first successful assignment takes effect.
    ///
    /// # Errors
    ///
    /// Returns a file error if no `url` is given and the default-value file
    /// cannot be read.
    pub fn set_content_url(&mut self, url: Option<&str>) -> Result<(), ConfigError> {
        if self.content_url.is_none() {
            self.content_url = Some(self.url_value(url, defaults::CONTENT_URL_FILE)?);
        }
        Ok(())
    }

    /// Sets the certificate path used for signature checks.
    ///
    /// Only the first call takes effect. With no `path`, the build-time
    /// default is used.
    #[cfg(feature = "signatures")]
    pub fn set_cert_path(&mut self, path: Option<&str>) {
        if self.cert_path.is_none() {
            self.cert_path = Some(path.unwrap_or(self.defaults.cert_path).to_string());
        }
    }

    /// Signature support is compiled out; certificate paths are ignored.
    #[cfg(not(feature = "signatures"))]
    pub fn set_cert_path(&mut self, path: Option<&str>) {
        let _ = path;
    }

    /// Resolves every setting not already given explicitly.
    ///
    /// Order matters: the path prefix gates the default-value files used
    /// by the format and URL steps, and the local-download flag is derived
    /// only after both URLs are fixed.
    ///
    /// # Errors
    ///
    /// Returns the state directory or path prefix error unchanged, and
    /// [`ConfigError::MissingRequired`] when the format or a URL has no
    /// usable source at all. Callers should treat any error as fatal.
    pub fn init(&mut self) -> Result<(), ConfigError> {
        self.start_time = Some(SystemTime::now());

        self.set_state_dir(None)?;
        self.set_path_prefix(None)?;

        self.resolve_with_fallback(
            Self::set_format_string,
            self.defaults.format_id,
            field::FORMAT,
            "Use the -F option instead.",
        )?;
        self.resolve_with_fallback(
            Self::set_version_url,
            self.defaults.version_url,
            field::VERSION_URL,
            "Use the -v option instead.",
        )?;
        self.resolve_with_fallback(
            Self::set_content_url,
            self.defaults.content_url,
            field::CONTENT_URL,
            "Use the -c option instead.",
        )?;

        self.local_download = match (&self.version_url, &self.content_url) {
            (Some(version), Some(content)) => is_local_download(version, content),
            _ => false,
        };

        self.set_cert_path(None);

        tracing::debug!("Configuration resolved: {self}");
        Ok(())
    }

    /// Resets every setting to unset. Safe to call repeatedly.
    pub fn clear(&mut self) {
        *self = Self::with_defaults(self.defaults);
    }

    /// Joins `name` onto the path prefix with exactly one separator.
    #[must_use]
    pub fn full_filename(&self, name: &str) -> String {
        let prefix = self.path_prefix.as_deref().unwrap_or(defaults::PATH_PREFIX);
        format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            name.trim_start_matches('/')
        )
    }

    /// Reads the single-line default value stored at `relative` under the
    /// path prefix, without its trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] if the file cannot be opened or
    /// read, and [`ConfigError::EmptyFile`] if it holds no value.
    pub fn read_default_value(&self, relative: &str) -> Result<String, ConfigError> {
        let path = PathBuf::from(self.full_filename(relative));
        let read_error = |source: std::io::Error| ConfigError::FileRead {
            path: path.clone(),
            source,
        };

        let file = File::open(&path).map_err(read_error)?;
        let mut line = String::new();
        BufReader::new(file)
            .read_line(&mut line)
            .map_err(read_error)?;

        let value = line.strip_suffix('\n').unwrap_or(&line);
        if value.is_empty() {
            return Err(ConfigError::EmptyFile { path });
        }

        Ok(value.to_string())
    }

    /// Persistent state directory.
    #[must_use]
    pub fn state_dir(&self) -> Option<&str> {
        self.state_dir.as_deref()
    }

    /// Filesystem root, always ending in `/`.
    #[must_use]
    pub fn path_prefix(&self) -> Option<&str> {
        self.path_prefix.as_deref()
    }

    /// Version server location.
    #[must_use]
    pub fn version_url(&self) -> Option<&str> {
        self.version_url.as_deref()
    }

    /// Content server location.
    #[must_use]
    pub fn content_url(&self) -> Option<&str> {
        self.content_url.as_deref()
    }

    /// Format id as stored.
    #[must_use]
    pub fn format_string(&self) -> Option<&str> {
        self.format_string.as_deref()
    }

    /// Format id, parsed.
    #[must_use]
    pub fn format_id(&self) -> Option<FormatId> {
        self.format_string.as_deref().and_then(|s| s.parse().ok())
    }

    /// Certificate path for signature checks.
    #[must_use]
    pub fn cert_path(&self) -> Option<&str> {
        self.cert_path.as_deref()
    }

    /// Whether update content is read from the local filesystem.
    #[must_use]
    pub const fn local_download(&self) -> bool {
        self.local_download
    }

    /// Wall-clock time at which [`Settings::init`] started.
    #[must_use]
    pub const fn start_time(&self) -> Option<SystemTime> {
        self.start_time
    }

    /// Returns a serializable view of the resolved settings.
    #[must_use]
    pub fn snapshot(&self) -> ConfigSnapshot<'_> {
        ConfigSnapshot {
            state_dir: self.state_dir(),
            path_prefix: self.path_prefix(),
            format: self.format_string(),
            version_url: self.version_url(),
            content_url: self.content_url(),
            local_download: self.local_download,
            cert_path: self.cert_path(),
        }
    }

    fn url_value(&self, url: Option<&str>, file: &str) -> Result<String, ConfigError> {
        match url {
            Some(url) => Ok(url.to_string()),
            None => self.read_default_value(file),
        }
    }

    /// Runs `set` with no value, then with the build-time `fallback`.
    ///
    /// Any failure that survives both attempts becomes `MissingRequired`.
    fn resolve_with_fallback(
        &mut self,
        set: Setter,
        fallback: Option<&'static str>,
        name: &'static str,
        hint: &'static str,
    ) -> Result<(), ConfigError> {
        let Err(err) = set(self, None) else {
            return Ok(());
        };
        tracing::debug!("No default {name} available: {err}");

        let fallback = fallback.ok_or_else(|| ConfigError::missing(name, hint))?;
        tracing::debug!("Using build-time {name}: {fallback}");

        set(self, Some(fallback)).map_err(|err| {
            tracing::warn!("Build-time {name} rejected: {err}");
            ConfigError::missing(name, hint)
        })
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |value: Option<&str>| value.unwrap_or("unset").to_string();

        write!(
            f,
            "Settings {{ state_dir: {}, path_prefix: {}, format: {}, version_url: {}, \
             content_url: {}, local_download: {}, cert_path: {} }}",
            show(self.state_dir()),
            show(self.path_prefix()),
            show(self.format_string()),
            show(self.version_url()),
            show(self.content_url()),
            self.local_download,
            show(self.cert_path()),
        )
    }
}

/// Makes `path` absolute against `cwd` and terminates it with one `/`.
#[must_use]
pub fn normalize_path_prefix(path: &str, cwd: &Path) -> String {
    let absolute = if path.starts_with('/') {
        path.to_string()
    } else {
        let cwd = cwd.to_string_lossy();
        format!("{}/{path}", cwd.trim_end_matches('/'))
    };

    format!("{}/", absolute.trim_end_matches('/'))
}

fn ensure_directory(path: &str) -> Result<(), ConfigError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::invalid_path(path, "not a directory")),
        Err(e) => Err(ConfigError::invalid_path(path, e.to_string())),
    }
}
