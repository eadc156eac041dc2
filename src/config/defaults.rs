//! Default values for configuration settings.
//!
//! Build-time fallbacks are read through `option_env!`, so a distribution
//! can bake its own state directory, certificate and server URLs into the
//! binary without patching the source.

/// Default path prefix.
pub const PATH_PREFIX: &str = "/";

/// Default state directory when none is configured at build time.
pub const STATE_DIR: &str = "/var/lib/swupd";

/// Default certificate path when none is configured at build time.
pub const CERT_PATH: &str = "/usr/share/clear/update-ca/Swupd_Root.pem";

/// The literal format token accepted alongside positive integers.
pub const STAGING_FORMAT: &str = "staging";

/// Default-value file holding the version server URL, relative to the path prefix.
pub const VERSION_URL_FILE: &str = "usr/share/defaults/swupd/versionurl";

/// Default-value file holding the content server URL, relative to the path prefix.
pub const CONTENT_URL_FILE: &str = "usr/share/defaults/swupd/contenturl";

/// Default-value file holding the format id, relative to the path prefix.
pub const FORMAT_FILE: &str = "usr/share/defaults/swupd/format";

/// Compile-time fallback constants.
///
/// Only consulted when neither a command-line value nor a default-value
/// file under the path prefix provides a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildDefaults {
    /// State directory used when none was given.
    pub state_dir: &'static str,

    /// Certificate path used when none was given.
    pub cert_path: &'static str,

    /// Optional fallback format id.
    pub format_id: Option<&'static str>,

    /// Optional fallback version server URL.
    pub version_url: Option<&'static str>,

    /// Optional fallback content server URL.
    pub content_url: Option<&'static str>,
}

impl BuildDefaults {
    /// Returns the fallbacks baked in at build time.
    #[must_use]
    pub const fn compiled() -> Self {
        Self {
            state_dir: match option_env!("OSUPDATE_STATE_DIR") {
                Some(dir) => dir,
                None => STATE_DIR,
            },
            cert_path: match option_env!("OSUPDATE_CERT_PATH") {
                Some(path) => path,
                None => CERT_PATH,
            },
            format_id: option_env!("OSUPDATE_FORMAT_ID"),
            version_url: option_env!("OSUPDATE_VERSION_URL"),
            content_url: option_env!("OSUPDATE_CONTENT_URL"),
        }
    }
}

impl Default for BuildDefaults {
    fn default() -> Self {
        Self::compiled()
    }
}
