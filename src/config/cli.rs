//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::ConfigError;
use super::settings::Settings;

/// osupdate: OS software-update client
///
/// Resolves the client's durable settings and provides diagnostic tools.
#[derive(Debug, Parser)]
#[command(name = "osupdate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Use PATH as the root for all other paths
    #[arg(long, short = 'p', value_name = "PATH")]
    pub path: Option<String>,

    /// Directory for update state (must be absolute)
    #[arg(long = "statedir", short = 'S', value_name = "PATH")]
    pub state_dir: Option<String>,

    /// On-disk format id ('staging' or a positive integer)
    #[arg(long, short = 'F', value_name = "STAGING|NUM")]
    pub format: Option<String>,

    /// Server URL used for both version and content
    #[arg(long, short = 'u')]
    pub url: Option<String>,

    /// Version server URL
    #[arg(long = "versionurl", short = 'v')]
    pub version_url: Option<String>,

    /// Content server URL
    #[arg(long = "contenturl", short = 'c')]
    pub content_url: Option<String>,

    /// Certificate used for signature verification
    #[arg(long = "certpath", short = 'C', value_name = "PATH")]
    pub cert_path: Option<String>,

    /// Report elapsed wall-clock and CPU time of timed operations
    #[arg(long, short = 't')]
    pub time: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,
}

/// Subcommands for osupdate
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the resolved configuration
    Info {
        /// Print the configuration as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the hash of a file as recorded in manifests
    #[command(name = "hashdump")]
    HashDump(HashDumpArgs),
}

/// Arguments of the `hashdump` subcommand.
#[derive(Debug, Clone, Args)]
pub struct HashDumpArgs {
    /// Ignore extended attributes
    #[arg(long = "no-xattrs", short = 'n')]
    pub no_xattrs: bool,

    /// Use PATH as the leading path to the filename
    #[arg(long, short = 'p', value_name = "PATH")]
    pub path: Option<String>,

    /// Name of a file on the filesystem
    pub filename: PathBuf,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Applies the explicit overrides to `settings`.
    ///
    /// `--url` is applied before `--versionurl`/`--contenturl`, and because
    /// URLs are single-assignment it takes precedence over both.
    ///
    /// # Errors
    ///
    /// Returns the first setter error encountered.
    pub fn apply_overrides(&self, settings: &mut Settings) -> Result<(), ConfigError> {
        if let Some(path) = self.path.as_deref() {
            settings.set_path_prefix(Some(path))?;
        }
        if let Some(dir) = self.state_dir.as_deref() {
            settings.set_state_dir(Some(dir))?;
        }
        if let Some(format) = self.format.as_deref() {
            settings.set_format_string(Some(format))?;
        }
        if let Some(url) = self.url.as_deref() {
            settings.set_version_url(Some(url))?;
            settings.set_content_url(Some(url))?;
        }
        if let Some(url) = self.version_url.as_deref() {
            settings.set_version_url(Some(url))?;
        }
        if let Some(url) = self.content_url.as_deref() {
            settings.set_content_url(Some(url))?;
        }
        if let Some(cert) = self.cert_path.as_deref() {
            settings.set_cert_path(Some(cert));
        }
        Ok(())
    }
}
