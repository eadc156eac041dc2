//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use osupdate::config::{ConfigError, Settings};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, missing settings, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - hashing failure, output failure, etc.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::InvalidPath { .. } | ConfigError::CurrentDir(_) => {
            eprintln!("\nUse -p/--path with an existing directory, and -S/--statedir with an absolute path.");
        }
        ConfigError::InvalidFormat { .. } => {
            eprintln!("\nThe format must be 'staging' or a positive integer, e.g. -F 30.");
        }
        _ => {}
    }
}

/// Prints the resolved configuration in human-readable form.
pub fn print_info(settings: &Settings) {
    let show = |value: Option<&str>| value.unwrap_or("(unset)").to_string();

    println!("State directory: {}", show(settings.state_dir()));
    println!("Path prefix:     {}", show(settings.path_prefix()));
    println!("Format:          {}", show(settings.format_string()));
    println!("Version URL:     {}", show(settings.version_url()));
    println!("Content URL:     {}", show(settings.content_url()));
    println!(
        "Local download:  {}",
        if settings.local_download() { "yes" } else { "no" }
    );
    if let Some(cert) = settings.cert_path() {
        println!("Certificate:     {cert}");
    }
}

/// Sets up the tracing subscriber for logging.
///
/// Logs go to stderr so stdout carries only command output.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
