//! Configuration layer for osupdate.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - The configuration context ([`Settings`])
//! - Format id validation ([`FormatId`])
//! - Build-time fallbacks and well-known file locations ([`defaults`])
//!
//! # Priority
//!
//! Every setting is resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - applied through the `set_*` methods
//! 2. **Default-value files** - one-line files under the path prefix
//! 3. **Build-time fallbacks** - [`BuildDefaults`], baked in with `option_env!`
//! 4. **Failure** - [`ConfigError::MissingRequired`], fatal for the caller
//!
//! # Replace vs. First-Wins
//!
//! The path prefix and state directory are replaced by every explicit value,
//! so the last `-p` on a command line wins. The URLs, format id and
//! certificate path keep the first value assigned; later calls are no-ops.

mod cli;
pub mod defaults;
mod error;
mod format;
mod settings;

#[cfg(test)]
mod cli_tests;

pub use cli::{Cli, Command, HashDumpArgs};
pub use defaults::BuildDefaults;
pub use error::{ConfigError, field};
pub use format::FormatId;
pub use settings::{ConfigSnapshot, Settings, normalize_path_prefix};
