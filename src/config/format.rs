//! On-disk format id parsing.

use std::fmt;
use std::str::FromStr;

use super::ConfigError;
use super::defaults::STAGING_FORMAT;

/// A validated format id.
///
/// Identifies the layout epoch of update content. Either the literal
/// `staging` or a decimal integer of at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatId {
    /// The `staging` format used for pre-release content.
    Staging,
    /// A numbered format epoch (always >= 1).
    Number(u64),
}

impl FromStr for FormatId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == STAGING_FORMAT {
            return Ok(Self::Staging);
        }

        match s.parse::<u64>() {
            Ok(n) if n >= 1 => Ok(Self::Number(n)),
            _ => Err(ConfigError::InvalidFormat {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Staging => f.write_str(STAGING_FORMAT),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}
