//! Timing instrumentation for profiling update operations.
//!
//! This module provides:
//! - A nested stack of named intervals ([`TimingStack`], [`Interval`])
//! - Drained statistics in the report text format ([`TimingReport`])
//! - An injectable clock pair ([`Clock`], [`SystemClock`])

mod clock;
mod stack;

#[cfg(test)]
mod test_fixtures;

pub use clock::{Clock, Stamp, SystemClock};
pub use stack::{Interval, ReportEntry, TimingReport, TimingStack};
