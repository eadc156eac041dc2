//! Clock abstraction for testability.
//!
//! This module provides a [`Clock`] trait that allows injecting manual clocks
//! in tests while using the real monotonic and CPU clocks in production.

use std::time::{Duration, Instant};

/// A pair of readings taken at the same moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stamp {
    /// Monotonic wall-clock reading, unaffected by clock adjustments.
    pub wall: Duration,
    /// CPU time consumed by the process so far.
    pub cpu: Duration,
}

/// Source of wall-clock and CPU-time readings.
///
/// Readings are only meaningful relative to other readings from the same
/// clock.
///
/// # Example
///
/// ```
/// use osupdate::timing::{Clock, SystemClock};
///
/// let clock = SystemClock::default();
/// let first = clock.now();
/// let second = clock.now();
/// assert!(second.wall >= first.wall);
/// ```
pub trait Clock {
    /// Returns the current monotonic time since an arbitrary origin.
    fn wall(&self) -> Duration;

    /// Returns the CPU time consumed by the current process.
    fn cpu(&self) -> Duration;

    /// Takes both readings.
    fn now(&self) -> Stamp {
        Stamp {
            wall: self.wall(),
            cpu: self.cpu(),
        }
    }
}

/// Production clock backed by [`Instant`] and the process CPU clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn wall(&self) -> Duration {
        self.origin.elapsed()
    }

    fn cpu(&self) -> Duration {
        process_cpu_time()
    }
}

#[cfg(unix)]
fn process_cpu_time() -> Duration {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, &raw mut ts) };
    if rc != 0 {
        return Duration::ZERO;
    }

    Duration::new(
        u64::try_from(ts.tv_sec).unwrap_or_default(),
        u32::try_from(ts.tv_nsec).unwrap_or_default(),
    )
}

// No portable process CPU clock; CPU stats read as zero.
#[cfg(not(unix))]
const fn process_cpu_time() -> Duration {
    Duration::ZERO
}
