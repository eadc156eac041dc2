//! Nested elapsed-time instrumentation.

use std::fmt;
use std::time::Duration;

use super::clock::{Clock, Stamp, SystemClock};

/// A named interval, open until stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    name: &'static str,
    start: Stamp,
    stop: Option<Stamp>,
}

impl Interval {
    /// Name given when the interval was started.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true once the interval has been stopped.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.stop.is_some()
    }

    /// Elapsed wall-clock time, if complete.
    #[must_use]
    pub fn wall_elapsed(&self) -> Option<Duration> {
        self.stop
            .map(|stop| stop.wall.saturating_sub(self.start.wall))
    }

    /// Elapsed process CPU time, if complete.
    #[must_use]
    pub fn cpu_elapsed(&self) -> Option<Duration> {
        self.stop.map(|stop| stop.cpu.saturating_sub(self.start.cpu))
    }
}

/// A stack of timing intervals.
///
/// Intervals are pushed by [`start`](Self::start) and closed by
/// [`stop`](Self::stop), normally in LIFO order. When the newest interval is
/// already closed, `stop` closes the oldest open one instead, so unbalanced
/// or out-of-order calls never panic.
///
/// A disabled stack ignores every call. Timing is best-effort: if an
/// interval cannot be recorded the stack discards everything and disables
/// itself rather than failing the caller.
///
/// # Example
///
/// ```
/// use osupdate::timing::TimingStack;
///
/// let mut timing = TimingStack::new();
/// timing.enable();
/// timing.start("download");
/// timing.stop();
///
/// let report = timing.report_and_drain();
/// assert_eq!(report.wall().len(), 1);
/// assert!(timing.is_empty());
/// ```
#[derive(Debug)]
pub struct TimingStack<C: Clock = SystemClock> {
    /// Oldest first; the newest interval is at the end.
    intervals: Vec<Interval>,
    enabled: bool,
    clock: C,
}

impl TimingStack<SystemClock> {
    /// Creates a disabled stack backed by the system clocks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock::default())
    }
}

impl Default for TimingStack<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimingStack<C> {
    /// Creates a disabled stack reading from `clock`.
    pub const fn with_clock(clock: C) -> Self {
        Self {
            intervals: Vec::new(),
            enabled: false,
            clock,
        }
    }

    /// Starts recording intervals.
    pub const fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stops recording and discards every interval held.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.intervals.clear();
    }

    /// Returns true if calls are being recorded.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of intervals held, open or complete.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns true if no intervals are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Intervals held, oldest first.
    #[must_use]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Opens a new interval named `name` on top of the stack.
    pub fn start(&mut self, name: &'static str) {
        if !self.enabled {
            return;
        }

        if self.intervals.try_reserve(1).is_err() {
            tracing::warn!("Failed to allocate timing record, discarding and disabling timing");
            self.disable();
            return;
        }

        let start = self.clock.now();
        self.intervals.push(Interval {
            name,
            start,
            stop: None,
        });
    }

    /// Closes the newest interval, or the oldest open one if the newest
    /// is already closed.
    pub fn stop(&mut self) {
        if !self.enabled {
            return;
        }

        let Some(index) = self.next_to_close() else {
            tracing::debug!("Timing stop with no open interval");
            return;
        };

        let now = self.clock.now();
        self.intervals[index].stop = Some(now);
    }

    /// Empties the stack, returning elapsed times of completed intervals.
    ///
    /// Open intervals are dropped without being reported.
    pub fn report_and_drain(&mut self) -> TimingReport {
        if !self.enabled {
            return TimingReport::default();
        }

        let intervals = std::mem::take(&mut self.intervals);
        let collect = |elapsed: fn(&Interval) -> Option<Duration>| -> Vec<ReportEntry> {
            intervals
                .iter()
                .filter_map(|interval| {
                    elapsed(interval).map(|elapsed| ReportEntry {
                        name: interval.name,
                        elapsed,
                    })
                })
                .collect()
        };

        TimingReport {
            wall: collect(Interval::wall_elapsed),
            cpu: collect(Interval::cpu_elapsed),
        }
    }

    fn next_to_close(&self) -> Option<usize> {
        let head = self.intervals.last()?;
        if head.is_complete() {
            self.intervals.iter().position(|i| !i.is_complete())
        } else {
            Some(self.intervals.len() - 1)
        }
    }
}

/// Elapsed time of one completed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportEntry {
    /// Interval name.
    pub name: &'static str,
    /// Elapsed time.
    pub elapsed: Duration,
}

impl ReportEntry {
    /// Elapsed time in fractional milliseconds.
    #[must_use]
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Timing statistics drained from a [`TimingStack`].
///
/// Both lists are ordered oldest interval first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingReport {
    wall: Vec<ReportEntry>,
    cpu: Vec<ReportEntry>,
}

impl TimingReport {
    /// Wall-clock elapsed times.
    #[must_use]
    pub fn wall(&self) -> &[ReportEntry] {
        &self.wall
    }

    /// Process CPU elapsed times.
    #[must_use]
    pub fn cpu(&self) -> &[ReportEntry] {
        &self.cpu
    }

    /// Returns true if no interval was completed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wall.is_empty()
    }
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nRaw elapsed time stats:")?;
        for entry in &self.wall {
            writeln!(f, "{:.4}\tms: {}", entry.millis(), entry.name)?;
        }

        writeln!(f, "\nCPU process time stats:")?;
        for entry in &self.cpu {
            writeln!(f, "{:.4}\tms: {}", entry.millis(), entry.name)?;
        }
        Ok(())
    }
}
