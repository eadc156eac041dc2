//! Shared test fixtures for timing tests.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use super::Clock;

/// Manual clock for testing that returns controlled readings.
///
/// Clones share their readings, so a test can keep a handle while a
/// [`TimingStack`](super::TimingStack) owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    wall: Rc<Cell<Duration>>,
    cpu: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, wall: Duration, cpu: Duration) {
        self.wall.set(self.wall.get() + wall);
        self.cpu.set(self.cpu.get() + cpu);
    }

    pub fn advance_ms(&self, wall_ms: u64, cpu_ms: u64) {
        self.advance(
            Duration::from_millis(wall_ms),
            Duration::from_millis(cpu_ms),
        );
    }
}

impl Clock for ManualClock {
    fn wall(&self) -> Duration {
        self.wall.get()
    }

    fn cpu(&self) -> Duration {
        self.cpu.get()
    }
}
