//! Time sources for the animation loop.

use std::cell::Cell;

use instant::{Duration, Instant};

/// A monotonic source of elapsed time since the clock was started.
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

/// Wall clock. Works on native and in the browser through `instant`.
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to. Lets tests single-step frames.
#[derive(Debug, Default)]
pub struct ManualClock {
    elapsed: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, dt: Duration) {
        self.elapsed.set(self.elapsed.get() + dt);
    }

    pub fn set(&self, elapsed: Duration) {
        self.elapsed.set(elapsed);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }
}
