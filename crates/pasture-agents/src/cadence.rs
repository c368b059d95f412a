//! Fixed-interval timers.

/// Fires once every `interval` seconds of accumulated time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    interval: f32,
    elapsed: f32,
}

impl Cadence {
    /// Create a timer that first fires after `interval` seconds.
    pub const fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Accumulate `dt`; returns `true` and restarts when the interval is
    /// reached.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    /// Seconds accumulated since the last firing.
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
