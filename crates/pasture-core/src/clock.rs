//! Simulation clock.
//!
//! Counts completed ticks and accumulates simulated seconds. The tick
//! counter uses checked arithmetic; elapsed time is kept in `f64` so long
//! runs do not lose precision on small deltas.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// The tick delta is negative or not a finite number.
    #[error("invalid tick delta: {dt}")]
    InvalidDelta {
        /// The rejected delta in seconds.
        dt: f32,
    },
}

/// Tick counter plus elapsed simulated time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    tick: u64,
    elapsed: f64,
}

impl SimClock {
    /// A clock at tick 0.
    pub const fn new() -> Self {
        Self {
            tick: 0,
            elapsed: 0.0,
        }
    }

    /// Reject deltas the tick sequence cannot integrate.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidDelta`] if `dt` is negative, NaN or
    /// infinite.
    pub fn validate(dt: f32) -> Result<(), ClockError> {
        if dt.is_finite() && dt >= 0.0 {
            Ok(())
        } else {
            Err(ClockError::InvalidDelta { dt })
        }
    }

    /// Record one completed tick of `dt` seconds. Returns the new tick
    /// number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidDelta`] for an unusable `dt`, or
    /// [`ClockError::TickOverflow`] if the counter would exceed `u64::MAX`.
    pub fn advance(&mut self, dt: f32) -> Result<u64, ClockError> {
        Self::validate(dt)?;
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        self.elapsed += f64::from(dt);
        Ok(self.tick)
    }

    /// Completed ticks.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds so far.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
