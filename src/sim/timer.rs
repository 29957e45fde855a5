//! Scheduled callbacks driven by the fixed tick
//!
//! A session owns its timers as plain values. Cancelling a timer means dropping
//! the handle, so nothing can fire into a session that was stopped or rebuilt.

/// Small slack for clocks built from summed fixed steps
const EPSILON: f64 = 1e-9;

/// Repeating timer with a fixed period
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    period: f64,
    elapsed: f64,
}

impl Interval {
    pub fn new(period: f64) -> Self {
        debug_assert!(period > 0.0, "interval period must be positive");
        Self {
            period,
            elapsed: 0.0,
        }
    }

    /// Let `dt` seconds pass, returning how many times the timer fired
    pub fn tick(&mut self, dt: f64) -> u32 {
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed + EPSILON >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }
}

/// Slot for a cancellable scheduled callback
#[derive(Debug, Clone)]
pub struct Scheduled<T> {
    handle: Option<T>,
}

impl<T> Default for Scheduled<T> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<T> Scheduled<T> {
    pub fn arm(&mut self, timer: T) {
        self.handle = Some(timer);
    }

    pub fn cancel(&mut self) {
        self.handle = None;
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.handle.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.handle.as_mut()
    }
}
