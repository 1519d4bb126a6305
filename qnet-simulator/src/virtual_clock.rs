//! # Virtual Clock for Simulation
//!
//! Logical simulation time. It only moves when the engine jumps to the next
//! scheduled event and never relates to wall-clock time.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VirtualClock {
    now: f64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Moves the clock to `time` and returns the elapsed delta.
    #[inline]
    pub fn advance_to(&mut self, time: f64) -> f64 {
        let delta = time - self.now;
        debug_assert!(delta >= 0.0, "clock moved backwards: {} -> {}", self.now, time);
        self.now += delta;
        delta
    }

    pub fn reset(&mut self) {
        self.now = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_initial_value() {
        assert_eq!(VirtualClock::new().now(), 0.0);
    }

    #[test]
    fn test_clock_advance() {
        let mut clock = VirtualClock::new();
        assert_eq!(clock.advance_to(2.5), 2.5);
        assert_eq!(clock.now(), 2.5);
        assert_eq!(clock.advance_to(4.0), 1.5);
        assert_eq!(clock.advance_to(4.0), 0.0);
        clock.reset();
        assert_eq!(clock.now(), 0.0);
    }
}
