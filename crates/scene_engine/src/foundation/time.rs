//! Frame timing
//!
//! [`FrameClock`] produces the per-frame delta fed into `Scene::update`. It can
//! run against the wall clock or advance by a fixed step, which keeps headless
//! runs deterministic.

use std::time::{Duration, Instant};

/// How a [`FrameClock`] measures elapsed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockMode {
    /// Measure real time between ticks
    Realtime,
    /// Advance by a constant number of seconds every tick
    Fixed(f32),
}

/// Per-frame clock
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: ClockMode,
    last_tick: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::realtime()
    }
}

impl FrameClock {
    /// Clock that follows the wall clock
    #[must_use]
    pub fn realtime() -> Self {
        Self::with_mode(ClockMode::Realtime)
    }

    /// Clock that advances by `step_seconds` per tick
    #[must_use]
    pub fn fixed(step_seconds: f32) -> Self {
        Self::with_mode(ClockMode::Fixed(step_seconds))
    }

    fn with_mode(mode: ClockMode) -> Self {
        Self {
            mode,
            last_tick: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance one frame and return the new delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = match self.mode {
            ClockMode::Realtime => now.duration_since(self.last_tick).as_secs_f32(),
            ClockMode::Fixed(step) => step,
        };
        self.last_tick = now;
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Seconds covered by the last tick
    #[must_use]
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Seconds accumulated over all ticks
    #[must_use]
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks so far
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Mean frames per second since creation
    #[must_use]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }

    /// Wall-clock time since the last tick, regardless of mode
    #[must_use]
    pub fn since_last_tick(&self) -> Duration {
        self.last_tick.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_clock_is_deterministic() {
        let mut clock = FrameClock::fixed(0.25);
        for _ in 0..4 {
            assert_relative_eq!(clock.tick(), 0.25);
        }
        assert_eq!(clock.frame_count(), 4);
        assert_relative_eq!(clock.total_time(), 1.0);
        assert_relative_eq!(clock.average_fps(), 4.0);
    }

    #[test]
    fn test_fresh_clock_reports_zero_fps() {
        let clock = FrameClock::realtime();
        assert_relative_eq!(clock.average_fps(), 0.0);
        assert_relative_eq!(clock.delta_time(), 0.0);
    }
}
