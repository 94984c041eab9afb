//! Time management utilities
//!
//! Two clocks live here. [`GameClock`] is the simulation clock: it only moves
//! when the frame loop advances it, so gameplay timing (cooldowns, request
//! ages, round timers) is independent of how fast frames are produced and is
//! fully deterministic under test. [`Timer`] measures real wall-clock frame
//! times for the runner's diagnostics.

use std::time::Instant;

/// Monotonic simulation clock, in seconds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameClock {
    now: f64,
    ticks: u64,
}

impl GameClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock that starts at the given time
    pub fn starting_at(seconds: f64) -> Self {
        Self {
            now: if seconds.is_finite() { seconds.max(0.0) } else { 0.0 },
            ticks: 0,
        }
    }

    /// Current simulation time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of successful advances
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance the clock and return the new time
    ///
    /// Negative and non-finite steps are ignored so the clock never runs
    /// backwards.
    pub fn advance(&mut self, seconds: f64) -> f64 {
        if !seconds.is_finite() || seconds < 0.0 {
            log::warn!("Ignoring invalid clock step: {seconds}");
            return self.now;
        }
        self.now += seconds;
        self.ticks += 1;
        self.now
    }

    /// Seconds elapsed since `timestamp` (never negative)
    pub fn elapsed_since(&self, timestamp: f64) -> f64 {
        (self.now - timestamp).max(0.0)
    }
}

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances() {
        let mut clock = GameClock::new();
        assert_eq!(clock.now(), 0.0);
        clock.advance(0.25);
        clock.advance(0.25);
        assert_eq!(clock.now(), 0.5);
        assert_eq!(clock.ticks(), 2);
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut clock = GameClock::starting_at(3.0);
        clock.advance(-1.0);
        clock.advance(f64::NAN);
        clock.advance(f64::INFINITY);
        assert_eq!(clock.now(), 3.0);
        assert_eq!(clock.ticks(), 0);
    }

    #[test]
    fn test_elapsed_since_is_clamped() {
        let clock = GameClock::starting_at(2.0);
        assert_eq!(clock.elapsed_since(0.5), 1.5);
        assert_eq!(clock.elapsed_since(5.0), 0.0);
    }

    #[test]
    fn test_timer_counts_frames() {
        let mut timer = Timer::new();
        timer.update();
        timer.update();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.total_time() >= 0.0);
    }
}
