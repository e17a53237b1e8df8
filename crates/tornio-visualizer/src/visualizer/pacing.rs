//! Pacing between render calls
//!
//! The engine never sleeps on its own. Every wait and every yield point
//! goes through a `Pacer`, so the same loop runs in real time under a shell
//! and instantly under test.

use std::time::Duration;

/// Cooperative wait/yield abstraction
pub trait Pacer {
    /// Wait `delay` between two sub-segments of a paced draw
    fn wait(&mut self, delay: Duration);

    /// Yield after an instruction so the shell can record pause/cancel requests
    fn yield_now(&mut self) {}
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn wait(&mut self, delay: Duration) {
        (**self).wait(delay);
    }

    fn yield_now(&mut self) {
        (**self).yield_now();
    }
}

/// Sleeps the calling thread for the requested delay
#[derive(Debug, Clone, Copy)]
pub struct ThreadPacer {
    /// Scales every delay (1.0 = real time)
    time_scale: f64,
}

impl ThreadPacer {
    /// Real-time pacing
    pub fn new() -> Self {
        Self { time_scale: 1.0 }
    }

    /// Pacing at `scale` times the real delay (0.5 = twice as fast)
    pub fn with_time_scale(scale: f64) -> Self {
        Self {
            time_scale: if scale.is_finite() && scale >= 0.0 {
                scale
            } else {
                1.0
            },
        }
    }

    /// Current time scale
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// `delay` times the time scale, saturating at `Duration::MAX`
    pub fn scaled(&self, delay: Duration) -> Duration {
        Duration::try_from_secs_f64(delay.as_secs_f64() * self.time_scale)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for ThreadPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for ThreadPacer {
    fn wait(&mut self, delay: Duration) {
        let scaled = self.scaled(delay);
        if !scaled.is_zero() {
            std::thread::sleep(scaled);
        }
    }

    fn yield_now(&mut self) {
        std::thread::yield_now();
    }
}

/// Never waits; accumulates the delay it was asked for
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPacer {
    waited: Duration,
    waits: usize,
}

impl InstantPacer {
    /// Create a pacer with zero accumulated delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Total delay requested so far
    pub fn total_waited(&self) -> Duration {
        self.waited
    }

    /// Number of `wait` calls so far
    pub fn wait_count(&self) -> usize {
        self.waits
    }
}

impl Pacer for InstantPacer {
    fn wait(&mut self, delay: Duration) {
        self.waited = self.waited.saturating_add(delay);
        self.waits += 1;
    }
}
