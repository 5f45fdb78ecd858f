use log::debug;
use std::time::Duration;

/// Length of one clock tick.
pub const TICK: Duration = Duration::from_secs(1);

/// Elapsed play time for one session, counted in whole ticks.
///
/// The clock is either stopped or running. Every `start` opens a new run identified by
/// a generation number; ticks carry the generation they were scheduled for and are
/// dropped unless it matches the current run. A tick task left over from a previous
/// game therefore cannot move the new game's time.
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    elapsed: Duration,
    running: bool,
    generation: u64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new run and returns its generation. A running clock is stopped first.
    pub fn start(&mut self) -> u64 {
        if self.running {
            self.stop();
        }
        self.generation += 1;
        self.running = true;
        debug!("Clock started (generation {})", self.generation);
        self.generation
    }

    /// Stops the clock. Calling it on a stopped clock does nothing.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            debug!(
                "Clock stopped at {} (generation {})",
                format_clock(self.elapsed),
                self.generation
            );
        }
    }

    /// Zeroes the elapsed time. Does not change the running state.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Adds one tick if the clock is running and `generation` is the current run.
    /// Returns whether the tick was applied.
    pub fn tick(&mut self, generation: u64) -> bool {
        if !self.running || generation != self.generation {
            return false;
        }
        self.elapsed += TICK;
        true
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Generation of the most recent run.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Formats a duration as `m:ss`. Minutes are not wrapped into hours.
pub fn format_clock(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
