//! Chronometer: turns wall-clock instants into contiguous polling windows.
//!
//! The caller supplies `now_ms` from any monotonic source. The first tick
//! after a start defines the logical zero; each following tick yields the
//! window `[previous tick, this tick)` in elapsed time. Pausing shifts the
//! timeline so the paused span never shows up in elapsed time.

use crate::dsl::units::TimeUnit;

use super::types::Window;

/// Run state of the chronometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Running,
}

#[derive(Debug, Clone)]
pub struct Chrono {
    state: PlayState,
    /// Wall-clock instant of elapsed zero.
    start_ms: Option<u64>,
    /// Wall-clock instant of the previous tick.
    then_ms: Option<u64>,
    /// Wall-clock instant of the last stop, until the next tick consumes it.
    stopped_at_ms: Option<u64>,
}

impl Chrono {
    /// A stopped chronometer at zero.
    pub fn new() -> Self {
        Self {
            state: PlayState::Stopped,
            start_ms: None,
            then_ms: None,
            stopped_at_ms: None,
        }
    }

    pub fn start(&mut self) {
        self.state = PlayState::Running;
    }

    /// Pause at `now_ms`. Does nothing if already stopped.
    pub fn stop(&mut self, now_ms: u64) {
        if self.state == PlayState::Running {
            self.state = PlayState::Stopped;
            self.stopped_at_ms = Some(now_ms);
        }
    }

    /// Forget elapsed time without changing the run state.
    pub fn reset(&mut self) {
        self.start_ms = None;
        self.then_ms = None;
        self.stopped_at_ms = None;
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Elapsed time at `now_ms`, or 0 before the first tick.
    pub fn elapsed(&self, now_ms: u64) -> u64 {
        let Some(start) = self.start_ms else {
            return 0;
        };
        // Time is frozen at the stop until the next tick resumes it.
        self.stopped_at_ms
            .unwrap_or(now_ms)
            .saturating_sub(start)
    }

    /// Advance to `now_ms` and return the elapsed window covered since the
    /// previous tick. Returns `None` while stopped.
    pub fn tick(&mut self, now_ms: u64) -> Option<Window> {
        if self.state == PlayState::Stopped {
            return None;
        }

        if let Some(stopped_at) = self.stopped_at_ms.take() {
            let paused = now_ms.saturating_sub(stopped_at);
            self.start_ms = self.start_ms.map(|s| s + paused);
            self.then_ms = self.then_ms.map(|t| t + paused);
        }
        let start = *self.start_ms.get_or_insert(now_ms);
        let then = self.then_ms.unwrap_or(now_ms);
        self.then_ms = Some(now_ms);

        Some(Window::new(
            then.saturating_sub(start),
            now_ms.saturating_sub(start),
        ))
    }
}

impl Default for Chrono {
    fn default() -> Self {
        Self::new()
    }
}

/// Format elapsed milliseconds as `HH:MM:SS.d`.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let hours = elapsed_ms / TimeUnit::Hour.millis();
    let minutes = (elapsed_ms / TimeUnit::Minute.millis()) % 60;
    let seconds = (elapsed_ms / TimeUnit::Second.millis()) % 60;
    let deciseconds = (elapsed_ms / TimeUnit::Decisecond.millis()) % 10;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{deciseconds}")
}
