//! Progress reporting for long-running snapshot work
//!
//! Fetching and exporting report through the [`Ui`] trait so the CLI can
//! print progress while tests stay silent.

use tracing::info;

/// Phases of snapshot maintenance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Checking,
    Fetching,
    Loading,
    Exporting,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Checking => write!(f, "Checking snapshot files"),
            Phase::Fetching => write!(f, "Fetching BONSAI tables"),
            Phase::Loading => write!(f, "Loading snapshot"),
            Phase::Exporting => write!(f, "Exporting to SQLite"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for UI implementations - console output or silent/test mode
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn log(&mut self, message: impl Into<String>);
}

/// Reports progress as log events, throttled to one event per step of
/// `every` items
pub struct ConsoleUi {
    every: u64,
    last_reported: u64,
}

impl ConsoleUi {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            last_reported: 0,
        }
    }
}

impl Default for ConsoleUi {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        self.last_reported = 0;
        info!("{}", phase);
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        let finished = total > 0 && current >= total;
        if finished || current >= self.last_reported + self.every {
            self.last_reported = current;
            if total > 0 {
                info!("{}: {}/{}", label.into(), current, total);
            } else {
                info!("{}: {}", label.into(), current);
            }
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        info!("{}", message.into());
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn log(&mut self, _message: impl Into<String>) {}
}
