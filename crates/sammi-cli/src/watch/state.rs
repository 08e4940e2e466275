//! Watch-mode bookkeeping, owned by the rebuild loop.

use std::path::{Path, PathBuf};

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchPhase {
    /// Nothing scheduled.
    Idle,
    /// A rebuild is scheduled for the current deadline.
    Pending,
    /// A rebuild is running.
    Building,
}

#[derive(Debug)]
pub struct WatchState {
    phase: WatchPhase,
    deadline: Option<Instant>,
    last_bundle: Option<PathBuf>,
    rebuilds: u64,
    failures: u64,
}

impl Default for WatchState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl WatchState {
    /// `last_bundle` is the output of the build that preceded watching.
    pub fn new(last_bundle: Option<PathBuf>) -> Self {
        Self {
            phase: WatchPhase::Idle,
            deadline: None,
            last_bundle,
            rebuilds: 0,
            failures: 0,
        }
    }

    pub fn phase(&self) -> WatchPhase {
        self.phase
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_building(&self) -> bool {
        self.phase == WatchPhase::Building
    }

    /// Completed rebuilds, successful or not.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn last_bundle(&self) -> Option<&Path> {
        self.last_bundle.as_deref()
    }

    /// Schedule (or reschedule) a rebuild at `deadline`.
    pub fn arm(&mut self, deadline: Instant) {
        debug_assert!(!self.is_building());
        self.deadline = Some(deadline);
        self.phase = WatchPhase::Pending;
    }

    pub fn begin_build(&mut self) {
        self.deadline = None;
        self.phase = WatchPhase::Building;
    }

    pub fn finish_build(&mut self, bundle: Option<PathBuf>) {
        self.rebuilds += 1;
        match bundle {
            Some(path) => self.last_bundle = Some(path),
            None => self.failures += 1,
        }
        self.phase = WatchPhase::Idle;
    }
}
