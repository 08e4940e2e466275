//! Watch mode: file notifications feeding a debounced rebuild loop.

mod scheduler;
mod state;
mod watcher;

pub use scheduler::{DEBOUNCE_WINDOW, RebuildScheduler};
pub use state::{WatchPhase, WatchState};
pub use watcher::{FileChange, FileWatcher, WatchTargets};
