//! Debounced, non-overlapping rebuilds.
//!
//! Every change (re)arms a fixed window. When the window elapses without
//! another change, exactly one rebuild runs. The rebuild is awaited inline, so
//! a second one can never start while the first is in flight; changes that
//! arrive meanwhile wait in the channel and arm the next window.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::debug;

use crate::error::BuildError;
use crate::ui::{LogOptions, Logger, SharedError};
use crate::watch::state::WatchState;
use crate::watch::watcher::FileChange;

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

pub struct RebuildScheduler {
    window: Duration,
    root: PathBuf,
    state: WatchState,
}

impl RebuildScheduler {
    pub fn new(window: Duration, root: impl Into<PathBuf>, last_bundle: Option<PathBuf>) -> Self {
        Self {
            window,
            root: root.into(),
            state: WatchState::new(last_bundle),
        }
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Drive rebuilds until `shutdown` flips to `true` or its sender goes away.
    ///
    /// A failed rebuild is logged and the loop keeps going.
    pub async fn run<F, Fut>(
        &mut self,
        events: &mut mpsc::Receiver<FileChange>,
        shutdown: &mut watch::Receiver<bool>,
        logger: &Logger,
        mut rebuild: F,
    ) where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<PathBuf, BuildError>>,
    {
        let mut events_open = true;

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }
            let deadline = self.state.deadline();

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }

                event = events.recv(), if events_open => match event {
                    Some(change) => {
                        logger.info(change.describe(&self.root));
                        self.state.arm(Instant::now() + self.window);
                    }
                    None => {
                        debug!("watcher channel closed");
                        events_open = false;
                    }
                },

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.rebuild_now(logger, &mut rebuild).await;
                }
            }
        }
    }

    async fn rebuild_now<F, Fut>(&mut self, logger: &Logger, rebuild: &mut F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<PathBuf, BuildError>>,
    {
        self.state.begin_build();
        let started = Instant::now();

        match rebuild().await {
            Ok(bundle) => {
                debug!(bundle = %bundle.display(), "rebuild finished");
                self.state.finish_build(Some(bundle));
            }
            Err(err) => {
                let message = format!("rebuild failed: {err}");
                let error: SharedError = Arc::new(err);
                logger.error(
                    message,
                    LogOptions {
                        elapsed: Some(started.elapsed()),
                        error: Some(error),
                        ..Default::default()
                    },
                );
                self.state.finish_build(None);
            }
        }
    }
}
