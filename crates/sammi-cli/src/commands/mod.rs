//! Command implementations.
//!
//! `build` and `dev` share one pipeline; they differ only in the mode used
//! when neither the command line nor the config picks one.

pub mod build;
pub mod dev;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;

use std::sync::Arc;

use sammi_config::{BuildMode, ResolvedExtensionConfig, resolve_config};
use tokio::sync::watch;
use tracing::debug;

use crate::build::{BuildOrchestrator, BuildReport, BuildSession, Bundler, CommandBundler};
use crate::cli::BuildArgs;
use crate::error::Result;
use crate::ui::{self, Logger};

/// Resolve the config, then run the initial build and, if asked, watch mode.
pub(crate) async fn run_pipeline(
    args: &BuildArgs,
    default_mode: BuildMode,
    no_color: bool,
) -> Result<BuildReport> {
    let color = ui::should_use_color() && !no_color;
    execute_with(
        args,
        default_mode,
        |config| {
            let logger = Logger::terminal(
                config.next_config.log_level,
                config.next_config.clear_screen,
                color,
            );
            (logger, CommandBundler::from_config(config))
        },
        interrupt_signal(),
    )
    .await
}

/// Resolve the config from `args` and build with whatever `setup` returns.
///
/// `setup` only runs once the config is fully resolved, so configuration
/// errors never reach the bundler.
pub async fn execute_with<B, F>(
    args: &BuildArgs,
    default_mode: BuildMode,
    setup: F,
    shutdown: watch::Receiver<bool>,
) -> Result<BuildReport>
where
    B: Bundler,
    F: FnOnce(&ResolvedExtensionConfig) -> (Logger, B),
{
    let config = resolve_config(&args.overrides(), default_mode)?;
    debug!(root = %config.root.display(), mode = %config.mode(), "config resolved");

    let (logger, bundler) = setup(&config);
    let session = BuildSession::new(config, Arc::new(logger));
    let orchestrator = BuildOrchestrator::new(session, bundler);
    orchestrator.run(shutdown).await
}

/// A receiver that flips to `true` on the first Ctrl+C.
fn interrupt_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                debug!("interrupt received");
                let _ = tx.send(true);
            }
            Err(err) => {
                debug!(%err, "unable to listen for interrupts");
                // Keep the sender alive so watch mode is not torn down.
                std::future::pending::<()>().await;
            }
        }
    });
    rx
}
