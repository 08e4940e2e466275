//! Build orchestration.
//!
//! `build_once` runs bundler, packager and preview in sequence. `run` performs
//! the initial build and, when watching, hands control to the rebuild loop
//! until an interrupt arrives.

use std::path::PathBuf;
use std::time::Duration;

use sammi_package::{PackageSerializer, write_preview};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

use crate::build::bundler::{BuildDescriptor, Bundler, CommandBundler, VERSION};
use crate::build::session::BuildSession;
use crate::error::{BuildError, CliError, Result};
use crate::ui::{LogOptions, format_duration};
use crate::watch::{DEBOUNCE_WINDOW, FileWatcher, RebuildScheduler, WatchTargets};

/// Artifacts written by one build pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub bundle: PathBuf,
    pub sef: PathBuf,
    pub preview: PathBuf,
    pub elapsed: Duration,
}

pub struct BuildOrchestrator<B = CommandBundler> {
    session: BuildSession,
    bundler: B,
    serializer: PackageSerializer,
    window: Duration,
}

impl<B: Bundler> BuildOrchestrator<B> {
    pub fn new(session: BuildSession, bundler: B) -> Self {
        Self {
            session,
            bundler,
            serializer: PackageSerializer::new(),
            window: DEBOUNCE_WINDOW,
        }
    }

    pub fn bundler(&self) -> &B {
        &self.bundler
    }

    /// Bundle, package and render the preview once.
    pub async fn build_once(&self) -> Result<BuildReport, BuildError> {
        let config = self.session.config();
        let logger = self.session.logger();

        let out_dir = &config.out.dir;
        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|source| BuildError::OutputNotWritable {
                path: out_dir.clone(),
                source,
            })?;

        let started = Instant::now();
        let descriptor = BuildDescriptor::from_config(config);
        let bundle = self.bundler.bundle(&descriptor).await?;
        let bundled = Instant::now();
        logger.success(format!(
            "built {} in {}",
            config.out.js,
            format_duration(bundled - started)
        ));

        let sef = self.serializer.write(config)?;
        let packaged = Instant::now();
        logger.success(format!(
            "built {} in {}",
            config.out.sef,
            format_duration(packaged - bundled)
        ));

        let preview = write_preview(config)?;
        let finished = Instant::now();
        logger.success(format!(
            "built preview.html in {}",
            format_duration(finished - packaged)
        ));

        Ok(BuildReport {
            bundle: bundle.path,
            sef,
            preview,
            elapsed: finished - started,
        })
    }

    /// Initial build, then watch until `shutdown` flips to `true`.
    ///
    /// # Errors
    ///
    /// A failed initial build is returned. In watch mode, rebuild failures are
    /// logged and never returned; only a failure to stop the watcher is.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<BuildReport> {
        let config = self.session.config();
        let logger = self.session.logger();

        logger.info(format!(
            "SAMMI Next v{VERSION} building \"{}\" extension in {} mode...",
            config.name,
            self.session.mode()
        ));

        let started = Instant::now();
        let report = match self.build_once().await {
            Ok(report) => report,
            Err(err) => {
                logger.error("build failed", LogOptions::elapsed(started.elapsed()));
                return Err(err.into());
            }
        };

        if !config.next_config.watch {
            return Ok(report);
        }

        let (watcher, mut events) = FileWatcher::new(WatchTargets::from_config(config))?;
        logger.info("watching for file changes...");
        debug!(paths = ?watcher.watched(), "watch mode started");

        let mut scheduler =
            RebuildScheduler::new(self.window, &config.root, Some(report.bundle.clone()));
        let this = self;
        scheduler
            .run(&mut events, &mut shutdown, logger, move || async move {
                this.build_once().await.map(|report| report.bundle)
            })
            .await;

        logger.info("stopping watch mode...");
        watcher.close().map_err(CliError::WatchShutdown)?;
        debug!(rebuilds = scheduler.state().rebuilds(), "watch mode stopped");

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BundleOutput;
    use crate::build::BundlerError;
    use crate::ui::Logger;
    use async_trait::async_trait;
    use sammi_config::{BuildMode, ConfigOverrides, ConfigResolver, ExtensionConfig, LogLevel};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct WritingBundler;

    #[async_trait]
    impl Bundler for WritingBundler {
        async fn bundle(&self, descriptor: &BuildDescriptor) -> Result<BundleOutput, BundlerError> {
            let path = descriptor.out_path();
            fs::write(&path, format!("{}\nconsole.log(1);", descriptor.banner))
                .expect("write bundle");
            Ok(BundleOutput { path })
        }
    }

    #[tokio::test]
    async fn build_once_writes_every_artifact() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.ts"), "").unwrap();
        let config = ExtensionConfig::from_value(
            serde_json::json!({ "id": "demo", "name": "Demo", "version": "1.0.0", "entry": "main.ts" }),
            "test",
        )
        .unwrap();
        let resolved = ConfigResolver::new(dir.path())
            .resolve(config, &ConfigOverrides::default(), BuildMode::Dev)
            .unwrap();

        let (logger, buffer) = Logger::buffered(LogLevel::Info, false);
        let orchestrator =
            BuildOrchestrator::new(BuildSession::new(resolved, Arc::new(logger)), WritingBundler);
        let report = orchestrator.build_once().await.unwrap();

        assert!(report.bundle.is_file());
        assert!(report.sef.is_file());
        assert!(report.preview.is_file());
        let lines = buffer.lock().lines.clone();
        assert!(lines[0].starts_with("✔ [sammi-next] built extension.js in "));
        assert!(lines[1].starts_with("✔ [sammi-next] built extension.sef in "));
        assert!(lines[2].starts_with("✔ [sammi-next] built preview.html in "));
    }
}
