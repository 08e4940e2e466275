//! Bundler collaborator.
//!
//! The bundler compiles the entry module graph into a single IIFE script that
//! attaches itself to `SAMMIExtensions.<id>`. Anything that can honour a
//! [`BuildDescriptor`] can be plugged in through the [`Bundler`] trait.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use sammi_config::ResolvedExtensionConfig;
use sammi_config::defaults::GLOBAL_NAME;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Version stamped into every bundle banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// ECMAScript target handed to the bundler.
pub const TARGET: &str = "es2022";

/// Everything the bundler needs to produce one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDescriptor {
    pub entry: PathBuf,
    pub out_dir: PathBuf,
    pub out_file: String,
    pub target: &'static str,
    pub minify: bool,
    pub global_name: String,
    pub banner: String,
}

impl BuildDescriptor {
    pub fn from_config(config: &ResolvedExtensionConfig) -> Self {
        Self {
            entry: config.entry.clone(),
            out_dir: config.out.dir.clone(),
            out_file: config.out.js.clone(),
            target: TARGET,
            minify: config.mode().is_production(),
            global_name: format!("{GLOBAL_NAME}.{}", config.id),
            banner: format!(
                "/* {} v{} - Built with SAMMI Next v{VERSION} */",
                config.name, config.version
            ),
        }
    }

    pub fn out_path(&self) -> PathBuf {
        self.out_dir.join(&self.out_file)
    }
}

/// Where the bundler wrote its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutput {
    pub path: PathBuf,
}

#[derive(Debug, Error)]
pub enum BundlerError {
    #[error("failed to start bundler `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bundler `{command}` exited with {status}\n{stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("bundler finished but did not write {}", .0.display())]
    MissingOutput(PathBuf),
}

#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(&self, descriptor: &BuildDescriptor) -> Result<BundleOutput, BundlerError>;
}

/// Runs an external bundler CLI with rolldown-compatible flags.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    command: String,
    extra_args: Vec<String>,
    cwd: PathBuf,
}

impl CommandBundler {
    pub fn new(command: impl Into<String>, extra_args: Vec<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            command: command.into(),
            extra_args,
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &ResolvedExtensionConfig) -> Self {
        Self::new(
            config.bundler.command.clone(),
            config.bundler.args.clone(),
            &config.root,
        )
    }

    /// Arguments passed for `descriptor`, user arguments last.
    pub fn args(&self, descriptor: &BuildDescriptor) -> Vec<String> {
        let mut args = vec![
            descriptor.entry.display().to_string(),
            "--format".to_string(),
            "iife".to_string(),
            "--name".to_string(),
            descriptor.global_name.clone(),
            "--extend".to_string(),
            "--exports".to_string(),
            "named".to_string(),
            "--platform".to_string(),
            "browser".to_string(),
            "--target".to_string(),
            descriptor.target.to_string(),
            "--file".to_string(),
            descriptor.out_path().display().to_string(),
            "--banner".to_string(),
            descriptor.banner.clone(),
        ];
        if descriptor.minify {
            args.push("--minify".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[async_trait]
impl Bundler for CommandBundler {
    async fn bundle(&self, descriptor: &BuildDescriptor) -> Result<BundleOutput, BundlerError> {
        let args = self.args(descriptor);
        debug!(command = %self.command, ?args, "running bundler");

        let output = Command::new(&self.command)
            .args(&args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| BundlerError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BundlerError::Failed {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        let path = descriptor.out_path();
        if !path.is_file() {
            return Err(BundlerError::MissingOutput(path));
        }
        Ok(BundleOutput { path })
    }
}
