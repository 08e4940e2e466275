//! Layered resolution: defaults, then the config file, then command-line overrides.
//!
//! This is the only place relative paths are resolved. Everything downstream
//! works with the absolute paths held by [`ResolvedExtensionConfig`].

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{Author, BundlerConfig, ExtensionConfig, NextConfig, OutConfig};
use crate::defaults::{
    DEFAULT_BUNDLER_COMMAND, DEFAULT_LOG_LEVEL, DEFAULT_OUT_DIR, DEFAULT_OUT_JS, DEFAULT_OUT_SEF,
    default_bundler, default_next_config, default_out,
};
use crate::discovery::ConfigDiscovery;
use crate::error::{ConfigError, Result};
use crate::merge::Merge;
use crate::types::{BuildMode, LogLevel};
use crate::validation::validate_out;

/// Command-line layer. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub out_dir: Option<String>,
    pub out_js: Option<String>,
    pub out_sef: Option<String>,
    pub log_level: Option<LogLevel>,
    pub mode: Option<BuildMode>,
    pub clear_screen: Option<bool>,
    pub watch: Option<bool>,
}

impl ConfigOverrides {
    fn out(&self) -> OutConfig {
        OutConfig {
            dir: self.out_dir.clone(),
            js: self.out_js.clone(),
            sef: self.out_sef.clone(),
        }
    }

    fn next_config(&self) -> NextConfig {
        NextConfig {
            mode: self.mode,
            log_level: self.log_level,
            clear_screen: self.clear_screen,
            watch: self.watch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOut {
    /// Absolute output directory.
    pub dir: PathBuf,
    pub js: String,
    pub sef: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedNextConfig {
    pub mode: BuildMode,
    pub log_level: LogLevel,
    pub clear_screen: bool,
    pub watch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBundler {
    pub command: String,
    pub args: Vec<String>,
}

/// Fully defaulted configuration with absolute, cleaned paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExtensionConfig {
    pub root: PathBuf,
    pub id: String,
    pub name: String,
    pub info: String,
    pub version: String,
    pub authors: Vec<Author>,
    pub entry: PathBuf,
    pub external: Option<PathBuf>,
    pub over: Option<PathBuf>,
    pub out: ResolvedOut,
    pub next_config: ResolvedNextConfig,
    pub bundler: ResolvedBundler,
    pub extra: Map<String, Value>,
}

impl ResolvedExtensionConfig {
    pub fn mode(&self) -> BuildMode {
        self.next_config.mode
    }

    /// `{out.dir}/{out.js}`, written by the bundler.
    pub fn bundle_path(&self) -> PathBuf {
        self.out.dir.join(&self.out.js)
    }

    /// `{out.dir}/{out.sef}`
    pub fn sef_path(&self) -> PathBuf {
        self.out.dir.join(&self.out.sef)
    }

    pub fn preview_path(&self) -> PathBuf {
        self.out.dir.join("preview.html")
    }
}

/// Merges config layers for one project root.
pub struct ConfigResolver {
    root: PathBuf,
}

impl ConfigResolver {
    /// `root` should already be absolute.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into().clean(),
        }
    }

    /// Merge defaults, `config` and `overrides`, then normalize and check paths.
    ///
    /// `default_mode` is the mode implied by the command being run.
    ///
    /// # Errors
    ///
    /// `Invalid` when a merged output name breaks the naming rules and
    /// `PathNotFound` when the entry or a declared fragment file is missing.
    pub fn resolve(
        &self,
        config: ExtensionConfig,
        overrides: &ConfigOverrides,
        default_mode: BuildMode,
    ) -> Result<ResolvedExtensionConfig> {
        let mut out = default_out();
        out.merge(config.out);
        out.merge(overrides.out());

        let violations = validate_out(&out);
        if !violations.is_empty() {
            return Err(ConfigError::Invalid {
                origin: "command line".to_string(),
                violations,
            });
        }

        let mut next = default_next_config(default_mode);
        next.merge(config.next_config);
        next.merge(overrides.next_config());

        let mut bundler = default_bundler();
        bundler.merge(config.bundler);

        let entry = self.existing("entry", &config.entry)?;
        let external = config
            .external
            .as_deref()
            .map(|p| self.existing("external", p))
            .transpose()?;
        let over = config
            .over
            .as_deref()
            .map(|p| self.existing("over", p))
            .transpose()?;

        let resolved = ResolvedExtensionConfig {
            root: self.root.clone(),
            id: config.id,
            name: config.name,
            info: config.info.unwrap_or_default(),
            version: config.version,
            authors: config.authors,
            entry,
            external,
            over,
            out: ResolvedOut {
                dir: self.absolute(out.dir.as_deref().unwrap_or(DEFAULT_OUT_DIR)),
                js: out.js.unwrap_or_else(|| DEFAULT_OUT_JS.to_string()),
                sef: out.sef.unwrap_or_else(|| DEFAULT_OUT_SEF.to_string()),
            },
            next_config: ResolvedNextConfig {
                mode: next.mode.unwrap_or(default_mode),
                log_level: next.log_level.unwrap_or(DEFAULT_LOG_LEVEL),
                clear_screen: next.clear_screen.unwrap_or(true),
                watch: next.watch.unwrap_or(false),
            },
            bundler: ResolvedBundler {
                command: bundler
                    .command
                    .unwrap_or_else(|| DEFAULT_BUNDLER_COMMAND.to_string()),
                args: bundler.args,
            },
            extra: config.extra,
        };

        debug!(
            id = %resolved.id,
            mode = %resolved.next_config.mode,
            out_dir = %resolved.out.dir.display(),
            "resolved config"
        );

        Ok(resolved)
    }

    fn absolute(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path).clean()
    }

    fn existing(&self, field: &'static str, path: &str) -> Result<PathBuf> {
        let path = self.absolute(path);
        if !path.is_file() {
            return Err(ConfigError::PathNotFound { field, path });
        }
        Ok(path)
    }
}

/// Discover, validate and resolve the config for one invocation.
///
/// The root comes from `overrides.root`, relative to the current directory,
/// and defaults to the current directory itself.
pub fn resolve_config(
    overrides: &ConfigOverrides,
    default_mode: BuildMode,
) -> Result<ResolvedExtensionConfig> {
    let cwd = std::env::current_dir()?;
    let root = match &overrides.root {
        Some(root) => cwd.join(root).clean(),
        None => cwd,
    };

    let loaded = ConfigDiscovery::new(&root).load(overrides.config.as_deref())?;
    ConfigResolver::new(root).resolve(loaded.config, overrides, default_mode)
}
