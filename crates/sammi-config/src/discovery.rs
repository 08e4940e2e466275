//! File-based config discovery
//!
//! Finds `sammi.config.*` in a project root and loads it through a
//! [`ConfigSource`]. Only declarative formats are supported.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Json, Toml, Yaml};
use serde_json::Value;
use tracing::debug;

use crate::config::ExtensionConfig;
use crate::error::{ConfigError, Result};

/// Candidate file names, searched in order.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    "sammi.config.json",
    "sammi.config.toml",
    "sammi.config.yaml",
    "sammi.config.yml",
];

/// Turns a config file into a raw document.
pub trait ConfigSource {
    fn load(&self, path: &Path) -> Result<Value>;
}

/// Reads JSON, TOML and YAML documents through figment providers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredConfigSource;

impl ConfigSource for StructuredConfigSource {
    fn load(&self, path: &Path) -> Result<Value> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let figment = match extension.as_deref() {
            Some("json") => Figment::from(Json::file_exact(path)),
            Some("toml") => Figment::from(Toml::file_exact(path)),
            Some("yaml" | "yml") => Figment::from(Yaml::file_exact(path)),
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        figment.extract::<Value>().map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// A config document together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: ExtensionConfig,
}

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use sammi_config::ConfigDiscovery;
///
/// let loaded = ConfigDiscovery::new(".").load(None).unwrap();
/// println!("{} from {}", loaded.config.id, loaded.path.display());
/// ```
pub struct ConfigDiscovery<S = StructuredConfigSource> {
    root: PathBuf,
    source: S,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_source(root, StructuredConfigSource)
    }
}

impl<S: ConfigSource> ConfigDiscovery<S> {
    pub fn with_source(root: impl AsRef<Path>, source: S) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First existing candidate in the root directory.
    pub fn find(&self) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
    }

    /// Pick the config file to load.
    ///
    /// A relative `explicit` path is joined to the root.
    ///
    /// # Errors
    ///
    /// `ExplicitNotFound` when `explicit` does not exist, `NotFound` when no
    /// candidate does.
    pub fn locate(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(explicit) = explicit {
            let path = self.root.join(explicit);
            if !path.is_file() {
                return Err(ConfigError::ExplicitNotFound(path));
            }
            return Ok(path);
        }

        self.find().ok_or_else(|| ConfigError::NotFound {
            root: self.root.clone(),
            candidates: CONFIG_FILE_NAMES.to_vec(),
        })
    }

    /// Locate, read and validate the config document.
    pub fn load(&self, explicit: Option<&Path>) -> Result<LoadedConfig> {
        let path = self.locate(explicit)?;
        debug!(path = %path.display(), "loading config");

        let value = self.source.load(&path)?;
        let config = ExtensionConfig::from_value(value, path.display().to_string())?;

        Ok(LoadedConfig { path, config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn json_wins_over_later_candidates() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sammi.config.yml"), "id: b").unwrap();
        fs::write(dir.path().join("sammi.config.json"), "{}").unwrap();

        let found = ConfigDiscovery::new(dir.path()).find().unwrap();
        assert_eq!(found, dir.path().join("sammi.config.json"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sammi.config.js");
        fs::write(&path, "export default {}").unwrap();

        let err = StructuredConfigSource.load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(p) if p == path));
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sammi.config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = StructuredConfigSource.load(&path).unwrap_err();
        match err {
            ConfigError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
