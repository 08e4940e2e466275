//! SEF serialization.
//!
//! [`PackageSources::read`] gathers the file contents a package needs and
//! [`PackageSerializer::serialize`] turns them into a document without touching
//! the filesystem, so equal inputs always produce byte-identical output.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sammi_config::defaults::GLOBAL_NAME;
use sammi_config::{BuildMode, ResolvedExtensionConfig};
use tracing::debug;

use crate::document::{PackageDocument, SectionKind};
use crate::error::{PackageError, Result};
use crate::hook::{CommandHookDetector, NamespaceDefaultDetector};

/// File contents feeding one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSources {
    pub external: Option<String>,
    pub script: String,
    pub over: Option<String>,
    /// Where `over` was read from, for error reports.
    pub over_path: Option<PathBuf>,
}

impl PackageSources {
    /// Read the bundle and any declared fragments.
    ///
    /// Fragment files that have disappeared since resolution are treated as
    /// absent. A missing bundle is an error.
    pub fn read(config: &ResolvedExtensionConfig) -> Result<Self> {
        let bundle = config.bundle_path();
        let script = match fs::read_to_string(&bundle) {
            Ok(script) => script,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PackageError::BundleMissing(bundle));
            }
            Err(source) => return Err(PackageError::Read { path: bundle, source }),
        };

        Ok(Self {
            external: read_optional(config.external.as_deref())?,
            script,
            over: read_optional(config.over.as_deref())?,
            over_path: config.over.clone(),
        })
    }
}

fn read_optional(path: Option<&Path>) -> Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PackageError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Serializes resolved configs into SEF documents.
///
/// # Example
///
/// ```
/// use sammi_package::{PackageSerializer, PackageSources, SectionKind};
/// # use sammi_config::*;
/// # let config = ResolvedExtensionConfig {
/// #     root: "/p".into(), id: "demo".into(), name: "Demo".into(), info: String::new(),
/// #     version: "1.0.0".into(), authors: vec![], entry: "/p/src/main.ts".into(),
/// #     external: None, over: None,
/// #     out: ResolvedOut { dir: "/p/dist".into(), js: "extension.js".into(), sef: "extension.sef".into() },
/// #     next_config: ResolvedNextConfig { mode: BuildMode::Dev, log_level: LogLevel::Info, clear_screen: false, watch: false },
/// #     bundler: ResolvedBundler { command: "rolldown".into(), args: vec![] },
/// #     extra: Default::default(),
/// # };
///
/// let sources = PackageSources { script: "console.log(1)".into(), ..Default::default() };
/// let doc = PackageSerializer::new().serialize(&config, &sources).unwrap();
/// assert_eq!(doc.body(SectionKind::InsertScript), "console.log(1)");
/// assert_eq!(doc.body(SectionKind::InsertCommand), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackageSerializer<D = NamespaceDefaultDetector> {
    detector: D,
}

impl PackageSerializer {
    pub fn new() -> Self {
        Self::with_detector(NamespaceDefaultDetector)
    }
}

impl<D: CommandHookDetector> PackageSerializer<D> {
    pub fn with_detector(detector: D) -> Self {
        Self { detector }
    }

    pub fn serialize(
        &self,
        config: &ResolvedExtensionConfig,
        sources: &PackageSources,
    ) -> Result<PackageDocument> {
        let over = over_body(config.mode(), sources)?;
        let command = if self.detector.detects_command_hook(&sources.script) {
            format!("{GLOBAL_NAME}['{}'].default()", config.id)
        } else {
            String::new()
        };

        Ok(PackageDocument::from_fn(|kind| match kind {
            SectionKind::ExtensionName => config.name.clone(),
            SectionKind::ExtensionInfo => config.info.clone(),
            SectionKind::ExtensionVersion => config.version.clone(),
            SectionKind::InsertExternal => external_body(&config.id, sources.external.as_deref()),
            SectionKind::InsertCommand => command.clone(),
            SectionKind::InsertHook => String::new(),
            SectionKind::InsertScript => sources.script.clone(),
            SectionKind::InsertOver => over.clone(),
        }))
    }

    /// Read sources, serialize, and write `{out.dir}/{out.sef}`.
    pub fn write(&self, config: &ResolvedExtensionConfig) -> Result<PathBuf> {
        let sources = PackageSources::read(config)?;
        let document = self.serialize(config, &sources)?;

        let path = config.sef_path();
        fs::write(&path, document.render())?;
        debug!(path = %path.display(), "wrote package");
        Ok(path)
    }
}

fn external_body(id: &str, external: Option<&str>) -> String {
    match external {
        Some(content) if !content.is_empty() => {
            format!("<div id=\"{id}-external\">\n{}\n</div>", content.trim())
        }
        _ => String::new(),
    }
}

fn over_body(mode: BuildMode, sources: &PackageSources) -> Result<String> {
    let Some(raw) = sources.over.as_deref().filter(|raw| !raw.is_empty()) else {
        return Ok(String::new());
    };

    let body = if mode.is_production() {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| PackageError::InvalidOver {
                path: sources.over_path.clone().unwrap_or_default(),
                message: e.to_string(),
            })?;
        serde_json::to_string(&value).map_err(|e| PackageError::InvalidOver {
            path: sources.over_path.clone().unwrap_or_default(),
            message: e.to_string(),
        })?
    } else {
        raw.to_string()
    };

    if body == "{}" {
        return Ok(String::new());
    }
    Ok(body)
}
