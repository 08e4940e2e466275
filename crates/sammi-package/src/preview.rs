//! Standalone preview page.

use std::fs;
use std::path::PathBuf;

use sammi_config::ResolvedExtensionConfig;
use tracing::debug;

use crate::error::Result;
use crate::serializer::PackageSources;

const BLUEPRINT: &str = include_str!("../assets/preview.blueprint.html");

const EXTERNAL_PLACEHOLDER: &str = "{{EXTERNAL}}";
const SCRIPT_PLACEHOLDER: &str = "{{SCRIPT}}";

/// Fill the embedded blueprint with the external fragment and the bundle.
///
/// Both placeholders are replaced literally wherever they occur. The
/// fragment is inserted untrimmed.
pub fn render_preview(id: &str, sources: &PackageSources) -> String {
    let external = sources
        .external
        .as_deref()
        .filter(|content| !content.is_empty())
        .map(|content| format!("<div id=\"{id}-external\">{content}</div>"))
        .unwrap_or_default();

    BLUEPRINT
        .replace(EXTERNAL_PLACEHOLDER, &external)
        .replace(SCRIPT_PLACEHOLDER, &sources.script)
}

/// Render and write `{out.dir}/preview.html`.
pub fn write_preview(config: &ResolvedExtensionConfig) -> Result<PathBuf> {
    let sources = PackageSources::read(config)?;
    let path = config.preview_path();
    fs::write(&path, render_preview(&config.id, &sources))?;
    debug!(path = %path.display(), "wrote preview");
    Ok(path)
}
