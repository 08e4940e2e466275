//! User-authored extension configuration.
//!
//! `ExtensionConfig` mirrors `sammi.config.*` one to one. It is only ever built
//! through [`ExtensionConfig::from_value`], which runs the schema validator
//! first so every violation is reported together.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, FieldViolation, Result};
use crate::types::{BuildMode, LogLevel};
use crate::validation::{ConfigValidator, SchemaValidator, strip_nulls};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionConfig {
    /// Unique extension id; letters, digits, dashes and underscores.
    pub id: String,

    /// Display name shown in SAMMI Bridge and SAMMI Core.
    pub name: String,

    /// Description shown when hovering the extension in Bridge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,

    /// Numbers and dots, optionally followed by a `-suffix`.
    pub version: String,

    /// Purely informational; accepts a name, an object or a list of either.
    #[serde(
        default,
        rename = "author",
        deserialize_with = "deserialize_authors",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub authors: Vec<Author>,

    /// Script entry point, relative to the project root.
    pub entry: String,

    /// HTML fragment rendered as the extension panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<String>,

    /// JSON deck imported into SAMMI Core on install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over: Option<String>,

    #[serde(default)]
    pub out: OutConfig,

    #[serde(default)]
    pub next_config: NextConfig,

    #[serde(default)]
    pub bundler: BundlerConfig,

    /// Unrecognized top-level keys, kept for forward compatibility.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Info(AuthorInfo),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Author {
    pub fn name(&self) -> &str {
        match self {
            Author::Name(name) => name,
            Author::Info(info) => &info.name,
        }
    }
}

/// Output naming. Every field is optional so the block can act as a merge layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sef: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextConfig {
    /// Overrides the command's default mode; `--mode` wins over this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<BuildMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_screen: Option<bool>,
    /// Rebuild when watched files change; `--watch` wins over this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch: Option<bool>,
}

/// External bundler invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Extra arguments appended after the generated ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl ExtensionConfig {
    /// Validate a raw document and convert it into a typed config.
    ///
    /// `origin` names the document in error reports (usually its path).
    ///
    /// # Example
    ///
    /// ```
    /// use sammi_config::ExtensionConfig;
    /// use serde_json::json;
    ///
    /// let config = ExtensionConfig::from_value(
    ///     json!({
    ///         "id": "my-ext",
    ///         "name": "My Ext",
    ///         "version": "1.0.0",
    ///         "entry": "src/script.ts"
    ///     }),
    ///     "inline",
    /// )
    /// .unwrap();
    /// assert_eq!(config.id, "my-ext");
    /// ```
    pub fn from_value(mut value: Value, origin: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        let violations = SchemaValidator.validate(&value);
        if !violations.is_empty() {
            return Err(ConfigError::Invalid { origin, violations });
        }
        strip_nulls(&mut value);

        serde_json::from_value(value).map_err(|e| ConfigError::Invalid {
            origin,
            violations: vec![FieldViolation::new("config", e.to_string())],
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    // Tried first: a sequence would otherwise bind to `AuthorInfo` positionally.
    Many(Vec<Author>),
    One(Author),
}

fn deserialize_authors<'de, D>(deserializer: D) -> std::result::Result<Vec<Author>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(author)) => vec![author],
        Some(OneOrMany::Many(authors)) => authors,
    })
}
