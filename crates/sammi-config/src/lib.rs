pub mod config;
pub mod defaults;
pub mod discovery;
pub mod error;
pub mod merge;
pub mod resolve;
pub mod types;
pub mod validation;

// Re-export main types
pub use config::*;
pub use error::*;
pub use types::*;

// Re-export discovery, validation and resolution
pub use discovery::{
    CONFIG_FILE_NAMES, ConfigDiscovery, ConfigSource, LoadedConfig, StructuredConfigSource,
};
pub use merge::Merge;
pub use resolve::{
    ConfigOverrides, ConfigResolver, ResolvedBundler, ResolvedExtensionConfig, ResolvedNextConfig,
    ResolvedOut, resolve_config,
};
pub use validation::{ConfigValidator, SchemaValidator, validate_out};
