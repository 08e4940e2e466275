use crate::config::{BundlerConfig, NextConfig, OutConfig};
use crate::types::{BuildMode, LogLevel};

pub const DEFAULT_OUT_DIR: &str = "dist";
pub const DEFAULT_OUT_JS: &str = "extension.js";
pub const DEFAULT_OUT_SEF: &str = "extension.sef";
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
pub const DEFAULT_BUNDLER_COMMAND: &str = "rolldown";

/// Global namespace object every extension bundle attaches itself to.
pub const GLOBAL_NAME: &str = "SAMMIExtensions";

pub fn default_out() -> OutConfig {
    OutConfig {
        dir: Some(DEFAULT_OUT_DIR.to_string()),
        js: Some(DEFAULT_OUT_JS.to_string()),
        sef: Some(DEFAULT_OUT_SEF.to_string()),
    }
}

pub fn default_next_config(mode: BuildMode) -> NextConfig {
    NextConfig {
        mode: Some(mode),
        log_level: Some(DEFAULT_LOG_LEVEL),
        clear_screen: Some(true),
        watch: Some(false),
    }
}

pub fn default_bundler() -> BundlerConfig {
    BundlerConfig {
        command: Some(DEFAULT_BUNDLER_COMMAND.to_string()),
        args: Vec::new(),
    }
}
