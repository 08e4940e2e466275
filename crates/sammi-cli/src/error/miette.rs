//! Miette diagnostic conversion for CLI errors.

use miette::{Report, miette};
use sammi_config::ConfigError;

use crate::build::BundlerError;
use crate::error::{BuildError, CliError};

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Build(e) => build_error_to_miette(e),
        CliError::WatchShutdown(e) => miette!(
            code = "sammi::watch",
            "failed to stop watching files: {}",
            e
        ),
        _ => miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::Invalid { .. } => miette!(
            code = "sammi::config::invalid",
            help = "fix the fields listed above in your sammi.config file",
            "{}",
            err
        ),
        ConfigError::PathNotFound { field, .. } => miette!(
            code = "sammi::config::path",
            help = format!("check the `{field}` field in your config"),
            "{}",
            err
        ),
        other => miette!(code = "sammi::config", "{}", other),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::Bundler(BundlerError::Spawn { ref command, .. }) => miette!(
            code = "sammi::bundler",
            help = format!(
                "install `{command}` or set `bundler.command` in your config to another bundler"
            ),
            "{}",
            err
        ),
        BuildError::Bundler(_) => miette!(code = "sammi::bundler", "{}", err),
        BuildError::Packaging(_) => miette!(code = "sammi::package", "{}", err),
        BuildError::OutputNotWritable { .. } => miette!("{}", err),
    }
}
