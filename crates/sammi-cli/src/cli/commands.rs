use clap::{Args, Subcommand};
use sammi_config::ConfigOverrides;
use std::path::PathBuf;

use crate::cli::enums::*;

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the extension (production mode unless --mode says otherwise)
    Build(BuildArgs),

    /// Build the extension in dev mode, without minification
    Dev(BuildArgs),
}

/// Options shared by `build` and `dev`
///
/// A repeated option keeps its last value.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArgs {
    /// Project root containing sammi.config.*
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Use the specified config file, relative to the root
    #[arg(short = 'c', long, value_name = "FILE", overrides_with = "config")]
    pub config: Option<PathBuf>,

    /// Log verbosity
    #[arg(
        short = 'l',
        long = "logLevel",
        alias = "log-level",
        value_enum,
        value_name = "LEVEL",
        overrides_with = "log_level"
    )]
    pub log_level: Option<LogLevel>,

    /// Allow or disable clearing the screen when logging
    #[arg(
        long = "clearScreen",
        alias = "clear-screen",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true,
        overrides_with = "clear_screen"
    )]
    pub clear_screen: Option<bool>,

    /// Set the build mode
    #[arg(short = 'm', long, value_enum, value_name = "MODE", overrides_with = "mode")]
    pub mode: Option<Mode>,

    /// Output directory [default: dist]
    #[arg(long = "outDir", alias = "out-dir", value_name = "DIR", overrides_with = "out_dir")]
    pub out_dir: Option<String>,

    /// Output file name for the JS bundle [default: extension.js]
    #[arg(long = "outJs", alias = "out-js", value_name = "NAME", overrides_with = "out_js")]
    pub out_js: Option<String>,

    /// Output file name for the SEF package [default: extension.sef]
    #[arg(long = "outSef", alias = "out-sef", value_name = "NAME", overrides_with = "out_sef")]
    pub out_sef: Option<String>,

    /// Rebuild when files change on disk
    #[arg(short = 'w', long, overrides_with = "watch")]
    pub watch: bool,
}

impl BuildArgs {
    /// The command-line layer of the config.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root: self.root.clone(),
            config: self.config.clone(),
            out_dir: self.out_dir.clone(),
            out_js: self.out_js.clone(),
            out_sef: self.out_sef.clone(),
            log_level: self.log_level.map(Into::into),
            mode: self.mode.map(Into::into),
            clear_screen: self.clear_screen,
            watch: self.watch.then_some(true),
        }
    }
}
