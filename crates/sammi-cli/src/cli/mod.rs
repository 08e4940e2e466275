//! Command-line interface definition.
//!
//! - `sammi-next [ROOT]` / `sammi-next build [ROOT]` - production build
//! - `sammi-next dev [ROOT]` - dev build

mod commands;
pub mod enums;

use clap::Parser;
use clap::error::ErrorKind;

pub use commands::{BuildArgs, Command};
pub use enums::*;

/// SAMMI Next - build and package SAMMI Bridge extensions
#[derive(Parser, Debug)]
#[command(
    name = "sammi-next",
    version,
    about = "Build and package SAMMI Bridge extensions",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Enable verbose diagnostic logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute; a bare invocation builds
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub build: BuildArgs,
}

/// Process exit code for a failed argument parse.
///
/// Help and version requests are not failures. Every other parse error,
/// including an unknown mode or log level, exits with 1 like any other fatal
/// configuration error.
pub fn parse_failure_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 1,
    }
}

impl Cli {
    /// Resolve the bare invocation into the `build` subcommand.
    pub fn into_command(self) -> Command {
        match self.command {
            Some(command) => command,
            None => Command::Build(self.build),
        }
    }
}
