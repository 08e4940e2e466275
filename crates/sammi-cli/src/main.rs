//! SAMMI Next CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use sammi_cli::cli::{self, Cli, Command};
use sammi_cli::ui::{self, LogOptions, Logger};
use sammi_cli::{commands, error, logger};
use sammi_config::LogLevel;
use sammi_config::defaults::DEFAULT_LOG_LEVEL;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = cli::parse_failure_code(&err);
            let _ = err.print();
            return ExitCode::from(code);
        }
    };
    logger::init_logger(args.verbose, args.no_color);

    let no_color = args.no_color;
    let command = args.into_command();
    let threshold = match &command {
        Command::Build(args) | Command::Dev(args) => args.log_level.map(LogLevel::from),
    }
    .unwrap_or(DEFAULT_LOG_LEVEL);

    let result = match command {
        Command::Build(args) => commands::build_execute(args, no_color).await,
        Command::Dev(args) => commands::dev_execute(args, no_color).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let report = error::cli_error_to_miette(err);
            let logger = Logger::terminal(threshold, false, ui::should_use_color() && !no_color);
            logger.error(
                format!("error during build:\n{report:?}"),
                LogOptions::default(),
            );
            ExitCode::FAILURE
        }
    }
}
