//! Diagnostic tracing for the SAMMI Next CLI.
//!
//! User-facing build output goes through [`crate::ui::Logger`]. This module
//! only wires up `tracing`, which stays quiet unless `--verbose` or
//! `RUST_LOG` asks for it.
//!
//! ```rust,no_run
//! use sammi_cli::logger::init_logger;
//!
//! init_logger(true, false);
//! tracing::debug!("resolving config");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "sammi_cli=debug,sammi_config=debug,sammi_package=debug";
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Call once, before anything logs.
///
/// `verbose` wins over `RUST_LOG`; without either only warnings show.
pub fn init_logger(verbose: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose), no_color);
}

/// Install the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
