//! SAMMI Next - build and package SAMMI Bridge extensions.
//!
//! The `sammi-next` binary is a thin shell over this library:
//!
//! - [`cli`] parses arguments
//! - [`commands`] resolves the config and drives a [`build::BuildOrchestrator`]
//! - [`watch`] turns file notifications into debounced rebuilds
//! - [`ui`] renders the prefixed, leveled build log

pub mod build;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;
pub mod watch;

pub use error::{BuildError, CliError, Result};
