//! Command-line front end for `connect-packager`.
//!
//! The binary in `main.rs` stays thin: it parses [`cli::Cli`], initialises
//! logging and hands over to [`run::run`], which merges configuration,
//! builds the package and prints a [`output::BuildSummary`].

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod run;

pub use error::{CliError, Result};
