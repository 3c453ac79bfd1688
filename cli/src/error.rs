//! Error types for the `connect-packager` command.

use crate::config::ConfigError;
use connect_packager::PackagerError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a `connect-packager` run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Building the manifest or archive failed.
    #[error(transparent)]
    Packager(#[from] PackagerError),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No connect descriptor was given on the command line.
    #[error("no connect descriptor given; usage: connect-packager [OPTIONS] <DESCRIPTOR>")]
    MissingDescriptor,

    /// A path required for the run is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// The JSON summary could not be serialised.
    #[error("failed to serialise summary: {0}")]
    Summary(#[from] serde_json::Error),

    /// Writing to stdout or reading the current directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
