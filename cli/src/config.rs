//! Optional `connect-packager.toml` configuration.
//!
//! Every key is optional. Command-line flags take precedence over the file,
//! and the file takes precedence over built-in defaults.

use camino::{Utf8Path, Utf8PathBuf};
use connect_packager::archive::{DEFAULT_BUILD_DIR, DEFAULT_COMPRESSION};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// File name looked up in the current directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "connect-packager.toml";

/// Highest gzip level accepted in configuration.
pub const MAX_COMPRESSION: u32 = 9;

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists (or was named explicitly) but could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// The configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or contains unknown keys.
    #[error("invalid configuration {path}: {source}")]
    Parse {
        /// The configuration file.
        path: Utf8PathBuf,
        /// The TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// `compression` is outside the gzip range.
    #[error("compression level {level} is out of range; expected 0-{MAX_COMPRESSION}")]
    InvalidCompression {
        /// The configured level.
        level: u32,
    },
}

/// Settings read from `connect-packager.toml`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackagerConfig {
    /// Magento working tree.
    pub base_dir: Option<Utf8PathBuf>,
    /// Archive directory, relative to the working tree unless absolute.
    pub build_dir: Utf8PathBuf,
    /// Gzip level, 0-9.
    pub compression: u32,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            build_dir: Utf8PathBuf::from(DEFAULT_BUILD_DIR),
            compression: DEFAULT_COMPRESSION,
        }
    }
}

impl PackagerConfig {
    /// Parse configuration from TOML text read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::InvalidCompression`] for levels above 9.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use connect_packager_cli::config::PackagerConfig;
    ///
    /// let config = PackagerConfig::from_toml("compression = 9", Utf8Path::new("a.toml")).unwrap();
    /// assert_eq!(config.compression, 9);
    /// assert_eq!(config.build_dir, "build");
    /// ```
    pub fn from_toml(contents: &str, path: &Utf8Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        if config.compression > MAX_COMPRESSION {
            return Err(ConfigError::InvalidCompression {
                level: config.compression,
            });
        }
        Ok(config)
    }

    /// Load the explicit configuration file, or `connect-packager.toml` in
    /// `cwd` when present, or the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if an explicit file is missing or a
    /// discovered file cannot be read, plus any error from
    /// [`Self::from_toml`].
    pub fn load(explicit: Option<&Utf8Path>, cwd: &Utf8Path) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_owned(),
            None => {
                let discovered = cwd.join(CONFIG_FILE_NAME);
                if !discovered.is_file() {
                    log::debug!("no {CONFIG_FILE_NAME} in {cwd}; using defaults");
                    return Ok(Self::default());
                }
                discovered
            }
        };

        log::debug!("loading configuration from {path}");
        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&contents, &path)
    }
}
