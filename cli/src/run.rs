//! Run orchestration: resolve settings, build the manifest, write the
//! archive and report the result.

use crate::cli::Cli;
use crate::config::PackagerConfig;
use crate::error::{CliError, Result};
use crate::output::BuildSummary;
use camino::{Utf8Path, Utf8PathBuf};
use connect_packager::{ArchiveOptions, Packager, Reporter, build_tarball};
use std::io::Write;

/// Fully resolved inputs for one build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// The connect descriptor to package.
    pub descriptor: Utf8PathBuf,
    /// The Magento working tree.
    pub base_dir: Utf8PathBuf,
    /// Archive location and compression.
    pub archive: ArchiveOptions,
}

impl Settings {
    /// Merge CLI flags over the configuration file over defaults.
    ///
    /// Relative paths given on the command line or in the configuration are
    /// resolved against `cwd`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingDescriptor`] when no descriptor was given.
    pub fn resolve(cli: &Cli, config: &PackagerConfig, cwd: &Utf8Path) -> Result<Self> {
        let descriptor = cli.descriptor.as_deref().ok_or(CliError::MissingDescriptor)?;
        let base_dir = cli
            .base_dir
            .as_deref()
            .or(config.base_dir.as_deref())
            .map_or_else(|| cwd.to_owned(), |dir| cwd.join(dir));

        Ok(Self {
            descriptor: cwd.join(descriptor),
            archive: ArchiveOptions {
                output: cli
                    .output
                    .as_deref()
                    .map(|output| cwd.join(output).into_std_path_buf()),
                build_dir: config.build_dir.clone().into_std_path_buf(),
                compression: config.compression,
            },
            base_dir,
        })
    }
}

/// Return the current directory as a UTF-8 path.
///
/// # Errors
///
/// Returns [`CliError::Io`] if the directory cannot be determined and
/// [`CliError::NonUtf8Path`] if it is not valid UTF-8.
pub fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|err| CliError::NonUtf8Path {
        path: err.into_path_buf(),
    })
}

/// Build the package described by `cli` and print the summary to `stdout`.
///
/// # Errors
///
/// Returns [`CliError::MissingDescriptor`] before touching the filesystem
/// when no descriptor was given, otherwise any configuration, packaging or
/// output error.
pub fn run(
    cli: &Cli,
    cwd: &Utf8Path,
    reporter: &dyn Reporter,
    stdout: &mut dyn Write,
) -> Result<BuildSummary> {
    if cli.descriptor.is_none() {
        return Err(CliError::MissingDescriptor);
    }

    let config = PackagerConfig::load(cli.config.as_deref(), cwd)?;
    let settings = Settings::resolve(cli, &config, cwd)?;
    log::debug!("resolved settings: {settings:?}");

    let packager = Packager::new(settings.base_dir.as_std_path(), reporter);
    let manifest = packager.build_manifest(settings.descriptor.as_std_path())?;
    let output = build_tarball(
        &manifest,
        settings.base_dir.as_std_path(),
        &settings.archive,
        reporter,
    )?;

    let summary = BuildSummary::new(&manifest, &output);
    summary.write_to(stdout, cli.json)?;
    Ok(summary)
}
