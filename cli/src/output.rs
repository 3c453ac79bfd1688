//! Result output for the `connect-packager` command.

use camino::Utf8PathBuf;
use connect_packager::{ArchiveOutput, PackageManifest};
use serde::Serialize;
use std::io::Write;

/// What a successful run produced.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BuildSummary {
    /// Extension name.
    pub name: String,
    /// Packaged version.
    pub version: String,
    /// Path to the created archive.
    pub archive: Utf8PathBuf,
    /// Lowercase hex SHA-256 of the archive.
    pub sha256: String,
    /// Number of archive entries, including `package.xml`.
    pub entries: usize,
}

impl BuildSummary {
    /// Summarise a finished build.
    ///
    /// Non UTF-8 archive paths are converted lossily for display.
    #[must_use]
    pub fn new(manifest: &PackageManifest, output: &ArchiveOutput) -> Self {
        Self {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            archive: Utf8PathBuf::from(output.archive_path.to_string_lossy().into_owned()),
            sha256: output.sha256.clone(),
            entries: output.entry_count,
        }
    }

    /// Human-readable confirmation line.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!("Created {}", self.archive)
    }

    /// Write the summary to `out`, as pretty JSON when `json` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or the write fails.
    pub fn write_to(&self, out: &mut dyn Write, json: bool) -> crate::error::Result<()> {
        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(self)?)?;
        } else {
            writeln!(out, "{}", self.display_text())?;
        }
        Ok(())
    }
}
