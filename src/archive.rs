//! Gzip tar archive creation.
//!
//! The archive holds every manifest entry under its path relative to the
//! working tree, followed by `package.xml` at the archive root. The manifest
//! is staged in a temporary file inside the working tree, which is removed
//! when the build finishes or fails. The archive itself is written beside its
//! destination and only moved into place once it is complete, so a failed
//! build leaves no partial `.tgz` behind.

use crate::error::Result;
use crate::fingerprint::compute_sha256;
use crate::manifest::{MANIFEST_FILE_NAME, PackageManifest};
use crate::reporter::Reporter;
use crate::tree::ManifestNode;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default gzip level.
pub const DEFAULT_COMPRESSION: u32 = 6;

/// Default output directory, relative to the working tree.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Where and how to write the archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Explicit archive path. Overrides `build_dir` when set.
    pub output: Option<PathBuf>,
    /// Output directory, relative to the working tree unless absolute.
    pub build_dir: PathBuf,
    /// Gzip level, 0 (store) to 9 (best). Larger values are clamped.
    pub compression: u32,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            output: None,
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            compression: DEFAULT_COMPRESSION,
        }
    }
}

impl ArchiveOptions {
    /// Resolve the archive path for `manifest` inside the working tree at
    /// `root`.
    #[must_use]
    pub fn archive_path(&self, manifest: &PackageManifest, root: &Path) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| root.join(&self.build_dir).join(manifest.archive_file_name()))
    }
}

/// Result of a successful archive build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveOutput {
    /// Path to the created `.tgz` archive.
    pub archive_path: PathBuf,
    /// Lowercase hex SHA-256 of the archive.
    pub sha256: String,
    /// Number of tar entries, including `package.xml`.
    pub entry_count: usize,
}

/// A manifest entry resolved to its source path and archive name.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ArchiveEntry {
    source: PathBuf,
    name: String,
    is_dir: bool,
}

/// Write `manifest` and its entries to a gzip tar archive.
///
/// # Errors
///
/// Returns [`crate::PackagerError::Io`] if the build directory, temporary
/// manifest or archive cannot be written, or if a selected entry has
/// disappeared since the manifest was built, and
/// [`crate::PackagerError::XmlWrite`] if the manifest cannot be serialised.
pub fn build_tarball(
    manifest: &PackageManifest,
    root: &Path,
    options: &ArchiveOptions,
    reporter: &dyn Reporter,
) -> Result<ArchiveOutput> {
    let archive_path = options.archive_path(manifest, root);
    let archive_dir = archive_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(archive_dir)?;

    let mut staged = tempfile::Builder::new()
        .prefix(".package-")
        .suffix(".xml")
        .tempfile_in(root)?;
    staged.write_all(&manifest.to_xml()?)?;
    staged.flush()?;

    let entries = archive_entries(manifest, root);
    reporter.info(&format!(
        "Writing {} entries to {}",
        entries.len() + 1,
        archive_path.display()
    ));

    let partial = tempfile::Builder::new()
        .prefix(".archive-")
        .suffix(".part")
        .tempfile_in(archive_dir)?;
    let encoder = GzEncoder::new(partial, Compression::new(options.compression.min(9)));
    let mut archive = tar::Builder::new(encoder);
    for entry in &entries {
        reporter.debug(&format!("Adding {}", entry.name));
        if entry.is_dir {
            archive.append_dir(&entry.name, &entry.source)?;
        } else {
            archive.append_path_with_name(&entry.source, &entry.name)?;
        }
    }
    archive.append_path_with_name(staged.path(), MANIFEST_FILE_NAME)?;
    let partial = archive.into_inner()?.finish()?;
    partial.persist(&archive_path).map_err(|err| err.error)?;
    staged.close()?;

    Ok(ArchiveOutput {
        sha256: compute_sha256(&archive_path)?,
        archive_path,
        entry_count: entries.len() + 1,
    })
}

/// Flatten the manifest tree into archive entries in manifest order.
fn archive_entries(manifest: &PackageManifest, root: &Path) -> Vec<ArchiveEntry> {
    let mut entries = Vec::new();
    for target_root in &manifest.contents {
        let base = target_root.target.relative_dir();
        target_root.visit(|path, node| {
            let name = format!("{base}/{path}");
            entries.push(ArchiveEntry {
                source: root.join(&name),
                name,
                is_dir: matches!(node, ManifestNode::Dir { .. }),
            });
        });
    }
    entries
}
