//! Recursive, filtered directory walking for `dir` content rules.
//!
//! The include/ignore filter applies to each entry's own name. A directory
//! that fails the filter is not yielded, but the walk still descends into it
//! so matching descendants are found. Entries are visited in file-name order
//! at each level, which keeps manifests and archives identical across
//! platforms.
//!
//! Symbolic links are classified by what they point at, so a linked file is
//! fingerprinted through its target. Linked directories are recorded but not
//! descended into. Dangling links are skipped.

use crate::error::{PackagerError, Result};
use crate::fingerprint::{Fingerprint, compute_fingerprint};
use crate::pattern::{EntryPattern, is_selected};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a selected entry is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory, recorded without its contents.
    Directory,
    /// A regular file and its content fingerprint.
    File(Fingerprint),
}

/// A selected filesystem entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkEntry {
    /// The directory containing the entry.
    pub parent: PathBuf,
    /// The entry's file name.
    pub name: String,
    /// Directory or fingerprinted file.
    pub kind: EntryKind,
}

impl WalkEntry {
    /// The entry's full path.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.parent.join(&self.name)
    }
}

/// Lazily walk `root`, yielding entries selected by `include` and `ignore`.
///
/// The root itself is never yielded. Files are fingerprinted as they are
/// reached, so an unreadable file surfaces as an `Err` item at that point.
///
/// # Examples
///
/// ```
/// use connect_packager::pattern::EntryPattern;
/// use connect_packager::walker::walk;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("A.php"), "<?php").unwrap();
/// std::fs::write(dir.path().join("B.txt"), "notes").unwrap();
///
/// let include = EntryPattern::parse(r"/\.php$/").unwrap();
/// let names: Vec<String> = walk(dir.path(), include.as_ref(), None)
///     .map(|entry| entry.unwrap().name)
///     .collect();
/// assert_eq!(names, vec!["A.php"]);
/// ```
pub fn walk<'a>(
    root: &Path,
    include: Option<&'a EntryPattern>,
    ignore: Option<&'a EntryPattern>,
) -> impl Iterator<Item = Result<WalkEntry>> + use<'a> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => select(&entry, include, ignore).transpose(),
            Err(err) => Some(Err(PackagerError::from(err))),
        })
}

fn select(
    entry: &walkdir::DirEntry,
    include: Option<&EntryPattern>,
    ignore: Option<&EntryPattern>,
) -> Result<Option<WalkEntry>> {
    let name = entry.file_name().to_string_lossy().into_owned();
    if !is_selected(&name, include, ignore) {
        return Ok(None);
    }

    let (is_dir, is_file) = if entry.path_is_symlink() {
        (entry.path().is_dir(), entry.path().is_file())
    } else {
        (entry.file_type().is_dir(), entry.file_type().is_file())
    };
    let kind = if is_dir {
        EntryKind::Directory
    } else if is_file {
        EntryKind::File(compute_fingerprint(entry.path())?)
    } else {
        return Ok(None);
    };

    let parent = entry
        .path()
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(Some(WalkEntry { parent, name, kind }))
}
