//! Manifest content tree.
//!
//! Content rules are flat (`target + path`), but `package.xml` nests entries
//! by directory. Every path segment is merged into an existing sibling with
//! the same name and kind before a new node is created, so rules that share
//! a prefix share intermediate directories and sibling directories never
//! repeat a name.

use crate::descriptor::{ContentKind, ContentRule};
use crate::error::{PackagerError, Result};
use crate::fingerprint::{Fingerprint, compute_fingerprint};
use crate::reporter::Reporter;
use crate::target::Target;
use crate::walker::{EntryKind, walk};
use std::path::{Component, Path};

/// A directory or file in the manifest tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestNode {
    /// A directory and its children in insertion order.
    Dir {
        /// Directory name.
        name: String,
        /// Child nodes.
        children: Vec<ManifestNode>,
    },
    /// A file and its content fingerprint.
    File {
        /// File name.
        name: String,
        /// Content fingerprint.
        fingerprint: Fingerprint,
    },
}

impl ManifestNode {
    /// The node's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Dir { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// All manifest nodes anchored at one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetRoot {
    /// The target these nodes are relative to.
    pub target: Target,
    /// Top-level nodes.
    pub children: Vec<ManifestNode>,
}

impl TargetRoot {
    /// Create an empty root for `target`.
    #[must_use]
    pub const fn new(target: Target) -> Self {
        Self {
            target,
            children: Vec::new(),
        }
    }

    /// Ensure a directory exists at `segments`, creating missing levels.
    pub fn ensure_dir(&mut self, segments: &[&str]) {
        with_dir(&mut self.children, segments, |_| ());
    }

    /// Insert a file leaf below `segments`, creating missing directories.
    ///
    /// Returns `false` if a file with the same name already exists there.
    pub fn insert_file(
        &mut self,
        segments: &[&str],
        name: &str,
        fingerprint: Fingerprint,
    ) -> bool {
        with_dir(&mut self.children, segments, |children| {
            let exists = children.iter().any(|node| {
                matches!(node, ManifestNode::File { name: existing, .. } if existing == name)
            });
            if !exists {
                children.push(ManifestNode::File {
                    name: name.to_owned(),
                    fingerprint,
                });
            }
            !exists
        })
    }

    /// Visit every node depth-first, passing its slash-separated path
    /// relative to the target base.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&str, &ManifestNode),
    {
        visit_nodes(&self.children, "", &mut visitor);
    }

    /// Count the file leaves under this root.
    #[must_use]
    pub fn file_count(&self) -> usize {
        let mut count = 0;
        self.visit(|_, node| {
            if matches!(node, ManifestNode::File { .. }) {
                count += 1;
            }
        });
        count
    }
}

/// Descend through `segments`, reusing same-named directories and creating
/// missing ones, then apply `leaf` to the deepest directory's children.
fn with_dir<R>(
    children: &mut Vec<ManifestNode>,
    segments: &[&str],
    leaf: impl FnOnce(&mut Vec<ManifestNode>) -> R,
) -> R {
    let Some((first, rest)) = segments.split_first() else {
        return leaf(children);
    };

    for node in children.iter_mut() {
        if let ManifestNode::Dir { name, children } = node {
            if name.as_str() == *first {
                return with_dir(children, rest, leaf);
            }
        }
    }

    let mut created = Vec::new();
    let result = with_dir(&mut created, rest, leaf);
    children.push(ManifestNode::Dir {
        name: (*first).to_owned(),
        children: created,
    });
    result
}

fn visit_nodes<F>(nodes: &[ManifestNode], prefix: &str, visitor: &mut F)
where
    F: FnMut(&str, &ManifestNode),
{
    for node in nodes {
        let path = if prefix.is_empty() {
            node.name().to_owned()
        } else {
            format!("{prefix}/{}", node.name())
        };
        visitor(&path, node);
        if let ManifestNode::Dir { children, .. } = node {
            visit_nodes(children, &path, visitor);
        }
    }
}

/// Split a relative path into its normal segments.
///
/// # Errors
///
/// Returns [`PackagerError::PathOutsideTarget`] if the path contains `..`,
/// a root, or a prefix component.
fn path_segments<'p>(relative: &'p Path, base: &Path) -> Result<Vec<&'p str>> {
    relative
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .map(|component| match component {
            Component::Normal(segment) => {
                segment.to_str().ok_or_else(|| outside(relative, base))
            }
            _ => Err(outside(relative, base)),
        })
        .collect()
}

fn outside(path: &Path, base: &Path) -> PackagerError {
    PackagerError::PathOutsideTarget {
        path: path.to_path_buf(),
        base: base.to_path_buf(),
    }
}

/// Build one [`TargetRoot`] per distinct target referenced by `rules`.
///
/// Targets appear in the order of their first rule. Within a target, rules
/// are applied in descriptor order.
///
/// # Errors
///
/// Propagates walk and fingerprint errors, and returns
/// [`PackagerError::PathOutsideTarget`] for paths that leave the target's
/// base directory.
pub fn build_contents(
    rules: &[ContentRule],
    root: &Path,
    reporter: &dyn Reporter,
) -> Result<Vec<TargetRoot>> {
    let mut targets: Vec<Target> = Vec::new();
    for rule in rules {
        if !targets.contains(&rule.target) {
            targets.push(rule.target);
        }
    }

    targets
        .into_iter()
        .map(|target| -> Result<TargetRoot> {
            reporter.debug(&format!("Adding objects for target: {target}"));
            let mut target_root = TargetRoot::new(target);
            for rule in rules.iter().filter(|rule| rule.target == target) {
                add_rule(&mut target_root, rule, root, reporter)?;
            }
            Ok(target_root)
        })
        .collect()
}

fn add_rule(
    target_root: &mut TargetRoot,
    rule: &ContentRule,
    root: &Path,
    reporter: &dyn Reporter,
) -> Result<()> {
    let base = rule.target.base_dir(root);
    let rule_path = Path::new(&rule.path);
    path_segments(rule_path, &base)?;

    match rule.kind {
        ContentKind::Dir => add_dir_rule(target_root, rule, &base, reporter),
        ContentKind::File => add_file_rule(target_root, rule, &base, reporter),
    }
}

fn add_dir_rule(
    target_root: &mut TargetRoot,
    rule: &ContentRule,
    base: &Path,
    reporter: &dyn Reporter,
) -> Result<()> {
    reporter.info(&format!(
        "Recursively adding dir: {}::{}",
        rule.target, rule.path
    ));

    for entry in walk(&base.join(&rule.path), rule.include.as_ref(), rule.ignore.as_ref()) {
        let entry = entry?;
        let relative_parent = entry
            .parent
            .strip_prefix(base)
            .map_err(|_| outside(&entry.parent, base))?;
        let segments = path_segments(relative_parent, base)?;

        match entry.kind {
            EntryKind::Directory => {
                let mut dir_path = segments;
                dir_path.push(entry.name.as_str());
                target_root.ensure_dir(&dir_path);
                reporter.debug(&format!("Added directory: {}", entry.name));
            }
            EntryKind::File(fingerprint) => {
                let message = format!("Added file: {} ({fingerprint})", entry.name);
                if target_root.insert_file(&segments, &entry.name, fingerprint) {
                    reporter.debug(&message);
                } else {
                    reporter.debug(&format!("Skipped duplicate file: {}", entry.name));
                }
            }
        }
    }
    Ok(())
}

fn add_file_rule(
    target_root: &mut TargetRoot,
    rule: &ContentRule,
    base: &Path,
    reporter: &dyn Reporter,
) -> Result<()> {
    let rule_path = Path::new(&rule.path);
    let mut segments = path_segments(rule_path, base)?;
    let Some(name) = segments.pop() else {
        return Err(outside(rule_path, base));
    };

    let fingerprint = compute_fingerprint(&base.join(rule_path))?;
    let message = format!(
        "Added single file: {}::{} ({fingerprint})",
        rule.target, rule.path
    );
    if target_root.insert_file(&segments, name, fingerprint) {
        reporter.info(&message);
    } else {
        reporter.debug(&format!("Skipped duplicate file: {}", rule.path));
    }
    Ok(())
}
