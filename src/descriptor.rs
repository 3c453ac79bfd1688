//! Distribution descriptor ("connect file") parsing.
//!
//! The connect file stores authors and content rules as parallel arrays:
//! `authors/name/name`, `authors/user/user` and `authors/email/email` hold
//! one value per author, and `contents/{target,path,type,include,ignore}/*`
//! hold one value per rule. Both are zipped into records here, once, and a
//! length mismatch is rejected instead of being discovered while building.

use crate::document::Document;
use crate::error::{PackagerError, Result};
use crate::pattern::EntryPattern;
use crate::target::Target;
use std::path::Path;
use std::str::FromStr;

/// A package author.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Magento Connect user id.
    pub user: String,
    /// Contact e-mail address.
    pub email: String,
}

/// How a content rule selects files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    /// Recursively walk a directory, filtering entries by pattern.
    Dir,
    /// Reference a single file.
    File,
}

impl FromStr for ContentKind {
    type Err = PackagerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "dir" => Ok(Self::Dir),
            "file" => Ok(Self::File),
            other => Err(PackagerError::UnknownContentType {
                kind: other.to_owned(),
            }),
        }
    }
}

/// A single `target + path + type + include/ignore` content rule.
#[derive(Clone, Debug)]
pub struct ContentRule {
    /// The target the path is relative to.
    pub target: Target,
    /// Slash-separated path below the target's base directory.
    pub path: String,
    /// Directory walk or single file.
    pub kind: ContentKind,
    /// Entries must match this pattern to be selected.
    pub include: Option<EntryPattern>,
    /// Entries matching this pattern are skipped.
    pub ignore: Option<EntryPattern>,
}

/// Minimum and maximum supported PHP versions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhpBounds {
    /// Lowest supported version, verbatim from the descriptor.
    pub min: String,
    /// Highest supported version, verbatim from the descriptor.
    pub max: String,
}

/// The parsed distribution descriptor.
#[derive(Clone, Debug)]
pub struct ConnectDescriptor {
    /// Extension name in `Namespace_Module` form.
    pub name: String,
    /// Distribution channel.
    pub channel: String,
    /// Release stability (`stable`, `beta`, ...).
    pub stability: String,
    /// License name.
    pub license: String,
    /// License URI.
    pub license_uri: String,
    /// One-line summary.
    pub summary: String,
    /// Long description.
    pub description: String,
    /// Release notes.
    pub notes: String,
    /// Authors in descriptor order.
    pub authors: Vec<Author>,
    /// Content rules in descriptor order.
    pub contents: Vec<ContentRule>,
    /// PHP version bounds.
    pub php: PhpBounds,
}

impl ConnectDescriptor {
    /// Read and validate the connect file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O or XML error if the file cannot be read,
    /// [`PackagerError::MissingElement`] if `name` or `channel` is absent,
    /// [`PackagerError::MalformedAuthorList`] or
    /// [`PackagerError::MalformedContentRules`] if parallel arrays disagree
    /// in length, and [`PackagerError::UnknownTarget`],
    /// [`PackagerError::UnknownContentType`] or
    /// [`PackagerError::InvalidPattern`] for invalid rules.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_document(&Document::open(path)?)
    }

    /// Build a descriptor from an already parsed document.
    ///
    /// # Errors
    ///
    /// See [`Self::from_file`].
    pub fn from_document(doc: &Document) -> Result<Self> {
        let license_uri = doc
            .root()
            .find("license_uri")
            .map(|element| element.text.trim().to_owned())
            .or_else(|| {
                doc.root()
                    .find("license")
                    .and_then(|element| element.attribute("uri"))
                    .map(str::to_owned)
            })
            .unwrap_or_default();

        Ok(Self {
            name: doc.required_text("name")?,
            channel: doc.required_text("channel")?,
            stability: doc.optional_text("stability"),
            license: doc.optional_text("license"),
            license_uri,
            summary: doc.optional_text("summary"),
            description: doc.optional_text("description"),
            notes: doc.optional_text("notes"),
            authors: parse_authors(doc)?,
            contents: parse_contents(doc)?,
            php: PhpBounds {
                min: doc.optional_text("depends_php_min"),
                max: doc.optional_text("depends_php_max"),
            },
        })
    }

    /// Split the extension name into `(namespace, module)` at the first `_`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidExtensionName`] if either half would
    /// be empty.
    pub fn namespace_and_module(&self) -> Result<(&str, &str)> {
        split_extension_name(&self.name)
    }
}

/// Split `Namespace_Module` at the first underscore.
///
/// # Errors
///
/// Returns [`PackagerError::InvalidExtensionName`] if there is no underscore
/// or either half is empty.
///
/// # Examples
///
/// ```
/// use connect_packager::descriptor::split_extension_name;
///
/// assert_eq!(split_extension_name("Foo_Bar").unwrap(), ("Foo", "Bar"));
/// assert_eq!(split_extension_name("Foo_Bar_Baz").unwrap(), ("Foo", "Bar_Baz"));
/// assert!(split_extension_name("FooBar").is_err());
/// ```
pub fn split_extension_name(name: &str) -> Result<(&str, &str)> {
    name.split_once('_')
        .filter(|(namespace, module)| !namespace.is_empty() && !module.is_empty())
        .ok_or_else(|| PackagerError::InvalidExtensionName {
            name: name.to_owned(),
        })
}

fn parse_authors(doc: &Document) -> Result<Vec<Author>> {
    let root = doc.root();
    let names = root.find_texts("authors/name/name");
    let users = root.find_texts("authors/user/user");
    let emails = root.find_texts("authors/email/email");

    if names.len() != users.len() || names.len() != emails.len() {
        return Err(PackagerError::MalformedAuthorList {
            names: names.len(),
            users: users.len(),
            emails: emails.len(),
        });
    }

    Ok(names
        .into_iter()
        .zip(users)
        .zip(emails)
        .map(|((name, user), email)| Author {
            name: name.to_owned(),
            user: user.to_owned(),
            email: email.to_owned(),
        })
        .collect())
}

/// Column names of the parallel content-rule arrays.
const CONTENT_COLUMNS: [&str; 5] = ["target", "path", "type", "include", "ignore"];

fn parse_contents(doc: &Document) -> Result<Vec<ContentRule>> {
    let root = doc.root();
    let [targets, paths, kinds, includes, ignores] =
        CONTENT_COLUMNS.map(|column| root.find_texts(&format!("contents/{column}/{column}")));

    let expected = targets.len();
    let lengths = [&paths, &kinds, &includes, &ignores];
    if let Some(position) = lengths.iter().position(|column| column.len() != expected) {
        let column = CONTENT_COLUMNS.get(position + 1).copied().unwrap_or_default();
        let found = lengths.get(position).map_or(0, |values| values.len());
        return Err(PackagerError::MalformedContentRules {
            reason: format!("{expected} targets but {found} {column} values"),
        });
    }

    targets
        .into_iter()
        .zip(paths)
        .zip(kinds)
        .zip(includes)
        .zip(ignores)
        .map(|((((target, path), kind), include), ignore)| -> Result<ContentRule> {
            Ok(ContentRule {
                target: target.parse()?,
                path: path.trim_matches('/').to_owned(),
                kind: kind.parse()?,
                include: EntryPattern::parse(include)?,
                ignore: EntryPattern::parse(ignore)?,
            })
        })
        .collect()
}
