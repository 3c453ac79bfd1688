//! Error types for package assembly.
//!
//! Every failure aborts the current build. Variants carry enough context
//! (paths, element names, offending values) for the CLI to print a message
//! the user can act on without re-running under a debugger.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a package manifest or archive.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// An I/O operation failed without a more specific path context.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An XML document could not be parsed.
    #[error("malformed XML in {path}: {source}")]
    XmlParse {
        /// The document that failed to parse.
        path: PathBuf,
        /// The underlying parser error.
        #[source]
        source: xml::reader::Error,
    },

    /// The package manifest could not be serialised.
    #[error("failed to write package XML: {0}")]
    XmlWrite(#[from] xml::writer::Error),

    /// A required element is absent from a descriptor.
    #[error("{path} is missing required element <{element}>")]
    MissingElement {
        /// The descriptor being read.
        path: PathBuf,
        /// Slash-separated path of the missing element.
        element: String,
    },

    /// The extension name does not follow the `Namespace_Module` convention.
    #[error("extension name {name:?} must have the form Namespace_Module")]
    InvalidExtensionName {
        /// The offending name.
        name: String,
    },

    /// A content rule references a target outside the known set.
    #[error("unknown content target {target:?}; expected one of magelocal, magecommunity, magedesign, mageetc")]
    UnknownTarget {
        /// The unresolvable target identifier.
        target: String,
    },

    /// A content rule has a type other than `dir` or `file`.
    #[error("unknown content type {kind:?}; expected dir or file")]
    UnknownContentType {
        /// The unsupported type value.
        kind: String,
    },

    /// The parallel author arrays have different lengths.
    #[error("malformed author list: {names} names, {users} users, {emails} emails")]
    MalformedAuthorList {
        /// Number of author names.
        names: usize,
        /// Number of author user ids.
        users: usize,
        /// Number of author e-mail addresses.
        emails: usize,
    },

    /// The parallel content-rule arrays have different lengths.
    #[error("malformed content rules: {reason}")]
    MalformedContentRules {
        /// Description of the mismatch.
        reason: String,
    },

    /// An include or ignore pattern is not a valid regular expression.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The pattern as written in the descriptor.
        pattern: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A delimited pattern carries a modifier that has no regex equivalent.
    #[error("pattern {pattern:?} uses unsupported modifier {flag:?}")]
    UnsupportedPatternFlag {
        /// The pattern as written in the descriptor.
        pattern: String,
        /// The rejected modifier letter.
        flag: char,
    },

    /// Directory traversal failed.
    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A walked path does not live under its target base directory.
    #[error("{path} is outside target directory {base}")]
    PathOutsideTarget {
        /// The entry path.
        path: PathBuf,
        /// The resolved target base directory.
        base: PathBuf,
    },

    /// A fingerprint string is not a 32-character lowercase hex digest.
    #[error("invalid fingerprint: {reason}")]
    InvalidFingerprint {
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
