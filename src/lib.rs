//! Build Magento Connect extension packages.
//!
//! A package is assembled from a distribution descriptor (the "connect file")
//! and the extension's files inside a Magento working tree:
//!
//! 1. [`Packager::build_manifest`] reads the descriptor and the module's
//!    registration and configuration files, resolves every content rule
//!    against the tree and fingerprints the selected files.
//! 2. [`build_tarball`] writes the resulting [`PackageManifest`] as
//!    `package.xml` into a gzip tar archive alongside the selected entries.
//!
//! Progress is reported through a [`Reporter`] so callers decide whether it
//! reaches the `log` facade.

pub mod archive;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod fingerprint;
pub mod manifest;
pub mod module;
pub mod packager;
pub mod pattern;
pub mod reporter;
pub mod target;
pub mod tree;
pub mod walker;

pub use archive::{ArchiveOptions, ArchiveOutput, build_tarball};
pub use descriptor::{Author, ConnectDescriptor, ContentKind, ContentRule, PhpBounds};
pub use error::{PackagerError, Result};
pub use fingerprint::Fingerprint;
pub use manifest::{BuildStamp, PackageManifest};
pub use module::ModuleDescriptor;
pub use packager::Packager;
pub use pattern::EntryPattern;
pub use reporter::{LogReporter, NullReporter, Reporter};
pub use target::Target;
pub use tree::{ManifestNode, TargetRoot};

#[cfg(any(test, feature = "test-support"))]
pub use reporter::RecordingReporter;
