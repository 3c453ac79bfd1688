//! Package manifest assembly.
//!
//! Combines the distribution descriptor, the module's registration and
//! configuration files, and the resolved content tree into a single
//! [`PackageManifest`].

use crate::descriptor::ConnectDescriptor;
use crate::error::Result;
use crate::manifest::{BuildStamp, PackageManifest};
use crate::module::ModuleDescriptor;
use crate::reporter::Reporter;
use crate::tree::build_contents;
use std::path::{Path, PathBuf};

/// Builds package manifests for extensions inside one working tree.
pub struct Packager<'a> {
    root: PathBuf,
    reporter: &'a dyn Reporter,
    stamp: Option<BuildStamp>,
}

impl<'a> Packager<'a> {
    /// Create a packager for the working tree at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, reporter: &'a dyn Reporter) -> Self {
        Self {
            root: root.into(),
            reporter,
            stamp: None,
        }
    }

    /// Use a fixed build stamp instead of the local clock.
    #[must_use]
    pub fn with_stamp(mut self, stamp: BuildStamp) -> Self {
        self.stamp = Some(stamp);
        self
    }

    /// The working tree this packager resolves content rules against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the manifest for the connect file at `connect_path`.
    ///
    /// A channel that differs from the module's code pool is reported as a
    /// warning; the build continues.
    ///
    /// # Errors
    ///
    /// Returns any descriptor, module or content error. Nothing is written
    /// to disk.
    pub fn build_manifest(&self, connect_path: &Path) -> Result<PackageManifest> {
        self.reporter.info(&format!(
            "Reading connect file {}",
            connect_path.display()
        ));
        let descriptor = ConnectDescriptor::from_file(connect_path)?;
        descriptor.namespace_and_module()?;

        let module = ModuleDescriptor::load(&self.root, &descriptor.name, &descriptor.channel)?;
        self.reporter.info(&format!(
            "Packaging {} {} from code pool {}",
            descriptor.name, module.version, descriptor.channel
        ));
        if descriptor.channel != module.code_pool {
            self.reporter.warn(&format!(
                "Connect file channel {:?} does not match module code pool {:?}",
                descriptor.channel, module.code_pool
            ));
        }

        let contents = build_contents(&descriptor.contents, &self.root, self.reporter)?;
        let stamp = self.stamp.clone().unwrap_or_else(BuildStamp::now);

        Ok(PackageManifest {
            name: descriptor.name,
            version: module.version,
            stability: descriptor.stability,
            license: descriptor.license,
            license_uri: descriptor.license_uri,
            channel: descriptor.channel,
            summary: descriptor.summary,
            description: descriptor.description,
            notes: descriptor.notes,
            authors: descriptor.authors,
            stamp,
            contents,
            php: descriptor.php,
        })
    }
}
