//! Magento module descriptors.
//!
//! A module is registered in `app/etc/modules/<Name>.xml`, which declares the
//! code pool it lives in. The version comes from the module's `etc/config.xml`
//! under the pool named by the connect descriptor's channel, which normally
//! matches the registered pool.

use crate::descriptor::split_extension_name;
use crate::document::Document;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Version and code pool of an installed module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// The code pool from the registration file (`local`, `community`, ...).
    pub code_pool: String,
    /// The version from the module's `config.xml`.
    pub version: String,
}

impl ModuleDescriptor {
    /// Read the registration file for `name` under `root`, then the
    /// `config.xml` found in the `channel` code pool.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PackagerError::InvalidExtensionName`] if `name` is
    /// not `Namespace_Module`, an I/O or XML error if either file cannot be
    /// read, or [`crate::PackagerError::MissingElement`] if the code pool or
    /// version is absent.
    pub fn load(root: &Path, name: &str, channel: &str) -> Result<Self> {
        let registration = Document::open(&registration_path(root, name))?;
        let code_pool = registration.required_text(&format!("modules/{name}/codePool"))?;

        let config = Document::open(&config_path(root, name, channel)?)?;
        let version = config.required_text(&format!("modules/{name}/version"))?;

        Ok(Self { code_pool, version })
    }
}

/// Path of the module registration file, `app/etc/modules/<Name>.xml`.
#[must_use]
pub fn registration_path(root: &Path, name: &str) -> PathBuf {
    root.join("app/etc/modules").join(format!("{name}.xml"))
}

/// Path of `app/code/<pool>/<Namespace>/<Module>/etc/config.xml`.
///
/// # Errors
///
/// Returns [`crate::PackagerError::InvalidExtensionName`] if `name` has no
/// namespace separator.
///
/// # Examples
///
/// ```
/// use connect_packager::module::config_path;
/// use std::path::Path;
///
/// let path = config_path(Path::new("/srv"), "Foo_Bar", "local").unwrap();
/// assert_eq!(path, Path::new("/srv/app/code/local/Foo/Bar/etc/config.xml"));
/// ```
pub fn config_path(root: &Path, name: &str, code_pool: &str) -> Result<PathBuf> {
    let (namespace, module) = split_extension_name(name)?;
    Ok(root
        .join("app/code")
        .join(code_pool)
        .join(namespace)
        .join(module)
        .join("etc/config.xml"))
}
