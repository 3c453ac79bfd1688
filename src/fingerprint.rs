//! Content fingerprints for manifest entries and the finished archive.
//!
//! Magento Connect records an MD5 hex digest in the `hash` attribute of each
//! `<file>` node, so [`Fingerprint`] is an MD5 newtype. The archive itself is
//! reported with a SHA-256 digest.

use crate::error::{PackagerError, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Expected length of a hex-encoded MD5 digest.
const FINGERPRINT_HEX_LEN: usize = 32;

/// A validated lowercase hex MD5 digest of a file's contents.
///
/// # Examples
///
/// ```
/// use connect_packager::fingerprint::Fingerprint;
///
/// let fp = Fingerprint::of_bytes(b"");
/// assert_eq!(fp.as_str(), "d41d8cd98f00b204e9800998ecf8427e");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint an in-memory buffer.
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(format!("{:x}", md5::compute(bytes)))
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Fingerprint {
    type Error = PackagerError;

    fn try_from(value: &str) -> Result<Self> {
        validate_fingerprint(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_fingerprint(value: &str) -> Result<()> {
    if value.len() != FINGERPRINT_HEX_LEN {
        return Err(PackagerError::InvalidFingerprint {
            reason: format!(
                "expected {FINGERPRINT_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !c.is_ascii_digit() && !matches!(c, 'a'..='f'))
    {
        return Err(PackagerError::InvalidFingerprint {
            reason: format!("unexpected character '{bad}'"),
        });
    }
    Ok(())
}

/// Fingerprint the file at `path`.
///
/// # Errors
///
/// Returns [`PackagerError::ReadFile`] if the file cannot be read.
pub fn compute_fingerprint(path: &Path) -> Result<Fingerprint> {
    let bytes = fs::read(path).map_err(|source| PackagerError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Fingerprint::of_bytes(&bytes))
}

/// Compute the lowercase hex SHA-256 digest of a file.
///
/// # Errors
///
/// Returns [`PackagerError::ReadFile`] if the file cannot be read.
pub fn compute_sha256(path: &Path) -> Result<String> {
    let read_error = |source| PackagerError::ReadFile {
        path: path.to_path_buf(),
        source,
    };
    let mut file = fs::File::open(path).map_err(read_error)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(read_error)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(format!("{:x}", hasher.finalize()))
}
