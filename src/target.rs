//! Content targets and their base directories.
//!
//! A connect descriptor anchors every content rule to one of a small, fixed
//! set of targets. Each target maps to a directory relative to the Magento
//! working tree.

use crate::error::{PackagerError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A named root location for content rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Local code pool, `app/code/local`.
    MageLocal,
    /// Community code pool, `app/code/community`.
    MageCommunity,
    /// Theme and layout files, `app/design`.
    MageDesign,
    /// Global configuration, `app/etc`.
    MageEtc,
}

impl Target {
    /// All known targets.
    pub const ALL: [Self; 4] = [
        Self::MageLocal,
        Self::MageCommunity,
        Self::MageDesign,
        Self::MageEtc,
    ];

    /// The identifier used in descriptors and in `<target name="...">`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MageLocal => "magelocal",
            Self::MageCommunity => "magecommunity",
            Self::MageDesign => "magedesign",
            Self::MageEtc => "mageetc",
        }
    }

    /// The target's directory relative to the working tree.
    #[must_use]
    pub const fn relative_dir(self) -> &'static str {
        match self {
            Self::MageLocal => "app/code/local",
            Self::MageCommunity => "app/code/community",
            Self::MageDesign => "app/design",
            Self::MageEtc => "app/etc",
        }
    }

    /// Resolve the target's base directory under `root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use connect_packager::target::Target;
    /// use std::path::Path;
    ///
    /// let base = Target::MageCommunity.base_dir(Path::new("/srv/magento"));
    /// assert_eq!(base, Path::new("/srv/magento/app/code/community"));
    /// ```
    #[must_use]
    pub fn base_dir(self, root: &Path) -> PathBuf {
        root.join(self.relative_dir())
    }
}

impl FromStr for Target {
    type Err = PackagerError;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|target| target.as_str() == trimmed)
            .ok_or_else(|| PackagerError::UnknownTarget {
                target: trimmed.to_owned(),
            })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("magelocal", Target::MageLocal, "app/code/local")]
    #[case("magecommunity", Target::MageCommunity, "app/code/community")]
    #[case("magedesign", Target::MageDesign, "app/design")]
    #[case(" mageetc ", Target::MageEtc, "app/etc")]
    fn parses_known_targets(#[case] input: &str, #[case] expected: Target, #[case] dir: &str) {
        let target: Target = input.parse().expect("known target");
        assert_eq!(target, expected);
        assert_eq!(target.relative_dir(), dir);
    }

    #[rstest]
    #[case::other_pool("magecore")]
    #[case::case_sensitive("MageLocal")]
    #[case::empty("")]
    fn rejects_unknown_targets(#[case] input: &str) {
        let err = input.parse::<Target>().expect_err("unknown target");
        assert!(matches!(err, PackagerError::UnknownTarget { .. }));
    }

    #[test]
    fn display_round_trips_identifier() {
        for target in Target::ALL {
            assert_eq!(target.to_string().parse::<Target>().expect("parse"), target);
        }
    }
}
