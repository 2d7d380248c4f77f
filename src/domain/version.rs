use crate::error::{ReleaseError, Result};
use semver::{BuildMetadata, Prerelease};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Semantic version with optional prerelease and build labels.
///
/// Ordering compares major, minor and patch, then prerelease precedence
/// (a release sorts above any of its prereleases), then build metadata.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Prerelease,
    pub build: BuildMetadata,
}

impl Version {
    /// Create a release version with no labels
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
        }
    }

    /// Parse a bare semantic version string (e.g. "1.2.3", "2.0.0-rc.1+build.5")
    pub fn parse(input: &str) -> Result<Self> {
        let parsed = semver::Version::parse(input).map_err(|e| {
            ReleaseError::version(format!("Invalid version '{}': {}", input, e))
        })?;

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre: parsed.pre,
            build: parsed.build,
        })
    }

    /// True when the version carries a prerelease label
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Bump version according to bump type.
    ///
    /// A prerelease is finalized instead of incremented: `1.3.0-rc.1` bumped
    /// by anything becomes `1.3.0`. Build metadata never survives a bump.
    /// A component already at `u64::MAX` cannot be incremented.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        if self.is_prerelease() {
            return Ok(Version::new(self.major, self.minor, self.patch));
        }

        let exhausted = || {
            ReleaseError::version(format!("Cannot apply a {:?} bump to {}", bump_type, self))
        };
        match bump_type {
            VersionBump::Major => {
                let major = self.major.checked_add(1).ok_or_else(exhausted)?;
                Ok(Version::new(major, 0, 0))
            }
            VersionBump::Minor => {
                let minor = self.minor.checked_add(1).ok_or_else(exhausted)?;
                Ok(Version::new(self.major, minor, 0))
            }
            VersionBump::Patch => {
                let patch = self.patch.checked_add(1).ok_or_else(exhausted)?;
                Ok(Version::new(self.major, self.minor, patch))
            }
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::new(0, 0, 0)
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    Patch,
    Minor,
    Major,
}
