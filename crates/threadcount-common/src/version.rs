//! Version types for schema compatibility.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a schema version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid schema version `{0}` (expected major.minor.patch)")]
pub struct VersionParseError(pub String);

/// Schema version using semantic versioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u16,
    /// Minor version (backwards-compatible additions)
    pub minor: u16,
    /// Patch version (bug fixes)
    pub patch: u16,
}

impl SchemaVersion {
    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Current catalog file format version.
    pub const CATALOG_FILE: Self = Self::new(1, 0, 0);

    /// Checks if this version is compatible with another version.
    /// Compatible means same major version and this minor >= other minor.
    #[must_use]
    pub const fn is_compatible_with(&self, other: &Self) -> bool {
        self.major == other.major && self.minor >= other.minor
    }

    /// Checks if this version can read data from another version.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl std::str::FromStr for SchemaVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let mut next = || {
            parts
                .next()
                .and_then(|p| p.parse::<u16>().ok())
                .ok_or_else(|| VersionParseError(s.to_string()))
        };

        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(VersionParseError(s.to_string()));
        }
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse() {
        assert_eq!("1.0.0".parse(), Ok(SchemaVersion::new(1, 0, 0)));
        assert_eq!("2.11.3".parse(), Ok(SchemaVersion::new(2, 11, 3)));

        assert!("1.0".parse::<SchemaVersion>().is_err());
        assert!("1.0.0.0".parse::<SchemaVersion>().is_err());
        assert!("one.two.three".parse::<SchemaVersion>().is_err());
        assert!(String::new().parse::<SchemaVersion>().is_err());
    }

    #[test]
    fn test_can_read() {
        let current = SchemaVersion::CATALOG_FILE;
        assert!(current.can_read(&SchemaVersion::new(1, 4, 2)));
        assert!(!current.can_read(&SchemaVersion::new(2, 0, 0)));
    }

    proptest! {
        #[test]
        fn test_display_parse_roundtrip(major: u16, minor: u16, patch: u16) {
            let version = SchemaVersion::new(major, minor, patch);
            prop_assert_eq!(version.to_string().parse::<SchemaVersion>(), Ok(version));
        }
    }
}
