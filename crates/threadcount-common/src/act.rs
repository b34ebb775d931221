//! Act ordinals for earliest-obtainable milestones.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for an act ordinal outside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("act out of range: {0} (expected 0-{max})", max = Act::MAX)]
pub struct ActRangeError(pub u8);

/// Earliest act in which a checklist entry can be obtained.
///
/// Act 0 is reserved for entries granted from the start of a playthrough;
/// shipped catalogs currently use acts 1-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Act(u8);

impl Act {
    /// Highest supported act ordinal.
    pub const MAX: u8 = 3;

    /// Granted from the start of a playthrough.
    pub const START: Self = Self(0);
    /// First act.
    pub const ONE: Self = Self(1);
    /// Second act.
    pub const TWO: Self = Self(2);
    /// Third act.
    pub const THREE: Self = Self(3);

    /// Creates an act from an ordinal, if in range.
    pub const fn new(ordinal: u8) -> Result<Self, ActRangeError> {
        if ordinal <= Self::MAX {
            Ok(Self(ordinal))
        } else {
            Err(ActRangeError(ordinal))
        }
    }

    /// Returns the raw ordinal.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Act {
    type Error = ActRangeError;

    fn try_from(ordinal: u8) -> Result<Self, Self::Error> {
        Self::new(ordinal)
    }
}

impl From<Act> for u8 {
    fn from(act: Act) -> Self {
        act.raw()
    }
}

impl std::fmt::Display for Act {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_act_range() {
        assert_eq!(Act::new(0), Ok(Act::START));
        assert_eq!(Act::new(3), Ok(Act::THREE));
        assert_eq!(Act::new(4), Err(ActRangeError(4)));
    }

    #[test]
    fn test_act_serde() {
        let act: Act = serde_json::from_str("2").expect("in-range act");
        assert_eq!(act, Act::TWO);
        assert_eq!(serde_json::to_string(&act).expect("serialize"), "2");

        assert!(serde_json::from_str::<Act>("7").is_err());
    }

    #[test]
    fn test_act_display() {
        assert_eq!(Act::THREE.to_string(), "3");
    }
}
