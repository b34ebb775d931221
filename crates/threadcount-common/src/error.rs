//! Error types for catalog integrity.

use thiserror::Error;

/// Error for an unlock rule that violates its authoring contract.
///
/// These are catalog bugs, not save-data conditions: a missing key in the
/// save document resolves an item to "locked", never to an error. Each
/// fault stays attached to the offending catalog entry so sibling entries
/// keep evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Rule value is not an object carrying a `kind` tag.
    #[error("unlock rule is not an object with a string `kind` field")]
    MissingKind,

    /// Rule kind tag is not one of the supported variants.
    #[error("unknown unlock rule kind: `{kind}`")]
    UnknownKind {
        /// The unrecognized kind tag.
        kind: String,
    },

    /// Rule key does not match the shape its kind requires.
    #[error("bad key for `{kind}` rule: {reason}")]
    BadKey {
        /// The kind whose key contract was violated.
        kind: String,
        /// What was expected and what was found.
        reason: String,
    },
}

/// Result type for rule operations.
pub type RuleResult<T> = Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RuleError::MissingKind.to_string(),
            "unlock rule is not an object with a string `kind` field"
        );
        assert_eq!(
            RuleError::BadKey {
                kind: "counter_flag".to_string(),
                reason: "expected [name, threshold] pair".to_string(),
            }
            .to_string(),
            "bad key for `counter_flag` rule: expected [name, threshold] pair"
        );
    }

    #[test]
    fn test_error_is_cloneable() {
        let err = RuleError::UnknownKind {
            kind: "wish".to_string(),
        };
        assert_eq!(err.clone(), err);
    }
}
