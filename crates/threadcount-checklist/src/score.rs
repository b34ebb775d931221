//! Per-category completion scoring.

use crate::catalog::CatalogItem;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a main category turns its unlocked entries into completion points.
///
/// Strategies receive the unlocked entries themselves rather than a bare
/// count so future variants can weigh individual entries. Strategies are
/// data, not closures: catalogs stay external, serializable documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreRule {
    /// One point per unlocked entry.
    PerItem,
    /// One point per full group of `size` unlocked entries.
    PerGroup {
        /// Entries per point.
        size: u32,
    },
    /// One point per unlocked entry beyond a baseline of entries every
    /// save is expected to hold from the start.
    AboveBaseline {
        /// Leading entries that earn no points.
        baseline: u32,
    },
}

impl ScoreRule {
    /// Points contributed by an unlocked subset.
    #[must_use]
    pub fn score(&self, unlocked: &[&CatalogItem]) -> u32 {
        let count = unlocked.len() as u32;
        match self {
            Self::PerItem => count,
            Self::PerGroup { size } => {
                if *size == 0 {
                    warn!("per_group score rule with zero group size scores nothing");
                    return 0;
                }
                count / size
            },
            Self::AboveBaseline { baseline } => {
                if count < *baseline {
                    // The always-present baseline entries are missing
                    // from this save; clamp instead of going negative.
                    warn!(
                        "unlocked count {} below scoring baseline {}",
                        count, baseline
                    );
                }
                count.saturating_sub(*baseline)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::UnlockRule;
    use threadcount_common::Act;

    fn items(count: usize) -> Vec<CatalogItem> {
        (0..count)
            .map(|i| {
                CatalogItem::new(
                    format!("Entry {i}"),
                    Act::ONE,
                    UnlockRule::flag(format!("flag{i}")),
                )
            })
            .collect()
    }

    fn refs(items: &[CatalogItem]) -> Vec<&CatalogItem> {
        items.iter().collect()
    }

    #[test]
    fn test_per_item() {
        let owned = items(5);
        assert_eq!(ScoreRule::PerItem.score(&refs(&owned)), 5);
        assert_eq!(ScoreRule::PerItem.score(&[]), 0);
    }

    #[test]
    fn test_per_group() {
        let owned = items(9);
        let rule = ScoreRule::PerGroup { size: 4 };
        assert_eq!(rule.score(&refs(&owned)), 2);
        assert_eq!(rule.score(&refs(&owned[..4])), 1);
        assert_eq!(rule.score(&refs(&owned[..3])), 0);
        assert_eq!(rule.score(&[]), 0);
    }

    #[test]
    fn test_per_group_zero_size() {
        let owned = items(3);
        assert_eq!(ScoreRule::PerGroup { size: 0 }.score(&refs(&owned)), 0);
    }

    #[test]
    fn test_above_baseline() {
        let owned = items(6);
        let rule = ScoreRule::AboveBaseline { baseline: 1 };
        assert_eq!(rule.score(&refs(&owned)), 5);
        assert_eq!(rule.score(&refs(&owned[..1])), 0);
    }

    #[test]
    fn test_above_baseline_clamps_at_zero() {
        let rule = ScoreRule::AboveBaseline { baseline: 1 };
        assert_eq!(rule.score(&[]), 0);
    }

    #[test]
    fn test_score_is_idempotent() {
        let owned = items(7);
        let unlocked = refs(&owned);
        let rule = ScoreRule::PerGroup { size: 2 };
        assert_eq!(rule.score(&unlocked), rule.score(&unlocked));
    }

    #[test]
    fn test_serde() {
        let rule: ScoreRule =
            serde_json::from_str(r#"{ "kind": "per_group", "size": 4 }"#).expect("parses");
        assert_eq!(rule, ScoreRule::PerGroup { size: 4 });

        let rule: ScoreRule = serde_json::from_str(r#"{ "kind": "per_item" }"#).expect("parses");
        assert_eq!(rule, ScoreRule::PerItem);
    }
}
