//! Checklist catalog data model.
//!
//! A catalog is static, externally authored data: ordered categories of
//! checklist entries, each entry carrying display metadata and the rule
//! locating its unlock state in a save document. The engine never
//! mutates a catalog after construction.

use crate::rule::{ItemRule, UnlockRule};
use crate::score::ScoreRule;
use serde::Deserialize;
use threadcount_common::{Act, RuleError};

/// How a category contributes to overall completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Necessity {
    /// Counts directly toward the overall percentage.
    Main,
    /// Groups prerequisite-tracking entries; contributes no percentage.
    Essential,
}

/// One checklist entry: display metadata plus its unlock rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogItem {
    /// Display name.
    pub name: String,
    /// Earliest act in which the entry can be obtained.
    pub act: Act,
    /// Advisory prerequisite labels, shown to the user, never evaluated.
    #[serde(default)]
    pub prereqs: Vec<String>,
    /// Human-readable location or acquisition text.
    #[serde(default)]
    pub location: String,
    /// Where the unlock state lives in a save document.
    pub rule: ItemRule,
}

impl CatalogItem {
    /// Creates an item from a name, act, and validated rule.
    #[must_use]
    pub fn new(name: impl Into<String>, act: Act, rule: UnlockRule) -> Self {
        Self {
            name: name.into(),
            act,
            prereqs: Vec::new(),
            location: String::new(),
            rule: ItemRule::Valid(rule),
        }
    }

    /// Sets the location text.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Adds an advisory prerequisite label.
    #[must_use]
    pub fn with_prereq(mut self, label: impl Into<String>) -> Self {
        self.prereqs.push(label.into());
        self
    }

    /// Returns the preserved authoring fault, if any.
    #[must_use]
    pub fn fault(&self) -> Option<&RuleError> {
        self.rule.fault()
    }
}

/// Named group of checklist entries sharing one scoring strategy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    /// Display name.
    pub name: String,
    /// How the category contributes to overall completion.
    pub necessity: Necessity,
    /// Description shown with the category.
    #[serde(default)]
    pub tooltip: String,
    /// Scoring strategy; required for main categories.
    #[serde(default)]
    pub score_rule: Option<ScoreRule>,
    /// Entries in display order.
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

impl Category {
    /// Creates a main category with a scoring strategy.
    #[must_use]
    pub fn main(name: impl Into<String>, score_rule: ScoreRule) -> Self {
        Self {
            name: name.into(),
            necessity: Necessity::Main,
            tooltip: String::new(),
            score_rule: Some(score_rule),
            items: Vec::new(),
        }
    }

    /// Creates an essential (non-scoring) category.
    #[must_use]
    pub fn essential(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            necessity: Necessity::Essential,
            tooltip: String::new(),
            score_rule: None,
            items: Vec::new(),
        }
    }

    /// Sets the tooltip text.
    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    /// Adds an entry.
    #[must_use]
    pub fn with_item(mut self, item: CatalogItem) -> Self {
        self.items.push(item);
        self
    }

    /// Number of entries.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Scores an unlocked subset.
    ///
    /// Essential categories (and main categories missing a strategy)
    /// contribute no score. An empty subset is an ordinary zero, not an
    /// edge case.
    #[must_use]
    pub fn score(&self, unlocked: &[&CatalogItem]) -> Option<u32> {
        match (self.necessity, &self.score_rule) {
            (Necessity::Main, Some(rule)) => Some(rule.score(unlocked)),
            _ => None,
        }
    }
}

/// Ordered, immutable checklist catalog.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog from categories in display order.
    #[must_use]
    pub fn from_categories(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Appends a category.
    pub fn push(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Categories in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Finds a category by name.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// Number of categories.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of entries across categories.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(Category::item_count).sum()
    }

    /// Iterates over every entry with its category.
    pub fn iter_items(&self) -> impl Iterator<Item = (&Category, &CatalogItem)> {
        self.categories
            .iter()
            .flat_map(|category| category.items.iter().map(move |item| (category, item)))
    }

    /// Number of entries carrying preserved authoring faults.
    #[must_use]
    pub fn fault_count(&self) -> usize {
        self.iter_items()
            .filter(|(_, item)| item.fault().is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_shards() -> Category {
        Category::main("Mask Shards", ScoreRule::PerGroup { size: 4 })
            .with_tooltip("Four shards add one mask.")
            .with_item(CatalogItem::new(
                "Mask Shard 1",
                Act::ONE,
                UnlockRule::scene_value("Crawl_02", "Heart Piece"),
            ))
            .with_item(
                CatalogItem::new(
                    "Mask Shard 2",
                    Act::ONE,
                    UnlockRule::scene_value("Bone_East_04", "Heart Piece"),
                )
                .with_location("Ledge above the eastern bonefields.")
                .with_prereq("Cling Grip"),
            )
    }

    #[test]
    fn test_category_builder() {
        let category = mask_shards();
        assert_eq!(category.necessity, Necessity::Main);
        assert_eq!(category.item_count(), 2);
        assert_eq!(category.items[1].prereqs, vec!["Cling Grip".to_string()]);
    }

    #[test]
    fn test_essential_category_has_no_score() {
        let category = Category::essential("Abilities")
            .with_item(CatalogItem::new("Swift Step", Act::ONE, UnlockRule::flag("hasDash")));
        let unlocked: Vec<&CatalogItem> = category.items.iter().collect();
        assert_eq!(category.score(&unlocked), None);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::from_categories(vec![
            mask_shards(),
            Category::essential("Abilities"),
        ]);
        assert_eq!(catalog.category_count(), 2);
        assert_eq!(catalog.item_count(), 2);
        assert!(catalog.category("Mask Shards").is_some());
        assert!(catalog.category("Silk Hearts").is_none());
    }

    #[test]
    fn test_catalog_deserialize_preserves_item_fault() {
        let text = r#"[
            {
                "name": "Mask Shards",
                "necessity": "main",
                "score_rule": { "kind": "per_group", "size": 4 },
                "items": [
                    {
                        "name": "Mask Shard 1",
                        "act": 1,
                        "rule": { "kind": "scene_value", "key": ["Crawl_02", "Heart Piece"] }
                    },
                    {
                        "name": "Mask Shard 2",
                        "act": 1,
                        "rule": { "kind": "wish", "key": "x" }
                    }
                ]
            }
        ]"#;
        let catalog: Catalog = serde_json::from_str(text).expect("catalog parses");
        assert_eq!(catalog.item_count(), 2);
        assert_eq!(catalog.fault_count(), 1);

        let category = catalog.category("Mask Shards").expect("category");
        assert!(category.items[0].fault().is_none());
        assert_eq!(
            category.items[1].fault(),
            Some(&RuleError::UnknownKind {
                kind: "wish".to_string()
            })
        );
    }
}
