//! Catalog evaluation against a save document.
//!
//! A scan resolves every catalog entry, partitions each category into
//! unlocked, locked, and faulted entries, and sums main-category scores
//! into an overall completion total. One malformed entry faults that
//! entry alone; sibling entries and categories still evaluate.

use crate::catalog::{Catalog, CatalogItem, Category};
use crate::save::SaveDocument;
use threadcount_common::RuleError;
use tracing::debug;

/// One entry's evaluation outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemState {
    /// The save has this entry.
    Unlocked,
    /// The save does not have this entry, or the path is absent.
    Locked,
    /// The entry's authored rule is malformed. Counts as locked for
    /// scoring while the fault is reported.
    Faulted(RuleError),
}

/// A reported catalog-integrity fault.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFault<'a> {
    /// The faulted entry.
    pub item: &'a CatalogItem,
    /// The preserved authoring fault.
    pub error: RuleError,
}

/// Evaluation of one category against one save document.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryReport<'a> {
    /// The evaluated category.
    pub category: &'a Category,
    /// Entries the save has, in catalog order.
    pub unlocked: Vec<&'a CatalogItem>,
    /// Entries the save does not have, in catalog order.
    pub locked: Vec<&'a CatalogItem>,
    /// Entries whose authored rules are malformed.
    pub faults: Vec<ItemFault<'a>>,
    /// Completion points for main categories; `None` otherwise.
    pub score: Option<u32>,
}

impl CategoryReport<'_> {
    /// Number of entries evaluated.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.unlocked.len() + self.locked.len() + self.faults.len()
    }

    /// Number of unlocked entries.
    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Unlocked share of evaluated entries (0-100).
    #[must_use]
    pub fn percent_unlocked(&self) -> f32 {
        let total = self.item_count();
        if total == 0 {
            return 0.0;
        }
        self.unlocked.len() as f32 / total as f32 * 100.0
    }
}

/// Evaluation of a whole catalog against one save document.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReport<'a> {
    /// Per-category reports, in catalog order.
    pub categories: Vec<CategoryReport<'a>>,
    /// Sum of all main-category scores.
    pub total: u32,
}

impl CompletionReport<'_> {
    /// All reported faults across categories.
    pub fn faults(&self) -> impl Iterator<Item = &ItemFault<'_>> {
        self.categories.iter().flat_map(|report| report.faults.iter())
    }

    /// Number of faulted entries across categories.
    #[must_use]
    pub fn fault_count(&self) -> usize {
        self.categories.iter().map(|report| report.faults.len()).sum()
    }

    /// Number of unlocked entries across categories.
    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.categories.iter().map(CategoryReport::unlocked_count).sum()
    }
}

/// Evaluates one entry against a save document.
#[must_use]
pub fn evaluate_item(item: &CatalogItem, save: &SaveDocument) -> ItemState {
    match item.rule.resolve(save) {
        Ok(true) => ItemState::Unlocked,
        Ok(false) => ItemState::Locked,
        Err(fault) => ItemState::Faulted(fault),
    }
}

/// Evaluates every entry of a category.
#[must_use]
pub fn scan_category<'a>(category: &'a Category, save: &SaveDocument) -> CategoryReport<'a> {
    let mut unlocked = Vec::new();
    let mut locked = Vec::new();
    let mut faults = Vec::new();

    for item in &category.items {
        match evaluate_item(item, save) {
            ItemState::Unlocked => unlocked.push(item),
            ItemState::Locked => locked.push(item),
            ItemState::Faulted(error) => faults.push(ItemFault { item, error }),
        }
    }

    let score = category.score(&unlocked);
    CategoryReport {
        category,
        unlocked,
        locked,
        faults,
        score,
    }
}

/// Evaluates a whole catalog against one save document.
#[must_use]
pub fn scan_catalog<'a>(catalog: &'a Catalog, save: &SaveDocument) -> CompletionReport<'a> {
    let categories: Vec<_> = catalog
        .categories()
        .iter()
        .map(|category| scan_category(category, save))
        .collect();
    let total = categories.iter().filter_map(|report| report.score).sum();

    debug!(
        "scanned {} categories: {} unlocked, {} faults, total score {}",
        categories.len(),
        categories.iter().map(CategoryReport::unlocked_count).sum::<usize>(),
        categories.iter().map(|report| report.faults.len()).sum::<usize>(),
        total
    );

    CompletionReport { categories, total }
}
