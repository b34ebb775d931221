//! Catalog asset loading and validation.
//!
//! This module provides:
//! - Loading catalogs from assets/catalog/*.json
//! - Category validation on load
//! - Format version gating
//! - Load statistics for diagnostics
//!
//! Malformed item rules are preserved as per-item faults (the file still
//! loads); category-level authoring errors reject the file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, Category, Necessity};
use crate::score::ScoreRule;
use serde::Deserialize;
use thiserror::Error;
use threadcount_common::SchemaVersion;
use tracing::{debug, info, warn};

/// Default asset path for catalog files.
pub const DEFAULT_CATALOG_PATH: &str = "assets/catalog";

/// Errors that can occur during catalog loading.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// File not found.
    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read catalog file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse JSON.
    #[error("Failed to parse catalog JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    /// File declares a format version this build cannot read.
    #[error("Unsupported catalog version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version declared by the file.
        found: String,
        /// Version this build reads.
        supported: SchemaVersion,
    },

    /// Validation error.
    #[error("Catalog validation error: {0}")]
    ValidationError(String),

    /// Duplicate category name across loaded files.
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),
}

/// Result type for catalog loading operations.
pub type CatalogLoadResult<T> = Result<T, CatalogLoadError>;

/// A collection of categories from a single file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Categories in this file, in display order.
    pub categories: Vec<Category>,
}

fn default_version() -> String {
    SchemaVersion::CATALOG_FILE.to_string()
}

impl CatalogFile {
    /// Parses and validates a catalog file from JSON text.
    pub fn from_json(text: &str) -> CatalogLoadResult<Self> {
        let file: Self = serde_json::from_str(text)?;
        file.check_version()?;
        for category in &file.categories {
            validate_category(category)?;
        }
        Ok(file)
    }

    fn check_version(&self) -> CatalogLoadResult<()> {
        let supported = SchemaVersion::CATALOG_FILE;
        let found: SchemaVersion =
            self.version
                .parse()
                .map_err(|_| CatalogLoadError::UnsupportedVersion {
                    found: self.version.clone(),
                    supported,
                })?;
        if !supported.can_read(&found) {
            return Err(CatalogLoadError::UnsupportedVersion {
                found: self.version.clone(),
                supported,
            });
        }
        Ok(())
    }
}

/// Validates category-level authoring rules.
fn validate_category(category: &Category) -> CatalogLoadResult<()> {
    if category.name.is_empty() {
        return Err(CatalogLoadError::ValidationError(
            "category with empty name".to_string(),
        ));
    }

    match (category.necessity, &category.score_rule) {
        (Necessity::Main, None) => {
            return Err(CatalogLoadError::ValidationError(format!(
                "Main category `{}` has no score rule",
                category.name
            )));
        },
        (Necessity::Essential, Some(_)) => {
            return Err(CatalogLoadError::ValidationError(format!(
                "Essential category `{}` carries a score rule",
                category.name
            )));
        },
        _ => {},
    }

    if matches!(category.score_rule, Some(ScoreRule::PerGroup { size: 0 })) {
        return Err(CatalogLoadError::ValidationError(format!(
            "Category `{}` has a zero-size scoring group",
            category.name
        )));
    }

    Ok(())
}

/// Statistics for the catalog loader.
#[derive(Debug, Default, Clone)]
pub struct CatalogLoaderStats {
    /// Number of files loaded.
    pub files_loaded: u32,
    /// Number of files rejected with errors.
    pub file_errors: u32,
    /// Number of categories loaded.
    pub categories_loaded: u32,
    /// Number of items loaded.
    pub items_loaded: u32,
    /// Number of items whose rules failed validation.
    pub rule_faults: u32,
}

/// Catalog asset loader.
pub struct CatalogLoader {
    /// Base path for catalog files.
    base_path: PathBuf,
    /// Accumulated catalog.
    catalog: Catalog,
    /// Statistics.
    stats: CatalogLoaderStats,
}

impl CatalogLoader {
    /// Creates a new catalog loader.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("Initializing catalog loader at: {:?}", base_path);

        Self {
            base_path,
            catalog: Catalog::new(),
            stats: CatalogLoaderStats::default(),
        }
    }

    /// Creates a loader with the default path.
    #[must_use]
    pub fn with_default_path() -> Self {
        Self::new(DEFAULT_CATALOG_PATH)
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the accumulated catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Consumes the loader and returns the catalog.
    #[must_use]
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Returns loader statistics.
    #[must_use]
    pub fn stats(&self) -> &CatalogLoaderStats {
        &self.stats
    }

    /// Loads all catalog files from the base path.
    ///
    /// A file that fails to load is logged and counted; remaining files
    /// still load.
    pub fn load_all(&mut self) -> CatalogLoadResult<()> {
        if !self.base_path.exists() {
            return Err(CatalogLoadError::NotFound(self.base_path.clone()));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.base_path)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        // Directory iteration order varies by platform; category order
        // must not.
        paths.sort();

        for path in paths {
            if let Err(e) = self.load_file(&path) {
                warn!("Failed to load catalog file {:?}: {}", path, e);
                self.stats.file_errors += 1;
            }
        }

        info!(
            "Loaded {} categories ({} items) from {} files",
            self.stats.categories_loaded, self.stats.items_loaded, self.stats.files_loaded
        );
        Ok(())
    }

    /// Loads a single catalog file.
    pub fn load_file(&mut self, path: &Path) -> CatalogLoadResult<()> {
        if !path.exists() {
            return Err(CatalogLoadError::NotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path)?;
        self.load_str(&text)?;
        self.stats.files_loaded += 1;
        debug!("Loaded catalog file: {:?}", path);
        Ok(())
    }

    /// Loads categories from JSON text.
    pub fn load_str(&mut self, text: &str) -> CatalogLoadResult<()> {
        let file = CatalogFile::from_json(text)?;
        for category in file.categories {
            self.add_category(category)?;
        }
        Ok(())
    }

    fn add_category(&mut self, category: Category) -> CatalogLoadResult<()> {
        if self.catalog.category(&category.name).is_some() {
            return Err(CatalogLoadError::DuplicateCategory(category.name));
        }

        for item in &category.items {
            if let Some(fault) = item.fault() {
                warn!(
                    "Malformed rule for `{}` in category `{}`: {}",
                    item.name, category.name, fault
                );
                self.stats.rule_faults += 1;
            }
        }

        self.stats.categories_loaded += 1;
        self.stats.items_loaded += category.items.len() as u32;
        self.catalog.push(category);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MASK_SHARDS: &str = r#"{
        "version": "1.0.0",
        "categories": [
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
                        "act": 2,
                        "prereqs": ["Cling Grip"],
                        "location": "Ledge above the eastern bonefields.",
                        "rule": { "kind": "quest", "key": "Savage Beastfly" }
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_load_str() {
        let mut loader = CatalogLoader::with_default_path();
        loader.load_str(MASK_SHARDS).expect("loads");

        let catalog = loader.catalog();
        assert_eq!(catalog.category_count(), 1);
        assert_eq!(catalog.item_count(), 2);
        assert_eq!(loader.stats().categories_loaded, 1);
        assert_eq!(loader.stats().items_loaded, 2);
        assert_eq!(loader.stats().rule_faults, 0);
    }

    #[test]
    fn test_malformed_rule_is_a_per_item_fault_not_a_load_error() {
        let text = r#"{
            "categories": [
                {
                    "name": "Tools",
                    "necessity": "main",
                    "score_rule": { "kind": "per_item" },
                    "items": [
                        { "name": "Compass", "act": 1,
                          "rule": { "kind": "inventory_item", "key": "Compass" } },
                        { "name": "Broken", "act": 1,
                          "rule": { "kind": "wish", "key": "x" } }
                    ]
                }
            ]
        }"#;
        let mut loader = CatalogLoader::with_default_path();
        loader.load_str(text).expect("file still loads");

        assert_eq!(loader.stats().rule_faults, 1);
        assert_eq!(loader.catalog().fault_count(), 1);
        assert_eq!(loader.catalog().item_count(), 2);
    }

    #[test]
    fn test_main_category_requires_score_rule() {
        let text = r#"{
            "categories": [
                { "name": "Mask Shards", "necessity": "main", "items": [] }
            ]
        }"#;
        let err = CatalogFile::from_json(text).expect_err("rejected");
        assert!(matches!(err, CatalogLoadError::ValidationError(_)));
    }

    #[test]
    fn test_essential_category_rejects_score_rule() {
        let text = r#"{
            "categories": [
                {
                    "name": "Abilities",
                    "necessity": "essential",
                    "score_rule": { "kind": "per_item" },
                    "items": []
                }
            ]
        }"#;
        let err = CatalogFile::from_json(text).expect_err("rejected");
        assert!(matches!(err, CatalogLoadError::ValidationError(_)));
    }

    #[test]
    fn test_zero_group_size_is_rejected() {
        let text = r#"{
            "categories": [
                {
                    "name": "Mask Shards",
                    "necessity": "main",
                    "score_rule": { "kind": "per_group", "size": 0 },
                    "items": []
                }
            ]
        }"#;
        let err = CatalogFile::from_json(text).expect_err("rejected");
        assert!(matches!(err, CatalogLoadError::ValidationError(_)));
    }

    #[test]
    fn test_version_gate() {
        let text = r#"{ "version": "2.0.0", "categories": [] }"#;
        let err = CatalogFile::from_json(text).expect_err("rejected");
        assert!(matches!(err, CatalogLoadError::UnsupportedVersion { .. }));

        // Minor and patch drift within the same major version is fine.
        let text = r#"{ "version": "1.3.9", "categories": [] }"#;
        CatalogFile::from_json(text).expect("accepted");
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let mut loader = CatalogLoader::with_default_path();
        loader.load_str(MASK_SHARDS).expect("first load");
        let err = loader.load_str(MASK_SHARDS).expect_err("duplicate");
        assert!(matches!(err, CatalogLoadError::DuplicateCategory(name) if name == "Mask Shards"));
    }

    #[test]
    fn test_load_all_from_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut file = fs::File::create(dir.path().join("mask_shards.json")).expect("create");
        file.write_all(MASK_SHARDS.as_bytes()).expect("write");

        let mut bad = fs::File::create(dir.path().join("broken.json")).expect("create");
        bad.write_all(b"{ not json").expect("write");

        let mut loader = CatalogLoader::new(dir.path());
        loader.load_all().expect("directory scan succeeds");

        assert_eq!(loader.stats().files_loaded, 1);
        assert_eq!(loader.stats().file_errors, 1);
        assert_eq!(loader.catalog().category_count(), 1);
    }

    #[test]
    fn test_missing_directory() {
        let mut loader = CatalogLoader::new("does/not/exist");
        let err = loader.load_all().expect_err("missing path");
        assert!(matches!(err, CatalogLoadError::NotFound(_)));
    }
}
