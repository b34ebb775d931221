//! # Threadcount Checklist
//!
//! Checklist systems for Threadcount.
//!
//! This crate decides which entries of a static checklist catalog a
//! game-save snapshot has unlocked, and aggregates the results into
//! per-category and overall completion percentages:
//! - Save document access over loosely-typed decoded snapshots
//! - Unlock rules locating each entry's state in a save
//! - Catalog data model (categories, items, necessity)
//! - Per-category scoring strategies
//! - Scan engine producing completion reports
//! - Catalog asset loading with validation
//!
//! Resolution and scoring are pure functions over immutable inputs:
//! callers own the current save, snapshot it, and re-run scans on
//! demand.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod loader;
pub mod rule;
pub mod save;
pub mod scan;
pub mod score;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::loader::*;
    pub use crate::rule::*;
    pub use crate::save::*;
    pub use crate::scan::*;
    pub use crate::score::*;
}

pub use prelude::*;
