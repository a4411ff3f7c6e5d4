//! Lexigraph: Referential-Integrity Engine for Tag-Linked Catalogs
//!
//! A personal knowledge base holds items (words, writers, titles) connected
//! two ways at once: formal typed links, and informal `{category:content}`
//! tags inside free-text fields. The two representations drift — links point
//! at deleted items, tags reference items that were never linked, naive
//! re-entry creates near-duplicates. This crate detects every such
//! divergence and applies the safe corrective mutations to reconcile them.
//!
//! # Core Concepts
//!
//! - **Items and Links**: catalog entries and directed, typed edges
//! - **Tags**: inline references parsed out of item text
//! - **Snapshot**: an immutable items+links view the analysis passes share
//! - **IntegrityAnalyzer**: classifies divergences into typed reports
//! - **RepairExecutor**: re-validates live state, then mutates atomically
//!
//! # Example
//!
//! ```
//! use lexigraph::{IntegrityAnalyzer, Snapshot};
//!
//! let snapshot = Snapshot::new(Vec::new(), Vec::new());
//! let report = IntegrityAnalyzer::new().run(&snapshot);
//! assert!(report.is_clean());
//! ```

pub mod analysis;
mod catalog;
pub mod parse;
pub mod repair;
pub mod storage;

pub use analysis::{AnalysisConfig, IntegrityAnalyzer, IntegrityReport};
pub use catalog::{Item, ItemId, Link, LinkId, NewItem, Snapshot, TextField};
pub use parse::{normalize, parse_tags, resolve, Reference, Tag};
pub use repair::{FieldSelector, LinkOrStrip, RepairError, RepairExecutor, RepairResult};
pub use storage::{
    CatalogStats, CatalogStore, MergeOutcome, OpenStore, SqliteStore, StorageError, StorageResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
