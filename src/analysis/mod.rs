//! Integrity analysis over a catalog snapshot
//!
//! The analyzer cross-validates two representations of the same
//! relationships: formal link rows and informal inline tags. Every pass is a
//! read-only scan of an immutable [`Snapshot`]; divergences are classified
//! into typed report records, one category per pass:
//!
//! - **unlinked references**: tags without a backing link, or pointing at
//!   nothing
//! - **hidden links**: links never mentioned in the source item's text
//! - **dangling links**: links with a missing endpoint
//! - **duplicates**: items colliding after normalization
//! - **self references**: items tagging themselves
//! - **orphans**: items with no incident links
//! - ancillary: unknown categories, missing definitions, unknown tags
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

pub mod checks;
mod types;

pub use types::{
    AnalysisConfig, DanglingLink, DuplicateGroup, HiddenLinks, IntegrityReport, ItemSummary,
    MissingDefinition, MissingSide, OffendingRef, Orphan, RefReason, SelfReference, UnknownCategory,
    UnknownTags, UnlinkedReferences,
};

use crate::catalog::Snapshot;

/// Runs every integrity pass over one snapshot with a shared configuration.
#[derive(Debug, Clone, Default)]
pub struct IntegrityAnalyzer {
    config: AnalysisConfig,
}

impl IntegrityAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run all passes. Purely a function of the snapshot and configuration;
    /// re-running on the same snapshot yields an identical report.
    pub fn run(&self, snapshot: &Snapshot) -> IntegrityReport {
        let report = IntegrityReport {
            unlinked_references: checks::unlinked_references(snapshot, &self.config),
            hidden_links: checks::links_not_in_text(snapshot),
            dangling_links: checks::dangling_links(snapshot),
            duplicates: checks::duplicate_items(snapshot),
            self_references: checks::self_referential_items(snapshot, &self.config),
            orphans: checks::orphaned_items(snapshot),
            unknown_categories: checks::unknown_categories(snapshot, &self.config),
            missing_definitions: checks::missing_definitions(snapshot, &self.config),
            unknown_tags: checks::unknown_tags(snapshot, &self.config),
        };
        tracing::debug!(findings = report.total(), "integrity analysis complete");
        report
    }
}
