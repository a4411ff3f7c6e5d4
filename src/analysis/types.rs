//! Typed result records for the integrity passes.
//!
//! One record type per report category, each with a fixed field set — a
//! caller can match on the shape instead of digging through generic maps.

use crate::catalog::{ItemId, LinkId};
use serde::{Deserialize, Serialize};

/// Why a parsed reference is reported by the unlinked-references pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefReason {
    /// No catalog item matches the reference.
    Missing,
    /// The item exists but no link from the referencing item backs it.
    Unlinked,
}

/// A single offending reference inside an item's text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffendingRef {
    /// The tag content as written, e.g. "Keats'".
    pub text: String,
    pub reason: RefReason,
}

/// Per-item result of the unlinked-references pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlinkedReferences {
    pub item_id: ItemId,
    pub word: String,
    pub category: String,
    pub refs: Vec<OffendingRef>,
    pub ref_count: usize,
}

/// Per-source-item result of the links-not-in-text pass: destinations the
/// item formally links to without mentioning them in any tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiddenLinks {
    pub item_id: ItemId,
    pub word: String,
    pub category: String,
    /// Destination words with no matching tag, sorted.
    pub missing_words: Vec<String>,
    pub count: usize,
}

/// Which endpoint of a dangling link is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSide {
    Source,
    Destination,
}

/// A link with at least one missing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DanglingLink {
    pub link_id: LinkId,
    pub source_item_id: ItemId,
    pub destination_item_id: ItemId,
    pub link_type: String,
    /// Present when the source record still exists.
    pub source_word: Option<String>,
    pub source_category: Option<String>,
    pub missing_side: MissingSide,
}

/// Minimal item identification carried inside other records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub item_id: ItemId,
    pub word: String,
}

/// A set of items whose words collide after normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The shared normalized word.
    pub key: String,
    /// Lowest-id member; merges target this item.
    pub original: ItemSummary,
    pub duplicates: Vec<ItemSummary>,
    pub count: usize,
}

/// An item whose own text fields reference the item itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfReference {
    pub item_id: ItemId,
    pub word: String,
    pub category: String,
    /// Verbatim tag text, e.g. `{word:Thorn}`, usable as a removal pattern.
    pub tag: String,
}

/// An item incident to no link at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orphan {
    pub item_id: ItemId,
    pub word: String,
    pub category: String,
}

/// An item whose category is outside the recognized set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnknownCategory {
    pub item_id: ItemId,
    pub word: String,
    pub category: String,
    pub incoming_links: usize,
    /// When exactly one incoming link exists, its source item.
    pub single_source: Option<ItemSummary>,
}

/// An item with an empty or placeholder definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingDefinition {
    pub item_id: ItemId,
    pub word: String,
    pub category: String,
    /// True when the definition is the import placeholder rather than empty.
    pub placeholder: bool,
    /// When exactly one incoming link exists, its source item.
    pub single_source: Option<ItemSummary>,
}

/// An item carrying tags whose category token is outside the recognized set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnknownTags {
    pub item_id: ItemId,
    pub word: String,
    pub category: String,
    /// Verbatim tags, de-duplicated, in order of first appearance.
    pub tags: Vec<String>,
    pub tag_count: usize,
}

/// Configuration shared by the analysis passes.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Item categories considered known.
    pub recognized_categories: Vec<String>,
    /// Tag category tokens considered reference-bearing (lower case).
    pub recognized_tags: Vec<String>,
    /// Definition text treated as an import placeholder rather than content.
    pub placeholder_marker: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recognized_categories: vec!["Word".into(), "Writer".into(), "Title".into()],
            recognized_tags: vec!["word".into(), "writer".into(), "title".into()],
            placeholder_marker: "MISSING DATA".into(),
        }
    }
}

impl AnalysisConfig {
    pub fn recognizes_category(&self, category: &str) -> bool {
        self.recognized_categories.iter().any(|c| c == category)
    }

    pub fn recognizes_tag(&self, tag_category: &str) -> bool {
        self.recognized_tags.iter().any(|t| t == tag_category)
    }
}

/// Combined output of every pass over one snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub unlinked_references: Vec<UnlinkedReferences>,
    pub hidden_links: Vec<HiddenLinks>,
    pub dangling_links: Vec<DanglingLink>,
    pub duplicates: Vec<DuplicateGroup>,
    pub self_references: Vec<SelfReference>,
    pub orphans: Vec<Orphan>,
    pub unknown_categories: Vec<UnknownCategory>,
    pub missing_definitions: Vec<MissingDefinition>,
    pub unknown_tags: Vec<UnknownTags>,
}

impl IntegrityReport {
    /// Total number of findings across all passes.
    pub fn total(&self) -> usize {
        self.unlinked_references.len()
            + self.hidden_links.len()
            + self.dangling_links.len()
            + self.duplicates.len()
            + self.self_references.len()
            + self.orphans.len()
            + self.unknown_categories.len()
            + self.missing_definitions.len()
            + self.unknown_tags.len()
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}
