//! Unlinked-references pass
//!
//! Finds inline references whose formal link row is missing ("unlinked") or
//! whose referenced item does not exist at all ("missing").

use crate::analysis::types::{AnalysisConfig, OffendingRef, RefReason, UnlinkedReferences};
use crate::catalog::Snapshot;
use crate::parse::{parse_tags, resolve, Reference};

/// Scan every item's text fields for references that resolve to an item with
/// no backing link, or do not resolve at all.
///
/// Tags resolving to the item itself are skipped here; the self-reference
/// pass reports those. Tags whose category token is outside the recognized
/// set are not references and belong to the unknown-tags check.
pub fn unlinked_references(snapshot: &Snapshot, config: &AnalysisConfig) -> Vec<UnlinkedReferences> {
    let mut results = Vec::new();

    for item in snapshot.items() {
        let mut refs = Vec::new();
        for (_, text) in item.text_fields() {
            for tag in parse_tags(text) {
                if !config.recognizes_tag(&tag.category) {
                    continue;
                }
                match resolve(snapshot, &tag.content) {
                    Reference::Resolved(id) if id == item.id => {}
                    Reference::Resolved(id) => {
                        if !snapshot.has_link(item.id, id) {
                            refs.push(OffendingRef {
                                text: tag.content,
                                reason: RefReason::Unlinked,
                            });
                        }
                    }
                    Reference::Unresolved => refs.push(OffendingRef {
                        text: tag.content,
                        reason: RefReason::Missing,
                    }),
                }
            }
        }
        if !refs.is_empty() {
            results.push(UnlinkedReferences {
                item_id: item.id,
                word: item.word.clone(),
                category: item.category.clone(),
                ref_count: refs.len(),
                refs,
            });
        }
    }

    results
}
