//! Self-referential-items pass

use crate::analysis::types::{AnalysisConfig, SelfReference};
use crate::catalog::Snapshot;
use crate::parse::{parse_tags, resolve, Reference};

/// Report items whose own text fields contain a tag resolving back to the
/// item itself.
///
/// One entry per item, carrying the first offending tag verbatim; the
/// strip-tag repair removes every matching occurrence regardless.
pub fn self_referential_items(snapshot: &Snapshot, config: &AnalysisConfig) -> Vec<SelfReference> {
    let mut results = Vec::new();

    'items: for item in snapshot.items() {
        for (_, text) in item.text_fields() {
            for tag in parse_tags(text) {
                if !config.recognizes_tag(&tag.category) {
                    continue;
                }
                if resolve(snapshot, &tag.content) == Reference::Resolved(item.id) {
                    results.push(SelfReference {
                        item_id: item.id,
                        word: item.word.clone(),
                        category: item.category.clone(),
                        tag: tag.raw(text).to_string(),
                    });
                    continue 'items;
                }
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::checks::testutil::{item_with_definition, snapshot};

    // === Scenario: a word defined in terms of itself ===
    #[test]
    fn tag_resolving_to_own_item_is_reported_verbatim() {
        let snap = snapshot(
            vec![item_with_definition(1, "Thorn", "sharp like a {word:Thorn}")],
            vec![],
        );
        let results = self_referential_items(&snap, &AnalysisConfig::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].item_id.as_i64(), 1);
        assert_eq!(results[0].tag, "{word:Thorn}");
    }

    #[test]
    fn possessive_self_reference_still_counts() {
        let snap = snapshot(
            vec![item_with_definition(1, "Keats", "in {writer: Keats'} letters")],
            vec![],
        );
        let results = self_referential_items(&snap, &AnalysisConfig::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tag, "{writer: Keats'}");
    }

    #[test]
    fn references_to_other_items_are_fine() {
        let snap = snapshot(
            vec![
                item_with_definition(1, "Rose", "blooms like a {word:Thorn}"),
                item_with_definition(2, "Thorn", ""),
            ],
            vec![],
        );
        assert!(self_referential_items(&snap, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn one_entry_per_item_even_with_repeats() {
        let snap = snapshot(
            vec![item_with_definition(
                1,
                "Thorn",
                "{word:Thorn} and {word: Thorn} again",
            )],
            vec![],
        );
        let results = self_referential_items(&snap, &AnalysisConfig::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tag, "{word:Thorn}");
    }
}
