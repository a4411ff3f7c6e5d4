//! Links-not-in-text pass
//!
//! The inverse of the unlinked-references pass: formal links whose
//! destination is never mentioned as a tag in the source item's text.

use crate::analysis::types::HiddenLinks;
use crate::catalog::Snapshot;
use crate::parse::{normalize, parse_tags};
use std::collections::{BTreeMap, HashSet};

/// For every link, require that the destination's normalized word appears as
/// some tag's normalized content in the source item's text fields.
///
/// Links whose source item is gone are dangling, not hidden, and are skipped
/// here; so are links from items with no text at all (those surface through
/// the missing-definitions check instead). Any tag category counts as a
/// mention.
pub fn links_not_in_text(snapshot: &Snapshot) -> Vec<HiddenLinks> {
    let mut by_source: BTreeMap<_, Vec<_>> = BTreeMap::new();
    for link in snapshot.links() {
        by_source.entry(link.source).or_default().push(link);
    }

    let mut results = Vec::new();
    for (source_id, links) in by_source {
        let Some(item) = snapshot.item(source_id) else {
            continue;
        };
        if item.text_fields().all(|(_, text)| text.trim().is_empty()) {
            continue;
        }

        let mentioned: HashSet<String> = item
            .text_fields()
            .flat_map(|(_, text)| parse_tags(text))
            .map(|tag| normalize(&tag.content))
            .collect();

        let mut missing_words: Vec<String> = links
            .iter()
            .filter_map(|link| snapshot.item(link.destination))
            .filter(|dest| !mentioned.contains(&normalize(&dest.word)))
            .map(|dest| dest.word.clone())
            .collect();

        if !missing_words.is_empty() {
            missing_words.sort();
            results.push(HiddenLinks {
                item_id: item.id,
                word: item.word.clone(),
                category: item.category.clone(),
                count: missing_words.len(),
                missing_words,
            });
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::checks::testutil::{item_with_definition, link, snapshot};

    // === Scenario: link exists but definition never mentions the destination ===
    #[test]
    fn linked_destination_missing_from_text_is_reported() {
        let snap = snapshot(
            vec![
                item_with_definition(1, "Rose", "blooms red"),
                item_with_definition(2, "Thorn", ""),
            ],
            vec![link(1, 1, 2)],
        );
        let results = links_not_in_text(&snap);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].item_id.as_i64(), 1);
        assert_eq!(results[0].missing_words, vec!["Thorn".to_string()]);
        assert_eq!(results[0].count, 1);
    }

    #[test]
    fn tagged_destination_is_not_reported() {
        let snap = snapshot(
            vec![
                item_with_definition(1, "Rose", "blooms like a {word:Thorn}"),
                item_with_definition(2, "Thorn", ""),
            ],
            vec![link(1, 1, 2)],
        );
        assert!(links_not_in_text(&snap).is_empty());
    }

    // === Scenario: possessive tag still counts as a mention ===
    #[test]
    fn possessive_tag_matches_destination_word() {
        let snap = snapshot(
            vec![
                item_with_definition(1, "Ode", "in {writer: Keats'} hand"),
                item_with_definition(2, "Keats", ""),
            ],
            vec![link(1, 1, 2)],
        );
        assert!(links_not_in_text(&snap).is_empty());
    }

    #[test]
    fn dangling_endpoints_are_left_to_the_dangling_pass() {
        let snap = snapshot(
            vec![item_with_definition(1, "Rose", "blooms red")],
            vec![link(1, 1, 99), link(2, 98, 1)],
        );
        assert!(links_not_in_text(&snap).is_empty());
    }

    #[test]
    fn textless_source_items_are_skipped() {
        let snap = snapshot(
            vec![
                item_with_definition(1, "Rose", ""),
                item_with_definition(2, "Thorn", ""),
            ],
            vec![link(1, 1, 2)],
        );
        assert!(links_not_in_text(&snap).is_empty());
    }

    #[test]
    fn missing_words_are_sorted_per_item() {
        let snap = snapshot(
            vec![
                item_with_definition(1, "Rose", "blooms red"),
                item_with_definition(2, "Thorn", ""),
                item_with_definition(3, "Briar", ""),
            ],
            vec![link(1, 1, 2), link(2, 1, 3)],
        );
        let results = links_not_in_text(&snap);
        assert_eq!(
            results[0].missing_words,
            vec!["Briar".to_string(), "Thorn".to_string()]
        );
    }
}
