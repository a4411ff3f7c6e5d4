//! Dangling-links pass

use crate::analysis::types::{DanglingLink, MissingSide};
use crate::catalog::Snapshot;

/// Report every link with at least one endpoint id absent from the snapshot.
///
/// When both endpoints are gone the destination side is reported; the source
/// side is reported only when the source record itself cannot be found.
pub fn dangling_links(snapshot: &Snapshot) -> Vec<DanglingLink> {
    let mut results = Vec::new();

    for link in snapshot.links() {
        let source = snapshot.item(link.source);
        let missing_side = if !snapshot.contains(link.destination) {
            MissingSide::Destination
        } else if source.is_none() {
            MissingSide::Source
        } else {
            continue;
        };

        results.push(DanglingLink {
            link_id: link.id,
            source_item_id: link.source,
            destination_item_id: link.destination,
            link_type: link.link_type.clone(),
            source_word: source.map(|item| item.word.clone()),
            source_category: source.map(|item| item.category.clone()),
            missing_side,
        });
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::checks::testutil::{item_with_definition, link, snapshot};

    #[test]
    fn missing_destination_is_reported_with_source_word() {
        let snap = snapshot(
            vec![item_with_definition(1, "Rose", "")],
            vec![link(1, 1, 99)],
        );
        let results = dangling_links(&snap);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].missing_side, MissingSide::Destination);
        assert_eq!(results[0].source_word.as_deref(), Some("Rose"));
    }

    #[test]
    fn missing_source_is_reported_without_source_word() {
        let snap = snapshot(
            vec![item_with_definition(1, "Rose", "")],
            vec![link(1, 99, 1)],
        );
        let results = dangling_links(&snap);
        assert_eq!(results[0].missing_side, MissingSide::Source);
        assert_eq!(results[0].source_word, None);
    }

    // === Scenario: both endpoints gone — destination side wins ===
    #[test]
    fn both_missing_reports_destination() {
        let snap = snapshot(vec![], vec![link(1, 98, 99)]);
        let results = dangling_links(&snap);
        assert_eq!(results[0].missing_side, MissingSide::Destination);
    }

    // === Property: a link is reported iff an endpoint is absent ===
    #[test]
    fn intact_links_are_never_reported() {
        let snap = snapshot(
            vec![
                item_with_definition(1, "Rose", ""),
                item_with_definition(2, "Thorn", ""),
            ],
            vec![link(1, 1, 2), link(2, 2, 1), link(3, 1, 7)],
        );
        let results = dangling_links(&snap);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].link_id.as_i64(), 3);
    }
}
