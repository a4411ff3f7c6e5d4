//! Orphaned-items pass

use crate::analysis::types::Orphan;
use crate::catalog::Snapshot;
use std::collections::HashSet;

/// Report items that appear as neither source nor destination of any link.
///
/// A dangling link still "connects" its surviving endpoint: the item is
/// participating in the graph even if its counterpart is gone.
pub fn orphaned_items(snapshot: &Snapshot) -> Vec<Orphan> {
    let connected: HashSet<_> = snapshot
        .links()
        .iter()
        .flat_map(|link| [link.source, link.destination])
        .collect();

    snapshot
        .items()
        .iter()
        .filter(|item| !connected.contains(&item.id))
        .map(|item| Orphan {
            item_id: item.id,
            word: item.word.clone(),
            category: item.category.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::checks::testutil::{item_with_definition, link, snapshot};

    #[test]
    fn items_without_links_are_orphans() {
        let snap = snapshot(
            vec![
                item_with_definition(1, "Rose", ""),
                item_with_definition(2, "Thorn", ""),
                item_with_definition(3, "Briar", ""),
            ],
            vec![link(1, 1, 2)],
        );
        let results = orphaned_items(&snap);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].item_id.as_i64(), 3);
        assert_eq!(results[0].word, "Briar");
    }

    #[test]
    fn either_link_direction_connects() {
        let snap = snapshot(
            vec![
                item_with_definition(1, "Rose", ""),
                item_with_definition(2, "Thorn", ""),
            ],
            vec![link(1, 2, 1)],
        );
        assert!(orphaned_items(&snap).is_empty());
    }

    #[test]
    fn dangling_link_still_connects_surviving_endpoint() {
        let snap = snapshot(
            vec![item_with_definition(1, "Rose", "")],
            vec![link(1, 1, 99)],
        );
        assert!(orphaned_items(&snap).is_empty());
    }
}
