//! Duplicate-items pass

use crate::analysis::types::{DuplicateGroup, ItemSummary};
use crate::catalog::{ItemId, Snapshot};

/// Group items by normalized word and report every group with more than one
/// member.
///
/// The lowest-id member is the "original"; the merge repair targets it.
/// Groups are sorted by normalized key so re-runs emit identical output.
pub fn duplicate_items(snapshot: &Snapshot) -> Vec<DuplicateGroup> {
    let mut groups: Vec<(&str, &[ItemId])> = snapshot
        .word_groups()
        .filter(|(_, ids)| ids.len() > 1)
        .collect();
    groups.sort_by(|a, b| a.0.cmp(b.0));

    groups
        .into_iter()
        .map(|(key, ids)| DuplicateGroup {
            key: key.to_string(),
            original: summary(snapshot, ids[0]),
            duplicates: ids[1..].iter().map(|id| summary(snapshot, *id)).collect(),
            count: ids.len() - 1,
        })
        .collect()
}

fn summary(snapshot: &Snapshot, id: ItemId) -> ItemSummary {
    let item = snapshot.item(id).expect("group ids come from the snapshot");
    ItemSummary {
        item_id: id,
        word: item.word.clone(),
    }
}
