//! Point-in-time view of the catalog shared by all analysis passes.

use super::{Item, ItemId, Link};
use crate::parse::normalize;
use std::collections::{HashMap, HashSet};

/// An immutable snapshot of every item and link.
///
/// All analysis passes operate on a snapshot and never touch the store, so
/// re-running a pass on the same snapshot is deterministic and free. Items
/// and links are held in ascending-id order; derived indexes are built once
/// so the passes stay linear where the data allows it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    items: Vec<Item>,
    links: Vec<Link>,
    by_id: HashMap<ItemId, usize>,
    by_word: HashMap<String, Vec<ItemId>>,
    pairs: HashSet<(ItemId, ItemId)>,
}

impl Snapshot {
    pub fn new(mut items: Vec<Item>, mut links: Vec<Link>) -> Self {
        items.sort_by_key(|item| item.id);
        links.sort_by_key(|link| link.id);

        let mut by_id = HashMap::with_capacity(items.len());
        let mut by_word: HashMap<String, Vec<ItemId>> = HashMap::new();
        for (idx, item) in items.iter().enumerate() {
            by_id.insert(item.id, idx);
            // Items are id-sorted, so each group stays sorted ascending.
            by_word.entry(normalize(&item.word)).or_default().push(item.id);
        }
        let pairs = links.iter().map(|link| (link.source, link.destination)).collect();

        Self {
            items,
            links,
            by_id,
            by_word,
            pairs,
        }
    }

    /// All items, ascending by id.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// All links, ascending by id.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.by_id.get(&id).map(|&idx| &self.items[idx])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Ids of items whose normalized word equals `key`, ascending.
    pub fn items_with_word(&self, key: &str) -> &[ItemId] {
        self.by_word.get(key).map_or(&[], |ids| ids.as_slice())
    }

    /// Whether any link `source -> destination` exists, regardless of type.
    pub fn has_link(&self, source: ItemId, destination: ItemId) -> bool {
        self.pairs.contains(&(source, destination))
    }

    /// Normalized-word groups, in no particular order.
    pub fn word_groups(&self) -> impl Iterator<Item = (&str, &[ItemId])> + '_ {
        self.by_word
            .iter()
            .map(|(key, ids)| (key.as_str(), ids.as_slice()))
    }
}
