//! Resolution of tag content against the catalog.

use super::normalize;
use crate::catalog::{ItemId, Snapshot};

/// Outcome of resolving a tag's content against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// Exactly one item matched (or the lowest-id item of a duplicate set).
    Resolved(ItemId),
    /// No item's normalized word matches the content.
    Unresolved,
}

impl Reference {
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Reference::Resolved(id) => Some(*id),
            Reference::Unresolved => None,
        }
    }
}

/// Resolve raw tag content to at most one catalog item.
///
/// Lookup is exact equality of normalized words. When several items share the
/// normalized word (a duplicate set, see the duplicate-items pass) the lowest
/// item id wins; the tie-break is deliberate policy and logged so it stays
/// visible rather than silently arbitrary.
pub fn resolve(snapshot: &Snapshot, raw_content: &str) -> Reference {
    let key = normalize(raw_content);
    if key.is_empty() {
        return Reference::Unresolved;
    }
    match snapshot.items_with_word(&key) {
        [] => Reference::Unresolved,
        [only] => Reference::Resolved(*only),
        [first, rest @ ..] => {
            tracing::debug!(
                content = raw_content,
                winner = %first,
                candidates = rest.len() + 1,
                "ambiguous reference, resolving to lowest item id"
            );
            Reference::Resolved(*first)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Item, ItemId, Snapshot};
    use chrono::Utc;

    fn item(id: i64, word: &str) -> Item {
        Item {
            id: ItemId::new(id),
            word: word.to_string(),
            category: "Word".to_string(),
            definition: None,
            derivation: None,
            appendices: None,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        }
    }

    #[test]
    fn resolves_exact_match() {
        let snapshot = Snapshot::new(vec![item(1, "Rose"), item(2, "Thorn")], Vec::new());
        assert_eq!(resolve(&snapshot, "Thorn"), Reference::Resolved(ItemId::new(2)));
    }

    #[test]
    fn resolves_through_normalization() {
        let snapshot = Snapshot::new(vec![item(1, "Keats")], Vec::new());
        assert_eq!(resolve(&snapshot, "KEATS'"), Reference::Resolved(ItemId::new(1)));
        assert_eq!(resolve(&snapshot, "keats\u{2019}s"), Reference::Resolved(ItemId::new(1)));
    }

    #[test]
    fn unknown_word_is_unresolved() {
        let snapshot = Snapshot::new(vec![item(1, "Rose")], Vec::new());
        assert_eq!(resolve(&snapshot, "Briar"), Reference::Unresolved);
        assert_eq!(resolve(&snapshot, ""), Reference::Unresolved);
    }

    #[test]
    fn duplicate_set_resolves_to_lowest_id() {
        let snapshot = Snapshot::new(
            vec![item(9, "rose"), item(4, "Rose's"), item(7, "ROSE")],
            Vec::new(),
        );
        assert_eq!(resolve(&snapshot, "Rose"), Reference::Resolved(ItemId::new(4)));
    }
}
