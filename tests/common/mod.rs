//! Shared builders for integration tests

use chrono::Utc;
use lexigraph::{Item, ItemId, Link, LinkId, Snapshot};

pub fn item(id: i64, word: &str, category: &str, definition: &str) -> Item {
    Item {
        id: ItemId::new(id),
        word: word.to_string(),
        category: category.to_string(),
        definition: (!definition.is_empty()).then(|| definition.to_string()),
        derivation: None,
        appendices: None,
        created_at: Utc::now(),
        modified_at: Utc::now(),
    }
}

pub fn link(id: i64, source: i64, destination: i64) -> Link {
    Link {
        id: LinkId::new(id),
        source: ItemId::new(source),
        destination: ItemId::new(destination),
        link_type: "reference".to_string(),
        created_at: Utc::now(),
    }
}

pub fn snapshot(items: Vec<Item>, links: Vec<Link>) -> Snapshot {
    Snapshot::new(items, links)
}
