//! Store trait definitions

use crate::catalog::{Item, ItemId, Link, LinkId, NewItem, Snapshot};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Link not found: {0}")]
    LinkNotFound(LinkId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Date parsing error: {0}")]
    DateParse(String),
}

/// Result type for store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Catalog totals reported by [`CatalogStore::stats`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogStats {
    pub items: usize,
    pub links: usize,
    /// (category, count) pairs, sorted by category.
    pub items_by_category: Vec<(String, usize)>,
}

/// Outcome of a duplicate merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Links whose endpoint was redirected to the original.
    pub links_rewritten: usize,
    /// Links dropped because the rewrite would duplicate an existing
    /// (source, destination, type) triple.
    pub links_dropped: usize,
    pub items_deleted: usize,
}

/// Trait for catalog storage backends
///
/// The store is the single owner of persistent state: ids and timestamps are
/// assigned here, and the engine only ever issues targeted reads and writes
/// against this surface. Implementations must be thread-safe (Send + Sync).
pub trait CatalogStore: Send + Sync {
    // === Item Operations ===

    /// All items, ascending by id.
    fn list_items(&self) -> StorageResult<Vec<Item>>;

    fn get_item(&self, id: ItemId) -> StorageResult<Option<Item>>;

    /// Case-insensitive exact lookup by word; the lowest id wins when
    /// duplicate entries exist. Callers strip possessives first.
    fn find_item_by_word(&self, word: &str) -> StorageResult<Option<Item>>;

    fn create_item(&self, item: NewItem) -> StorageResult<Item>;

    /// Full-record replace of an item's mutable fields. Bumps `modified_at`.
    /// Fails with `ItemNotFound` if the row is gone.
    fn update_item(&self, item: &Item) -> StorageResult<()>;

    /// Returns whether a row was deleted. Links referencing the item are
    /// left in place; they become dangling by design.
    fn delete_item(&self, id: ItemId) -> StorageResult<bool>;

    // === Link Operations ===

    /// All links, ascending by id.
    fn list_links(&self) -> StorageResult<Vec<Link>>;

    fn get_link(&self, id: LinkId) -> StorageResult<Option<Link>>;

    /// Insert a new link row. No uniqueness constraint: calling twice with
    /// the same arguments yields two rows.
    fn create_link(&self, source: ItemId, destination: ItemId, link_type: &str)
        -> StorageResult<Link>;

    /// Returns whether a row was deleted.
    fn delete_link(&self, id: LinkId) -> StorageResult<bool>;

    /// Delete every link `source -> destination`, returning how many rows
    /// went away. Zero is success, not an error.
    fn delete_link_by_endpoints(&self, source: ItemId, destination: ItemId)
        -> StorageResult<usize>;

    // === Bulk Operations ===

    /// Atomically redirect every link touching a duplicate to the original,
    /// dropping rewrites that would duplicate an existing
    /// (source, destination, type) triple, then delete the duplicate items.
    /// Either everything applies or nothing does.
    fn merge_items(&self, original: ItemId, duplicates: &[ItemId]) -> StorageResult<MergeOutcome>;

    /// Delete every link with a missing endpoint, returning the count.
    fn purge_dangling_links(&self) -> StorageResult<usize>;

    fn stats(&self) -> StorageResult<CatalogStats>;

    /// Point-in-time snapshot for the analysis passes.
    fn snapshot(&self) -> StorageResult<Snapshot> {
        Ok(Snapshot::new(self.list_items()?, self.list_links()?))
    }
}

/// Extension trait for opening stores from paths
pub trait OpenStore: CatalogStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
