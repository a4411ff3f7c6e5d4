//! Persistent storage for the catalog
//!
//! The engine never owns state: every read goes through [`CatalogStore`],
//! every repair issues targeted writes back through it. [`SqliteStore`] is
//! the bundled backend.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{CatalogStats, CatalogStore, MergeOutcome, OpenStore, StorageError, StorageResult};
