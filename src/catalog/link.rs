//! Link representation: a directed, typed edge between items

use super::item::ItemId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a link, assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LinkId(i64);

impl LinkId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed, typed edge.
///
/// Endpoint ids are not foreign keys: a link may outlive either of its items,
/// which is exactly what the dangling-links pass detects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub source: ItemId,
    pub destination: ItemId,
    /// Open relationship label, e.g. "reference".
    pub link_type: String,
    pub created_at: DateTime<Utc>,
}
