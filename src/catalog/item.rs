//! Item representation in the catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an item, assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ItemId(i64);

impl ItemId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The text fields of an item that may carry inline tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    Definition,
    Derivation,
    Appendices,
}

impl TextField {
    /// All fields, in the order passes scan them.
    pub const ALL: [TextField; 3] = [
        TextField::Definition,
        TextField::Derivation,
        TextField::Appendices,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Definition => "definition",
            TextField::Derivation => "derivation",
            TextField::Appendices => "appendices",
        }
    }
}

/// A catalog entry.
///
/// `word` should be unique after normalization; this is enforced by the
/// duplicate-items pass rather than a schema constraint, so collisions are a
/// detectable condition. Timestamps are owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Display name.
    pub word: String,
    /// Open type label, e.g. "Word", "Writer", "Title".
    pub category: String,
    pub definition: Option<String>,
    pub derivation: Option<String>,
    pub appendices: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Item {
    pub fn field(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Definition => self.definition.as_deref(),
            TextField::Derivation => self.derivation.as_deref(),
            TextField::Appendices => self.appendices.as_deref(),
        }
    }

    pub fn set_field(&mut self, field: TextField, value: Option<String>) {
        match field {
            TextField::Definition => self.definition = value,
            TextField::Derivation => self.derivation = value,
            TextField::Appendices => self.appendices = value,
        }
    }

    /// Present text fields in scan order.
    pub fn text_fields(&self) -> impl Iterator<Item = (TextField, &str)> + '_ {
        TextField::ALL
            .iter()
            .filter_map(move |field| self.field(*field).map(|text| (*field, text)))
    }
}

/// Fields of a new item, before the store assigns identity and timestamps.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub word: String,
    pub category: String,
    pub definition: Option<String>,
    pub derivation: Option<String>,
    pub appendices: Option<String>,
}

impl NewItem {
    pub fn new(word: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    pub fn with_derivation(mut self, derivation: impl Into<String>) -> Self {
        self.derivation = Some(derivation.into());
        self
    }

    pub fn with_appendices(mut self, appendices: impl Into<String>) -> Self {
        self.appendices = Some(appendices.into());
        self
    }
}
