//! Core catalog data structures

mod item;
mod link;
mod snapshot;

pub use item::{Item, ItemId, NewItem, TextField};
pub use link::{Link, LinkId};
pub use snapshot::Snapshot;
