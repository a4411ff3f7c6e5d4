//! The individual integrity passes.
//!
//! Each pass is a pure function over a [`Snapshot`](crate::catalog::Snapshot):
//! deterministic, side-effect-free, independently callable. The
//! [`IntegrityAnalyzer`](crate::analysis::IntegrityAnalyzer) runs all of them
//! with one shared configuration.

mod ancillary;
mod dangling;
mod duplicates;
mod hidden_links;
mod orphans;
mod references;
mod self_reference;

pub use ancillary::{missing_definitions, unknown_categories, unknown_tags};
pub use dangling::dangling_links;
pub use duplicates::duplicate_items;
pub use hidden_links::links_not_in_text;
pub use orphans::orphaned_items;
pub use references::unlinked_references;
pub use self_reference::self_referential_items;
