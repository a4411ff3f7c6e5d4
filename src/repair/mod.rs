//! Corrective mutations against the live store
//!
//! Analysis happens on a snapshot; by the time a caller acts on a report the
//! store may have moved on. Every repair therefore re-reads the affected
//! rows, validates its preconditions, and only then mutates — failing with
//! [`RepairError::ItemNotFound`]/[`RepairError::LinkNotFound`] or
//! [`RepairError::PreconditionFailed`] instead of silently overwriting.
//! A failed repair leaves the store in its prior state; callers re-run the
//! relevant pass and retry.

use crate::catalog::{Item, ItemId, Link, LinkId, TextField};
use crate::parse::{normalize, parse_tags, strip_possessive};
use crate::storage::{CatalogStore, MergeOutcome, StorageError};
use thiserror::Error;

/// Errors surfaced by repair operations
#[derive(Debug, Error)]
pub enum RepairError {
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Link not found: {0}")]
    LinkNotFound(LinkId),

    /// The store state no longer matches what the snapshot promised.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error(transparent)]
    Store(#[from] StorageError),
}

/// Result type for repair operations
pub type RepairResult<T> = Result<T, RepairError>;

/// Which text fields a strip operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSelector {
    One(TextField),
    All,
}

impl FieldSelector {
    fn fields(&self) -> &[TextField] {
        match self {
            FieldSelector::One(field) => std::slice::from_ref(field),
            FieldSelector::All => &TextField::ALL,
        }
    }
}

/// Outcome of [`RepairExecutor::link_or_strip`].
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOrStrip {
    /// The referenced item exists; this link now backs the reference.
    Linked(Link),
    /// The referenced item does not exist (or is the source itself);
    /// matching tags were rewritten to bare text.
    Stripped { changed: bool },
}

/// Applies corrective mutations on behalf of a caller acting on a report.
pub struct RepairExecutor<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> RepairExecutor<'a> {
    pub fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    /// Create a link after re-verifying both endpoints still exist.
    ///
    /// Safe to call twice, but not idempotent: links have no uniqueness
    /// constraint, so a second call inserts a second row.
    pub fn create_link(
        &self,
        source: ItemId,
        destination: ItemId,
        link_type: &str,
    ) -> RepairResult<Link> {
        self.require_item(source)?;
        self.require_item(destination)?;
        let link = self.store.create_link(source, destination, link_type)?;
        tracing::info!(link = %link.id, %source, %destination, link_type, "created link");
        Ok(link)
    }

    pub fn delete_link(&self, id: LinkId) -> RepairResult<()> {
        if !self.store.delete_link(id)? {
            return Err(RepairError::LinkNotFound(id));
        }
        tracing::info!(link = %id, "deleted link");
        Ok(())
    }

    /// Best-effort removal of every `source -> destination` link; absence is
    /// a no-op, not an error. Used defensively ahead of tag stripping.
    pub fn delete_link_by_endpoints(
        &self,
        source: ItemId,
        destination: ItemId,
    ) -> RepairResult<usize> {
        Ok(self.store.delete_link_by_endpoints(source, destination)?)
    }

    /// Rewrite every tag whose normalized content equals
    /// `normalize(match_word)` in the selected field(s) to its bare content,
    /// leaving all other text untouched. Returns whether anything changed.
    pub fn strip_tag(
        &self,
        item_id: ItemId,
        selector: FieldSelector,
        match_word: &str,
    ) -> RepairResult<bool> {
        let mut item = self.require_item(item_id)?;
        let changed = strip_tags_in_item(&mut item, selector, match_word);
        if changed {
            self.store.update_item(&item)?;
            tracing::info!(item = %item_id, word = match_word, "stripped reference tags");
        }
        Ok(changed)
    }

    /// Redirect every link touching a duplicate onto the original, then
    /// delete the duplicates — atomically, via the store's merge primitive.
    ///
    /// Re-validates against live state first: the original must exist and
    /// not appear among the duplicates, and every duplicate must still
    /// normalize to the original's word. Any drift since the snapshot was
    /// taken fails the whole operation with nothing applied.
    pub fn merge_duplicates(
        &self,
        original_id: ItemId,
        duplicate_ids: &[ItemId],
    ) -> RepairResult<MergeOutcome> {
        if duplicate_ids.contains(&original_id) {
            return Err(RepairError::PreconditionFailed(format!(
                "item {original_id} listed as both original and duplicate"
            )));
        }
        let original = self.require_item(original_id)?;
        let key = normalize(&original.word);
        for duplicate_id in duplicate_ids {
            let duplicate = self.require_item(*duplicate_id)?;
            let dup_key = normalize(&duplicate.word);
            if dup_key != key {
                return Err(RepairError::PreconditionFailed(format!(
                    "item {} now normalizes to {dup_key:?}, not {key:?}",
                    duplicate.id
                )));
            }
        }

        let outcome = self.store.merge_items(original_id, duplicate_ids)?;
        tracing::info!(
            original = %original_id,
            merged = duplicate_ids.len(),
            rewritten = outcome.links_rewritten,
            dropped = outcome.links_dropped,
            "merged duplicate items"
        );
        Ok(outcome)
    }

    /// Create a link backing the reference `ref_word`, or — when no such
    /// item exists — strip the reference's tags from all of the source
    /// item's text fields instead.
    pub fn link_or_strip(&self, source_id: ItemId, ref_word: &str) -> RepairResult<LinkOrStrip> {
        let match_word = strip_possessive(ref_word);
        if let Some(destination) = self.store.find_item_by_word(match_word)? {
            if destination.id != source_id {
                let link = self.create_link(source_id, destination.id, "reference")?;
                return Ok(LinkOrStrip::Linked(link));
            }
        }
        let changed = self.strip_tag(source_id, FieldSelector::All, match_word)?;
        Ok(LinkOrStrip::Stripped { changed })
    }

    /// Remove a reference entirely: delete any backing link (which may or
    /// may not exist), then strip the matching tags from all fields.
    pub fn detach_reference(&self, source_id: ItemId, ref_word: &str) -> RepairResult<bool> {
        let match_word = strip_possessive(ref_word);
        if let Some(destination) = self.store.find_item_by_word(match_word)? {
            self.store.delete_link_by_endpoints(source_id, destination.id)?;
        }
        self.strip_tag(source_id, FieldSelector::All, match_word)
    }

    /// Delete every link with a missing endpoint. Returns the count.
    pub fn purge_dangling_links(&self) -> RepairResult<usize> {
        let purged = self.store.purge_dangling_links()?;
        if purged > 0 {
            tracing::info!(purged, "purged dangling links");
        }
        Ok(purged)
    }

    fn require_item(&self, id: ItemId) -> RepairResult<Item> {
        self.store
            .get_item(id)?
            .ok_or(RepairError::ItemNotFound(id))
    }
}

/// Rewrite matching tags to bare content in the selected fields.
fn strip_tags_in_item(item: &mut Item, selector: FieldSelector, match_word: &str) -> bool {
    let target = normalize(match_word);
    let mut changed = false;
    for field in selector.fields() {
        let Some(text) = item.field(*field) else {
            continue;
        };
        if let Some(rewritten) = strip_tags_in_text(text, &target) {
            item.set_field(*field, Some(rewritten));
            changed = true;
        }
    }
    changed
}

/// Replace each matching tag span with its trimmed content. Returns `None`
/// when no tag matched, so callers skip the write entirely.
fn strip_tags_in_text(text: &str, normalized_target: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut any = false;
    for tag in parse_tags(text) {
        if normalize(&tag.content) != normalized_target {
            continue;
        }
        out.push_str(&text[last..tag.span.start]);
        out.push_str(&tag.content);
        last = tag.span.end;
        any = true;
    }
    if !any {
        return None;
    }
    out.push_str(&text[last..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_replaces_tag_with_bare_content() {
        let out = strip_tags_in_text("See {word: Poetry's} again", "poetry");
        assert_eq!(out.as_deref(), Some("See Poetry's again"));
    }

    #[test]
    fn strip_leaves_other_tags_alone() {
        let out = strip_tags_in_text(
            "a {word:Thorn} and a {word:Rose} and a {word: Thorn's}",
            "thorn",
        );
        assert_eq!(out.as_deref(), Some("a Thorn and a {word:Rose} and a Thorn's"));
    }

    #[test]
    fn strip_without_match_reports_no_change() {
        assert_eq!(strip_tags_in_text("a {word:Rose} here", "thorn"), None);
        assert_eq!(strip_tags_in_text("no tags at all", "thorn"), None);
    }
}
