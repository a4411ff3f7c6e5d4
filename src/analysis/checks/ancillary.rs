//! Ancillary checks: unknown categories, missing definitions, unknown tags.
//!
//! Same scan-and-emit shape as the main passes, lower stakes.

use crate::analysis::types::{
    AnalysisConfig, ItemSummary, MissingDefinition, UnknownCategory, UnknownTags,
};
use crate::catalog::{ItemId, Snapshot};
use crate::parse::parse_tags;
use std::collections::HashSet;

/// Items whose category label is outside the recognized set.
pub fn unknown_categories(snapshot: &Snapshot, config: &AnalysisConfig) -> Vec<UnknownCategory> {
    snapshot
        .items()
        .iter()
        .filter(|item| !config.recognizes_category(&item.category))
        .map(|item| {
            let (incoming_links, single_source) = incoming(snapshot, item.id);
            UnknownCategory {
                item_id: item.id,
                word: item.word.clone(),
                category: item.category.clone(),
                incoming_links,
                single_source,
            }
        })
        .collect()
}

/// Items whose definition is absent, blank, or the import placeholder.
pub fn missing_definitions(snapshot: &Snapshot, config: &AnalysisConfig) -> Vec<MissingDefinition> {
    let mut results = Vec::new();

    for item in snapshot.items() {
        let trimmed = item.definition.as_deref().unwrap_or("").trim();
        let placeholder = if trimmed.is_empty() {
            false
        } else if trimmed == config.placeholder_marker {
            true
        } else {
            continue;
        };

        let (_, single_source) = incoming(snapshot, item.id);
        results.push(MissingDefinition {
            item_id: item.id,
            word: item.word.clone(),
            category: item.category.clone(),
            placeholder,
            single_source,
        });
    }

    results
}

/// Items carrying tags whose category token is outside the recognized set.
///
/// Only items whose own category is recognized are scanned; everything else
/// already surfaces through `unknown_categories`.
pub fn unknown_tags(snapshot: &Snapshot, config: &AnalysisConfig) -> Vec<UnknownTags> {
    let mut results = Vec::new();

    for item in snapshot.items() {
        if !config.recognizes_category(&item.category) {
            continue;
        }

        let mut tags = Vec::new();
        let mut seen = HashSet::new();
        for (_, text) in item.text_fields() {
            for tag in parse_tags(text) {
                if config.recognizes_tag(&tag.category) {
                    continue;
                }
                let raw = tag.raw(text);
                if seen.insert(raw.to_string()) {
                    tags.push(raw.to_string());
                }
            }
        }

        if !tags.is_empty() {
            results.push(UnknownTags {
                item_id: item.id,
                word: item.word.clone(),
                category: item.category.clone(),
                tag_count: tags.len(),
                tags,
            });
        }
    }

    results
}

/// Incoming-link count plus the source item when exactly one link comes in.
fn incoming(snapshot: &Snapshot, id: ItemId) -> (usize, Option<ItemSummary>) {
    let mut sources = snapshot
        .links()
        .iter()
        .filter(|link| link.destination == id)
        .map(|link| link.source);

    let first = sources.next();
    let count = 1 + sources.count();
    match first {
        None => (0, None),
        Some(source) if count == 1 => {
            let summary = snapshot.item(source).map(|item| ItemSummary {
                item_id: item.id,
                word: item.word.clone(),
            });
            (1, summary)
        }
        Some(_) => (count, None),
    }
}
