//! Inline tag parsing and reference resolution.
//!
//! Text fields may carry informal references spelled `{category:content}`,
//! e.g. `blooms like a {word:Thorn}`. This module extracts them
//! ([`parse_tags`]), normalizes words ([`normalize`]) and resolves tag
//! content against a catalog snapshot ([`resolve`]).
//!
//! Matching is literal: patterns are never built from catalog content, so
//! words containing regex metacharacters cannot corrupt a scan.

mod normalize;
mod resolve;

pub use normalize::{normalize, strip_possessive};
pub use resolve::{resolve, Reference};

use std::ops::Range;

/// A single inline tag parsed out of a text field.
///
/// `category` is the lower-cased category token, `content` the verbatim
/// content with surrounding whitespace trimmed, and `span` the byte range of
/// the whole tag (braces included) in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub category: String,
    pub content: String,
    pub span: Range<usize>,
}

impl Tag {
    /// The verbatim tag text as it appears in `text`, e.g. `{word: Thorn}`.
    ///
    /// `text` must be the string the tag was parsed from.
    pub fn raw<'a>(&self, text: &'a str) -> &'a str {
        &text[self.span.clone()]
    }
}

/// Extract every well-formed `{category:content}` tag from `text`.
///
/// The category token is one or more ASCII word characters; content is any
/// non-empty run of characters up to the first `}`. Tags do not nest.
/// Malformed sequences (unmatched braces, missing colon, empty content) are
/// skipped, never an error: the parser only ever returns fewer matches.
pub fn parse_tags(text: &str) -> Vec<Tag> {
    let bytes = text.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }
        match scan_tag(text, i) {
            Some(tag) => {
                i = tag.span.end;
                tags.push(tag);
            }
            // Not a tag; another opening brace may still start one inside.
            None => i += 1,
        }
    }
    tags
}

/// Try to scan one tag starting at the `{` at byte offset `start`.
fn scan_tag(text: &str, start: usize) -> Option<Tag> {
    let bytes = text.as_bytes();
    let mut i = start + 1;

    let category_start = i;
    while i < bytes.len() && is_word_byte(bytes[i]) {
        i += 1;
    }
    if i == category_start || i >= bytes.len() || bytes[i] != b':' {
        return None;
    }
    let category = text[category_start..i].to_ascii_lowercase();
    i += 1;

    let content_start = i;
    while i < bytes.len() && bytes[i] != b'}' {
        i += 1;
    }
    if i >= bytes.len() || i == content_start {
        return None;
    }

    Some(Tag {
        category,
        content: text[content_start..i].trim().to_string(),
        span: start..i + 1,
    })
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_typed_tags() {
        let tags = parse_tags("blooms like a {word:Thorn} near {writer: Keats'} work");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].category, "word");
        assert_eq!(tags[0].content, "Thorn");
        assert_eq!(tags[1].category, "writer");
        assert_eq!(tags[1].content, "Keats'");
    }

    #[test]
    fn category_is_case_folded_content_is_verbatim() {
        let tags = parse_tags("{Writer: John KEATS}");
        assert_eq!(tags[0].category, "writer");
        assert_eq!(tags[0].content, "John KEATS");
    }

    #[test]
    fn span_recovers_the_raw_tag() {
        let text = "see {title: Ode to a Nightingale}, passim";
        let tags = parse_tags(text);
        assert_eq!(tags[0].raw(text), "{title: Ode to a Nightingale}");
    }

    #[test]
    fn text_without_braces_yields_nothing() {
        assert!(parse_tags("no markup here at all").is_empty());
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn malformed_sequences_are_skipped() {
        assert!(parse_tags("{word:never closed").is_empty());
        assert!(parse_tags("{:no category}").is_empty());
        assert!(parse_tags("{word missing colon}").is_empty());
        assert!(parse_tags("stray } brace {").is_empty());
    }

    #[test]
    fn brace_inside_prefix_does_not_hide_a_tag() {
        let tags = parse_tags("{x {word: Foo}");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].content, "Foo");
    }

    #[test]
    fn content_may_contain_an_opening_brace() {
        let tags = parse_tags("{word: a {title: b} c}");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].content, "a {title: b");
    }

    #[test]
    fn multibyte_content_keeps_spans_valid() {
        let text = "voir {word: élégie} là";
        let tags = parse_tags(text);
        assert_eq!(tags[0].content, "élégie");
        assert_eq!(tags[0].raw(text), "{word: élégie}");
    }
}
