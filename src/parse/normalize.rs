//! Word normalization: case-fold plus a single possessive-strip.
//!
//! Two spellings of the same word must collide here for duplicate
//! detection and reference resolution to agree: "Rose's", "rose" and
//! "ROSE" all normalize to "rose".

/// Strip one trailing possessive suffix from `text`.
///
/// Recognized forms, with straight or curly apostrophes: `'s` ("Shakespeare's")
/// and a bare trailing apostrophe after `s` for already-plural possessives
/// ("Keats'"). Applied once, never recursively.
pub fn strip_possessive(text: &str) -> &str {
    let mut rev = text.chars().rev();
    match (rev.next(), rev.next()) {
        (Some(s @ ('s' | 'S')), Some(a)) if is_apostrophe(a) => {
            &text[..text.len() - s.len_utf8() - a.len_utf8()]
        }
        (Some(a), Some('s' | 'S')) if is_apostrophe(a) => &text[..text.len() - a.len_utf8()],
        _ => text,
    }
}

/// Normalization used for all word matching: case-fold, then strip one
/// possessive suffix.
pub fn normalize(word: &str) -> String {
    strip_possessive(&word.to_lowercase()).to_string()
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_straight_apostrophe_s() {
        assert_eq!(strip_possessive("Shakespeare's"), "Shakespeare");
    }

    #[test]
    fn strips_curly_apostrophe_s() {
        assert_eq!(strip_possessive("Shakespeare\u{2019}s"), "Shakespeare");
    }

    #[test]
    fn strips_plural_possessive() {
        assert_eq!(strip_possessive("Keats'"), "Keats");
        assert_eq!(strip_possessive("Keats\u{2019}"), "Keats");
    }

    #[test]
    fn leaves_plain_words_alone() {
        assert_eq!(strip_possessive("Rose"), "Rose");
        assert_eq!(strip_possessive("it's-ish"), "it's-ish");
        assert_eq!(strip_possessive(""), "");
        assert_eq!(strip_possessive("'"), "'");
    }

    #[test]
    fn normalize_case_folds_then_strips() {
        assert_eq!(normalize("ROSE'S"), "rose");
        assert_eq!(normalize("Keats\u{2019}"), "keats");
        assert_eq!(normalize("thorn"), "thorn");
    }

    #[test]
    fn normalize_is_idempotent() {
        for word in ["Rose", "Rose's", "Keats'", "ROSE\u{2019}S", "children's", "Thorn"] {
            let once = normalize(word);
            assert_eq!(normalize(&once), once, "normalize({word:?}) not idempotent");
        }
    }
}
