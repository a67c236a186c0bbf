//! Lookup normalization shared by dictionary indexing and user input.

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

const TATWEEL: char = '\u{0640}';

/// Canonical lookup form of a color phrase.
///
/// Lowercases, strips diacritics (Latin accents and Arabic harakat/hamza
/// marks alike), turns `-` and `_` into spaces and collapses whitespace:
/// `"  Bleu-Marine "` and `"bleu marine"` both become `"bleu marine"`.
pub fn normalize_phrase(input: &str) -> String {
    let folded: String = input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c) && *c != TATWEEL)
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
