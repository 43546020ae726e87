//! Text helpers for category names.
//!
//! Duplicate detection compares names by a normalized key, while the stored
//! name keeps a human-friendly display form.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Comparison key for a category name: trimmed, accents stripped, lowercased.
pub fn comparison_key(input: &str) -> String {
    input
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Display form for a category name: trimmed, first character uppercased and
/// the rest lowercased. Accents are kept.
pub fn display_name(input: &str) -> String {
    let mut chars = input.trim().chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}
