//! URL-safe identifiers derived from display text.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// ASCII whitespace only; other Unicode spaces fall to NON_SLUG_CHAR and vanish
    static ref WHITESPACE: Regex = Regex::new(r"[ \t\n\x0B\x0C\r]").unwrap();
    /// Anything that is not an ASCII word character or a hyphen
    static ref NON_SLUG_CHAR: Regex = Regex::new(r"[^A-Za-z0-9_-]").unwrap();
}

/// Combining Diacritical Marks block (U+0300..U+036F)
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Convert display text into a lowercase slug.
///
/// Accented Latin letters fold to their base letter, every ASCII whitespace character becomes
/// one hyphen (runs are kept, so `"A   B"` gives `"a---b"`), other characters outside
/// `[A-Za-z0-9_-]` are dropped and edge hyphens are trimmed. Blank input gives `""`.
pub fn slugify(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let folded: String = text.nfd().filter(|c| !is_combining_diacritic(*c)).collect();
    let hyphenated = WHITESPACE.replace_all(&folded, "-");
    let slug = NON_SLUG_CHAR.replace_all(&hyphenated, "");

    slug.trim_matches('-').to_ascii_lowercase()
}

/// Slugify `base_text` and append `-1`, `-2`, ... until `exists` reports the
/// candidate as free.
pub fn generate_unique_slug<F>(base_text: &str, mut exists: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let slug = slugify(base_text);
    if !exists(&slug) {
        return slug;
    }

    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{}-{}", slug, counter);
        if !exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
