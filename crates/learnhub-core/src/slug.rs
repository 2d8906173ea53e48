//! URL slugs for courses
//!
//! A slug is derived from the title once, at creation. Uniqueness is the
//! store's job: it walks [`candidates`] until one is free.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// Convert text to a URL slug
///
/// NFKD-decomposes the text and keeps only its ASCII part, so accented
/// letters fall back to their base letter. Then lower-cases, drops
/// characters that are not word characters, whitespace or hyphens, collapses
/// whitespace/hyphen runs into one hyphen and strips leading and trailing
/// hyphens and underscores.
pub fn slugify(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_separator = false;

    for ch in value.nfkd().filter(char::is_ascii) {
        if ch == '-' || ch.is_whitespace() {
            pending_separator = true;
            continue;
        }
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            continue;
        }
        if pending_separator {
            out.push('-');
            pending_separator = false;
        }
        out.push(ch.to_ascii_lowercase());
    }

    out.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Slug for a source value, or 8 random hex characters when it slugifies to
/// nothing
pub fn base_slug(source: &str) -> String {
    let base = slugify(source.trim());
    if base.is_empty() {
        let mut random = Uuid::new_v4().simple().to_string();
        random.truncate(8);
        random
    } else {
        base
    }
}

/// `base`, `base-2`, `base-3`, ...
pub fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((2u64..).map(move |n| format!("{}-{}", base, n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Intro to Rust"), "intro-to-rust");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("C++ & Systems -- Part 2"), "c-systems-part-2");
        assert_eq!(slugify("__private__"), "private");
        assert_eq!(slugify("snake_case_title"), "snake_case_title");
    }

    #[test]
    fn test_slugify_folds_accents_to_ascii() {
        assert_eq!(slugify("Café Ünïcode"), "cafe-unicode");
        assert_eq!(slugify("Ｆｕｌｌｗｉｄｔｈ ﬁle"), "fullwidth-file");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_base_slug_fallback_is_random_hex() {
        let slug = base_slug("!!!");
        assert_eq!(slug.len(), 8);
        assert!(slug.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_candidates_sequence() {
        let first: Vec<String> = candidates("rust").take(3).collect();
        assert_eq!(first, vec!["rust", "rust-2", "rust-3"]);
    }
}
