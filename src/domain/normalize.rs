//! Text normalization used to compare user-entered names, addresses and cities.
//!
//! `臺` and `台` are two written forms of the same character in Taiwanese place
//! names. Everything here folds `臺` into `台`, so `臺北市` and `台北市` compare
//! equal in both duplicate detection and listing filters.

/// Traditional form folded away by [`fold_variants`].
pub const VARIANT_TAI: char = '臺';
/// Canonical form kept by [`fold_variants`].
pub const CANONICAL_TAI: char = '台';

/// Replaces every `臺` with `台`.
pub fn fold_variants(s: &str) -> String {
    s.replace(VARIANT_TAI, &CANONICAL_TAI.to_string())
}

/// Trims, collapses whitespace runs to one space, and lowercases.
pub fn normalize_text(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// [`normalize_text`] plus variant folding.
pub fn normalize_address(s: &str) -> String {
    fold_variants(&normalize_text(s))
}

/// Cities are proper nouns in a caseless script: trim and fold only.
pub fn normalize_city(s: &str) -> String {
    fold_variants(s.trim())
}

/// Lowercased, folded form used for keyword substring matching.
pub fn keyword_form(s: &str) -> String {
    fold_variants(&s.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn collapses_and_lowercases() {
        assert_eq!(normalize_text("  Joe's   Café \t"), "joe's café");
        assert_eq!(normalize_text("\u{3000}鼎泰豐\u{3000}信義店 "), "鼎泰豐 信義店");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn address_folds_variant() {
        assert_eq!(normalize_address(" 臺北市  信義路 "), "台北市 信義路");
        assert_eq!(normalize_address("台北市 信義路"), "台北市 信義路");
    }

    #[test]
    fn city_keeps_inner_text() {
        assert_eq!(normalize_city(" 臺中市 "), "台中市");
        assert_eq!(normalize_city("New  Taipei"), "New  Taipei");
    }

    proptest! {
        #[test]
        fn normalize_text_is_idempotent(s in "\\PC{0,40}") {
            let once = normalize_text(&s);
            prop_assert_eq!(normalize_text(&once), once);
        }

        #[test]
        fn normalize_address_is_idempotent(s in "[ 　\\ta-zA-Z臺台北市路0-9]{0,40}") {
            let once = normalize_address(&s);
            prop_assert_eq!(normalize_address(&once), once);
        }
    }
}
