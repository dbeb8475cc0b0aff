//! Case-insensitive text comparisons for the text trigger kinds.
//!
//! Both sides are compared after full Unicode case folding, so "Σ", "σ" and
//! "ς" are the same letter and "ß" matches "SS".
//!
//! Lengths and positions are measured in grapheme clusters, so a search never
//! matches half of a character such as "é" written with a combining accent.

use unicode_segmentation::UnicodeSegmentation;

use crate::trigger::kind::TextComparison;

/// Fold `text` to the single case used for all text comparisons.
pub(crate) fn fold_case(text: &str) -> String {
    caseless::default_case_fold_str(text)
}

/// Compare a case-folded field value with a case-folded search string.
pub(crate) fn compare(comparison: TextComparison, field: &str, search: &str) -> bool {
    match comparison {
        TextComparison::Is => field == search,
        TextComparison::Starts => {
            let (field, search) = (graphemes(field), graphemes(search));

            search.len() <= field.len() && field[..search.len()] == search[..]
        }
        TextComparison::Ends => {
            let (field, search) = (graphemes(field), graphemes(search));

            // A search longer than the field can never be a suffix.
            if search.len() > field.len() {
                return false;
            }

            field[field.len() - search.len()..] == search[..]
        }
        TextComparison::Contains => {
            let (field, search) = (graphemes(field), graphemes(search));

            if search.is_empty() {
                return true;
            }

            field.windows(search.len()).any(|window| window == search.as_slice())
        }
    }
}

fn graphemes(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

#[cfg(test)]
mod tests {
    use crate::trigger::kind::TextComparison;

    use super::{compare, fold_case};

    #[test]
    fn ends_with_suffix() {
        assert!(compare(
            TextComparison::Ends,
            "grocery store payment",
            "payment"
        ));
        assert!(!compare(
            TextComparison::Ends,
            "grocery store payment",
            "payment!"
        ));
        assert!(!compare(TextComparison::Ends, "", "x"));
    }

    #[test]
    fn starts_with_prefix() {
        assert!(compare(TextComparison::Starts, "starbucks downtown", "starbucks"));
        assert!(!compare(TextComparison::Starts, "downtown starbucks", "starbucks"));
        assert!(!compare(TextComparison::Starts, "star", "starbucks"));
    }

    #[test]
    fn contains_substring() {
        assert!(compare(TextComparison::Contains, "pos w/d lobster seafoo", "lobster"));
        assert!(!compare(TextComparison::Contains, "pos w/d lobster seafoo", "crab"));
        assert!(!compare(TextComparison::Contains, "ab", "abc"));
    }

    #[test]
    fn is_exact() {
        assert!(compare(TextComparison::Is, "rent", "rent"));
        assert!(!compare(TextComparison::Is, "rent payment", "rent"));
    }

    #[test]
    fn empty_search_is_a_universal_match() {
        for comparison in [
            TextComparison::Starts,
            TextComparison::Ends,
            TextComparison::Contains,
        ] {
            assert!(compare(comparison, "anything", ""));
            assert!(compare(comparison, "", ""));
        }
    }

    #[test]
    fn does_not_split_grapheme_clusters() {
        // "e" followed by a combining acute accent is one grapheme.
        let field = fold_case("CAFE\u{301}");

        assert!(compare(TextComparison::Ends, &field, "e\u{301}"));
        assert!(!compare(TextComparison::Ends, &field, "\u{301}"));
        assert!(!compare(TextComparison::Contains, &field, "\u{301}"));
    }

    #[test]
    fn folding_unifies_sigma_forms() {
        let field = fold_case("ΟΔΟΣ");

        assert!(compare(TextComparison::Ends, &field, &fold_case("Σ")));
        assert!(compare(TextComparison::Ends, &field, &fold_case("σ")));
        assert!(compare(TextComparison::Ends, &field, &fold_case("ς")));
        assert!(compare(TextComparison::Is, &fold_case("οδος"), &field));
    }

    #[test]
    fn folding_expands_sharp_s() {
        let field = fold_case("Straße 5");

        assert!(compare(TextComparison::Starts, &field, &fold_case("STRASSE")));
        assert!(compare(TextComparison::Starts, &fold_case("STRASSE 5"), &fold_case("straße")));
    }

    #[test]
    fn multi_byte_text_uses_logical_length() {
        let field = fold_case("Zahlung an Bäckerei Müller");

        assert!(compare(TextComparison::Ends, &field, &fold_case("MÜLLER")));
        assert!(compare(TextComparison::Starts, &field, "zahlung"));
        assert!(!compare(TextComparison::Ends, "ü", "aü"));
    }
}
