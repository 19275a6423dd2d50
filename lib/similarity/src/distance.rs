//! Text distance primitives
//!
//! Both functions operate on Unicode scalar values and are case-sensitive;
//! callers normalize (see [`crate::imprint::normalize`]) beforehand.

/// Levenshtein distance with unit cost for insertion, deletion and substitution
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Similarity percentage in [0, 100] derived from [`edit_distance`]
///
/// `100 * (1 - distance / max(len(a), len(b), 1))`, rounded to the nearest integer.
pub fn fuzzy_ratio(a: &str, b: &str) -> u8 {
    let longest = a.chars().count().max(b.chars().count()).max(1);
    let distance = edit_distance(a, b);
    let ratio = 100.0 * (1.0 - distance as f64 / longest as f64);
    ratio.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("ABC", ""), 3);
        assert_eq!(edit_distance("", "AB"), 2);
        assert_eq!(edit_distance("KITTEN", "SITTING"), 3);
        assert_eq!(edit_distance("TY500", "TY500"), 0);
    }

    #[test]
    fn test_edit_distance_is_symmetric() {
        let pairs = [("A100", "A10"), ("YHC", "BC"), ("5", "S"), ("타이레놀", "타이")];
        for (a, b) in pairs {
            assert_eq!(edit_distance(a, b), edit_distance(b, a), "{a} vs {b}");
        }
    }

    #[test]
    fn test_edit_distance_is_case_sensitive() {
        assert_eq!(edit_distance("ty", "TY"), 2);
    }

    #[test]
    fn test_edit_distance_counts_chars_not_bytes() {
        assert_eq!(edit_distance("하양", "노랑"), 2);
        assert_eq!(edit_distance("하양", "하양색"), 1);
    }

    #[test]
    fn test_triangle_inequality() {
        let words = ["A100", "A10", "B100", "", "TY", "X"];
        for a in words {
            for b in words {
                for c in words {
                    assert!(edit_distance(a, c) <= edit_distance(a, b) + edit_distance(b, c));
                }
            }
        }
    }

    #[test]
    fn test_fuzzy_ratio_bounds() {
        assert_eq!(fuzzy_ratio("A100", "A100"), 100);
        assert_eq!(fuzzy_ratio("", ""), 100);
        assert_eq!(fuzzy_ratio("A100", ""), 0);
        assert_eq!(fuzzy_ratio("", "A100"), 0);
        assert_eq!(fuzzy_ratio("AB", "CD"), 0);
    }

    #[test]
    fn test_fuzzy_ratio_partial() {
        // one edit over four characters
        assert_eq!(fuzzy_ratio("A100", "A10"), 75);
        assert_eq!(fuzzy_ratio("TY500", "TY5OO"), 60);
    }
}
