//! Imprint text canonicalization
//!
//! OCR output and catalog imprints differ in case, spacing and punctuation
//! ("TY-500", "ty 500"). Everything is reduced to upper-case ASCII letters,
//! ASCII digits and Hangul syllables before comparison.

use serde::{Deserialize, Serialize};

/// Missing-value placeholder emitted by upstream serializers
const PLACEHOLDER: &str = "NAN";

const HANGUL_SYLLABLES: std::ops::RangeInclusive<char> = '\u{AC00}'..='\u{D7A3}';

fn is_kept(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || HANGUL_SYLLABLES.contains(&c)
}

fn strip(token: &str) -> String {
    token.chars().filter(|c| is_kept(*c)).collect()
}

/// Canonicalize raw imprint text. Idempotent.
pub fn normalize(raw: &str) -> String {
    let upper = raw.to_uppercase();
    let joined: String = upper
        .split_whitespace()
        .map(strip)
        .filter(|token| token != PLACEHOLDER)
        .collect();

    if joined == PLACEHOLDER {
        String::new()
    } else {
        joined
    }
}

/// Coarse character class of an imprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Empty,
    Alpha,
    Numeric,
    Alnum,
    Other,
}

impl CharClass {
    /// One side purely alphabetic, the other purely numeric ("5" vs "S")
    pub fn conflicts_with(self, other: CharClass) -> bool {
        matches!(
            (self, other),
            (CharClass::Alpha, CharClass::Numeric) | (CharClass::Numeric, CharClass::Alpha)
        )
    }
}

pub fn char_class(s: &str) -> CharClass {
    if s.is_empty() {
        CharClass::Empty
    } else if s.chars().all(char::is_alphabetic) {
        CharClass::Alpha
    } else if s.chars().all(char::is_numeric) {
        CharClass::Numeric
    } else if s.chars().all(char::is_alphanumeric) {
        CharClass::Alnum
    } else {
        CharClass::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_spacing_punctuation() {
        assert_eq!(normalize("ty-500"), "TY500");
        assert_eq!(normalize("  b . c  "), "BC");
        assert_eq!(normalize("YHC / B-C"), "YHCBC");
    }

    #[test]
    fn test_normalize_keeps_hangul_syllables() {
        assert_eq!(normalize("한미 10"), "한미10");
        // compatibility jamo are not syllables
        assert_eq!(normalize("ㅎ가"), "가");
    }

    #[test]
    fn test_normalize_drops_placeholder_token() {
        assert_eq!(normalize("nan"), "");
        assert_eq!(normalize("NaN"), "");
        assert_eq!(normalize("A nan 1"), "A1");
        // only whole tokens are placeholders
        assert_eq!(normalize("BANANA"), "BANANA");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = ["ty-500", "NA N", "nan-", "  ", "한미 10", "BANANA", "x\tnan\ny", "Ünï"];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {:?}", input);
            assert!(once.chars().all(is_kept), "input {:?} gave {:?}", input, once);
        }
    }

    #[test]
    fn test_char_class() {
        assert_eq!(char_class(""), CharClass::Empty);
        assert_eq!(char_class("TY"), CharClass::Alpha);
        assert_eq!(char_class("가나"), CharClass::Alpha);
        assert_eq!(char_class("500"), CharClass::Numeric);
        assert_eq!(char_class("A100"), CharClass::Alnum);
        assert_eq!(char_class("B-C"), CharClass::Other);
    }

    #[test]
    fn test_class_conflict() {
        assert!(char_class("5").conflicts_with(char_class("S")));
        assert!(!char_class("A1").conflicts_with(char_class("S")));
        assert!(!CharClass::Empty.conflicts_with(CharClass::Numeric));
    }
}
