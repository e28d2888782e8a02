//! Word and grapheme tokenization.
//!
//! Words are whitespace-separated runs with punctuation left attached.
//! Characters are extended grapheme clusters, so a Devanagari consonant with
//! its vowel sign or nukta counts once rather than once per code point.
//! Rust always carries full segmentation tables, so no code-point fallback is
//! needed here.

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Canonical composition (NFC), applied before any comparison so precomposed
/// and decomposed spellings of the same text agree.
pub fn nfc(text: &str) -> String {
    text.nfc().collect()
}

pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn segment_graphemes(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_basic() {
        assert_eq!(words("The quick fox"), vec!["The", "quick", "fox"]);
    }

    #[test]
    fn test_words_collapses_whitespace() {
        assert_eq!(words("  a \t b\n\nc  "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_words_empty() {
        assert!(words("").is_empty());
        assert!(words("   \n").is_empty());
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_words_keep_punctuation() {
        assert_eq!(words("Hello, world."), vec!["Hello,", "world."]);
    }

    #[test]
    fn test_words_rejoin_normalizes_whitespace() {
        let text = "  one   two\tthree\n four ";
        assert_eq!(words(text).join(" "), "one two three four");
    }

    #[test]
    fn test_graphemes_ascii() {
        assert_eq!(grapheme_count("The quick fox"), 13);
    }

    #[test]
    fn test_graphemes_devanagari_combining_marks() {
        // "कि" is KA + VOWEL SIGN I: two code points, one grapheme
        assert_eq!("कि".chars().count(), 2);
        assert_eq!(grapheme_count("कि"), 1);
        assert_eq!(segment_graphemes("हिंदी"), vec!["हिं", "दी"]);
    }

    #[test]
    fn test_nfc_composes() {
        let decomposed = "e\u{0301}";
        assert_eq!(nfc(decomposed), "\u{00e9}");
        assert_eq!(grapheme_count(&nfc(decomposed)), 1);
    }
}
