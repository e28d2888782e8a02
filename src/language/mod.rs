use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Script family of a passage. Drives which leniency rules apply.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
}

const DEVANAGARI: std::ops::RangeInclusive<char> = '\u{0900}'..='\u{097F}';

impl Language {
    /// Any Devanagari code point makes the text Hindi.
    pub fn detect(text: &str) -> Self {
        if text.chars().any(|c| DEVANAGARI.contains(&c)) {
            Language::Hindi
        } else {
            Language::English
        }
    }

    pub fn is_english(&self) -> bool {
        matches!(self, Language::English)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_english() {
        assert_eq!(Language::detect("The quick fox"), Language::English);
        assert_eq!(Language::detect(""), Language::English);
    }

    #[test]
    fn test_detect_hindi() {
        assert_eq!(Language::detect("भारत एक देश है"), Language::Hindi);
        assert_eq!(Language::detect("Section 5 धारा"), Language::Hindi);
    }

    #[test]
    fn test_display_lowercase() {
        assert_eq!(Language::English.to_string(), "english");
        assert_eq!(Language::Hindi.to_string(), "hindi");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Language::Hindi).unwrap();
        assert_eq!(json, "\"hindi\"");
        let lang: Language = serde_json::from_str("\"english\"").unwrap();
        assert_eq!(lang, Language::English);
    }
}
