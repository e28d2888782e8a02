//! Leniency rules and the word normalisation they are built on.
//!
//! Exam profiles carry a list of [`ExamRule`] values. The classifier never
//! branches on a profile name; it asks the compiled [`RuleSet`] instead.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// A leniency rule attached to an exam profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ExamRule {
    /// Two differently written dates are not a mistake.
    DateTolerance,
    /// Tokens that mean the same thing (`%` and `percent`). Keys are matched
    /// lower-cased; values are the canonical spelling both sides map to.
    EquivalenceMap { pairs: BTreeMap<String, String> },
    /// Two reference words typed without the space between them count once.
    MergeNoSpace,
    /// Each extra ` .` in the typed text is a full mistake.
    SpaceBeforeFullStop,
}

impl ExamRule {
    pub fn name(&self) -> &'static str {
        match self {
            ExamRule::DateTolerance => "date_tolerance",
            ExamRule::EquivalenceMap { .. } => "equivalence_map",
            ExamRule::MergeNoSpace => "merge_no_space",
            ExamRule::SpaceBeforeFullStop => "space_before_full_stop",
        }
    }
}

/// Flattened view of a profile's rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    date_tolerance: bool,
    merge_no_space: bool,
    space_before_full_stop: bool,
    equivalences: Option<HashMap<String, String>>,
}

impl RuleSet {
    /// The rules that apply when no exam profile is selected.
    pub fn generic() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: &[ExamRule]) -> Self {
        let mut set = Self::default();
        for rule in rules {
            match rule {
                ExamRule::DateTolerance => set.date_tolerance = true,
                ExamRule::MergeNoSpace => set.merge_no_space = true,
                ExamRule::SpaceBeforeFullStop => set.space_before_full_stop = true,
                ExamRule::EquivalenceMap { pairs } => {
                    let map = set.equivalences.get_or_insert_with(HashMap::new);
                    for (from, to) in pairs {
                        map.insert(from.to_lowercase(), to.to_lowercase());
                    }
                }
            }
        }
        set
    }

    pub fn date_tolerance(&self) -> bool {
        self.date_tolerance
    }

    pub fn merge_no_space(&self) -> bool {
        self.merge_no_space
    }

    pub fn space_before_full_stop(&self) -> bool {
        self.space_before_full_stop
    }

    pub fn equivalences(&self) -> Option<&HashMap<String, String>> {
        self.equivalences.as_ref()
    }
}

const IGNORED_PUNCTUATION: &[char] = &[
    '.', ',', '-', '/', '%', ':', ';', '"', '\'', '\u{2018}', '\u{2019}', '\u{201C}',
    '\u{201D}', '\u{2013}', '\u{2014}',
];

const SURROUNDING_QUOTES: &[char] = &[
    '"', '\'', '(', ')', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
];

const CHANDRABINDU: char = '\u{0901}';
const ANUSVARA: char = '\u{0902}';
const HALANT: char = '\u{094D}';
const HINDI_HYPHENS: &[char] = &['-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}'];
const JOINERS: &[char] = &['\u{200C}', '\u{200D}'];
const NASALS: &[&str] = &["न्", "म्", "ङ्", "ञ्", "ण्"];

pub fn strip_punctuation(word: &str) -> String {
    word.chars()
        .filter(|c| !IGNORED_PUNCTUATION.contains(c))
        .collect()
}

/// Spelling variants that every Hindi passage tolerates: chandrabindu is read
/// as anusvara, hyphens and zero-width joiners are dropped, and so is a
/// trailing halant.
pub fn fold_hindi(word: &str) -> String {
    let folded: String = word
        .chars()
        .filter(|c| !HINDI_HYPHENS.contains(c) && !JOINERS.contains(c))
        .map(|c| if c == CHANDRABINDU { ANUSVARA } else { c })
        .collect();
    folded.trim_end_matches(HALANT).to_string()
}

/// Anusvara written as a half nasal consonant, e.g. `संत` and `सन्त`.
pub fn anusvara_equivalent(a: &str, b: &str) -> bool {
    fn expands_to(short: &str, long: &str) -> bool {
        short.contains(ANUSVARA)
            && NASALS
                .iter()
                .any(|nasal| short.replacen(ANUSVARA, nasal, 1) == long)
    }
    a != b && (expands_to(a, b) || expands_to(b, a))
}

/// Comparison key for a word: punctuation stripped and lower-cased, Hindi
/// variants folded, and known equivalents mapped to their canonical token.
pub fn normalize_word(word: &str, language: Language, rules: &RuleSet) -> String {
    let folded = match language {
        Language::Hindi => fold_hindi(word),
        Language::English => word.to_string(),
    };
    let lowered = folded.to_lowercase();

    match rules.equivalences() {
        Some(map) => {
            let bare = lowered.trim_matches(SURROUNDING_QUOTES);
            if let Some(canonical) = map.get(bare) {
                return canonical.clone();
            }
            let stripped = strip_punctuation(bare);
            map.get(&stripped).cloned().unwrap_or(stripped)
        }
        None => strip_punctuation(&lowered),
    }
}

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());
static DATE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/.\-]").unwrap());
static MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec").unwrap()
});
static MONTH_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(jan(uary)?|feb(ruary)?|mar(ch)?|apr(il)?|may|june?|july?|aug(ust)?|sep(t(ember)?)?|oct(ober)?|nov(ember)?|dec(ember)?)$",
    )
    .unwrap()
});
static DAY_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\d{1,4}(st|nd|rd|th)?$").unwrap());
static SPACE_BEFORE_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\.").unwrap());

/// A digit plus either a date separator or a month name: `12/03/2020`,
/// `5-Jan`, `March5`.
pub fn looks_like_date(word: &str) -> bool {
    DIGIT.is_match(word) && (DATE_SEPARATOR.is_match(word) || MONTH.is_match(word))
}

/// A token that can be one piece of a spelled-out date: a day or year number,
/// an ordinal, or a month name.
pub fn is_date_part(word: &str) -> bool {
    let bare = word.trim_end_matches([',', '.']);
    !bare.is_empty()
        && (DAY_NUMBER.is_match(bare) || MONTH_WORD.is_match(bare) || looks_like_date(bare))
}

/// `cat`/`cats`, `box`/`boxes`, `city`/`cities`, in either direction.
pub fn is_singular_plural(a: &str, b: &str) -> bool {
    let a = strip_punctuation(&a.to_lowercase());
    let b = strip_punctuation(&b.to_lowercase());
    if a.is_empty() || b.is_empty() || a == b {
        return false;
    }

    fn pluralizes(singular: &str, plural: &str) -> bool {
        if let Some(stem) = plural.strip_suffix("es") {
            if stem == singular {
                return true;
            }
        }
        if let Some(stem) = plural.strip_suffix('s') {
            if stem == singular {
                return true;
            }
        }
        match (singular.strip_suffix('y'), plural.strip_suffix("ies")) {
            (Some(s), Some(p)) => s == p,
            _ => false,
        }
    }

    pluralizes(&a, &b) || pluralizes(&b, &a)
}

/// `true` for each word that opens a sentence: the first word and any word
/// after one ending in `.`, `?` or `!`.
pub fn sentence_starts<S: AsRef<str>>(words: &[S]) -> Vec<bool> {
    let mut starts = Vec::with_capacity(words.len());
    let mut next_starts = true;
    for word in words {
        starts.push(next_starts);
        next_starts = word.as_ref().ends_with(['.', '?', '!']);
    }
    starts
}

pub fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

pub fn starts_lowercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_lowercase)
}

/// Whitespace-then-period occurrences the typist added beyond those already in
/// the reference.
pub fn count_space_before_full_stop(reference: &str, typed: &str) -> usize {
    let typed_count = SPACE_BEFORE_DOT.find_iter(typed).count();
    let reference_count = SPACE_BEFORE_DOT.find_iter(reference).count();
    typed_count.saturating_sub(reference_count)
}
