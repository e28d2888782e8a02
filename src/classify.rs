//! Buckets every discrepancy of an alignment into full, half or ignored.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    align::WordOp,
    language::Language,
    rules::{self, RuleSet},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Full,
    Half,
    Ignored,
}

impl Classification {
    pub fn weight(&self) -> f64 {
        match self {
            Classification::Full => 1.0,
            Classification::Half => 0.5,
            Classification::Ignored => 0.0,
        }
    }
}

/// Which rule decided a classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MistakeReason {
    ExtraWord,
    MissingWord,
    WrongWord,
    Capitalization,
    SentenceStartCase,
    SingularPlural,
    Equivalent,
    DateStyle,
    MissingSpace,
    SpaceBeforeFullStop,
}

impl MistakeReason {
    pub fn describe(&self) -> &'static str {
        match self {
            MistakeReason::ExtraWord => "Extra word",
            MistakeReason::MissingWord => "Missing word",
            MistakeReason::WrongWord => "Wrong word",
            MistakeReason::Capitalization => "Capitalization",
            MistakeReason::SentenceStartCase => "Lowercase at sentence start",
            MistakeReason::SingularPlural => "Singular/plural",
            MistakeReason::Equivalent => "Permitted variant",
            MistakeReason::DateStyle => "Date written differently",
            MistakeReason::MissingSpace => "Missing space between words",
            MistakeReason::SpaceBeforeFullStop => "Space before full stop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeDetail {
    pub classification: Classification,
    pub reason: MistakeReason,
    pub reference: Option<String>,
    pub typed: Option<String>,
    pub reference_index: Option<usize>,
}

/// Totals over one alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeTally {
    pub full: usize,
    pub half: usize,
    pub ignored: usize,
    /// Already included in `full`.
    pub space_before_full_stop: usize,
    pub details: Vec<MistakeDetail>,
}

impl MistakeTally {
    pub fn weighted(&self) -> f64 {
        self.full as f64 + 0.5 * self.half as f64
    }

    fn record(&mut self, detail: MistakeDetail) {
        match detail.classification {
            Classification::Full => self.full += 1,
            Classification::Half => self.half += 1,
            Classification::Ignored => self.ignored += 1,
        }
        self.details.push(detail);
    }

    /// Count of details per reason, in first-seen order.
    pub fn by_reason(&self) -> Vec<(MistakeReason, Classification, usize)> {
        let mut rows: Vec<(MistakeReason, Classification, usize)> = Vec::new();
        for detail in &self.details {
            match rows
                .iter_mut()
                .find(|(reason, class, _)| *reason == detail.reason && *class == detail.classification)
            {
                Some(row) => row.2 += 1,
                None => rows.push((detail.reason, detail.classification, 1)),
            }
        }
        rows
    }
}

/// Classification context for one reference passage.
pub struct Classifier<'a> {
    language: Language,
    rules: &'a RuleSet,
    sentence_starts: Vec<bool>,
}

impl<'a> Classifier<'a> {
    pub fn new<S: AsRef<str>>(language: Language, rules: &'a RuleSet, reference_words: &[S]) -> Self {
        Self {
            language,
            rules,
            sentence_starts: rules::sentence_starts(reference_words),
        }
    }

    fn is_sentence_start(&self, index: usize) -> bool {
        self.sentence_starts.get(index).copied().unwrap_or(false)
    }

    /// Classification of a substitution. Rules are tried in a fixed order and
    /// the first that matches wins.
    pub fn classify_substitution(
        &self,
        reference: &str,
        typed: &str,
        reference_index: usize,
    ) -> (Classification, MistakeReason) {
        if self.rules.date_tolerance()
            && rules::looks_like_date(reference)
            && rules::looks_like_date(typed)
        {
            return (Classification::Ignored, MistakeReason::DateStyle);
        }

        let reference_core = rules::strip_punctuation(reference);
        let typed_core = rules::strip_punctuation(typed);
        if reference_core != typed_core && reference_core.to_lowercase() == typed_core.to_lowercase() {
            if self.language.is_english()
                && self.is_sentence_start(reference_index)
                && rules::starts_uppercase(&reference_core)
                && rules::starts_lowercase(&typed_core)
            {
                return (Classification::Half, MistakeReason::SentenceStartCase);
            }
            return (Classification::Full, MistakeReason::Capitalization);
        }

        let reference_key = rules::normalize_word(reference, self.language, self.rules);
        let typed_key = rules::normalize_word(typed, self.language, self.rules);
        if reference_key == typed_key
            || (self.language == Language::Hindi
                && rules::anusvara_equivalent(&reference_key, &typed_key))
        {
            return (Classification::Ignored, MistakeReason::Equivalent);
        }

        if self.language.is_english() && rules::is_singular_plural(reference, typed) {
            return (Classification::Half, MistakeReason::SingularPlural);
        }

        (Classification::Full, MistakeReason::WrongWord)
    }

    pub fn classify(&self, op: &WordOp) -> Option<(Classification, MistakeReason)> {
        match op {
            WordOp::Equal { .. } => None,
            WordOp::Insert { .. } => Some((Classification::Full, MistakeReason::ExtraWord)),
            WordOp::Delete { .. } => Some((Classification::Full, MistakeReason::MissingWord)),
            WordOp::Substitute { merged: true, .. } => {
                Some((Classification::Full, MistakeReason::MissingSpace))
            }
            WordOp::Substitute {
                reference,
                typed,
                reference_index,
                ..
            } => Some(self.classify_substitution(reference, typed, *reference_index)),
        }
    }

    /// Op positions covered by a date typed in another style that spans a
    /// different number of words, e.g. `12 March 2020` typed as `12/03/2020`:
    /// a substitution followed by deletions whose reference words are all
    /// date parts and, joined, read as a date.
    fn date_runs(&self, ops: &[WordOp]) -> HashSet<usize> {
        let mut covered = HashSet::new();
        if !self.rules.date_tolerance() {
            return covered;
        }

        for (start, op) in ops.iter().enumerate() {
            let WordOp::Substitute {
                reference,
                typed,
                merged: false,
                ..
            } = op
            else {
                continue;
            };
            if !rules::looks_like_date(typed) || !rules::is_date_part(reference) {
                continue;
            }

            let mut parts = vec![reference.as_str()];
            let mut end = start + 1;
            while let Some(WordOp::Delete { reference, .. }) = ops.get(end) {
                if !rules::is_date_part(reference) {
                    break;
                }
                parts.push(reference);
                end += 1;
            }

            if end > start + 1 && rules::looks_like_date(&parts.join(" ")) {
                covered.extend(start..end);
            }
        }
        covered
    }

    pub fn tally(&self, ops: &[WordOp], reference_text: &str, typed_text: &str) -> MistakeTally {
        let mut tally = MistakeTally::default();
        let date_runs = self.date_runs(ops);

        for (position, op) in ops.iter().enumerate() {
            let verdict = if date_runs.contains(&position) {
                Some((Classification::Ignored, MistakeReason::DateStyle))
            } else {
                self.classify(op)
            };
            let Some((classification, reason)) = verdict else {
                continue;
            };
            tally.record(MistakeDetail {
                classification,
                reason,
                reference: op.reference_text().map(str::to_string),
                typed: op.typed_text().map(str::to_string),
                reference_index: op.reference_indices().next(),
            });
        }

        if self.rules.space_before_full_stop() {
            let extra = rules::count_space_before_full_stop(reference_text, typed_text);
            for _ in 0..extra {
                tally.record(MistakeDetail {
                    classification: Classification::Full,
                    reason: MistakeReason::SpaceBeforeFullStop,
                    reference: None,
                    typed: Some(" .".to_string()),
                    reference_index: None,
                });
            }
            tally.space_before_full_stop = extra;
        }

        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{align, rules::ExamRule};
    use assert_matches::assert_matches;

    fn sub(reference: &str, typed: &str, index: usize) -> WordOp {
        WordOp::Substitute {
            reference: reference.into(),
            typed: typed.into(),
            reference_index: index,
            typed_index: index,
            merged: false,
        }
    }

    fn with_rules(rules: &[ExamRule]) -> RuleSet {
        RuleSet::from_rules(rules)
    }

    #[test]
    fn test_insert_and_delete_are_full() {
        let set = RuleSet::generic();
        let c = Classifier::new(Language::English, &set, &["a"]);
        let ins = WordOp::Insert {
            typed: "x".into(),
            typed_index: 0,
        };
        let del = WordOp::Delete {
            reference: "a".into(),
            reference_index: 0,
        };
        assert_eq!(c.classify(&ins), Some((Classification::Full, MistakeReason::ExtraWord)));
        assert_eq!(c.classify(&del), Some((Classification::Full, MistakeReason::MissingWord)));
    }

    #[test]
    fn test_equal_is_unclassified() {
        let set = RuleSet::generic();
        let c = Classifier::new(Language::English, &set, &["a"]);
        let eq = WordOp::Equal {
            reference: "a".into(),
            typed: "a".into(),
            reference_index: 0,
            typed_index: 0,
        };
        assert_eq!(c.classify(&eq), None);
    }

    #[test]
    fn test_sentence_start_lowercase_is_half() {
        let set = RuleSet::generic();
        let words = ["The", "end.", "Then", "more"];
        let c = Classifier::new(Language::English, &set, &words);
        assert_eq!(
            c.classify_substitution("The", "the", 0),
            (Classification::Half, MistakeReason::SentenceStartCase)
        );
        assert_eq!(
            c.classify_substitution("Then", "then", 2),
            (Classification::Half, MistakeReason::SentenceStartCase)
        );
    }

    #[test]
    fn test_case_mismatch_mid_sentence_is_full() {
        let set = RuleSet::generic();
        let words = ["visit", "Delhi", "today"];
        let c = Classifier::new(Language::English, &set, &words);
        assert_eq!(
            c.classify_substitution("Delhi", "delhi", 1),
            (Classification::Full, MistakeReason::Capitalization)
        );
        // capital typed where the reference opens lowercase is not tolerated
        let c = Classifier::new(Language::English, &set, &["the"]);
        assert_eq!(
            c.classify_substitution("the", "The", 0),
            (Classification::Full, MistakeReason::Capitalization)
        );
    }

    #[test]
    fn test_punctuation_only_difference_is_ignored() {
        let set = RuleSet::generic();
        let c = Classifier::new(Language::English, &set, &["hello,", "world"]);
        assert_eq!(
            c.classify_substitution("hello,", "hello", 0),
            (Classification::Ignored, MistakeReason::Equivalent)
        );
    }

    #[test]
    fn test_singular_plural_is_half_in_english_only() {
        let set = RuleSet::generic();
        let c = Classifier::new(Language::English, &set, &["Cats"]);
        assert_eq!(
            c.classify_substitution("Cats", "Cat", 0),
            (Classification::Half, MistakeReason::SingularPlural)
        );
        let c = Classifier::new(Language::Hindi, &set, &["Cats"]);
        assert_eq!(
            c.classify_substitution("Cats", "Cat", 0),
            (Classification::Full, MistakeReason::WrongWord)
        );
    }

    #[test]
    fn test_date_tolerance_is_profile_gated() {
        let generic = RuleSet::generic();
        let c = Classifier::new(Language::English, &generic, &["12/03/2020"]);
        assert_eq!(c.classify_substitution("12/03/2020", "12-3-2020", 0).0, Classification::Full);

        let dated = with_rules(&[ExamRule::DateTolerance]);
        let c = Classifier::new(Language::English, &dated, &["12/03/2020"]);
        assert_eq!(
            c.classify_substitution("12/03/2020", "12-3-2020", 0),
            (Classification::Ignored, MistakeReason::DateStyle)
        );
    }

    #[test]
    fn test_date_run_covers_following_deletes() {
        let dated = with_rules(&[ExamRule::DateTolerance]);
        let reference = ["on", "12", "March", "2020", "we"];
        let typed = ["on", "12/03/2020", "we"];
        let ops = align::align(&reference, &typed);
        let c = Classifier::new(Language::English, &dated, &reference);
        let tally = c.tally(&ops, &reference.join(" "), &typed.join(" "));
        assert_eq!(tally.full, 0);
        assert_eq!(tally.ignored, 3);
        assert!(tally.details.iter().all(|d| d.reason == MistakeReason::DateStyle));
    }

    #[test]
    fn test_date_run_needs_the_rule() {
        let generic = RuleSet::generic();
        let reference = ["on", "12", "March", "2020", "we"];
        let typed = ["on", "12/03/2020", "we"];
        let ops = align::align(&reference, &typed);
        let c = Classifier::new(Language::English, &generic, &reference);
        let tally = c.tally(&ops, &reference.join(" "), &typed.join(" "));
        assert_eq!(tally.full, 3);
    }

    #[test]
    fn test_hindi_variants_ignored() {
        let set = RuleSet::generic();
        let c = Classifier::new(Language::Hindi, &set, &["हँसना"]);
        assert_eq!(c.classify_substitution("हँसना", "हंसना", 0).0, Classification::Ignored);
        assert_eq!(c.classify_substitution("संत", "सन्त", 0).0, Classification::Ignored);
        assert_eq!(c.classify_substitution("जगत्", "जगत", 0).0, Classification::Ignored);
        assert_eq!(c.classify_substitution("राम", "श्याम", 0).0, Classification::Full);
    }

    #[test]
    fn test_merged_op_is_single_full() {
        let set = RuleSet::generic();
        let c = Classifier::new(Language::English, &set, &["New", "York"]);
        let op = WordOp::Substitute {
            reference: "New York".into(),
            typed: "Newyork".into(),
            reference_index: 0,
            typed_index: 0,
            merged: true,
        };
        assert_eq!(c.classify(&op), Some((Classification::Full, MistakeReason::MissingSpace)));
    }

    #[test]
    fn test_space_before_full_stop_adds_full() {
        let set = with_rules(&[ExamRule::SpaceBeforeFullStop]);
        let reference = "It ends here.";
        let typed = "It ends here .";
        let ops = align::align(&["It", "ends", "here."], &["It", "ends", "here", "."]);
        let c = Classifier::new(Language::English, &set, &["It", "ends", "here."]);
        let tally = c.tally(&ops, reference, typed);
        assert_eq!(tally.space_before_full_stop, 1);
        assert!(tally.full >= 1);
        assert_matches!(
            tally.details.last(),
            Some(MistakeDetail { reason: MistakeReason::SpaceBeforeFullStop, .. })
        );
    }

    #[test]
    fn test_weighted_and_breakdown() {
        let set = RuleSet::generic();
        let words = ["Cats", "run", "fast"];
        let c = Classifier::new(Language::English, &set, &words);
        let ops = vec![
            sub("Cats", "Cat", 0),
            sub("run", "walk", 1),
            sub("fast", "slow", 2),
        ];
        let tally = c.tally(&ops, "Cats run fast", "Cat walk slow");
        assert_eq!(tally.full, 2);
        assert_eq!(tally.half, 1);
        assert!((tally.weighted() - 2.5).abs() < 1e-9);
        assert_eq!(
            tally.by_reason(),
            vec![
                (MistakeReason::SingularPlural, Classification::Half, 1),
                (MistakeReason::WrongWord, Classification::Full, 2),
            ]
        );
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(MistakeReason::SpaceBeforeFullStop.to_string(), "space_before_full_stop");
        assert_eq!(Classification::Half.to_string(), "Half");
    }
}
