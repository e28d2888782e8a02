//! The single evaluation entry point: alignment, classification and speed
//! merged into one [`ScoringResult`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    align::{self, WordOp},
    classify::{Classifier, MistakeDetail},
    error::Result,
    exam::{ExamCatalog, ExamProfile, Level},
    language::Language,
    rules::{self, RuleSet},
    speed::{self, ScoringMode},
    tokenize,
};

/// Words per side beyond which alignment input is cut off. The table is
/// `(n + 1) * (m + 1)` cells.
pub const MAX_ALIGN_WORDS: usize = 8_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateOptions {
    /// `None` or an unknown key means no exam-specific leniency.
    pub exam_profile: Option<String>,
    pub scoring_mode: ScoringMode,
}

impl EvaluateOptions {
    pub fn with_profile(key: impl Into<String>) -> Self {
        Self {
            exam_profile: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn scoring_mode(mut self, mode: ScoringMode) -> Self {
        self.scoring_mode = mode;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub elapsed_seconds: f64,
    pub chars_typed: usize,
    pub correct_chars: usize,
    pub error_chars: usize,
    pub accuracy_percent: f64,
    pub words_typed: usize,
    pub gross_wpm: f64,
    pub net_wpm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_words: Option<usize>,
    pub full_mistake_count: usize,
    pub half_mistake_count: usize,
    pub ignored_mistake_count: usize,
    pub space_before_full_stop_count: usize,
    pub weighted_mistake_score: f64,
    pub allowed_mistake_percent: u32,
    pub allowed_max: usize,
    pub passed: bool,
    pub operations: Vec<WordOp>,
    pub mistakes: Vec<MistakeDetail>,
    pub language: Language,
    pub scoring_mode: ScoringMode,
    /// Canonical key of the profile that was applied.
    pub exam_profile: Option<String>,
    pub level: Level,
    /// Alignment input was cut at [`MAX_ALIGN_WORDS`].
    pub truncated: bool,
}

/// Holds the static exam configuration; evaluations are pure over it.
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: ExamCatalog,
}

impl Engine {
    pub fn new(catalog: ExamCatalog) -> Self {
        Self { catalog }
    }

    pub fn with_builtin_profiles() -> Result<Self> {
        Ok(Self::new(ExamCatalog::builtin()?))
    }

    pub fn catalog(&self) -> &ExamCatalog {
        &self.catalog
    }

    pub fn profile(&self, key: &str) -> Option<&ExamProfile> {
        self.catalog.get(key)
    }

    /// Scores `typed` against `reference`. Never fails: empty text, a
    /// non-positive elapsed time or an unknown profile all yield a result.
    pub fn evaluate(
        &self,
        reference: &str,
        typed: &str,
        elapsed_seconds: f64,
        language: Language,
        options: &EvaluateOptions,
    ) -> ScoringResult {
        let reference = tokenize::nfc(reference);
        let typed = tokenize::nfc(typed);

        let profile = options
            .exam_profile
            .as_deref()
            .and_then(|key| self.catalog.get(key));
        let (rule_set, level) = match profile {
            Some(profile) => (profile.rule_set(), profile.level),
            None => (RuleSet::generic(), Level::default()),
        };
        let level_rule = self.catalog.level_rule(level);

        let mut reference_words = tokenize::words(&reference);
        let mut typed_words = tokenize::words(&typed);
        let truncated = reference_words.len() > MAX_ALIGN_WORDS || typed_words.len() > MAX_ALIGN_WORDS;
        if truncated {
            warn!(
                reference_words = reference_words.len(),
                typed_words = typed_words.len(),
                cap = MAX_ALIGN_WORDS,
                "alignment input capped"
            );
            reference_words.truncate(MAX_ALIGN_WORDS);
            typed_words.truncate(MAX_ALIGN_WORDS);
        }

        let mut operations = align::align(&reference_words, &typed_words);
        if rule_set.merge_no_space() {
            operations = align::merge_missing_spaces(operations, |word| {
                rules::normalize_word(word, language, &rule_set)
            });
        }

        let classifier = Classifier::new(language, &rule_set, &reference_words);
        let tally = classifier.tally(&operations, &reference, &typed);
        let speed = speed::compute(options.scoring_mode, &reference, &typed, elapsed_seconds);

        let weighted = tally.weighted();
        let allowed_max = level_rule.allowed_max(speed.words_typed);
        let passed = weighted <= allowed_max as f64;

        debug!(
            profile = profile.map(|p| p.key.as_str()).unwrap_or("-"),
            ops = operations.len(),
            full = tally.full,
            half = tally.half,
            ignored = tally.ignored,
            allowed_max,
            passed,
            "evaluated transcript"
        );

        ScoringResult {
            elapsed_seconds: speed.elapsed_seconds,
            chars_typed: speed.chars_typed,
            correct_chars: speed.correct_chars,
            error_chars: speed.error_chars,
            accuracy_percent: speed.accuracy_percent,
            words_typed: speed.words_typed,
            gross_wpm: speed.gross_wpm,
            net_wpm: speed.net_wpm,
            error_words: speed.error_words,
            full_mistake_count: tally.full,
            half_mistake_count: tally.half,
            ignored_mistake_count: tally.ignored,
            space_before_full_stop_count: tally.space_before_full_stop,
            weighted_mistake_score: weighted,
            allowed_mistake_percent: level_rule.allowed_mistake_percent,
            allowed_max,
            passed,
            operations,
            mistakes: tally.details,
            language,
            scoring_mode: options.scoring_mode,
            exam_profile: profile.map(|p| p.key.clone()),
            level,
            truncated,
        }
    }
}
