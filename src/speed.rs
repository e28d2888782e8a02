//! Speed and accuracy, computed from characters rather than the word
//! alignment.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::tokenize;

/// Which speed/accuracy formula to apply.
///
/// `Positional` compares grapheme clusters position by position and reports
/// 100 % accuracy for empty input. `WordCount` penalises whole error words
/// and reports 0 % for empty input.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ScoringMode {
    #[default]
    Positional,
    WordCount,
}

pub const CHARS_PER_WORD: f64 = 5.0;
pub const MIN_ELAPSED_SECONDS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedStats {
    pub elapsed_seconds: f64,
    pub chars_typed: usize,
    pub correct_chars: usize,
    pub error_chars: usize,
    pub accuracy_percent: f64,
    pub words_typed: usize,
    pub gross_wpm: f64,
    pub net_wpm: f64,
    /// Only the word-count formula counts error words.
    pub error_words: Option<usize>,
}

/// Floors elapsed time at one second. Non-finite input is treated as zero.
pub fn clamp_elapsed(elapsed_seconds: f64) -> f64 {
    if elapsed_seconds.is_finite() {
        elapsed_seconds.max(MIN_ELAPSED_SECONDS)
    } else {
        MIN_ELAPSED_SECONDS
    }
}

fn percent(part: usize, whole: usize, empty: f64) -> f64 {
    if whole == 0 {
        empty
    } else {
        (part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// Positional comparison: grapheme `i` of the typed text is correct when it
/// equals grapheme `i` of the reference.
pub fn positional(reference: &str, typed: &str, elapsed_seconds: f64) -> SpeedStats {
    let elapsed = clamp_elapsed(elapsed_seconds);
    let minutes = elapsed / 60.0;

    let reference_graphemes = tokenize::segment_graphemes(reference);
    let typed_graphemes = tokenize::segment_graphemes(typed);

    let chars_typed = typed_graphemes.len();
    let correct_chars = reference_graphemes
        .iter()
        .zip(&typed_graphemes)
        .filter(|(r, t)| r == t)
        .count();
    let error_chars = chars_typed.saturating_sub(correct_chars);

    let gross_wpm = chars_typed as f64 / CHARS_PER_WORD / minutes;
    let net_wpm = (chars_typed - error_chars) as f64 / CHARS_PER_WORD / minutes;

    SpeedStats {
        elapsed_seconds: elapsed,
        chars_typed,
        correct_chars,
        error_chars,
        accuracy_percent: percent(correct_chars, chars_typed, 100.0),
        words_typed: tokenize::word_count(typed),
        gross_wpm,
        net_wpm,
        error_words: None,
    }
}

/// Word positions that differ, plus one per extra or missing word.
pub fn count_error_words<R: AsRef<str>, T: AsRef<str>>(reference: &[R], typed: &[T]) -> usize {
    let mismatched = reference
        .iter()
        .zip(typed)
        .filter(|(r, t)| r.as_ref() != t.as_ref())
        .count();
    mismatched + reference.len().abs_diff(typed.len())
}

/// Word-count formula: every error word costs one word per minute of net
/// speed.
pub fn word_count(reference: &str, typed: &str, elapsed_seconds: f64) -> SpeedStats {
    let elapsed = clamp_elapsed(elapsed_seconds);
    let minutes = elapsed / 60.0;

    let reference_words = tokenize::words(reference);
    let typed_words = tokenize::words(typed);
    let error_words = count_error_words(&reference_words, &typed_words);

    let chars_typed = tokenize::grapheme_count(typed);
    let gross_wpm = chars_typed as f64 / CHARS_PER_WORD / minutes;
    let net_wpm = (gross_wpm - error_words as f64 / minutes).max(0.0);

    // gross_wpm * minutes * 5 is chars_typed again, so this stays exact
    let correct_chars = chars_typed
        .saturating_sub(error_words.saturating_mul(CHARS_PER_WORD as usize))
        .min(chars_typed);
    let error_chars = chars_typed - correct_chars;

    SpeedStats {
        elapsed_seconds: elapsed,
        chars_typed,
        correct_chars,
        error_chars,
        accuracy_percent: percent(correct_chars, chars_typed, 0.0),
        words_typed: typed_words.len(),
        gross_wpm,
        net_wpm,
        error_words: Some(error_words),
    }
}

pub fn compute(mode: ScoringMode, reference: &str, typed: &str, elapsed_seconds: f64) -> SpeedStats {
    match mode {
        ScoringMode::Positional => positional(reference, typed, elapsed_seconds),
        ScoringMode::WordCount => word_count(reference, typed, elapsed_seconds),
    }
}
