//! Transcription scoring for steno and typing practice: word alignment,
//! exam-style mistake classification and speed, plus the session and
//! persistence pieces the terminal front-end is built from.
pub mod align;
pub mod app_dirs;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod exam;
pub mod history;
pub mod language;
pub mod passage;
pub mod practice;
pub mod report;
pub mod rules;
pub mod runtime;
pub mod session;
pub mod speed;
pub mod time_series;
pub mod tokenize;
pub mod typing_policy;
pub mod util;

pub use engine::{Engine, EvaluateOptions, ScoringResult};
pub use language::Language;
pub use speed::ScoringMode;
