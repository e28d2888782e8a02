use serde::{Deserialize, Serialize};

use crate::{engine::EvaluateOptions, language::Language, time_series::SpeedSample};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub language: Language,
    pub options: EvaluateOptions,
    /// Count-down limit; `None` counts up until the passage is finished.
    pub time_limit_secs: Option<f64>,
    pub allow_backspace: bool,
}

impl SessionConfig {
    pub fn new(language: Language, options: EvaluateOptions) -> Self {
        // exams do not allow corrections unless asked for
        let allow_backspace = options.exam_profile.is_none();
        Self {
            language,
            options,
            time_limit_secs: None,
            allow_backspace,
        }
    }

    pub fn time_limit_minutes(mut self, minutes: Option<u32>) -> Self {
        self.time_limit_secs = minutes.map(|m| f64::from(m) * 60.0);
        self
    }

    pub fn allow_backspace(mut self, allow: bool) -> Self {
        self.allow_backspace = allow;
        self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum FinishReason {
    #[strum(serialize = "time up")]
    TimeUp,
    #[strum(serialize = "completed")]
    Completed,
    #[strum(serialize = "checked")]
    Checked,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub started: bool,
    pub paused: bool,
    pub elapsed_secs: f64,
    pub keystrokes: usize,
    pub backspaces: usize,
    pub blocked_backspaces: usize,
    pub finished: Option<FinishReason>,
    pub samples: Vec<SpeedSample>,
    /// Last whole second a live evaluation ran for.
    pub last_sampled_sec: u64,
}
