use std::time::Duration;

use tracing::{debug, info};

use crate::{
    engine::{Engine, ScoringResult},
    session::{FinishReason, SessionConfig, SessionState},
    time_series::SpeedSample,
    tokenize, typing_policy,
};

/// One transcription attempt against a reference passage.
///
/// Time only advances through [`Practice::on_tick`], so a session can be
/// driven deterministically without a terminal.
#[derive(Debug, Clone)]
pub struct Practice {
    pub reference: String,
    pub typed: String,
    pub config: SessionConfig,
    pub state: SessionState,
    reference_graphemes: usize,
    live: Option<ScoringResult>,
    result: Option<ScoringResult>,
}

impl Practice {
    pub fn new(reference: String, config: SessionConfig) -> Self {
        let reference_graphemes = tokenize::grapheme_count(&tokenize::nfc(&reference));
        Self {
            reference,
            typed: String::new(),
            config,
            state: SessionState::default(),
            reference_graphemes,
            live: None,
            result: None,
        }
    }

    pub fn start(&mut self) {
        debug!("practice started");
        self.state.started = true;
    }

    pub fn has_started(&self) -> bool {
        self.state.started
    }

    pub fn has_finished(&self) -> bool {
        self.state.finished.is_some()
    }

    pub fn is_time_up(&self) -> bool {
        self.seconds_remaining().is_some_and(|s| s <= 0.0)
    }

    /// The typed text is at least as long as the passage, in graphemes.
    pub fn is_lesson_complete(&self) -> bool {
        self.reference_graphemes > 0
            && tokenize::grapheme_count(&tokenize::nfc(&self.typed)) >= self.reference_graphemes
    }

    pub fn seconds_remaining(&self) -> Option<f64> {
        self.config
            .time_limit_secs
            .map(|limit| (limit - self.state.elapsed_secs).max(0.0))
    }

    pub fn toggle_pause(&mut self) {
        if self.state.started && !self.has_finished() {
            self.state.paused = !self.state.paused;
            debug!(paused = self.state.paused, "pause toggled");
        }
    }

    pub fn write(&mut self, engine: &Engine, c: char) {
        if typing_policy::apply_write(self, c) && self.is_lesson_complete() {
            self.finish(engine, FinishReason::Completed);
        }
    }

    pub fn backspace(&mut self) -> bool {
        typing_policy::apply_backspace(self)
    }

    pub fn delete_word(&mut self) -> bool {
        typing_policy::apply_delete_word(self)
    }

    /// Advances the clock. Re-evaluates once per whole elapsed second and ends
    /// the session when the limit is reached.
    pub fn on_tick(&mut self, engine: &Engine, delta: Duration) {
        if !self.state.started || self.state.paused || self.has_finished() {
            return;
        }
        self.state.elapsed_secs += delta.as_secs_f64();
        if let Some(limit) = self.config.time_limit_secs {
            self.state.elapsed_secs = self.state.elapsed_secs.min(limit);
        }

        let whole = self.state.elapsed_secs.floor() as u64;
        if whole > self.state.last_sampled_sec {
            self.state.last_sampled_sec = whole;
            let live = self.evaluate(engine);
            self.state
                .samples
                .push(SpeedSample::new(whole as f64, live.gross_wpm, live.net_wpm));
            self.live = Some(live);
        }

        if self.is_time_up() {
            self.finish(engine, FinishReason::TimeUp);
        }
    }

    /// Stops the session on demand.
    pub fn check(&mut self, engine: &Engine) {
        if !self.has_finished() {
            self.finish(engine, FinishReason::Checked);
        }
    }

    fn finish(&mut self, engine: &Engine, reason: FinishReason) {
        let result = self.evaluate(engine);
        info!(
            %reason,
            elapsed = self.state.elapsed_secs,
            net_wpm = result.net_wpm,
            passed = result.passed,
            "practice finished"
        );
        self.state.paused = false;
        self.state.finished = Some(reason);
        self.result = Some(result);
    }

    pub fn evaluate(&self, engine: &Engine) -> ScoringResult {
        engine.evaluate(
            &self.reference,
            &self.typed,
            self.state.elapsed_secs,
            self.config.language,
            &self.config.options,
        )
    }

    /// Most recent once-a-second evaluation.
    pub fn live(&self) -> Option<&ScoringResult> {
        self.live.as_ref()
    }

    /// Final evaluation, once the session has finished.
    pub fn result(&self) -> Option<&ScoringResult> {
        self.result.as_ref()
    }

    pub fn net_wpm_series(&self) -> Vec<(f64, f64)> {
        self.state.samples.iter().map(SpeedSample::net_point).collect()
    }
}
