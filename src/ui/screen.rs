use ratatui::Frame;

use crate::{ui::breakdown::render_breakdown, App, AppState};

/// A UI Screen boundary: responsible for rendering the current state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Passage and live transcript, rendered by the App widget
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Result sheet, chart and diff, rendered by the App widget
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

pub struct BreakdownScreen;

impl Screen for BreakdownScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_breakdown(app, f);
    }
}

pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Typing => Box::new(TypingScreen),
        AppState::Results => Box::new(ResultsScreen),
        AppState::Breakdown => Box::new(BreakdownScreen),
    }
}
