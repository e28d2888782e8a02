use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use stenoscore::align::WordOp;

pub fn missing_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::ITALIC)
}

pub fn extra_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::CROSSED_OUT)
}

pub fn wrong_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

pub fn correction_style() -> Style {
    Style::default().fg(Color::Green)
}

/// Colored counterpart of the text diff: each op becomes one or two spans,
/// separated by single spaces.
pub fn diff_line(ops: &[WordOp]) -> Line<'static> {
    let mut spans = Vec::with_capacity(ops.len() * 2);
    for (i, op) in ops.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        match op {
            WordOp::Equal { typed, .. } => spans.push(Span::raw(typed.clone())),
            WordOp::Delete { reference, .. } => {
                spans.push(Span::styled(format!("[{reference}]"), missing_style()))
            }
            WordOp::Insert { typed, .. } => spans.push(Span::styled(typed.clone(), extra_style())),
            WordOp::Substitute {
                reference, typed, ..
            } => {
                spans.push(Span::styled(typed.clone(), wrong_style()));
                spans.push(Span::styled(format!("({reference})"), correction_style()));
            }
        }
    }
    Line::from(spans)
}
