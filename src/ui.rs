pub mod breakdown;
pub mod charting;
pub mod diff;
pub mod result_sheet;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use stenoscore::{tokenize, util::format_mmss};

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

pub fn draw(app: &mut App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results | AppState::Breakdown => render_results(self, area, buf),
        }
    }
}

/// Index of the reference word the typist is on.
fn current_word_index(typed: &str) -> usize {
    let count = tokenize::word_count(typed);
    if typed.is_empty() || typed.ends_with(char::is_whitespace) {
        count
    } else {
        count.saturating_sub(1)
    }
}

fn status_line(app: &App) -> Line<'static> {
    let practice = &app.practice;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let clock = match practice.seconds_remaining() {
        Some(remaining) => format!("{} left", format_mmss(remaining.ceil() as u64)),
        None => format_mmss(practice.state.elapsed_secs as u64),
    };
    let (gross, net, accuracy) = practice
        .live()
        .map(|r| (r.gross_wpm, r.net_wpm, r.accuracy_percent))
        .unwrap_or((0.0, 0.0, 100.0));

    let mut spans = vec![
        Span::styled(app.test_name(), bold_style),
        Span::styled("  |  ", dim_style),
        Span::styled(clock, bold_style),
        Span::styled("  |  ", dim_style),
        Span::raw(format!("{gross:.0} gross / {net:.0} net wpm  {accuracy:.0}% acc")),
        Span::styled("  |  ", dim_style),
        Span::raw(format!(
            "keys {}  bksp {}",
            practice.state.keystrokes, practice.state.backspaces
        )),
    ];
    if practice.state.paused {
        spans.push(Span::styled(
            "  PAUSED",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ));
    }
    Line::from(spans)
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let practice = &app.practice;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let current_style = Style::default()
        .patch(bold_style)
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let typed_box_height = (area.height / 3).max(3);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(typed_box_height),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(status_line(app))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let current = current_word_index(&practice.typed);
    let mut spans = Vec::new();
    for (i, word) in tokenize::words(&practice.reference).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = match i.cmp(&current) {
            std::cmp::Ordering::Less => dim_style,
            std::cmp::Ordering::Equal => current_style,
            std::cmp::Ordering::Greater => bold_style,
        };
        spans.push(Span::styled(word.to_string(), style));
    }
    Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", app.passage_title)),
        )
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    // keep the tail of the transcript in view
    let inner_width = chunks[3].width.saturating_sub(2).max(1) as usize;
    let inner_height = chunks[3].height.saturating_sub(2) as usize;
    let typed_lines = practice.typed.width() / inner_width + 1;
    let scroll = typed_lines.saturating_sub(inner_height) as u16;
    let transcript = format!("{}\u{258F}", practice.typed);
    Paragraph::new(transcript)
        .block(Block::default().borders(Borders::ALL).title(" Transcript "))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .render(chunks[3], buf);

    let mut legend = String::from("(ctrl-p) pause / (ctrl-d) check / (esc) quit");
    if !practice.config.allow_backspace {
        legend.push_str("   backspace blocked");
    }
    Paragraph::new(Span::styled(legend, italic_style)).render(chunks[4], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let Some(result) = app.practice.result() else {
        Paragraph::new("No result yet")
            .alignment(Alignment::Center)
            .render(area, buf);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(16),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[0]);

    if let Some(sheet) = app.sheet() {
        result_sheet::sheet_table(&sheet).render(top[0], buf);
    }
    charting::render_speed_chart(
        &app.practice.state.samples,
        app.practice.config.time_limit_secs,
        top[1],
        buf,
    );

    Paragraph::new(diff::diff_line(&result.operations))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Error highlighting "),
        )
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

    let legend = if app.has_library() {
        "(r)etry / (n)ew passage / (b)reakdown / (esc)ape"
    } else {
        "(r)etry / (b)reakdown / (esc)ape"
    };
    Paragraph::new(Span::styled(legend, italic_style)).render(chunks[2], buf);
}
