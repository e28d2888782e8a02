use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use stenoscore::classify::{Classification, MistakeDetail};

use crate::App;

pub fn classification_style(classification: Classification) -> Style {
    match classification {
        Classification::Full => Style::default().fg(Color::Red),
        Classification::Half => Style::default().fg(Color::Yellow),
        Classification::Ignored => Style::default().fg(Color::DarkGray),
    }
}

/// One mistake as a table row: position, class, rule, expected and typed.
pub fn present_row(detail: &MistakeDetail) -> Row<'static> {
    let position = detail
        .reference_index
        .map(|i| (i + 1).to_string())
        .unwrap_or_else(|| "-".to_string());

    Row::new(vec![
        Cell::from(position),
        Cell::from(detail.classification.to_string())
            .style(classification_style(detail.classification).add_modifier(Modifier::BOLD)),
        Cell::from(detail.reason.describe()),
        Cell::from(detail.reference.clone().unwrap_or_default()),
        Cell::from(detail.typed.clone().unwrap_or_default()),
    ])
}

/// Rule-wise list of every mistake in the final result, scrollable.
pub fn render_breakdown(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    let details: Vec<MistakeDetail> = app
        .practice
        .result()
        .map(|r| r.mistakes.clone())
        .unwrap_or_default();

    let summary = app
        .sheet()
        .map(|sheet| {
            sheet
                .breakdown
                .iter()
                .map(|row| format!("{} {} x{}", row.reason.describe(), row.classification, row.count))
                .collect::<Vec<_>>()
                .join("  |  ")
        })
        .unwrap_or_default();

    let title = Paragraph::new(summary)
        .block(Block::default().borders(Borders::ALL).title(" Mistake breakdown "))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    if details.is_empty() {
        let no_data = Paragraph::new("No mistakes. Nothing to break down.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[1]);
    } else {
        let table_height = chunks[1].height.saturating_sub(3) as usize;
        let max_scroll = details.len().saturating_sub(table_height);
        if app.breakdown_scroll > max_scroll {
            app.breakdown_scroll = max_scroll;
        }

        let header = Row::new(vec![
            Cell::from("Word #"),
            Cell::from("Class"),
            Cell::from("Rule"),
            Cell::from("Expected"),
            Cell::from("Typed"),
        ])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let visible_rows: Vec<Row> = details
            .iter()
            .skip(app.breakdown_scroll)
            .take(table_height)
            .map(present_row)
            .collect();

        let widths = [
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Length(30),
            Constraint::Min(12),
            Constraint::Min(12),
        ];

        let table = Table::new(visible_rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} mistakes ", details.len())),
            )
            .column_spacing(2);
        f.render_widget(table, chunks[1]);
    }

    let instructions = Paragraph::new("(↑/↓) scroll  (PgUp/PgDn) page  (Home) top  (b/backspace) back  (r) retry  (esc) quit")
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(instructions, chunks[2]);
}
