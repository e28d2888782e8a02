use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
};

use stenoscore::report::ResultSheet;

pub fn verdict_style(passed: bool) -> Style {
    let color = if passed { Color::Green } else { Color::Red };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn sheet_table(sheet: &ResultSheet) -> Table<'static> {
    let label_style = Style::default().add_modifier(Modifier::BOLD);

    let mut rows: Vec<Row> = sheet
        .rows
        .iter()
        .map(|(label, value)| {
            Row::new(vec![
                Cell::from(*label).style(label_style),
                Cell::from(value.clone()),
            ])
        })
        .collect();

    rows.push(Row::new(vec![
        Cell::from("Final Result").style(label_style),
        Cell::from(sheet.verdict()).style(verdict_style(sheet.passed)),
    ]));
    rows.push(Row::new(vec![
        Cell::from("Expected").style(label_style),
        Cell::from(sheet.expected_speed.clone()).style(Style::default().fg(Color::Gray)),
    ]));

    Table::new(rows, [Constraint::Length(16), Constraint::Min(10)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", sheet.title)),
        )
        .column_spacing(1)
}
