use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

use stenoscore::time_series::SpeedSample;

/// X (seconds) and Y (wpm) bounds for the speed chart
pub fn compute_chart_params(samples: &[SpeedSample], time_limit_secs: Option<f64>) -> (f64, f64) {
    let highest_wpm = samples
        .iter()
        .map(|s| s.gross_wpm.max(s.net_wpm))
        .fold(0.0, f64::max);

    let overall_duration = match samples.last() {
        Some(last) => last.t,
        None => time_limit_secs.unwrap_or(1.0),
    };

    (overall_duration.max(1.0), highest_wpm.round())
}

pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

/// Gross and net speed over the session, sampled once a second.
pub fn render_speed_chart(
    samples: &[SpeedSample],
    time_limit_secs: Option<f64>,
    area: Rect,
    buf: &mut Buffer,
) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let (overall_duration, highest_wpm) = compute_chart_params(samples, time_limit_secs);

    let gross: Vec<(f64, f64)> = samples.iter().map(SpeedSample::gross_point).collect();
    let net: Vec<(f64, f64)> = samples.iter().map(SpeedSample::net_point).collect();

    let datasets = vec![
        Dataset::default()
            .name("gross")
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::DarkGray))
            .graph_type(GraphType::Line)
            .data(&gross),
        Dataset::default()
            .name("net")
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Line)
            .data(&net),
    ];

    Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(" Speed "))
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", bold_style),
                    Span::styled(format_label(overall_duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm.max(1.0)])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(format_label(highest_wpm), bold_style),
                ]),
        )
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_chart_params_empty() {
        let (x, y) = compute_chart_params(&[], Some(300.0));
        assert_eq!(x, 300.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_compute_chart_params_uses_peak() {
        let samples = [
            SpeedSample::new(1.0, 30.0, 20.0),
            SpeedSample::new(2.0, 42.4, 38.0),
            SpeedSample::new(3.0, 40.0, 39.0),
        ];
        assert_eq!(compute_chart_params(&samples, None), (3.0, 42.0));
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.2345), "1.23");
    }

    #[test]
    fn test_render_speed_chart_small_area() {
        let area = Rect::new(0, 0, 30, 10);
        let mut buffer = Buffer::empty(area);
        render_speed_chart(&[SpeedSample::new(1.0, 12.0, 10.0)], None, area, &mut buffer);
        assert_eq!(*buffer.area(), area);
    }
}
