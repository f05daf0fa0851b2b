use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge},
};

/// Bordered block with a padded title
pub fn titled_block<'a, T: Into<Line<'a>>>(title: T) -> Block<'a> {
    Block::default().borders(Borders::ALL).title(title)
}

/// Gauge filled to `percent` with the given bar style. The label is drawn white and
/// bold over the bar.
pub fn level_gauge<'a>(block: Block<'a>, percent: f64, label: String, bar: Style) -> Gauge<'a> {
    Gauge::default()
        .block(block)
        .gauge_style(bar.bg(Color::Black))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(Span::styled(
            label,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
}

/// Empty gauge for a probe whose backing service is missing
pub fn unsupported_gauge<'a>(block: Block<'a>) -> Gauge<'a> {
    Gauge::default().block(block).ratio(0.0).label(Span::styled(
        "UNSUPPORTED",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Style for "UNSUPPORTED" text outside gauges
pub fn unsupported_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}
