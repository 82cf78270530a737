use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.input_mode == InputMode::Search;

    let label_style = if active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![Span::styled("search ", label_style)];

    if app.filters.query.is_empty() && active {
        spans.push(Span::styled(
            "type to filter by title or body",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(app.filters.query.clone()));
    }
    if active {
        spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    }
    if !app.filters.query.is_empty() {
        spans.push(Span::styled(
            format!("  {} matches", app.visible.len()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
