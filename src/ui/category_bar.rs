use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::categories;
use crate::classify::Kind;

use super::kind_color;

/// One-line category strip. The window slides forward until the active
/// tab fits, with ‹ › hints when tabs are cut off on either side.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.category_order.is_empty() || area.width == 0 {
        return;
    }

    let labels: Vec<String> = app
        .category_order
        .iter()
        .map(|(name, count)| format!(" {} {} ", name, count))
        .collect();
    let widths: Vec<usize> = labels
        .iter()
        .map(|label| UnicodeWidthStr::width(label.as_str()))
        .collect();

    let active = app
        .category_order
        .iter()
        .position(|(name, _)| *name == app.filters.category)
        .unwrap_or(0);

    let budget = area.width as usize;
    let mut start = 0;
    while start < active && widths[start..=active].iter().sum::<usize>() + 2 > budget {
        start += 1;
    }

    let mut spans: Vec<Span> = Vec::new();
    let mut used = 0;
    if start > 0 {
        spans.push(Span::styled("‹", Style::default().fg(Color::DarkGray)));
        used += 1;
    }
    for (i, label) in labels.iter().enumerate().skip(start) {
        if i > start && used + widths[i] > budget.saturating_sub(1) {
            spans.push(Span::styled("›", Style::default().fg(Color::DarkGray)));
            break;
        }
        spans.push(tab_span(label.clone(), &app.category_order[i].0, i == active));
        used += widths[i];
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn tab_span(label: String, name: &str, active: bool) -> Span<'static> {
    let tint = category_color(name);
    let style = if active {
        Style::default()
            .fg(Color::Black)
            .bg(tint)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(tint)
    };
    Span::styled(label, style)
}

/// The built-in categories keep their fixed tints; label-derived ones
/// are all gray.
fn category_color(name: &str) -> Color {
    match name {
        categories::ALL => Color::White,
        categories::OPEN_SOURCE => kind_color(Kind::OpenSource),
        categories::TOOL => kind_color(Kind::Tool),
        categories::WEBSITE => kind_color(Kind::Website),
        categories::ARTICLE => kind_color(Kind::Article),
        _ => Color::Gray,
    }
}
