mod category_bar;
mod issue_detail;
mod issue_list;
mod popup;
mod search;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, InputMode, Popup, Screen};
use crate::classify::Kind;
use crate::types::SortKey;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.screen {
        Screen::List => render_list_screen(frame, app, chunks[1]),
        Screen::Detail => issue_detail::render(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    match app.popup {
        Some(Popup::Sort { selected }) => {
            let items: Vec<String> = SortKey::ALL
                .iter()
                .map(|key| key.label().to_string())
                .collect();
            popup::render_select(frame, "Sort", &items, selected);
        }
        Some(Popup::Category { selected }) => {
            let items: Vec<String> = app
                .category_order
                .iter()
                .map(|(name, count)| format!("{} ({})", name, count))
                .collect();
            popup::render_select(frame, "Category", &items, selected);
        }
        None => {}
    }
}

fn render_list_screen(frame: &mut Frame, app: &App, area: Rect) {
    let search_visible = app.input_mode == InputMode::Search || !app.filters.query.is_empty();

    let mut constraints = vec![Constraint::Length(1)];
    if search_visible {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(5));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    category_bar::render(frame, app, chunks[0]);
    let mut next = 1;
    if search_visible {
        search::render(frame, app, chunks[next]);
        next += 1;
    }
    issue_list::render(frame, app, chunks[next]);
    issue_list::render_preview(frame, app, chunks[next + 1]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "toudi",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" - {}", app.repo)),
        Span::styled(
            format!(
                "  {} loaded, {} shown",
                app.session.issues.len(),
                app.visible.len()
            ),
            Style::default().fg(Color::Gray),
        ),
    ];
    if let Some(remaining) = app.rate_remaining {
        spans.push(Span::styled(
            format!("  api {}", remaining),
            Style::default().fg(Color::Gray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.clone(),
            Style::default().fg(Color::Cyan),
        )])
    } else if app.loading {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else if app.loading_more {
        Line::from(vec![Span::styled(
            "Loading more...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = if app.popup.is_some() {
            "j/k: nav | Enter: select | Esc: close"
        } else if app.screen == Screen::List && app.input_mode == InputMode::Search {
            "type to filter | Enter: keep | Esc: clear"
        } else {
            match app.screen {
                Screen::List => {
                    "j/k/g/G: nav | Enter: open | /: search | h/l: category | s: sort | c: categories | n: more | r: reload | o/O: browser | y: copy | q: quit"
                }
                Screen::Detail => "j/k/g/G: scroll | Ctrl+d/u: page | o: browser | y: copy | q: back",
            }
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

/// Tint for a title-derived category.
fn kind_color(kind: Kind) -> Color {
    match kind {
        Kind::OpenSource => Color::Blue,
        Kind::Tool => Color::Green,
        Kind::Website => Color::Magenta,
        Kind::Article => Color::Yellow,
    }
}

/// Truncate to a display width, appending … when something was cut. Safe
/// for double-width characters, which byte or char slicing is not.
fn truncate_width(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    let budget = max.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Pad with spaces up to a display width. format! pads by char count,
/// which drifts as soon as double-width characters appear.
fn pad_width(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    let mut out = s.to_string();
    for _ in used..width {
        out.push(' ');
    }
    out
}

fn format_age(dt: chrono::DateTime<chrono::Utc>) -> String {
    let duration = chrono::Utc::now().signed_duration_since(dt);

    if duration.num_days() > 0 {
        format!("{}d", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m", duration.num_minutes())
    } else {
        "now".to_string()
    }
}
