use std::sync::OnceLock;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use regex::Regex;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::types::Issue;

use super::{format_age, kind_color, pad_width, truncate_width};

const TAG_COL: usize = 20;
const AUTHOR_COL: usize = 12;
const PREVIEW_CHARS: usize = 120;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let shown = app.visible.len();
    let total = app.session.issues.len();
    let title = if app.session.has_more {
        format!(" Issues ({}/{}) ", shown, total)
    } else {
        format!(" Issues ({}/{}) · all loaded ", shown, total)
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if total == 0 {
        let (text, color) = if app.loading {
            ("Loading issues...", Color::Gray)
        } else if app.error.is_some() {
            ("The listing could not be loaded. Press r to retry.", Color::Red)
        } else {
            ("Nothing loaded yet. Press r to fetch.", Color::Gray)
        };
        let empty = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(color));
        frame.render_widget(empty, area);
        return;
    }

    if shown == 0 {
        let empty = Paragraph::new("No issues match the current filters")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    // 6 (number) + 1 + 20 (tags) + 1 + 1 + 12 (author) + 1 + 4 (comments) + 1 + 4 (age)
    let fixed = 6 + 1 + TAG_COL + 1 + 1 + AUTHOR_COL + 1 + 4 + 1 + 4;
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = app
        .visible
        .iter()
        .enumerate()
        .map(|(i, &index)| {
            let issue = &app.session.issues[index];
            let title_style = if i == app.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let number_color = issue
                .classification
                .primary()
                .map(kind_color)
                .unwrap_or(Color::Cyan);

            let mut spans = vec![
                Span::styled(
                    format!("#{:<5}", issue.number),
                    Style::default().fg(number_color),
                ),
                Span::raw(" "),
            ];
            spans.extend(tag_spans(issue));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                pad_width(&truncate_width(&issue.title, flex), flex),
                title_style,
            ));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                pad_width(
                    &format!("@{}", truncate_width(&issue.author.login, AUTHOR_COL - 1)),
                    AUTHOR_COL,
                ),
                Style::default().fg(Color::Gray),
            ));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("{:>4}", issue.comments),
                Style::default().fg(Color::DarkGray),
            ));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("{:>4}", format_age(issue.created_at)),
                Style::default().fg(Color::DarkGray),
            ));

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Classification badges plus labels, cut to a fixed column.
fn tag_spans(issue: &Issue) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut used = 0;
    for kind in issue.classification.kinds() {
        let text = format!("[{}]", kind.badge());
        let w = UnicodeWidthStr::width(text.as_str());
        if used + w > TAG_COL {
            break;
        }
        spans.push(Span::styled(text, Style::default().fg(kind_color(kind))));
        used += w;
    }
    for label in &issue.labels {
        let text = format!("[{}]", label.name);
        let w = UnicodeWidthStr::width(text.as_str());
        if used + w > TAG_COL {
            break;
        }
        spans.push(Span::styled(text, Style::default().fg(Color::Magenta)));
        used += w;
    }
    if used < TAG_COL {
        spans.push(Span::raw(" ".repeat(TAG_COL - used)));
    }
    spans
}

pub fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Preview ");
    let Some(issue) = app.selected_issue() else {
        frame.render_widget(block, area);
        return;
    };

    let width = area.width.saturating_sub(2) as usize;
    let lines = vec![
        Line::from(Span::styled(
            truncate_width(&issue.title, width),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            body_preview(&issue.body),
            Style::default().fg(Color::Gray),
        )),
    ];
    let preview = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(preview, area);
}

/// Flatten markdown into one plain-text line, capped for the preview
/// pane.
fn body_preview(body: &str) -> String {
    let mut text = body.to_string();
    for (pattern, replacement) in markdown_rules() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push('…');
    }
    preview
}

/// Fenced blocks go first so the inline-code rule cannot chew on the
/// fences.
fn markdown_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"(?s)```.*?```", ""),
            (r"!\[[^\]]*\]\([^)]*\)", ""),
            (r"\[([^\]]+)\]\(([^)]*)\)", "$1"),
            (r"(?m)^#+[ \t]+", ""),
            (r"\*\*([^*]*)\*\*", "$1"),
            (r"\*([^*]*)\*", "$1"),
            (r"`([^`]*)`", "$1"),
        ]
        .iter()
        .filter_map(|(pattern, replacement)| {
            Regex::new(pattern).ok().map(|re| (re, *replacement))
        })
        .collect()
    })
}
