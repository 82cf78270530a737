use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::types::Issue;

use super::{format_age, kind_color};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(issue) = app.detail_issue() else {
        let block = Block::default().borders(Borders::ALL).title(" Issue ");
        let empty = Paragraph::new("No issue selected")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    render_header(frame, issue, chunks[0]);
    render_body(frame, issue, app.detail_scroll, chunks[1]);
}

fn render_header(frame: &mut Frame, issue: &Issue, area: Rect) {
    let mut tag_spans: Vec<Span> = Vec::new();
    for kind in issue.classification.kinds() {
        tag_spans.push(Span::styled(
            format!("[{}] ", kind.category_name()),
            Style::default().fg(kind_color(kind)),
        ));
    }
    for label in &issue.labels {
        tag_spans.push(Span::styled(
            format!("[{}] ", label.name),
            Style::default().fg(Color::Magenta),
        ));
    }
    if tag_spans.is_empty() {
        tag_spans.push(Span::styled(
            "no tags",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("#{} ", issue.number),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                issue.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!("@{}", issue.author.login),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(format!(
                " | opened {} | updated {} | {} comments",
                issue.created_at.format("%Y-%m-%d %H:%M"),
                format_age(issue.updated_at),
                issue.comments
            )),
        ]),
        Line::from(tag_spans),
        Line::from(Span::styled(
            issue.html_url.clone(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        )),
    ];

    let header =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Issue "));
    frame.render_widget(header, area);
}

fn render_body(frame: &mut Frame, issue: &Issue, scroll: usize, area: Rect) {
    let body_text = if issue.body.is_empty() {
        "No description provided."
    } else {
        issue.body.as_str()
    };

    let lines: Vec<Line> = body_text
        .lines()
        .map(|line| Line::from(line.replace('\t', "    ")))
        .collect();

    // Clamp so scrolling past the end leaves the last page on screen.
    let inner_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(inner_height);
    let offset = scroll.min(max_scroll);

    let visible: Vec<Line> = lines.into_iter().skip(offset).take(inner_height).collect();

    let body = Paragraph::new(Text::from(visible))
        .block(Block::default().borders(Borders::ALL).title(" Body "));
    frame.render_widget(body, area);
}
