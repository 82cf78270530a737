use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

/// Centered select popup. Sized to the widest entry; lists taller than
/// the popup scroll with the selection.
pub fn render_select(frame: &mut Frame, title: &str, items: &[String], selected: usize) {
    let outer = frame.area();
    let widest = items
        .iter()
        .map(|item| UnicodeWidthStr::width(item.as_str()))
        .max()
        .unwrap_or(0);
    let width = ((widest + 6).max(24) as u16).min(outer.width.saturating_sub(4).max(20));
    let height = ((items.len() + 2) as u16)
        .min(14)
        .min(outer.height.saturating_sub(2).max(5));

    let area = centered_rect(width, height, outer);
    frame.render_widget(Clear, area);

    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let (prefix, style) = if i == selected {
                (
                    "> ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", Style::default())
            };
            ListItem::new(Line::from(Span::styled(
                format!("{}{}", prefix, item),
                style,
            )))
        })
        .collect();

    let list = List::new(list_items).block(
        Block::default().borders(Borders::ALL).title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    );

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let w = width.min(outer.width);
    let h = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - w) / 2,
        y: outer.y + (outer.height - h) / 2,
        width: w,
        height: h,
    }
}
