use ratatui::{prelude::*, widgets::*};

use crate::store::LoadState;

/// Bordered block for a form panel, colored by focus/editing state
pub fn form_block(title: &str, focused: bool, editing: bool) -> Block<'static> {
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", title))
}

/// One labelled form field with a focus marker
pub fn field_line(label: &str, value: &str, selected: bool, selector: bool) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };
    let value_style = if selector {
        Style::default().fg(Color::Magenta)
    } else if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(String::from(marker), Style::default().fg(Color::Yellow)),
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
        Span::styled(String::from(value), value_style),
    ])
}

/// Table title suffix while a collection refresh is in flight
pub fn loading_suffix(state: LoadState) -> &'static str {
    match state {
        LoadState::Loading => " [...]",
        LoadState::Empty | LoadState::Populated => "",
    }
}

/// Light JSON coloring for the search result panel: keys cyan, rest plain
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    text.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with('"') {
                if let Some(colon) = line.find("\":") {
                    let (key, rest) = line.split_at(colon + 1);
                    return Line::from(vec![
                        Span::styled(String::from(key), Style::default().fg(Color::Cyan)),
                        Span::raw(String::from(rest)),
                    ]);
                }
            }
            Line::from(Span::raw(String::from(line)))
        })
        .collect()
}
