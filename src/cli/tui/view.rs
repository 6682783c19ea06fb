//! Editor layout: typed line list, suggestion popup, status bar

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::cli::tui::app::App;
use crate::domain::{normalize, wrap_parenthetical, DraftLine, ElementType};

/// Width of the type label column
const LABEL_WIDTH: usize = 14;

/// Draw the editor
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Lines
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    draw_lines(frame, app, chunks[0]);
    draw_suggestions(frame, app, chunks[0]);
    draw_status_bar(frame, app, chunks[1]);
}

fn draw_lines(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let active = session.active_index();

    let items: Vec<ListItem> = session
        .lines()
        .iter()
        .enumerate()
        .map(|(idx, line)| ListItem::new(render_line(line, idx == active)))
        .collect();

    let title = format!(
        "{} {}{}",
        app.script().id,
        app.script().name,
        if app.is_dirty() { " [+]" } else { "" }
    );

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(active));

    frame.render_stateful_widget(list, area, &mut state);
}

/// One line as it will print, with its type in a dim label column
///
/// The active line shows raw input so the cursor sits where typing lands.
fn render_line(line: &DraftLine, active: bool) -> Line<'static> {
    let label = Span::styled(
        format!("{:<width$}", line.element.as_str(), width = LABEL_WIDTH),
        Style::default().fg(Color::DarkGray),
    );

    let text = if active {
        format!("{}_", line.text)
    } else {
        display_text(line)
    };

    let (indent, style) = match line.element {
        ElementType::SceneHeading => ("", Style::default().add_modifier(Modifier::BOLD)),
        ElementType::Character => ("            ", Style::default().fg(Color::Cyan)),
        ElementType::Parenthetical => {
            ("         ", Style::default().add_modifier(Modifier::ITALIC))
        }
        ElementType::Dialogue => ("      ", Style::default()),
        ElementType::Transition => ("                        ", Style::default().fg(Color::Yellow)),
        ElementType::Shot => ("", Style::default().fg(Color::Magenta)),
        ElementType::Note => ("", Style::default().fg(Color::Green).add_modifier(Modifier::DIM)),
        ElementType::Action => ("", Style::default()),
    };

    Line::from(vec![label, Span::raw(indent), Span::styled(text, style)])
}

fn display_text(line: &DraftLine) -> String {
    match line.element {
        ElementType::Parenthetical => wrap_parenthetical(&normalize(line.element, &line.text)),
        element => normalize(element, &line.text),
    }
}

/// Candidate popup anchored to the bottom of the line area
fn draw_suggestions(frame: &mut Frame, app: &App, area: Rect) {
    let candidates = app.visible_suggestions();
    if candidates.is_empty() {
        return;
    }

    let height = (candidates.len() as u16 + 2).min(area.height);
    let width = candidates
        .iter()
        .map(|c| c.chars().count() as u16 + 4)
        .max()
        .unwrap_or(0)
        .max(20)
        .min(area.width);
    let popup = Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - height,
        width,
        height,
    };

    let items: Vec<ListItem> = candidates
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let style = if idx == 0 {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(candidate.clone()).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title("Tab")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(list, popup);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.session().active_line();
    let text = match app.status_message() {
        Some(message) => format!("[{}] {}", active.element, message),
        None => format!("[{}]", active.element),
    };

    let paragraph = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_lines_show_normalized_text() {
        let heading = DraftLine::new(ElementType::SceneHeading, "int. room");
        assert_eq!(display_text(&heading), "INT. ROOM");

        let paren = DraftLine::new(ElementType::Parenthetical, "(quietly)");
        assert_eq!(display_text(&paren), "(quietly)");
    }

    #[test]
    fn active_line_shows_raw_input() {
        let line = DraftLine::new(ElementType::Character, "mara");
        let rendered = render_line(&line, true);
        let text: String = rendered.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.ends_with("mara_"));
        assert!(text.starts_with("character"));
    }
}
