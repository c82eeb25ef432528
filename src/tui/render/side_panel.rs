use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::model::record::{Record, text_or_placeholder};
use crate::ops::matcher::{ResolveError, resolve_record};
use crate::provider::ElementProvider;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// What the live element behind a record looks like right now
fn live_status(provider: &dyn ElementProvider, record: &Record) -> String {
    let handle = match resolve_record(provider, record) {
        Ok(h) => h,
        Err(ResolveError::NotFound { .. }) => return "not found in scene".into(),
        Err(ResolveError::Provider(err)) => return format!("unreadable: {}", err),
    };
    match provider.text_property(handle) {
        Ok(Some(state)) => {
            let text = text_or_placeholder(state.value.as_deref());
            if state.expression_driven {
                format!("{} (expression)", text)
            } else if !state.writable {
                format!("{} (locked)", text)
            } else if text == record.text {
                "up to date".into()
            } else {
                text.to_string()
            }
        }
        Ok(None) => "element has no text".into(),
        Err(err) => format!("unreadable: {}", err),
    }
}

/// Selected record details, or the edit buffer while editing
pub fn render_editor(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let editing = app.mode == Mode::Edit;

    let title = if editing { " Editing " } else { " Selected " };
    let border_color = if editing {
        app.theme.highlight
    } else {
        app.theme.dim
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border_color).bg(bg))
        .style(Style::default().bg(bg));

    let Some(record) = app.state.selected_record() else {
        let paragraph = Paragraph::new(Line::from(Span::styled("No record selected", dim)))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Container ", dim),
            Span::styled(record.container_name.clone(), text_style),
        ]),
        Line::from(vec![
            Span::styled("Element   ", dim),
            Span::styled(
                format!("{} [{}]", record.element_name, record.element_index),
                text_style,
            ),
        ]),
        Line::from(vec![
            Span::styled("Live      ", dim),
            Span::styled(live_status(&app.provider, record), text_style),
        ]),
        Line::from(""),
    ];

    if editing {
        let cursor_style = Style::default().fg(app.theme.highlight).bg(bg);
        let bright = Style::default().fg(app.theme.text_bright).bg(bg);
        let (before, after) = app.edit.text.split_at(app.edit.cursor);
        let before_lines: Vec<&str> = before.split('\n').collect();
        let after_lines: Vec<&str> = after.split('\n').collect();
        let last = before_lines.len() - 1;
        for (i, line) in before_lines.iter().enumerate() {
            if i < last {
                lines.push(Line::from(Span::styled(line.to_string(), bright)));
            }
        }
        lines.push(Line::from(vec![
            Span::styled(before_lines[last].to_string(), bright),
            Span::styled("\u{258C}", cursor_style), // ▌ cursor
            Span::styled(after_lines[0].to_string(), bright),
        ]));
        for line in &after_lines[1..] {
            lines.push(Line::from(Span::styled(line.to_string(), bright)));
        }
    } else {
        for line in record.text.split('\n') {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// The activity log, oldest entry first
pub fn render_log(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Activity ")
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner_width = area.width.saturating_sub(2) as usize;

    let lines: Vec<Line> = app
        .state
        .log
        .entries()
        .map(|entry| {
            let text = unicode::truncate_to_width(
                &entry.to_string().replace('\n', " "),
                inner_width,
            );
            Line::from(Span::styled(
                text,
                Style::default().fg(app.theme.level_color(entry.level)).bg(bg),
            ))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
