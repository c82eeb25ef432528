use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode;

use super::side_panel::spans_width;

/// Render the header: record file, filter, search and the visible count
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let value = Style::default().fg(app.theme.text).bg(bg);

    let file = app
        .state
        .selected_file
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::styled(
            " Text IMP ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" file ", dim),
        Span::styled(file, value),
        Span::styled("  filter ", dim),
        Span::styled(app.state.filter_mode.label(), value),
    ];
    if !app.state.query.is_empty() {
        spans.push(Span::styled("  search ", dim));
        spans.push(Span::styled(app.state.query.clone(), value));
    }

    let count = format!("{}/{} ", app.state.view.len(), app.state.store.len());
    let used = spans_width(&spans);
    let count_width = unicode::display_width(&count);
    if used + count_width < width {
        spans.push(Span::styled(" ".repeat(width - used - count_width), dim));
        spans.push(Span::styled(count, dim));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
