use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;
use crate::util::unicode;

use super::push_highlighted_spans;

/// Keep the cursor row inside the visible window
fn adjust_scroll(scroll: usize, cursor: Option<usize>, height: usize) -> usize {
    let Some(cursor) = cursor else {
        return scroll;
    };
    if height == 0 {
        return cursor;
    }
    if cursor < scroll {
        cursor
    } else if cursor >= scroll + height {
        cursor + 1 - height
    } else {
        scroll
    }
}

/// Render the visible records, one display line each
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Records ")
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = inner.height as usize;
    let width = inner.width as usize;

    if app.state.view.is_empty() {
        let message = if app.state.store.is_empty() {
            "No records. o open file, r scan scene"
        } else {
            "No records match"
        };
        let line = Line::from(Span::styled(
            unicode::truncate_to_width(message, width),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    let cursor = app.cursor();
    app.scroll_offset = adjust_scroll(
        app.scroll_offset.min(app.state.view.len().saturating_sub(1)),
        cursor,
        height,
    );

    let search_re = app.active_search_re();
    let highlight = Style::default()
        .fg(app.theme.search_match_fg)
        .bg(app.theme.search_match_bg);

    let mut lines: Vec<Line> = Vec::with_capacity(height);
    for (pos, &index) in app
        .state
        .view
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
    {
        let Some(record) = app.state.store.get(index) else {
            continue;
        };
        let selected = cursor == Some(pos);
        let base = if selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };

        let text = unicode::truncate_to_width(&record.single_line(), width);
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, &text, base, highlight, search_re.as_ref());
        let used: usize = spans
            .iter()
            .map(|s| unicode::display_width(&s.content))
            .sum();
        if selected && used < width {
            spans.push(Span::styled(" ".repeat(width - used), base));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
