use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode;

use super::side_panel::spans_width;

const NAVIGATE_HINT: &str =
    "/ search  f filter  e edit  a apply  s show  u undo  o open  x export  w save  q quit";

/// Pad between the content and a right-aligned hint; drop the hint when it does not fit
fn with_hint<'a>(mut spans: Vec<Span<'a>>, hint: &'a str, width: usize, style: Style) -> Line<'a> {
    let used = spans_width(&spans);
    let hint_width = unicode::display_width(hint);
    if used + hint_width < width {
        spans.push(Span::styled(" ".repeat(width - used - hint_width), style));
        spans.push(Span::styled(hint, style));
    }
    Line::from(spans)
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let bright = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor = Style::default().fg(app.theme.highlight).bg(bg);

    let line = match app.mode {
        Mode::Navigate => Line::from(Span::styled(
            unicode::truncate_to_width(NAVIGATE_HINT, width),
            dim,
        )),
        Mode::Search => with_hint(
            vec![
                Span::styled(format!("/{}", app.state.query), bright),
                Span::styled("\u{258C}", cursor), // ▌ cursor
            ],
            "Enter keep  Esc cancel",
            width,
            dim,
        ),
        Mode::Edit => Line::from(Span::styled(
            unicode::truncate_to_width(
                "Ctrl-S apply to scene  Ctrl-R record only  Esc cancel",
                width,
            ),
            dim,
        )),
        Mode::Prompt(kind) => {
            let (before, after) = app.prompt.text.split_at(app.prompt.cursor);
            with_hint(
                vec![
                    Span::styled(format!("{}: ", kind.label()), dim),
                    Span::styled(before.to_string(), bright),
                    Span::styled("\u{258C}", cursor),
                    Span::styled(after.to_string(), bright),
                ],
                "Enter confirm  Esc cancel",
                width,
                dim,
            )
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::{PromptKind, TextInput};
    use crate::tui::render::test_helpers::{app_with_records, render_to_string};
    use insta::assert_snapshot;

    #[test]
    fn search_prompt() {
        let mut app = app_with_records(Vec::new());
        app.mode = Mode::Search;
        app.state.query = "thank".into();
        let output = render_to_string(40, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_snapshot!(output, @"/thank▌           Enter keep  Esc cancel");
    }

    #[test]
    fn navigate_hints_truncate() {
        let app = app_with_records(Vec::new());
        let output = render_to_string(20, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(output.starts_with("/ search  f filter"));
        assert!(output.ends_with('…'));
    }

    #[test]
    fn prompt_shows_cursor_inside_path() {
        let mut app = app_with_records(Vec::new());
        app.mode = Mode::Prompt(PromptKind::Export);
        app.prompt = TextInput {
            text: "out.json".into(),
            cursor: 3,
        };
        let output = render_to_string(80, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(output.contains(": out\u{258C}.json"));
        assert!(output.ends_with("Enter confirm  Esc cancel"));
    }

    #[test]
    fn edit_hints() {
        let mut app = app_with_records(Vec::new());
        app.mode = Mode::Edit;
        let output = render_to_string(80, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(output.starts_with("Ctrl-S apply to scene"));
    }
}
