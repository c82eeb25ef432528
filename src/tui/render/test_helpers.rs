use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::record::Record;
use crate::model::state::AppState;
use crate::provider::testing::sample_provider;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 100;
pub const TERM_H: u16 = 20;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over the sample scene holding the given records, nothing selected.
pub fn app_with_records(records: Vec<Record>) -> App {
    let provider = sample_provider();
    let mut state = AppState::default();
    state.store.replace_all(records);
    state.refresh_view(&provider);
    App::new(state, provider, None, Theme::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::render;

    #[test]
    fn full_screen_layout() {
        let mut app = app_with_records(vec![
            Record::new("Scene1", 2, "Title", "Introduction"),
            Record::new("Outro", 1, "Credits", "Thanks"),
        ]);
        app.state.selection = Some(1);
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with(" Text IMP  file -"));
        assert!(lines[0].ends_with("2/2"));
        assert!(lines[1].contains("Records"));
        assert!(lines[1].contains("Selected"));
        assert!(output.contains("Credits [1] = Thanks"));
        assert!(output.contains("Live      up to date"));
        assert!(output.contains("Activity"));
        assert!(lines[lines.len() - 1].starts_with("/ search"));
    }
}
