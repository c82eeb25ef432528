use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::commands;
use crate::tui::app::{App, Mode};

/// Search narrows the list on every keystroke
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    let mut query = app.state.query.clone();
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            query = std::mem::take(&mut app.search_before);
            app.mode = Mode::Navigate;
        }
        (_, KeyCode::Enter) => {
            app.mode = Mode::Navigate;
            if app.state.selection.is_none() {
                app.jump_to(0);
            }
            return;
        }
        (_, KeyCode::Backspace) => {
            query.pop();
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => query.clear(),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => query.push(c),
        _ => return,
    }
    commands::search(&mut app.state, &app.provider, &query);
}
