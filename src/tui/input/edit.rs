use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::commands;
use crate::tui::app::{App, Mode, PromptKind, TextInput};
use crate::util::unicode;

/// Editing the selected record's text. Enter inserts a line break.
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.mode = Mode::Navigate;
        }
        // Push to the live element and the record
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
            let text = app.edit.text.clone();
            commands::save_edit(&mut app.state, &mut app.provider, &text);
            app.save_scene();
            app.mode = Mode::Navigate;
        }
        // Record only
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
            let text = app.edit.text.clone();
            commands::edit_record(&mut app.state, &app.provider, &text);
            app.mode = Mode::Navigate;
        }
        (_, KeyCode::Enter) => insert(&mut app.edit, "\n"),
        _ => edit_text(&mut app.edit, key),
    }
}

/// Typing a file path for open or export. An empty path counts as cancelled.
pub(super) fn handle_prompt(app: &mut App, kind: PromptKind, key: KeyEvent) {
    let path = match key.code {
        KeyCode::Esc => None,
        KeyCode::Enter => {
            let text = app.prompt.text.trim();
            (!text.is_empty()).then(|| PathBuf::from(text))
        }
        _ => {
            edit_text(&mut app.prompt, key);
            return;
        }
    };
    app.mode = Mode::Navigate;
    match kind {
        PromptKind::OpenRecords => {
            commands::choose_file(&mut app.state, &app.provider, path.as_deref());
        }
        PromptKind::Export => {
            commands::export(&mut app.state, &app.provider, path.as_deref());
        }
    }
}

/// Cursor movement and character editing shared by both inputs
fn edit_text(input: &mut TextInput, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Left) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&input.text, input.cursor) {
                input.cursor = prev;
            }
        }
        (_, KeyCode::Right) => {
            if let Some(next) = unicode::next_grapheme_boundary(&input.text, input.cursor) {
                input.cursor = next;
            }
        }
        (_, KeyCode::Home) => input.cursor = line_start(&input.text, input.cursor),
        (_, KeyCode::End) => input.cursor = line_end(&input.text, input.cursor),
        (_, KeyCode::Backspace) => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&input.text, input.cursor) {
                input.text.replace_range(prev..input.cursor, "");
                input.cursor = prev;
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(next) = unicode::next_grapheme_boundary(&input.text, input.cursor) {
                input.text.replace_range(input.cursor..next, "");
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            let start = line_start(&input.text, input.cursor);
            input.text.replace_range(start..input.cursor, "");
            input.cursor = start;
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            insert(input, c.encode_utf8(&mut [0; 4]));
        }
        _ => {}
    }
}

fn insert(input: &mut TextInput, s: &str) {
    input.text.insert_str(input.cursor, s);
    input.cursor += s.len();
}

fn line_start(text: &str, cursor: usize) -> usize {
    text[..cursor].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end(text: &str, cursor: usize) -> usize {
    text[cursor..].find('\n').map_or(text.len(), |i| cursor + i)
}
