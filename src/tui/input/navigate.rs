use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::commands;
use crate::ops::reconcile::ApplyMode;
use crate::tui::app::{App, Mode, PromptKind, TextInput};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::Char('g') | KeyCode::Home => app.jump_to(0),
        KeyCode::Char('G') | KeyCode::End => app.jump_to(usize::MAX),

        KeyCode::Char('/') => {
            app.search_before = app.state.query.clone();
            app.mode = Mode::Search;
        }
        // Esc drops an active search
        KeyCode::Esc => {
            if !app.state.query.is_empty() {
                commands::search(&mut app.state, &app.provider, "");
            }
        }
        KeyCode::Char('f') => {
            let mode = app.state.filter_mode.toggled();
            commands::set_filter(&mut app.state, &app.provider, mode);
        }

        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(record) = app.state.selected_record() {
                app.edit = TextInput::with_text(record.text.clone());
                app.mode = Mode::Edit;
            }
        }
        KeyCode::Char('a') => {
            commands::apply(&mut app.state, &mut app.provider, ApplyMode::Write);
            app.save_scene();
        }
        KeyCode::Char('s') => {
            commands::show_selected(&mut app.state, &mut app.provider);
        }
        KeyCode::Char('r') => {
            commands::refresh(&mut app.state, &app.provider);
        }
        KeyCode::Char('u') => {
            commands::undo(&mut app.state, &mut app.provider);
            app.save_scene();
        }

        KeyCode::Char('o') => {
            let current = app
                .state
                .selected_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            app.prompt = TextInput::with_text(current);
            app.mode = Mode::Prompt(PromptKind::OpenRecords);
        }
        KeyCode::Char('x') => {
            app.prompt = TextInput::with_text(app.default_export_path().display().to_string());
            app.mode = Mode::Prompt(PromptKind::Export);
        }
        KeyCode::Char('w') => {
            commands::save_file(&mut app.state);
        }
        KeyCode::Char('d') => {
            commands::delete_selected(&mut app.state, &app.provider);
        }
        KeyCode::Char('D') => {
            if let Some(name) = app.state.selected_record().map(|r| r.container_name.clone()) {
                commands::delete_container(&mut app.state, &app.provider, &name);
            }
        }
        KeyCode::Char('L') => {
            commands::clear_log(&mut app.state);
        }
        _ => {}
    }
}
