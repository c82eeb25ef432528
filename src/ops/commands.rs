use std::path::Path;

use crate::io::record_io::{read_records, write_records};
use crate::model::activity::LogEntry;
use crate::model::record::text_or_placeholder;
use crate::model::state::AppState;
use crate::ops::matcher::{ResolveError, resolve_record};
use crate::ops::reconcile::{ApplyMode, apply as reconcile};
use crate::ops::scan::scan;
use crate::ops::view::FilterMode;
use crate::provider::ElementProvider;

/// Label of the edit group wrapping a manual edit
pub const MANUAL_EDIT_GROUP: &str = "Edit text";

/// Load a record file into the store.
///
/// `None` means the user cancelled the file selection. A file that cannot be
/// read or parsed leaves the store and the selected file untouched.
pub fn choose_file(
    state: &mut AppState,
    provider: &dyn ElementProvider,
    path: Option<&Path>,
) -> Vec<LogEntry> {
    let Some(path) = path else {
        return state.emit(vec![LogEntry::warning("File selection cancelled")]);
    };
    let entry = match read_records(path) {
        Ok(records) => {
            let count = records.len();
            state.store.replace_all(records);
            state.selected_file = Some(path.to_path_buf());
            state.selection = None;
            state.refresh_view(provider);
            LogEntry::success(format!("Loaded {} records from {}", count, path.display()))
        }
        Err(err) => LogEntry::error(format!("Could not load record file: {}", err)),
    };
    state.emit(vec![entry])
}

/// Scan the provider into the store and write every text element to a
/// record file. An empty scan leaves the store alone and writes nothing.
pub fn export(
    state: &mut AppState,
    provider: &dyn ElementProvider,
    path: Option<&Path>,
) -> Vec<LogEntry> {
    let report = scan(provider);
    let mut entries = report.warnings.clone();
    let records = match report.into_records() {
        Ok(records) => records,
        Err(err) => {
            entries.push(LogEntry::error(format!("Nothing exported: {}", err)));
            return state.emit(entries);
        }
    };
    state.store.replace_all(records.clone());
    state.selection = None;
    state.refresh_view(provider);

    let Some(path) = path else {
        entries.push(LogEntry::warning("Export cancelled"));
        return state.emit(entries);
    };
    entries.push(match write_records(path, &records) {
        Ok(()) => LogEntry::success(format!(
            "Exported {} records to {}",
            records.len(),
            path.display()
        )),
        Err(err) => LogEntry::error(format!("Export failed: {}", err)),
    });
    state.emit(entries)
}

/// Reconcile the whole store onto the provider. Requires a selected file.
pub fn apply(
    state: &mut AppState,
    provider: &mut dyn ElementProvider,
    mode: ApplyMode,
) -> Vec<LogEntry> {
    if state.selected_file.is_none() {
        return state.emit(vec![LogEntry::error("Select a record file before applying")]);
    }
    let report = reconcile(provider, state.store.records(), mode);
    state.refresh_view(provider);
    state.emit(report.log)
}

/// Replace the store with a fresh scan of the provider, keeping the selection
/// on the same identity key when it still exists.
pub fn refresh(state: &mut AppState, provider: &dyn ElementProvider) -> Vec<LogEntry> {
    let mut entries = vec![LogEntry::info("Refreshing text elements from scene...")];
    let report = scan(provider);
    entries.extend(report.warnings);
    let count = report.records.len();
    let selected_key = state
        .selected_record()
        .map(|r| (r.container_name.clone(), r.element_index));
    state.store.replace_all(report.records);
    state.selection = selected_key.and_then(|(name, index)| state.store.position_of(&name, index));
    state.refresh_view(provider);
    entries.push(LogEntry::success(format!("Text element list refreshed: {} found", count)));
    state.emit(entries)
}

/// Reveal the live element behind the selected record
pub fn show_selected(state: &mut AppState, provider: &mut dyn ElementProvider) -> Vec<LogEntry> {
    let Some(record) = state.selected_record().cloned() else {
        return state.emit(vec![LogEntry::warning("Select a record from the list")]);
    };
    let entry = match resolve_record(provider, &record) {
        Ok(handle) => match provider.reveal(handle) {
            Ok(()) => LogEntry::success(format!(
                "Selected element '{}' in container {}",
                record.element_name, record.container_name
            )),
            Err(err) => LogEntry::error(format!("Could not reveal element: {}", err)),
        },
        Err(ResolveError::NotFound { .. }) => LogEntry::error(format!(
            "Element not found: {} [{}] in container {}",
            record.element_name, record.element_index, record.container_name
        )),
        Err(ResolveError::Provider(err)) => {
            LogEntry::error(format!("Could not reveal element: {}", err))
        }
    };
    state.emit(vec![entry])
}

/// Push new text for the selected record onto its live element, inside one
/// edit group, and keep the record in step.
pub fn save_edit(
    state: &mut AppState,
    provider: &mut dyn ElementProvider,
    text: &str,
) -> Vec<LogEntry> {
    let Some(index) = state.selection else {
        return state.emit(vec![LogEntry::warning("Select a record from the list to edit")]);
    };
    let Some(record) = state.store.get(index).cloned() else {
        return state.emit(vec![LogEntry::error("Selected record no longer exists")]);
    };

    let handle = match resolve_record(provider, &record) {
        Ok(handle) => handle,
        Err(ResolveError::NotFound { .. }) => {
            return state.emit(vec![LogEntry::error(format!(
                "Element not found in container: {}",
                record.container_name
            ))]);
        }
        Err(ResolveError::Provider(err)) => {
            return state.emit(vec![LogEntry::error(format!("Error updating text: {}", err))]);
        }
    };
    let current = match provider.text_property(handle) {
        Ok(Some(text_state)) if text_state.accepts_text() => text_state.value,
        Ok(_) => {
            return state.emit(vec![LogEntry::error(format!(
                "Cannot modify text of element: {}",
                record.element_name
            ))]);
        }
        Err(err) => {
            return state.emit(vec![LogEntry::error(format!("Error updating text: {}", err))]);
        }
    };

    if text_or_placeholder(current.as_deref()) == text {
        return state.emit(vec![LogEntry::info("Text is already up to date")]);
    }

    provider.begin_edit_group(MANUAL_EDIT_GROUP);
    let written = provider.set_text(handle, text);
    provider.end_edit_group();

    let entry = match written {
        Ok(()) => {
            state.store.set_text(index, text);
            LogEntry::success(format!("Text of element '{}' updated", record.element_name))
        }
        Err(err) => LogEntry::error(format!("Error updating text: {}", err)),
    };
    state.refresh_view(provider);
    state.emit(vec![entry])
}

/// Change the selected record's text without touching the live element
pub fn edit_record(state: &mut AppState, provider: &dyn ElementProvider, text: &str) -> Vec<LogEntry> {
    let Some(index) = state.selection else {
        return state.emit(vec![LogEntry::warning("Select a record from the list to edit")]);
    };
    let entry = match state.store.get_mut(index) {
        Some(record) => {
            record.text = text.to_string();
            LogEntry::success(format!("Record text of '{}' updated", record.element_name))
        }
        None => LogEntry::error("Selected record no longer exists"),
    };
    state.refresh_view(provider);
    state.emit(vec![entry])
}

/// Remove the selected record. The selection moves to the next visible record.
pub fn delete_selected(state: &mut AppState, provider: &dyn ElementProvider) -> Vec<LogEntry> {
    let Some(index) = state.selection else {
        return state.emit(vec![LogEntry::warning("Select a record to delete")]);
    };
    let position = state.selected_view_position().unwrap_or(0);
    let Some(removed) = state.store.remove(index) else {
        return state.emit(vec![LogEntry::error("Selected record no longer exists")]);
    };
    state.selection = None;
    state.refresh_view(provider);
    state.selection = state
        .view
        .get(position)
        .or_else(|| state.view.last())
        .copied();
    state.emit(vec![LogEntry::success(format!(
        "Deleted record: {}",
        removed.display_line()
    ))])
}

/// Remove every record of one container
pub fn delete_container(
    state: &mut AppState,
    provider: &dyn ElementProvider,
    container_name: &str,
) -> Vec<LogEntry> {
    let selected_key = state
        .selected_record()
        .map(|r| (r.container_name.clone(), r.element_index));
    let removed = state.store.remove_container(container_name);
    if removed == 0 {
        return state.emit(vec![LogEntry::warning(format!(
            "No records for container {}",
            container_name
        ))]);
    }
    state.selection = selected_key.and_then(|(name, index)| state.store.position_of(&name, index));
    state.refresh_view(provider);
    state.emit(vec![LogEntry::success(format!(
        "Deleted {} records of container {}",
        removed, container_name
    ))])
}

/// Write the store back to the selected file
pub fn save_file(state: &mut AppState) -> Vec<LogEntry> {
    let Some(path) = state.selected_file.clone() else {
        return state.emit(vec![LogEntry::warning("Select a record file first")]);
    };
    let entry = match write_records(&path, state.store.records()) {
        Ok(()) => LogEntry::success(format!(
            "Saved {} records to {}",
            state.store.len(),
            path.display()
        )),
        Err(err) => LogEntry::error(format!("Could not save record file: {}", err)),
    };
    state.emit(vec![entry])
}

pub fn set_filter(state: &mut AppState, provider: &dyn ElementProvider, mode: FilterMode) -> Vec<LogEntry> {
    state.filter_mode = mode;
    state.refresh_view(provider);
    tracing::debug!(filter = mode.label(), visible = state.view.len(), "filter changed");
    Vec::new()
}

pub fn search(state: &mut AppState, provider: &dyn ElementProvider, query: &str) -> Vec<LogEntry> {
    state.query = query.to_string();
    state.refresh_view(provider);
    tracing::debug!(query, visible = state.view.len(), "search changed");
    Vec::new()
}

/// Select the record at a position of the visible list.
/// An out-of-range position clears the selection.
pub fn select(state: &mut AppState, view_position: usize) -> Vec<LogEntry> {
    state.selection = state.view.get(view_position).copied();
    Vec::new()
}

pub fn clear_log(state: &mut AppState) -> Vec<LogEntry> {
    state.log.clear();
    Vec::new()
}

/// Revert the provider's last edit group
pub fn undo(state: &mut AppState, provider: &mut dyn ElementProvider) -> Vec<LogEntry> {
    let entry = match provider.undo_edit_group() {
        Some(label) => LogEntry::info(format!("Undone: {}", label)),
        None => LogEntry::warning("Nothing to undo"),
    };
    state.refresh_view(provider);
    state.emit(vec![entry])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::activity::LogLevel;
    use crate::model::record::Record;
    use crate::provider::testing::sample_provider;
    use crate::provider::{ElementHandle, SceneProvider};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn text_at(p: &SceneProvider, item: usize, element: usize) -> Option<String> {
        p.text_property(ElementHandle::new(item, element))
            .unwrap()
            .and_then(|s| s.value)
    }

    fn loaded_state(tmp: &TempDir, p: &SceneProvider, records: Vec<Record>) -> AppState {
        let path = tmp.path().join("texts.json");
        write_records(&path, &records).unwrap();
        let mut state = AppState::default();
        state.filter_mode = FilterMode::ShowAll;
        choose_file(&mut state, p, Some(path.as_path()));
        state
    }

    fn levels(entries: &[LogEntry]) -> Vec<LogLevel> {
        entries.iter().map(|e| e.level).collect()
    }

    #[test]
    fn cancelled_file_selection() {
        let p = sample_provider();
        let mut state = AppState::default();
        let out = choose_file(&mut state, &p, None);
        assert_eq!(levels(&out), vec![LogLevel::Warning]);
        assert!(state.selected_file.is_none());
        assert_eq!(state.log.len(), 1);
    }

    #[test]
    fn malformed_file_leaves_store_untouched() {
        let tmp = TempDir::new().unwrap();
        let p = sample_provider();
        let mut state = loaded_state(&tmp, &p, vec![Record::new("Scene1", 2, "Title", "x")]);
        let bad = tmp.path().join("bad.json");
        std::fs::write(&bad, "{\"not\": \"an array\"}").unwrap();

        let out = choose_file(&mut state, &p, Some(bad.as_path()));
        assert_eq!(levels(&out), vec![LogLevel::Error]);
        assert_eq!(state.store.len(), 1);
        assert_eq!(state.selected_file, Some(tmp.path().join("texts.json")));
    }

    #[test]
    fn choose_file_fills_store_and_view() {
        let tmp = TempDir::new().unwrap();
        let p = sample_provider();
        let state = loaded_state(
            &tmp,
            &p,
            vec![
                Record::new("Scene1", 2, "Title", "A"),
                Record::new("Scene1", 4, "Clock", "B"),
            ],
        );
        assert_eq!(state.store.len(), 2);
        assert_eq!(state.view, vec![0, 1]);
        assert!(state.log.as_text().contains("Loaded 2 records"));
    }

    #[test]
    fn export_writes_scan() {
        let tmp = TempDir::new().unwrap();
        let p = sample_provider();
        let mut state = AppState::default();
        let out_path = tmp.path().join("out.json");
        let out = export(&mut state, &p, Some(out_path.as_path()));
        assert_eq!(levels(&out), vec![LogLevel::Success]);
        let written = read_records(&out_path).unwrap();
        assert_eq!(written.len(), 10);
        assert_eq!(state.store.records(), written.as_slice());
    }

    #[test]
    fn export_replaces_loaded_records() {
        let tmp = TempDir::new().unwrap();
        let p = sample_provider();
        let mut state = AppState::default();
        state
            .store
            .replace_all(vec![Record::new("Old", 1, "Stale", "gone")]);
        state.selection = Some(0);
        state.refresh_view(&p);

        let out_path = tmp.path().join("out.json");
        export(&mut state, &p, Some(out_path.as_path()));
        assert_eq!(state.store.len(), 10);
        assert_eq!(state.selection, None);
        assert!(state.store.position_of("Old", 1).is_none());
        // Expression-driven Clock is hidden by the default filter
        assert_eq!(state.view.len(), 9);
    }

    #[test]
    fn export_of_empty_scene_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let p = SceneProvider::default();
        let mut state = AppState::default();
        state.store.replace_all(vec![Record::new("Kept", 1, "Title", "x")]);
        let out_path = tmp.path().join("out.json");
        let out = export(&mut state, &p, Some(out_path.as_path()));
        assert_eq!(levels(&out), vec![LogLevel::Error]);
        assert!(!out_path.exists());
        assert_eq!(state.store.len(), 1);
    }

    #[test]
    fn export_cancelled_after_scan() {
        let p = sample_provider();
        let mut state = AppState::default();
        let out = export(&mut state, &p, None);
        assert_eq!(levels(&out), vec![LogLevel::Warning]);
    }

    #[test]
    fn apply_without_file_is_refused() {
        let mut p = sample_provider();
        let mut state = AppState::default();
        state.store.replace_all(vec![Record::new("Scene1", 2, "Title", "New")]);
        let out = apply(&mut state, &mut p, ApplyMode::Write);
        assert_eq!(levels(&out), vec![LogLevel::Error]);
        assert_eq!(text_at(&p, 2, 2).as_deref(), Some("Introduction"));
    }

    #[test]
    fn apply_updates_and_summarises() {
        let tmp = TempDir::new().unwrap();
        let mut p = sample_provider();
        let mut state = loaded_state(
            &tmp,
            &p,
            vec![
                Record::new("Scene1", 2, "Title", "Intro v2"),
                Record::new("Scene1", 3, "Title", "Hello"),
                Record::new("Nowhere", 1, "X", "y"),
            ],
        );
        let out = apply(&mut state, &mut p, ApplyMode::Write);
        assert_eq!(text_at(&p, 2, 2).as_deref(), Some("Intro v2"));
        let last = out.last().unwrap();
        assert_eq!(last.message, "Summary: updated 1, skipped 1, failed 1");
        assert_eq!(last.level, LogLevel::Warning);
        assert!(p.can_undo());
    }

    #[test]
    fn refresh_rescans_and_keeps_selection_key() {
        let p = sample_provider();
        let mut state = AppState::default();
        state.filter_mode = FilterMode::ShowAll;
        state.store.replace_all(vec![Record::new("Outro", 1, "Credits", "old")]);
        state.refresh_view(&p);
        select(&mut state, 0);

        refresh(&mut state, &p);
        assert_eq!(state.store.len(), 10);
        let selected = state.selected_record().unwrap();
        assert_eq!(selected.key(), ("Outro", 1));
        assert_eq!(selected.text, "Thanks");
    }

    #[test]
    fn show_selected_reveals_element() {
        let mut p = sample_provider();
        let mut state = AppState::default();
        state.store.replace_all(vec![
            Record::new("Scene1", 3, "Title", "Hello"),
            Record::new("Scene1", 40, "Ghost", "x"),
        ]);
        state.refresh_view(&p);

        assert_eq!(levels(&show_selected(&mut state, &mut p)), vec![LogLevel::Warning]);

        select(&mut state, 0);
        assert_eq!(levels(&show_selected(&mut state, &mut p)), vec![LogLevel::Success]);
        assert_eq!(p.revealed(), Some(ElementHandle::new(2, 3)));

        select(&mut state, 1);
        let out = show_selected(&mut state, &mut p);
        assert_eq!(levels(&out), vec![LogLevel::Error]);
        assert!(out[0].message.contains("Ghost [40]"));
    }

    #[test]
    fn save_edit_writes_live_and_record() {
        let mut p = sample_provider();
        let mut state = AppState::default();
        state.store.replace_all(vec![Record::new("Scene1", 3, "Title", "Hello")]);
        state.refresh_view(&p);
        select(&mut state, 0);

        let out = save_edit(&mut state, &mut p, "Bonjour");
        assert_eq!(levels(&out), vec![LogLevel::Success]);
        assert_eq!(text_at(&p, 2, 3).as_deref(), Some("Bonjour"));
        assert_eq!(state.store.get(0).unwrap().text, "Bonjour");

        let out = save_edit(&mut state, &mut p, "Bonjour");
        assert_eq!(levels(&out), vec![LogLevel::Info]);

        let out = undo(&mut state, &mut p);
        assert_eq!(out[0].message, format!("Undone: {}", MANUAL_EDIT_GROUP));
        assert_eq!(text_at(&p, 2, 3).as_deref(), Some("Hello"));
    }

    #[test]
    fn save_edit_refuses_unwritable_element() {
        let mut p = sample_provider();
        let mut state = AppState::default();
        state.filter_mode = FilterMode::ShowAll;
        state.store.replace_all(vec![
            Record::new("Scene1", 4, "Clock", "12:00"),
            Record::new("Scene1", 5, "Legal", "(c) 2025"),
        ]);
        state.refresh_view(&p);
        for position in 0..2 {
            select(&mut state, position);
            let out = save_edit(&mut state, &mut p, "changed");
            assert_eq!(levels(&out), vec![LogLevel::Error]);
        }
        assert!(!p.can_undo());
        assert_eq!(state.store.get(1).unwrap().text, "(c) 2025");
    }

    #[test]
    fn edit_record_leaves_live_element_alone() {
        let mut p = sample_provider();
        let mut state = AppState::default();
        state.store.replace_all(vec![Record::new("Scene1", 3, "Title", "Hello")]);
        state.refresh_view(&p);
        select(&mut state, 0);
        edit_record(&mut state, &p, "Draft");
        assert_eq!(state.store.get(0).unwrap().text, "Draft");
        assert_eq!(text_at(&p, 2, 3).as_deref(), Some("Hello"));
        assert!(!p.is_dirty());
        assert_eq!(levels(&undo(&mut state, &mut p)), vec![LogLevel::Warning]);
    }

    #[test]
    fn delete_selected_moves_to_next_visible() {
        let p = sample_provider();
        let mut state = AppState::default();
        state.store.replace_all(vec![
            Record::new("Scene1", 2, "Title", "a"),
            Record::new("Scene1", 3, "Title", "b"),
            Record::new("Outro", 1, "Credits", "c"),
        ]);
        state.refresh_view(&p);
        select(&mut state, 1);
        delete_selected(&mut state, &p);
        assert_eq!(state.store.len(), 2);
        assert_eq!(state.selected_record().unwrap().key(), ("Outro", 1));

        delete_selected(&mut state, &p);
        assert_eq!(state.selected_record().unwrap().key(), ("Scene1", 2));
    }

    #[test]
    fn delete_container_and_save() {
        let tmp = TempDir::new().unwrap();
        let p = sample_provider();
        let mut state = loaded_state(
            &tmp,
            &p,
            vec![
                Record::new("Scene1", 2, "Title", "a"),
                Record::new("Outro", 1, "Credits", "c"),
                Record::new("Scene1", 3, "Title", "b"),
            ],
        );
        select(&mut state, 1);

        let out = delete_container(&mut state, &p, "Scene1");
        assert_eq!(out[0].message, "Deleted 2 records of container Scene1");
        assert_eq!(state.selected_record().unwrap().key(), ("Outro", 1));
        assert_eq!(levels(&delete_container(&mut state, &p, "Scene1")), vec![LogLevel::Warning]);

        save_file(&mut state);
        let saved = read_records(&tmp.path().join("texts.json")).unwrap();
        assert_eq!(saved, vec![Record::new("Outro", 1, "Credits", "c")]);
    }

    #[test]
    fn search_and_filter_rederive_view() {
        let p = sample_provider();
        let mut state = AppState::default();
        state.store.replace_all(vec![
            Record::new("Scene1", 2, "Title", "Introduction"),
            Record::new("Scene1", 4, "Clock", "12:00"),
        ]);
        set_filter(&mut state, &p, FilterMode::ExcludeExpressionDriven);
        assert_eq!(state.view, vec![0]);
        search(&mut state, &p, "clock");
        assert_eq!(state.view, vec![1]);
        search(&mut state, &p, "");
        set_filter(&mut state, &p, FilterMode::ShowAll);
        assert_eq!(state.view, vec![0, 1]);
    }

    #[test]
    fn select_out_of_range_clears() {
        let p = sample_provider();
        let mut state = AppState::default();
        state.store.replace_all(vec![Record::new("Scene1", 2, "Title", "x")]);
        state.refresh_view(&p);
        select(&mut state, 0);
        assert_eq!(state.selection, Some(0));
        select(&mut state, 5);
        assert_eq!(state.selection, None);
    }

    #[test]
    fn clear_log_empties_it() {
        let mut state = AppState::default();
        save_file(&mut state);
        assert_eq!(state.log.len(), 1);
        clear_log(&mut state);
        assert!(state.log.is_empty());
    }
}
