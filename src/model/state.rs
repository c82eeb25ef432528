use std::path::PathBuf;

use crate::model::activity::{ActivityLog, LogEntry};
use crate::model::config::Config;
use crate::model::record::{Record, RecordStore};
use crate::ops::view::{FilterMode, filtered_view};
use crate::provider::ElementProvider;

/// Everything the user-facing surfaces operate on.
///
/// Command handlers in [`crate::ops::commands`] take this explicitly; there
/// is no ambient state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: RecordStore,
    /// Visible records as indices into `store`
    pub view: Vec<usize>,
    pub filter_mode: FilterMode,
    pub query: String,
    pub combine_search_with_filter: bool,
    /// Record file chosen for import, if any
    pub selected_file: Option<PathBuf>,
    /// Selected record (index into `store`)
    pub selection: Option<usize>,
    pub log: ActivityLog,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::from_config(&Config::default())
    }
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        AppState {
            store: RecordStore::new(),
            view: Vec::new(),
            filter_mode: config.view.filter,
            query: String::new(),
            combine_search_with_filter: config.view.combine_search_with_filter,
            selected_file: None,
            selection: None,
            log: ActivityLog::new(config.log.capacity),
        }
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.selection.and_then(|i| self.store.get(i))
    }

    /// Position of the selection inside the visible list
    pub fn selected_view_position(&self) -> Option<usize> {
        let selected = self.selection?;
        self.view.iter().position(|&i| i == selected)
    }

    /// Append entries to the activity log and hand them back
    pub fn emit(&mut self, entries: Vec<LogEntry>) -> Vec<LogEntry> {
        self.log.extend(entries.iter().cloned());
        entries
    }

    /// Re-derive the visible list. A selection that is no longer visible is dropped.
    pub fn refresh_view(&mut self, provider: &dyn ElementProvider) {
        self.view = filtered_view(
            &self.store,
            provider,
            self.filter_mode,
            &self.query,
            self.combine_search_with_filter,
        );
        if let Some(selected) = self.selection
            && !self.view.contains(&selected)
        {
            self.selection = None;
        }
    }
}

/// Startup banner line
pub fn banner() -> LogEntry {
    LogEntry::info(format!(
        "============ Text IMP v{} ============",
        env!("CARGO_PKG_VERSION")
    ))
}
