use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::cli::handlers::load_context;
use crate::cli::logging::{Fallback, init_logging};
use crate::io::scene_io::{read_scene, write_scene};
use crate::io::watcher::{FileEvent, SceneWatcher};
use crate::model::activity::LogEntry;
use crate::model::state::{AppState, banner};
use crate::ops::commands;
use crate::ops::view::search_regex;
use crate::provider::SceneProvider;

use super::input;
use super::render;
use super::theme::Theme;

/// How long watcher events are ignored after the app saved the scene itself
const OWN_WRITE_GRACE: Duration = Duration::from_millis(500);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a search query; the list narrows as you type
    Search,
    /// Editing the selected record's text
    Edit,
    /// Typing a file path
    Prompt(PromptKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    OpenRecords,
    Export,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::OpenRecords => "Open",
            PromptKind::Export => "Export to",
        }
    }
}

/// A single-line or multi-line text buffer with a byte cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub text: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        TextInput { text, cursor }
    }
}

/// Main application state
pub struct App {
    pub state: AppState,
    pub provider: SceneProvider,
    pub scene_path: Option<PathBuf>,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// First visible row of the record list
    pub scroll_offset: usize,
    pub edit: TextInput,
    pub prompt: TextInput,
    /// Query in effect before search mode was entered, restored on Esc
    pub search_before: String,
    /// Set when the app itself wrote the scene
    pub last_own_write: Option<Instant>,
}

impl App {
    pub fn new(state: AppState, provider: SceneProvider, scene_path: Option<PathBuf>, theme: Theme) -> Self {
        App {
            state,
            provider,
            scene_path,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            scroll_offset: 0,
            edit: TextInput::default(),
            prompt: TextInput::default(),
            search_before: String::new(),
            last_own_write: None,
        }
    }

    /// Regex used to highlight matches in the list
    pub fn active_search_re(&self) -> Option<Regex> {
        search_regex(&self.state.query)
    }

    /// Cursor position inside the visible list
    pub fn cursor(&self) -> Option<usize> {
        self.state.selected_view_position()
    }

    /// Move the selection by `delta` rows, clamped to the list
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.state.view.len();
        if len == 0 {
            return;
        }
        let target = match self.cursor() {
            Some(pos) => pos.saturating_add_signed(delta).min(len - 1),
            None if delta < 0 => len - 1,
            None => 0,
        };
        commands::select(&mut self.state, target);
    }

    pub fn jump_to(&mut self, position: usize) {
        if let Some(last) = self.state.view.len().checked_sub(1) {
            commands::select(&mut self.state, position.min(last));
        }
    }

    /// Default export file: timestamped, next to the scene document
    pub fn default_export_path(&self) -> PathBuf {
        let name = chrono::Local::now()
            .format("texts_%Y%m%d_%H%M%S.json")
            .to_string();
        match self.scene_path.as_deref().and_then(Path::parent) {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Persist provider changes to the scene document
    pub fn save_scene(&mut self) {
        if !self.provider.is_dirty() {
            return;
        }
        let Some(path) = self.scene_path.clone() else {
            return;
        };
        match write_scene(&path, self.provider.document()) {
            Ok(()) => {
                self.provider.mark_clean();
                self.last_own_write = Some(Instant::now());
            }
            Err(err) => self
                .state
                .log
                .append(LogEntry::error(format!("Could not save scene: {}", err))),
        }
    }

    /// Reload the scene document after an external change
    pub fn reload_scene(&mut self) {
        let Some(path) = self.scene_path.clone() else {
            return;
        };
        match read_scene(&path) {
            Ok(doc) => {
                self.provider.replace_document(doc);
                self.state.refresh_view(&self.provider);
                self.state
                    .log
                    .append(LogEntry::info("Scene changed on disk, reloaded"));
            }
            Err(err) => self
                .state
                .log
                .append(LogEntry::error(format!("Could not reload scene: {}", err))),
        }
    }

    /// React to file watcher events, ignoring the echo of our own saves
    pub fn handle_file_events(&mut self, events: Vec<FileEvent>) {
        if events.is_empty() {
            return;
        }
        if self
            .last_own_write
            .is_some_and(|at| at.elapsed() < OWN_WRITE_GRACE)
        {
            return;
        }
        self.reload_scene();
    }
}

/// Run the TUI application
pub fn run(config: Option<&str>, scene: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = load_context(config, scene)?;
    let log_file = ctx.loaded.log_file();
    init_logging(&ctx.loaded.config.log.level, log_file.as_deref(), Fallback::Discard)?;

    let mut state = AppState::from_config(&ctx.loaded.config);
    state.log.append(banner());
    let provider = match ctx.scene_path.as_deref() {
        Some(path) => SceneProvider::new(read_scene(path)?),
        None => {
            state.log.append(LogEntry::warning(
                "No scene document configured; set scene.path or pass --scene",
            ));
            SceneProvider::default()
        }
    };
    let theme = Theme::from_config(&ctx.loaded.config.ui);
    let watcher = match ctx.scene_path.as_deref().map(SceneWatcher::start) {
        Some(Ok(w)) => Some(w),
        Some(Err(err)) => {
            tracing::warn!(error = %err, "scene watcher unavailable");
            None
        }
        None => None,
    };

    let mut app = App::new(state, provider, ctx.scene_path.clone(), theme);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&SceneWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if let Some(w) = watcher {
            app.handle_file_events(w.poll());
        }

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
