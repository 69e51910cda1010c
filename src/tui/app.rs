use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::edit::{ColumnEditor, Focus};
use crate::model::{ColumnCatalog, EditorConfig, Pane};

use super::input;
use super::render;
use super::theme::Theme;

/// Host application state around one editor instance
pub struct App {
    pub editor: ColumnEditor,
    pub theme: Theme,
    /// Which pane the list cursor lives in
    pub focus_pane: Pane,
    /// Cursor row per pane
    pub available_cursor: usize,
    pub selected_cursor: usize,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(catalog: ColumnCatalog, config: &EditorConfig) -> Self {
        let theme = Theme::from_config(&config.ui);
        App {
            editor: ColumnEditor::new(catalog, config),
            theme,
            focus_pane: Pane::Available,
            available_cursor: 0,
            selected_cursor: 0,
            status_message: None,
            status_is_error: false,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn cursor(&self, pane: Pane) -> usize {
        match pane {
            Pane::Available => self.available_cursor,
            Pane::Selected => self.selected_cursor,
        }
    }

    pub fn cursor_mut(&mut self, pane: Pane) -> &mut usize {
        match pane {
            Pane::Available => &mut self.available_cursor,
            Pane::Selected => &mut self.selected_cursor,
        }
    }

    /// The column under the cursor in the focused pane
    pub fn focused(&self) -> Option<Focus> {
        let pane = self.focus_pane;
        let index = self.cursor(pane);
        let key = self.editor.arrangement().pane_keys(pane).get(index)?;
        Some(Focus {
            column_key: key.clone(),
            title: self.editor.catalog().title(key).to_string(),
            pane,
            index,
        })
    }

    /// Keep both cursors inside their panes after a mutation
    pub fn clamp_cursors(&mut self) {
        let available = self.editor.arrangement().pane_len(Pane::Available);
        let selected = self.editor.arrangement().pane_len(Pane::Selected);
        self.available_cursor = self.available_cursor.min(available.saturating_sub(1));
        self.selected_cursor = self.selected_cursor.min(selected.saturating_sub(1));
    }

    /// Surface the newest queued announcement on the status line
    pub fn pull_announcements(&mut self) {
        if let Some(last) = self.editor.drain_announcements().pop() {
            self.status_is_error = false;
            self.status_message = Some(last);
        }
    }
}

/// Run the TUI around the given catalog. On exit, prints the final
/// selected order as JSON to stdout for the host to capture.
pub fn run(catalog: ColumnCatalog, config: &EditorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(catalog, config);

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

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;

    // Final arrangement for the host to capture
    let snapshot = app.editor.arrangement().snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
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
