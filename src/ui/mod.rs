// Terminal front-end: lesson browser on the left, text pane on the right, player at the bottom.
// Built with ratatui; crossterm does the raw mode / mouse plumbing.

mod app; // main loop, load results
pub mod mount; // which source is mounted, which fetches are still wanted
pub mod events; // keyboard/mouse mapping
pub mod navigation; // which lesson/sub-unit/sub-section is open
pub mod render; // pure drawing

pub use app::App;
pub use events::{AppEvent, EventHandler};
pub use navigation::{Navigator, PlayerRequest, Step, View};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

pub struct TerminalManager {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    _cleanup_guard: CleanupGuard,
}

/// Restores the terminal on every exit path, including an early `?` in `App::run`.
struct CleanupGuard;

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        // no stdout writes besides the escape sequences, the TUI may be mid-frame
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture, cursor::Show);
    }
}

impl TerminalManager {
    pub fn new() -> Result<Self> {
        // a previous crash may have left raw mode on
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);

        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        Ok(Self {
            terminal,
            _cleanup_guard: CleanupGuard,
        })
    }

    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for TerminalManager {
    fn drop(&mut self) {
        let _ = self.terminal.clear();
        let _ = self.terminal.show_cursor();
    }
}
