use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Rect;
use std::time::Duration;

/// How far Left/Right move the playhead, as a fraction of the recording.
pub const SEEK_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    Quit,
    ToggleHelp,

    // Navigation
    Up,
    Down,
    Enter,
    Back,
    Home,
    PreviousSubUnit,
    NextSubUnit,

    // Player
    TogglePlay,
    Restart,
    CycleLoop,
    CycleSpeed,
    /// Absolute seek, fraction of the duration.
    SeekTo(f64),
    /// Relative seek, fraction of the duration.
    SeekBy(f64),
}

/// Reads terminal input without blocking the UI loop. Mouse clicks only mean
/// something on the seek bar, so the handler remembers where it was last drawn.
#[derive(Debug, Default)]
pub struct EventHandler {
    gauge_area: Option<Rect>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_gauge_area(&mut self, area: Option<Rect>) {
        self.gauge_area = area;
    }

    /// Waits at most `timeout` for input. Read errors are treated as "nothing happened".
    pub fn poll(&self, timeout: Duration) -> Option<AppEvent> {
        if !event::poll(timeout).unwrap_or(false) {
            return None;
        }

        match event::read().ok()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key_to_app_event(key),
            Event::Mouse(mouse) => {
                let area = self.gauge_area?;
                mouse_seek_fraction(mouse, area).map(AppEvent::SeekTo)
            }
            _ => None,
        }
    }
}

pub fn key_to_app_event(key: KeyEvent) -> Option<AppEvent> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppEvent::Quit),
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(AppEvent::Quit),
        // '?' arrives with SHIFT on most layouts
        (KeyCode::Char('?'), _) => Some(AppEvent::ToggleHelp),

        (KeyCode::Up, _) => Some(AppEvent::Up),
        (KeyCode::Down, _) => Some(AppEvent::Down),
        (KeyCode::Enter, _) => Some(AppEvent::Enter),
        (KeyCode::Backspace, _) => Some(AppEvent::Back),
        (KeyCode::Char('h'), KeyModifiers::NONE) => Some(AppEvent::Home),
        (KeyCode::Char('['), _) => Some(AppEvent::PreviousSubUnit),
        (KeyCode::Char(']'), _) => Some(AppEvent::NextSubUnit),

        (KeyCode::Char(' '), _) => Some(AppEvent::TogglePlay),
        (KeyCode::Char('r'), KeyModifiers::NONE) => Some(AppEvent::Restart),
        (KeyCode::Char('l'), KeyModifiers::NONE) => Some(AppEvent::CycleLoop),
        (KeyCode::Char('s'), KeyModifiers::NONE) => Some(AppEvent::CycleSpeed),
        (KeyCode::Left, _) => Some(AppEvent::SeekBy(-SEEK_STEP)),
        (KeyCode::Right, _) => Some(AppEvent::SeekBy(SEEK_STEP)),
        (KeyCode::Char(c), KeyModifiers::NONE) if c.is_ascii_digit() => {
            c.to_digit(10).map(|tenth| AppEvent::SeekTo(tenth as f64 / 10.0))
        }

        _ => None,
    }
}

/// Maps a left click inside the seek bar to a fraction of its width.
pub fn mouse_seek_fraction(mouse: MouseEvent, gauge: Rect) -> Option<f64> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || gauge.width == 0 {
        return None;
    }

    let inside_x = mouse.column >= gauge.x && mouse.column < gauge.x + gauge.width;
    let inside_y = mouse.row >= gauge.y && mouse.row < gauge.y + gauge.height;
    if !(inside_x && inside_y) {
        return None;
    }

    let offset = (mouse.column - gauge.x) as f64;
    Some((offset / gauge.width as f64).clamp(0.0, 1.0))
}
