//! Key event module
//!
//! Maps crossterm terminal events onto the small key vocabulary widgets
//! understand.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A key (or terminal notification) delivered to the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Up arrow or `k`
    Up,
    /// Down arrow or `j`
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Home key
    Home,
    /// End key
    End,
    /// Space bar
    Space,
    /// Printable character input
    Char(char),
    /// Ctrl+D: submit multi-line input
    Submit,
    /// Ctrl+C: global interrupt
    Interrupt,
    /// Terminal resized to (columns, rows)
    Resize(u16, u16),
}

impl Key {
    /// Translate a crossterm event, ignoring events with no meaning here
    pub fn from_event(event: Event) -> Option<Self> {
        match event {
            Event::Key(key_event) => Self::from_key_event(key_event),
            Event::Resize(width, height) => Some(Key::Resize(width, height)),
            Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => None,
        }
    }

    /// Translate a crossterm key press
    pub fn from_key_event(key: KeyEvent) -> Option<Self> {
        // Ignore release/repeat reports from terminals that send them
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Key::Interrupt),
                KeyCode::Char('d') => Some(Key::Submit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Esc => Some(Key::Escape),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Tab => Some(Key::Tab),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Delete => Some(Key::Delete),
            KeyCode::Home => Some(Key::Home),
            KeyCode::End => Some(Key::End),
            KeyCode::Char(' ') => Some(Key::Space),
            KeyCode::Char(c) => Some(Key::Char(c)),
            _ => None,
        }
    }

    /// Cursor-up in list widgets
    pub fn is_up(&self) -> bool {
        matches!(self, Key::Up | Key::Char('k'))
    }

    /// Cursor-down in list widgets
    pub fn is_down(&self) -> bool {
        matches!(self, Key::Down | Key::Char('j'))
    }
}
