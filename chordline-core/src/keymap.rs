//! Keyboard bindings for the timeline.

use chordline_types::EditorAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Delete,
    Backspace,
    Enter,
    Escape,
    Tab,
    Left,
    Right,
    Up,
    Down,
}

/// Modifier key state. `ctrl` also stands for the platform command key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const fn none() -> Self {
        Self {
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub const fn ctrl() -> Self {
        Self {
            ctrl: true,
            alt: false,
            shift: false,
        }
    }

    pub const fn ctrl_shift() -> Self {
        Self {
            ctrl: true,
            alt: false,
            shift: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    /// A text input has focus; timeline bindings are suspended.
    pub text_focus: bool,
}

impl KeyEvent {
    pub fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            text_focus: false,
        }
    }

    pub fn in_text_field(mut self) -> Self {
        self.text_focus = true;
        self
    }
}

/// Action bound to `event`, if any.
pub fn action_for_key(event: &KeyEvent) -> Option<EditorAction> {
    if event.text_focus {
        return None;
    }
    let m = event.modifiers;
    if m.ctrl {
        let KeyCode::Char(c) = event.key else {
            return None;
        };
        return match c.to_ascii_lowercase() {
            'z' if m.shift => Some(EditorAction::Redo),
            'z' => Some(EditorAction::Undo),
            'y' => Some(EditorAction::Redo),
            'c' => Some(EditorAction::Copy),
            'v' => Some(EditorAction::PasteAtPointer),
            'a' => Some(EditorAction::SelectAll),
            _ => None,
        };
    }
    match event.key {
        KeyCode::Delete => Some(EditorAction::DeleteSelected),
        KeyCode::Char(c) if !m.alt && ('a'..='g').contains(&c.to_ascii_lowercase()) => {
            Some(EditorAction::AddNote(c.to_ascii_uppercase()))
        }
        _ => None,
    }
}
