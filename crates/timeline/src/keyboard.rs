//! Keyboard shortcuts for the arrangement timeline.
//!
//! The engine does not bind physical keys; the input layer reports a logical
//! [`Key`] plus modifier state and [`KeyCommand::from_input`] maps it.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Delete,
    Backspace,
    ArrowLeft,
    ArrowRight,
    Escape,
    S,
    A,
    C,
    V,
    X,
    Y,
    Z,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Option<Key>,
    /// Cmd on macOS, Ctrl elsewhere.
    #[serde(default)]
    pub command: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key: Some(key),
            command: false,
            shift: false,
        }
    }

    pub fn command(key: Key) -> Self {
        Self {
            key: Some(key),
            command: true,
            shift: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Keyboard command
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommand {
    // Editing
    Delete,
    NudgeLeft,
    NudgeRight,
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,

    // Selection
    SelectAll,
    DeselectAll,

    ToggleSnap,
}

impl KeyCommand {
    /// Map a key press to a command, if it is bound to one.
    pub fn from_input(input: KeyInput) -> Option<Self> {
        let key = input.key?;
        let command = match key {
            Key::Delete | Key::Backspace if !input.command => Self::Delete,
            Key::ArrowLeft if !input.command && !input.shift => Self::NudgeLeft,
            Key::ArrowRight if !input.command && !input.shift => Self::NudgeRight,
            Key::Escape => Self::DeselectAll,
            Key::S if !input.command && !input.shift => Self::ToggleSnap,
            Key::Z if input.command && input.shift => Self::Redo,
            Key::Z if input.command => Self::Undo,
            Key::Y if input.command => Self::Redo,
            Key::C if input.command => Self::Copy,
            Key::X if input.command => Self::Cut,
            Key::V if input.command => Self::Paste,
            Key::A if input.command => Self::SelectAll,
            _ => return None,
        };
        Some(command)
    }

    /// Get human-readable description
    pub fn description(&self) -> &str {
        match self {
            Self::Delete => "Delete",
            Self::NudgeLeft => "Nudge Left",
            Self::NudgeRight => "Nudge Right",
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Copy => "Copy",
            Self::Cut => "Cut",
            Self::Paste => "Paste",
            Self::SelectAll => "Select All",
            Self::DeselectAll => "Deselect All",
            Self::ToggleSnap => "Toggle Snapping",
        }
    }

    /// Get keyboard shortcut display string
    pub fn shortcut(&self) -> String {
        let cmd = if cfg!(target_os = "macos") { "⌘" } else { "Ctrl+" };
        match self {
            Self::Delete => "Delete".to_string(),
            Self::NudgeLeft => "←".to_string(),
            Self::NudgeRight => "→".to_string(),
            Self::Undo => format!("{cmd}Z"),
            Self::Redo => format!("{cmd}Shift+Z"),
            Self::Copy => format!("{cmd}C"),
            Self::Cut => format!("{cmd}X"),
            Self::Paste => format!("{cmd}V"),
            Self::SelectAll => format!("{cmd}A"),
            Self::DeselectAll => "Esc".to_string(),
            Self::ToggleSnap => "S".to_string(),
        }
    }

    /// Get all commands for help display
    pub fn all() -> [Self; 11] {
        [
            Self::Delete,
            Self::NudgeLeft,
            Self::NudgeRight,
            Self::Undo,
            Self::Redo,
            Self::Copy,
            Self::Cut,
            Self::Paste,
            Self::SelectAll,
            Self::DeselectAll,
            Self::ToggleSnap,
        ]
    }
}
