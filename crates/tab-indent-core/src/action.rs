//! Key-press classification.
//!
//! Maps a key press to the indent action it requests, honoring the
//! trigger toggles from the settings.

use tab_indent_config::Settings;

/// The key identifier of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Tab,
    /// A key producing a single printable character.
    Char(char),
    /// Any other named key ("Enter", "ArrowLeft", ...).
    Named(String),
}

impl From<&str> for Key {
    /// Parses a DOM `KeyboardEvent.key` value.
    fn from(name: &str) -> Self {
        if name == "Tab" {
            return Self::Tab;
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::Char(c),
            _ => Self::Named(name.to_string()),
        }
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Cmd on macOS, Win elsewhere.
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };

    /// Ctrl or Cmd. Either one is accepted on every platform.
    pub fn accelerator(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key press as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: impl Into<Key>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

impl<'a> From<&'a str> for KeyPress {
    fn from(name: &'a str) -> Self {
        Self::new(name, Modifiers::NONE)
    }
}

/// What a key press asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentAction {
    Add,
    Remove,
    None,
}

/// Which key families may trigger indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerToggles {
    /// Tab / Shift+Tab.
    pub tab: bool,
    /// Accelerator+] / Accelerator+[.
    pub bracket: bool,
}

impl Default for TriggerToggles {
    fn default() -> Self {
        Self {
            tab: true,
            bracket: true,
        }
    }
}

impl From<&Settings> for TriggerToggles {
    fn from(settings: &Settings) -> Self {
        Self {
            tab: settings.enable_tab,
            bracket: settings.enable_bracket,
        }
    }
}

/// Tab with at most Shift held. Shift selects outdent.
fn classify_tab(modifiers: Modifiers) -> IndentAction {
    if modifiers.ctrl || modifiers.alt || modifiers.meta {
        return IndentAction::None;
    }
    if modifiers.shift {
        IndentAction::Remove
    } else {
        IndentAction::Add
    }
}

/// Accelerator+] or Accelerator+[ with no Shift or Alt.
fn classify_bracket(bracket: char, modifiers: Modifiers) -> IndentAction {
    if !modifiers.accelerator() || modifiers.shift || modifiers.alt {
        return IndentAction::None;
    }
    match bracket {
        ']' => IndentAction::Add,
        '[' => IndentAction::Remove,
        _ => IndentAction::None,
    }
}

/// Classifies a key press into an indent action.
pub fn classify(press: &KeyPress, toggles: TriggerToggles) -> IndentAction {
    match &press.key {
        Key::Tab if toggles.tab => classify_tab(press.modifiers),
        Key::Char(c) if toggles.bracket => classify_bracket(*c, press.modifiers),
        _ => IndentAction::None,
    }
}
