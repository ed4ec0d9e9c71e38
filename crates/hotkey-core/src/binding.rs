//! Key bindings ("Ctrl+C") and accelerator-string parsing.

use crate::key::{KeyCode, KeyEvent, Modifiers};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingParseError {
    #[error("empty key binding")]
    Empty,
    #[error("no key specified (only modifiers): {0}")]
    NoKey(String),
    #[error("unknown key: {0}")]
    UnknownKey(String),
    #[error("more than one key in binding: {0}")]
    MultipleKeys(String),
}

/// A key plus the modifiers that must be held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub modifiers: Modifiers,
    pub code: KeyCode,
}

impl KeyBinding {
    pub fn new(modifiers: Modifiers, code: KeyCode) -> Self {
        Self { modifiers, code }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(Modifiers::CTRL, code)
    }

    pub fn key_only(code: KeyCode) -> Self {
        Self::new(Modifiers::NONE, code)
    }

    /// Whether `event` triggers this binding.
    ///
    /// Only presses match. Held modifiers beyond the required ones are
    /// allowed, so Ctrl+Shift+C still triggers Ctrl+C.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.is_press() && event.code == self.code && event.modifiers.contains(self.modifiers)
    }
}

impl Default for KeyBinding {
    fn default() -> Self {
        Self::ctrl(KeyCode::C)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, name) in [
            (m.ctrl, "Ctrl"),
            (m.alt, "Alt"),
            (m.shift, "Shift"),
            (m.meta, "Meta"),
        ] {
            if held {
                write!(f, "{}+", name)?;
            }
        }
        write!(f, "{}", self.code)
    }
}

impl FromStr for KeyBinding {
    type Err = BindingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(BindingParseError::Empty);
        }

        let mut modifiers = Modifiers::NONE;
        let mut code: Option<KeyCode> = None;

        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "meta" | "cmd" | "command" | "super" | "win" => modifiers.meta = true,
                _ => {
                    let key = KeyCode::from_name(part)
                        .ok_or_else(|| BindingParseError::UnknownKey(part.to_string()))?;
                    if code.replace(key).is_some() {
                        return Err(BindingParseError::MultipleKeys(s.to_string()));
                    }
                }
            }
        }

        code.map(|code| KeyBinding { modifiers, code })
            .ok_or_else(|| BindingParseError::NoKey(s.to_string()))
    }
}
