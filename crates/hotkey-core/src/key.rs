//! Canonical key-event model.
//!
//! Every platform event is converted into [`KeyEvent`] at the platform
//! boundary; nothing past that boundary sees native key types.

use std::fmt;

/// Physical key identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    ControlLeft,
    ControlRight,
    ShiftLeft,
    ShiftRight,
    Alt,
    AltGr,
    MetaLeft,
    MetaRight,
    /// Anything without a dedicated variant, carrying the native code.
    Other(u32),
}

const LETTERS: [KeyCode; 26] = [
    KeyCode::A,
    KeyCode::B,
    KeyCode::C,
    KeyCode::D,
    KeyCode::E,
    KeyCode::F,
    KeyCode::G,
    KeyCode::H,
    KeyCode::I,
    KeyCode::J,
    KeyCode::K,
    KeyCode::L,
    KeyCode::M,
    KeyCode::N,
    KeyCode::O,
    KeyCode::P,
    KeyCode::Q,
    KeyCode::R,
    KeyCode::S,
    KeyCode::T,
    KeyCode::U,
    KeyCode::V,
    KeyCode::W,
    KeyCode::X,
    KeyCode::Y,
    KeyCode::Z,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Num0,
    KeyCode::Num1,
    KeyCode::Num2,
    KeyCode::Num3,
    KeyCode::Num4,
    KeyCode::Num5,
    KeyCode::Num6,
    KeyCode::Num7,
    KeyCode::Num8,
    KeyCode::Num9,
];

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
];

impl KeyCode {
    /// Letter key for an ASCII letter, case-insensitive.
    pub fn from_letter(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            let idx = (c.to_ascii_uppercase() as u8 - b'A') as usize;
            Some(LETTERS[idx])
        } else {
            None
        }
    }

    /// Digit key for an ASCII digit.
    pub fn from_digit(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| DIGITS[d as usize])
    }

    /// Look up a key by its user-facing name (case-insensitive).
    ///
    /// Accepts every name produced by [`fmt::Display`] (including
    /// `Other(n)`), plus a few common aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_letter(c).or_else(|| Self::from_digit(c));
        }

        let lower = name.to_ascii_lowercase();
        if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
            return (1..=12).contains(&n).then(|| FUNCTION_KEYS[n - 1]);
        }
        if let Some(code) = lower
            .strip_prefix("other(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return code.trim().parse().ok().map(KeyCode::Other);
        }

        let key = match lower.as_str() {
            "space" => KeyCode::Space,
            "enter" | "return" => KeyCode::Enter,
            "escape" | "esc" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "insert" | "ins" => KeyCode::Insert,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "controlleft" | "ctrlleft" => KeyCode::ControlLeft,
            "controlright" | "ctrlright" => KeyCode::ControlRight,
            "shiftleft" => KeyCode::ShiftLeft,
            "shiftright" => KeyCode::ShiftRight,
            "alt" => KeyCode::Alt,
            "altgr" => KeyCode::AltGr,
            "metaleft" => KeyCode::MetaLeft,
            "metaright" => KeyCode::MetaRight,
            _ => return None,
        };
        Some(key)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyCode::Space => "Space",
            KeyCode::Enter => "Enter",
            KeyCode::Escape => "Escape",
            KeyCode::Tab => "Tab",
            KeyCode::Backspace => "Backspace",
            KeyCode::Delete => "Delete",
            KeyCode::Insert => "Insert",
            KeyCode::Home => "Home",
            KeyCode::End => "End",
            KeyCode::PageUp => "PageUp",
            KeyCode::PageDown => "PageDown",
            KeyCode::Up => "Up",
            KeyCode::Down => "Down",
            KeyCode::Left => "Left",
            KeyCode::Right => "Right",
            KeyCode::ControlLeft => "ControlLeft",
            KeyCode::ControlRight => "ControlRight",
            KeyCode::ShiftLeft => "ShiftLeft",
            KeyCode::ShiftRight => "ShiftRight",
            KeyCode::Alt => "Alt",
            KeyCode::AltGr => "AltGr",
            KeyCode::MetaLeft => "MetaLeft",
            KeyCode::MetaRight => "MetaRight",
            KeyCode::Other(code) => return write!(f, "Other({})", code),
            key => {
                if let Some(i) = LETTERS.iter().position(|k| k == key) {
                    return write!(f, "{}", (b'A' + i as u8) as char);
                }
                if let Some(i) = DIGITS.iter().position(|k| k == key) {
                    return write!(f, "{}", i);
                }
                let i = FUNCTION_KEYS.iter().position(|k| k == key).unwrap_or(0);
                return write!(f, "F{}", i + 1);
            }
        };
        f.write_str(name)
    }
}

/// Modifier keys held while an event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
        meta: false,
    };

    /// True if every modifier set in `required` is also set in `self`.
    pub fn contains(self, required: Modifiers) -> bool {
        (!required.ctrl || self.ctrl)
            && (!required.shift || self.shift)
            && (!required.alt || self.alt)
            && (!required.meta || self.meta)
    }

    pub fn is_empty(self) -> bool {
        self == Modifiers::NONE
    }
}

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// A keyboard event in canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
    /// Milliseconds since the producing hook started.
    pub timestamp_ms: u64,
}

impl KeyEvent {
    pub fn press(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            timestamp_ms: 0,
        }
    }

    pub fn release(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            kind: KeyEventKind::Release,
            timestamp_ms: 0,
        }
    }

    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn is_press(&self) -> bool {
        self.kind == KeyEventKind::Press
    }
}
