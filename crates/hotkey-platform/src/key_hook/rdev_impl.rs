//! rdev-based keyboard hook and native-to-canonical key conversion.

use crate::error::PlatformError;
use crossbeam_channel::{Receiver, Sender};
use hotkey_core::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
use rdev::{listen, Event, EventType, Key};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Tracks which modifier keys are held, from the stream of press/release events.
///
/// Left and right keys are tracked separately so releasing one Ctrl while
/// the other is still down keeps Ctrl held.
#[derive(Debug, Clone, Default)]
pub struct ModifierTracker {
    ctrl_left: bool,
    ctrl_right: bool,
    shift_left: bool,
    shift_right: bool,
    alt: bool,
    alt_gr: bool,
    meta_left: bool,
    meta_right: bool,
}

impl ModifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state for `code`. Non-modifier keys are ignored.
    pub fn update(&mut self, code: KeyCode, kind: KeyEventKind) {
        let down = kind == KeyEventKind::Press;
        let slot = match code {
            KeyCode::ControlLeft => &mut self.ctrl_left,
            KeyCode::ControlRight => &mut self.ctrl_right,
            KeyCode::ShiftLeft => &mut self.shift_left,
            KeyCode::ShiftRight => &mut self.shift_right,
            KeyCode::Alt => &mut self.alt,
            KeyCode::AltGr => &mut self.alt_gr,
            KeyCode::MetaLeft => &mut self.meta_left,
            KeyCode::MetaRight => &mut self.meta_right,
            _ => return,
        };
        *slot = down;
    }

    pub fn current(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl_left || self.ctrl_right,
            shift: self.shift_left || self.shift_right,
            alt: self.alt || self.alt_gr,
            meta: self.meta_left || self.meta_right,
        }
    }

    /// Update with one event and produce it in canonical form.
    pub fn observe(&mut self, code: KeyCode, kind: KeyEventKind, timestamp_ms: u64) -> KeyEvent {
        self.update(code, kind);
        KeyEvent {
            code,
            modifiers: self.current(),
            kind,
            timestamp_ms,
        }
    }
}

/// Convert an rdev event into a canonical key event. Mouse events yield `None`.
fn convert_event(
    tracker: &mut ModifierTracker,
    event_type: &EventType,
    timestamp_ms: u64,
) -> Option<KeyEvent> {
    let (key, kind) = match event_type {
        EventType::KeyPress(key) => (*key, KeyEventKind::Press),
        EventType::KeyRelease(key) => (*key, KeyEventKind::Release),
        _ => return None,
    };
    Some(tracker.observe(convert_key(key), kind, timestamp_ms))
}

/// Start the keyboard hook using rdev.
pub fn start_hook(
    event_tx: Sender<KeyEvent>,
    error_tx: Sender<PlatformError>,
    stop_rx: Receiver<()>,
) {
    info!("Keyboard hook thread started (rdev)");
    let start_time = Instant::now();
    let mut tracker = ModifierTracker::new();
    let mut stopped = false;

    let callback = move |event: Event| {
        if stopped {
            return;
        }
        // Check for stop signal
        if stop_rx.try_recv().is_ok() {
            info!("Keyboard hook received stop signal");
            stopped = true;
            return;
        }

        let timestamp_ms = start_time.elapsed().as_millis() as u64;
        if let Some(key_event) = convert_event(&mut tracker, &event.event_type, timestamp_ms) {
            debug!(?key_event, "Key event captured");
            if let Err(e) = event_tx.try_send(key_event) {
                warn!("Failed to queue key event: {}", e);
            }
        }
    };

    if let Err(error) = listen(callback) {
        error!(?error, "Keyboard hook error");
        let _ = error_tx.try_send(PlatformError::Hook(format!("{:?}", error)));
    }

    info!("Keyboard hook thread exiting");
}

/// Map an rdev key to the canonical key code.
///
/// Keys without a canonical variant become `Other(0)`, except rdev's own
/// `Unknown(code)` which keeps its native code.
fn convert_key(key: Key) -> KeyCode {
    match key {
        Key::KeyA => KeyCode::A,
        Key::KeyB => KeyCode::B,
        Key::KeyC => KeyCode::C,
        Key::KeyD => KeyCode::D,
        Key::KeyE => KeyCode::E,
        Key::KeyF => KeyCode::F,
        Key::KeyG => KeyCode::G,
        Key::KeyH => KeyCode::H,
        Key::KeyI => KeyCode::I,
        Key::KeyJ => KeyCode::J,
        Key::KeyK => KeyCode::K,
        Key::KeyL => KeyCode::L,
        Key::KeyM => KeyCode::M,
        Key::KeyN => KeyCode::N,
        Key::KeyO => KeyCode::O,
        Key::KeyP => KeyCode::P,
        Key::KeyQ => KeyCode::Q,
        Key::KeyR => KeyCode::R,
        Key::KeyS => KeyCode::S,
        Key::KeyT => KeyCode::T,
        Key::KeyU => KeyCode::U,
        Key::KeyV => KeyCode::V,
        Key::KeyW => KeyCode::W,
        Key::KeyX => KeyCode::X,
        Key::KeyY => KeyCode::Y,
        Key::KeyZ => KeyCode::Z,
        Key::Num0 => KeyCode::Num0,
        Key::Num1 => KeyCode::Num1,
        Key::Num2 => KeyCode::Num2,
        Key::Num3 => KeyCode::Num3,
        Key::Num4 => KeyCode::Num4,
        Key::Num5 => KeyCode::Num5,
        Key::Num6 => KeyCode::Num6,
        Key::Num7 => KeyCode::Num7,
        Key::Num8 => KeyCode::Num8,
        Key::Num9 => KeyCode::Num9,
        Key::F1 => KeyCode::F1,
        Key::F2 => KeyCode::F2,
        Key::F3 => KeyCode::F3,
        Key::F4 => KeyCode::F4,
        Key::F5 => KeyCode::F5,
        Key::F6 => KeyCode::F6,
        Key::F7 => KeyCode::F7,
        Key::F8 => KeyCode::F8,
        Key::F9 => KeyCode::F9,
        Key::F10 => KeyCode::F10,
        Key::F11 => KeyCode::F11,
        Key::F12 => KeyCode::F12,
        Key::Space => KeyCode::Space,
        Key::Return | Key::KpReturn => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
        Key::Tab => KeyCode::Tab,
        Key::Backspace => KeyCode::Backspace,
        Key::Delete => KeyCode::Delete,
        Key::Insert => KeyCode::Insert,
        Key::Home => KeyCode::Home,
        Key::End => KeyCode::End,
        Key::PageUp => KeyCode::PageUp,
        Key::PageDown => KeyCode::PageDown,
        Key::UpArrow => KeyCode::Up,
        Key::DownArrow => KeyCode::Down,
        Key::LeftArrow => KeyCode::Left,
        Key::RightArrow => KeyCode::Right,
        Key::ControlLeft => KeyCode::ControlLeft,
        Key::ControlRight => KeyCode::ControlRight,
        Key::ShiftLeft => KeyCode::ShiftLeft,
        Key::ShiftRight => KeyCode::ShiftRight,
        Key::Alt => KeyCode::Alt,
        Key::AltGr => KeyCode::AltGr,
        Key::MetaLeft => KeyCode::MetaLeft,
        Key::MetaRight => KeyCode::MetaRight,
        Key::Unknown(code) => KeyCode::Other(code),
        _ => KeyCode::Other(0),
    }
}
