//! hotkey-core: key-event model, bindings and the key-binding widget.
//!
//! Design goal: keep this crate UI-agnostic and platform-agnostic.
//! Platform specific I/O (the OS keyboard hook) lives in `hotkey-platform`,
//! which converts native events into [`KeyEvent`] before they get here.

mod binding;
mod clipboard;
mod config;
mod double_press;
mod key;
mod source;
mod widget;

pub use binding::{BindingParseError, KeyBinding};
pub use clipboard::{read_payload, ClipboardError, ClipboardSource};
pub use config::{
    config_path, get_app_data_dir, load_config, load_config_from, save_config_to, ConfigError,
    ConfigResult, WidgetConfig, CONFIG_PATH_ENV,
};
pub use double_press::{DoublePressDetector, PressOutcome};
pub use key::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use source::{KeyEventSource, Listener, Subscription};
pub use widget::{KeyBindingWidget, MatchHandler, Trigger, WidgetState};
