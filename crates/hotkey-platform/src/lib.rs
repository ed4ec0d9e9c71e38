//! hotkey-platform: platform-specific I/O boundary for hotkey.
//!
//! This crate provides:
//! - A global keyboard hook via `rdev`, delivering canonical
//!   [`hotkey_core::KeyEvent`]s over a channel
//! - Termination-signal handling via `ctrlc`
//! - Clipboard reads via `arboard`
//!
//! ## Module Structure
//!
//! - `clipboard` - System clipboard reader
//! - `error` - Common error types
//! - `key_hook` - Global keyboard hook and native key conversion
//! - `signal` - Ctrl-C / termination signal forwarding

mod clipboard;
mod error;
mod key_hook;
mod signal;

// Re-export clipboard reader
pub use clipboard::SystemClipboard;

// Re-export error types
pub use error::{PlatformError, PlatformResult};

// Re-export keyboard hook
pub use key_hook::{start_key_hook, KeyHookHandle, ModifierTracker};

// Re-export signal handling
pub use signal::{install_signal_handler, SignalReceiver};
