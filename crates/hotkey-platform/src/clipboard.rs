//! System clipboard access via `arboard`.

use hotkey_core::{ClipboardError, ClipboardSource};

fn clipboard_error(err: arboard::Error) -> ClipboardError {
    ClipboardError(err.to_string())
}

/// The OS clipboard. A connection is opened per read, since the
/// underlying handle is not shareable across threads on every platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSource for SystemClipboard {
    fn read_text(&self) -> Result<String, ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(clipboard_error)?;
        clipboard.get_text().map_err(clipboard_error)
    }
}
