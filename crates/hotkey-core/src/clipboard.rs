//! Clipboard access used when the binding is double-pressed.

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

/// Trait for reading clipboard text (implemented by hotkey-platform).
pub trait ClipboardSource: Send + Sync {
    fn read_text(&self) -> Result<String, ClipboardError>;
}

/// Clipboard text, trimmed. Blank or unreadable clipboards yield `None`.
pub fn read_payload(clipboard: &dyn ClipboardSource) -> Option<String> {
    match clipboard.read_text() {
        Ok(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Err(e) => {
            warn!("Failed to read clipboard: {}", e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory clipboard counting its reads.
    pub(crate) struct FakeClipboard {
        pub text: Result<String, ClipboardError>,
        pub reads: AtomicUsize,
    }

    impl FakeClipboard {
        pub(crate) fn with_text(text: &str) -> Self {
            Self {
                text: Ok(text.to_string()),
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl ClipboardSource for FakeClipboard {
        fn read_text(&self) -> Result<String, ClipboardError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.text.clone()
        }
    }

    #[test]
    fn test_payload_is_trimmed() {
        let clipboard = FakeClipboard::with_text("  copied text \n");
        assert_eq!(read_payload(&clipboard).as_deref(), Some("copied text"));
    }

    #[test]
    fn test_blank_payload_ignored() {
        assert_eq!(read_payload(&FakeClipboard::with_text("")), None);
        assert_eq!(read_payload(&FakeClipboard::with_text(" \t\n")), None);
    }

    #[test]
    fn test_read_error_is_none() {
        let clipboard = FakeClipboard {
            text: Err(ClipboardError("no display".into())),
            reads: AtomicUsize::new(0),
        };
        assert_eq!(read_payload(&clipboard), None);
        assert_eq!(clipboard.reads.load(Ordering::SeqCst), 1);
    }
}
