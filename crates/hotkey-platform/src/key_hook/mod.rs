//! Global keyboard hook.
//!
//! The hook runs on its own thread and never calls listeners itself: it
//! converts each native event into a [`KeyEvent`] and queues it. The owner
//! of the [`KeyHookHandle`] pulls events and dispatches them on its own
//! thread.

use crate::error::PlatformError;
use crossbeam_channel::{bounded, Receiver, Sender};
use hotkey_core::KeyEvent;
use std::thread::{self, JoinHandle};

mod rdev_impl;

pub use rdev_impl::ModifierTracker;

/// Capacity of the hook-to-owner event queue.
const EVENT_QUEUE_CAPACITY: usize = 1024;

/// Handle to control the keyboard hook.
pub struct KeyHookHandle {
    event_rx: Receiver<KeyEvent>,
    error_rx: Receiver<PlatformError>,
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl KeyHookHandle {
    /// Queue of converted key events. Disconnects once the hook thread exits.
    pub fn events(&self) -> &Receiver<KeyEvent> {
        &self.event_rx
    }

    /// The error that terminated the hook thread, if any.
    pub fn take_error(&self) -> Option<PlatformError> {
        self.error_rx.try_recv().ok()
    }

    /// Signal the hook to stop forwarding events.
    pub fn stop(&self) {
        let _ = self.stop_tx.try_send(());
    }

    /// Check if the hook thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for KeyHookHandle {
    fn drop(&mut self) {
        self.stop();
        // Don't join: the native listen call blocks for the life of the
        // process. The callback goes quiet once it sees the stop signal.
        let _ = self.thread.take();
    }
}

/// Start capturing global keyboard events.
///
/// Returns a handle that can be used to receive events and stop the hook.
pub fn start_key_hook() -> KeyHookHandle {
    let (event_tx, event_rx) = bounded(EVENT_QUEUE_CAPACITY);
    let (error_tx, error_rx) = bounded(1);
    let (stop_tx, stop_rx) = bounded(1);

    let thread = thread::spawn(move || {
        rdev_impl::start_hook(event_tx, error_tx, stop_rx);
    });

    KeyHookHandle {
        event_rx,
        error_rx,
        stop_tx,
        thread: Some(thread),
    }
}
