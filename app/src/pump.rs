//! Main-thread event pump.
//!
//! Pulls canonical key events from the hook and dispatches them on the
//! calling thread, so listeners always run where the widget lives.

use crossbeam_channel::{Receiver, RecvTimeoutError};
use hotkey_core::{DoublePressDetector, KeyBinding, KeyEvent, KeyEventSource, PressOutcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long one pump iteration waits for a key event.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Why the pump loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    QuitKey,
    Signal,
    HookStopped,
}

/// Decides whether a termination signal ends the app.
///
/// While the hook is alive, a terminal Ctrl+C shows up both as a key event
/// (already seen by the widget) and as SIGINT, so a lone signal is ignored
/// and only a second one inside the window quits. Without a live hook every
/// signal quits.
pub struct SignalGate {
    detector: DoublePressDetector,
}

impl SignalGate {
    pub fn new(window_ms: u64) -> Self {
        Self {
            detector: DoublePressDetector::new(window_ms),
        }
    }

    pub fn should_quit(&mut self, hook_alive: bool, now_ms: u64) -> bool {
        if !hook_alive || self.detector.window_ms() == 0 {
            return true;
        }
        self.detector.press(now_ms) == PressOutcome::Double
    }
}

/// Pump until the quit binding is pressed, a signal ends the app, or the
/// event channel closes. `hook_alive` reports whether the producer of
/// `events` is still running.
pub fn run(
    source: &KeyEventSource,
    events: &Receiver<KeyEvent>,
    hook_alive: impl Fn() -> bool,
    signals: &Receiver<()>,
    quit_binding: KeyBinding,
    mut gate: SignalGate,
) -> ExitReason {
    let quit = Arc::new(AtomicBool::new(false));
    let _quit_sub = {
        let quit = quit.clone();
        source.subscribe(Arc::new(move |event: &KeyEvent| {
            if quit_binding.matches(event) {
                quit.store(true, Ordering::SeqCst);
            }
        }))
    };
    let started = Instant::now();
    info!(quit = %quit_binding, "Event pump started");

    loop {
        match events.recv_timeout(POLL_INTERVAL) {
            Ok(event) => {
                source.dispatch(&event);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Keyboard hook channel closed");
                return ExitReason::HookStopped;
            }
        }

        if quit.load(Ordering::SeqCst) {
            info!("Quit binding pressed");
            return ExitReason::QuitKey;
        }

        for _ in signals.try_iter() {
            let now_ms = started.elapsed().as_millis() as u64;
            if gate.should_quit(hook_alive(), now_ms) {
                info!("Termination signal, shutting down");
                return ExitReason::Signal;
            }
            debug!("Ignoring single interrupt while the hook is running");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, unbounded};
    use hotkey_core::{KeyBindingWidget, KeyCode, Modifiers, Trigger};
    use std::sync::atomic::AtomicUsize;

    fn escape() -> KeyBinding {
        KeyBinding::key_only(KeyCode::Escape)
    }

    #[test]
    fn test_quit_binding_ends_pump() {
        let source = KeyEventSource::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let mut widget = {
            let hits = hits.clone();
            KeyBindingWidget::new(KeyBinding::default()).with_handler(Arc::new(
                move |_t: &Trigger| {
                    hits.fetch_add(1, Ordering::SeqCst);
                },
            ))
        };
        widget.mount(&source);

        let (event_tx, event_rx) = unbounded();
        let (_signal_tx, signal_rx) = bounded(1);
        event_tx
            .send(KeyEvent::press(KeyCode::C, Modifiers::CTRL))
            .unwrap();
        event_tx
            .send(KeyEvent::press(KeyCode::Escape, Modifiers::NONE))
            .unwrap();

        let reason = run(
            &source,
            &event_rx,
            || true,
            &signal_rx,
            escape(),
            SignalGate::new(1000),
        );
        assert_eq!(reason, ExitReason::QuitKey);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        // The pump's own quit listener is gone; only the widget's remains.
        assert_eq!(source.listener_count(), 1);
    }

    #[test]
    fn test_closed_hook_channel_stops_pump() {
        let source = KeyEventSource::new();
        let (event_tx, event_rx) = bounded::<KeyEvent>(4);
        let (_signal_tx, signal_rx) = bounded(1);
        drop(event_tx);

        let reason = run(
            &source,
            &event_rx,
            || false,
            &signal_rx,
            escape(),
            SignalGate::new(1000),
        );
        assert_eq!(reason, ExitReason::HookStopped);
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_signal_without_hook_ends_pump() {
        let source = KeyEventSource::new();
        let (_event_tx, event_rx) = bounded::<KeyEvent>(4);
        let (signal_tx, signal_rx) = bounded(1);
        signal_tx.send(()).unwrap();

        let reason = run(
            &source,
            &event_rx,
            || false,
            &signal_rx,
            escape(),
            SignalGate::new(1000),
        );
        assert_eq!(reason, ExitReason::Signal);
    }

    #[test]
    fn test_single_signal_ignored_while_hook_alive() {
        let mut gate = SignalGate::new(1000);
        assert!(!gate.should_quit(true, 0));
        assert!(!gate.should_quit(true, 5000));
        assert!(gate.should_quit(true, 5400));
    }

    #[test]
    fn test_signal_quits_without_hook() {
        let mut gate = SignalGate::new(1000);
        assert!(gate.should_quit(false, 0));
    }

    #[test]
    fn test_zero_window_quits_immediately() {
        let mut gate = SignalGate::new(0);
        assert!(gate.should_quit(true, 0));
    }
}
