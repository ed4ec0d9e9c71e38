//! Key-binding widget: shows an instruction and reacts to one key binding
//! for as long as it is mounted.
//!
//! Mounting registers a single listener on a [`KeyEventSource`]; the
//! resulting [`Subscription`] is owned by the widget and released on
//! unmount, on re-mount teardown and on drop.

use crate::binding::KeyBinding;
use crate::clipboard::{read_payload, ClipboardSource};
use crate::config::{ConfigResult, WidgetConfig};
use crate::double_press::{DoublePressDetector, PressOutcome};
use crate::key::KeyEvent;
use crate::source::{KeyEventSource, Listener, Subscription};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Passed to the match handler each time the binding fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub event: KeyEvent,
    pub outcome: PressOutcome,
    /// Trimmed clipboard text, read only on a double press.
    pub clipboard: Option<String>,
}

/// Side effect run when the binding fires.
pub type MatchHandler = Arc<dyn Fn(&Trigger) + Send + Sync>;

/// Lifecycle state of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Unmounted,
    Mounted,
}

pub struct KeyBindingWidget {
    binding: KeyBinding,
    text: String,
    handler: MatchHandler,
    double_press_window_ms: u64,
    clipboard: Option<Arc<dyn ClipboardSource>>,
    subscription: Option<Subscription>,
}

impl KeyBindingWidget {
    /// Widget for `binding` whose side effect logs the default message.
    pub fn new(binding: KeyBinding) -> Self {
        let message = WidgetConfig::default().message;
        Self {
            binding,
            text: format!("Press {}", binding),
            handler: log_handler(message),
            double_press_window_ms: DoublePressDetector::default().window_ms(),
            clipboard: None,
            subscription: None,
        }
    }

    pub fn from_config(config: &WidgetConfig) -> ConfigResult<Self> {
        let binding = config.key_binding()?;
        Ok(Self::new(binding)
            .with_message(config.message.clone())
            .with_double_press_window(config.double_press_window_ms))
    }

    /// Replace the side effect with a tracing log of `message`.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        self.with_handler(log_handler(message.into()))
    }

    /// Replace the side effect. Takes effect on the next mount.
    pub fn with_handler(mut self, handler: MatchHandler) -> Self {
        self.handler = handler;
        self
    }

    pub fn with_double_press_window(mut self, window_ms: u64) -> Self {
        self.double_press_window_ms = window_ms;
        self
    }

    /// Read the clipboard on a double press. Takes effect on the next mount.
    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSource>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn binding(&self) -> KeyBinding {
        self.binding
    }

    /// The instruction text. Independent of the mount state.
    pub fn render(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> WidgetState {
        if self.subscription.is_some() {
            WidgetState::Mounted
        } else {
            WidgetState::Unmounted
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.state() == WidgetState::Mounted
    }

    /// Register a fresh listener on `source`.
    ///
    /// Returns `false` without registering anything if already mounted.
    pub fn mount(&mut self, source: &KeyEventSource) -> bool {
        if self.is_mounted() {
            debug!(binding = %self.binding, "Widget already mounted");
            return false;
        }

        let listener = self.build_listener();
        self.subscription = Some(source.subscribe(listener));
        info!(binding = %self.binding, "Widget mounted");
        true
    }

    /// Deregister the listener added by the last mount.
    ///
    /// Safe to call any number of times; returns `true` only when a
    /// listener was actually removed.
    pub fn unmount(&mut self) -> bool {
        let Some(mut subscription) = self.subscription.take() else {
            return false;
        };
        let removed = subscription.release();
        info!(binding = %self.binding, removed, "Widget unmounted");
        removed
    }

    /// Unmount if needed, then mount on `source` with a new listener.
    pub fn remount(&mut self, source: &KeyEventSource) -> bool {
        self.unmount();
        self.mount(source)
    }

    fn build_listener(&self) -> Listener {
        let binding = self.binding;
        let handler = self.handler.clone();
        let clipboard = self.clipboard.clone();
        // Fresh per activation, so a remount never sees an earlier press.
        let detector = Mutex::new(DoublePressDetector::new(self.double_press_window_ms));

        Arc::new(move |event: &KeyEvent| {
            if !binding.matches(event) {
                return;
            }
            let outcome = detector
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .press(event.timestamp_ms);
            let payload = match (&clipboard, outcome) {
                (Some(clipboard), PressOutcome::Double) => read_payload(clipboard.as_ref()),
                _ => None,
            };
            handler(&Trigger {
                event: *event,
                outcome,
                clipboard: payload,
            });
        })
    }
}

impl Drop for KeyBindingWidget {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn log_handler(message: String) -> MatchHandler {
    Arc::new(move |trigger: &Trigger| {
        info!(
            double = trigger.outcome == PressOutcome::Double,
            clipboard = trigger.clipboard.as_deref(),
            at_ms = trigger.event.timestamp_ms,
            "{}",
            message
        );
    })
}
