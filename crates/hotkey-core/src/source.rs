//! Keyboard-event source: the registry listeners subscribe to.
//!
//! Listeners are invoked synchronously on whichever thread calls
//! [`KeyEventSource::dispatch`]. The registry lock is not held while they
//! run, so a listener may drop its own [`Subscription`] from inside the
//! callback.
//!
//! A process-wide instance is available through [`KeyEventSource::global`];
//! independent instances can be created for tests or embedding.

use crate::key::KeyEvent;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use tracing::{debug, trace};

/// A registered key-event callback.
pub type Listener = Arc<dyn Fn(&KeyEvent) + Send + Sync>;

static GLOBAL_SOURCE: OnceLock<KeyEventSource> = OnceLock::new();

#[derive(Default)]
struct Registry {
    listeners: Mutex<Vec<Listener>>,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, Vec<Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn contains(&self, listener: &Listener) -> bool {
        self.lock().iter().any(|l| Arc::ptr_eq(l, listener))
    }

    /// Remove exactly `listener` (by identity). Returns whether it was present.
    fn remove(&self, listener: &Listener) -> bool {
        let mut listeners = self.lock();
        match listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            Some(idx) => {
                listeners.swap_remove(idx);
                debug!(remaining = listeners.len(), "Listener removed");
                true
            }
            None => false,
        }
    }
}

/// Source of key events that listeners can subscribe to.
#[derive(Clone, Default)]
pub struct KeyEventSource {
    registry: Arc<Registry>,
}

impl KeyEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide source, created on first use.
    pub fn global() -> &'static KeyEventSource {
        GLOBAL_SOURCE.get_or_init(KeyEventSource::new)
    }

    /// Register `listener` and return the handle that owns the registration.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// released or dropped.
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        let mut listeners = self.registry.lock();
        listeners.push(listener.clone());
        debug!(listeners = listeners.len(), "Listener added");

        Subscription {
            registry: Arc::downgrade(&self.registry),
            listener: Some(listener),
        }
    }

    /// Deliver `event` to every listener registered at the time of the call.
    ///
    /// A listener deregistered by an earlier listener during the same
    /// dispatch is skipped. Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &KeyEvent) -> usize {
        let snapshot: Vec<Listener> = self.registry.lock().clone();
        trace!(?event, listeners = snapshot.len(), "Dispatching key event");
        let mut invoked = 0;
        for listener in &snapshot {
            if !self.registry.contains(listener) {
                continue;
            }
            listener(event);
            invoked += 1;
        }
        invoked
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.lock().len()
    }
}

/// Owned registration of one listener on a [`KeyEventSource`].
///
/// Dropping the handle deregisters the listener.
#[must_use = "dropping a Subscription immediately deregisters its listener"]
pub struct Subscription {
    registry: Weak<Registry>,
    listener: Option<Listener>,
}

impl Subscription {
    /// Deregister the listener.
    ///
    /// Returns `true` if this call removed it. Later calls (or a call after
    /// the source itself is gone) do nothing and return `false`.
    pub fn release(&mut self) -> bool {
        let Some(listener) = self.listener.take() else {
            return false;
        };
        match self.registry.upgrade() {
            Some(registry) => registry.remove(&listener),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{KeyCode, Modifiers};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_listener(counter: &Arc<AtomicUsize>) -> Listener {
        let counter = counter.clone();
        Arc::new(move |_event: &KeyEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn any_event() -> KeyEvent {
        KeyEvent::press(KeyCode::A, Modifiers::NONE)
    }

    #[test]
    fn test_subscribe_and_dispatch() {
        let source = KeyEventSource::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let _sub = source.subscribe(counting_listener(&hits));
        assert_eq!(source.listener_count(), 1);

        assert_eq!(source.dispatch(&any_event()), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_is_idempotent() {
        let source = KeyEventSource::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let mut sub = source.subscribe(counting_listener(&hits));
        assert!(sub.release());
        assert!(!sub.release());
        assert_eq!(source.listener_count(), 0);

        source.dispatch(&any_event());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_release_removes_only_own_listener() {
        let source = KeyEventSource::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        // Same closure body, distinct registrations.
        let mut a = source.subscribe(counting_listener(&first));
        let _b = source.subscribe(counting_listener(&second));

        a.release();
        assert_eq!(source.listener_count(), 1);

        source.dispatch(&any_event());
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_same_listener_registered_twice_released_once_each() {
        let source = KeyEventSource::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let listener = counting_listener(&hits);

        let mut a = source.subscribe(listener.clone());
        let mut b = source.subscribe(listener.clone());
        assert_eq!(source.listener_count(), 2);

        assert!(a.release());
        assert_eq!(source.listener_count(), 1);
        assert!(b.release());
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_drop_deregisters() {
        let source = KeyEventSource::new();
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let _sub = source.subscribe(counting_listener(&hits));
            assert_eq!(source.listener_count(), 1);
        }
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_release_after_source_dropped() {
        let source = KeyEventSource::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let mut sub = source.subscribe(counting_listener(&hits));
        drop(source);
        assert!(!sub.release());
    }

    #[test]
    fn test_listener_can_release_itself_during_dispatch() {
        let source = KeyEventSource::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let hits = Arc::new(AtomicUsize::new(0));

        let slot_clone = slot.clone();
        let hits_clone = hits.clone();
        let sub = source.subscribe(Arc::new(move |_event: &KeyEvent| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            slot_clone.lock().unwrap().take();
        }));
        *slot.lock().unwrap() = Some(sub);

        source.dispatch(&any_event());
        source.dispatch(&any_event());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_listener_released_earlier_in_dispatch_is_skipped() {
        let source = KeyEventSource::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let late_hits = Arc::new(AtomicUsize::new(0));

        let slot_clone = slot.clone();
        let _first = source.subscribe(Arc::new(move |_event: &KeyEvent| {
            slot_clone.lock().unwrap().take();
        }));
        let second = source.subscribe(counting_listener(&late_hits));
        *slot.lock().unwrap() = Some(second);

        assert_eq!(source.dispatch(&any_event()), 1);
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);
        assert_eq!(source.listener_count(), 1);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(KeyEventSource::global(), KeyEventSource::global()));
    }
}
