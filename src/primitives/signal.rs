// ============================================================================
// spark-pulse - Signal
// Keyed, synchronous, multi-listener emitter
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::core::types::{SignalListener, UnsubscribeFn};

type Registry<T> = RefCell<HashMap<String, Vec<SignalListener<T>>>>;

// =============================================================================
// SIGNAL<T> - The public emitter handle
// =============================================================================

/// A keyed event emitter.
///
/// Listeners are grouped by string key and run synchronously, in
/// registration order, every time a value is emitted on their key.
/// Cloning a `Signal` yields another handle to the same registry.
///
/// # Example
///
/// ```
/// use spark_pulse::signal;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let clicks = signal::<u32>();
/// let total = Rc::new(Cell::new(0));
///
/// let unsubscribe = clicks.subscribe("button", {
///     let total = total.clone();
///     move |n: &u32| total.set(total.get() + n)
/// });
///
/// clicks.emit("button", &2);
/// clicks.emit("button", &3);
/// assert_eq!(total.get(), 5);
///
/// unsubscribe();
/// clicks.emit("button", &10);
/// assert_eq!(total.get(), 5);
/// ```
pub struct Signal<T> {
    listeners: Rc<Registry<T>>,
}

impl<T: 'static> Signal<T> {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Register `listener` under `key`.
    ///
    /// The returned function removes **every** listener under `key`, not
    /// only this one. It holds a weak reference to the registry, so it can
    /// be called any number of times and does nothing once the emitter is
    /// gone.
    pub fn subscribe<F>(&self, key: impl Into<String>, listener: F) -> UnsubscribeFn
    where
        F: Fn(&T) + 'static,
    {
        let key = key.into();
        let count = {
            let mut map = self.listeners.borrow_mut();
            let entry = map.entry(key.clone()).or_default();
            entry.push(Rc::new(listener));
            entry.len()
        };
        tracing::trace!(key = %key, listeners = count, "subscribe");

        let registry = Rc::downgrade(&self.listeners);
        Box::new(move || {
            if let Some(registry) = registry.upgrade() {
                remove_key(&registry, &key);
            }
        })
    }

    /// Remove every listener registered under `key`. No-op for unknown keys.
    pub fn unsubscribe_by_key(&self, key: &str) {
        remove_key(&self.listeners, key);
    }

    /// Invoke every listener under `key` with `data`, in registration order.
    ///
    /// Listeners are snapshotted first, so they may subscribe, unsubscribe
    /// or emit re-entrantly; such changes apply from the next `emit`.
    /// A panicking listener is not caught and the rest of the round is
    /// skipped.
    pub fn emit(&self, key: &str, data: &T) {
        let Some(snapshot) = self.listeners.borrow().get(key).cloned() else {
            return;
        };
        tracing::trace!(key, listeners = snapshot.len(), "emit");

        for listener in &snapshot {
            listener(data);
        }
    }

    /// Number of listeners currently registered under `key`.
    pub fn listener_count(&self, key: &str) -> usize {
        self.listeners.borrow().get(key).map_or(0, Vec::len)
    }

    /// Whether `key` has an entry.
    pub fn has_listeners(&self, key: &str) -> bool {
        self.listeners.borrow().contains_key(key)
    }

    /// All keys with an entry, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.listeners.borrow().keys().cloned().collect()
    }

    /// Whether no key has an entry.
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

fn remove_key<T>(registry: &Registry<T>, key: &str) {
    // Bind first so the RefMut is released before the closures are dropped.
    let removed = registry.borrow_mut().remove(key);
    if let Some(listeners) = removed {
        tracing::trace!(key, listeners = listeners.len(), "unsubscribe");
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let map = self.listeners.borrow();
        f.debug_struct("Signal")
            .field("keys", &map.len())
            .field("listeners", &map.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

/// Create an empty [`Signal`].
pub fn signal<T: 'static>() -> Signal<T> {
    Signal::new()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Box<dyn Fn(&i32)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = log.clone();
            move |tag: &'static str| -> Box<dyn Fn(&i32)> {
                let log = log.clone();
                Box::new(move |v: &i32| log.borrow_mut().push(format!("{tag}:{v}")))
            }
        };
        (log, make)
    }

    #[test]
    fn emit_invokes_listener_once_with_data() {
        let s = signal::<i32>();
        let (log, make) = recorder();
        let l = make("a");
        let _unsub = s.subscribe("k", move |v| l(v));

        s.emit("k", &7);
        assert_eq!(*log.borrow(), vec!["a:7"]);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let s = signal::<i32>();
        let (log, make) = recorder();
        for tag in ["first", "second", "third"] {
            let l = make(tag);
            let _ = s.subscribe("k", move |v| l(v));
        }

        s.emit("k", &1);
        assert_eq!(*log.borrow(), vec!["first:1", "second:1", "third:1"]);
    }

    #[test]
    fn unsubscribe_removes_whole_key() {
        let s = signal::<i32>();
        let hits = Rc::new(Cell::new(0));

        let unsub_one = s.subscribe("k", {
            let hits = hits.clone();
            move |_| hits.set(hits.get() + 1)
        });
        let _unsub_two = s.subscribe("k", {
            let hits = hits.clone();
            move |_| hits.set(hits.get() + 10)
        });
        assert_eq!(s.listener_count("k"), 2);

        unsub_one();
        assert!(!s.has_listeners("k"));
        assert!(s.is_empty());

        s.emit("k", &0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn unsubscribe_leaves_other_keys() {
        let s = signal::<i32>();
        let unsub_a = s.subscribe("a", |_| {});
        let _unsub_b = s.subscribe("b", |_| {});

        unsub_a();
        assert_eq!(s.keys(), vec!["b".to_string()]);
    }

    #[test]
    fn emit_unknown_key_is_noop() {
        let s = signal::<i32>();
        s.emit("nobody", &1);
        assert!(s.is_empty());
    }

    #[test]
    fn unsubscribe_by_key_is_idempotent() {
        let s = signal::<i32>();
        let _ = s.subscribe("k", |_| {});
        s.unsubscribe_by_key("k");
        s.unsubscribe_by_key("k");
        s.unsubscribe_by_key("never");
        assert!(s.is_empty());
    }

    #[test]
    fn unsubscribe_fn_is_reusable_and_weak() {
        let s = signal::<i32>();
        let unsub = s.subscribe("k", |_| {});
        unsub();
        unsub();

        let _ = s.subscribe("k", |_| {});
        // Same key subscribed again: the old closure still targets it.
        unsub();
        assert!(!s.has_listeners("k"));

        let late = s.subscribe("k", |_| {});
        drop(s);
        late();
    }

    #[test]
    fn clones_share_registry() {
        let s = signal::<i32>();
        let other = s.clone();
        let hits = Rc::new(Cell::new(0));
        let _ = other.subscribe("k", {
            let hits = hits.clone();
            move |v| hits.set(hits.get() + v)
        });

        s.emit("k", &4);
        assert_eq!(hits.get(), 4);
    }

    #[test]
    fn reentrant_subscribe_applies_next_round() {
        let s = signal::<i32>();
        let hits = Rc::new(Cell::new(0));

        let _ = s.subscribe("k", {
            let s = s.clone();
            let hits = hits.clone();
            move |_| {
                let hits = hits.clone();
                let _ = s.subscribe("k", move |_| hits.set(hits.get() + 1));
            }
        });

        s.emit("k", &0);
        assert_eq!(hits.get(), 0);
        assert_eq!(s.listener_count("k"), 2);

        s.emit("k", &0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn reentrant_emit_on_other_key() {
        let s = signal::<i32>();
        let seen = Rc::new(Cell::new(0));

        let _ = s.subscribe("inner", {
            let seen = seen.clone();
            move |v| seen.set(*v)
        });
        let _ = s.subscribe("outer", {
            let s = s.clone();
            move |v| s.emit("inner", &(v * 2))
        });

        s.emit("outer", &21);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn panicking_listener_aborts_round() {
        let s = signal::<i32>();
        let after = Rc::new(Cell::new(false));

        let _ = s.subscribe("k", |_| panic!("listener failed"));
        let _ = s.subscribe("k", {
            let after = after.clone();
            move |_| after.set(true)
        });

        let result = catch_unwind(AssertUnwindSafe(|| s.emit("k", &1)));
        assert!(result.is_err());
        assert!(!after.get());
        // registry untouched by the failure
        assert_eq!(s.listener_count("k"), 2);
    }

    #[test]
    fn signal_debug() {
        let s = signal::<i32>();
        let _ = s.subscribe("a", |_| {});
        let _ = s.subscribe("a", |_| {});
        let dbg = format!("{:?}", s);
        assert!(dbg.contains("Signal"));
        assert!(dbg.contains("listeners: 2"));
    }
}
