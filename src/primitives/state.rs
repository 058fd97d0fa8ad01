// ============================================================================
// spark-pulse - State Cell
// One value, replaced wholesale, with zero-argument change listeners
// ============================================================================
//
// The committed value lives in an `Rc<T>`. Readers get a clone of that `Rc`,
// so a reader never sees a half-written value and referential identity of
// "the previous state" stays observable (`Rc::ptr_eq`).
//
// Like the emitter, a commit snapshots its listeners before calling them and
// never holds a `RefCell` borrow across user code. Listeners may read or
// write the cell again; runaway recursion is the caller's problem.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::error::AddError;
use crate::core::record::{Accumulate, Record};
use crate::core::types::Listener;

// =============================================================================
// OPTIONS
// =============================================================================

/// Configuration for a [`State`].
///
/// # Example
///
/// ```
/// use spark_pulse::{create_state_with_options, StateOptions};
/// use serde_json::json;
///
/// let todos = create_state_with_options(
///     json!({"filter": "all", "items": []}),
///     StateOptions::new().accumulate_into("items").label("todos"),
/// );
///
/// todos.add("write docs").unwrap();
/// assert_eq!(todos.get_state()["items"], json!(["write docs"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateOptions {
    /// Field that [`State::add`] appends into. When unset, `add` uses the
    /// first key of the current record.
    pub accumulate_into: Option<String>,
    /// Name attached to the cell's log events.
    pub label: Option<String>,
}

impl StateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field [`State::add`] appends into.
    pub fn accumulate_into(mut self, key: impl Into<String>) -> Self {
        self.accumulate_into = Some(key.into());
        self
    }

    /// Set the label used in log events.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// =============================================================================
// LISTENER ID
// =============================================================================

/// Handle returned by [`State::subscribe`], used to remove that listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// =============================================================================
// STATE<T>
// =============================================================================

struct StateInner<T> {
    value: RefCell<Rc<T>>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_id: Cell<u64>,
    options: StateOptions,
}

/// An observable cell holding one value.
///
/// Every update replaces the value and then notifies change listeners in
/// registration order. Cloning a `State` yields another handle to the same
/// cell.
///
/// # Example
///
/// ```
/// use spark_pulse::create_state;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// #[derive(Clone)]
/// struct Counter { count: i32 }
///
/// let state = create_state(Counter { count: 0 });
/// let renders = Rc::new(Cell::new(0));
/// state.subscribe({
///     let renders = renders.clone();
///     move || renders.set(renders.get() + 1)
/// });
///
/// state.set_state(|s| Counter { count: s.count + 1 });
/// assert_eq!(state.get_state().count, 1);
/// assert_eq!(renders.get(), 1);
/// ```
pub struct State<T> {
    inner: Rc<StateInner<T>>,
}

impl<T: 'static> State<T> {
    /// Create a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_options(initial, StateOptions::default())
    }

    /// Create a cell holding `initial` with explicit options.
    pub fn with_options(initial: T, options: StateOptions) -> Self {
        Self {
            inner: Rc::new(StateInner {
                value: RefCell::new(Rc::new(initial)),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                options,
            }),
        }
    }

    /// The most recently committed value.
    pub fn get_state(&self) -> Rc<T> {
        self.inner.value.borrow().clone()
    }

    /// Run `f` against the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let current = self.get_state();
        f(&current)
    }

    /// Replace the value with `updater(current)` and notify listeners.
    pub fn set_state(&self, updater: impl FnOnce(&T) -> T) {
        self.replace_state(|prev| Rc::new(updater(prev)));
    }

    /// Like [`set_state`](Self::set_state), but the updater works on the
    /// shared `Rc` and may hand back an existing one.
    pub fn replace_state(&self, updater: impl FnOnce(&Rc<T>) -> Rc<T>) {
        let prev = self.get_state();
        let next = updater(&prev);
        let _old = self.inner.value.replace(next);
        self.notify();
    }

    /// Register a change listener. Returns an id for [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> ListenerId {
        let id = ListenerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove the listener registered as `id`. Returns whether it was present.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let removed = {
            let mut listeners = self.inner.listeners.borrow_mut();
            listeners
                .iter()
                .position(|(lid, _)| *lid == id)
                .map(|index| listeners.remove(index))
        };
        removed.is_some()
    }

    /// Number of registered change listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn options(&self) -> &StateOptions {
        &self.inner.options
    }

    /// Append `payload` to a sequence field of the current record.
    ///
    /// The target field is [`StateOptions::accumulate_into`] when set, and
    /// otherwise the record's first key. A sequence field is copied and
    /// extended; any other value is replaced by `[payload]`.
    ///
    /// Never panics. If the value is not a record, or there is no key to
    /// target, the state is left alone, a warning is logged and the reason
    /// is returned.
    pub fn add<P>(&self, payload: P) -> Result<(), AddError>
    where
        T: Accumulate<P>,
    {
        let key = match self.target_key(&self.get_state()) {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(label = self.label(), error = %err, "add ignored");
                return Err(err);
            }
        };
        self.set_state(|state| state.accumulate(&key, payload));
        Ok(())
    }

    fn target_key(&self, current: &T) -> Result<String, AddError>
    where
        T: Record,
    {
        if !current.is_record() {
            return Err(AddError::NotARecord);
        }
        if let Some(key) = &self.inner.options.accumulate_into {
            return Ok(key.clone());
        }
        current
            .first_key()
            .map(str::to_owned)
            .ok_or(AddError::NoKeys)
    }

    fn notify(&self) {
        let snapshot: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        tracing::trace!(label = self.label(), listeners = snapshot.len(), "commit");

        for listener in &snapshot {
            listener();
        }
    }

    fn label(&self) -> &str {
        self.inner.options.label.as_deref().unwrap_or("state")
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for State<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("value", &*self.inner.value.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

// =============================================================================
// CREATION FUNCTIONS
// =============================================================================

/// Create a [`State`] holding `initial`.
pub fn create_state<T: 'static>(initial: T) -> State<T> {
    State::new(initial)
}

/// Create a [`State`] holding `initial`, configured by `options`.
pub fn create_state_with_options<T: 'static>(initial: T, options: StateOptions) -> State<T> {
    State::with_options(initial, options)
}

// =============================================================================
// TESTS
// =============================================================================
