// ============================================================================
// spark-pulse - State Hooks
// Field projection (use_signal) and bound action triggers (use_actions)
// ============================================================================

use std::rc::Rc;

use crate::core::record::Record;
use crate::core::types::{Action, SignalType};
use crate::primitives::state::State;

// =============================================================================
// USE_SIGNAL
// =============================================================================

/// Read half of [`use_signal`].
pub struct Getter<T> {
    state: State<T>,
    key: Rc<str>,
}

impl<T: Record> Getter<T> {
    /// Current value of the field, or `None` if the key is absent.
    pub fn get(&self) -> Option<T::Field> {
        self.state.with(|record| record.field(&self.key).cloned())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Erase into a plain getter closure.
    pub fn into_fn(self) -> SignalType<Option<T::Field>> {
        Rc::new(move || self.get())
    }
}

/// Write half of [`use_signal`].
pub struct Setter<T> {
    state: State<T>,
    key: Rc<str>,
}

impl<T: Record> Setter<T> {
    /// Replace the field with `updater(old)`. Other fields are copied over
    /// unchanged; an absent key is added.
    pub fn set(&self, updater: impl FnOnce(Option<&T::Field>) -> T::Field) {
        let key = self.key.clone();
        self.state.set_state(move |record| {
            let next = updater(record.field(&key));
            record.with_field(&key, next)
        });
    }

    /// Replace the field with `value`.
    pub fn set_value(&self, value: T::Field) {
        self.set(|_| value);
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T> Clone for Getter<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            key: self.key.clone(),
        }
    }
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            key: self.key.clone(),
        }
    }
}

/// Project one field of a record state as a getter/setter pair.
///
/// The key is not validated: reading an absent key yields `None` and
/// writing it adds the field.
///
/// # Example
///
/// ```
/// use spark_pulse::{create_state, use_signal};
/// use serde_json::json;
///
/// let state = create_state(json!({"count": 1, "name": "pulse"}));
/// let (count, set_count) = use_signal(&state, "count");
///
/// set_count.set(|old| json!(old.and_then(|v| v.as_i64()).unwrap_or(0) + 1));
/// assert_eq!(count.get(), Some(json!(2)));
/// assert_eq!(state.get_state()["name"], json!("pulse"));
/// ```
pub fn use_signal<T: Record>(state: &State<T>, key: impl Into<String>) -> (Getter<T>, Setter<T>) {
    let key: Rc<str> = Rc::from(key.into());
    (
        Getter {
            state: state.clone(),
            key: key.clone(),
        },
        Setter {
            state: state.clone(),
            key,
        },
    )
}

// =============================================================================
// USE_ACTIONS
// =============================================================================

/// A named action handler.
pub type ActionHandler<P> = Rc<dyn Fn(P)>;

/// Box a closure as an [`ActionHandler`]. Used by the `actions!` macro.
pub fn action_handler<P, F>(handler: F) -> ActionHandler<P>
where
    F: Fn(P) + 'static,
{
    Rc::new(handler)
}

/// One action bound to a state.
pub struct Trigger<P> {
    name: Rc<str>,
    handler: ActionHandler<P>,
    commit: Rc<dyn Fn()>,
}

impl<P> Trigger<P> {
    /// Run the handler with `payload`, then commit the state unchanged.
    ///
    /// The commit hands the state back its current `Rc`, so nothing is
    /// replaced unless the handler wrote to the state itself. Change
    /// listeners fire once per call.
    pub fn call(&self, payload: P) {
        tracing::trace!(action = %self.name, "dispatch");
        (self.handler)(payload);
        (self.commit)();
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<P> Clone for Trigger<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            handler: self.handler.clone(),
            commit: self.commit.clone(),
        }
    }
}

/// Triggers produced by [`use_actions`], in the order they were given.
pub struct Actions<P> {
    triggers: Vec<Trigger<P>>,
}

impl<P> Actions<P> {
    /// The trigger bound to `name`.
    pub fn trigger(&self, name: &str) -> Option<Trigger<P>> {
        self.find(name).cloned()
    }

    /// Call the trigger bound to `name`. Returns `false` if there is none.
    pub fn call(&self, name: &str, payload: P) -> bool {
        match self.find(name) {
            Some(trigger) => {
                trigger.call(payload);
                true
            }
            None => false,
        }
    }

    /// Call the trigger named by `action.kind`. A missing payload is
    /// replaced by `P::default()`.
    pub fn dispatch(&self, action: Action<P>) -> bool
    where
        P: Default,
    {
        let Action { kind, payload } = action;
        self.call(&kind, payload.unwrap_or_default())
    }

    pub fn names(&self) -> Vec<&str> {
        self.triggers.iter().map(Trigger::name).collect()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    fn find(&self, name: &str) -> Option<&Trigger<P>> {
        self.triggers.iter().find(|t| &*t.name == name)
    }
}

/// Bind named handlers to `state`.
///
/// Each handler becomes a [`Trigger`] that runs the handler with its payload
/// and then commits the state as it stands. A later handler with the same
/// name replaces an earlier one.
///
/// # Example
///
/// ```
/// use spark_pulse::{actions, create_state, use_actions};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let state = create_state(0u32);
/// let last = Rc::new(Cell::new(0));
///
/// let bound = use_actions(&state, actions! {
///     "ping" => {
///         let last = last.clone();
///         move |n: u32| last.set(n)
///     },
/// });
///
/// assert!(bound.call("ping", 9));
/// assert_eq!(last.get(), 9);
/// assert!(!bound.call("missing", 1));
/// ```
pub fn use_actions<T, P, K, I>(state: &State<T>, handlers: I) -> Actions<P>
where
    T: 'static,
    K: Into<String>,
    I: IntoIterator<Item = (K, ActionHandler<P>)>,
{
    let commit: Rc<dyn Fn()> = {
        let state = state.clone();
        Rc::new(move || state.replace_state(Rc::clone))
    };

    let mut triggers: Vec<Trigger<P>> = Vec::new();
    for (name, handler) in handlers {
        let trigger = Trigger {
            name: Rc::from(name.into()),
            handler,
            commit: commit.clone(),
        };
        match triggers.iter_mut().find(|t| t.name == trigger.name) {
            Some(existing) => *existing = trigger,
            None => triggers.push(trigger),
        }
    }
    Actions { triggers }
}

// =============================================================================
// TESTS
// =============================================================================
