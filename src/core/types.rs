// ============================================================================
// spark-pulse - Type Definitions
// Callback shapes and the action value shared by the emitter and state cell
// ============================================================================

use std::rc::Rc;

// =============================================================================
// CALLBACK TYPES
// =============================================================================
//
// Callbacks are stored behind `Rc` so a dispatch round can snapshot the
// listener list (cheap pointer clones) and release the registry borrow before
// any user code runs. That is what makes re-entrant subscribe/emit safe.
// =============================================================================

/// A listener registered on a [`Signal`](crate::Signal) key. Receives the
/// emitted value by reference.
pub type SignalListener<T> = Rc<dyn Fn(&T)>;

/// A zero-argument getter.
pub type SignalType<T> = Rc<dyn Fn() -> T>;

/// A zero-argument change listener registered on a [`State`](crate::State).
pub type Listener = Rc<dyn Fn()>;

/// Function returned by [`Signal::subscribe`](crate::Signal::subscribe).
///
/// Calling it removes every listener under the subscribed key. It can be
/// called any number of times.
pub type UnsubscribeFn = Box<dyn Fn()>;

// =============================================================================
// ACTION
// =============================================================================

/// A named payload, dispatched through [`Actions::dispatch`](crate::Actions::dispatch).
///
/// # Example
///
/// ```
/// use spark_pulse::Action;
///
/// let action = Action::with_payload("add", 3);
/// assert_eq!(action.kind, "add");
/// assert_eq!(action.payload, Some(3));
///
/// let bare: Action<i32> = Action::new("reset");
/// assert!(bare.payload.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action<P> {
    pub kind: String,
    pub payload: Option<P>,
}

impl<P> Action<P> {
    /// An action with no payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    /// An action carrying `payload`.
    pub fn with_payload(kind: impl Into<String>, payload: P) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
