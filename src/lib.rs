// ============================================================================
// spark-pulse - Keyed Pub/Sub and Observable State
// ============================================================================
//
// Two small, independent pieces meant to be driven from component
// lifecycles (subscribe on mount, unsubscribe on unmount):
//
// - `Signal<T>`: a keyed emitter. Listeners run synchronously, in
//   registration order, on the emitting call stack.
// - `State<T>`: a single value replaced wholesale on update, with
//   zero-argument change listeners, plus the `use_signal` / `use_actions`
//   helpers built on it.
//
// Everything is single-threaded (`Rc` + `RefCell`) and nothing is queued.
// ============================================================================

pub mod core;
pub mod primitives;

mod macros;

// Re-export core items at crate root
pub use crate::core::error::AddError;
pub use crate::core::record::{Accumulate, Record};
pub use crate::core::types::{Action, Listener, SignalListener, SignalType, UnsubscribeFn};

// Re-export primitives at crate root
pub use crate::primitives::hooks::{
    action_handler, use_actions, use_signal, ActionHandler, Actions, Getter, Setter, Trigger,
};
pub use crate::primitives::signal::{signal, Signal};
pub use crate::primitives::state::{
    create_state, create_state_with_options, ListenerId, State, StateOptions,
};

// =============================================================================
// TESTS
// =============================================================================
