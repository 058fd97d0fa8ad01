// ============================================================================
// spark-pulse - Primitives Module
// The keyed emitter, the state cell and the hooks built on it
// ============================================================================

pub mod hooks;
pub mod signal;
pub mod state;

// Re-export for convenience
pub use hooks::{
    action_handler, use_actions, use_signal, ActionHandler, Actions, Getter, Setter, Trigger,
};
pub use signal::{signal, Signal};
pub use state::{create_state, create_state_with_options, ListenerId, State, StateOptions};
