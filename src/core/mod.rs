// ============================================================================
// spark-pulse - Core Module
// Shared types, errors and record shapes
// ============================================================================

pub mod error;
pub mod record;
pub mod types;

pub use error::AddError;
pub use record::{Accumulate, Record};
pub use types::{Action, Listener, SignalListener, SignalType, UnsubscribeFn};
