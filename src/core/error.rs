// ============================================================================
// spark-pulse - Errors
// ============================================================================

/// Why [`State::add`](crate::State::add) left the state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddError {
    /// The current value is not a keyed record (a JSON number, string, ...).
    #[error("state is not a keyed record")]
    NotARecord,
    /// No target key was configured and the record has no keys to pick from.
    #[error("state record has no keys to accumulate into")]
    NoKeys,
}
