// ============================================================================
// spark-pulse - Ergonomic Macros
// ============================================================================

/// Build the handler list for [`use_actions`](crate::use_actions).
///
/// Each `name => handler` pair becomes `(String, ActionHandler<P>)`. Handlers
/// are plain closures taking the payload; the payload type is inferred from
/// the closures (annotate at least one when nothing else pins it down).
///
/// # Usage
///
/// ```rust
/// use spark_pulse::{actions, create_state, use_actions};
///
/// let state = create_state(vec![1, 2]);
///
/// let bound = use_actions(&state, actions! {
///     "push" => {
///         let state = state.clone();
///         move |n: i32| state.set_state(|v| {
///             let mut next = v.clone();
///             next.push(n);
///             next
///         })
///     },
///     "clear" => {
///         let state = state.clone();
///         move |_: i32| state.set_state(|_| Vec::new())
///     },
/// });
///
/// bound.call("push", 3);
/// assert_eq!(*state.get_state(), vec![1, 2, 3]);
///
/// bound.call("clear", 0);
/// assert!(state.get_state().is_empty());
/// ```
#[macro_export]
macro_rules! actions {
    ($($name:expr => $handler:expr),* $(,)?) => {
        ::std::vec![
            $( (::std::string::String::from($name), $crate::action_handler($handler)) ),*
        ]
    };
}
