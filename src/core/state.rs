//! State trait for the states owned by a state machine.
//!
//! The execution core never transitions between states itself. States are
//! only named here so that the persistence adapter can map a stored name
//! back to the machine's own state object.

use std::fmt::Debug;

/// Trait for state machine states.
///
/// State names must be unique within one machine; the persistence adapter
/// relies on this to round-trip a state through its stored name.
///
/// # Example
///
/// ```rust
/// use trellis::core::State;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum OrderState {
///     Pending,
///     Shipped,
///     Cancelled,
/// }
///
/// impl State for OrderState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Pending => "Pending",
///             Self::Shipped => "Shipped",
///             Self::Cancelled => "Cancelled",
///         }
///     }
/// }
///
/// assert_eq!(OrderState::Shipped.name(), "Shipped");
/// ```
pub trait State: Debug + Send + Sync + 'static {
    /// The state's name, used for storage and diagnostics.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Initial,
        Running,
        Done,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Initial => "Initial",
                Self::Running => "Running",
                Self::Done => "Done",
            }
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Initial.name(), "Initial");
        assert_eq!(TestState::Running.name(), "Running");
        assert_eq!(TestState::Done.name(), "Done");
    }

    #[test]
    fn state_is_usable_as_trait_object() {
        let states: Vec<Box<dyn State>> = vec![Box::new(TestState::Initial), Box::new(TestState::Done)];
        let names: Vec<_> = states.iter().map(|state| state.name()).collect();
        assert_eq!(names, vec!["Initial", "Done"]);
    }
}
