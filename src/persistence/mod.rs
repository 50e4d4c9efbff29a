//! Mapping between a machine's states and their stored names.
//!
//! Instances persist their current state as a plain name. The converter is
//! built from the full state set of one machine and resolves a stored name
//! back to the machine's own state object, so a round trip yields the
//! identical `Arc`.

use crate::core::State;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

pub mod error;

pub use error::PersistenceError;

/// Converts between a machine's states and their stored names.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use trellis::persistence::StateConverter;
/// use trellis::state_enum;
///
/// state_enum! {
///     enum OrderState {
///         Pending,
///         Shipped,
///     }
/// }
///
/// let pending = Arc::new(OrderState::Pending);
/// let converter =
///     StateConverter::new(vec![Arc::clone(&pending), Arc::new(OrderState::Shipped)]).unwrap();
///
/// let stored = converter.write(Some(pending.as_ref()));
/// assert_eq!(stored.as_deref(), Some("Pending"));
///
/// let restored = converter.read(stored.as_deref()).unwrap().unwrap();
/// assert!(Arc::ptr_eq(&restored, &pending));
/// ```
#[derive(Debug)]
pub struct StateConverter<S: State> {
    states: HashMap<String, Arc<S>>,
}

impl<S: State> StateConverter<S> {
    /// Build a converter over every state of one machine.
    pub fn new<T>(states: T) -> Result<Self, PersistenceError>
    where
        T: IntoIterator<Item = Arc<S>>,
    {
        let mut by_name = HashMap::new();
        for state in states {
            let name = state.name().to_string();
            if by_name.contains_key(&name) {
                return Err(PersistenceError::DuplicateState { name });
            }
            by_name.insert(name, state);
        }
        Ok(Self { states: by_name })
    }

    /// Resolve a stored name. An absent name is an absent state.
    pub fn read(&self, name: Option<&str>) -> Result<Option<Arc<S>>, PersistenceError> {
        let Some(name) = name else {
            return Ok(None);
        };

        match self.states.get(name) {
            Some(state) => Ok(Some(Arc::clone(state))),
            None => {
                warn!(state = name, "stored state name matches no known state");
                Err(PersistenceError::UnknownState {
                    name: name.to_string(),
                })
            }
        }
    }

    /// Stored form of a state: its name, or nothing for an absent state.
    pub fn write(&self, state: Option<&S>) -> Option<String> {
        state.map(|state| state.name().to_string())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
