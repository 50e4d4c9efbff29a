//! Persistence error types.

use thiserror::Error;

/// Errors that can occur when mapping states to and from stored names
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// Two states of the same machine share a name
    #[error("Duplicate state name '{name}'. State names must be unique within a machine")]
    DuplicateState { name: String },

    /// A stored name matches none of the machine's states
    #[error("Unknown state '{name}'. The stored name matches no state of this machine")]
    UnknownState { name: String },
}
