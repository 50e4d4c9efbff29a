//! Build errors for guarded activity definitions.

use thiserror::Error;

/// Errors that can occur when building a guarded activity.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid guarded activity definition: {}", describe(.0))]
    InvalidDefinition(Vec<DefinitionError>),
}

impl BuildError {
    /// Every problem found in the definition.
    pub fn problems(&self) -> &[DefinitionError] {
        match self {
            BuildError::InvalidDefinition(problems) => problems,
        }
    }
}

/// One problem found while validating a guarded activity definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("Handler for root fault kind '{fault}' can never run. Register it on a more specific kind")]
    UnreachableHandler { fault: &'static str },

    #[error("Fallback declarations starting at fault kind '{fault}' form a cycle")]
    FallbackCycle { fault: &'static str },
}

fn describe(problems: &[DefinitionError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
