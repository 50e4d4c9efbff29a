//! Builder API for guarded activity construction.
//!
//! This module provides a fluent builder that validates handler
//! declarations before building, plus macros for declaring fault kinds and
//! states with minimal boilerplate.

pub mod error;
pub mod macros;
mod try_builder;

pub use error::{BuildError, DefinitionError};
pub use try_builder::TryBuilder;
