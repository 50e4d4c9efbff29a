//! Core value types shared by every behavior.
//!
//! - Machine states via the `State` trait
//! - Event identifiers
//! - Faults and the explicit fault-kind hierarchy used for recovery

mod event;
mod fault;
mod state;

pub use event::Event;
pub use fault::{Fault, FaultKind, Lineage, UNHANDLED_MESSAGE};
pub use state::State;
