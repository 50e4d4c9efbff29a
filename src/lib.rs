//! Trellis: composable activity chains with typed fault recovery
//!
//! Trellis is the behavior-execution core of a state machine. An event's
//! behavior is an ordered list of activities composed into a single chain:
//! each activity does its work and then decides whether to continue with
//! the rest. Guarded activities wrap part of a chain in try/catch semantics,
//! routing faults to handlers registered by fault kind and falling back
//! through the kind hierarchy toward the most specific match.
//!
//! # Core Concepts
//!
//! - **Behavior**: A runnable unit over an execution context
//! - **Activity**: A step that receives the rest of the chain as its continuation
//! - **Chain**: Activities composed right-to-left into one behavior
//! - **Fault kinds**: A declared hierarchy used to pick recovery handlers
//! - **Inspection**: A structural walk over a composed behavior
//!
//! # Example
//!
//! ```rust
//! use trellis::activity::{from_fn, Activity};
//! use trellis::behavior::{Behavior, BehaviorContext, Chain};
//! use trellis::builder::TryBuilder;
//! use trellis::core::{Event, Fault};
//! use trellis::fault_kind;
//! use std::sync::Arc;
//!
//! fault_kind! {
//!     enum OrderFault {
//!         Any,
//!         Payment: Any,
//!         Declined: Payment,
//!         Unhandled: Any,
//!     }
//!     unhandled: Unhandled
//! }
//!
//! type Ctx<'a> = BehaviorContext<'a, Vec<String>, OrderFault>;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let charge = TryBuilder::new(Event::new("Checkout"))
//!     .then_fn("charge card", |_ctx: &mut Ctx<'_>| {
//!         Err(Fault::new(OrderFault::Declined, "card declined"))
//!     })
//!     .catch_fn(OrderFault::Payment, "ask for another card", |ctx: &mut Ctx<'_>| {
//!         ctx.instance_mut().push("retry payment".to_string());
//!         Ok(())
//!     })
//!     .build()
//!     .unwrap();
//!
//! let behavior = Chain::compose(vec![
//!     from_fn("open order", |ctx: &mut Ctx<'_>| {
//!         ctx.instance_mut().push("opened".to_string());
//!         Ok(())
//!     }),
//!     Arc::new(charge) as Arc<dyn Activity<_, _>>,
//! ]);
//!
//! let mut log = Vec::new();
//! Behavior::execute(&behavior, &mut Ctx::new(&mut log)).await.unwrap();
//! assert_eq!(log, vec!["opened", "retry payment"]);
//! # }
//! ```

pub mod activity;
pub mod behavior;
pub mod builder;
pub mod core;
pub mod inspect;
pub mod persistence;

// Re-export commonly used types
pub use crate::core::{Event, Fault, FaultKind, State};
pub use activity::{Activity, DataActivity, DataTryActivity, ExceptionHandler, TryActivity};
pub use behavior::{Behavior, BehaviorContext, Chain, DataBehavior, DataContext};
pub use builder::{BuildError, TryBuilder};
pub use persistence::{PersistenceError, StateConverter};
