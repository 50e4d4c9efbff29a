//! Behaviors: executable chain nodes.
//!
//! A behavior performs its own effect and then runs whatever follows it.
//! Chains are composed right to left from an ordered list of activities
//! (see [`Chain::compose`]) so that executing the head runs every activity
//! exactly once, in declaration order, before the continuation.
//!
//! Two shapes exist with identical chaining rules:
//!
//! - [`Behavior`] runs against a [`BehaviorContext`] (instance only)
//! - [`DataBehavior`] runs against a [`DataContext`] (instance plus payload)
//!
//! Execution is sequential. Each node awaits its own effect before its
//! continuation starts, and nothing in a chain runs concurrently.

mod chain;
mod context;
mod data_chain;

pub use chain::Chain;
pub use context::{BehaviorContext, DataContext};
pub use data_chain::DataChain;
pub(crate) use data_chain::Rejoin;

use crate::core::{Fault, FaultKind};
use crate::inspect::{self, Inspector, Node};
use async_trait::async_trait;

/// Owning instance type threaded through a chain.
pub trait Instance: Send + 'static {}

impl<T: Send + 'static> Instance for T {}

/// Event payload type carried by payload-carrying chains.
pub trait Payload: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Payload for T {}

/// An executable node over the instance-only context.
#[async_trait]
pub trait Behavior<I: Instance, K: FaultKind>: Send + Sync {
    async fn execute(&self, context: &mut BehaviorContext<'_, I, K>) -> Result<(), Fault<K>>;

    fn accept(&self, inspector: &mut dyn Inspector);
}

/// An executable node over the payload-carrying context.
#[async_trait]
pub trait DataBehavior<I: Instance, D: Payload, K: FaultKind>: Send + Sync {
    async fn execute(&self, context: &mut DataContext<'_, I, D, K>) -> Result<(), Fault<K>>;

    fn accept(&self, inspector: &mut dyn Inspector);
}

/// The behavior that does nothing. Terminates every chain.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyBehavior;

#[async_trait]
impl<I: Instance, K: FaultKind> Behavior<I, K> for EmptyBehavior {
    async fn execute(&self, _context: &mut BehaviorContext<'_, I, K>) -> Result<(), Fault<K>> {
        Ok(())
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        inspector.inspect(Node::Empty, &mut inspect::leaf);
    }
}

#[async_trait]
impl<I: Instance, D: Payload, K: FaultKind> DataBehavior<I, D, K> for EmptyBehavior {
    async fn execute(&self, _context: &mut DataContext<'_, I, D, K>) -> Result<(), Fault<K>> {
        Ok(())
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        inspector.inspect(Node::Empty, &mut inspect::leaf);
    }
}
