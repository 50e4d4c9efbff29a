//! Chain composition over the instance-only context.

use super::{Behavior, BehaviorContext, EmptyBehavior, Instance};
use crate::activity::Activity;
use crate::core::{Fault, FaultKind};
use crate::inspect::{Inspector, Node};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::trace;

/// A composed, singly linked chain of activities.
///
/// Each link owns the rest of the chain. Executing the chain runs every
/// activity once, in order, and then the continuation supplied to that
/// execution. The chain is itself an [`Activity`], so chains nest.
pub enum Chain<I: Instance, K: FaultKind> {
    /// No activities: only the continuation runs.
    Empty,
    /// The final activity, continued by the caller's continuation.
    Last(Arc<dyn Activity<I, K>>),
    /// An activity continued by the rest of the chain.
    Link {
        activity: Arc<dyn Activity<I, K>>,
        rest: Box<Chain<I, K>>,
    },
}

impl<I: Instance, K: FaultKind> Chain<I, K> {
    /// Compose activities into a chain, folding from the last to the first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trellis::activity::from_fn;
    /// use trellis::behavior::{Behavior, BehaviorContext, Chain};
    /// # trellis::fault_kind! {
    /// #     enum AppFault { Root, Unhandled: Root }
    /// #     unhandled: Unhandled
    /// # }
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let chain: Chain<Vec<u32>, AppFault> = Chain::compose(vec![
    ///     from_fn("one", |ctx: &mut BehaviorContext<'_, Vec<u32>, AppFault>| {
    ///         ctx.instance_mut().push(1);
    ///         Ok(())
    ///     }),
    ///     from_fn("two", |ctx: &mut BehaviorContext<'_, Vec<u32>, AppFault>| {
    ///         ctx.instance_mut().push(2);
    ///         Ok(())
    ///     }),
    /// ]);
    ///
    /// let mut seen = Vec::new();
    /// Behavior::execute(&chain, &mut BehaviorContext::new(&mut seen)).await.unwrap();
    /// assert_eq!(seen, vec![1, 2]);
    /// # }
    /// ```
    pub fn compose<A>(activities: A) -> Self
    where
        A: IntoIterator<Item = Arc<dyn Activity<I, K>>>,
        A::IntoIter: DoubleEndedIterator,
    {
        let mut activities = activities.into_iter().rev();
        let Some(last) = activities.next() else {
            trace!("composed empty behavior chain");
            return Chain::Empty;
        };

        let mut length = 1usize;
        let mut chain = Chain::Last(last);
        for activity in activities {
            chain = Chain::Link {
                activity,
                rest: Box::new(chain),
            };
            length += 1;
        }

        trace!(length, "composed behavior chain");
        chain
    }

    /// A chain consisting solely of `activity`.
    pub fn single(activity: Arc<dyn Activity<I, K>>) -> Self {
        Chain::Last(activity)
    }

    /// Number of activities in the chain.
    pub fn len(&self) -> usize {
        let mut length = 0;
        let mut current = self;
        loop {
            match current {
                Chain::Empty => return length,
                Chain::Last(_) => return length + 1,
                Chain::Link { rest, .. } => {
                    length += 1;
                    current = &**rest;
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Chain::Empty)
    }

    fn describe(&self, inspector: &mut dyn Inspector) {
        match self {
            Chain::Empty => inspector.inspect(Node::Empty, &mut crate::inspect::leaf),
            Chain::Last(activity) => {
                inspector.inspect(Node::Link, &mut |inspector: &mut dyn Inspector| {
                    activity.accept(inspector);
                });
            }
            Chain::Link { activity, rest } => {
                inspector.inspect(Node::Link, &mut |inspector: &mut dyn Inspector| {
                    activity.accept(inspector);
                    rest.describe(inspector);
                });
            }
        }
    }
}

impl<I: Instance, K: FaultKind> Default for Chain<I, K> {
    fn default() -> Self {
        Chain::Empty
    }
}

/// Runs the rest of a chain followed by the caller's continuation.
struct Continuation<'c, I: Instance, K: FaultKind> {
    rest: &'c Chain<I, K>,
    next: &'c dyn Behavior<I, K>,
}

#[async_trait]
impl<'c, I: Instance, K: FaultKind> Behavior<I, K> for Continuation<'c, I, K> {
    async fn execute(&self, context: &mut BehaviorContext<'_, I, K>) -> Result<(), Fault<K>> {
        Activity::execute(self.rest, context, self.next).await
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        self.rest.describe(inspector);
    }
}

#[async_trait]
impl<I: Instance, K: FaultKind> Activity<I, K> for Chain<I, K> {
    async fn execute(
        &self,
        context: &mut BehaviorContext<'_, I, K>,
        next: &dyn Behavior<I, K>,
    ) -> Result<(), Fault<K>> {
        match self {
            Chain::Empty => next.execute(context).await,
            Chain::Last(activity) => activity.execute(context, next).await,
            Chain::Link { activity, rest } => {
                let continuation = Continuation { rest, next };
                activity.execute(context, &continuation).await
            }
        }
    }

    fn name(&self) -> &str {
        "chain"
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        self.describe(inspector);
    }
}

#[async_trait]
impl<I: Instance, K: FaultKind> Behavior<I, K> for Chain<I, K> {
    async fn execute(&self, context: &mut BehaviorContext<'_, I, K>) -> Result<(), Fault<K>> {
        Activity::execute(self, context, &EmptyBehavior).await
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        self.describe(inspector);
    }
}
