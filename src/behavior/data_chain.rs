//! Chain composition over the payload-carrying context.

use super::{
    Behavior, BehaviorContext, DataBehavior, DataContext, EmptyBehavior, Instance, Payload,
};
use crate::activity::DataActivity;
use crate::core::{Fault, FaultKind};
use crate::inspect::{self, Inspector, Node};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::trace;

/// Payload-carrying counterpart of [`Chain`](super::Chain), with the same
/// composition and execution order.
pub enum DataChain<I: Instance, D: Payload, K: FaultKind> {
    Empty,
    Last(Arc<dyn DataActivity<I, D, K>>),
    Link {
        activity: Arc<dyn DataActivity<I, D, K>>,
        rest: Box<DataChain<I, D, K>>,
    },
}

impl<I: Instance, D: Payload, K: FaultKind> DataChain<I, D, K> {
    pub fn compose<A>(activities: A) -> Self
    where
        A: IntoIterator<Item = Arc<dyn DataActivity<I, D, K>>>,
        A::IntoIter: DoubleEndedIterator,
    {
        let mut activities = activities.into_iter().rev();
        let Some(last) = activities.next() else {
            trace!("composed empty data behavior chain");
            return DataChain::Empty;
        };

        let mut length = 1usize;
        let mut chain = DataChain::Last(last);
        for activity in activities {
            chain = DataChain::Link {
                activity,
                rest: Box::new(chain),
            };
            length += 1;
        }

        trace!(length, "composed data behavior chain");
        chain
    }

    pub fn single(activity: Arc<dyn DataActivity<I, D, K>>) -> Self {
        DataChain::Last(activity)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DataChain::Empty)
    }

    fn describe(&self, inspector: &mut dyn Inspector) {
        match self {
            DataChain::Empty => inspector.inspect(Node::Empty, &mut inspect::leaf),
            DataChain::Last(activity) => {
                inspector.inspect(Node::Link, &mut |inspector: &mut dyn Inspector| {
                    activity.accept(inspector);
                });
            }
            DataChain::Link { activity, rest } => {
                inspector.inspect(Node::Link, &mut |inspector: &mut dyn Inspector| {
                    activity.accept(inspector);
                    rest.describe(inspector);
                });
            }
        }
    }
}

struct DataContinuation<'c, I: Instance, D: Payload, K: FaultKind> {
    rest: &'c DataChain<I, D, K>,
    next: &'c dyn DataBehavior<I, D, K>,
}

#[async_trait]
impl<'c, I: Instance, D: Payload, K: FaultKind> DataBehavior<I, D, K>
    for DataContinuation<'c, I, D, K>
{
    async fn execute(&self, context: &mut DataContext<'_, I, D, K>) -> Result<(), Fault<K>> {
        DataActivity::execute(self.rest, context, self.next).await
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        self.rest.describe(inspector);
    }
}

#[async_trait]
impl<I: Instance, D: Payload, K: FaultKind> DataActivity<I, D, K> for DataChain<I, D, K> {
    async fn execute(
        &self,
        context: &mut DataContext<'_, I, D, K>,
        next: &dyn DataBehavior<I, D, K>,
    ) -> Result<(), Fault<K>> {
        match self {
            DataChain::Empty => next.execute(context).await,
            DataChain::Last(activity) => activity.execute(context, next).await,
            DataChain::Link { activity, rest } => {
                let continuation = DataContinuation { rest, next };
                activity.execute(context, &continuation).await
            }
        }
    }

    fn name(&self) -> &str {
        "data chain"
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        self.describe(inspector);
    }
}

#[async_trait]
impl<I: Instance, D: Payload, K: FaultKind> DataBehavior<I, D, K> for DataChain<I, D, K> {
    async fn execute(&self, context: &mut DataContext<'_, I, D, K>) -> Result<(), Fault<K>> {
        DataActivity::execute(self, context, &EmptyBehavior).await
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        self.describe(inspector);
    }
}

/// Instance-only continuation that re-attaches a payload and resumes a
/// payload-carrying behavior.
///
/// Lets an instance-only activity run inside a payload-carrying chain: the
/// activity sees a plain context, and whatever follows it sees the payload
/// again.
pub(crate) struct Rejoin<'n, I: Instance, D: Payload, K: FaultKind> {
    pub(crate) next: &'n dyn DataBehavior<I, D, K>,
    pub(crate) data: &'n D,
}

#[async_trait]
impl<'n, I: Instance, D: Payload, K: FaultKind> Behavior<I, K> for Rejoin<'n, I, D, K> {
    async fn execute(&self, context: &mut BehaviorContext<'_, I, K>) -> Result<(), Fault<K>> {
        let mut rejoined = DataContext::new(context.reborrow(), self.data);
        self.next.execute(&mut rejoined).await
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        self.next.accept(inspector);
    }
}
