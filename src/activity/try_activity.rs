//! Guarded activities: try/catch over a chain of activities.
//!
//! A guarded activity runs its activities and intercepts any fault they
//! raise at a single boundary. Recovery walks the fault's kind lineage from
//! the concrete kind toward the root (the root itself is never probed) and
//! runs every handler registered for the first kind that has any, in
//! registration order. If no kind matches, the fault is wrapped in an
//! unhandled error and returned to the caller.
//!
//! Handlers run outside the boundary: a fault raised by a handler goes
//! straight to the caller, unwrapped. Nested guarded activities recover
//! their own faults before an enclosing one sees them.

use super::handler::{ExceptionHandler, HandlerRegistry};
use super::lift::run_lifted;
use super::shim::EventActivityShim;
use super::{Activity, DataActivity};
use crate::behavior::{
    Behavior, BehaviorContext, Chain, DataBehavior, DataContext, Instance, Payload,
};
use crate::core::{Event, Fault, FaultKind};
use crate::inspect::{Inspector, Node};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Guarded activity over the instance-only context.
///
/// On success the continuation runs once. When a handler recovers a fault,
/// the guarded activity returns without running its continuation.
///
/// # Example
///
/// ```rust
/// use trellis::activity::{from_fn, Activity, ExceptionHandler, TryActivity};
/// use trellis::behavior::{BehaviorContext, EmptyBehavior};
/// use trellis::core::{Event, Fault};
///
/// trellis::fault_kind! {
///     enum OrderFault {
///         Any,
///         OutOfStock: Any,
///         Unhandled: Any,
///     }
///     unhandled: Unhandled
/// }
///
/// type Ctx<'a> = BehaviorContext<'a, Vec<String>, OrderFault>;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let guarded = TryActivity::new(
///     Event::new("Submit"),
///     vec![from_fn("reserve", |_ctx: &mut Ctx<'_>| {
///         Err(Fault::new(OrderFault::OutOfStock, "sku-7 unavailable"))
///     })],
///     vec![ExceptionHandler::new(
///         OrderFault::OutOfStock,
///         from_fn("backorder", |ctx: &mut Ctx<'_>| {
///             let reason = ctx.exception().map(|f| f.message().to_string());
///             ctx.instance_mut().extend(reason);
///             Ok(())
///         }),
///     )],
/// );
///
/// let mut log = Vec::new();
/// guarded
///     .execute(&mut Ctx::new(&mut log), &EmptyBehavior)
///     .await
///     .unwrap();
/// assert_eq!(log, vec!["sku-7 unavailable"]);
/// # }
/// ```
pub struct TryActivity<I: Instance, K: FaultKind> {
    event: Event,
    behavior: Chain<I, K>,
    handlers: HandlerRegistry<I, K>,
}

impl<I: Instance, K: FaultKind> TryActivity<I, K> {
    /// Build the guarded activity. Activities are bound to `event` and
    /// composed into one chain; handlers are grouped by their target kind.
    pub fn new<A, H>(event: Event, activities: A, handlers: H) -> Self
    where
        A: IntoIterator<Item = Arc<dyn Activity<I, K>>>,
        H: IntoIterator<Item = ExceptionHandler<I, K>>,
    {
        let bound: Vec<Arc<dyn Activity<I, K>>> = activities
            .into_iter()
            .map(|activity| {
                Arc::new(EventActivityShim::new(event.clone(), activity)) as Arc<dyn Activity<I, K>>
            })
            .collect();

        Self {
            behavior: Chain::compose(bound),
            handlers: handlers.into_iter().collect(),
            event,
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn handlers(&self) -> &HandlerRegistry<I, K> {
        &self.handlers
    }
}

#[async_trait]
impl<I: Instance, K: FaultKind> Activity<I, K> for TryActivity<I, K> {
    async fn execute(
        &self,
        context: &mut BehaviorContext<'_, I, K>,
        next: &dyn Behavior<I, K>,
    ) -> Result<(), Fault<K>> {
        match Behavior::execute(&self.behavior, context).await {
            Ok(()) => next.execute(context).await,
            Err(fault) => recover(&self.event, &self.handlers, context, fault).await,
        }
    }

    fn name(&self) -> &str {
        self.event.name()
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        inspector.inspect(Node::Try(&self.event), &mut |inspector: &mut dyn Inspector| {
            Behavior::accept(&self.behavior, inspector);
            accept_handlers(&self.handlers, inspector);
        });
    }
}

/// Guarded activity over the payload-carrying context.
///
/// Each wrapped activity runs directly against the supplied continuation,
/// so the continuation runs once per activity and never after the loop.
/// Side effects of activities that ran before a fault are kept. A
/// recovered fault returns without running the continuation again.
pub struct DataTryActivity<I: Instance, D: Payload, K: FaultKind> {
    event: Event,
    activities: Vec<EventActivityShim<I, K>>,
    handlers: HandlerRegistry<I, K>,
    _payload: std::marker::PhantomData<fn() -> D>,
}

impl<I: Instance, D: Payload, K: FaultKind> DataTryActivity<I, D, K> {
    pub fn new<A, H>(event: Event, activities: A, handlers: H) -> Self
    where
        A: IntoIterator<Item = Arc<dyn Activity<I, K>>>,
        H: IntoIterator<Item = ExceptionHandler<I, K>>,
    {
        Self {
            activities: activities
                .into_iter()
                .map(|activity| EventActivityShim::new(event.clone(), activity))
                .collect(),
            handlers: handlers.into_iter().collect(),
            event,
            _payload: std::marker::PhantomData,
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn handlers(&self) -> &HandlerRegistry<I, K> {
        &self.handlers
    }

    async fn run_activities(
        &self,
        context: &mut DataContext<'_, I, D, K>,
        next: &dyn DataBehavior<I, D, K>,
    ) -> Result<(), Fault<K>> {
        for activity in &self.activities {
            run_lifted(activity as &dyn Activity<I, K>, context, next).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<I: Instance, D: Payload, K: FaultKind> DataActivity<I, D, K> for DataTryActivity<I, D, K> {
    async fn execute(
        &self,
        context: &mut DataContext<'_, I, D, K>,
        next: &dyn DataBehavior<I, D, K>,
    ) -> Result<(), Fault<K>> {
        match self.run_activities(context, next).await {
            Ok(()) => Ok(()),
            Err(fault) => {
                recover(&self.event, &self.handlers, context.as_behavior_mut(), fault).await
            }
        }
    }

    fn name(&self) -> &str {
        self.event.name()
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        inspector.inspect(Node::Try(&self.event), &mut |inspector: &mut dyn Inspector| {
            for activity in &self.activities {
                activity.accept(inspector);
            }
            accept_handlers(&self.handlers, inspector);
        });
    }
}

fn accept_handlers<I: Instance, K: FaultKind>(
    handlers: &HandlerRegistry<I, K>,
    inspector: &mut dyn Inspector,
) {
    for (kind, group) in handlers.iter() {
        inspector.inspect(
            Node::Handlers(kind.name()),
            &mut |inspector: &mut dyn Inspector| {
                for handler in group {
                    handler.accept(inspector);
                }
            },
        );
    }
}

/// Dispatch a captured fault to the handlers of the nearest matching kind.
async fn recover<I: Instance, K: FaultKind>(
    event: &Event,
    handlers: &HandlerRegistry<I, K>,
    context: &mut BehaviorContext<'_, I, K>,
    fault: Fault<K>,
) -> Result<(), Fault<K>> {
    let fault = Arc::new(fault);
    debug!(
        event = %event,
        fault = fault.kind().name(),
        message = %fault,
        "guarded activity captured fault"
    );

    for kind in fault.kind().lineage() {
        let matched = handlers.lookup(kind);
        if matched.is_empty() {
            continue;
        }

        debug!(
            event = %event,
            fault = fault.kind().name(),
            matched = kind.name(),
            handlers = matched.len(),
            "recovering fault"
        );
        for handler in matched {
            let mut exception_context = context.exception_context(Arc::clone(&fault));
            let handler_chain = Chain::single(Arc::clone(handler));
            Behavior::execute(&handler_chain, &mut exception_context).await?;
        }
        return Ok(());
    }

    warn!(
        event = %event,
        fault = fault.kind().name(),
        message = %fault,
        "no handler matched fault"
    );
    Err(Fault::unhandled(fault))
}
