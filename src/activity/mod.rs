//! Activities: units of work that become chain nodes.
//!
//! An activity receives the execution context and the behavior that
//! follows it. It performs its effect and then, normally, runs `next`.
//! Composite activities (a whole [`Chain`](crate::behavior::Chain), a
//! [`TryActivity`]) satisfy the same contract.

mod handler;
mod lift;
mod shim;
mod try_activity;

pub use handler::{ExceptionHandler, HandlerRegistry};
pub use lift::Lifted;
pub use shim::EventActivityShim;
pub use try_activity::{DataTryActivity, TryActivity};

use crate::behavior::{Behavior, BehaviorContext, DataBehavior, DataContext, Instance, Payload};
use crate::core::{Fault, FaultKind};
use crate::inspect::{self, Inspector, Node};
use async_trait::async_trait;
use std::sync::Arc;

/// A unit of work over the instance-only context.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use trellis::activity::Activity;
/// use trellis::behavior::{Behavior, BehaviorContext};
/// use trellis::core::Fault;
/// # trellis::fault_kind! {
/// #     enum AppFault { Root, Unhandled: Root }
/// #     unhandled: Unhandled
/// # }
///
/// struct Audit;
///
/// #[async_trait]
/// impl Activity<Vec<String>, AppFault> for Audit {
///     async fn execute(
///         &self,
///         context: &mut BehaviorContext<'_, Vec<String>, AppFault>,
///         next: &dyn Behavior<Vec<String>, AppFault>,
///     ) -> Result<(), Fault<AppFault>> {
///         context.instance_mut().push("audited".to_string());
///         next.execute(context).await
///     }
/// }
/// ```
#[async_trait]
pub trait Activity<I: Instance, K: FaultKind>: Send + Sync {
    async fn execute(
        &self,
        context: &mut BehaviorContext<'_, I, K>,
        next: &dyn Behavior<I, K>,
    ) -> Result<(), Fault<K>>;

    /// Name shown by structural inspection.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        inspector.inspect(Node::Activity(self.name()), &mut inspect::leaf);
    }
}

/// A unit of work over the payload-carrying context.
#[async_trait]
pub trait DataActivity<I: Instance, D: Payload, K: FaultKind>: Send + Sync {
    async fn execute(
        &self,
        context: &mut DataContext<'_, I, D, K>,
        next: &dyn DataBehavior<I, D, K>,
    ) -> Result<(), Fault<K>>;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        inspector.inspect(Node::Activity(self.name()), &mut inspect::leaf);
    }
}

/// Activity that runs a synchronous closure and then its continuation.
pub struct FnActivity<F> {
    name: String,
    effect: F,
}

#[async_trait]
impl<I, K, F> Activity<I, K> for FnActivity<F>
where
    I: Instance,
    K: FaultKind,
    F: Fn(&mut BehaviorContext<'_, I, K>) -> Result<(), Fault<K>> + Send + Sync,
{
    async fn execute(
        &self,
        context: &mut BehaviorContext<'_, I, K>,
        next: &dyn Behavior<I, K>,
    ) -> Result<(), Fault<K>> {
        (self.effect)(context)?;
        next.execute(context).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Create an activity from a closure over the execution context.
///
/// A closure that returns an error stops the chain; its continuation does
/// not run.
pub fn from_fn<I, K, F>(name: impl Into<String>, effect: F) -> Arc<dyn Activity<I, K>>
where
    I: Instance,
    K: FaultKind,
    F: Fn(&mut BehaviorContext<'_, I, K>) -> Result<(), Fault<K>> + Send + Sync + 'static,
{
    Arc::new(FnActivity {
        name: name.into(),
        effect,
    })
}
