//! Running instance-only activities inside payload-carrying chains.

use super::{Activity, DataActivity};
use crate::behavior::{DataBehavior, DataContext, Instance, Payload, Rejoin};
use crate::core::{Fault, FaultKind};
use crate::inspect::Inspector;
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

/// An instance-only activity lifted into the payload-carrying shape.
///
/// The wrapped activity sees only the instance context; the payload is
/// re-attached before the rest of the chain runs.
pub struct Lifted<I: Instance, D: Payload, K: FaultKind> {
    activity: Arc<dyn Activity<I, K>>,
    _payload: PhantomData<fn() -> D>,
}

impl<I: Instance, D: Payload, K: FaultKind> Lifted<I, D, K> {
    pub fn new(activity: Arc<dyn Activity<I, K>>) -> Self {
        Self {
            activity,
            _payload: PhantomData,
        }
    }
}

/// Run `activity` against a payload-carrying context and continuation.
pub(crate) async fn run_lifted<I, D, K>(
    activity: &dyn Activity<I, K>,
    context: &mut DataContext<'_, I, D, K>,
    next: &dyn DataBehavior<I, D, K>,
) -> Result<(), Fault<K>>
where
    I: Instance,
    D: Payload,
    K: FaultKind,
{
    let rejoin = Rejoin {
        next,
        data: context.data(),
    };
    activity.execute(context.as_behavior_mut(), &rejoin).await
}

#[async_trait]
impl<I: Instance, D: Payload, K: FaultKind> DataActivity<I, D, K> for Lifted<I, D, K> {
    async fn execute(
        &self,
        context: &mut DataContext<'_, I, D, K>,
        next: &dyn DataBehavior<I, D, K>,
    ) -> Result<(), Fault<K>> {
        run_lifted(self.activity.as_ref(), context, next).await
    }

    fn name(&self) -> &str {
        self.activity.name()
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        self.activity.accept(inspector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::from_fn;
    use crate::behavior::{BehaviorContext, DataChain};
    use crate::core::Event;

    crate::fault_kind! {
        enum TestFault {
            Root,
            Unhandled: Root,
        }
        unhandled: Unhandled
    }

    type Log = Vec<String>;

    struct Stamp;

    #[async_trait]
    impl DataActivity<Log, String, TestFault> for Stamp {
        async fn execute(
            &self,
            context: &mut DataContext<'_, Log, String, TestFault>,
            next: &dyn DataBehavior<Log, String, TestFault>,
        ) -> Result<(), Fault<TestFault>> {
            let stamp = format!("stamp:{}", context.data());
            context.instance_mut().push(stamp);
            next.execute(context).await
        }
    }

    #[tokio::test]
    async fn lifted_activity_runs_between_payload_activities() {
        let plain = from_fn("plain", |ctx: &mut BehaviorContext<'_, Log, TestFault>| {
            ctx.instance_mut().push("plain".to_string());
            Ok(())
        });
        let lifted: Arc<dyn DataActivity<Log, String, TestFault>> = Arc::new(Lifted::new(plain));
        let stamp: Arc<dyn DataActivity<Log, String, TestFault>> = Arc::new(Stamp);
        let chain = DataChain::compose(vec![lifted, stamp]);

        let mut log = Log::new();
        let payload = "order-42".to_string();
        let mut context = DataContext::for_event(&mut log, Event::new("Ship"), &payload);

        DataBehavior::execute(&chain, &mut context).await.unwrap();

        assert_eq!(log, vec!["plain", "stamp:order-42"]);
    }

    #[test]
    fn lifted_activity_keeps_inner_name() {
        let plain = from_fn("plain", |_ctx: &mut BehaviorContext<'_, Log, TestFault>| Ok(()));
        let lifted: Lifted<Log, String, TestFault> = Lifted::new(plain);
        assert_eq!(DataActivity::name(&lifted), "plain");
    }
}
