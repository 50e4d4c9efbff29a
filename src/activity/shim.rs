//! Event-bound activities projected into the instance-only shape.

use super::Activity;
use crate::behavior::{Behavior, BehaviorContext, Instance};
use crate::core::{Event, Fault, FaultKind};
use crate::inspect::{Inspector, Node};
use async_trait::async_trait;
use std::sync::Arc;

/// Binds an activity to a fixed event.
///
/// The wrapped activity (and everything after it) runs against a context
/// reporting `event`, so event-typed activities can be mixed into
/// composites that only carry the instance.
pub struct EventActivityShim<I: Instance, K: FaultKind> {
    event: Event,
    activity: Arc<dyn Activity<I, K>>,
}

impl<I: Instance, K: FaultKind> EventActivityShim<I, K> {
    pub fn new(event: Event, activity: Arc<dyn Activity<I, K>>) -> Self {
        Self { event, activity }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }
}

#[async_trait]
impl<I: Instance, K: FaultKind> Activity<I, K> for EventActivityShim<I, K> {
    async fn execute(
        &self,
        context: &mut BehaviorContext<'_, I, K>,
        next: &dyn Behavior<I, K>,
    ) -> Result<(), Fault<K>> {
        let mut bound = context.with_event(self.event.clone());
        self.activity.execute(&mut bound, next).await
    }

    fn name(&self) -> &str {
        self.activity.name()
    }

    fn accept(&self, inspector: &mut dyn Inspector) {
        inspector.inspect(Node::Event(&self.event), &mut |inspector: &mut dyn Inspector| {
            self.activity.accept(inspector);
        });
    }
}
