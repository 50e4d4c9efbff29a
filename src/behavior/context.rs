//! Execution contexts pushed through a behavior chain.

use crate::core::{Event, Fault};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// The owning instance, plus the event being handled and, inside a
/// recovery handler, the captured fault.
///
/// Nodes receive the context by mutable reference and may change the
/// instance. Derived contexts (`with_event`, `exception_context`) reborrow
/// the same instance, so effects made through them are visible to the
/// original context afterwards.
pub struct BehaviorContext<'a, I, K> {
    instance: &'a mut I,
    event: Option<Event>,
    exception: Option<Arc<Fault<K>>>,
}

impl<'a, I, K> BehaviorContext<'a, I, K> {
    pub fn new(instance: &'a mut I) -> Self {
        Self {
            instance,
            event: None,
            exception: None,
        }
    }

    pub fn for_event(instance: &'a mut I, event: Event) -> Self {
        Self {
            instance,
            event: Some(event),
            exception: None,
        }
    }

    pub fn instance(&self) -> &I {
        &*self.instance
    }

    pub fn instance_mut(&mut self) -> &mut I {
        &mut *self.instance
    }

    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    /// The fault being recovered from. Only set inside recovery handlers.
    pub fn exception(&self) -> Option<&Arc<Fault<K>>> {
        self.exception.as_ref()
    }

    /// Context for the same instance bound to `event`.
    pub fn with_event(&mut self, event: Event) -> BehaviorContext<'_, I, K> {
        BehaviorContext {
            instance: &mut *self.instance,
            event: Some(event),
            exception: self.exception.clone(),
        }
    }

    /// Context handed to a recovery handler: this context plus the
    /// captured fault.
    pub fn exception_context(&mut self, exception: Arc<Fault<K>>) -> BehaviorContext<'_, I, K> {
        BehaviorContext {
            instance: &mut *self.instance,
            event: self.event.clone(),
            exception: Some(exception),
        }
    }

    pub(crate) fn reborrow(&mut self) -> BehaviorContext<'_, I, K> {
        BehaviorContext {
            instance: &mut *self.instance,
            event: self.event.clone(),
            exception: self.exception.clone(),
        }
    }
}

/// A [`BehaviorContext`] that also carries the event's payload.
///
/// Dereferences to the instance-only context, so anything written against
/// `BehaviorContext` also works with the payload-carrying shape.
pub struct DataContext<'a, I, D, K> {
    context: BehaviorContext<'a, I, K>,
    data: &'a D,
}

impl<'a, I, D, K> DataContext<'a, I, D, K> {
    pub fn new(context: BehaviorContext<'a, I, K>, data: &'a D) -> Self {
        Self { context, data }
    }

    pub fn for_event(instance: &'a mut I, event: Event, data: &'a D) -> Self {
        Self::new(BehaviorContext::for_event(instance, event), data)
    }

    pub fn data(&self) -> &'a D {
        self.data
    }

    pub fn as_behavior_mut(&mut self) -> &mut BehaviorContext<'a, I, K> {
        &mut self.context
    }
}

impl<'a, I, D, K> Deref for DataContext<'a, I, D, K> {
    type Target = BehaviorContext<'a, I, K>;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

impl<I, D, K> DerefMut for DataContext<'_, I, D, K> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.context
    }
}
