//! Recovery handlers and the per-guard registry that groups them by kind.

use super::Activity;
use crate::behavior::Instance;
use crate::core::FaultKind;
use indexmap::IndexMap;
use std::sync::Arc;

/// A recovery activity declared for one fault kind.
pub struct ExceptionHandler<I: Instance, K: FaultKind> {
    kind: K,
    activity: Arc<dyn Activity<I, K>>,
}

impl<I: Instance, K: FaultKind> ExceptionHandler<I, K> {
    pub fn new(kind: K, activity: Arc<dyn Activity<I, K>>) -> Self {
        Self { kind, activity }
    }

    /// The fault kind this handler targets.
    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn activity(&self) -> &Arc<dyn Activity<I, K>> {
        &self.activity
    }
}

impl<I: Instance, K: FaultKind> Clone for ExceptionHandler<I, K> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            activity: Arc::clone(&self.activity),
        }
    }
}

/// Handlers grouped by the exact fault kind they target.
///
/// Each kind maps to one list, kept in registration order. Lookups are by
/// exact kind only; walking the fallback hierarchy is the guarded
/// activity's job. Iteration follows the order in which kinds were first
/// registered.
pub struct HandlerRegistry<I: Instance, K: FaultKind> {
    handlers: IndexMap<K, Vec<Arc<dyn Activity<I, K>>>>,
}

impl<I: Instance, K: FaultKind> HandlerRegistry<I, K> {
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Append `handler` to the list for `kind`, creating the list on first use.
    pub fn register(&mut self, kind: K, handler: Arc<dyn Activity<I, K>>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Handlers registered for exactly `kind`, empty if there are none.
    pub fn lookup(&self, kind: K) -> &[Arc<dyn Activity<I, K>>] {
        self.handlers.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &[Arc<dyn Activity<I, K>>])> + '_ {
        self.handlers
            .iter()
            .map(|(kind, handlers)| (*kind, handlers.as_slice()))
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(K, &[Arc<dyn Activity<I, K>>]),
    {
        for (kind, handlers) in self.iter() {
            f(kind, handlers);
        }
    }

    /// Kinds with at least one handler, in first-registration order.
    pub fn kinds(&self) -> impl Iterator<Item = K> + '_ {
        self.handlers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<I: Instance, K: FaultKind> Default for HandlerRegistry<I, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Instance, K: FaultKind> FromIterator<ExceptionHandler<I, K>> for HandlerRegistry<I, K> {
    fn from_iter<T: IntoIterator<Item = ExceptionHandler<I, K>>>(handlers: T) -> Self {
        let mut registry = Self::new();
        for handler in handlers {
            registry.register(handler.kind, handler.activity);
        }
        registry
    }
}
