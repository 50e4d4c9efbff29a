//! Builder for guarded activities.

use crate::activity::{from_fn, Activity, DataTryActivity, ExceptionHandler, TryActivity};
use crate::behavior::{BehaviorContext, Instance, Payload};
use crate::builder::error::{BuildError, DefinitionError};
use crate::core::{Event, Fault, FaultKind};
use std::collections::HashSet;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Fluent builder for a guarded activity.
///
/// Unlike the direct constructors, [`build`](Self::build) and
/// [`build_data`](Self::build_data) validate the handler declarations first
/// and report every problem at once.
///
/// # Example
///
/// ```
/// use trellis::behavior::BehaviorContext;
/// use trellis::builder::TryBuilder;
/// use trellis::core::{Event, Fault};
/// use trellis::fault_kind;
///
/// fault_kind! {
///     enum ShipFault {
///         Any,
///         Carrier: Any,
///         Unhandled: Any,
///     }
///     unhandled: Unhandled
/// }
///
/// type Ctx<'a> = BehaviorContext<'a, Vec<String>, ShipFault>;
///
/// let guarded = TryBuilder::new(Event::new("Ship"))
///     .then_fn("book carrier", |_ctx: &mut Ctx<'_>| {
///         Err(Fault::new(ShipFault::Carrier, "no pickup slot"))
///     })
///     .catch_fn(ShipFault::Carrier, "queue for tomorrow", |ctx: &mut Ctx<'_>| {
///         ctx.instance_mut().push("queued".to_string());
///         Ok(())
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(guarded.handlers().len(), 1);
/// ```
pub struct TryBuilder<I: Instance, K: FaultKind> {
    event: Event,
    activities: Vec<Arc<dyn Activity<I, K>>>,
    handlers: Vec<ExceptionHandler<I, K>>,
}

impl<I: Instance, K: FaultKind> TryBuilder<I, K> {
    pub fn new(event: Event) -> Self {
        Self {
            event,
            activities: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Append an activity to the guarded chain.
    pub fn then(mut self, activity: Arc<dyn Activity<I, K>>) -> Self {
        self.activities.push(activity);
        self
    }

    /// Append a closure activity to the guarded chain.
    pub fn then_fn<F>(self, name: impl Into<String>, effect: F) -> Self
    where
        F: Fn(&mut BehaviorContext<'_, I, K>) -> Result<(), Fault<K>> + Send + Sync + 'static,
    {
        self.then(from_fn(name, effect))
    }

    /// Register a handler for `kind`. Handlers for the same kind run in
    /// registration order.
    pub fn catch(mut self, kind: K, activity: Arc<dyn Activity<I, K>>) -> Self {
        self.handlers.push(ExceptionHandler::new(kind, activity));
        self
    }

    pub fn catch_fn<F>(self, kind: K, name: impl Into<String>, effect: F) -> Self
    where
        F: Fn(&mut BehaviorContext<'_, I, K>) -> Result<(), Fault<K>> + Send + Sync + 'static,
    {
        self.catch(kind, from_fn(name, effect))
    }

    /// Check every handler kind, accumulating all problems.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<DefinitionError>> {
        let mut seen = HashSet::new();
        let checks: Vec<Validation<(), NonEmptyVec<DefinitionError>>> = self
            .handlers
            .iter()
            .map(ExceptionHandler::kind)
            .filter(|kind| seen.insert(*kind))
            .map(check_kind)
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the instance-only guarded activity.
    pub fn build(self) -> Result<TryActivity<I, K>, BuildError> {
        self.ensure_valid()?;
        Ok(TryActivity::new(self.event, self.activities, self.handlers))
    }

    /// Build the payload-carrying guarded activity.
    pub fn build_data<D: Payload>(self) -> Result<DataTryActivity<I, D, K>, BuildError> {
        self.ensure_valid()?;
        Ok(DataTryActivity::new(
            self.event,
            self.activities,
            self.handlers,
        ))
    }

    fn ensure_valid(&self) -> Result<(), BuildError> {
        match self.validate() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(errors) => Err(BuildError::InvalidDefinition(
                errors.iter().cloned().collect(),
            )),
        }
    }
}

fn check_kind<K: FaultKind>(kind: K) -> Validation<(), NonEmptyVec<DefinitionError>> {
    if kind.is_root() {
        return Validation::fail(DefinitionError::UnreachableHandler { fault: kind.name() });
    }

    let mut visited = HashSet::from([kind]);
    let mut current = kind.fallback();
    while let Some(next) = current {
        if !visited.insert(next) {
            return Validation::fail(DefinitionError::FallbackCycle { fault: kind.name() });
        }
        current = next.fallback();
    }
    Validation::success(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::DataActivity;
    use crate::behavior::{DataContext, EmptyBehavior};

    crate::fault_kind! {
        enum TestFault {
            Root,
            Io: Root,
            Timeout: Io,
            Unhandled: Root,
        }
        unhandled: Unhandled
    }

    /// Ping and Pong fall back to each other; Other is a second root.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Looping {
        Other,
        Ping,
        Pong,
    }

    impl FaultKind for Looping {
        fn name(&self) -> &'static str {
            match self {
                Self::Other => "Other",
                Self::Ping => "Ping",
                Self::Pong => "Pong",
            }
        }

        fn fallback(&self) -> Option<Self> {
            match self {
                Self::Other => None,
                Self::Ping => Some(Self::Pong),
                Self::Pong => Some(Self::Ping),
            }
        }

        fn unhandled() -> Self {
            Self::Other
        }
    }

    type Log = Vec<String>;
    type Ctx<'a> = BehaviorContext<'a, Log, TestFault>;

    fn push(label: &'static str) -> impl Fn(&mut Ctx<'_>) -> Result<(), Fault<TestFault>> {
        move |ctx: &mut Ctx<'_>| {
            ctx.instance_mut().push(label.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn builder_creates_working_guarded_activity() {
        let guarded = TryBuilder::new(Event::new("Submit"))
            .then_fn("a", push("a"))
            .then_fn("fail", |_ctx: &mut Ctx<'_>| {
                Err(Fault::new(TestFault::Timeout, "slow"))
            })
            .catch_fn(TestFault::Io, "recover", push("recovered"))
            .build()
            .unwrap();

        let mut log = Log::new();
        guarded
            .execute(&mut Ctx::new(&mut log), &EmptyBehavior)
            .await
            .unwrap();

        assert_eq!(guarded.event().name(), "Submit");
        assert_eq!(log, vec!["a", "recovered"]);
    }

    #[tokio::test]
    async fn builder_creates_data_form() {
        let guarded = TryBuilder::new(Event::new("Pay"))
            .then_fn("a", push("a"))
            .build_data::<u32>()
            .unwrap();

        let mut log = Log::new();
        let payload = 5u32;
        let mut context = DataContext::for_event(&mut log, Event::new("Pay"), &payload);
        guarded.execute(&mut context, &EmptyBehavior).await.unwrap();

        assert_eq!(log, vec!["a"]);
    }

    #[test]
    fn handler_on_root_kind_is_rejected() {
        let result = TryBuilder::<Log, TestFault>::new(Event::new("Submit"))
            .catch_fn(TestFault::Root, "never", push("never"))
            .build();

        let error = result.err().unwrap();
        assert_eq!(
            error.problems(),
            &[DefinitionError::UnreachableHandler { fault: "Root" }]
        );
    }

    #[test]
    fn validation_accumulates_all_problems() {
        let noop = |_ctx: &mut BehaviorContext<'_, (), Looping>| Ok(());
        let builder = TryBuilder::new(Event::new("Loop"))
            .catch_fn(Looping::Ping, "ping", noop)
            .catch_fn(Looping::Other, "other", noop)
            .catch_fn(Looping::Pong, "pong", noop)
            .catch_fn(Looping::Ping, "ping again", noop);

        match builder.validate() {
            Validation::Failure(errors) => {
                let errors: Vec<_> = errors.iter().cloned().collect();
                assert_eq!(
                    errors,
                    vec![
                        DefinitionError::FallbackCycle { fault: "Ping" },
                        DefinitionError::UnreachableHandler { fault: "Other" },
                        DefinitionError::FallbackCycle { fault: "Pong" },
                    ]
                );
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn valid_definition_passes() {
        let builder = TryBuilder::<Log, TestFault>::new(Event::new("Submit"))
            .then_fn("a", push("a"))
            .catch_fn(TestFault::Io, "io", push("io"))
            .catch_fn(TestFault::Timeout, "timeout", push("timeout"));

        assert!(matches!(builder.validate(), Validation::Success(())));
    }

    #[test]
    fn builder_without_handlers_is_valid() {
        let guarded = TryBuilder::<Log, TestFault>::new(Event::new("Submit"))
            .then_fn("a", push("a"))
            .build()
            .unwrap();

        assert!(guarded.handlers().is_empty());
    }
}
