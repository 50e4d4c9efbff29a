//! Property-based tests for chain composition and fault recovery.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use std::sync::Arc;
use trellis::activity::{from_fn, Activity, ExceptionHandler, TryActivity};
use trellis::behavior::{Behavior, BehaviorContext, Chain, EmptyBehavior};
use trellis::core::{Event, Fault, FaultKind, State};
use trellis::persistence::{PersistenceError, StateConverter};
use trellis::{fault_kind, state_enum};

fault_kind! {
    enum Depth {
        Root,
        One: Root,
        Two: One,
        Three: Two,
        Four: Three,
        Unhandled: Root,
    }
    unhandled: Unhandled
}

state_enum! {
    enum TestState {
        Initial,
        Processing,
        Complete,
        Failed,
    }
}

type Log = Vec<String>;
type Ctx<'a> = BehaviorContext<'a, Log, Depth>;

const LEVELS: [Depth; 4] = [Depth::One, Depth::Two, Depth::Three, Depth::Four];

fn record(label: String) -> Arc<dyn Activity<Log, Depth>> {
    from_fn(label.clone(), move |ctx: &mut Ctx<'_>| {
        ctx.instance_mut().push(label.clone());
        Ok(())
    })
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

prop_compose! {
    fn arbitrary_state()(variant in 0..4u8) -> TestState {
        match variant {
            0 => TestState::Initial,
            1 => TestState::Processing,
            2 => TestState::Complete,
            _ => TestState::Failed,
        }
    }
}

proptest! {
    #[test]
    fn chain_runs_every_activity_once_in_order(length in 0..10usize) {
        let labels: Vec<String> = (0..length).map(|i| format!("step-{i}")).collect();
        let chain = Chain::compose(labels.iter().cloned().map(record).collect::<Vec<_>>());
        let tail = Chain::single(record("tail".to_string()));

        let mut log = Log::new();
        run(Activity::execute(&chain, &mut Ctx::new(&mut log), &tail)).unwrap();

        let mut expected = labels;
        expected.push("tail".to_string());
        prop_assert_eq!(log, expected);
        prop_assert_eq!(chain.len(), length);
    }

    #[test]
    fn nearest_registered_level_handles_fault(
        thrown in 0..4usize,
        registered in prop::collection::vec(any::<bool>(), 4),
    ) {
        let handlers: Vec<ExceptionHandler<Log, Depth>> = LEVELS
            .iter()
            .zip(&registered)
            .filter(|(_, enabled)| **enabled)
            .map(|(kind, _)| ExceptionHandler::new(*kind, record(kind.name().to_string())))
            .collect();
        let kind = LEVELS[thrown];
        let guarded = TryActivity::new(
            Event::new("Throw"),
            vec![from_fn("throw", move |_ctx: &mut Ctx<'_>| Err(Fault::new(kind, "boom")))],
            handlers,
        );

        let mut log = Log::new();
        let result = run(guarded.execute(&mut Ctx::new(&mut log), &EmptyBehavior));

        let expected = (0..=thrown).rev().find(|level| registered[*level]);
        match expected {
            Some(level) => {
                prop_assert!(result.is_ok());
                prop_assert_eq!(log, vec![LEVELS[level].name().to_string()]);
            }
            None => {
                let error = result.unwrap_err();
                prop_assert!(error.is_unhandled());
                prop_assert_eq!(error.cause().map(|cause| cause.kind()), Some(kind));
                prop_assert!(log.is_empty());
            }
        }
    }

    #[test]
    fn handlers_for_one_kind_run_in_registration_order(count in 1..8usize) {
        let labels: Vec<String> = (0..count).map(|i| format!("handler-{i}")).collect();
        let guarded = TryActivity::new(
            Event::new("Throw"),
            vec![from_fn("throw", |_ctx: &mut Ctx<'_>| Err(Fault::new(Depth::Two, "boom")))],
            labels
                .iter()
                .cloned()
                .map(|label| ExceptionHandler::new(Depth::Two, record(label))),
        );

        let mut log = Log::new();
        run(guarded.execute(&mut Ctx::new(&mut log), &EmptyBehavior)).unwrap();

        prop_assert_eq!(log, labels);
    }

    #[test]
    fn lineage_never_yields_root(level in 0..4usize) {
        let lineage: Vec<Depth> = LEVELS[level].lineage().collect();

        prop_assert_eq!(lineage.len(), level + 1);
        prop_assert!(lineage.iter().all(|kind| !kind.is_root()));
        prop_assert_eq!(lineage[0], LEVELS[level]);
    }

    #[test]
    fn stored_state_round_trips_to_same_object(state in arbitrary_state()) {
        let states: Vec<Arc<TestState>> = vec![
            Arc::new(TestState::Initial),
            Arc::new(TestState::Processing),
            Arc::new(TestState::Complete),
            Arc::new(TestState::Failed),
        ];
        let converter = StateConverter::new(states.clone()).unwrap();
        let original = states
            .iter()
            .find(|candidate| candidate.name() == state.name())
            .unwrap();

        let stored = converter.write(Some(original.as_ref()));
        let restored = converter.read(stored.as_deref()).unwrap().unwrap();

        prop_assert!(Arc::ptr_eq(&restored, original));
    }

    #[test]
    fn foreign_state_names_are_rejected(name in "[a-z]{1,12}") {
        let converter = StateConverter::new(vec![
            Arc::new(TestState::Initial),
            Arc::new(TestState::Processing),
            Arc::new(TestState::Complete),
            Arc::new(TestState::Failed),
        ])
        .unwrap();

        let result = converter.read(Some(name.as_str()));

        prop_assert_eq!(
            result.unwrap_err(),
            PersistenceError::UnknownState { name: name.clone() }
        );
    }
}

#[test]
fn composed_chain_executes_as_behavior() {
    let chain = Chain::compose(vec![record("a".to_string()), record("b".to_string())]);
    let mut log = Log::new();

    run(Behavior::execute(&chain, &mut Ctx::new(&mut log))).unwrap();

    assert_eq!(log, vec!["a", "b"]);
}
