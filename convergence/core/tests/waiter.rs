use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use convergence_core::{
    CancellationToken, Observation, Refresher, ResourceId, StatusLabel, WaitFailure, WaitOutcome,
    WaitSpec, from_fn, wait,
};
use thiserror::Error;
use tokio::time::{Instant, sleep};

#[derive(Debug, Error)]
#[error("connection reset by peer")]
struct FetchFailed;

type Scripted = Result<Observation<u32>, FetchFailed>;

/// Replays a fixed script, then keeps answering with the fallback label.
struct ScriptedRefresher {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Option<&'static str>,
    calls: AtomicUsize,
    call_times: Mutex<Vec<Instant>>,
}

impl ScriptedRefresher {
    fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback: None,
            calls: AtomicUsize::new(0),
            call_times: Mutex::new(Vec::new()),
        }
    }

    fn labels(labels: &[&str]) -> Self {
        Self::new(
            labels
                .iter()
                .enumerate()
                .map(|(idx, label)| Ok(Observation::observed(*label, idx as u32))),
        )
    }

    fn repeating(label: &'static str) -> Self {
        let mut refresher = Self::new([]);
        refresher.fallback = Some(label);
        refresher
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }
}

#[async_trait]
impl Refresher for ScriptedRefresher {
    type Resource = u32;
    type Error = FetchFailed;

    async fn refresh(&self, _id: &ResourceId) -> Result<Observation<u32>, FetchFailed> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_times.lock().unwrap().push(Instant::now());
        let next = self.script.lock().unwrap().pop_front();
        match (next, self.fallback) {
            (Some(scripted), _) => scripted,
            (None, Some(label)) => Ok(Observation::observed(label, call as u32)),
            (None, None) => panic!("script exhausted after {call} calls"),
        }
    }

    fn absence_label(&self) -> Option<StatusLabel> {
        Some(StatusLabel::from("Deleted"))
    }
}

fn create_spec() -> WaitSpec {
    WaitSpec::builder(Duration::from_secs(5))
        .pending(["Pending", "Provisioning"])
        .target(["Running"])
        .poll_interval(Duration::from_secs(1))
        .build()
        .unwrap()
}

fn delete_spec() -> WaitSpec {
    WaitSpec::builder(Duration::from_secs(30))
        .pending(["Pending", "Provisioning", "Running", "Deleting", "Importing"])
        .poll_interval(Duration::from_secs(1))
        .build()
        .unwrap()
}

fn cluster_id() -> ResourceId {
    ResourceId::from("cluster-7f3a")
}

#[tokio::test(start_paused = true)]
async fn zero_timeout_times_out_without_observing() {
    let spec = WaitSpec::builder(Duration::ZERO)
        .pending(["Pending"])
        .target(["Running"])
        .build()
        .unwrap();
    let refresher = ScriptedRefresher::repeating("Running");

    let outcome = wait(&cluster_id(), &spec, &refresher, &CancellationToken::new()).await;

    assert!(outcome.is_timed_out());
    assert_eq!(refresher.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn reaches_target_after_exactly_k_observations() {
    let refresher = ScriptedRefresher::labels(&["Pending", "Provisioning", "Running"]);
    let started = Instant::now();

    let outcome = wait(&cluster_id(), &create_spec(), &refresher, &CancellationToken::new()).await;

    let elapsed = started.elapsed();
    assert!(matches!(outcome, WaitOutcome::Reached(Some(2))));
    assert_eq!(refresher.calls(), 3);
    assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn always_pending_times_out_at_budget() {
    let refresher = ScriptedRefresher::repeating("Provisioning");
    let started = Instant::now();

    let outcome = wait(&cluster_id(), &create_spec(), &refresher, &CancellationToken::new()).await;

    match outcome {
        WaitOutcome::TimedOut {
            elapsed,
            last_state,
            ..
        } => {
            assert_eq!(elapsed, Duration::from_secs(5));
            assert_eq!(last_state, Some(StatusLabel::from("Provisioning")));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(started.elapsed(), Duration::from_secs(5));
    assert_eq!(refresher.calls(), 5);
}

#[tokio::test(start_paused = true)]
async fn last_sleep_is_clipped_to_remaining_budget() {
    let spec = WaitSpec::builder(Duration::from_secs(5))
        .pending(["Provisioning"])
        .target(["Running"])
        .poll_interval(Duration::from_secs(2))
        .build()
        .unwrap();
    let refresher = ScriptedRefresher::repeating("Provisioning");
    let started = Instant::now();

    let outcome = wait(&cluster_id(), &spec, &refresher, &CancellationToken::new()).await;

    assert!(outcome.is_timed_out());
    assert_eq!(started.elapsed(), Duration::from_secs(5));
    assert_eq!(refresher.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn delete_wait_succeeds_on_first_not_found() {
    let refresher = ScriptedRefresher::new([Ok(Observation::NotFound)]);

    let outcome = wait(&cluster_id(), &delete_spec(), &refresher, &CancellationToken::new()).await;

    assert!(matches!(outcome, WaitOutcome::Reached(None)));
    assert_eq!(refresher.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn delete_wait_follows_teardown_until_gone() {
    let refresher = ScriptedRefresher::new([
        Ok(Observation::observed("Running", 0)),
        Ok(Observation::observed("Deleting", 1)),
        Ok(Observation::NotFound),
    ]);

    let outcome = wait(&cluster_id(), &delete_spec(), &refresher, &CancellationToken::new()).await;

    assert!(matches!(outcome, WaitOutcome::Reached(None)));
    assert_eq!(refresher.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn unexpected_state_fails_on_the_same_tick() {
    let refresher = ScriptedRefresher::labels(&["Pending", "Failed", "Running"]);

    let outcome = wait(&cluster_id(), &create_spec(), &refresher, &CancellationToken::new()).await;

    match outcome.failure() {
        Some(WaitFailure::UnexpectedState { label, .. }) => assert_eq!(label.as_str(), "Failed"),
        other => panic!("expected unexpected state, got {other:?}"),
    }
    assert_eq!(refresher.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn observation_error_is_not_retried() {
    let refresher =
        ScriptedRefresher::new([Err(FetchFailed), Ok(Observation::observed("Running", 1))]);

    let outcome = wait(&cluster_id(), &create_spec(), &refresher, &CancellationToken::new()).await;

    match outcome.failure() {
        Some(failure @ WaitFailure::Observation { .. }) => assert_eq!(
            failure.to_string(),
            "failed to observe cluster-7f3a: connection reset by peer"
        ),
        other => panic!("expected observation failure, got {other:?}"),
    }
    assert_eq!(refresher.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn premature_disappearance_fails() {
    let refresher = ScriptedRefresher::new([
        Ok(Observation::observed("Provisioning", 0)),
        Ok(Observation::NotFound),
    ]);

    let outcome = wait(&cluster_id(), &create_spec(), &refresher, &CancellationToken::new()).await;

    assert!(matches!(
        outcome.failure(),
        Some(WaitFailure::Disappeared { .. })
    ));
    assert_eq!(refresher.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_poll_sleep_returns_promptly() {
    let spec = WaitSpec::builder(Duration::from_secs(60))
        .pending(["Provisioning"])
        .target(["Running"])
        .poll_interval(Duration::from_secs(1))
        .build()
        .unwrap();
    let mut labels = vec!["Provisioning"; 9];
    labels.push("Running");
    let refresher = ScriptedRefresher::labels(&labels);
    let cancel = CancellationToken::new();
    let id = cluster_id();
    let started = Instant::now();

    let (outcome, ()) = tokio::join!(wait(&id, &spec, &refresher, &cancel), async {
        sleep(Duration::from_millis(1500)).await;
        cancel.cancel();
    });

    assert!(outcome.failure().is_some_and(WaitFailure::is_cancelled));
    assert_eq!(refresher.calls(), 2);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn initial_delay_precedes_first_observation() {
    let spec = WaitSpec::builder(Duration::from_secs(60))
        .pending(["NotReady"])
        .target(["Ready"])
        .poll_interval(Duration::from_secs(10))
        .delay(Duration::from_secs(30))
        .build()
        .unwrap();
    let refresher = ScriptedRefresher::labels(&["NotReady", "Ready"]);
    let started = Instant::now();

    let outcome = wait(&cluster_id(), &spec, &refresher, &CancellationToken::new()).await;

    assert!(outcome.is_reached());
    let offsets: Vec<Duration> = refresher
        .call_times()
        .into_iter()
        .map(|at| at - started)
        .collect();
    assert_eq!(offsets, vec![Duration::from_secs(30), Duration::from_secs(40)]);
}

#[tokio::test(start_paused = true)]
async fn delay_counts_against_the_budget() {
    let spec = WaitSpec::builder(Duration::from_secs(20))
        .pending(["NotReady"])
        .target(["Ready"])
        .delay(Duration::from_secs(30))
        .build()
        .unwrap();
    let refresher = ScriptedRefresher::repeating("Ready");

    let outcome = wait(&cluster_id(), &spec, &refresher, &CancellationToken::new()).await;

    assert!(outcome.is_timed_out());
    assert_eq!(refresher.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_initial_delay_skips_observation() {
    let spec = WaitSpec::builder(Duration::from_secs(60))
        .pending(["NotReady"])
        .target(["Ready"])
        .delay(Duration::from_secs(30))
        .build()
        .unwrap();
    let refresher = ScriptedRefresher::repeating("Ready");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = wait(&cluster_id(), &spec, &refresher, &cancel).await;

    assert!(outcome.failure().is_some_and(WaitFailure::is_cancelled));
    assert_eq!(refresher.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn closure_refresher_maps_absence_to_target() {
    let spec = WaitSpec::builder(Duration::from_secs(30))
        .pending(["Deleting"])
        .target(["Deleted"])
        .poll_interval(Duration::from_secs(1))
        .build()
        .unwrap();
    let calls = AtomicUsize::new(0);
    let refresher = from_fn(|_id: ResourceId| {
        let call = calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if call < 2 {
                Ok::<_, FetchFailed>(Observation::observed("Deleting", ()))
            } else {
                Ok(Observation::NotFound)
            }
        }
    })
    .with_absence_label("Deleted");

    let outcome = wait(&cluster_id(), &spec, &refresher, &CancellationToken::new()).await;

    assert!(matches!(outcome, WaitOutcome::Reached(None)));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
