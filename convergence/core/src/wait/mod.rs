mod classify;
mod outcome;
mod refresher;
mod spec;

use std::time::Duration;

pub use classify::{Step, classify};
pub use outcome::{WaitError, WaitFailure, WaitOutcome};
pub use refresher::{FnRefresher, Observation, Refresher, from_fn};
pub use spec::{ResourceId, StatusLabel, WaitSpec, WaitSpecBuilder, WaitSpecError};
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Poll `refresher` for `id` until the observed state converges per `spec`.
///
/// The clock starts on entry, so the initial delay counts against the
/// timeout. The budget is checked before every observation; a zero timeout
/// returns [`WaitOutcome::TimedOut`] without observing. Observation errors
/// end the wait immediately. `cancel` is honoured at both suspension points.
pub async fn wait<R>(
    id: &ResourceId,
    spec: &WaitSpec,
    refresher: &R,
    cancel: &CancellationToken,
) -> WaitOutcome<R::Resource>
where
    R: Refresher + ?Sized,
{
    let started = Instant::now();
    let absence_label = refresher.absence_label();

    info!(
        resource = %id,
        pending = ?spec.pending(),
        target = ?spec.target(),
        timeout_secs = spec.timeout().as_secs_f32(),
        poll_ms = spec.poll_interval().as_millis(),
        "waiting for resource state"
    );

    if !spec.delay().is_zero() {
        debug!(
            resource = %id,
            delay_ms = spec.delay().as_millis(),
            "delaying first observation"
        );
        if !suspend(spec.delay(), cancel).await {
            return cancelled(id);
        }
    }

    let mut attempt: u32 = 0;
    let mut last_state: Option<StatusLabel> = None;

    loop {
        let elapsed = started.elapsed();
        if elapsed >= spec.timeout() {
            warn!(
                resource = %id,
                attempts = attempt,
                elapsed_ms = elapsed.as_millis(),
                last_state = last_state.as_ref().map(StatusLabel::as_str),
                "timed out waiting for resource state"
            );
            return WaitOutcome::TimedOut {
                resource: id.clone(),
                elapsed,
                last_state,
            };
        }

        if cancel.is_cancelled() {
            return cancelled(id);
        }

        attempt += 1;
        let observation = match refresher.refresh(id).await {
            Ok(observation) => observation,
            Err(source) => {
                warn!(resource = %id, attempt, error = %source, "failed to observe resource");
                return WaitOutcome::Failed(WaitFailure::Observation {
                    resource: id.clone(),
                    source: Box::new(source),
                });
            }
        };

        debug!(
            resource = %id,
            attempt,
            state = observation.label().map_or("<not found>", StatusLabel::as_str),
            elapsed_ms = started.elapsed().as_millis(),
            "observed resource state"
        );

        if let Some(label) = observation.label() {
            last_state = Some(label.clone());
        }

        match classify(spec, absence_label.as_ref(), observation) {
            Step::Continue => {}
            Step::Reached(resource) => {
                info!(
                    resource = %id,
                    attempts = attempt,
                    elapsed_ms = started.elapsed().as_millis(),
                    "resource reached target state"
                );
                return WaitOutcome::Reached(resource);
            }
            Step::Unexpected(label) => {
                warn!(resource = %id, state = %label, "resource reported unexpected state");
                return WaitOutcome::Failed(WaitFailure::UnexpectedState {
                    resource: id.clone(),
                    label,
                });
            }
            Step::Disappeared => {
                warn!(resource = %id, "resource disappeared while waiting");
                return WaitOutcome::Failed(WaitFailure::Disappeared {
                    resource: id.clone(),
                });
            }
        }

        let remaining = spec.timeout().saturating_sub(started.elapsed());
        if !suspend(spec.poll_interval().min(remaining), cancel).await {
            return cancelled(id);
        }
    }
}

/// Sleep for `duration` unless `cancel` fires first. Returns `false` when
/// cancelled.
async fn suspend(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        () = sleep(duration) => true,
    }
}

fn cancelled<T>(id: &ResourceId) -> WaitOutcome<T> {
    info!(resource = %id, "wait cancelled");
    WaitOutcome::Failed(WaitFailure::Cancelled {
        resource: id.clone(),
    })
}
