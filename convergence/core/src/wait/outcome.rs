use std::{error::Error as StdError, time::Duration};

use thiserror::Error;

use super::spec::{ResourceId, StatusLabel};

/// Terminal failures of a wait. Timeouts are reported separately.
#[derive(Debug, Error)]
pub enum WaitFailure {
    #[error("failed to observe {resource}: {source}")]
    Observation {
        resource: ResourceId,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("{resource} reported unexpected state: {label}")]
    UnexpectedState {
        resource: ResourceId,
        label: StatusLabel,
    },
    #[error("{resource} disappeared unexpectedly")]
    Disappeared { resource: ResourceId },
    #[error("wait for {resource} was cancelled")]
    Cancelled { resource: ResourceId },
}

impl WaitFailure {
    #[must_use]
    pub const fn resource(&self) -> &ResourceId {
        match self {
            Self::Observation { resource, .. }
            | Self::UnexpectedState { resource, .. }
            | Self::Disappeared { resource }
            | Self::Cancelled { resource } => resource,
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Result of a wait, returned once and owned by the caller.
#[derive(Debug)]
pub enum WaitOutcome<T> {
    /// The resource reached a target state, or disappeared on a wait for
    /// absence (`None`).
    Reached(Option<T>),
    /// The budget ran out before the resource converged.
    TimedOut {
        resource: ResourceId,
        elapsed: Duration,
        last_state: Option<StatusLabel>,
    },
    Failed(WaitFailure),
}

impl<T> WaitOutcome<T> {
    #[must_use]
    pub const fn is_reached(&self) -> bool {
        matches!(self, Self::Reached(_))
    }

    #[must_use]
    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&WaitFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Collapse into a `Result` for callers that propagate with `?`.
    pub fn into_result(self) -> Result<Option<T>, WaitError> {
        match self {
            Self::Reached(resource) => Ok(resource),
            Self::TimedOut {
                resource,
                elapsed,
                last_state,
            } => Err(WaitError::TimedOut {
                resource,
                elapsed,
                last_state,
            }),
            Self::Failed(failure) => Err(WaitError::Failed(failure)),
        }
    }
}

#[derive(Debug, Error)]
pub enum WaitError {
    #[error(
        "timed out waiting for {resource} after {elapsed:?} (last state: {})",
        display_state(.last_state)
    )]
    TimedOut {
        resource: ResourceId,
        elapsed: Duration,
        last_state: Option<StatusLabel>,
    },
    #[error(transparent)]
    Failed(#[from] WaitFailure),
}

impl WaitError {
    /// Timeouts may succeed when the whole wait is retried with a larger
    /// budget; failures will not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

fn display_state(state: &Option<StatusLabel>) -> &str {
    state.as_ref().map_or("none", StatusLabel::as_str)
}
