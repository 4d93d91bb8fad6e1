use convergence_core::{WaitError, WaitSpecError};
use thiserror::Error;

use crate::client::ClientError;

/// Failures of a cluster lifecycle operation.
#[derive(Debug, Error)]
pub enum ClusterLifecycleError {
    #[error("invalid wait configuration: {0}")]
    Spec(#[from] WaitSpecError),
    #[error(transparent)]
    Wait(#[from] WaitError),
    #[error("failed to {action} cluster {uid}: {source}")]
    Client {
        action: &'static str,
        uid: String,
        #[source]
        source: ClientError,
    },
}

impl ClusterLifecycleError {
    /// True when the wait ran out of time; retrying with a larger budget may
    /// succeed.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Wait(err) if err.is_retryable())
    }
}
