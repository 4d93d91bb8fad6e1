use std::time::Duration;

use convergence_env as cv_env;
use tracing::warn;

use crate::constants::{
    DEFAULT_CREATE_TIMEOUT, DEFAULT_DELETE_TIMEOUT, DEFAULT_INITIAL_DELAY, DEFAULT_POLL_INTERVAL,
};

/// Parse a whole number of seconds, falling back to `default` when the value
/// is absent or malformed.
#[must_use]
pub fn duration_secs_or(key: &str, raw: Option<String>, default: Duration) -> Duration {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => {
            warn!(key, value = %raw, "ignoring non-numeric duration override");
            default
        }
    }
}

pub fn poll_interval() -> Duration {
    duration_secs_or(
        "CONVERGENCE_POLL_INTERVAL_SECS",
        cv_env::convergence_poll_interval_secs(),
        DEFAULT_POLL_INTERVAL,
    )
}

pub fn initial_delay() -> Duration {
    duration_secs_or(
        "CONVERGENCE_INITIAL_DELAY_SECS",
        cv_env::convergence_initial_delay_secs(),
        DEFAULT_INITIAL_DELAY,
    )
}

pub fn create_timeout() -> Duration {
    duration_secs_or(
        "CONVERGENCE_CREATE_TIMEOUT_SECS",
        cv_env::convergence_create_timeout_secs(),
        DEFAULT_CREATE_TIMEOUT,
    )
}

pub fn delete_timeout() -> Duration {
    duration_secs_or(
        "CONVERGENCE_DELETE_TIMEOUT_SECS",
        cv_env::convergence_delete_timeout_secs(),
        DEFAULT_DELETE_TIMEOUT,
    )
}
