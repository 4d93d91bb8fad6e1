use std::time::Duration;

use convergence_config::{
    adjust_timeout,
    constants::{
        DEFAULT_CREATE_TIMEOUT, DEFAULT_DELETE_TIMEOUT, DEFAULT_INITIAL_DELAY,
        DEFAULT_POLL_INTERVAL, TIMEOUT_SAFETY_MARGIN,
    },
    timeouts,
};

/// Timing shared by every lifecycle wait of a cluster.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LifecyclePolicy {
    pub create_timeout: Duration,
    pub delete_timeout: Duration,
    pub poll_interval: Duration,
    pub initial_delay: Duration,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            create_timeout: DEFAULT_CREATE_TIMEOUT,
            delete_timeout: DEFAULT_DELETE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

impl LifecyclePolicy {
    /// Defaults overridden by `CONVERGENCE_*_SECS` environment variables.
    /// Timeouts double when `SLOW_TEST_ENV=true`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            create_timeout: adjust_timeout(timeouts::create_timeout()),
            delete_timeout: adjust_timeout(timeouts::delete_timeout()),
            poll_interval: timeouts::poll_interval(),
            initial_delay: timeouts::initial_delay(),
        }
    }

    #[must_use]
    pub const fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_delete_timeout(mut self, timeout: Duration) -> Self {
        self.delete_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Budget for ready/running/pause/resume waits: the create timeout minus
    /// a minute kept for reporting.
    #[must_use]
    pub const fn convergence_timeout(&self) -> Duration {
        self.create_timeout.saturating_sub(TIMEOUT_SAFETY_MARGIN)
    }
}
