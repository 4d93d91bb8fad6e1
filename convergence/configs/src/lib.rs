pub mod constants;
pub mod timeouts;

use std::{ops::Mul as _, sync::LazyLock, time::Duration};

use convergence_env as cv_env;

static IS_SLOW_TEST_ENV: LazyLock<bool> = LazyLock::new(|| cv_env::slow_test_env());

/// In slow test environments like CI, use 2x timeout.
#[must_use]
pub fn adjust_timeout(d: Duration) -> Duration {
    if *IS_SLOW_TEST_ENV { d.mul(2) } else { d }
}
