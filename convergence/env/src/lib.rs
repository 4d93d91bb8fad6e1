use std::env;

#[must_use]
pub fn slow_test_env() -> bool {
    env::var("SLOW_TEST_ENV").is_ok_and(|s| s == "true")
}

#[must_use]
pub fn convergence_poll_interval_secs() -> Option<String> {
    env::var("CONVERGENCE_POLL_INTERVAL_SECS").ok()
}

#[must_use]
pub fn convergence_initial_delay_secs() -> Option<String> {
    env::var("CONVERGENCE_INITIAL_DELAY_SECS").ok()
}

#[must_use]
pub fn convergence_create_timeout_secs() -> Option<String> {
    env::var("CONVERGENCE_CREATE_TIMEOUT_SECS").ok()
}

#[must_use]
pub fn convergence_delete_timeout_secs() -> Option<String> {
    env::var("CONVERGENCE_DELETE_TIMEOUT_SECS").ok()
}

#[must_use]
pub fn convergence_api_endpoint() -> Option<String> {
    env::var("CONVERGENCE_API_ENDPOINT").ok()
}

#[must_use]
pub fn convergence_api_key() -> Option<String> {
    env::var("CONVERGENCE_API_KEY").ok()
}

#[must_use]
pub fn convergence_project_uid() -> Option<String> {
    env::var("CONVERGENCE_PROJECT_UID").ok()
}
