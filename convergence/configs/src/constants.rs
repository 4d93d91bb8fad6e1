use std::time::Duration;

/// Default interval between two observations of a converging resource.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default delay before the first observation, giving the control plane time
/// to publish state for a freshly submitted operation.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(30);

/// Default create budget for a cluster.
pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Default delete budget for a cluster.
pub const DEFAULT_DELETE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Carved out of the create budget so the caller still has time to report
/// after a wait times out.
pub const TIMEOUT_SAFETY_MARGIN: Duration = Duration::from_secs(60);

/// Default control-plane endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.spectrocloud.com";
