//! Label sets used by the cluster lifecycle waits.
//!
//! These are presets, not policy: callers may build their own
//! [`WaitSpec`](convergence_core::WaitSpec) with different sets.

pub const READY: &str = "Ready";
pub const NOT_READY: &str = "NotReady";
pub const RUNNING: &str = "Running";
pub const PAUSED: &str = "Paused";
/// Reported for a cluster that exists but has not published a state yet.
pub const UNKNOWN: &str = "Unknown";
/// Stands in for a cluster that can no longer be fetched.
pub const DELETED: &str = "Deleted";

pub const READY_PENDING: &[&str] = &[NOT_READY];
pub const READY_TARGET: &[&str] = &[READY];

pub const CREATE_PENDING: &[&str] = &[UNKNOWN, "Pending", "Provisioning", "Importing"];
pub const CREATE_TARGET: &[&str] = &[RUNNING];

pub const DELETE_PENDING: &[&str] = &["Pending", "Provisioning", RUNNING, "Deleting", "Importing"];

// A pause or resume may be issued while the opposite transition is still in
// flight, so both in-between states are pending for either direction.
pub const PAUSE_PENDING: &[&str] = &[RUNNING, "Resuming", "Pausing"];
pub const PAUSE_TARGET: &[&str] = &[PAUSED];

pub const RESUME_PENDING: &[&str] = &[PAUSED, "Pausing", "Resuming"];
pub const RESUME_TARGET: &[&str] = &[RUNNING];
