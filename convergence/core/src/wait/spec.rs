use std::{borrow::Borrow, collections::BTreeSet, fmt, time::Duration};

use convergence_config::constants::DEFAULT_POLL_INTERVAL;
use thiserror::Error;

/// Opaque lifecycle state reported by a remote system.
///
/// Labels form no closed set: which ones mean "keep waiting" and which mean
/// "done" is decided per wait by [`WaitSpec`].
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StatusLabel(String);

impl StatusLabel {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for StatusLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatusLabel {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StatusLabel {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of the remote resource a wait converges on.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ResourceId(String);

impl ResourceId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WaitSpecError {
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
    #[error("pending and target states overlap: {}", join_labels(.labels))]
    OverlappingStates { labels: Vec<StatusLabel> },
}

fn join_labels(labels: &[StatusLabel]) -> String {
    labels
        .iter()
        .map(StatusLabel::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parameters of a single convergence wait.
///
/// An empty target set means the wait succeeds once the resource is gone.
#[derive(Clone, Debug)]
pub struct WaitSpec {
    pending: BTreeSet<StatusLabel>,
    target: BTreeSet<StatusLabel>,
    timeout: Duration,
    poll_interval: Duration,
    delay: Duration,
}

impl WaitSpec {
    /// Start building a spec with the given wall-clock budget.
    #[must_use]
    pub fn builder(timeout: Duration) -> WaitSpecBuilder {
        WaitSpecBuilder::new(timeout)
    }

    #[must_use]
    pub const fn pending(&self) -> &BTreeSet<StatusLabel> {
        &self.pending
    }

    #[must_use]
    pub const fn target(&self) -> &BTreeSet<StatusLabel> {
        &self.target
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// True when the wait only ends once the resource disappears.
    #[must_use]
    pub fn waits_for_absence(&self) -> bool {
        self.target.is_empty()
    }

    #[must_use]
    pub fn is_pending(&self, label: &str) -> bool {
        self.pending.contains(label)
    }

    #[must_use]
    pub fn is_target(&self, label: &str) -> bool {
        self.target.contains(label)
    }
}

/// Builder for [`WaitSpec`]. Validation happens in [`WaitSpecBuilder::build`].
#[derive(Clone, Debug)]
pub struct WaitSpecBuilder {
    pending: BTreeSet<StatusLabel>,
    target: BTreeSet<StatusLabel>,
    timeout: Duration,
    poll_interval: Duration,
    delay: Duration,
}

impl WaitSpecBuilder {
    fn new(timeout: Duration) -> Self {
        Self {
            pending: BTreeSet::new(),
            target: BTreeSet::new(),
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
            delay: Duration::ZERO,
        }
    }

    /// Add labels meaning "still converging".
    #[must_use]
    pub fn pending<I, L>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<StatusLabel>,
    {
        self.pending.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Add labels meaning "converged".
    #[must_use]
    pub fn target<I, L>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<StatusLabel>,
    {
        self.target.extend(labels.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn build(self) -> Result<WaitSpec, WaitSpecError> {
        if self.poll_interval.is_zero() {
            return Err(WaitSpecError::ZeroPollInterval);
        }

        let overlap: Vec<StatusLabel> = self.pending.intersection(&self.target).cloned().collect();
        if !overlap.is_empty() {
            return Err(WaitSpecError::OverlappingStates { labels: overlap });
        }

        Ok(WaitSpec {
            pending: self.pending,
            target: self.target,
            timeout: self.timeout,
            poll_interval: self.poll_interval,
            delay: self.delay,
        })
    }
}
