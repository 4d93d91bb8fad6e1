use std::{error::Error as StdError, future::Future};

use async_trait::async_trait;

use super::spec::{ResourceId, StatusLabel};

/// One observation of a remote resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Observation<T> {
    /// The resource exists and reports `label`.
    Observed { label: StatusLabel, resource: T },
    /// The resource no longer exists.
    NotFound,
}

impl<T> Observation<T> {
    #[must_use]
    pub fn observed(label: impl Into<StatusLabel>, resource: T) -> Self {
        Self::Observed {
            label: label.into(),
            resource,
        }
    }

    #[must_use]
    pub const fn label(&self) -> Option<&StatusLabel> {
        match self {
            Self::Observed { label, .. } => Some(label),
            Self::NotFound => None,
        }
    }
}

/// Performs a single read of a remote resource and projects it to a label.
///
/// Implementations must not mutate remote state. An `Err` means the read
/// itself failed, which is different from the resource reporting a failed
/// state; waiters do not retry it.
#[async_trait]
pub trait Refresher: Send + Sync {
    type Resource: Send;
    type Error: StdError + Send + Sync + 'static;

    async fn refresh(&self, id: &ResourceId) -> Result<Observation<Self::Resource>, Self::Error>;

    /// Label that `NotFound` stands for, if this refresher has one.
    fn absence_label(&self) -> Option<StatusLabel> {
        None
    }
}

/// Adapter turning an async closure into a [`Refresher`].
pub struct FnRefresher<F> {
    refresh: F,
    absence_label: Option<StatusLabel>,
}

/// Wrap `refresh` as a [`Refresher`].
pub fn from_fn<F>(refresh: F) -> FnRefresher<F> {
    FnRefresher {
        refresh,
        absence_label: None,
    }
}

impl<F> FnRefresher<F> {
    #[must_use]
    pub fn with_absence_label(mut self, label: impl Into<StatusLabel>) -> Self {
        self.absence_label = Some(label.into());
        self
    }
}

#[async_trait]
impl<F, Fut, T, E> Refresher for FnRefresher<F>
where
    F: Fn(ResourceId) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Observation<T>, E>> + Send,
    T: Send,
    E: StdError + Send + Sync + 'static,
{
    type Resource = T;
    type Error = E;

    async fn refresh(&self, id: &ResourceId) -> Result<Observation<T>, E> {
        (self.refresh)(id.clone()).await
    }

    fn absence_label(&self) -> Option<StatusLabel> {
        self.absence_label.clone()
    }
}
