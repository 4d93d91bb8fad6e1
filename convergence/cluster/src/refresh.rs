//! Per-phase projections of a fetched cluster onto a status label.
//!
//! All three read the same document through [`ClusterClient::get_cluster`];
//! they differ only in which field becomes the label and in what a missing
//! cluster means.

use async_trait::async_trait;
use convergence_core::{Observation, Refresher, ResourceId, StatusLabel};
use thiserror::Error;
use tracing::debug;

use crate::{
    client::{ClientError, ClusterClient},
    model::Cluster,
    states::{DELETED, NOT_READY, READY, UNKNOWN},
};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("cluster {uid} does not report {field}")]
    MissingField { uid: String, field: &'static str },
}

/// `Ready` once the cluster publishes a status object, `NotReady` before
/// that. A cluster that cannot be found yet is also `NotReady`.
pub struct ReadinessRefresher<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: ?Sized> ReadinessRefresher<'a, C> {
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C> Refresher for ReadinessRefresher<'_, C>
where
    C: ClusterClient + ?Sized,
{
    type Resource = Option<Cluster>;
    type Error = RefreshError;

    async fn refresh(&self, id: &ResourceId) -> Result<Observation<Option<Cluster>>, RefreshError> {
        let cluster = self.client.get_cluster(id.as_str()).await?;
        let label = match &cluster {
            Some(cluster) if cluster.status.is_some() => READY,
            _ => NOT_READY,
        };
        debug!(cluster = %id, state = label, "cluster readiness");
        Ok(Observation::observed(label, cluster))
    }
}

/// Raw `status.state` of the cluster. A missing cluster reads as `Deleted`;
/// one that exists without a state yet reads as `Unknown`.
pub struct LifecycleRefresher<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: ?Sized> LifecycleRefresher<'a, C> {
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C> Refresher for LifecycleRefresher<'_, C>
where
    C: ClusterClient + ?Sized,
{
    type Resource = Cluster;
    type Error = RefreshError;

    async fn refresh(&self, id: &ResourceId) -> Result<Observation<Cluster>, RefreshError> {
        let Some(cluster) = self.client.get_cluster(id.as_str()).await? else {
            return Ok(Observation::NotFound);
        };

        let state = cluster.state().unwrap_or(UNKNOWN).to_owned();
        debug!(cluster = %id, state = %state, "cluster state");
        Ok(Observation::observed(state, cluster))
    }

    fn absence_label(&self) -> Option<StatusLabel> {
        Some(StatusLabel::from(DELETED))
    }
}

/// Pause/resume status of a virtual cluster. A missing cluster reads as
/// `Deleted`, which no pause or resume wait targets.
pub struct VirtualLifecycleRefresher<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: ?Sized> VirtualLifecycleRefresher<'a, C> {
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C> Refresher for VirtualLifecycleRefresher<'_, C>
where
    C: ClusterClient + ?Sized,
{
    type Resource = Cluster;
    type Error = RefreshError;

    async fn refresh(&self, id: &ResourceId) -> Result<Observation<Cluster>, RefreshError> {
        let Some(cluster) = self.client.get_cluster(id.as_str()).await? else {
            return Ok(Observation::NotFound);
        };

        let state = cluster
            .virtual_lifecycle()
            .ok_or_else(|| missing(id, "status.virtual.lifecycleStatus.status"))?
            .to_owned();
        debug!(cluster = %id, state = %state, "virtual cluster lifecycle");
        Ok(Observation::observed(state, cluster))
    }

    fn absence_label(&self) -> Option<StatusLabel> {
        Some(StatusLabel::from(DELETED))
    }
}

fn missing(id: &ResourceId, field: &'static str) -> RefreshError {
    RefreshError::MissingField {
        uid: id.to_string(),
        field,
    }
}
