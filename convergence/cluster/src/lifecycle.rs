use std::time::Duration;

use convergence_core::{Refresher, ResourceId, WaitSpec, WaitSpecError, wait};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    client::ClusterClient,
    error::ClusterLifecycleError,
    model::{Cluster, LifecycleAction},
    policy::LifecyclePolicy,
    refresh::{LifecycleRefresher, ReadinessRefresher, VirtualLifecycleRefresher},
    states::{
        CREATE_PENDING, CREATE_TARGET, DELETE_PENDING, PAUSE_PENDING, PAUSE_TARGET,
        READY_PENDING, READY_TARGET, RESUME_PENDING, RESUME_TARGET,
    },
};

/// Tag (or tag key) that opts a new cluster out of waiting for completion.
pub const SKIP_COMPLETION: &str = "skip_completion";

/// How a create wait should behave.
#[derive(Clone, Debug, Default)]
pub struct CreateOptions {
    /// First creation of the cluster, as opposed to re-attaching profiles.
    pub initial: bool,
    pub skip_completion: bool,
    /// Tags in `key` or `key:value` form.
    pub tags: Vec<String>,
}

impl CreateOptions {
    #[must_use]
    pub fn initial() -> Self {
        Self {
            initial: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_skip_completion(mut self, skip: bool) -> Self {
        self.skip_completion = skip;
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Skipping only applies to the initial creation.
    #[must_use]
    pub fn skips_completion(&self) -> bool {
        self.initial && (self.skip_completion || self.has_tag(SKIP_COMPLETION))
    }

    fn has_tag(&self, key: &str) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.split_once(':').map_or(tag.as_str(), |(k, _)| k).trim() == key)
    }
}

#[derive(Debug)]
pub enum CreationOutcome {
    /// Completion was opted out of; nothing was polled.
    Skipped,
    /// The cluster reached `Running`.
    Running(Option<Cluster>),
}

/// Create/pause/resume/delete orchestration for one control plane.
pub struct ClusterLifecycle<C> {
    client: C,
    policy: LifecyclePolicy,
}

impl<C> ClusterLifecycle<C>
where
    C: ClusterClient,
{
    pub const fn new(client: C, policy: LifecyclePolicy) -> Self {
        Self { client, policy }
    }

    pub const fn client(&self) -> &C {
        &self.client
    }

    pub const fn policy(&self) -> &LifecyclePolicy {
        &self.policy
    }

    /// Wait until the cluster publishes a status.
    pub async fn wait_for_cluster_ready(
        &self,
        uid: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Cluster>, ClusterLifecycleError> {
        let spec = self.spec(READY_PENDING, READY_TARGET, self.policy.convergence_timeout())?;
        let cluster = self
            .converge(uid, &spec, &ReadinessRefresher::new(&self.client), cancel)
            .await?;
        Ok(cluster.flatten())
    }

    /// Wait for a newly submitted cluster to become ready and then running.
    pub async fn wait_for_cluster_creation(
        &self,
        uid: &str,
        options: &CreateOptions,
        cancel: &CancellationToken,
    ) -> Result<CreationOutcome, ClusterLifecycleError> {
        if options.skips_completion() {
            info!(cluster = uid, "skip_completion set; not waiting for cluster to run");
            return Ok(CreationOutcome::Skipped);
        }

        self.wait_for_cluster_ready(uid, cancel).await?;

        let spec = self.spec(CREATE_PENDING, CREATE_TARGET, self.policy.convergence_timeout())?;
        let cluster = self
            .converge(uid, &spec, &LifecycleRefresher::new(&self.client), cancel)
            .await?;
        info!(cluster = uid, "cluster is running");
        Ok(CreationOutcome::Running(cluster))
    }

    /// Request a pause and wait for the virtual cluster to report `Paused`.
    pub async fn pause_virtual_cluster(
        &self,
        uid: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Cluster>, ClusterLifecycleError> {
        self.request_lifecycle(uid, LifecycleAction::Pause).await?;
        self.wait_for_virtual_cluster_pause(uid, cancel).await
    }

    /// Request a resume and wait for the virtual cluster to report `Running`.
    pub async fn resume_virtual_cluster(
        &self,
        uid: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Cluster>, ClusterLifecycleError> {
        self.request_lifecycle(uid, LifecycleAction::Resume).await?;
        self.wait_for_virtual_cluster_resume(uid, cancel).await
    }

    pub async fn wait_for_virtual_cluster_pause(
        &self,
        uid: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Cluster>, ClusterLifecycleError> {
        let spec = self.spec(PAUSE_PENDING, PAUSE_TARGET, self.policy.convergence_timeout())?;
        self.converge(uid, &spec, &VirtualLifecycleRefresher::new(&self.client), cancel)
            .await
    }

    pub async fn wait_for_virtual_cluster_resume(
        &self,
        uid: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Cluster>, ClusterLifecycleError> {
        let spec = self.spec(RESUME_PENDING, RESUME_TARGET, self.policy.convergence_timeout())?;
        self.converge(uid, &spec, &VirtualLifecycleRefresher::new(&self.client), cancel)
            .await
    }

    /// Wait for the cluster to disappear.
    pub async fn wait_for_cluster_deletion(
        &self,
        uid: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), ClusterLifecycleError> {
        let spec = self.spec(DELETE_PENDING, &[], timeout)?;
        self.converge(uid, &spec, &LifecycleRefresher::new(&self.client), cancel)
            .await?;
        info!(cluster = uid, "cluster deleted");
        Ok(())
    }

    /// Delete the cluster and wait for it to disappear.
    pub async fn delete_cluster(
        &self,
        uid: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ClusterLifecycleError> {
        info!(cluster = uid, "deleting cluster");
        self.client
            .delete_cluster(uid)
            .await
            .map_err(|source| ClusterLifecycleError::Client {
                action: "delete",
                uid: uid.to_owned(),
                source,
            })?;

        self.wait_for_cluster_deletion(uid, self.policy.delete_timeout, cancel)
            .await
    }

    async fn request_lifecycle(
        &self,
        uid: &str,
        action: LifecycleAction,
    ) -> Result<(), ClusterLifecycleError> {
        info!(
            cluster = uid,
            action = action.label(),
            "requesting virtual cluster lifecycle change"
        );
        self.client
            .set_virtual_lifecycle(uid, action)
            .await
            .map_err(|source| ClusterLifecycleError::Client {
                action: action.label(),
                uid: uid.to_owned(),
                source,
            })
    }

    async fn converge<R>(
        &self,
        uid: &str,
        spec: &WaitSpec,
        refresher: &R,
        cancel: &CancellationToken,
    ) -> Result<Option<R::Resource>, ClusterLifecycleError>
    where
        R: Refresher,
    {
        let outcome = wait(&ResourceId::from(uid), spec, refresher, cancel).await;
        Ok(outcome.into_result()?)
    }

    fn spec(
        &self,
        pending: &[&str],
        target: &[&str],
        timeout: Duration,
    ) -> Result<WaitSpec, WaitSpecError> {
        WaitSpec::builder(timeout)
            .pending(pending.iter().copied())
            .target(target.iter().copied())
            .poll_interval(self.policy.poll_interval)
            .delay(self.policy.initial_delay)
            .build()
    }
}
