mod http;

use std::sync::Arc;

use async_trait::async_trait;
pub use http::HttpClusterClient;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::model::{Cluster, LifecycleAction};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
    #[error("failed to join url {base} with path {path}: {message}")]
    JoinUrl {
        base: Url,
        path: String,
        message: String,
    },
    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: Url,
        status: StatusCode,
    },
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Control-plane operations the lifecycle waits need.
///
/// Implementations are shared by concurrently running waits.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Fetch a cluster; `None` when it does not exist.
    async fn get_cluster(&self, uid: &str) -> Result<Option<Cluster>, ClientError>;

    async fn delete_cluster(&self, uid: &str) -> Result<(), ClientError>;

    async fn set_virtual_lifecycle(
        &self,
        uid: &str,
        action: LifecycleAction,
    ) -> Result<(), ClientError>;
}

#[async_trait]
impl<C> ClusterClient for Arc<C>
where
    C: ClusterClient + ?Sized,
{
    async fn get_cluster(&self, uid: &str) -> Result<Option<Cluster>, ClientError> {
        (**self).get_cluster(uid).await
    }

    async fn delete_cluster(&self, uid: &str) -> Result<(), ClientError> {
        (**self).delete_cluster(uid).await
    }

    async fn set_virtual_lifecycle(
        &self,
        uid: &str,
        action: LifecycleAction,
    ) -> Result<(), ClientError> {
        (**self).set_virtual_lifecycle(uid, action).await
    }
}
