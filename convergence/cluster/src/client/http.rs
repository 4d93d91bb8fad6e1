use async_trait::async_trait;
use convergence_config::constants::DEFAULT_API_ENDPOINT;
use convergence_env as cv_env;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::json;
use tracing::debug;
use url::Url;

use super::{ClientError, ClusterClient};
use crate::model::{Cluster, LifecycleAction};

const API_KEY_HEADER: &str = "ApiKey";
const PROJECT_UID_HEADER: &str = "ProjectUid";
const CLUSTERS_PATH: &str = "v1/spectroclusters";

/// Thin async client for the cluster endpoints of the control plane.
#[derive(Clone)]
pub struct HttpClusterClient {
    base_url: Url,
    api_key: Option<String>,
    project_uid: Option<String>,
    client: Client,
}

impl HttpClusterClient {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Reuse an existing `reqwest` client (and its connection pool).
    #[must_use]
    pub fn with_client(mut base_url: Url, client: Client) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            api_key: None,
            project_uid: None,
            client,
        }
    }

    /// Build from `CONVERGENCE_API_ENDPOINT`, `CONVERGENCE_API_KEY` and
    /// `CONVERGENCE_PROJECT_UID`.
    pub fn from_env() -> Result<Self, ClientError> {
        let endpoint =
            cv_env::convergence_api_endpoint().unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_owned());
        let base_url = Url::parse(&endpoint).map_err(|source| ClientError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            message: source.to_string(),
        })?;

        let mut client = Self::new(base_url);
        client.api_key = cv_env::convergence_api_key();
        client.project_uid = cv_env::convergence_project_uid();
        Ok(client)
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_project(mut self, project_uid: impl Into<String>) -> Self {
        self.project_uid = Some(project_uid.into());
        self
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn join(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::JoinUrl {
                base: self.base_url.clone(),
                path: path.to_owned(),
                message: source.to_string(),
            })
    }

    fn cluster_url(&self, uid: &str) -> Result<Url, ClientError> {
        self.join(&format!("{CLUSTERS_PATH}/{uid}"))
    }

    fn lifecycle_url(&self, uid: &str) -> Result<Url, ClientError> {
        self.join(&format!("{CLUSTERS_PATH}/{uid}/clusterConfig/lifecycleConfig"))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(api_key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, api_key);
        }
        if let Some(project_uid) = &self.project_uid {
            builder = builder.header(PROJECT_UID_HEADER, project_uid);
        }
        builder
    }
}

fn ensure_success(method: &'static str, response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(ClientError::Status {
        method,
        url: response.url().clone(),
        status,
    })
}

#[async_trait]
impl ClusterClient for HttpClusterClient {
    async fn get_cluster(&self, uid: &str) -> Result<Option<Cluster>, ClientError> {
        let url = self.cluster_url(uid)?;
        debug!(%url, "fetching cluster");

        let response = self.request(Method::GET, url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let cluster = ensure_success("GET", response)?.json::<Cluster>().await?;
        Ok(Some(cluster))
    }

    async fn delete_cluster(&self, uid: &str) -> Result<(), ClientError> {
        let url = self.cluster_url(uid)?;
        debug!(%url, "deleting cluster");

        let response = self.request(Method::DELETE, url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        ensure_success("DELETE", response).map(|_| ())
    }

    async fn set_virtual_lifecycle(
        &self,
        uid: &str,
        action: LifecycleAction,
    ) -> Result<(), ClientError> {
        let url = self.lifecycle_url(uid)?;
        debug!(%url, action = action.label(), "updating virtual cluster lifecycle");

        let body = json!({
            "lifecycleConfig": { "pause": matches!(action, LifecycleAction::Pause) }
        });
        let response = self.request(Method::PUT, url).json(&body).send().await?;

        ensure_success("PUT", response).map(|_| ())
    }
}
