use serde::{Deserialize, Serialize};

/// Cluster document as returned by the control plane.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub metadata: ClusterMetadata,
    #[serde(default)]
    pub status: Option<ClusterStatus>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetadata {
    pub uid: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, rename = "virtual")]
    pub virtual_status: Option<VirtualClusterStatus>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualClusterStatus {
    #[serde(default)]
    pub lifecycle_status: Option<LifecycleStatus>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleStatus {
    pub status: String,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Cluster {
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.metadata.uid
    }

    /// Raw lifecycle state, e.g. `Provisioning` or `Running`.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.status.as_ref()?.state.as_deref()
    }

    /// Pause/resume status of a virtual cluster.
    #[must_use]
    pub fn virtual_lifecycle(&self) -> Option<&str> {
        self.status
            .as_ref()?
            .virtual_status
            .as_ref()?
            .lifecycle_status
            .as_ref()
            .map(|lifecycle| lifecycle.status.as_str())
    }
}

/// Requested change to a virtual cluster's lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleAction {
    Pause,
    Resume,
}

impl LifecycleAction {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
        }
    }
}
