pub mod client;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod policy;
pub mod refresh;
pub mod states;

pub use client::{ClientError, ClusterClient, HttpClusterClient};
pub use error::ClusterLifecycleError;
pub use lifecycle::{ClusterLifecycle, CreateOptions, CreationOutcome, SKIP_COMPLETION};
pub use model::{Cluster, LifecycleAction};
pub use policy::LifecyclePolicy;
pub use refresh::{LifecycleRefresher, ReadinessRefresher, RefreshError, VirtualLifecycleRefresher};
