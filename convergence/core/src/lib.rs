pub mod wait;

pub use tokio_util::sync::CancellationToken;
pub use wait::{
    Observation, Refresher, ResourceId, StatusLabel, WaitError, WaitFailure, WaitOutcome,
    WaitSpec, WaitSpecBuilder, WaitSpecError, from_fn, wait,
};
