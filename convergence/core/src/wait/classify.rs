use super::{
    refresher::Observation,
    spec::{StatusLabel, WaitSpec},
};

/// Decision taken for one observation.
#[derive(Debug, PartialEq, Eq)]
pub enum Step<T> {
    /// Keep polling.
    Continue,
    /// Converged. `None` when the wait ended on the resource's absence.
    Reached(Option<T>),
    /// The label is neither pending nor a target.
    Unexpected(StatusLabel),
    /// The resource vanished while the wait expected it to exist.
    Disappeared,
}

/// Classify one observation against `spec`.
///
/// Targets win first. A wait with no targets keeps polling as long as the
/// resource exists. Anything outside both sets fails on the same tick.
pub fn classify<T>(
    spec: &WaitSpec,
    absence_label: Option<&StatusLabel>,
    observation: Observation<T>,
) -> Step<T> {
    match observation {
        Observation::Observed { label, resource } => {
            if spec.is_target(label.as_str()) {
                Step::Reached(Some(resource))
            } else if spec.waits_for_absence() || spec.is_pending(label.as_str()) {
                Step::Continue
            } else {
                Step::Unexpected(label)
            }
        }
        Observation::NotFound => {
            let absence_is_target =
                absence_label.is_some_and(|label| spec.is_target(label.as_str()));
            if spec.waits_for_absence() || absence_is_target {
                Step::Reached(None)
            } else {
                Step::Disappeared
            }
        }
    }
}
