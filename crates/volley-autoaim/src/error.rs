//! Aiming failures. None of them is fatal: the sequencer idles and retries.

use thiserror::Error;
use volley_core::types::EntityId;

/// Why an otherwise accurate trajectory was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TrajectoryFault {
    #[error("trajectory folds by {angle_deg:.1} degrees at sample {index}")]
    Fold { index: usize, angle_deg: f64 },
    #[error("trajectory leaves the launch/target span at sample {index} (x = {x:.1})")]
    SpanExcursion { index: usize, x: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AimError {
    #[error("no live target to aim at")]
    NoTarget,
    #[error("no trajectory reaches target {target:?} (best error {best_error_pct:.1}%)")]
    SolveFailed { target: EntityId, best_error_pct: f64 },
    #[error("rejected trajectory: {0}")]
    InvalidTrajectory(#[from] TrajectoryFault),
    #[error("target {0:?} left play before launch")]
    StaleTarget(EntityId),
}
