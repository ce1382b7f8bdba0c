//! Autonomous aiming for the VOLLEY slingshot.
//!
//! Pure logic over an immutable [`FrameSnapshot`](volley_core::scene::FrameSnapshot):
//! scene analysis, target selection, trajectory search against the ballistic
//! stepper, and the launch sequencer that ties them together. No ECS or
//! rendering dependency.

pub mod analyzer;
pub mod ballistics;
pub mod error;
pub mod occlusion;
pub mod selector;
pub mod sequencer;
pub mod solver;
pub mod stats;

pub use error::{AimError, TrajectoryFault};
pub use sequencer::{AimState, AutoAim};
