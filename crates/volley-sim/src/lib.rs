//! Headless sandbox for VOLLEY.
//!
//! Owns a hecs world of obstacles, targets and projectiles, flies projectiles
//! with the same stepper the aiming system inverts, and drives the autonomous
//! aim sequencer end to end.

pub mod engine;
pub mod error;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use error::ScenarioError;
pub use volley_core as core;
pub use world_setup::Scenario;

#[cfg(test)]
mod tests;
