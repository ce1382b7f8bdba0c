//! Enumeration types used throughout the game.

use serde::{Deserialize, Serialize};

/// Projectile archetype. Fixed per launch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Plain ballistic shot, tight speed cap.
    #[default]
    Direct,
    /// Doubles its speed once mid-flight when the skill fires.
    Accelerating,
    /// Detonates on contact, damaging everything inside the blast radius.
    AreaEffect,
}

impl ProjectileKind {
    pub const ALL: [ProjectileKind; 3] = [
        ProjectileKind::Direct,
        ProjectileKind::Accelerating,
        ProjectileKind::AreaEffect,
    ];
}

/// Size class of a protected target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetSize {
    #[default]
    Small,
    Medium,
    Large,
}

/// Obstacle material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Glass,
    #[default]
    Wood,
    Woodboard,
    Stoneslab,
    Stone,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 5] = [
        MaterialKind::Glass,
        MaterialKind::Wood,
        MaterialKind::Woodboard,
        MaterialKind::Stoneslab,
        MaterialKind::Stone,
    ];
}

/// Aim sequencer state, as exposed to the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AimPhase {
    /// No projectile ready, previous one still in play, or settle delay running.
    #[default]
    WaitingForProjectile,
    /// Selecting a target and solving the trajectory.
    Analyzing,
    /// Holding a solved aim while the trajectory is shown.
    Previewing,
}

/// Trajectory search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverAlgorithm {
    /// Angle x power grid with local refinement around the best cell.
    GridRefine,
    /// Bisection over angle at fixed power, stepping power down in tiers.
    AngleBisection,
}

/// Reason an emitted launch was abandoned before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// The aimed-at target left play between selection and launch.
    StaleTarget,
    /// The projectile that was aimed for is no longer waiting on the slingshot.
    ProjectileGone,
    /// Autonomous mode was switched off.
    Disabled,
}

/// Progress of a sandbox level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    #[default]
    InProgress,
    /// Every target was destroyed.
    Cleared,
    /// Projectiles ran out with targets still standing.
    OutOfProjectiles,
}
