//! Events emitted by the aiming system for UI feedback and logging.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// Notable transitions of the autonomous aiming cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AimEvent {
    /// A target was chosen for the loaded projectile.
    TargetSelected {
        target_id: EntityId,
        kind: ProjectileKind,
        depth: u32,
    },
    /// The solver found an acceptable trajectory.
    AimSolved {
        target_id: EntityId,
        angle_deg: f64,
        power_pct: f64,
        error_pct: f64,
    },
    /// The solver could not reach the target.
    SolveFailed { target_id: EntityId, retries: u32 },
    /// Every retry failed; the cycle was abandoned.
    CycleAbandoned,
    /// The preview timer started.
    PreviewStarted { target_id: EntityId },
    /// Launch handed to the game loop.
    LaunchIssued {
        target_id: EntityId,
        velocity: DVec2,
    },
    /// The skill should fire now.
    SkillIssued,
    /// A pending launch was dropped before execution.
    LaunchAborted { reason: AbortReason },
    /// Autonomous mode switched on or off.
    Toggled { enabled: bool },
}

/// Events from the sandbox physics for logging and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SandboxEvent {
    ProjectileLaunched { id: EntityId, kind: ProjectileKind },
    SkillActivated { id: EntityId },
    TargetHit { id: EntityId, damage: f64 },
    TargetDestroyed { id: EntityId },
    ObstacleDestroyed { id: EntityId },
    Detonation { position: DVec2 },
    ProjectileSettled { id: EntityId },
}
