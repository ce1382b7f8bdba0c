//! ECS components for hecs entities in the sandbox.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// World position (px), centre of the body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec2);

/// Velocity (px/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub DVec2);

/// Static structural block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    /// Full width and height (px).
    pub size: DVec2,
    pub material: MaterialKind,
    pub health: f64,
    pub max_health: f64,
}

/// Protected target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: EntityId,
    pub size_class: TargetSize,
    pub health: f64,
    pub max_health: f64,
}

/// Where a projectile is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileStage {
    /// Waiting in the launch queue.
    #[default]
    Queued,
    InFlight,
    /// Out of play, awaiting despawn.
    Settled,
}

/// A projectile, queued or launched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub stage: ProjectileStage,
    pub skill_used: bool,
    /// Time spent below the rest speed (s).
    pub rest_secs: f64,
    /// Set once the projectile has touched anything.
    pub touched: bool,
}

