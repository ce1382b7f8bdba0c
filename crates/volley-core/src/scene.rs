//! Immutable scene snapshot consumed by the aiming system each update.
//!
//! The live game builds one `FrameSnapshot` per frame. Analyzer, selector and
//! solver only ever read this copy, never the mutating world.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::{MaterialKind, ProjectileKind, TargetSize};
use crate::materials::target_radius;
use crate::types::EntityId;

/// A structural obstacle (block) as seen by the aiming system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: EntityId,
    /// Centre position (px).
    pub position: DVec2,
    /// Full width and height (px).
    pub size: DVec2,
    pub material: MaterialKind,
    pub health: u32,
    pub max_health: u32,
    /// Body is enabled in the physics world.
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub destroyed: bool,
}

/// A protected target as seen by the aiming system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub id: EntityId,
    /// Centre position (px).
    pub position: DVec2,
    pub size_class: TargetSize,
    pub health: u32,
    pub max_health: u32,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub destroyed: bool,
}

/// A projectile in the launch queue or in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub kind: ProjectileKind,
    /// Has left the slingshot.
    pub launched: bool,
    /// Still taking part in the simulation (not yet settled and removed).
    pub in_play: bool,
}

/// Everything the aiming system may look at during one update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Slingshot anchor the projectile leaves from (px).
    pub launch_point: DVec2,
    #[serde(default)]
    pub obstacles: Vec<ObstacleView>,
    #[serde(default)]
    pub targets: Vec<TargetView>,
    /// Projectiles in queue order; the first unlaunched one is loaded next.
    #[serde(default)]
    pub projectiles: Vec<ProjectileView>,
}

fn default_true() -> bool {
    true
}

impl ObstacleView {
    /// Whether this obstacle still takes part in the scene.
    pub fn is_live(&self) -> bool {
        self.active && !self.destroyed
    }

    /// Whether `point` lies inside this obstacle's axis-aligned footprint.
    pub fn contains(&self, point: DVec2) -> bool {
        let half = self.size * 0.5;
        let d = (point - self.position).abs();
        d.x <= half.x && d.y <= half.y
    }
}

impl TargetView {
    /// Whether this target still takes part in the scene.
    pub fn is_live(&self) -> bool {
        self.active && !self.destroyed && self.health > 0
    }

    /// Collision radius (px).
    pub fn radius(&self) -> f64 {
        target_radius(self.size_class)
    }
}

impl FrameSnapshot {
    /// An empty scene anchored at `launch_point`.
    pub fn new(launch_point: DVec2) -> Self {
        Self {
            launch_point,
            obstacles: Vec::new(),
            targets: Vec::new(),
            projectiles: Vec::new(),
        }
    }

    /// The projectile that will be launched next, if any.
    pub fn next_unlaunched(&self) -> Option<&ProjectileView> {
        self.projectiles.iter().find(|p| !p.launched)
    }

    /// Whether a launched projectile is still taking part in the simulation.
    pub fn has_projectile_in_play(&self) -> bool {
        self.projectiles.iter().any(|p| p.launched && p.in_play)
    }

    /// Whether the target with `id` is still present and alive.
    pub fn target_alive(&self, id: EntityId) -> bool {
        self.targets.iter().any(|t| t.id == id && t.is_live())
    }

    /// Number of live targets.
    pub fn live_target_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_live()).count()
    }
}
