//! Aim data model: annotated target descriptors and solved aim results.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::{MaterialKind, ProjectileKind, SolverAlgorithm, TargetSize};
use crate::types::EntityId;

/// Kind-specific payload of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DescriptorKind {
    Obstacle { material: MaterialKind, strength: f64 },
    ProtectedTarget { size_class: TargetSize },
}

/// Layered protection around a target, relative to the current launch point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protection {
    /// Distinct obstacles crossed by the straight line from the launch point.
    pub occluders: u32,
    /// Obstacles whose centre sits within the local protection radius.
    pub nearby: u32,
}

impl Protection {
    /// Combined protection depth.
    pub fn depth(&self) -> u32 {
        self.occluders + self.nearby
    }

    pub fn is_exposed(&self) -> bool {
        self.depth() == 0
    }
}

/// One live obstacle or target, annotated for ranking. Rebuilt every analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    /// Back-reference to the live entity.
    pub id: EntityId,
    pub kind: DescriptorKind,
    pub position: DVec2,
    /// Obstacles: full width/height. Targets: (radius, radius).
    pub size: DVec2,
    pub health: u32,
    pub max_health: u32,
    pub protection: Protection,
    /// Baseline importance from health and size class.
    pub threat_value: f64,
    /// Health discounted by distance from the launch point.
    pub attack_value: f64,
}

impl TargetDescriptor {
    pub fn is_target(&self) -> bool {
        matches!(self.kind, DescriptorKind::ProtectedTarget { .. })
    }

    /// Characteristic size (px) used to express aim error as a percentage.
    pub fn extent(&self) -> f64 {
        self.size.x.max(self.size.y).max(1.0)
    }

    /// Radius used for hit detection (px).
    pub fn hit_radius(&self) -> f64 {
        match self.kind {
            DescriptorKind::ProtectedTarget { .. } => self.size.x,
            DescriptorKind::Obstacle { .. } => self.size.x.max(self.size.y) * 0.5,
        }
    }
}

/// A solved (or failed) aim. Only act on it when `valid` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AimResult {
    pub valid: bool,
    pub kind: ProjectileKind,
    pub launch_point: DVec2,
    pub target_point: DVec2,
    pub target_id: Option<EntityId>,
    /// Elevation angle in degrees toward the facing side.
    pub angle_deg: f64,
    /// Launch power, percent of the kind's initial max speed.
    pub power_pct: f64,
    /// Velocity the projectile leaves the slingshot with (px/s).
    pub launch_velocity: DVec2,
    /// Slingshot pull vector that produces `launch_velocity`.
    pub pull: DVec2,
    /// Closest approach as a percentage of the target size.
    pub error_pct: f64,
    /// Closest approach distance (px).
    pub closest_distance: f64,
    /// Seconds after launch the skill should fire, if at all.
    pub skill_activation_secs: Option<f64>,
    /// Simulated flight up to the closest approach.
    pub trajectory: Vec<DVec2>,
    pub algorithm: Option<SolverAlgorithm>,
}

impl AimResult {
    /// A result that must not be launched.
    pub fn invalid(kind: ProjectileKind, launch_point: DVec2, target_point: DVec2) -> Self {
        Self {
            valid: false,
            kind,
            launch_point,
            target_point,
            error_pct: f64::INFINITY,
            closest_distance: f64::INFINITY,
            ..Default::default()
        }
    }

    /// Where the slingshot must be dragged to (launch point + pull).
    pub fn drag_end(&self) -> DVec2 {
        self.launch_point + self.pull
    }
}

/// Launch instruction handed to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchCommand {
    pub kind: ProjectileKind,
    pub target_id: EntityId,
    pub velocity: DVec2,
    pub pull: DVec2,
    pub skill_activation_secs: Option<f64>,
}
