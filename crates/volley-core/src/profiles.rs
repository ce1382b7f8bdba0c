//! Per-projectile physical profiles.
//!
//! Consolidates the speed caps and skill behaviour that both the live
//! simulation and the ballistic stepper read.

use crate::constants::*;
use crate::enums::ProjectileKind;

/// What the one-shot skill does to a projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillEffect {
    /// The skill has no effect on flight.
    None,
    /// Speed is multiplied by the factor, direction kept, re-clamped to the max speed.
    SpeedBoost { factor: f64 },
    /// Detonates on first contact or when triggered, damaging everything inside the radius.
    Detonate { radius: f64 },
}

/// Physical profile for a projectile kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileProfile {
    /// Launch speed cap (px/s). Power 100% maps to this speed.
    pub initial_max_speed: f64,
    /// Absolute speed cap applied every step after launch (px/s).
    pub max_speed: f64,
    /// Skill behaviour.
    pub skill: SkillEffect,
    /// Extra distance beyond the target radius that still counts as a hit (px).
    pub hit_margin: f64,
}

/// Get the physical profile for a projectile kind.
pub fn projectile_profile(kind: ProjectileKind) -> ProjectileProfile {
    match kind {
        ProjectileKind::Direct => ProjectileProfile {
            initial_max_speed: DIRECT_INITIAL_MAX_SPEED,
            max_speed: DIRECT_MAX_SPEED,
            skill: SkillEffect::None,
            hit_margin: 10.0,
        },
        ProjectileKind::Accelerating => ProjectileProfile {
            initial_max_speed: ACCELERATING_INITIAL_MAX_SPEED,
            max_speed: ACCELERATING_MAX_SPEED,
            skill: SkillEffect::SpeedBoost {
                factor: ACCELERATING_SKILL_FACTOR,
            },
            hit_margin: 10.0,
        },
        ProjectileKind::AreaEffect => ProjectileProfile {
            initial_max_speed: AREA_EFFECT_INITIAL_MAX_SPEED,
            max_speed: AREA_EFFECT_MAX_SPEED,
            skill: SkillEffect::Detonate {
                radius: BLAST_RADIUS,
            },
            hit_margin: 30.0,
        },
    }
}

impl ProjectileProfile {
    /// Apply the skill to an in-flight velocity. Only speed boosts change velocity.
    pub fn apply_skill(&self, velocity: glam::DVec2) -> glam::DVec2 {
        match self.skill {
            SkillEffect::SpeedBoost { factor } => {
                let speed = velocity.length();
                if speed < DRAG_MIN_SPEED {
                    return velocity;
                }
                let boosted = (speed * factor).min(self.max_speed);
                velocity * (boosted / speed)
            }
            SkillEffect::None | SkillEffect::Detonate { .. } => velocity,
        }
    }

    /// Whether the aiming system schedules this kind's skill on a timer after launch.
    pub fn activates_on_launch(&self) -> bool {
        matches!(self.skill, SkillEffect::SpeedBoost { .. })
    }
}

/// World physics shared by every body. The stepper and the live
/// simulation must agree on these values.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhysicsProfile {
    /// Downward acceleration (px/s²).
    pub gravity: f64,
    /// Constant-magnitude deceleration against velocity (px/s²).
    pub drag: f64,
    /// Drag is skipped below this speed (px/s).
    pub drag_min_speed: f64,
    /// Fixed integration step (s).
    pub dt: f64,
}

impl Default for PhysicsProfile {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            drag: DRAG_ACCEL,
            drag_min_speed: DRAG_MIN_SPEED,
            dt: DT,
        }
    }
}
