//! Structural damage model: material properties, health and damage.
//!
//! Pure lookup data. The live simulation decides when collisions happen;
//! these functions only decide how much they hurt.

use crate::constants::{OBSTACLE_HP_FACTOR, OBSTACLE_POINTS_PER_STRENGTH, TARGET_HP_FACTOR};
use crate::constants::{TARGET_POINTS_LARGE, TARGET_POINTS_MEDIUM, TARGET_POINTS_SMALL};
use crate::constants::{TARGET_HP_LARGE_BASE, TARGET_HP_MEDIUM_BASE, TARGET_HP_SMALL_BASE};
use crate::constants::{TARGET_RADIUS_LARGE, TARGET_RADIUS_MEDIUM, TARGET_RADIUS_SMALL};
use crate::enums::{MaterialKind, TargetSize};

/// Physical properties of an obstacle material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    pub density: f64,
    pub friction: f64,
    pub restitution: f64,
    /// Break threshold; also drives max health.
    pub strength: f64,
    /// Divides projectile impact damage (higher = harder).
    pub hardness: f64,
}

/// Look up the properties of a material.
pub fn material(kind: MaterialKind) -> MaterialProperties {
    match kind {
        MaterialKind::Glass => MaterialProperties {
            density: 0.5,
            friction: 0.2,
            restitution: 0.4,
            strength: 120.0,
            hardness: 1.0,
        },
        MaterialKind::Wood => MaterialProperties {
            density: 0.8,
            friction: 0.5,
            restitution: 0.2,
            strength: 240.0,
            hardness: 2.0,
        },
        MaterialKind::Woodboard => MaterialProperties {
            density: 1.0,
            friction: 0.5,
            restitution: 0.25,
            strength: 320.0,
            hardness: 2.5,
        },
        MaterialKind::Stoneslab => MaterialProperties {
            density: 1.8,
            friction: 0.6,
            restitution: 0.1,
            strength: 560.0,
            hardness: 3.5,
        },
        MaterialKind::Stone => MaterialProperties {
            density: 2.5,
            friction: 0.7,
            restitution: 0.05,
            strength: 800.0,
            hardness: 4.0,
        },
    }
}

/// Maximum health of an obstacle made of `kind`.
pub fn obstacle_max_health(kind: MaterialKind) -> u32 {
    (material(kind).strength * OBSTACLE_HP_FACTOR) as u32
}

/// Maximum health of a target of the given size class.
pub fn target_max_health(size: TargetSize) -> u32 {
    let base = match size {
        TargetSize::Small => TARGET_HP_SMALL_BASE,
        TargetSize::Medium => TARGET_HP_MEDIUM_BASE,
        TargetSize::Large => TARGET_HP_LARGE_BASE,
    };
    (base as f64 * TARGET_HP_FACTOR) as u32
}

/// Collision radius of a target of the given size class (px).
pub fn target_radius(size: TargetSize) -> f64 {
    match size {
        TargetSize::Small => TARGET_RADIUS_SMALL,
        TargetSize::Medium => TARGET_RADIUS_MEDIUM,
        TargetSize::Large => TARGET_RADIUS_LARGE,
    }
}

// --- Impact damage ---

/// Damage a projectile deals to whatever it strikes at `impact_speed` (px/s).
pub fn projectile_impact_damage(impact_speed: f64) -> f64 {
    (impact_speed - 6.0).max(0.0) * 4.0
}

/// Blast damage at `distance` px from an area-effect detonation. Zero outside the radius.
pub fn blast_damage(distance: f64, radius: f64) -> f64 {
    if distance >= radius {
        return 0.0;
    }
    let d = distance.max(4.0);
    2_000_000.0 / d
}

// --- Points ---

/// Score for destroying an obstacle of the given material.
pub fn obstacle_points(kind: MaterialKind) -> u64 {
    (material(kind).strength * OBSTACLE_POINTS_PER_STRENGTH) as u64
}

/// Score for destroying a target of the given size class.
pub fn target_points(size: TargetSize) -> u64 {
    match size {
        TargetSize::Small => TARGET_POINTS_SMALL,
        TargetSize::Medium => TARGET_POINTS_MEDIUM,
        TargetSize::Large => TARGET_POINTS_LARGE,
    }
}
