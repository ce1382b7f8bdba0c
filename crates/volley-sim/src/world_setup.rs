//! Scenario description and spawn factories for the sandbox world.

use std::path::Path;

use glam::DVec2;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use volley_core::components::*;
use volley_core::constants::*;
use volley_core::enums::*;
use volley_core::materials::{obstacle_max_health, target_max_health, target_radius};
use volley_core::types::EntityId;

use crate::error::ScenarioError;

/// A block in a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub position: DVec2,
    pub size: DVec2,
    #[serde(default)]
    pub material: MaterialKind,
}

/// A target in a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSpec {
    pub position: DVec2,
    #[serde(default)]
    pub size_class: TargetSize,
}

/// Static layout of a level plus its projectile queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_launch_point")]
    pub launch_point: DVec2,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
    pub targets: Vec<TargetSpec>,
    pub projectiles: Vec<ProjectileKind>,
}

fn default_launch_point() -> DVec2 {
    DVec2::new(SLINGSHOT_X, SLINGSHOT_Y)
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.targets.is_empty() {
            return Err(ScenarioError::Empty("targets"));
        }
        if self.projectiles.is_empty() {
            return Err(ScenarioError::Empty("projectiles"));
        }
        if let Some(index) = self
            .obstacles
            .iter()
            .position(|o| o.size.x <= 0.0 || o.size.y <= 0.0)
        {
            return Err(ScenarioError::InvalidObstacle { index });
        }
        Ok(())
    }
}

/// Centre y for a body of height `height` resting on the ground.
pub fn ground_y(height: f64) -> f64 {
    GROUND_TOP - height * 0.5
}

/// A small fixed level: one open target and one behind a wooden wall.
pub fn demo_scenario() -> Scenario {
    Scenario {
        launch_point: default_launch_point(),
        obstacles: vec![
            ObstacleSpec {
                position: DVec2::new(1180.0, ground_y(120.0)),
                size: DVec2::new(40.0, 120.0),
                material: MaterialKind::Wood,
            },
            ObstacleSpec {
                position: DVec2::new(1320.0, ground_y(120.0)),
                size: DVec2::new(40.0, 120.0),
                material: MaterialKind::Stone,
            },
        ],
        targets: vec![
            TargetSpec {
                position: DVec2::new(800.0, ground_y(2.0 * TARGET_RADIUS_MEDIUM)),
                size_class: TargetSize::Medium,
            },
            TargetSpec {
                position: DVec2::new(1250.0, ground_y(2.0 * TARGET_RADIUS_LARGE)),
                size_class: TargetSize::Large,
            },
        ],
        projectiles: vec![
            ProjectileKind::Direct,
            ProjectileKind::AreaEffect,
            ProjectileKind::Accelerating,
        ],
    }
}

// --- Random fortress ---

const FORTRESS_MIN_X: f64 = 900.0;
const FORTRESS_MAX_X: f64 = 1700.0;
const COLUMN_SIZE: DVec2 = DVec2::new(30.0, 90.0);
const BOARD_SIZE: DVec2 = DVec2::new(120.0, 20.0);

/// Seeded random level: 2-4 towers of columns and boards, each guarding a target.
pub fn random_fortress(rng: &mut ChaCha8Rng) -> Scenario {
    let towers = rng.gen_range(2..=4);
    let spacing = (FORTRESS_MAX_X - FORTRESS_MIN_X) / towers as f64;
    let mut obstacles = Vec::new();
    let mut targets = Vec::new();

    for i in 0..towers {
        let centre_x = FORTRESS_MIN_X + spacing * (i as f64 + 0.5) + rng.gen_range(-30.0..30.0);
        let floors = rng.gen_range(1..=3);
        let mut floor_top = GROUND_TOP;

        for _ in 0..floors {
            let material = MaterialKind::ALL[rng.gen_range(0..MaterialKind::ALL.len())];
            for side in [-1.0, 1.0] {
                obstacles.push(ObstacleSpec {
                    position: DVec2::new(centre_x + side * 45.0, floor_top - COLUMN_SIZE.y * 0.5),
                    size: COLUMN_SIZE,
                    material,
                });
            }
            floor_top -= COLUMN_SIZE.y;
            obstacles.push(ObstacleSpec {
                position: DVec2::new(centre_x, floor_top - BOARD_SIZE.y * 0.5),
                size: BOARD_SIZE,
                material,
            });
            floor_top -= BOARD_SIZE.y;
        }

        let size_class = match rng.gen_range(0..3) {
            0 => TargetSize::Small,
            1 => TargetSize::Medium,
            _ => TargetSize::Large,
        };
        // Alternate between sheltering inside the ground floor and standing on the roof.
        let y = if rng.gen_bool(0.5) {
            GROUND_TOP - target_radius(size_class)
        } else {
            floor_top - target_radius(size_class)
        };
        targets.push(TargetSpec {
            position: DVec2::new(centre_x, y),
            size_class,
        });
    }

    let shots = rng.gen_range(3..=5);
    let projectiles = (0..shots)
        .map(|_| ProjectileKind::ALL[rng.gen_range(0..ProjectileKind::ALL.len())])
        .collect();

    Scenario {
        launch_point: default_launch_point(),
        obstacles,
        targets,
        projectiles,
    }
}

// --- Spawning ---

/// Spawn every entity in `scenario`. Ids are assigned from `next_id` in file order:
/// obstacles, then targets, then the projectile queue.
pub fn spawn_scenario(world: &mut World, scenario: &Scenario, next_id: &mut u32) {
    for spec in &scenario.obstacles {
        spawn_obstacle(world, next_entity_id(next_id), spec);
    }
    for spec in &scenario.targets {
        spawn_target(world, next_entity_id(next_id), spec);
    }
    for &kind in &scenario.projectiles {
        spawn_projectile(world, next_entity_id(next_id), kind, scenario.launch_point);
    }
}

fn next_entity_id(next_id: &mut u32) -> EntityId {
    let id = EntityId(*next_id);
    *next_id += 1;
    id
}

pub fn spawn_obstacle(world: &mut World, id: EntityId, spec: &ObstacleSpec) -> hecs::Entity {
    let max_health = obstacle_max_health(spec.material) as f64;
    world.spawn((
        Position(spec.position),
        Obstacle {
            id,
            size: spec.size,
            material: spec.material,
            health: max_health,
            max_health,
        },
    ))
}

pub fn spawn_target(world: &mut World, id: EntityId, spec: &TargetSpec) -> hecs::Entity {
    let max_health = target_max_health(spec.size_class) as f64;
    world.spawn((
        Position(spec.position),
        Target {
            id,
            size_class: spec.size_class,
            health: max_health,
            max_health,
        },
    ))
}

/// Queued projectiles wait at the launch point with zero velocity.
pub fn spawn_projectile(world: &mut World, id: EntityId, kind: ProjectileKind, launch_point: DVec2) -> hecs::Entity {
    world.spawn((
        Position(launch_point),
        Velocity::default(),
        Projectile {
            id,
            kind,
            stage: ProjectileStage::Queued,
            skill_used: false,
            rest_secs: 0.0,
            touched: false,
        },
    ))
}
