//! Snapshot system: reads the ECS world into the immutable views the aiming
//! system and the UI consume.
//!
//! This system is read-only. It never modifies the world.

use glam::DVec2;
use hecs::World;

use volley_core::components::*;
use volley_core::enums::LevelOutcome;
use volley_core::events::{AimEvent, SandboxEvent};
use volley_core::scene::*;
use volley_core::state::*;
use volley_core::types::SimTime;

/// Build the frame snapshot the aiming system reads. Entities are ordered by id.
pub fn build_frame(world: &World, launch_point: DVec2) -> FrameSnapshot {
    let mut obstacles: Vec<ObstacleView> = world
        .query::<(&Position, &Obstacle)>()
        .iter()
        .map(|(_, (pos, o))| ObstacleView {
            id: o.id,
            position: pos.0,
            size: o.size,
            material: o.material,
            health: health_points(o.health),
            max_health: health_points(o.max_health),
            active: true,
            destroyed: o.health <= 0.0,
        })
        .collect();
    obstacles.sort_by_key(|o| o.id);

    let mut targets: Vec<TargetView> = world
        .query::<(&Position, &Target)>()
        .iter()
        .map(|(_, (pos, t))| TargetView {
            id: t.id,
            position: pos.0,
            size_class: t.size_class,
            health: health_points(t.health),
            max_health: health_points(t.max_health),
            active: true,
            destroyed: t.health <= 0.0,
        })
        .collect();
    targets.sort_by_key(|t| t.id);

    let mut projectiles: Vec<ProjectileView> = world
        .query::<&Projectile>()
        .iter()
        .map(|(_, p)| ProjectileView {
            id: p.id,
            kind: p.kind,
            launched: p.stage != ProjectileStage::Queued,
            in_play: p.stage != ProjectileStage::Settled,
        })
        .collect();
    projectiles.sort_by_key(|p| p.id);

    FrameSnapshot {
        launch_point,
        obstacles,
        targets,
        projectiles,
    }
}

fn health_points(health: f64) -> u32 {
    health.max(0.0).ceil() as u32
}

/// Projectiles currently in flight.
pub fn build_flights(world: &World) -> Vec<FlightView> {
    let mut flights: Vec<FlightView> = world
        .query::<(&Position, &Velocity, &Projectile)>()
        .iter()
        .filter(|(_, (_, _, p))| p.stage == ProjectileStage::InFlight)
        .map(|(_, (pos, vel, p))| FlightView {
            id: p.id,
            kind: p.kind,
            position: pos.0,
            velocity: vel.0,
            skill_used: p.skill_used,
        })
        .collect();
    flights.sort_by_key(|f| f.id);
    flights
}

/// Build the complete sandbox snapshot after a tick.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    outcome: LevelOutcome,
    launch_point: DVec2,
    auto_aim: AutoAimView,
    score: ScoreState,
    aim_events: Vec<AimEvent>,
    sandbox_events: Vec<SandboxEvent>,
) -> SandboxSnapshot {
    SandboxSnapshot {
        time: *time,
        outcome,
        scene: build_frame(world, launch_point),
        flights: build_flights(world),
        auto_aim,
        score,
        aim_events,
        sandbox_events,
    }
}
