//! Projectile flight: launch, skill activation and per-tick integration.

use glam::DVec2;
use hecs::World;

use volley_autoaim::ballistics::step_with;
use volley_core::components::{Position, Projectile, ProjectileStage, Velocity};
use volley_core::enums::ProjectileKind;
use volley_core::events::SandboxEvent;
use volley_core::profiles::{projectile_profile, PhysicsProfile, SkillEffect};
use volley_core::types::EntityId;

use super::contact;

/// Integrate every projectile in flight by one step.
pub fn run(world: &mut World, physics: &PhysicsProfile) {
    for (_entity, (pos, vel, projectile)) in world.query_mut::<(&mut Position, &mut Velocity, &Projectile)>() {
        if projectile.stage != ProjectileStage::InFlight {
            continue;
        }
        let max_speed = projectile_profile(projectile.kind).max_speed;
        let (p, v) = step_with(physics, pos.0, vel.0, max_speed);
        pos.0 = p;
        vel.0 = v;
    }
}

/// The next queued projectile: lowest id still waiting.
pub fn next_queued(world: &World) -> Option<(hecs::Entity, EntityId, ProjectileKind)> {
    world
        .query::<&Projectile>()
        .iter()
        .filter(|(_, p)| p.stage == ProjectileStage::Queued)
        .map(|(entity, p)| (entity, p.id, p.kind))
        .min_by_key(|&(_, id, _)| id)
}

/// Whether any projectile is currently flying.
pub fn any_in_flight(world: &World) -> bool {
    world
        .query::<&Projectile>()
        .iter()
        .any(|(_, p)| p.stage == ProjectileStage::InFlight)
}

/// Release the next queued projectile from `launch_point`. The velocity is
/// capped at the kind's launch speed.
pub fn launch(
    world: &mut World,
    launch_point: DVec2,
    velocity: DVec2,
    events: &mut Vec<SandboxEvent>,
) -> Option<EntityId> {
    let (entity, id, kind) = next_queued(world)?;
    let velocity = velocity.clamp_length_max(projectile_profile(kind).initial_max_speed);
    let (pos, vel, projectile) = world
        .query_one_mut::<(&mut Position, &mut Velocity, &mut Projectile)>(entity)
        .ok()?;
    pos.0 = launch_point;
    vel.0 = velocity;
    projectile.stage = ProjectileStage::InFlight;
    events.push(SandboxEvent::ProjectileLaunched { id, kind });
    Some(id)
}

/// Fire the skill of the projectile in flight, if it has not been used yet.
pub fn activate_skill(world: &mut World, events: &mut Vec<SandboxEvent>) -> bool {
    let mut detonation = None;
    let mut fired = false;
    for (_entity, (pos, vel, projectile)) in world.query_mut::<(&Position, &mut Velocity, &mut Projectile)>() {
        if projectile.stage != ProjectileStage::InFlight || projectile.skill_used {
            continue;
        }
        projectile.skill_used = true;
        fired = true;
        events.push(SandboxEvent::SkillActivated { id: projectile.id });
        let profile = projectile_profile(projectile.kind);
        match profile.skill {
            SkillEffect::SpeedBoost { .. } => vel.0 = profile.apply_skill(vel.0),
            SkillEffect::Detonate { radius } => {
                projectile.stage = ProjectileStage::Settled;
                detonation = Some((pos.0, radius));
            }
            SkillEffect::None => {}
        }
        break;
    }
    if let Some((center, radius)) = detonation {
        contact::detonate(world, center, radius, events);
    }
    fired
}
