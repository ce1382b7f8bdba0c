//! Simple contact resolution between projectiles and the static scene.
//!
//! Projectiles are circles; obstacles are axis-aligned boxes and targets are
//! circles. Nothing but projectiles moves.

use glam::DVec2;
use hecs::{Entity, World};

use volley_core::components::{Obstacle, Position, Projectile, ProjectileStage, Target, Velocity};
use volley_core::constants::{GROUND_TOP, PROJECTILE_RADIUS};
use volley_core::enums::ProjectileKind;
use volley_core::events::SandboxEvent;
use volley_core::materials::{blast_damage, material, projectile_impact_damage, target_radius};
use volley_core::profiles::{projectile_profile, SkillEffect};

/// Bounce factor against targets and the ground.
const SOFT_RESTITUTION: f64 = 0.3;

/// Horizontal speed kept per ground contact.
const GROUND_FRICTION: f64 = 0.9;

/// Speed kept after smashing through something.
const BREAKTHROUGH_FACTOR: f64 = 0.6;

struct Flying {
    entity: Entity,
    kind: ProjectileKind,
    position: DVec2,
    velocity: DVec2,
}

/// Resolve contacts for every projectile in flight.
pub fn run(world: &mut World, events: &mut Vec<SandboxEvent>) {
    let flying: Vec<Flying> = world
        .query::<(&Position, &Velocity, &Projectile)>()
        .iter()
        .filter(|(_, (_, _, p))| p.stage == ProjectileStage::InFlight)
        .map(|(entity, (pos, vel, p))| Flying {
            entity,
            kind: p.kind,
            position: pos.0,
            velocity: vel.0,
        })
        .collect();

    for mut body in flying {
        let mut touched = hit_targets(world, &mut body, events);
        touched |= hit_obstacles(world, &mut body, events);
        touched |= hit_ground(&mut body);

        let mut detonation = None;
        if let Ok((pos, vel, projectile)) =
            world.query_one_mut::<(&mut Position, &mut Velocity, &mut Projectile)>(body.entity)
        {
            pos.0 = body.position;
            vel.0 = body.velocity;
            projectile.touched |= touched;
            if touched {
                if let SkillEffect::Detonate { radius } = projectile_profile(body.kind).skill {
                    projectile.skill_used = true;
                    projectile.stage = ProjectileStage::Settled;
                    detonation = Some(radius);
                }
            }
        }
        if let Some(radius) = detonation {
            detonate(world, body.position, radius, events);
        }
    }
}

fn hit_targets(world: &mut World, body: &mut Flying, events: &mut Vec<SandboxEvent>) -> bool {
    let mut touched = false;
    for (_entity, (pos, target)) in world.query_mut::<(&Position, &mut Target)>() {
        if target.health <= 0.0 {
            continue;
        }
        let reach = target_radius(target.size_class) + PROJECTILE_RADIUS;
        let offset = body.position - pos.0;
        if offset.length() >= reach {
            continue;
        }
        touched = true;
        let damage = projectile_impact_damage(body.velocity.length());
        if damage > 0.0 {
            target.health -= damage;
            events.push(SandboxEvent::TargetHit { id: target.id, damage });
        }
        if target.health <= 0.0 {
            events.push(SandboxEvent::TargetDestroyed { id: target.id });
            body.velocity *= BREAKTHROUGH_FACTOR;
            continue;
        }
        let normal = offset.try_normalize().unwrap_or(DVec2::NEG_Y);
        body.position = pos.0 + normal * reach;
        let approach = body.velocity.dot(normal);
        if approach < 0.0 {
            body.velocity -= (1.0 + SOFT_RESTITUTION) * approach * normal;
        }
    }
    touched
}

fn hit_obstacles(world: &mut World, body: &mut Flying, events: &mut Vec<SandboxEvent>) -> bool {
    let mut touched = false;
    for (_entity, (pos, obstacle)) in world.query_mut::<(&Position, &mut Obstacle)>() {
        if obstacle.health <= 0.0 {
            continue;
        }
        let half = obstacle.size * 0.5 + DVec2::splat(PROJECTILE_RADIUS);
        let offset = body.position - pos.0;
        let depth = half - offset.abs();
        if depth.x <= 0.0 || depth.y <= 0.0 {
            continue;
        }
        touched = true;
        let props = material(obstacle.material);
        let damage = projectile_impact_damage(body.velocity.length()) / props.hardness;
        obstacle.health -= damage;
        if obstacle.health <= 0.0 {
            events.push(SandboxEvent::ObstacleDestroyed { id: obstacle.id });
            body.velocity *= BREAKTHROUGH_FACTOR;
            continue;
        }
        // Push out along the shallower axis and bounce off that face.
        let keep = 1.0 - props.friction * 0.2;
        if depth.x < depth.y {
            let side = offset.x.signum();
            body.position.x = pos.0.x + side * half.x;
            if body.velocity.x * side < 0.0 {
                body.velocity.x = -body.velocity.x * props.restitution;
            }
            body.velocity.y *= keep;
        } else {
            let side = offset.y.signum();
            body.position.y = pos.0.y + side * half.y;
            if body.velocity.y * side < 0.0 {
                body.velocity.y = -body.velocity.y * props.restitution;
            }
            body.velocity.x *= keep;
        }
    }
    touched
}

fn hit_ground(body: &mut Flying) -> bool {
    let floor = GROUND_TOP - PROJECTILE_RADIUS;
    if body.position.y < floor {
        return false;
    }
    body.position.y = floor;
    if body.velocity.y > 0.0 {
        body.velocity.y = -body.velocity.y * SOFT_RESTITUTION;
    }
    body.velocity.x *= GROUND_FRICTION;
    true
}

/// Apply blast damage to every target and obstacle within `radius` of `center`.
pub fn detonate(world: &mut World, center: DVec2, radius: f64, events: &mut Vec<SandboxEvent>) {
    events.push(SandboxEvent::Detonation { position: center });
    for (_entity, (pos, target)) in world.query_mut::<(&Position, &mut Target)>() {
        let damage = blast_damage(pos.0.distance(center), radius);
        if target.health <= 0.0 || damage <= 0.0 {
            continue;
        }
        target.health -= damage;
        events.push(SandboxEvent::TargetHit { id: target.id, damage });
        if target.health <= 0.0 {
            events.push(SandboxEvent::TargetDestroyed { id: target.id });
        }
    }
    for (_entity, (pos, obstacle)) in world.query_mut::<(&Position, &mut Obstacle)>() {
        let damage = blast_damage(pos.0.distance(center), radius);
        if obstacle.health <= 0.0 || damage <= 0.0 {
            continue;
        }
        obstacle.health -= damage;
        if obstacle.health <= 0.0 {
            events.push(SandboxEvent::ObstacleDestroyed { id: obstacle.id });
        }
    }
}
