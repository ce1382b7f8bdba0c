//! Cleanup system: removes settled projectiles and destroyed scenery.

use hecs::{Entity, World};

use volley_core::components::{Obstacle, Projectile, ProjectileStage, Target};

/// Despawn everything that has left play. Uses a pre-allocated buffer to
/// avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if projectile.stage == ProjectileStage::Settled {
            despawn_buffer.push(entity);
        }
    }
    for (entity, target) in world.query_mut::<&Target>() {
        if target.health <= 0.0 {
            despawn_buffer.push(entity);
        }
    }
    for (entity, obstacle) in world.query_mut::<&Obstacle>() {
        if obstacle.health <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
