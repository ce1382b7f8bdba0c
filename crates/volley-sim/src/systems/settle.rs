//! Settle detection: a projectile leaves play once it rests long enough or
//! flies out of the world.

use hecs::World;

use volley_core::components::{Position, Projectile, ProjectileStage, Velocity};
use volley_core::constants::*;
use volley_core::events::SandboxEvent;

pub fn run(world: &mut World, dt: f64, events: &mut Vec<SandboxEvent>) {
    for (_entity, (pos, vel, projectile)) in world.query_mut::<(&Position, &Velocity, &mut Projectile)>() {
        if projectile.stage != ProjectileStage::InFlight {
            continue;
        }
        if vel.0.length() < REST_SPEED {
            projectile.rest_secs += dt;
        } else {
            projectile.rest_secs = 0.0;
        }
        let p = pos.0;
        let gone = p.x < -OUT_OF_BOUNDS_MARGIN
            || p.x > WORLD_WIDTH + OUT_OF_BOUNDS_MARGIN
            || p.y > WORLD_HEIGHT + OUT_OF_BOUNDS_MARGIN;
        if gone || projectile.rest_secs + 1e-9 >= REST_DURATION_SECS {
            projectile.stage = ProjectileStage::Settled;
            events.push(SandboxEvent::ProjectileSettled { id: projectile.id });
        }
    }
}
