//! Scoring: points for scenery destroyed this tick, aimed-hit tracking and
//! the clear bonus.
//!
//! Must run before cleanup so every destroyed entity is counted exactly once.

use hecs::World;

use volley_core::components::{Obstacle, Target};
use volley_core::constants::UNUSED_PROJECTILE_BONUS;
use volley_core::events::SandboxEvent;
use volley_core::materials::{obstacle_points, target_points};
use volley_core::scene::FrameSnapshot;
use volley_core::state::ScoreState;
use volley_core::types::EntityId;

pub fn run(world: &World, score: &mut ScoreState) {
    for (_entity, target) in world.query::<&Target>().iter() {
        if target.health <= 0.0 {
            score.points += target_points(target.size_class);
            score.targets_destroyed += 1;
        }
    }
    for (_entity, obstacle) in world.query::<&Obstacle>().iter() {
        if obstacle.health <= 0.0 {
            score.points += obstacle_points(obstacle.material);
            score.obstacles_destroyed += 1;
        }
    }
}

/// Credit the last aimed launch if its target went down this tick.
pub fn track_aimed_hit(events: &[SandboxEvent], aimed_target: &mut Option<EntityId>, score: &mut ScoreState) {
    let Some(aimed) = *aimed_target else {
        return;
    };
    let destroyed = events
        .iter()
        .any(|e| matches!(e, SandboxEvent::TargetDestroyed { id } if *id == aimed));
    if destroyed {
        score.aimed_hits += 1;
        *aimed_target = None;
    }
}

/// Award the bonus for projectiles never launched. Returns the bonus.
pub fn award_clear_bonus(frame: &FrameSnapshot, score: &mut ScoreState) -> u64 {
    let unused = frame.projectiles.iter().filter(|p| !p.launched).count() as u64;
    let bonus = unused * UNUSED_PROJECTILE_BONUS;
    score.unused_projectile_bonus += bonus;
    score.points += bonus;
    bonus
}
