//! Protection of a target against a straight-line shot.
//!
//! Path occlusion steps along the launch-to-target line and records which
//! obstacle footprints the line passes through. Local protection counts
//! obstacles clustered around the target itself.

use std::collections::BTreeSet;

use glam::DVec2;
use volley_core::aim::Protection;
use volley_core::config::OcclusionConfig;
use volley_core::scene::ObstacleView;
use volley_core::types::EntityId;

/// Protection of a point of radius `target_radius` as seen from `launch_point`.
pub fn protection(
    target_position: DVec2,
    target_radius: f64,
    obstacles: &[ObstacleView],
    launch_point: DVec2,
    config: &OcclusionConfig,
) -> Protection {
    protection_excluding(None, target_position, target_radius, obstacles, launch_point, config)
}

/// Same as [`protection`], ignoring the obstacle `exclude` (an obstacle never shields itself).
pub fn protection_excluding(
    exclude: Option<EntityId>,
    target_position: DVec2,
    target_radius: f64,
    obstacles: &[ObstacleView],
    launch_point: DVec2,
    config: &OcclusionConfig,
) -> Protection {
    let live = || {
        obstacles
            .iter()
            .filter(move |o| o.is_live() && Some(o.id) != exclude)
    };
    Protection {
        occluders: path_occluders(target_position, target_radius, live(), launch_point, config.sample_spacing),
        nearby: live()
            .filter(|o| o.position.distance(target_position) <= config.local_radius)
            .count() as u32,
    }
}

/// Distinct obstacles whose footprint contains a sample of the launch line.
/// Sampling stops `target_radius` short of the target.
fn path_occluders<'a>(
    target_position: DVec2,
    target_radius: f64,
    obstacles: impl Iterator<Item = &'a ObstacleView> + Clone,
    launch_point: DVec2,
    spacing: f64,
) -> u32 {
    let delta = target_position - launch_point;
    let length = delta.length();
    let reach = length - target_radius;
    if reach <= 0.0 || spacing <= 0.0 {
        return 0;
    }
    let dir = delta / length;

    let mut hits = BTreeSet::new();
    let mut along = spacing;
    loop {
        let travelled = along.min(reach);
        let sample = launch_point + dir * travelled;
        for obstacle in obstacles.clone() {
            if obstacle.contains(sample) {
                hits.insert(obstacle.id);
            }
        }
        if travelled >= reach {
            break;
        }
        along += spacing;
    }
    hits.len() as u32
}
