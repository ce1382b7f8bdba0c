//! Scene analysis: one flat, annotated descriptor per live entity.
//!
//! A full rebuild from the current snapshot every analysis tick. Nothing is
//! cached between calls, so protection always reflects the obstacles that are
//! still standing.

use glam::DVec2;
use tracing::debug;
use volley_core::aim::{DescriptorKind, Protection, TargetDescriptor};
use volley_core::config::OcclusionConfig;
use volley_core::enums::TargetSize;
use volley_core::materials::material;
use volley_core::scene::{FrameSnapshot, ObstacleView, TargetView};

use crate::occlusion::{protection, protection_excluding};

/// Threat weight per target size class.
pub fn size_weight(size: TargetSize) -> f64 {
    match size {
        TargetSize::Small => 1.0,
        TargetSize::Medium => 1.5,
        TargetSize::Large => 2.0,
    }
}

/// Obstacle threat as a fraction of material strength.
const OBSTACLE_THREAT_FACTOR: f64 = 0.1;

/// Attack value falloff per pixel of distance.
const ATTACK_DISTANCE_FALLOFF: f64 = 0.01;

/// Build descriptors for every live obstacle and target, obstacles first.
pub fn analyze(
    obstacles: &[ObstacleView],
    targets: &[TargetView],
    launch_point: DVec2,
    config: &OcclusionConfig,
) -> Vec<TargetDescriptor> {
    let mut out = Vec::with_capacity(obstacles.len() + targets.len());

    for obstacle in obstacles.iter().filter(|o| o.is_live()) {
        let props = material(obstacle.material);
        let radius = obstacle.size.max_element() * 0.5;
        out.push(TargetDescriptor {
            id: obstacle.id,
            kind: DescriptorKind::Obstacle {
                material: obstacle.material,
                strength: props.strength,
            },
            position: obstacle.position,
            size: obstacle.size,
            health: obstacle.health,
            max_health: obstacle.max_health,
            protection: protection_excluding(
                Some(obstacle.id),
                obstacle.position,
                radius,
                obstacles,
                launch_point,
                config,
            ),
            threat_value: props.strength * OBSTACLE_THREAT_FACTOR,
            attack_value: 0.0,
        });
    }

    for target in targets.iter().filter(|t| t.is_live()) {
        let radius = target.radius();
        let distance = target.position.distance(launch_point);
        let prot: Protection = protection(target.position, radius, obstacles, launch_point, config);
        out.push(TargetDescriptor {
            id: target.id,
            kind: DescriptorKind::ProtectedTarget {
                size_class: target.size_class,
            },
            position: target.position,
            size: DVec2::splat(radius),
            health: target.health,
            max_health: target.max_health,
            protection: prot,
            threat_value: target.health as f64 * size_weight(target.size_class),
            attack_value: target.health as f64 / (1.0 + distance * ATTACK_DISTANCE_FALLOFF),
        });
    }

    debug!(
        descriptors = out.len(),
        targets = out.iter().filter(|d| d.is_target()).count(),
        "scene analyzed"
    );
    out
}

/// Analyze a whole frame snapshot.
pub fn analyze_scene(scene: &FrameSnapshot, config: &OcclusionConfig) -> Vec<TargetDescriptor> {
    analyze(&scene.obstacles, &scene.targets, scene.launch_point, config)
}
