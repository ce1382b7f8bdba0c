use glam::DVec2;

use crate::aim::*;
use crate::commands::SandboxCommand;
use crate::config::AimConfig;
use crate::enums::*;
use crate::error::ConfigError;
use crate::events::AimEvent;
use crate::materials::*;
use crate::profiles::*;
use crate::scene::*;
use crate::state::ScoreState;
use crate::types::*;

fn obstacle(id: u32, x: f64, y: f64) -> ObstacleView {
    ObstacleView {
        id: EntityId(id),
        position: DVec2::new(x, y),
        size: DVec2::new(40.0, 80.0),
        material: MaterialKind::Wood,
        health: 180,
        max_health: 180,
        active: true,
        destroyed: false,
    }
}

fn target(id: u32, x: f64, y: f64) -> TargetView {
    TargetView {
        id: EntityId(id),
        position: DVec2::new(x, y),
        size_class: TargetSize::Medium,
        health: 39,
        max_health: 39,
        active: true,
        destroyed: false,
    }
}

#[test]
fn test_projectile_kind_serde() {
    for kind in ProjectileKind::ALL {
        let json = serde_json::to_string(&kind).unwrap();
        let back: ProjectileKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, back);
    }
}

#[test]
fn test_material_names_are_lowercase() {
    assert_eq!(serde_json::to_string(&MaterialKind::Stoneslab).unwrap(), "\"stoneslab\"");
    let m: MaterialKind = serde_json::from_str("\"glass\"").unwrap();
    assert_eq!(m, MaterialKind::Glass);
}

#[test]
fn test_materials_ordered_by_strength() {
    let strengths: Vec<f64> = MaterialKind::ALL.iter().map(|&m| material(m).strength).collect();
    assert!(strengths.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(obstacle_max_health(MaterialKind::Wood), 180);
    assert_eq!(obstacle_max_health(MaterialKind::Stone), 600);
}

#[test]
fn test_target_health_and_radius() {
    assert_eq!(target_max_health(TargetSize::Small), 13);
    assert_eq!(target_max_health(TargetSize::Large), 65);
    assert!(target_radius(TargetSize::Small) < target_radius(TargetSize::Large));
}

#[test]
fn test_points_follow_strength_and_size() {
    assert_eq!(obstacle_points(MaterialKind::Glass), 600);
    assert!(obstacle_points(MaterialKind::Wood) < obstacle_points(MaterialKind::Stone));
    assert_eq!(target_points(TargetSize::Small), 1000);
    assert_eq!(target_points(TargetSize::Medium), 3000);
    assert_eq!(target_points(TargetSize::Large), 5000);
}

#[test]
fn test_hit_ratio() {
    let mut score = ScoreState::default();
    assert_eq!(score.hit_ratio(), 0.0);
    score.aimed_launches = 2;
    score.aimed_hits = 1;
    assert!((score.hit_ratio() - 0.5).abs() < 1e-12);
}

#[test]
fn test_impact_damage_grows_with_speed() {
    assert_eq!(projectile_impact_damage(5.0), 0.0);
    assert!(projectile_impact_damage(200.0) > projectile_impact_damage(50.0));
    // Harder materials soak more of the same impact.
    assert!(material(MaterialKind::Stone).hardness > material(MaterialKind::Glass).hardness);
}

#[test]
fn test_blast_damage_zero_outside_radius() {
    assert_eq!(blast_damage(121.0, 120.0), 0.0);
    assert!(blast_damage(10.0, 120.0) > blast_damage(100.0, 120.0));
}

#[test]
fn test_speed_boost_clamped_and_direction_kept() {
    let profile = projectile_profile(ProjectileKind::Accelerating);
    let v = DVec2::new(300.0, -400.0);
    let boosted = profile.apply_skill(v);
    assert!((boosted.length() - 1000.0).abs() < 1e-9);
    assert!((boosted.normalize() - v.normalize()).length() < 1e-12);

    let fast = DVec2::new(1000.0, 0.0);
    assert!((profile.apply_skill(fast).length() - crate::constants::ACCELERATING_MAX_SPEED).abs() < 1e-9);
}

#[test]
fn test_skill_only_changes_accelerating_velocity() {
    let v = DVec2::new(100.0, -50.0);
    assert_eq!(projectile_profile(ProjectileKind::Direct).apply_skill(v), v);
    assert_eq!(projectile_profile(ProjectileKind::AreaEffect).apply_skill(v), v);
    assert!(projectile_profile(ProjectileKind::Accelerating).activates_on_launch());
    assert!(!projectile_profile(ProjectileKind::AreaEffect).activates_on_launch());
}

#[test]
fn test_velocity_from_angle_faces_target() {
    let right = velocity_from_angle(45.0, 100.0, facing(DVec2::ZERO, DVec2::new(10.0, 0.0)));
    assert!(right.x > 0.0 && right.y < 0.0);
    let left = velocity_from_angle(45.0, 100.0, facing(DVec2::ZERO, DVec2::new(-10.0, 0.0)));
    assert!(left.x < 0.0 && left.y < 0.0);
    assert!((right.length() - 100.0).abs() < 1e-9);
}

#[test]
fn test_line_elevation() {
    let from = DVec2::new(0.0, 100.0);
    assert!((line_elevation_deg(from, DVec2::new(100.0, 0.0)) - 45.0).abs() < 1e-9);
    assert!((line_elevation_deg(from, DVec2::new(-100.0, 200.0)) + 45.0).abs() < 1e-9);
}

#[test]
fn test_turn_angle() {
    assert!((turn_angle_deg(DVec2::X, DVec2::Y) - 90.0).abs() < 1e-9);
    assert_eq!(turn_angle_deg(DVec2::ZERO, DVec2::Y), 0.0);
}

#[test]
fn test_obstacle_contains_uses_footprint() {
    let o = obstacle(1, 100.0, 100.0);
    assert!(o.contains(DVec2::new(119.0, 139.0)));
    assert!(!o.contains(DVec2::new(121.0, 100.0)));
}

#[test]
fn test_snapshot_liveness() {
    let mut scene = FrameSnapshot::new(DVec2::new(200.0, 500.0));
    scene.targets.push(target(1, 900.0, 500.0));
    let mut dead = target(2, 1000.0, 500.0);
    dead.health = 0;
    scene.targets.push(dead);
    assert!(scene.target_alive(EntityId(1)));
    assert!(!scene.target_alive(EntityId(2)));
    assert_eq!(scene.live_target_count(), 1);

    scene.projectiles.push(ProjectileView {
        id: EntityId(10),
        kind: ProjectileKind::Direct,
        launched: true,
        in_play: false,
    });
    scene.projectiles.push(ProjectileView {
        id: EntityId(11),
        kind: ProjectileKind::AreaEffect,
        launched: false,
        in_play: true,
    });
    assert!(!scene.has_projectile_in_play());
    assert_eq!(scene.next_unlaunched().map(|p| p.id), Some(EntityId(11)));
}

#[test]
fn test_scene_json_defaults() {
    let json = r#"{
        "launch_point": [200.0, 500.0],
        "targets": [{"id": 3, "position": [900.0, 600.0], "size_class": "Large", "health": 65, "max_health": 65}]
    }"#;
    let scene: FrameSnapshot = serde_json::from_str(json).unwrap();
    assert!(scene.obstacles.is_empty());
    assert!(scene.targets[0].active);
    assert!(!scene.targets[0].destroyed);
}

#[test]
fn test_protection_depth() {
    let p = Protection { occluders: 2, nearby: 1 };
    assert_eq!(p.depth(), 3);
    assert!(!p.is_exposed());
    assert!(Protection::default().is_exposed());
}

#[test]
fn test_descriptor_kind_tagged() {
    let kind = DescriptorKind::ProtectedTarget { size_class: TargetSize::Small };
    let json = serde_json::to_string(&kind).unwrap();
    assert!(json.contains("\"kind\":\"ProtectedTarget\""));
}

#[test]
fn test_invalid_aim_result() {
    let r = AimResult::invalid(ProjectileKind::Direct, DVec2::ZERO, DVec2::new(5.0, 5.0));
    assert!(!r.valid);
    assert!(r.error_pct.is_infinite());
    assert!(r.target_id.is_none());
}

#[test]
fn test_config_defaults() {
    let c = AimConfig::default();
    assert_eq!(c.solver.error_threshold_pct.get(ProjectileKind::Direct), 3.0);
    assert_eq!(c.solver.error_threshold_pct.get(ProjectileKind::AreaEffect), 8.0);
    assert_eq!(c.solver.algorithms.get(ProjectileKind::AreaEffect), SolverAlgorithm::AngleBisection);
    assert_eq!(c.solver.horizon_secs.get(ProjectileKind::Accelerating), 5.0);
    assert_eq!(c.max_solve_retries, 3);
    assert!(c.validate().is_ok());
}

#[test]
fn test_config_partial_json_keeps_defaults() {
    let c = AimConfig::from_json_str(r#"{"preview_duration_secs": 0.5, "solver": {"grid": {"angle_step_deg": 1.0}}}"#).unwrap();
    assert_eq!(c.preview_duration_secs, 0.5);
    assert_eq!(c.solver.grid.angle_step_deg, 1.0);
    assert_eq!(c.solver.grid.power_step_pct, 5.0);
    assert_eq!(c.settle_delay_secs, 1.0);
}

#[test]
fn test_config_rejects_zero_step() {
    let err = AimConfig::from_json_str(r#"{"solver": {"grid": {"power_step_pct": 0.0}}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "solver.grid.power_step_pct", .. }));
    assert!(matches!(AimConfig::from_json_str("{not json"), Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_rejects_negative_skill_delay() {
    let err = AimConfig::from_json_str(r#"{"solver": {"skill_delay_secs": -0.5}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "solver.skill_delay_secs", .. }));
    let c = AimConfig::from_json_str(r#"{"solver": {"skill_delay_secs": 0.5}}"#).unwrap();
    assert_eq!(c.solver.skill_delay_secs, 0.5);
}

#[test]
fn test_config_missing_file() {
    let err = AimConfig::from_path("/nonexistent/volley-aim.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_command_and_event_tags() {
    let cmd = SandboxCommand::SetAutoAim { enabled: true };
    let json = serde_json::to_string(&cmd).unwrap();
    assert!(json.contains("\"type\":\"SetAutoAim\""));

    let ev = AimEvent::LaunchAborted { reason: AbortReason::StaleTarget };
    let back: AimEvent = serde_json::from_str(&serde_json::to_string(&ev).unwrap()).unwrap();
    assert_eq!(ev, back);
}

#[test]
fn test_sim_time_advance() {
    let mut t = SimTime::default();
    for _ in 0..60 {
        t.advance();
    }
    assert_eq!(t.tick, 60);
    assert!((t.elapsed_secs - 1.0).abs() < 1e-9);
}
