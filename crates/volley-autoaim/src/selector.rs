//! Target selection strategies, one per projectile kind.
//!
//! Each strategy ranks only protected targets and falls back through
//! progressively looser tiers, so a live target is always returned when one
//! exists among the candidates.

use glam::DVec2;
use volley_core::aim::TargetDescriptor;
use volley_core::config::SelectionConfig;
use volley_core::enums::ProjectileKind;
use volley_core::types::EntityId;

// --- Direct ---

/// Score multiplier for exposed targets inside the close band.
const EXPOSED_BONUS: f64 = 1.5;

/// Direct: exposed targets closer than this get the bonus (px).
const DIRECT_CLOSE_RANGE: f64 = 800.0;

/// Direct: score lost per layer of protection.
const DIRECT_DEPTH_PENALTY: f64 = 20.0;

// --- Accelerating ---

/// Accelerating: exposed targets at least this far get the bonus (px).
const ACCELERATING_FAR_RANGE: f64 = 800.0;

// --- Area effect ---

const AREA_DEPTH_WEIGHT: f64 = 50.0;
const AREA_HEALTH_WEIGHT: f64 = 0.1;
const AREA_DISTANCE_PENALTY: f64 = 0.01;
const AREA_FALLBACK_DISTANCE_WEIGHT: f64 = 0.1;
const AREA_FALLBACK_THREAT_WEIGHT: f64 = 10.0;

/// Pick a target for `kind`, skipping any id in `rejected`.
pub fn select_target<'a>(
    kind: ProjectileKind,
    descriptors: &'a [TargetDescriptor],
    launch_point: DVec2,
    config: &SelectionConfig,
    rejected: &[EntityId],
) -> Option<&'a TargetDescriptor> {
    let candidates: Vec<&TargetDescriptor> = descriptors
        .iter()
        .filter(|d| d.is_target() && !rejected.contains(&d.id))
        .collect();
    match kind {
        ProjectileKind::Direct => select_direct(&candidates, launch_point, config),
        ProjectileKind::Accelerating => select_accelerating(&candidates, launch_point, config),
        ProjectileKind::AreaEffect => select_area_effect(&candidates, launch_point),
    }
}

/// Close, lightly protected targets first.
pub fn select_direct<'a>(
    candidates: &[&'a TargetDescriptor],
    launch_point: DVec2,
    config: &SelectionConfig,
) -> Option<&'a TargetDescriptor> {
    let primary = best_by(candidates, |d| {
        let distance = d.position.distance(launch_point);
        if distance > config.direct_preferred_radius {
            return None;
        }
        let depth = d.protection.depth() as f64;
        let mut score = 100.0 / (1.0 + distance * 0.01) * (100.0 - DIRECT_DEPTH_PENALTY * depth).max(0.0);
        if d.protection.is_exposed() && distance < DIRECT_CLOSE_RANGE {
            score *= EXPOSED_BONUS;
        }
        (score > 0.0).then_some(score)
    });
    primary.or_else(|| nearest(candidates, launch_point))
}

/// Preference for long, open shots where the speed boost pays off.
pub fn distance_band_score(distance: f64) -> f64 {
    if (600.0..=1200.0).contains(&distance) {
        100.0
    } else if distance > 1200.0 {
        80.0 + (distance - 1200.0) * 0.05
    } else if distance >= 400.0 {
        60.0
    } else {
        40.0
    }
}

/// Accelerating strategy's protection preference.
pub fn protection_score(depth: u32) -> f64 {
    match depth {
        0 => 100.0,
        1 => 70.0,
        2 => 40.0,
        _ => 20.0,
    }
}

/// Far targets behind at most one layer of protection.
pub fn select_accelerating<'a>(
    candidates: &[&'a TargetDescriptor],
    launch_point: DVec2,
    config: &SelectionConfig,
) -> Option<&'a TargetDescriptor> {
    let primary = best_by(candidates, |d| {
        let depth = d.protection.depth();
        if depth > config.accelerating_max_depth {
            return None;
        }
        let distance = d.position.distance(launch_point);
        let mut score = distance_band_score(distance) / 100.0 * protection_score(depth) / 100.0 * 100.0;
        if d.protection.is_exposed() && distance >= ACCELERATING_FAR_RANGE {
            score *= EXPOSED_BONUS;
        }
        Some(score)
    });
    primary
        .or_else(|| {
            best_by(candidates, |d| {
                let distance = d.position.distance(launch_point);
                (distance >= config.accelerating_min_distance).then(|| distance_band_score(distance))
            })
        })
        .or_else(|| nearest(candidates, launch_point))
}

/// Heavily protected targets, where the blast reaches past cover.
pub fn select_area_effect<'a>(
    candidates: &[&'a TargetDescriptor],
    launch_point: DVec2,
) -> Option<&'a TargetDescriptor> {
    let primary = best_by(candidates, |d| {
        let depth = d.protection.depth();
        if depth == 0 {
            return None;
        }
        let distance = d.position.distance(launch_point);
        Some(depth as f64 * AREA_DEPTH_WEIGHT + d.health as f64 * AREA_HEALTH_WEIGHT - distance * AREA_DISTANCE_PENALTY)
    });
    primary.or_else(|| {
        best_by(candidates, |d| {
            let distance = d.position.distance(launch_point);
            Some(distance * AREA_FALLBACK_DISTANCE_WEIGHT + d.threat_value * AREA_FALLBACK_THREAT_WEIGHT)
        })
    })
}

fn nearest<'a>(candidates: &[&'a TargetDescriptor], launch_point: DVec2) -> Option<&'a TargetDescriptor> {
    best_by(candidates, |d| Some(-d.position.distance(launch_point)))
}

/// Highest-scoring candidate; ties keep the earliest. `None` scores are skipped.
fn best_by<'a>(
    candidates: &[&'a TargetDescriptor],
    score: impl Fn(&TargetDescriptor) -> Option<f64>,
) -> Option<&'a TargetDescriptor> {
    let mut best: Option<(&TargetDescriptor, f64)> = None;
    for &d in candidates {
        let Some(s) = score(d) else { continue };
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((d, s));
        }
    }
    best.map(|(d, _)| d)
}
