//! Rejects trajectories that are accurate but unusable: folds and detours.

use glam::DVec2;
use volley_core::config::ValidityConfig;
use volley_core::types::turn_angle_deg;

use crate::error::TrajectoryFault;

/// Check the flight from launch through `closest_index`.
pub fn validate(
    samples: &[DVec2],
    closest_index: usize,
    launch_point: DVec2,
    target_position: DVec2,
    config: &ValidityConfig,
) -> Result<(), TrajectoryFault> {
    let end = (closest_index + 1).min(samples.len());
    let path = &samples[..end];
    check_fold(path, config)?;
    check_span(path, launch_point.x, target_position.x, config.span_tolerance)
}

/// Direction change between successive segments must stay under the fold
/// threshold, and under the stricter apex threshold near the highest point.
pub fn check_fold(path: &[DVec2], config: &ValidityConfig) -> Result<(), TrajectoryFault> {
    if path.len() < 3 {
        return Ok(());
    }
    let apex = apex_index(path);
    for i in 1..path.len() - 1 {
        let angle_deg = turn_angle_deg(path[i] - path[i - 1], path[i + 1] - path[i]);
        let limit = if i.abs_diff(apex) <= config.apex_window {
            config.apex_fold_threshold_deg
        } else {
            config.fold_threshold_deg
        };
        if angle_deg > limit {
            return Err(TrajectoryFault::Fold { index: i, angle_deg });
        }
    }
    Ok(())
}

/// Every sample must stay within the horizontal span between launch and target.
pub fn check_span(path: &[DVec2], launch_x: f64, target_x: f64, tolerance: f64) -> Result<(), TrajectoryFault> {
    let lo = launch_x.min(target_x) - tolerance;
    let hi = launch_x.max(target_x) + tolerance;
    match path.iter().position(|p| p.x < lo || p.x > hi) {
        Some(index) => Err(TrajectoryFault::SpanExcursion {
            index,
            x: path[index].x,
        }),
        None => Ok(()),
    }
}

/// Index of the highest sample on screen (smallest y).
fn apex_index(path: &[DVec2]) -> usize {
    path.iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best, min_y), (i, p)| {
            if p.y < min_y {
                (i, p.y)
            } else {
                (best, min_y)
            }
        })
        .0
}
