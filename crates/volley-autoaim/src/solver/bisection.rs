//! Bisection over launch angle at fixed power.
//!
//! For each power tier a coarse upward scan from the straight-line elevation
//! brackets the angle where the shot stops passing below the target and starts
//! passing above it; bisection then closes the bracket. Lower tiers are tried
//! only when a higher one yields nothing acceptable.

use glam::DVec2;
use volley_core::config::BisectionConfig;
use volley_core::types::line_elevation_deg;

use super::{Search, SearchOutcome, TrajectoryOracle, Tracker};
use crate::ballistics::TrajectoryCandidate;

/// How a flight passes the target's vertical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Hit,
    /// Crosses above the target (smaller screen y).
    Above,
    /// Crosses at or below the target.
    Below,
    /// Never reaches the target's x.
    Short,
}

/// Classify a flight relative to `target`, shooting toward `facing` (±1).
pub fn classify(candidate: &TrajectoryCandidate, target: DVec2, facing: f64) -> Pass {
    if candidate.hit {
        return Pass::Hit;
    }
    let samples = &candidate.samples;
    for i in 1..samples.len() {
        let (a, b) = (samples[i - 1], samples[i]);
        if (b.x - target.x) * facing < 0.0 {
            continue;
        }
        let span = b.x - a.x;
        let y = if span.abs() < 1e-9 {
            b.y
        } else {
            a.y + (b.y - a.y) * (target.x - a.x) / span
        };
        return if y < target.y { Pass::Above } else { Pass::Below };
    }
    Pass::Short
}

pub(crate) fn search<O: TrajectoryOracle>(search: &mut Search<'_, O>, config: &BisectionConfig) -> SearchOutcome {
    let mut tracker = Tracker::new();
    let target = search.aim.position;
    let facing = volley_core::types::facing(search.launch_point, target);
    let base = line_elevation_deg(search.launch_point, target).min(config.max_angle_deg);

    let mut power = 100.0;
    for _ in 0..config.power_tiers {
        bisect_tier(search, &mut tracker, config, base, power, facing);
        if tracker.best_error() <= search.threshold_pct {
            break;
        }
        power *= config.tier_decay;
    }

    tracker.finish(search.threshold_pct)
}

fn bisect_tier<O: TrajectoryOracle>(
    search: &mut Search<'_, O>,
    tracker: &mut Tracker,
    config: &BisectionConfig,
    base: f64,
    power: f64,
    facing: f64,
) {
    let target = search.aim.position;

    // Coarse scan for the first angle that clears the target.
    let mut below: Option<f64> = None;
    let mut above: Option<f64> = None;
    let mut angle = base;
    loop {
        let ev = search.evaluate(angle, power);
        let pass = classify(&ev.candidate, target, facing);
        let close = ev.candidate.closest_distance <= config.tolerance_px;
        tracker.consider(search, ev);
        match pass {
            Pass::Hit => return,
            Pass::Above => {
                above = Some(angle);
                break;
            }
            Pass::Below | Pass::Short => {
                if close {
                    return;
                }
                below = Some(angle);
            }
        }
        if angle >= config.max_angle_deg {
            break;
        }
        angle = (angle + config.scan_step_deg).min(config.max_angle_deg);
    }

    let (Some(mut lo), Some(mut hi)) = (below, above) else {
        return;
    };
    for _ in 0..config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let ev = search.evaluate(mid, power);
        let pass = classify(&ev.candidate, target, facing);
        let close = ev.candidate.closest_distance <= config.tolerance_px;
        tracker.consider(search, ev);
        if close || pass == Pass::Hit {
            return;
        }
        if pass == Pass::Above {
            hi = mid;
        } else {
            lo = mid;
        }
    }
}
