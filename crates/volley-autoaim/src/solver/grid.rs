//! Angle x power grid search with local refinement.
//!
//! The coarse pass sweeps the whole grid (stopping early on a near-perfect
//! shot); refinement then resamples a one-cell neighbourhood around the best
//! candidate at the fine steps.

use volley_core::config::GridConfig;

use super::{steps, Search, SearchOutcome, TrajectoryOracle, Tracker};

pub(crate) fn search<O: TrajectoryOracle>(search: &mut Search<'_, O>, config: &GridConfig) -> SearchOutcome {
    let mut tracker = Tracker::new();

    'coarse: for angle in steps(config.angle_min_deg, config.angle_max_deg, config.angle_step_deg) {
        for power in steps(config.power_min_pct, config.power_max_pct, config.power_step_pct) {
            let ev = search.evaluate(angle, power);
            tracker.consider(search, ev);
            if tracker.best_error() < config.early_exit_error_pct {
                break 'coarse;
            }
        }
    }

    for _ in 0..config.refine_rounds {
        if tracker.best_error() < config.early_exit_error_pct {
            break;
        }
        let (center_angle, center_power) = match (&tracker.best_valid, tracker.best_any) {
            (Some(best), _) => (best.angle_deg, best.power_pct),
            (None, Some((_, angle, power))) => (angle, power),
            (None, None) => break,
        };
        let before = tracker.best_error();

        let angle_lo = (center_angle - config.angle_step_deg).max(config.angle_min_deg);
        let angle_hi = (center_angle + config.angle_step_deg).min(config.angle_max_deg);
        let power_lo = (center_power - config.power_step_pct).max(config.power_min_pct);
        let power_hi = (center_power + config.power_step_pct).min(config.power_max_pct);

        for angle in steps(angle_lo, angle_hi, config.refine_angle_step_deg) {
            for power in steps(power_lo, power_hi, config.refine_power_step_pct) {
                let ev = search.evaluate(angle, power);
                tracker.consider(search, ev);
            }
        }

        if tracker.best_error() >= before && tracker.best_valid.is_some() {
            break;
        }
    }

    tracker.finish(search.threshold_pct)
}
