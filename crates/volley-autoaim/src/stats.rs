//! Solver performance counters.

use std::time::Duration;

use volley_core::state::AimStatsView;

#[derive(Debug, Clone, Default)]
pub struct AimStats {
    solves: u64,
    accepted: u64,
    total_ms: f64,
    peak_ms: f64,
    evaluations: u64,
}

impl AimStats {
    /// Record one solver invocation.
    pub fn record(&mut self, elapsed: Duration, evaluations: u64, accepted: bool) {
        let ms = elapsed.as_secs_f64() * 1000.0;
        self.solves += 1;
        self.total_ms += ms;
        self.peak_ms = self.peak_ms.max(ms);
        self.evaluations += evaluations;
        if accepted {
            self.accepted += 1;
        }
    }

    pub fn solves(&self) -> u64 {
        self.solves
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn average_ms(&self) -> f64 {
        if self.solves == 0 {
            0.0
        } else {
            self.total_ms / self.solves as f64
        }
    }

    /// Share of solves that produced a launchable aim.
    pub fn solve_acceptance_ratio(&self) -> f64 {
        if self.solves == 0 {
            0.0
        } else {
            self.accepted as f64 / self.solves as f64
        }
    }

    pub fn view(&self) -> AimStatsView {
        AimStatsView {
            solves: self.solves,
            accepted: self.accepted,
            solve_acceptance_ratio: self.solve_acceptance_ratio(),
            average_solve_ms: self.average_ms(),
            peak_solve_ms: self.peak_ms,
            evaluations: self.evaluations,
        }
    }
}
