//! Trajectory search: find launch parameters that put a projectile on target.
//!
//! The forward model is reached only through [`TrajectoryOracle`]; the grid
//! and bisection searches never integrate physics themselves. Each
//! projectile kind uses the algorithm configured for it.

pub mod bisection;
pub mod grid;
pub mod validity;

use glam::DVec2;
use tracing::{debug, info};
use volley_core::aim::{AimResult, TargetDescriptor};
use volley_core::config::{AimConfig, ValidityConfig};
use volley_core::constants::{MAX_PULL_DISTANCE, SLINGSHOT_STIFFNESS};
use volley_core::enums::{ProjectileKind, SolverAlgorithm};
use volley_core::profiles::{projectile_profile, PhysicsProfile, ProjectileProfile};
use volley_core::types::{facing, velocity_from_angle};

use crate::ballistics::{simulate_flight, AimPoint, Shot, TrajectoryCandidate};
use crate::error::{AimError, TrajectoryFault};

/// Forward simulation used as a black box by the searches.
pub trait TrajectoryOracle {
    fn profile(&self) -> &ProjectileProfile;

    fn simulate(&self, shot: &Shot, aim: &AimPoint, horizon_secs: f64) -> TrajectoryCandidate;
}

/// The ballistic stepper as an oracle.
#[derive(Debug, Clone, Copy)]
pub struct BallisticOracle {
    physics: PhysicsProfile,
    profile: ProjectileProfile,
}

impl BallisticOracle {
    pub fn new(kind: ProjectileKind) -> Self {
        Self::with_physics(PhysicsProfile::default(), kind)
    }

    pub fn with_physics(physics: PhysicsProfile, kind: ProjectileKind) -> Self {
        Self {
            physics,
            profile: projectile_profile(kind),
        }
    }
}

impl TrajectoryOracle for BallisticOracle {
    fn profile(&self) -> &ProjectileProfile {
        &self.profile
    }

    fn simulate(&self, shot: &Shot, aim: &AimPoint, horizon_secs: f64) -> TrajectoryCandidate {
        simulate_flight(&self.physics, &self.profile, shot, aim, horizon_secs)
    }
}

/// Outcome of one solve, with bookkeeping for stats.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub result: AimResult,
    /// Forward simulations run.
    pub evaluations: u64,
    /// Set when `result` is invalid.
    pub error: Option<AimError>,
}

impl SolveReport {
    pub fn into_result(self) -> Result<AimResult, AimError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.result),
        }
    }
}

/// Solve with the default ballistic oracle.
pub fn solve(
    launch_point: DVec2,
    target: &TargetDescriptor,
    kind: ProjectileKind,
    config: &AimConfig,
) -> AimResult {
    let physics = PhysicsProfile {
        dt: config.solver.dt,
        ..PhysicsProfile::default()
    };
    let oracle = BallisticOracle::with_physics(physics, kind);
    solve_with(&oracle, launch_point, target, kind, config).result
}

/// Solve against an arbitrary oracle.
pub fn solve_with<O: TrajectoryOracle>(
    oracle: &O,
    launch_point: DVec2,
    target: &TargetDescriptor,
    kind: ProjectileKind,
    config: &AimConfig,
) -> SolveReport {
    let solver = &config.solver;
    let algorithm = solver.algorithms.get(kind);
    let mut search = Search::new(oracle, launch_point, target, kind, config);

    let outcome = match algorithm {
        SolverAlgorithm::GridRefine => grid::search(&mut search, &solver.grid),
        SolverAlgorithm::AngleBisection => bisection::search(&mut search, &solver.bisection),
    };
    let evaluations = search.evaluations;

    if let Some(best) = outcome.accepted {
        let result = search.build_result(&best, algorithm);
        info!(
            target_id = target.id.0,
            ?kind,
            angle = result.angle_deg,
            power = result.power_pct,
            error_pct = result.error_pct,
            evaluations,
            "aim solved"
        );
        return SolveReport {
            result,
            evaluations,
            error: None,
        };
    }

    let mut result = AimResult::invalid(kind, launch_point, target.position);
    result.target_id = Some(target.id);
    result.algorithm = Some(algorithm);
    result.error_pct = outcome.best_error_pct;

    let error = match outcome.fault {
        Some(fault) if outcome.rejected_within_threshold => AimError::InvalidTrajectory(fault),
        _ => AimError::SolveFailed {
            target: target.id,
            best_error_pct: outcome.best_error_pct,
        },
    };
    debug!(target_id = target.id.0, ?kind, evaluations, %error, "aim failed");
    SolveReport {
        result,
        evaluations,
        error: Some(error),
    }
}

/// One scored (angle, power) candidate.
#[derive(Debug, Clone)]
pub(crate) struct Evaluated {
    pub angle_deg: f64,
    pub power_pct: f64,
    pub velocity: DVec2,
    pub candidate: TrajectoryCandidate,
    pub error_pct: f64,
}

/// What a search found.
#[derive(Debug)]
pub(crate) struct SearchOutcome {
    /// Best valid candidate within the error threshold.
    pub accepted: Option<Evaluated>,
    /// Lowest error seen over every candidate.
    pub best_error_pct: f64,
    /// Last validity fault among candidates that were otherwise the best so far.
    pub fault: Option<TrajectoryFault>,
    /// A faulted candidate was within the threshold.
    pub rejected_within_threshold: bool,
}

/// Running best-candidate bookkeeping shared by both searches.
#[derive(Debug)]
pub(crate) struct Tracker {
    /// Best valid candidate (any error).
    pub best_valid: Option<Evaluated>,
    /// Lowest-error candidate, valid or not.
    pub best_any: Option<(f64, f64, f64)>,
    pub fault: Option<TrajectoryFault>,
    pub rejected_within_threshold: bool,
}

impl Tracker {
    pub fn new() -> Self {
        Self {
            best_valid: None,
            best_any: None,
            fault: None,
            rejected_within_threshold: false,
        }
    }

    pub fn best_error(&self) -> f64 {
        self.best_valid
            .as_ref()
            .map_or(f64::INFINITY, |b| b.error_pct)
    }

    /// Record a candidate. Validity is only checked when it would improve the best.
    pub fn consider<O: TrajectoryOracle>(&mut self, search: &Search<'_, O>, ev: Evaluated) {
        if self.best_any.map_or(true, |(e, _, _)| ev.error_pct < e) {
            self.best_any = Some((ev.error_pct, ev.angle_deg, ev.power_pct));
        }
        if ev.error_pct >= self.best_error() {
            return;
        }
        match search.validate(&ev) {
            Ok(()) => self.best_valid = Some(ev),
            Err(fault) => {
                if ev.error_pct <= search.threshold_pct {
                    self.rejected_within_threshold = true;
                }
                self.fault = Some(fault);
            }
        }
    }

    pub fn finish(self, threshold_pct: f64) -> SearchOutcome {
        let best_error_pct = self.best_any.map_or(f64::INFINITY, |(e, _, _)| e);
        SearchOutcome {
            accepted: self.best_valid.filter(|b| b.error_pct <= threshold_pct),
            best_error_pct,
            fault: self.fault,
            rejected_within_threshold: self.rejected_within_threshold,
        }
    }
}

/// Per-solve context: target geometry, kind parameters and the oracle.
pub(crate) struct Search<'a, O> {
    oracle: &'a O,
    kind: ProjectileKind,
    target: &'a TargetDescriptor,
    pub launch_point: DVec2,
    pub aim: AimPoint,
    facing: f64,
    extent: f64,
    pub threshold_pct: f64,
    horizon_secs: f64,
    skill_at_secs: Option<f64>,
    validity: ValidityConfig,
    pub evaluations: u64,
}

impl<'a, O: TrajectoryOracle> Search<'a, O> {
    fn new(
        oracle: &'a O,
        launch_point: DVec2,
        target: &'a TargetDescriptor,
        kind: ProjectileKind,
        config: &AimConfig,
    ) -> Self {
        let profile = oracle.profile();
        Self {
            oracle,
            kind,
            target,
            launch_point,
            aim: AimPoint {
                position: target.position,
                hit_radius: target.hit_radius() + profile.hit_margin,
            },
            facing: facing(launch_point, target.position),
            extent: target.extent(),
            threshold_pct: config.solver.error_threshold_pct.get(kind),
            horizon_secs: config.solver.horizon_secs.get(kind),
            skill_at_secs: profile
                .activates_on_launch()
                .then_some(config.solver.skill_delay_secs),
            validity: config.solver.validity,
            evaluations: 0,
        }
    }

    /// Simulate one (angle, power) pair and score it.
    pub fn evaluate(&mut self, angle_deg: f64, power_pct: f64) -> Evaluated {
        let speed = power_pct / 100.0 * self.oracle.profile().initial_max_speed;
        let velocity = velocity_from_angle(angle_deg, speed, self.facing);
        let shot = Shot {
            origin: self.launch_point,
            velocity,
            skill_at_secs: self.skill_at_secs,
        };
        let candidate = self.oracle.simulate(&shot, &self.aim, self.horizon_secs);
        self.evaluations += 1;
        let error_pct = if candidate.hit {
            0.0
        } else {
            candidate.closest_distance / self.extent * 100.0
        };
        Evaluated {
            angle_deg,
            power_pct,
            velocity,
            candidate,
            error_pct,
        }
    }

    pub fn validate(&self, ev: &Evaluated) -> Result<(), TrajectoryFault> {
        validity::validate(
            &ev.candidate.samples,
            ev.candidate.closest_index,
            self.launch_point,
            self.aim.position,
            &self.validity,
        )
    }

    fn build_result(&self, ev: &Evaluated, algorithm: SolverAlgorithm) -> AimResult {
        AimResult {
            valid: true,
            kind: self.kind,
            launch_point: self.launch_point,
            target_point: self.target.position,
            target_id: Some(self.target.id),
            angle_deg: ev.angle_deg,
            power_pct: ev.power_pct,
            launch_velocity: ev.velocity,
            pull: pull_for_velocity(ev.velocity),
            error_pct: ev.error_pct,
            closest_distance: ev.candidate.closest_distance,
            skill_activation_secs: self.skill_at_secs,
            trajectory: ev.candidate.up_to_closest().to_vec(),
            algorithm: Some(algorithm),
        }
    }
}

/// Slingshot pull that produces `velocity`: opposite direction, scaled by stiffness.
pub fn pull_for_velocity(velocity: DVec2) -> DVec2 {
    (-velocity / SLINGSHOT_STIFFNESS).clamp_length_max(MAX_PULL_DISTANCE)
}

/// Launch velocity produced by a slingshot `pull`, capped at the kind's launch speed.
pub fn velocity_for_pull(pull: DVec2, kind: ProjectileKind) -> DVec2 {
    let pull = pull.clamp_length_max(MAX_PULL_DISTANCE);
    (-pull * SLINGSHOT_STIFFNESS).clamp_length_max(projectile_profile(kind).initial_max_speed)
}

/// `min..=max` in `step` increments; the last value never overshoots `max`.
pub(crate) fn steps(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = if max >= min && step > 0.0 {
        ((max - min) / step + 1e-9).floor() as usize + 1
    } else {
        0
    };
    (0..count).map(move |i| min + i as f64 * step)
}
