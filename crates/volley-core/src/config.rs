//! Tuning configuration for the autonomous aiming system.
//!
//! Every field has a default matching the shipped game; a JSON file may
//! override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{ProjectileKind, SolverAlgorithm};
use crate::error::ConfigError;

/// One value per projectile kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerKind<T> {
    pub direct: T,
    pub accelerating: T,
    pub area_effect: T,
}

impl<T: Copy> PerKind<T> {
    pub fn get(&self, kind: ProjectileKind) -> T {
        match kind {
            ProjectileKind::Direct => self.direct,
            ProjectileKind::Accelerating => self.accelerating,
            ProjectileKind::AreaEffect => self.area_effect,
        }
    }

    pub fn set(&mut self, kind: ProjectileKind, value: T) {
        match kind {
            ProjectileKind::Direct => self.direct = value,
            ProjectileKind::Accelerating => self.accelerating = value,
            ProjectileKind::AreaEffect => self.area_effect = value,
        }
    }
}

/// Line-of-sight sampling and local protection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcclusionConfig {
    /// Distance between samples along the launch-to-target line (px).
    pub sample_spacing: f64,
    /// Obstacles within this radius of a target count as local protection (px).
    pub local_radius: f64,
}

impl Default for OcclusionConfig {
    fn default() -> Self {
        Self {
            sample_spacing: 10.0,
            local_radius: 100.0,
        }
    }
}

/// Distance bands used by the target strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Direct strategy only considers targets inside this radius in its primary tier (px).
    pub direct_preferred_radius: f64,
    /// Accelerating strategy's first fallback requires at least this distance (px).
    pub accelerating_min_distance: f64,
    /// Accelerating strategy's primary tier accepts at most this protection depth.
    pub accelerating_max_depth: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            direct_preferred_radius: 1500.0,
            accelerating_min_distance: 400.0,
            accelerating_max_depth: 1,
        }
    }
}

/// Angle x power grid search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub angle_min_deg: f64,
    pub angle_max_deg: f64,
    pub angle_step_deg: f64,
    pub power_min_pct: f64,
    pub power_max_pct: f64,
    pub power_step_pct: f64,
    pub refine_angle_step_deg: f64,
    pub refine_power_step_pct: f64,
    /// Refinement passes around the best cell.
    pub refine_rounds: u32,
    /// The coarse pass stops as soon as an accepted candidate beats this error (%).
    pub early_exit_error_pct: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            angle_min_deg: 5.0,
            angle_max_deg: 85.0,
            angle_step_deg: 2.0,
            power_min_pct: 20.0,
            power_max_pct: 100.0,
            power_step_pct: 5.0,
            refine_angle_step_deg: 0.5,
            refine_power_step_pct: 1.0,
            refine_rounds: 2,
            early_exit_error_pct: 1.0,
        }
    }
}

/// Bisection over angle at fixed power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BisectionConfig {
    /// Number of speed tiers tried, starting at full power.
    pub power_tiers: u32,
    /// Each tier's power is the previous tier's times this factor.
    pub tier_decay: f64,
    /// Coarse scan step used to bracket the crossing (degrees).
    pub scan_step_deg: f64,
    /// Upper end of the bracket (degrees).
    pub max_angle_deg: f64,
    pub max_iterations: u32,
    /// Closest approach that ends the search (px).
    pub tolerance_px: f64,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            power_tiers: 5,
            tier_decay: 0.85,
            scan_step_deg: 5.0,
            max_angle_deg: 89.0,
            max_iterations: 24,
            tolerance_px: 30.0,
        }
    }
}

/// Trajectory validity checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityConfig {
    /// Maximum direction change between successive segments (degrees).
    pub fold_threshold_deg: f64,
    /// Stricter limit that applies around the apex (degrees).
    pub apex_fold_threshold_deg: f64,
    /// Samples on either side of the apex subject to the stricter limit.
    pub apex_window: usize,
    /// Allowed excursion beyond the launch/target horizontal span (px).
    pub span_tolerance: f64,
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self {
            fold_threshold_deg: 60.0,
            apex_fold_threshold_deg: 30.0,
            apex_window: 6,
            span_tolerance: 40.0,
        }
    }
}

/// Trajectory solver tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub grid: GridConfig,
    pub bisection: BisectionConfig,
    pub validity: ValidityConfig,
    /// Search strategy per projectile kind.
    pub algorithms: PerKind<SolverAlgorithm>,
    /// Simulated seconds per candidate.
    pub horizon_secs: PerKind<f64>,
    /// Maximum accepted error, percent of target size.
    pub error_threshold_pct: PerKind<f64>,
    /// Integration step; equal to the live physics step.
    pub dt: f64,
    /// Seconds after launch at which a speed-boost skill is scheduled.
    pub skill_delay_secs: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            bisection: BisectionConfig::default(),
            validity: ValidityConfig::default(),
            algorithms: PerKind {
                direct: SolverAlgorithm::GridRefine,
                accelerating: SolverAlgorithm::GridRefine,
                area_effect: SolverAlgorithm::AngleBisection,
            },
            horizon_secs: PerKind {
                direct: 5.0,
                accelerating: 5.0,
                area_effect: 8.0,
            },
            error_threshold_pct: PerKind {
                direct: 3.0,
                accelerating: 5.0,
                area_effect: 8.0,
            },
            dt: DT,
            skill_delay_secs: 0.0,
        }
    }
}

/// Top-level configuration for the autonomous aiming system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    pub analysis_interval_secs: f64,
    pub settle_delay_secs: f64,
    pub preview_duration_secs: f64,
    pub max_solve_retries: u32,
    pub occlusion: OcclusionConfig,
    pub selection: SelectionConfig,
    pub solver: SolverConfig,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            analysis_interval_secs: ANALYSIS_INTERVAL_SECS,
            settle_delay_secs: SETTLE_DELAY_SECS,
            preview_duration_secs: PREVIEW_DURATION_SECS,
            max_solve_retries: MAX_SOLVE_RETRIES,
            occlusion: OcclusionConfig::default(),
            selection: SelectionConfig::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl AimConfig {
    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: AimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject values that would make the search loops degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.solver.grid;
        let bisection = &self.solver.bisection;
        let positive = [
            ("solver.dt", self.solver.dt),
            ("solver.grid.angle_step_deg", grid.angle_step_deg),
            ("solver.grid.power_step_pct", grid.power_step_pct),
            ("solver.grid.refine_angle_step_deg", grid.refine_angle_step_deg),
            ("solver.grid.refine_power_step_pct", grid.refine_power_step_pct),
            ("solver.bisection.scan_step_deg", bisection.scan_step_deg),
            ("solver.bisection.tier_decay", bisection.tier_decay),
            ("occlusion.sample_spacing", self.occlusion.sample_spacing),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if grid.angle_min_deg > grid.angle_max_deg {
            return Err(ConfigError::Invalid {
                field: "solver.grid.angle_min_deg",
                reason: "exceeds angle_max_deg".into(),
            });
        }
        if grid.power_min_pct > grid.power_max_pct {
            return Err(ConfigError::Invalid {
                field: "solver.grid.power_min_pct",
                reason: "exceeds power_max_pct".into(),
            });
        }
        if !(self.solver.skill_delay_secs >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "solver.skill_delay_secs",
                reason: format!("must not be negative, got {}", self.solver.skill_delay_secs),
            });
        }
        for kind in ProjectileKind::ALL {
            if !(self.solver.horizon_secs.get(kind) > 0.0) {
                return Err(ConfigError::Invalid {
                    field: "solver.horizon_secs",
                    reason: format!("{kind:?} horizon must be positive"),
                });
            }
        }
        Ok(())
    }
}
