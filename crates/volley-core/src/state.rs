//! Sandbox state snapshot, the complete visible state after each tick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::aim::AimResult;
use crate::enums::*;
use crate::events::{AimEvent, SandboxEvent};
use crate::scene::FrameSnapshot;
use crate::types::{EntityId, SimTime};

/// Complete sandbox state after one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxSnapshot {
    pub time: SimTime,
    pub outcome: LevelOutcome,
    /// Scene as the aiming system saw it this tick.
    pub scene: FrameSnapshot,
    pub flights: Vec<FlightView>,
    pub auto_aim: AutoAimView,
    pub score: ScoreState,
    pub aim_events: Vec<AimEvent>,
    pub sandbox_events: Vec<SandboxEvent>,
}

/// A projectile currently in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightView {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub position: DVec2,
    pub velocity: DVec2,
    pub skill_used: bool,
}

/// Autonomous aiming status for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoAimView {
    pub enabled: bool,
    pub phase: AimPhase,
    pub current_aim: Option<AimResult>,
    /// Trajectory shown while previewing.
    pub preview: Vec<DVec2>,
    pub stats: AimStatsView,
}

/// Solver performance counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AimStatsView {
    /// Solver invocations.
    pub solves: u64,
    /// Invocations that produced a launchable aim.
    pub accepted: u64,
    /// `accepted / solves`: how often a solve produced an aim, not how often
    /// a launch hit. Zero before the first solve.
    pub solve_acceptance_ratio: f64,
    pub average_solve_ms: f64,
    pub peak_solve_ms: f64,
    /// Forward simulations run across all solves.
    pub evaluations: u64,
}

/// Running level score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub points: u64,
    pub targets_destroyed: u32,
    pub obstacles_destroyed: u32,
    /// Part of `points` awarded for projectiles left over on a clear.
    pub unused_projectile_bonus: u64,
    /// Launches made by the aiming system.
    pub aimed_launches: u32,
    /// Aimed launches whose chosen target was destroyed before the next launch.
    pub aimed_hits: u32,
}

impl ScoreState {
    /// `aimed_hits / aimed_launches`, zero before the first aimed launch.
    pub fn hit_ratio(&self) -> f64 {
        if self.aimed_launches == 0 {
            0.0
        } else {
            self.aimed_hits as f64 / self.aimed_launches as f64
        }
    }
}
