//! Autonomous aim/launch sequencer.
//!
//! Waits for the previous projectile to leave play, analyzes the scene on a
//! fixed cadence, selects and solves a target, previews the solved trajectory,
//! then hands a launch (and the skill trigger) to the game loop. All
//! decisions read one immutable [`FrameSnapshot`] per update.

use std::time::Instant;

use glam::DVec2;
use tracing::{debug, info, warn};
use volley_core::aim::{AimResult, LaunchCommand, TargetDescriptor};
use volley_core::config::AimConfig;
use volley_core::enums::{AbortReason, AimPhase};
use volley_core::events::AimEvent;
use volley_core::profiles::PhysicsProfile;
use volley_core::scene::FrameSnapshot;
use volley_core::state::{AimStatsView, AutoAimView};
use volley_core::types::EntityId;

use crate::analyzer::analyze_scene;
use crate::error::AimError;
use crate::selector::select_target;
use crate::solver::{solve_with, BallisticOracle};
use crate::stats::AimStats;

/// Sequencer state with its per-state timers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimState {
    WaitingForProjectile { settle_secs: f64 },
    Analyzing { retries: u32 },
    Previewing { remaining_secs: f64 },
}

impl Default for AimState {
    fn default() -> Self {
        AimState::WaitingForProjectile { settle_secs: 0.0 }
    }
}

impl AimState {
    pub fn phase(&self) -> AimPhase {
        match self {
            AimState::WaitingForProjectile { .. } => AimPhase::WaitingForProjectile,
            AimState::Analyzing { .. } => AimPhase::Analyzing,
            AimState::Previewing { .. } => AimPhase::Previewing,
        }
    }
}

/// Timer comparisons tolerate accumulated floating point error.
const TIME_EPSILON: f64 = 1e-9;

/// The autonomous aiming controller.
#[derive(Debug, Clone)]
pub struct AutoAim {
    config: AimConfig,
    physics: PhysicsProfile,
    enabled: bool,
    state: AimState,
    /// Seconds since the descriptors were last rebuilt.
    analysis_timer: f64,
    /// Targets that failed to solve this cycle.
    rejected: Vec<EntityId>,
    descriptors: Vec<TargetDescriptor>,
    current_aim: Option<AimResult>,
    /// Projectile the current aim was solved for.
    aimed_projectile: Option<EntityId>,
    pending_launch: Option<LaunchCommand>,
    skill_pending: bool,
    skill_countdown: Option<f64>,
    stats: AimStats,
    events: Vec<AimEvent>,
}

impl Default for AutoAim {
    fn default() -> Self {
        Self::new(AimConfig::default())
    }
}

impl AutoAim {
    pub fn new(config: AimConfig) -> Self {
        Self::with_physics(config, PhysicsProfile::default())
    }

    pub fn with_physics(config: AimConfig, physics: PhysicsProfile) -> Self {
        Self {
            config,
            physics,
            enabled: false,
            state: AimState::default(),
            analysis_timer: 0.0,
            rejected: Vec::new(),
            descriptors: Vec::new(),
            current_aim: None,
            aimed_projectile: None,
            pending_launch: None,
            skill_pending: false,
            skill_countdown: None,
            stats: AimStats::default(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &AimConfig {
        &self.config
    }

    // --- Mode ---

    /// Switching off drops the preview, the aim and any pending launch or skill.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        let interrupted = self.pending_launch.is_some() || self.phase() == AimPhase::Previewing;
        self.enabled = enabled;
        self.reset();
        if interrupted {
            self.events.push(AimEvent::LaunchAborted {
                reason: AbortReason::Disabled,
            });
        }
        self.events.push(AimEvent::Toggled { enabled });
        info!(enabled, "autonomous aiming toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn reset(&mut self) {
        self.state = AimState::default();
        self.analysis_timer = 0.0;
        self.rejected.clear();
        self.descriptors.clear();
        self.current_aim = None;
        self.aimed_projectile = None;
        self.pending_launch = None;
        self.skill_pending = false;
        self.skill_countdown = None;
    }

    // --- Outputs ---

    pub fn should_launch(&self) -> bool {
        self.pending_launch.is_some()
    }

    pub fn pending_launch(&self) -> Option<&LaunchCommand> {
        self.pending_launch.as_ref()
    }

    /// Acknowledge the launch once the game loop has executed it.
    pub fn clear_launch(&mut self) {
        self.pending_launch = None;
    }

    pub fn should_activate_skill(&self) -> bool {
        self.skill_pending
    }

    pub fn clear_skill(&mut self) {
        self.skill_pending = false;
    }

    pub fn current_aim(&self) -> Option<&AimResult> {
        self.current_aim.as_ref()
    }

    /// The solved trajectory while previewing, empty otherwise.
    pub fn trajectory_preview(&self) -> &[DVec2] {
        match (self.state, &self.current_aim) {
            (AimState::Previewing { .. }, Some(aim)) => aim.trajectory.as_slice(),
            _ => &[],
        }
    }

    pub fn stats(&self) -> &AimStats {
        &self.stats
    }

    pub fn phase(&self) -> AimPhase {
        self.state.phase()
    }

    pub fn state(&self) -> AimState {
        self.state
    }

    /// Descriptors from the most recent analysis.
    pub fn last_analysis(&self) -> &[TargetDescriptor] {
        &self.descriptors
    }

    pub fn drain_events(&mut self) -> Vec<AimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn view(&self) -> AutoAimView {
        AutoAimView {
            enabled: self.enabled,
            phase: self.phase(),
            current_aim: self.current_aim.clone(),
            preview: self.trajectory_preview().to_vec(),
            stats: self.stats_view(),
        }
    }

    pub fn stats_view(&self) -> AimStatsView {
        self.stats.view()
    }

    // --- Update ---

    /// Advance the sequencer by `dt` seconds against `scene`.
    pub fn update(&mut self, scene: &FrameSnapshot, dt: f64) {
        if !self.enabled {
            return;
        }
        self.tick_skill_countdown(dt);
        self.refresh_analysis(scene, dt);
        self.state = self.transition(scene, dt);
    }

    /// Rebuild the descriptors every `analysis_interval_secs` outside of
    /// `Analyzing`, which always analyzes the frame it solves against.
    fn refresh_analysis(&mut self, scene: &FrameSnapshot, dt: f64) {
        if matches!(self.state, AimState::Analyzing { .. }) {
            return;
        }
        self.analysis_timer += dt;
        if self.analysis_timer + TIME_EPSILON < self.config.analysis_interval_secs {
            return;
        }
        self.analysis_timer = 0.0;
        self.descriptors = analyze_scene(scene, &self.config.occlusion);
    }

    fn tick_skill_countdown(&mut self, dt: f64) {
        if let Some(remaining) = self.skill_countdown {
            let remaining = remaining - dt;
            if remaining <= TIME_EPSILON {
                self.skill_countdown = None;
                self.raise_skill();
            } else {
                self.skill_countdown = Some(remaining);
            }
        }
    }

    fn raise_skill(&mut self) {
        self.skill_pending = true;
        self.events.push(AimEvent::SkillIssued);
    }

    fn transition(&mut self, scene: &FrameSnapshot, dt: f64) -> AimState {
        match self.state {
            AimState::WaitingForProjectile { settle_secs } => self.wait(scene, settle_secs, dt),
            AimState::Analyzing { retries } => self.analyze_and_solve(scene, retries),
            AimState::Previewing { remaining_secs } => self.preview(scene, remaining_secs, dt),
        }
    }

    fn idle() -> AimState {
        AimState::WaitingForProjectile { settle_secs: 0.0 }
    }

    fn wait(&mut self, scene: &FrameSnapshot, settle_secs: f64, dt: f64) -> AimState {
        if self.pending_launch.is_some() || scene.has_projectile_in_play() || scene.next_unlaunched().is_none() {
            return Self::idle();
        }
        let settle_secs = settle_secs + dt;
        if settle_secs + TIME_EPSILON < self.config.settle_delay_secs {
            return AimState::WaitingForProjectile { settle_secs };
        }
        self.rejected.clear();
        AimState::Analyzing { retries: 0 }
    }

    fn analyze_and_solve(&mut self, scene: &FrameSnapshot, retries: u32) -> AimState {
        if self.pending_launch.is_some() || scene.has_projectile_in_play() {
            return Self::idle();
        }
        let Some(projectile) = scene.next_unlaunched() else {
            return Self::idle();
        };

        self.analysis_timer = 0.0;

        let kind = projectile.kind;
        self.descriptors = analyze_scene(scene, &self.config.occlusion);
        let selected = select_target(
            kind,
            &self.descriptors,
            scene.launch_point,
            &self.config.selection,
            &self.rejected,
        )
        .cloned();
        let Some(target) = selected else {
            debug!(error = %AimError::NoTarget, "idling");
            self.rejected.clear();
            return Self::idle();
        };
        self.events.push(AimEvent::TargetSelected {
            target_id: target.id,
            kind,
            depth: target.protection.depth(),
        });

        let started = Instant::now();
        let physics = PhysicsProfile {
            dt: self.config.solver.dt,
            ..self.physics
        };
        let oracle = BallisticOracle::with_physics(physics, kind);
        let report = solve_with(&oracle, scene.launch_point, &target, kind, &self.config);
        self.stats.record(started.elapsed(), report.evaluations, report.error.is_none());

        match report.into_result() {
            Ok(aim) => {
                self.events.push(AimEvent::AimSolved {
                    target_id: target.id,
                    angle_deg: aim.angle_deg,
                    power_pct: aim.power_pct,
                    error_pct: aim.error_pct,
                });
                self.events.push(AimEvent::PreviewStarted { target_id: target.id });
                self.current_aim = Some(aim);
                self.aimed_projectile = Some(projectile.id);
                AimState::Previewing {
                    remaining_secs: self.config.preview_duration_secs,
                }
            }
            Err(err) => {
                warn!(target_id = target.id.0, retries, error = %err, "solve failed");
                self.rejected.push(target.id);
                self.events.push(AimEvent::SolveFailed {
                    target_id: target.id,
                    retries,
                });
                if retries >= self.config.max_solve_retries {
                    self.events.push(AimEvent::CycleAbandoned);
                    self.rejected.clear();
                    return Self::idle();
                }
                AimState::Analyzing { retries: retries + 1 }
            }
        }
    }

    fn preview(&mut self, scene: &FrameSnapshot, remaining_secs: f64, dt: f64) -> AimState {
        let remaining_secs = remaining_secs - dt;
        if remaining_secs > TIME_EPSILON {
            return AimState::Previewing { remaining_secs };
        }
        let Some(aim) = self.current_aim.take() else {
            return Self::idle();
        };
        let Some(target_id) = aim.target_id else {
            return Self::idle();
        };

        if !scene.target_alive(target_id) {
            debug!(error = %AimError::StaleTarget(target_id), "launch aborted");
            self.events.push(AimEvent::LaunchAborted {
                reason: AbortReason::StaleTarget,
            });
            return AimState::Analyzing { retries: 0 };
        }
        let loaded = scene.next_unlaunched().map(|p| p.id);
        if loaded.is_none() || loaded != self.aimed_projectile {
            self.events.push(AimEvent::LaunchAborted {
                reason: AbortReason::ProjectileGone,
            });
            return Self::idle();
        }

        self.pending_launch = Some(LaunchCommand {
            kind: aim.kind,
            target_id,
            velocity: aim.launch_velocity,
            pull: aim.pull,
            skill_activation_secs: aim.skill_activation_secs,
        });
        self.events.push(AimEvent::LaunchIssued {
            target_id,
            velocity: aim.launch_velocity,
        });
        info!(target_id = target_id.0, kind = ?aim.kind, "launch issued");

        match aim.skill_activation_secs {
            Some(at) if at <= TIME_EPSILON => self.raise_skill(),
            Some(at) => self.skill_countdown = Some(at),
            None => {}
        }
        self.current_aim = Some(aim);
        Self::idle()
    }
}
