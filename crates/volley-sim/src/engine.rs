//! Sandbox engine: the headless game loop around the aiming system.
//!
//! `SimulationEngine` owns the hecs world, applies queued commands, lets the
//! autonomous sequencer look at an immutable frame snapshot, executes the
//! launch and skill signals it raises, then runs the physics systems.

use std::collections::VecDeque;

use glam::DVec2;
use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use volley_autoaim::solver::velocity_for_pull;
use volley_autoaim::AutoAim;
use volley_core::commands::SandboxCommand;
use volley_core::config::AimConfig;
use volley_core::constants::{DT, SLINGSHOT_X, SLINGSHOT_Y};
use volley_core::enums::LevelOutcome;
use volley_core::events::SandboxEvent;
use volley_core::profiles::PhysicsProfile;
use volley_core::scene::FrameSnapshot;
use volley_core::state::{SandboxSnapshot, ScoreState};
use volley_core::types::{EntityId, SimTime};

use crate::systems;
use crate::world_setup::{self, Scenario};

/// Configuration for starting a new sandbox.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for random levels. Same seed = same level.
    pub seed: u64,
    /// Tuning for the aiming system.
    pub aim: AimConfig,
    /// Start with autonomous aiming switched on.
    pub auto_aim: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            aim: AimConfig::default(),
            auto_aim: false,
        }
    }
}

/// The sandbox engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    physics: PhysicsProfile,
    launch_point: DVec2,
    outcome: LevelOutcome,
    auto_aim: AutoAim,
    score: ScoreState,
    /// Target of the last aimed launch, until it is destroyed.
    aimed_target: Option<EntityId>,
    next_id: u32,
    command_queue: VecDeque<SandboxCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    sandbox_events: Vec<SandboxEvent>,
}

impl SimulationEngine {
    /// Create an empty sandbox with the given config.
    pub fn new(config: SimConfig) -> Self {
        let physics = PhysicsProfile::default();
        let mut auto_aim = AutoAim::with_physics(config.aim, physics);
        auto_aim.set_enabled(config.auto_aim);
        auto_aim.drain_events();
        Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            physics,
            launch_point: DVec2::new(SLINGSHOT_X, SLINGSHOT_Y),
            outcome: LevelOutcome::default(),
            auto_aim,
            score: ScoreState::default(),
            aimed_target: None,
            next_id: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            sandbox_events: Vec::new(),
        }
    }

    /// Create a sandbox and load `scenario` into it.
    pub fn with_scenario(config: SimConfig, scenario: &Scenario) -> Self {
        let mut engine = Self::new(config);
        engine.load_scenario(scenario);
        engine
    }

    /// Create a sandbox with a random fortress generated from the config seed.
    pub fn with_random_fortress(config: SimConfig) -> Self {
        let mut engine = Self::new(config);
        let scenario = world_setup::random_fortress(&mut engine.rng);
        engine.load_scenario(&scenario);
        engine
    }

    /// Replace the world contents with `scenario`.
    pub fn load_scenario(&mut self, scenario: &Scenario) {
        self.world.clear();
        self.next_id = 0;
        self.launch_point = scenario.launch_point;
        world_setup::spawn_scenario(&mut self.world, scenario, &mut self.next_id);
        self.outcome = LevelOutcome::InProgress;
        self.time = SimTime::default();
        self.score = ScoreState::default();
        self.aimed_target = None;
        info!(
            obstacles = scenario.obstacles.len(),
            targets = scenario.targets.len(),
            projectiles = scenario.projectiles.len(),
            "scenario loaded"
        );
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SandboxCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SandboxCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the sandbox by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SandboxSnapshot {
        self.process_commands();

        if self.outcome == LevelOutcome::InProgress {
            let frame = self.frame();
            self.auto_aim.update(&frame, DT);
            self.execute_auto_aim();
        }

        self.run_systems();
        self.time.advance();
        self.update_outcome();

        let sandbox_events = std::mem::take(&mut self.sandbox_events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.outcome,
            self.launch_point,
            self.auto_aim.view(),
            self.score,
            self.auto_aim.drain_events(),
            sandbox_events,
        )
    }

    /// Immutable view of the current scene.
    pub fn frame(&self) -> FrameSnapshot {
        systems::snapshot::build_frame(&self.world, self.launch_point)
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.outcome
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn auto_aim(&self) -> &AutoAim {
        &self.auto_aim
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SandboxCommand) {
        match command {
            SandboxCommand::SetAutoAim { enabled } => self.auto_aim.set_enabled(enabled),
            SandboxCommand::Launch { pull } => {
                if systems::flight::any_in_flight(&self.world) {
                    debug!("launch ignored: projectile already in flight");
                    return;
                }
                if let Some((_, _, kind)) = systems::flight::next_queued(&self.world) {
                    if self.launch(velocity_for_pull(pull, kind)).is_some() {
                        self.aimed_target = None;
                    }
                }
            }
            SandboxCommand::ActivateSkill => {
                systems::flight::activate_skill(&mut self.world, &mut self.sandbox_events);
            }
        }
    }

    fn launch(&mut self, velocity: DVec2) -> Option<EntityId> {
        let launched = systems::flight::launch(
            &mut self.world,
            self.launch_point,
            velocity,
            &mut self.sandbox_events,
        );
        if let Some(id) = launched {
            debug!(projectile = id.0, vx = velocity.x, vy = velocity.y, "projectile launched");
        }
        launched
    }

    /// Carry out the launch and skill signals raised by the sequencer this tick.
    fn execute_auto_aim(&mut self) {
        if self.auto_aim.should_launch() {
            if let Some(command) = self.auto_aim.pending_launch().copied() {
                if self.launch(command.velocity).is_some() {
                    self.aimed_target = Some(command.target_id);
                    self.score.aimed_launches += 1;
                }
            }
            self.auto_aim.clear_launch();
        }
        if self.auto_aim.should_activate_skill() {
            systems::flight::activate_skill(&mut self.world, &mut self.sandbox_events);
            self.auto_aim.clear_skill();
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Flight integration
        systems::flight::run(&mut self.world, &self.physics);
        // 2. Contacts, damage and detonations
        systems::contact::run(&mut self.world, &mut self.sandbox_events);
        // 3. Settle detection
        systems::settle::run(&mut self.world, self.physics.dt, &mut self.sandbox_events);
        // 4. Scoring, before destroyed entities are removed
        systems::scoring::run(&self.world, &mut self.score);
        systems::scoring::track_aimed_hit(&self.sandbox_events, &mut self.aimed_target, &mut self.score);
        // 5. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    fn update_outcome(&mut self) {
        if self.outcome != LevelOutcome::InProgress {
            return;
        }
        let frame = self.frame();
        self.outcome = if frame.live_target_count() == 0 {
            LevelOutcome::Cleared
        } else if frame.projectiles.iter().all(|p| p.launched && !p.in_play) {
            LevelOutcome::OutOfProjectiles
        } else {
            LevelOutcome::InProgress
        };
        if self.outcome == LevelOutcome::Cleared {
            systems::scoring::award_clear_bonus(&frame, &mut self.score);
        }
        if self.outcome != LevelOutcome::InProgress {
            info!(
                outcome = ?self.outcome,
                tick = self.time.tick,
                points = self.score.points,
                "level finished"
            );
        }
    }
}
