//! Ballistic stepper: the forward model the trajectory search inverts.
//!
//! Mirrors the live simulation's per-step integration exactly (gravity, then
//! drag against velocity, then the speed cap, then position), so a solved shot
//! lands where the game will put it.

use glam::DVec2;
use volley_core::constants::*;
use volley_core::profiles::{PhysicsProfile, ProjectileProfile};

/// Advance one fixed step with the default world physics.
pub fn step(position: DVec2, velocity: DVec2, dt: f64, max_speed: f64) -> (DVec2, DVec2) {
    let physics = PhysicsProfile {
        dt,
        ..PhysicsProfile::default()
    };
    step_with(&physics, position, velocity, max_speed)
}

/// Advance one fixed step under `physics`. Returns `(position, velocity)`.
pub fn step_with(
    physics: &PhysicsProfile,
    position: DVec2,
    velocity: DVec2,
    max_speed: f64,
) -> (DVec2, DVec2) {
    let dt = physics.dt;
    let mut v = velocity;
    v.y += physics.gravity * dt;

    let speed = v.length();
    if speed > physics.drag_min_speed {
        v -= v / speed * physics.drag * dt;
    }

    let speed = v.length();
    if speed > max_speed {
        v *= max_speed / speed;
    }

    (position + v * dt, v)
}

/// A launch to simulate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub origin: DVec2,
    pub velocity: DVec2,
    /// Seconds after launch the skill fires, applied before that step.
    pub skill_at_secs: Option<f64>,
}

/// The point a shot is scored against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimPoint {
    pub position: DVec2,
    /// Closest approach below this distance counts as a hit (px).
    pub hit_radius: f64,
}

/// Kinematic state after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    pub time_secs: f64,
    pub position: DVec2,
    pub velocity: DVec2,
}

/// Step-by-step flight of one projectile, including its scheduled skill.
#[derive(Debug, Clone)]
pub struct Flight {
    physics: PhysicsProfile,
    profile: ProjectileProfile,
    state: FlightState,
    skill_at_secs: Option<f64>,
}

impl Flight {
    pub fn new(physics: PhysicsProfile, profile: ProjectileProfile, shot: &Shot) -> Self {
        Self {
            physics,
            profile,
            state: FlightState {
                time_secs: 0.0,
                position: shot.origin,
                velocity: shot.velocity,
            },
            skill_at_secs: shot.skill_at_secs,
        }
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    /// Apply the skill if it is due, then integrate one step.
    pub fn advance(&mut self) -> FlightState {
        if let Some(at) = self.skill_at_secs {
            if self.state.time_secs + 1e-9 >= at {
                self.state.velocity = self.profile.apply_skill(self.state.velocity);
                self.skill_at_secs = None;
            }
        }
        let (position, velocity) = step_with(
            &self.physics,
            self.state.position,
            self.state.velocity,
            self.profile.max_speed,
        );
        self.state = FlightState {
            time_secs: self.state.time_secs + self.physics.dt,
            position,
            velocity,
        };
        self.state
    }
}

/// Sampled flight scored against an aim point.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryCandidate {
    /// Positions from launch (index 0) until the flight ended.
    pub samples: Vec<DVec2>,
    pub hit: bool,
    pub closest_distance: f64,
    pub closest_time_secs: f64,
    pub closest_index: usize,
}

impl TrajectoryCandidate {
    /// Samples from launch through the closest approach.
    pub fn up_to_closest(&self) -> &[DVec2] {
        let end = (self.closest_index + 1).min(self.samples.len());
        &self.samples[..end]
    }
}

/// Whether a body at `position` has left the playable world.
pub fn out_of_world(position: DVec2) -> bool {
    position.y >= GROUND_TOP
        || position.x < -OUT_OF_BOUNDS_MARGIN
        || position.x > WORLD_WIDTH + OUT_OF_BOUNDS_MARGIN
}

/// Simulate `shot` for at most `horizon_secs`, stopping early on a hit or
/// when the projectile reaches the ground or leaves the world.
pub fn simulate_flight(
    physics: &PhysicsProfile,
    profile: &ProjectileProfile,
    shot: &Shot,
    aim: &AimPoint,
    horizon_secs: f64,
) -> TrajectoryCandidate {
    let max_steps = (horizon_secs / physics.dt).ceil().max(0.0) as usize;
    let mut flight = Flight::new(*physics, *profile, shot);

    let mut samples = Vec::with_capacity(max_steps + 1);
    samples.push(shot.origin);
    let mut closest_distance = shot.origin.distance(aim.position);
    let mut closest_time_secs = 0.0;
    let mut closest_index = 0;
    let mut hit = closest_distance < aim.hit_radius;

    for _ in 0..max_steps {
        if hit {
            break;
        }
        let state = flight.advance();
        samples.push(state.position);

        let distance = state.position.distance(aim.position);
        if distance < closest_distance {
            closest_distance = distance;
            closest_time_secs = state.time_secs;
            closest_index = samples.len() - 1;
        }
        hit = distance < aim.hit_radius;

        if out_of_world(state.position) {
            break;
        }
    }

    TrajectoryCandidate {
        samples,
        hit,
        closest_distance,
        closest_time_secs,
        closest_index,
    }
}
