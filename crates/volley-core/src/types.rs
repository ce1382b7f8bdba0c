//! Fundamental geometric and simulation types.
//!
//! Coordinates are screen pixels: x grows to the right, y grows downward.
//! Launch angles are measured in degrees above the horizontal, toward the
//! side the shot is facing.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Stable handle to a live scene entity (obstacle, target or projectile).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Horizontal facing from `from` toward `to`: +1.0 right, -1.0 left.
/// A target directly above or below faces right.
pub fn facing(from: DVec2, to: DVec2) -> f64 {
    if to.x < from.x {
        -1.0
    } else {
        1.0
    }
}

/// Build a launch velocity from an elevation angle (degrees), a speed and a facing.
pub fn velocity_from_angle(angle_deg: f64, speed: f64, facing: f64) -> DVec2 {
    let rad = angle_deg.to_radians();
    DVec2::new(facing * rad.cos() * speed, -rad.sin() * speed)
}

/// Elevation angle (degrees) of the straight line from `from` to `to`,
/// measured toward the facing side. Positive when `to` is higher on screen.
pub fn line_elevation_deg(from: DVec2, to: DVec2) -> f64 {
    let d = to - from;
    (-d.y).atan2(d.x.abs()).to_degrees()
}

/// Angle in degrees between two direction vectors. Zero if either is degenerate.
pub fn turn_angle_deg(a: DVec2, b: DVec2) -> f64 {
    let la = a.length();
    let lb = b.length();
    if la < 1e-9 || lb < 1e-9 {
        return 0.0;
    }
    (a.dot(b) / (la * lb)).clamp(-1.0, 1.0).acos().to_degrees()
}
