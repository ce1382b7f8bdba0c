//! Commands sent to the sandbox simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// All external actions on the sandbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SandboxCommand {
    /// Turn autonomous aiming on or off.
    SetAutoAim { enabled: bool },
    /// Release the slingshot by hand with the given pull vector (px).
    Launch { pull: DVec2 },
    /// Fire the skill of the projectile currently in flight.
    ActivateSkill,
}
