//! Physics constants and tuning parameters.
//!
//! Everything here mirrors the live rigid-body simulation. The ballistic
//! stepper must use exactly these values or solved shots drift off target.

/// Physics tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per physics tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Pixels per physical meter.
pub const PIXELS_PER_METER: f64 = 30.0;

/// Gravitational acceleration in px/s². Screen y grows downward, so gravity is +y.
pub const GRAVITY: f64 = 9.8 * PIXELS_PER_METER;

/// Air resistance acceleration magnitude in m/s², applied against velocity.
pub const AIR_RESISTANCE_ACCEL: f64 = 0.25;

/// Air resistance in px/s².
pub const DRAG_ACCEL: f64 = AIR_RESISTANCE_ACCEL * PIXELS_PER_METER;

/// Below this speed (px/s) the drag direction is undefined and drag is skipped.
pub const DRAG_MIN_SPEED: f64 = 1e-3;

// --- Projectile speeds ---

/// Direct projectile: launch speed cap (px/s).
pub const DIRECT_INITIAL_MAX_SPEED: f64 = 600.0;

/// Direct projectile: absolute speed cap (px/s).
pub const DIRECT_MAX_SPEED: f64 = 800.0;

/// Accelerating projectile: launch speed cap (px/s).
pub const ACCELERATING_INITIAL_MAX_SPEED: f64 = 500.0;

/// Accelerating projectile: absolute speed cap, reachable only after the skill (px/s).
pub const ACCELERATING_MAX_SPEED: f64 = 1500.0;

/// Speed multiplier applied by the accelerating skill.
pub const ACCELERATING_SKILL_FACTOR: f64 = 2.0;

/// Area-effect projectile: launch speed cap (px/s).
pub const AREA_EFFECT_INITIAL_MAX_SPEED: f64 = 550.0;

/// Area-effect projectile: absolute speed cap (px/s).
pub const AREA_EFFECT_MAX_SPEED: f64 = 800.0;

/// Blast radius of the area-effect projectile (px).
pub const BLAST_RADIUS: f64 = 120.0;

/// Projectile collision radius (px).
pub const PROJECTILE_RADIUS: f64 = 14.0;

// --- Slingshot ---

/// Slingshot anchor x (px).
pub const SLINGSHOT_X: f64 = 200.0;

/// Slingshot anchor y (px).
pub const SLINGSHOT_Y: f64 = 500.0;

/// Maximum pull distance (px).
pub const MAX_PULL_DISTANCE: f64 = 220.0;

/// Launch velocity per pixel of pull.
pub const SLINGSHOT_STIFFNESS: f64 = 10.0;

// --- World ---

/// World width (px).
pub const WORLD_WIDTH: f64 = 1920.0;

/// World height (px).
pub const WORLD_HEIGHT: f64 = 1080.0;

/// Top surface of the ground strip (px).
pub const GROUND_TOP: f64 = WORLD_HEIGHT - 30.0;

/// Bodies further than this outside the world are removed (px).
pub const OUT_OF_BOUNDS_MARGIN: f64 = 200.0;

// --- Settling ---

/// A projectile slower than this is considered resting (px/s).
pub const REST_SPEED: f64 = 20.0;

/// Time a projectile must rest before it is removed from play (s).
pub const REST_DURATION_SECS: f64 = 1.0;

// --- Targets ---

/// Target radius by size class (px).
pub const TARGET_RADIUS_SMALL: f64 = 16.0;
pub const TARGET_RADIUS_MEDIUM: f64 = 20.0;
pub const TARGET_RADIUS_LARGE: f64 = 26.0;

/// Target base health by size class.
pub const TARGET_HP_SMALL_BASE: u32 = 10;
pub const TARGET_HP_MEDIUM_BASE: u32 = 30;
pub const TARGET_HP_LARGE_BASE: u32 = 50;

/// Global multiplier on target base health.
pub const TARGET_HP_FACTOR: f64 = 1.3;

/// Obstacle max health = material strength * this factor.
pub const OBSTACLE_HP_FACTOR: f64 = 0.75;

// --- Scoring ---

/// Points for destroying a target, by size class.
pub const TARGET_POINTS_SMALL: u64 = 1000;
pub const TARGET_POINTS_MEDIUM: u64 = 3000;
pub const TARGET_POINTS_LARGE: u64 = 5000;

/// Points per unit of material strength for a destroyed obstacle.
pub const OBSTACLE_POINTS_PER_STRENGTH: f64 = 5.0;

/// Bonus per projectile still queued when the level is cleared.
pub const UNUSED_PROJECTILE_BONUS: u64 = 1000;

// --- Autonomous aiming ---

/// Analysis cadence (s).
pub const ANALYSIS_INTERVAL_SECS: f64 = 0.1;

/// Grace delay after the previous projectile leaves play (s).
pub const SETTLE_DELAY_SECS: f64 = 1.0;

/// Duration the solved trajectory is previewed before launch (s).
pub const PREVIEW_DURATION_SECS: f64 = 1.0;

/// Solve failures tolerated per cycle before the cycle is abandoned.
pub const MAX_SOLVE_RETRIES: u32 = 3;
