//! Game-rule constants and the engine's tuning defaults. Runtime values come
//! from [`crate::config::Config`]; these are its `Default` sources.

/// Maximum thrust magnitude (and therefore distance) a ship can move per turn.
pub const MAX_SPEED: i32 = 7;

/// Collision radius of a ship.
pub const SHIP_RADIUS: f64 = 0.5;

/// Distance from a planet's surface within which a ship may issue a dock.
pub const DOCK_RADIUS: f64 = 4.0;

/// Range of a ship's weapon.
pub const WEAPON_RADIUS: f64 = 5.0;

/// Attempts the angular-search navigator makes before giving up for the turn.
pub const MAX_NAVIGATION_CORRECTIONS: i32 = 90;

/// Ring steps scanned when fleeing to the map edge under abandonment.
pub const ESCAPE_CORRECTIONS: i32 = 360;

/// Steps of the one-degree safe-location ring scan.
pub const SAFE_RING_STEPS: i32 = 360;

/// Safety margin added around static obstacles on a planned straight path.
pub const FORECAST_FUDGE_FACTOR: f64 = SHIP_RADIUS + 0.1;

/// Margin added to combined radii in the moving-circle collision test.
pub const COLLISION_FUDGE: f64 = 0.01;

/// Collision times are rounded to 1/EVENT_TIME_PRECISION before the
/// within-turn window check.
pub const EVENT_TIME_PRECISION: f64 = 10_000.0;

/// Turns for an opponent to field a reinforcement once docked.
pub const PRODUCTION_DELAY_TURNS: f64 = 9.0;

/// Ship health baseline used by the rush feasibility estimate.
pub const RUSH_SHIP_HEALTH: f64 = 255.0;

/// Attack damage baseline used by the rush feasibility estimate.
pub const RUSH_ATTACK_DAMAGE: f64 = 192.0;

/// Owned-ship share (percent) below which the bot commits to abandonment.
pub const ABANDON_SHARE_PERCENT: f64 = 15.5;

/// Own docked ships within this multiple of the danger radius get defended.
pub const DEFENSE_RADIUS_FACTOR: f64 = 1.5;

/// Danger score assigned to candidate points outside the map.
pub const OUT_OF_BOUNDS_DANGER: i32 = 9999;

/// Velocities keep this per-axis floor so direction math never degenerates.
pub const VELOCITY_FLOOR: f64 = 1e-6;
