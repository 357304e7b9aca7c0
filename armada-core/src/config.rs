use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Every tunable the engine depends on. Defaults track the published game
/// rules; any field can be overridden from a JSON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_speed: i32,
    pub ship_radius: f64,
    pub dock_radius: f64,
    pub weapon_radius: f64,
    pub max_corrections: i32,
    pub escape_corrections: i32,
    pub safe_ring_steps: i32,
    pub forecast_fudge: f64,
    pub collision_fudge: f64,
    pub event_time_precision: f64,
    pub production_delay_turns: f64,
    pub rush_ship_health: f64,
    pub rush_attack_damage: f64,
    pub abandon_share_percent: f64,
    pub defense_radius_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            ship_radius: SHIP_RADIUS,
            dock_radius: DOCK_RADIUS,
            weapon_radius: WEAPON_RADIUS,
            max_corrections: MAX_NAVIGATION_CORRECTIONS,
            escape_corrections: ESCAPE_CORRECTIONS,
            safe_ring_steps: SAFE_RING_STEPS,
            forecast_fudge: FORECAST_FUDGE_FACTOR,
            collision_fudge: COLLISION_FUDGE,
            event_time_precision: EVENT_TIME_PRECISION,
            production_delay_turns: PRODUCTION_DELAY_TURNS,
            rush_ship_health: RUSH_SHIP_HEALTH,
            rush_attack_damage: RUSH_ATTACK_DAMAGE,
            abandon_share_percent: ABANDON_SHARE_PERCENT,
            defense_radius_factor: DEFENSE_RADIUS_FACTOR,
        }
    }
}

impl Config {
    /// Separation inside which an undocked enemy can reach and fire on a ship
    /// within one turn: its travel, both hulls, and the weapon range.
    pub fn danger_radius(&self) -> f64 {
        self.max_speed as f64 + 2.0 * self.ship_radius + self.weapon_radius
    }

    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(std::io::Error::other)
    }
}
