//! Process-lifetime posture: the rush and abandonment commitments. Both are
//! written once and monotonic; rush additionally turns itself off when its
//! target is wiped out, and never re-arms within a game.

use armada_core::config::Config;
use armada_core::entity::{PlayerId, Ship};
use armada_core::world::World;

#[derive(Clone, Debug)]
pub struct Strategy {
    player_id: PlayerId,
    initial_player_count: usize,
    rush_decided: bool,
    rush_target: Option<PlayerId>,
    abandoned: bool,
}

impl Strategy {
    pub fn new(player_id: PlayerId, initial_player_count: usize) -> Self {
        Self {
            player_id,
            initial_player_count,
            rush_decided: false,
            rush_target: None,
            abandoned: false,
        }
    }

    pub fn rush_target(&self) -> Option<PlayerId> {
        self.rush_target
    }

    pub fn abandoned(&self) -> bool {
        self.abandoned
    }

    /// Re-evaluate the posture for a new turn. The rush question is asked
    /// exactly once, on the first snapshot seen.
    pub fn update(&mut self, world: &World, config: &Config) {
        if !self.rush_decided {
            self.rush_decided = true;
            self.rush_target = pick_rush_target(world, self.player_id, config);
            if let Some(target) = self.rush_target {
                log::info!("committing to rush against player {target}");
            }
        }

        if self.rush_target.is_none() && !self.abandoned && self.initial_player_count > 2 {
            let total = world.total_ship_count();
            let mine = world.ship_count(self.player_id);
            if total > 0 {
                let share = (mine as f64 / total as f64) * 100.0;
                if share < config.abandon_share_percent {
                    self.abandoned = true;
                    log::info!("ship share {share:.1}% below threshold, committing to abandonment");
                }
            }
        }
    }

    /// The rush target has no ships left. The decided flag stays set, so the
    /// rush can never re-trigger within this game.
    pub fn clear_rush(&mut self) {
        log::info!("rush target eliminated, resuming normal play");
        self.rush_target = None;
    }
}

/// Can any of our ships kill an opponent's nearest ship before that opponent
/// fields a reinforcement? Travel at max speed plus a damage/health ratio
/// against the base production delay plus the enemy's run to a dockable
/// point near its closest planet.
fn pick_rush_target(world: &World, player_id: PlayerId, config: &Config) -> Option<PlayerId> {
    let max_speed = config.max_speed as f64;

    for ship in world.ships_of(player_id) {
        let Some(enemy) = nearest_enemy_ship(world, player_id, ship) else {
            continue;
        };
        let Some(closest_planet) = world
            .planets()
            .iter()
            .min_by(|a, b| {
                enemy
                    .location
                    .distance_to(a.location)
                    .total_cmp(&enemy.location.distance_to(b.location))
            })
        else {
            continue;
        };

        let dockable_reach = config.dock_radius + closest_planet.radius - config.ship_radius;
        let dock_point = enemy
            .location
            .closest_point_to(closest_planet.location, dockable_reach);
        let reinforcement_time = config.production_delay_turns
            + enemy.location.distance_to(dock_point) / max_speed;

        let kill_time = enemy.location.distance_to(ship.location) / max_speed
            + config.rush_attack_damage / config.rush_ship_health;

        if kill_time < reinforcement_time {
            return Some(enemy.owner);
        }
    }
    None
}

fn nearest_enemy_ship<'a>(world: &'a World, player_id: PlayerId, ship: &Ship) -> Option<&'a Ship> {
    world
        .all_ships()
        .filter(|other| other.owner != player_id)
        .min_by(|a, b| {
            ship.location
                .distance_to(a.location)
                .total_cmp(&ship.location.distance_to(b.location))
        })
}
