//! Per-ship decision logic: walks a ship's candidate queue nearest-first and
//! produces at most one committed move, plus the danger-aware point searches
//! (safe-location ring scan, corner escape) the combat branches lean on.

use armada_core::collision::out_of_bounds;
use armada_core::config::Config;
use armada_core::constants::OUT_OF_BOUNDS_DANGER;
use armada_core::entity::{EntityId, NearbyEntity, PlayerId, Ship, TargetKind};
use armada_core::geom::{clip_angle, Location, Velocity};
use armada_core::protocol::Move;
use armada_core::world::World;

use crate::navigator::{self, Navigation, ANGULAR_STEP_RAD};

/// Reservation a committed decision places on its chosen target entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Claim {
    Planet(EntityId),
    Ship {
        owner: PlayerId,
        ship_id: EntityId,
    },
}

/// One resolved move: the command, the velocity it commits (thrusts only),
/// and the reservation to record.
#[derive(Clone, Copy, Debug)]
pub struct Decision {
    pub mov: Move,
    pub velocity: Option<Velocity>,
    pub claim: Option<Claim>,
}

impl Decision {
    fn plain(mov: Move) -> Self {
        Self {
            mov,
            velocity: None,
            claim: None,
        }
    }

    fn thrust(nav: Navigation, claim: Option<Claim>) -> Self {
        Self {
            mov: nav.mov,
            velocity: Some(nav.velocity),
            claim,
        }
    }
}

pub enum RushOutcome {
    /// The rush target has no ships left; the caller clears the flag.
    TargetEliminated,
    Committed(Decision),
    /// No reachable rush move this turn; the ship holds position.
    Stalled,
}

/// Undocked enemy ships within the danger radius of `point`. Out-of-bounds
/// points take the sentinel penalty instead of a count.
pub fn danger_at(world: &World, ship: &Ship, point: Location, config: &Config) -> i32 {
    if out_of_bounds(world, point) {
        return OUT_OF_BOUNDS_DANGER;
    }

    let danger_radius = config.danger_radius();
    let mut danger = 0;
    for other in world.all_ships() {
        if other.owner == ship.owner || !other.is_undocked() {
            continue;
        }
        if point.distance_to(other.location) <= danger_radius {
            danger += 1;
        }
    }
    danger
}

/// Exhaustive one-degree ring scan at one turn's travel distance, starting
/// one step past `start_deg`. Lowest danger wins; ties keep the first find.
fn lowest_danger_on_ring(
    world: &World,
    ship: &Ship,
    start_deg: i32,
    steps: i32,
    config: &Config,
) -> Location {
    let ring = config.max_speed as f64;
    let mut working = start_deg;
    let mut best = Location::new(0.0, 0.0);
    let mut lowest = i32::MAX;

    for _ in 0..steps {
        working = clip_angle(working as i64 + 1);
        let candidate = ship.location.offset(ring, (working as f64).to_radians());
        let danger = danger_at(world, ship, candidate, config);
        if danger < lowest {
            lowest = danger;
            best = candidate;
        }
    }
    best
}

/// The least dangerous reachable point, biased toward `toward`.
pub fn safe_location(world: &World, ship: &Ship, toward: Location, config: &Config) -> Location {
    let start = ship.location.angle_to_deg(toward);
    lowest_danger_on_ring(world, ship, start, config.safe_ring_steps, config)
}

/// Heading toward the nearest map corner, the anchor of the escape scan.
pub fn closest_corner_heading(world: &World, ship: &Ship) -> i32 {
    let corner = Location::new(
        if ship.location.x >= world.width / 2.0 {
            world.width
        } else {
            0.0
        },
        if ship.location.y >= world.height / 2.0 {
            world.height
        } else {
            0.0
        },
    );
    ship.location.angle_to_deg(corner)
}

/// Retreat-and-survive: docked ships cast off, transitioning ships wait,
/// undocked ships run for the least defended edge.
pub fn handle_abandonment(world: &World, ship: &Ship, config: &Config) -> Option<Decision> {
    use armada_core::entity::DockingStatus::*;

    match ship.docking_status {
        Docked => Some(Decision::plain(Move::Undock { ship_id: ship.id })),
        Docking | Undocking => Some(Decision::plain(Move::Noop)),
        Undocked => {
            let heading = closest_corner_heading(world, ship);
            let refuge =
                lowest_danger_on_ring(world, ship, heading, config.escape_corrections, config);
            navigator::navigate(
                world,
                ship,
                refuge,
                config.max_speed,
                config.escape_corrections,
                ANGULAR_STEP_RAD,
                config,
            )
            .map(|nav| Decision::thrust(nav, None))
        }
    }
}

/// All-in pressure on one player: kill anything docked outright, and against
/// undocked ships hold the danger-radius standoff (back straight out when
/// inside it, close to its edge when outside).
pub fn handle_rush(
    world: &World,
    ship: &Ship,
    rush_target: PlayerId,
    config: &Config,
) -> RushOutcome {
    if world.ship_count(rush_target) == 0 {
        return RushOutcome::TargetEliminated;
    }

    let danger_radius = config.danger_radius();
    for entity in &ship.targets.enemy_ships {
        let TargetKind::Ship { owner } = entity.kind else {
            continue;
        };
        if owner != rush_target {
            continue;
        }
        let Some(enemy) = world.ship(owner, entity.entity_id) else {
            continue;
        };

        if !enemy.is_undocked() {
            // Undefended: walk up to point-blank weapon range.
            let standoff = config.weapon_radius - ship.radius - enemy.radius;
            let aim = ship.location.closest_point_to(enemy.location, standoff);
            if let Some(nav) = navigate_combat(world, ship, aim, config) {
                return RushOutcome::Committed(Decision::thrust(
                    nav,
                    Some(Claim::Ship {
                        owner,
                        ship_id: enemy.id,
                    }),
                ));
            }
            continue;
        }

        let distance = ship.location.distance_to(enemy.location);
        if distance < danger_radius {
            // It can reach us this turn: back out along the reversed bearing.
            let away = ship.location.angle_to_rad(enemy.location) + core::f64::consts::PI;
            let retreat = ship.location.offset(danger_radius - distance, away);
            if let Some(nav) = navigate_combat(world, ship, retreat, config) {
                return RushOutcome::Committed(Decision::thrust(
                    nav,
                    Some(Claim::Ship {
                        owner,
                        ship_id: enemy.id,
                    }),
                ));
            }
        } else if distance > danger_radius {
            let aim = ship.location.closest_point_to(enemy.location, danger_radius);
            if let Some(nav) = navigate_combat(world, ship, aim, config) {
                return RushOutcome::Committed(Decision::thrust(
                    nav,
                    Some(Claim::Ship {
                        owner,
                        ship_id: enemy.id,
                    }),
                ));
            }
        }
    }

    RushOutcome::Stalled
}

fn navigate_combat(
    world: &World,
    ship: &Ship,
    target: Location,
    config: &Config,
) -> Option<Navigation> {
    navigator::navigate(
        world,
        ship,
        target,
        config.max_speed,
        config.max_corrections,
        ANGULAR_STEP_RAD,
        config,
    )
}

/// Normal play for one popped candidate. `None` rejects the candidate and
/// the caller continues with the next-nearest one.
pub fn handle_candidate(
    world: &World,
    ship: &Ship,
    entity: &NearbyEntity,
    config: &Config,
) -> Option<Decision> {
    match entity.kind {
        TargetKind::Planet => planet_candidate(world, ship, entity.entity_id, config),
        TargetKind::Ship { owner } => ship_candidate(world, ship, owner, entity, config),
    }
}

fn planet_candidate(
    world: &World,
    ship: &Ship,
    planet_id: EntityId,
    config: &Config,
) -> Option<Decision> {
    let planet = world.planet(planet_id)?;

    // A planet held by someone else is taken by killing its docked ships,
    // not by flying at it.
    if planet.owner.is_some() && !planet.is_owned_by(ship.owner) {
        return None;
    }

    // Committing to a docking approach with a combatant in reach is how
    // ships die mid-transition.
    if let Some(closest_enemy) = ship.targets.enemy_ships.first() {
        if closest_enemy.distance <= config.danger_radius() {
            return None;
        }
    }

    if planet.reserved_slots() >= planet.docking_spots as usize {
        return None;
    }

    if ship.can_dock(planet, config) {
        return Some(Decision {
            mov: Move::Dock {
                ship_id: ship.id,
                planet_id: planet.id,
            },
            velocity: None,
            claim: Some(Claim::Planet(planet.id)),
        });
    }

    navigator::navigate_to_dock(world, ship, planet, config.max_speed, config)
        .map(|nav| Decision::thrust(nav, Some(Claim::Planet(planet.id))))
}

fn ship_candidate(
    world: &World,
    ship: &Ship,
    owner: PlayerId,
    entity: &NearbyEntity,
    config: &Config,
) -> Option<Decision> {
    if owner == ship.owner {
        return None;
    }
    let target = world.ship(owner, entity.entity_id)?;
    let danger_radius = config.danger_radius();

    if !target.is_undocked() {
        // Free kill, unless an earlier ship already took it.
        if !target.inbound_ships.is_empty() {
            return None;
        }
        return attack_docked(world, ship, target, config);
    }

    if entity.distance < danger_radius {
        // A docked enemy inside the danger radius is a threat-free kill;
        // clear it before trading with a combatant.
        if let Some(docked) = ship.targets.enemy_docked_ships.first() {
            if docked.distance < danger_radius {
                if let TargetKind::Ship {
                    owner: docked_owner,
                } = docked.kind
                {
                    if let Some(docked_ship) = world.ship(docked_owner, docked.entity_id) {
                        if docked_ship.inbound_ships.is_empty() {
                            log::debug!(
                                "ship {} diverting to docked enemy {}",
                                ship.id,
                                docked_ship.id
                            );
                            if let Some(decision) = attack_docked(world, ship, docked_ship, config)
                            {
                                return Some(decision);
                            }
                        }
                    }
                }
            }
        }

        // One of ours is docked nearby: interpose between it and the enemy.
        if let Some(own_docked) = ship.targets.owned_docked_ships.first() {
            if own_docked.distance < danger_radius * config.defense_radius_factor {
                if let Some(protected) = world.ship(ship.owner, own_docked.entity_id) {
                    if protected.inbound_ships.is_empty() {
                        let toward_enemy = ship.location.angle_to_rad(target.location);
                        let post = protected
                            .location
                            .offset(config.weapon_radius - 1.0, toward_enemy);
                        log::debug!("ship {} screening docked ship {}", ship.id, protected.id);
                        if let Some(nav) = navigate_combat(world, ship, post, config) {
                            return Some(Decision::thrust(
                                nav,
                                Some(Claim::Ship {
                                    owner: ship.owner,
                                    ship_id: protected.id,
                                }),
                            ));
                        }
                    }
                }
            }
        }
    }

    // Engage head-on: stop just inside weapon range.
    let standoff = config.weapon_radius - ship.radius - target.radius;
    let aim = ship.location.closest_point_to(target.location, standoff);
    navigate_combat(world, ship, aim, config).map(|nav| {
        Decision::thrust(
            nav,
            Some(Claim::Ship {
                owner,
                ship_id: target.id,
            }),
        )
    })
}

fn attack_docked(
    world: &World,
    ship: &Ship,
    target: &Ship,
    config: &Config,
) -> Option<Decision> {
    let approach = ship.radius + target.radius;
    let raw = ship.location.closest_point_to(target.location, approach);
    let aim = safe_location(world, ship, raw, config);
    navigate_combat(world, ship, aim, config).map(|nav| {
        Decision::thrust(
            nav,
            Some(Claim::Ship {
                owner: target.owner,
                ship_id: target.id,
            }),
        )
    })
}
