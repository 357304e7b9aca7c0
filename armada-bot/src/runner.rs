//! The turn loop: engine handshake, per-turn candidate building, the
//! sequential decision pass, and the move line back to the engine.
//!
//! Generic over the streams so scripted transcripts can drive a whole game
//! in tests.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use armada_core::collision::{planets_between, will_collide};
use armada_core::config::Config;
use armada_core::entity::{DockingStatus, EntityId, PlayerId, TargetSet};
use armada_core::geom::Location;
use armada_core::protocol::{self, Move};
use armada_core::world::World;
use serde::Serialize;

use crate::strategy::Strategy;
use crate::tactics::{self, Claim, Decision, RushOutcome};

/// What one full game came to, reported once the engine closes the stream.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct GameSummary {
    pub player_id: PlayerId,
    pub turns: u32,
    pub commands_sent: u32,
}

pub fn run<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    config: &Config,
    name: &str,
) -> Result<GameSummary> {
    let player_id: PlayerId = read_trimmed_line(input)?
        .parse()
        .context("parsing player id")?;

    let dims = read_trimmed_line(input)?;
    let mut tokens = dims.split_whitespace();
    let width: f64 = tokens
        .next()
        .context("missing map width")?
        .parse()
        .context("parsing map width")?;
    let height: f64 = tokens
        .next()
        .context("missing map height")?
        .parse()
        .context("parsing map height")?;

    let initial_line = read_trimmed_line(input)?;
    let initial = protocol::parse_world(&initial_line, width, height, 0)?;
    log::info!(
        "width: {width}; height: {height}; players: {}; my ships: {}; planets: {}",
        initial.player_count(),
        initial.ship_count(player_id),
        initial.planets().len()
    );

    writeln!(output, "{name}").context("sending bot name")?;
    output.flush().context("flushing bot name")?;

    let mut strategy = Strategy::new(player_id, initial.player_count());
    let mut turn = 0u32;
    let mut commands_sent = 0u32;
    let mut line = String::new();

    loop {
        line.clear();
        let read = input.read_line(&mut line).context("reading snapshot")?;
        if read == 0 {
            log::info!("engine closed the stream after turn {turn}");
            return Ok(GameSummary {
                player_id,
                turns: turn,
                commands_sent,
            });
        }
        if line.trim().is_empty() {
            continue;
        }
        turn += 1;

        let mut world = protocol::parse_world(&line, width, height, turn)?;
        build_target_sets(&mut world, player_id);
        strategy.update(&world, config);

        let moves = resolve_turn(&mut world, player_id, &mut strategy, config);
        audit_committed_paths(&world, player_id, config);

        let issued = moves.iter().filter(|mv| !matches!(mv, Move::Noop)).count() as u32;
        commands_sent += issued;
        log::debug!(
            "turn {turn}: {issued} commands for {} ships",
            world.ship_count(player_id)
        );

        let encoded = protocol::encode_moves(&moves);
        if writeln!(output, "{encoded}")
            .and_then(|_| output.flush())
            .is_err()
        {
            // The engine is gone; end the game rather than panic.
            log::error!("failed to send moves on turn {turn}; shutting down");
            return Ok(GameSummary {
                player_id,
                turns: turn,
                commands_sent,
            });
        }
    }
}

/// Populate every undocked owned ship's candidate queue and buckets, and
/// reserve slots for ships still mid-docking.
pub fn build_target_sets(world: &mut World, player_id: PlayerId) {
    let docking: Vec<(EntityId, EntityId)> = world
        .ships_of(player_id)
        .iter()
        .filter(|ship| ship.docking_status == DockingStatus::Docking)
        .filter_map(|ship| ship.docked_planet.map(|planet| (planet, ship.id)))
        .collect();
    for (planet_id, ship_id) in docking {
        world.record_inbound_planet(planet_id, ship_id);
    }

    let planets: Vec<(EntityId, Location)> = world
        .planets()
        .iter()
        .map(|planet| (planet.id, planet.location))
        .collect();
    let ships: Vec<(PlayerId, EntityId, Location, bool)> = world
        .all_ships()
        .map(|ship| {
            (
                ship.owner,
                ship.id,
                ship.location,
                ship.docking_status == DockingStatus::Docked,
            )
        })
        .collect();
    let own_undocked: Vec<EntityId> = world
        .ships_of(player_id)
        .iter()
        .filter(|ship| ship.is_undocked())
        .map(|ship| ship.id)
        .collect();

    for ship_id in own_undocked {
        let Some(ship) = world.ship(player_id, ship_id) else {
            continue;
        };
        let origin = ship.location;

        let mut set = TargetSet::default();
        for (planet_id, location) in &planets {
            set.push_planet(*planet_id, origin.distance_to(*location));
        }
        for (owner, id, location, docked) in &ships {
            set.push_ship(
                *owner,
                *id,
                origin.distance_to(*location),
                *owner == player_id,
                *docked,
            );
        }

        if let Some(ship) = world.ship_mut(player_id, ship_id) {
            ship.targets = set;
        }
    }
}

/// One decision per owned ship, in roster order. Later ships observe the
/// reservations and committed velocities of earlier ones.
pub fn resolve_turn(
    world: &mut World,
    player_id: PlayerId,
    strategy: &mut Strategy,
    config: &Config,
) -> Vec<Move> {
    let ship_ids: Vec<EntityId> = world
        .ships_of(player_id)
        .iter()
        .map(|ship| ship.id)
        .collect();
    let mut moves = Vec::new();

    for ship_id in ship_ids {
        let Some(ship) = world.ship(player_id, ship_id) else {
            continue;
        };
        let mut acting = ship.clone();
        acting.targets.sort();

        if strategy.abandoned() {
            if let Some(decision) = tactics::handle_abandonment(world, &acting, config) {
                apply(world, player_id, ship_id, decision, &mut moves);
            }
            continue;
        }

        // Docked, or nothing left on the map: skip this turn.
        if acting.targets.is_empty() {
            continue;
        }

        if let Some(target) = strategy.rush_target() {
            match tactics::handle_rush(world, &acting, target, config) {
                RushOutcome::TargetEliminated => {
                    // Flag off for good; this ship resumes normal play now.
                    strategy.clear_rush();
                }
                RushOutcome::Committed(decision) => {
                    apply(world, player_id, ship_id, decision, &mut moves);
                    continue;
                }
                RushOutcome::Stalled => continue,
            }
        }

        while let Some(entity) = acting.targets.queue.pop() {
            if let Some(decision) = tactics::handle_candidate(world, &acting, &entity, config) {
                apply(world, player_id, ship_id, decision, &mut moves);
                break;
            }
        }
    }

    moves
}

fn apply(
    world: &mut World,
    player_id: PlayerId,
    ship_id: EntityId,
    decision: Decision,
    moves: &mut Vec<Move>,
) {
    if let Some(velocity) = decision.velocity {
        world.commit_velocity(player_id, ship_id, velocity);
    }
    match decision.claim {
        Some(Claim::Planet(planet_id)) => world.record_inbound_planet(planet_id, ship_id),
        Some(Claim::Ship {
            owner,
            ship_id: target_id,
        }) => world.record_inbound_ship(owner, target_id, ship_id),
        None => {}
    }
    moves.push(decision.mov);
}

/// Diagnostic only: re-check every committed velocity against the final
/// world state and log anything that still looks like a collision.
fn audit_committed_paths(world: &World, player_id: PlayerId, config: &Config) {
    let probe_target = Location::new(1.0, 1.0);
    for ship in world.ships_of(player_id) {
        if ship.velocity.magnitude() < 1e-3 {
            continue;
        }
        if will_collide(world, ship, ship.velocity, probe_target, config) {
            log::warn!(
                "turn {}: residual predicted collision for ship {}",
                world.turn,
                ship.id
            );
        }
        let end = Location::new(
            ship.location.x + ship.velocity.vx,
            ship.location.y + ship.velocity.vy,
        );
        let clipped = planets_between(world, ship.location, end, config.forecast_fudge);
        if !clipped.is_empty() {
            log::warn!(
                "turn {}: ship {} path clips planets {clipped:?}",
                world.turn,
                ship.id
            );
        }
    }
}

fn read_trimmed_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("reading from engine")?;
    anyhow::ensure!(read > 0, "engine closed the stream during the handshake");
    Ok(line.trim().to_string())
}
