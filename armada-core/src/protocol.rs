//! The game engine's text protocol: whitespace-tokenized snapshot parsing
//! and move-line serialization. Parse and serialize are exact inverses for
//! the move line, which the tests rely on.

use std::str::SplitWhitespace;

use crate::entity::{DockingStatus, EntityId, Planet, PlayerId, Ship, TargetSet};
use crate::error::ProtocolError;
use crate::geom::{Location, Velocity};
use crate::world::World;

pub struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            inner: raw.split_whitespace(),
        }
    }

    fn next_str(&mut self) -> Result<&'a str, ProtocolError> {
        self.inner.next().ok_or(ProtocolError::UnexpectedEnd)
    }

    fn next_i32(&mut self) -> Result<i32, ProtocolError> {
        let token = self.next_str()?;
        token.parse().map_err(|_| ProtocolError::InvalidInteger {
            token: token.to_string(),
        })
    }

    fn next_u32(&mut self) -> Result<u32, ProtocolError> {
        let token = self.next_str()?;
        token.parse().map_err(|_| ProtocolError::InvalidInteger {
            token: token.to_string(),
        })
    }

    fn next_usize(&mut self) -> Result<usize, ProtocolError> {
        let token = self.next_str()?;
        token.parse().map_err(|_| ProtocolError::InvalidInteger {
            token: token.to_string(),
        })
    }

    fn next_f64(&mut self) -> Result<f64, ProtocolError> {
        let token = self.next_str()?;
        token.parse().map_err(|_| ProtocolError::InvalidReal {
            token: token.to_string(),
        })
    }
}

/// One command for one ship. Angle is an integer degree in [0, 360);
/// thrust magnitude is a non-negative integer capped at max speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Thrust {
        ship_id: EntityId,
        magnitude: i32,
        angle: i32,
    },
    Dock {
        ship_id: EntityId,
        planet_id: EntityId,
    },
    Undock {
        ship_id: EntityId,
    },
    Noop,
}

/// Space-joined move line. No-ops serialize to nothing.
pub fn encode_moves(moves: &[Move]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(moves.len());
    for mv in moves {
        match *mv {
            Move::Thrust {
                ship_id,
                magnitude,
                angle,
            } => parts.push(format!("t {ship_id} {magnitude} {angle}")),
            Move::Dock { ship_id, planet_id } => parts.push(format!("d {ship_id} {planet_id}")),
            Move::Undock { ship_id } => parts.push(format!("u {ship_id}")),
            Move::Noop => {}
        }
    }
    parts.join(" ")
}

/// Inverse of [`encode_moves`].
pub fn parse_moves(line: &str) -> Result<Vec<Move>, ProtocolError> {
    let mut tokens = Tokens::new(line);
    let mut moves = Vec::new();
    loop {
        let tag = match tokens.inner.next() {
            Some(tag) => tag,
            None => break,
        };
        let mv = match tag {
            "t" => Move::Thrust {
                ship_id: tokens.next_i32()?,
                magnitude: tokens.next_i32()?,
                angle: tokens.next_i32()?,
            },
            "d" => Move::Dock {
                ship_id: tokens.next_i32()?,
                planet_id: tokens.next_i32()?,
            },
            "u" => Move::Undock {
                ship_id: tokens.next_i32()?,
            },
            other => {
                return Err(ProtocolError::UnknownMoveTag {
                    tag: other.to_string(),
                })
            }
        };
        moves.push(mv);
    }
    Ok(moves)
}

fn parse_ship(tokens: &mut Tokens<'_>, owner: PlayerId) -> Result<Ship, ProtocolError> {
    let id = tokens.next_i32()?;
    let x = tokens.next_f64()?;
    let y = tokens.next_f64()?;
    let health = tokens.next_i32()?;
    // Velocity fields are carried by the protocol but ships always start a
    // turn at rest; keep the floor so direction math stays defined.
    let _vel_x = tokens.next_f64()?;
    let _vel_y = tokens.next_f64()?;
    let docking_status = DockingStatus::from_wire(tokens.next_i32()?)?;
    let docked_planet_raw = tokens.next_i32()?;
    let docking_progress = tokens.next_i32()?;
    let weapon_cooldown = tokens.next_i32()?;

    let docked_planet = match docking_status {
        DockingStatus::Undocked => None,
        _ => Some(docked_planet_raw),
    };

    Ok(Ship {
        id,
        owner,
        location: Location::new(x, y),
        velocity: Velocity::default(),
        health,
        radius: crate::constants::SHIP_RADIUS,
        docking_status,
        docked_planet,
        docking_progress,
        weapon_cooldown,
        inbound_ships: Vec::new(),
        targets: TargetSet::default(),
    })
}

fn parse_planet(tokens: &mut Tokens<'_>) -> Result<Planet, ProtocolError> {
    let id = tokens.next_i32()?;
    let x = tokens.next_f64()?;
    let y = tokens.next_f64()?;
    let health = tokens.next_i32()?;
    let radius = tokens.next_f64()?;
    let docking_spots = tokens.next_u32()?;
    let current_production = tokens.next_i32()?;
    let remaining_production = tokens.next_i32()?;
    let owned_flag = tokens.next_i32()?;
    let owner_raw = tokens.next_i32()?;
    let owner = match owned_flag {
        0 => None,
        1 => Some(owner_raw),
        value => return Err(ProtocolError::InvalidOwnerFlag { value }),
    };

    let docked_count = tokens.next_usize()?;
    let mut docked_ships = Vec::with_capacity(docked_count);
    for _ in 0..docked_count {
        docked_ships.push(tokens.next_i32()?);
    }

    Ok(Planet {
        id,
        location: Location::new(x, y),
        health,
        radius,
        docking_spots,
        current_production,
        remaining_production,
        owner,
        docked_ships,
        inbound_ships: Vec::new(),
    })
}

/// Parse one full turn snapshot into a fresh [`World`].
pub fn parse_world(
    line: &str,
    width: f64,
    height: f64,
    turn: u32,
) -> Result<World, ProtocolError> {
    let mut tokens = Tokens::new(line);
    let mut world = World::new(width, height, turn);

    let player_count = tokens.next_usize()?;
    for _ in 0..player_count {
        let player_id = tokens.next_i32()?;
        let ship_count = tokens.next_usize()?;
        for _ in 0..ship_count {
            let ship = parse_ship(&mut tokens, player_id)?;
            world.insert_ship(ship);
        }
    }

    let planet_count = tokens.next_usize()?;
    for _ in 0..planet_count {
        let planet = parse_planet(&mut tokens)?;
        world.insert_planet(planet);
    }

    Ok(world)
}
