//! Ships, planets and the per-turn candidate bookkeeping attached to them.

use core::cmp::Ordering;
use core::fmt;
use std::collections::BinaryHeap;

use crate::config::Config;
use crate::error::ProtocolError;
use crate::geom::{Location, Velocity};

pub type PlayerId = i32;
pub type EntityId = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DockingStatus {
    Undocked,
    Docking,
    Docked,
    Undocking,
}

impl DockingStatus {
    pub fn from_wire(value: i32) -> Result<Self, ProtocolError> {
        match value {
            0 => Ok(Self::Undocked),
            1 => Ok(Self::Docking),
            2 => Ok(Self::Docked),
            3 => Ok(Self::Undocking),
            _ => Err(ProtocolError::InvalidDockingStatus { value }),
        }
    }
}

impl fmt::Display for DockingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undocked => write!(f, "undocked"),
            Self::Docking => write!(f, "docking"),
            Self::Docked => write!(f, "docked"),
            Self::Undocking => write!(f, "undocking"),
        }
    }
}

/// What a [`NearbyEntity`] points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    Planet,
    Ship { owner: PlayerId },
}

/// A distance-tagged reference to another entity, used both in the category
/// buckets and in the nearest-first priority queue.
#[derive(Clone, Copy, Debug)]
pub struct NearbyEntity {
    pub distance: f64,
    pub kind: TargetKind,
    pub entity_id: EntityId,
}

impl PartialEq for NearbyEntity {
    fn eq(&self, other: &Self) -> bool {
        self.distance.total_cmp(&other.distance) == Ordering::Equal
    }
}

impl Eq for NearbyEntity {}

impl PartialOrd for NearbyEntity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NearbyEntity {
    // Reversed on distance: a max-heap of these pops the nearest entity.
    fn cmp(&self, other: &Self) -> Ordering {
        other.distance.total_cmp(&self.distance)
    }
}

/// Per-turn scratch: the nearest-first queue over every candidate plus
/// category buckets for O(1) nearest-of-kind lookups. Populated once per
/// turn; `sort` is lazy and idempotent.
#[derive(Clone, Debug, Default)]
pub struct TargetSet {
    sorted: bool,
    pub queue: BinaryHeap<NearbyEntity>,
    pub owned_ships: Vec<NearbyEntity>,
    pub owned_docked_ships: Vec<NearbyEntity>,
    pub enemy_ships: Vec<NearbyEntity>,
    pub enemy_docked_ships: Vec<NearbyEntity>,
    pub planets: Vec<NearbyEntity>,
}

impl TargetSet {
    pub fn push_planet(&mut self, planet_id: EntityId, distance: f64) {
        let entry = NearbyEntity {
            distance,
            kind: TargetKind::Planet,
            entity_id: planet_id,
        };
        self.queue.push(entry);
        self.planets.push(entry);
    }

    pub fn push_ship(
        &mut self,
        owner: PlayerId,
        ship_id: EntityId,
        distance: f64,
        owned: bool,
        docked: bool,
    ) {
        let entry = NearbyEntity {
            distance,
            kind: TargetKind::Ship { owner },
            entity_id: ship_id,
        };
        self.queue.push(entry);
        if owned {
            self.owned_ships.push(entry);
            if docked {
                self.owned_docked_ships.push(entry);
            }
        } else {
            self.enemy_ships.push(entry);
            if docked {
                self.enemy_docked_ships.push(entry);
            }
        }
    }

    /// Sort every bucket by ascending distance. A no-op once sorted.
    pub fn sort(&mut self) {
        if self.sorted {
            return;
        }
        let by_distance = |a: &NearbyEntity, b: &NearbyEntity| a.distance.total_cmp(&b.distance);
        self.owned_ships.sort_by(by_distance);
        self.owned_docked_ships.sort_by(by_distance);
        self.enemy_ships.sort_by(by_distance);
        self.enemy_docked_ships.sort_by(by_distance);
        self.planets.sort_by(by_distance);
        self.sorted = true;
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Shared kinematic view the collision predictor works against.
pub trait Kinetic {
    fn location(&self) -> Location;
    fn velocity(&self) -> Velocity;
    fn radius(&self) -> f64;
}

#[derive(Clone, Debug)]
pub struct Ship {
    pub id: EntityId,
    pub owner: PlayerId,
    pub location: Location,
    pub velocity: Velocity,
    pub health: i32,
    pub radius: f64,
    pub docking_status: DockingStatus,
    pub docked_planet: Option<EntityId>,
    pub docking_progress: i32,
    pub weapon_cooldown: i32,
    /// Ships committed to move toward this ship this turn.
    pub inbound_ships: Vec<EntityId>,
    pub targets: TargetSet,
}

impl Ship {
    pub fn is_undocked(&self) -> bool {
        self.docking_status == DockingStatus::Undocked
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn can_dock(&self, planet: &Planet, config: &Config) -> bool {
        self.location.distance_to(planet.location) <= config.dock_radius + planet.radius
    }
}

impl Kinetic for Ship {
    fn location(&self) -> Location {
        self.location
    }

    fn velocity(&self) -> Velocity {
        self.velocity
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

#[derive(Clone, Debug)]
pub struct Planet {
    pub id: EntityId,
    pub location: Location,
    pub health: i32,
    pub radius: f64,
    pub docking_spots: u32,
    pub current_production: i32,
    pub remaining_production: i32,
    pub owner: Option<PlayerId>,
    pub docked_ships: Vec<EntityId>,
    /// Ships committed to move toward this planet this turn.
    pub inbound_ships: Vec<EntityId>,
}

impl Planet {
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }

    pub fn is_full(&self) -> bool {
        self.docked_ships.len() >= self.docking_spots as usize
    }

    /// Docked plus committed-this-turn; the reservation protocol keeps this
    /// at or below `docking_spots`.
    pub fn reserved_slots(&self) -> usize {
        self.docked_ships.len() + self.inbound_ships.len()
    }
}

impl Kinetic for Planet {
    fn location(&self) -> Location {
        self.location
    }

    fn velocity(&self) -> Velocity {
        Velocity::default()
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}
