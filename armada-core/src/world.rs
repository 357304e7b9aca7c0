//! The per-turn world index: every ship and planet for exactly one turn,
//! with id lookups and the reservation bookkeeping later deciders read.

use std::collections::{BTreeMap, HashMap};

use crate::entity::{EntityId, Planet, PlayerId, Ship};
use crate::geom::Velocity;

#[derive(Clone, Debug, Default)]
pub struct World {
    pub width: f64,
    pub height: f64,
    pub turn: u32,
    // BTreeMap keeps player iteration order stable across turns; decisions
    // are order-dependent through the reservation protocol.
    ships: BTreeMap<PlayerId, Vec<Ship>>,
    ship_index: HashMap<(PlayerId, EntityId), usize>,
    planets: Vec<Planet>,
    planet_index: HashMap<EntityId, usize>,
}

impl World {
    pub fn new(width: f64, height: f64, turn: u32) -> Self {
        Self {
            width,
            height,
            turn,
            ..Self::default()
        }
    }

    pub fn insert_ship(&mut self, ship: Ship) {
        let roster = self.ships.entry(ship.owner).or_default();
        self.ship_index.insert((ship.owner, ship.id), roster.len());
        roster.push(ship);
    }

    pub fn insert_planet(&mut self, planet: Planet) {
        self.planet_index.insert(planet.id, self.planets.len());
        self.planets.push(planet);
    }

    pub fn ship(&self, owner: PlayerId, ship_id: EntityId) -> Option<&Ship> {
        let index = *self.ship_index.get(&(owner, ship_id))?;
        self.ships.get(&owner)?.get(index)
    }

    pub fn ship_mut(&mut self, owner: PlayerId, ship_id: EntityId) -> Option<&mut Ship> {
        let index = *self.ship_index.get(&(owner, ship_id))?;
        self.ships.get_mut(&owner)?.get_mut(index)
    }

    pub fn planet(&self, planet_id: EntityId) -> Option<&Planet> {
        self.planets.get(*self.planet_index.get(&planet_id)?)
    }

    pub fn planet_mut(&mut self, planet_id: EntityId) -> Option<&mut Planet> {
        let index = *self.planet_index.get(&planet_id)?;
        self.planets.get_mut(index)
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.ships.keys().copied()
    }

    pub fn player_count(&self) -> usize {
        self.ships.len()
    }

    pub fn ships_of(&self, owner: PlayerId) -> &[Ship] {
        self.ships.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.values().flat_map(|roster| roster.iter())
    }

    pub fn ship_count(&self, owner: PlayerId) -> usize {
        self.ships.get(&owner).map(Vec::len).unwrap_or(0)
    }

    pub fn total_ship_count(&self) -> usize {
        self.ships.values().map(Vec::len).sum()
    }

    /// Record `ship_id` as committed to move toward a planet this turn, so
    /// later deciders see the slot as taken.
    pub fn record_inbound_planet(&mut self, planet_id: EntityId, ship_id: EntityId) {
        if let Some(planet) = self.planet_mut(planet_id) {
            planet.inbound_ships.push(ship_id);
        }
    }

    /// Record `ship_id` as committed to move toward another ship this turn.
    pub fn record_inbound_ship(&mut self, owner: PlayerId, target_id: EntityId, ship_id: EntityId) {
        if let Some(target) = self.ship_mut(owner, target_id) {
            target.inbound_ships.push(ship_id);
        }
    }

    /// Write a planned thrust vector back onto an owned ship so subsequent
    /// collision checks this turn see it moving.
    pub fn commit_velocity(&mut self, owner: PlayerId, ship_id: EntityId, velocity: Velocity) {
        if let Some(ship) = self.ship_mut(owner, ship_id) {
            ship.velocity = velocity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{DockingStatus, TargetSet};
    use crate::geom::Location;

    fn ship(owner: PlayerId, id: EntityId, x: f64) -> Ship {
        Ship {
            id,
            owner,
            location: Location::new(x, 0.0),
            velocity: Velocity::default(),
            health: 255,
            radius: 0.5,
            docking_status: DockingStatus::Undocked,
            docked_planet: None,
            docking_progress: 0,
            weapon_cooldown: 0,
            inbound_ships: Vec::new(),
            targets: TargetSet::default(),
        }
    }

    #[test]
    fn lookups_resolve_by_owner_and_id() {
        let mut world = World::new(100.0, 100.0, 1);
        world.insert_ship(ship(1, 7, 5.0));
        world.insert_ship(ship(0, 7, 9.0));
        assert_eq!(world.ship(0, 7).unwrap().location.x, 9.0);
        assert_eq!(world.ship(1, 7).unwrap().location.x, 5.0);
        assert!(world.ship(2, 7).is_none());
        assert_eq!(world.total_ship_count(), 2);
    }

    #[test]
    fn player_iteration_order_is_stable() {
        let mut world = World::new(100.0, 100.0, 1);
        world.insert_ship(ship(3, 1, 0.0));
        world.insert_ship(ship(0, 2, 0.0));
        world.insert_ship(ship(1, 3, 0.0));
        let players: Vec<_> = world.players().collect();
        assert_eq!(players, vec![0, 1, 3]);
    }

    #[test]
    fn committed_velocity_is_visible_to_later_readers() {
        let mut world = World::new(100.0, 100.0, 1);
        world.insert_ship(ship(0, 1, 0.0));
        world.commit_velocity(
            0,
            1,
            Velocity {
                vx: 7.0,
                vy: 0.000001,
            },
        );
        assert!(world.ship(0, 1).unwrap().velocity.vx > 6.9);
    }
}
