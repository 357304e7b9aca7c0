//! Angular-search navigation: thrust straight at the target, and when the
//! straight line is predicted to hit something, rotate the aim one degree
//! and try again under a correction budget. This is a local search: dense
//! clutter it cannot sweep around within the budget is reported as no safe
//! path.

use armada_core::collision::will_collide;
use armada_core::config::Config;
use armada_core::entity::{Planet, Ship};
use armada_core::geom::{self, Location, Velocity};
use armada_core::protocol::Move;
use armada_core::world::World;

/// One degree, the fixed step of the correction sweep.
pub const ANGULAR_STEP_RAD: f64 = core::f64::consts::PI / 180.0;

/// A thrust command together with the velocity it would put on the ship.
/// Callers commit the velocity back into the world so later ships' collision
/// checks see this one moving.
#[derive(Clone, Copy, Debug)]
pub struct Navigation {
    pub mov: Move,
    pub velocity: Velocity,
}

/// Collision-free thrust toward `target`, or `None` once the correction
/// budget is spent. `None` means skip this turn and retry next snapshot,
/// never an error.
pub fn navigate(
    world: &World,
    ship: &Ship,
    target: Location,
    max_thrust: i32,
    max_corrections: i32,
    angular_step_rad: f64,
    config: &Config,
) -> Option<Navigation> {
    if max_corrections <= 0 {
        return None;
    }

    let distance = ship.location.distance_to(target);
    let angle_rad = ship.location.angle_to_rad(target);

    // Truncate, never round up: overshooting the target invites collisions.
    let thrust = if distance < max_thrust as f64 {
        distance as i32
    } else {
        max_thrust
    };

    let angle_deg = geom::rad_to_deg_clipped(angle_rad);
    let command_rad = (angle_deg as f64).to_radians();
    let velocity = Velocity::from_thrust(thrust as f64, command_rad, config.max_speed as f64);

    if will_collide(world, ship, velocity, target, config) {
        let rotated = command_rad + angular_step_rad;
        let new_target = ship.location.offset(distance, rotated);
        return navigate(
            world,
            ship,
            new_target,
            max_thrust,
            max_corrections - 1,
            angular_step_rad,
            config,
        );
    }

    Some(Navigation {
        mov: Move::Thrust {
            ship_id: ship.id,
            magnitude: thrust,
            angle: angle_deg,
        },
        velocity,
    })
}

/// Approach a planet for docking: aim at the nearest point on its surface
/// and let the thrust cap stop the ship short.
pub fn navigate_to_dock(
    world: &World,
    ship: &Ship,
    planet: &Planet,
    max_thrust: i32,
    config: &Config,
) -> Option<Navigation> {
    let target = ship.location.closest_point_to(planet.location, planet.radius);
    navigate(
        world,
        ship,
        target,
        max_thrust,
        config.max_corrections,
        ANGULAR_STEP_RAD,
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use armada_core::entity::{DockingStatus, Planet, TargetSet};

    fn test_ship(owner: i32, id: i32, x: f64, y: f64) -> Ship {
        Ship {
            id,
            owner,
            location: Location::new(x, y),
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

    fn test_planet(id: i32, x: f64, y: f64, radius: f64) -> Planet {
        Planet {
            id,
            location: Location::new(x, y),
            health: 2000,
            radius,
            docking_spots: 3,
            current_production: 0,
            remaining_production: 500,
            owner: None,
            docked_ships: Vec::new(),
            inbound_ships: Vec::new(),
        }
    }

    #[test]
    fn open_field_goes_straight_at_full_thrust() {
        let config = Config::default();
        let mut world = World::new(100.0, 100.0, 1);
        let ship = test_ship(0, 1, 0.0, 0.0);
        world.insert_ship(ship.clone());

        let nav = navigate(
            &world,
            &ship,
            Location::new(20.0, 0.0),
            config.max_speed,
            config.max_corrections,
            ANGULAR_STEP_RAD,
            &config,
        )
        .unwrap();
        assert_eq!(
            nav.mov,
            Move::Thrust {
                ship_id: 1,
                magnitude: 7,
                angle: 0
            }
        );
    }

    #[test]
    fn short_hops_truncate_thrust_toward_zero() {
        let config = Config::default();
        let mut world = World::new(100.0, 100.0, 1);
        let ship = test_ship(0, 1, 0.0, 0.0);
        world.insert_ship(ship.clone());

        let nav = navigate(
            &world,
            &ship,
            Location::new(3.9, 0.0),
            config.max_speed,
            config.max_corrections,
            ANGULAR_STEP_RAD,
            &config,
        )
        .unwrap();
        assert_eq!(
            nav.mov,
            Move::Thrust {
                ship_id: 1,
                magnitude: 3,
                angle: 0
            }
        );
    }

    #[test]
    fn committed_moves_never_collide() {
        let config = Config::default();
        let mut world = World::new(100.0, 100.0, 1);
        let ship = test_ship(0, 1, 20.0, 50.0);
        world.insert_ship(ship.clone());
        world.insert_planet(test_planet(0, 30.0, 50.0, 4.0));

        let nav = navigate(
            &world,
            &ship,
            Location::new(45.0, 50.0),
            config.max_speed,
            config.max_corrections,
            ANGULAR_STEP_RAD,
            &config,
        )
        .unwrap();
        // The straight line is blocked, so the committed bearing must differ
        // from zero and the returned velocity must check out clean.
        match nav.mov {
            Move::Thrust { angle, .. } => assert_ne!(angle, 0),
            other => panic!("expected thrust, got {other:?}"),
        }
        assert!(!will_collide(
            &world,
            &ship,
            nav.velocity,
            Location::new(45.0, 50.0),
            &config,
        ));
    }

    #[test]
    fn exhausted_corrections_report_no_safe_path() {
        let config = Config::default();
        let mut world = World::new(200.0, 200.0, 1);
        let ship = test_ship(0, 1, 100.0, 100.0);
        world.insert_ship(ship.clone());
        // Ring of planets around the ship, tight enough that every bearing
        // out is blocked within one turn of travel.
        for i in 0..36 {
            let angle = (i as f64) * 10.0_f64.to_radians();
            let center = ship.location.offset(6.0, angle);
            world.insert_planet(test_planet(i, center.x, center.y, 2.5));
        }

        let nav = navigate(
            &world,
            &ship,
            Location::new(150.0, 100.0),
            config.max_speed,
            config.max_corrections,
            ANGULAR_STEP_RAD,
            &config,
        );
        assert!(nav.is_none());
    }

    #[test]
    fn dock_approach_aims_at_the_near_surface() {
        let config = Config::default();
        let mut world = World::new(100.0, 100.0, 1);
        let ship = test_ship(0, 1, 10.0, 50.0);
        world.insert_ship(ship.clone());
        let planet = test_planet(0, 25.0, 50.0, 3.0);
        world.insert_planet(planet.clone());

        // Surface point is 12 units out; the first full-speed hop toward it
        // ends well clear of the planet disc, so no correction is needed.
        let nav = navigate_to_dock(&world, &ship, &planet, config.max_speed, &config).unwrap();
        assert_eq!(
            nav.mov,
            Move::Thrust {
                ship_id: 1,
                magnitude: 7,
                angle: 0
            }
        );
    }
}
