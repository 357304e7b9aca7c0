//! Continuous-time collision prediction between moving circles, plus the
//! static segment-versus-circle test used for path diagnostics.
//!
//! Both entities are modeled as moving at constant velocity over one turn;
//! contact happens when the center distance equals the combined radius,
//! which reduces to a quadratic in time.

use crate::config::Config;
use crate::entity::{EntityId, Kinetic, Ship};
use crate::geom::{Location, Velocity};
use crate::world::World;

/// A hypothetical mover: a ship position tried with a velocity it has not
/// committed yet.
#[derive(Clone, Copy, Debug)]
pub struct Probe {
    pub location: Location,
    pub velocity: Velocity,
    pub radius: f64,
}

impl Kinetic for Probe {
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

/// Round an event time to the configured precision before any window check,
/// so a root a hair past the turn boundary is not misclassified.
pub fn round_event_time(t: f64, precision: f64) -> f64 {
    (t * precision).round() / precision
}

/// When (as a multiple of one turn) two constant-velocity circles first
/// close to `combined_radius`. Returns `(false, _)` when they never do.
pub fn collision_time<A, B>(combined_radius: f64, a: &A, b: &B) -> (bool, f64)
where
    A: Kinetic + ?Sized,
    B: Kinetic + ?Sized,
{
    let dx = a.location().x - b.location().x;
    let dy = a.location().y - b.location().y;
    let dvx = a.velocity().vx - b.velocity().vx;
    let dvy = a.velocity().vy - b.velocity().vy;

    // |p + v t| = r  =>  (v.v) t^2 + 2 (p.v) t + (p.p - r^2) = 0
    let qa = dvx * dvx + dvy * dvy;
    let qb = 2.0 * (dx * dvx + dy * dvy);
    let qc = dx * dx + dy * dy - combined_radius * combined_radius;

    if qa == 0.0 {
        if qb == 0.0 {
            // No relative motion at all: colliding now or never.
            return (qc <= 0.0, 0.0);
        }
        let t = -qc / qb;
        return if t >= 0.0 { (true, t) } else { (false, 0.0) };
    }

    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return (false, 0.0);
    }
    if disc == 0.0 {
        return (true, -qb / (2.0 * qa));
    }

    let root = disc.sqrt();
    let t1 = -qb + root;
    let t2 = -qb - root;
    if t1 >= 0.0 && t2 >= 0.0 {
        // First entry into the radius.
        (true, t1.min(t2) / (2.0 * qa))
    } else if t1 <= 0.0 && t2 <= 0.0 {
        // Closest approach already behind us; report the later crossing.
        (true, t1.max(t2) / (2.0 * qa))
    } else {
        // Roots straddle zero: already overlapping.
        (true, 0.0)
    }
}

/// Coarse prefilter: can these two even reach each other this turn, at full
/// speed in opposite directions plus both hulls?
pub fn might_collide<A, B>(distance: f64, a: &A, b: &B, config: &Config) -> bool
where
    A: Kinetic + ?Sized,
    B: Kinetic + ?Sized,
{
    let max_closing = 2.0 * (config.max_speed as f64) * core::f64::consts::SQRT_2;
    distance <= max_closing + a.radius() + b.radius() + config.collision_fudge
}

/// Whether the segment `start..end` passes within `fudge` of a static circle.
pub fn segment_circle_intersect<C: Kinetic + ?Sized>(
    start: Location,
    end: Location,
    circle: &C,
    fudge: f64,
) -> bool {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    let center = circle.location();
    if length_sq == 0.0 {
        // Degenerate segment: plain distance check.
        return start.distance_to(center) <= circle.radius() + fudge;
    }

    // Vertex of the quadratic distance function, clamped into the segment.
    let t = (((center.x - start.x) * dx + (center.y - start.y) * dy) / length_sq).min(1.0);
    if t < 0.0 {
        return false;
    }

    let closest = Location::new(start.x + dx * t, start.y + dy * t);
    closest.distance_to(center) <= circle.radius() + fudge
}

/// Planets whose discs a straight path would clip, used by the post-decision
/// path audit. Planets sitting exactly on an endpoint are not obstacles.
pub fn planets_between(world: &World, start: Location, end: Location, fudge: f64) -> Vec<EntityId> {
    world
        .planets()
        .iter()
        .filter(|planet| planet.location != start && planet.location != end)
        .filter(|planet| segment_circle_intersect(start, end, *planet, fudge))
        .map(|planet| planet.id)
        .collect()
}

pub fn out_of_bounds(world: &World, location: Location) -> bool {
    !(location.x >= 0.0
        && location.y >= 0.0
        && location.x < world.width
        && location.y < world.height)
}

/// Would `ship`, moving with `velocity` toward `target`, hit anything within
/// this turn? Checks map bounds, every planet and every other ship, each
/// behind a coarse separation prefilter.
pub fn will_collide(
    world: &World,
    ship: &Ship,
    velocity: Velocity,
    target: Location,
    config: &Config,
) -> bool {
    if out_of_bounds(world, target) {
        return true;
    }

    let probe = Probe {
        location: ship.location,
        velocity,
        radius: ship.radius,
    };

    for planet in world.planets() {
        let distance = ship.location.distance_to(planet.location);
        if distance <= velocity.magnitude() + ship.radius + planet.radius {
            let combined = ship.radius + planet.radius + config.collision_fudge;
            let (hit, t) = collision_time(combined, &probe, planet);
            if hit {
                let t = round_event_time(t, config.event_time_precision);
                if (0.0..=1.0).contains(&t) {
                    return true;
                }
            }
        }
    }

    for other in world.all_ships() {
        if other.id == ship.id && other.owner == ship.owner {
            continue;
        }
        let distance = ship.location.distance_to(other.location);
        if might_collide(distance, &probe, other, config) {
            let combined = 2.0 * config.ship_radius + config.collision_fudge;
            let (hit, t) = collision_time(combined, &probe, other);
            if hit {
                let t = round_event_time(t, config.event_time_precision);
                if (0.0..=1.0).contains(&t) {
                    return true;
                }
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{DockingStatus, Planet, TargetSet};

    fn probe(x: f64, y: f64, vx: f64, vy: f64, radius: f64) -> Probe {
        Probe {
            location: Location::new(x, y),
            velocity: Velocity { vx, vy },
            radius,
        }
    }

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
    fn static_overlap_collides_immediately() {
        let a = probe(0.0, 0.0, 0.0, 0.0, 0.5);
        let b = probe(0.8, 0.0, 0.0, 0.0, 0.5);
        let (hit, t) = collision_time(1.0, &a, &b);
        assert!(hit);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn static_separated_never_collides() {
        let a = probe(0.0, 0.0, 0.0, 0.0, 0.5);
        let b = probe(5.0, 0.0, 0.0, 0.0, 0.5);
        let (hit, _) = collision_time(1.0, &a, &b);
        assert!(!hit);
    }

    #[test]
    fn head_on_closing_pair_meets_inside_the_turn() {
        // Centers 10 apart, closing at 14: contact when the 10 - 1.02 gap
        // has closed, i.e. at t = 8.98 / 14.
        let a = probe(0.0, 0.0, 7.0, 0.0, 0.51);
        let b = probe(10.0, 0.0, -7.0, 0.0, 0.51);
        let (hit, t) = collision_time(1.02, &a, &b);
        assert!(hit);
        let expected = (10.0 - 1.02) / 14.0;
        assert!((t - expected).abs() < 1e-9, "t = {t}");
        assert!((0.0..=1.0).contains(&t));
    }

    #[test]
    fn receding_pair_does_not_collide_forward_in_time() {
        let a = probe(0.0, 0.0, -7.0, 0.0, 0.5);
        let b = probe(10.0, 0.0, 7.0, 0.0, 0.5);
        let (hit, t) = collision_time(1.0, &a, &b);
        // Both crossings are in the past; the conservative report stays
        // negative and falls outside the turn window.
        assert!(hit);
        assert!(t < 0.0);
    }

    #[test]
    fn rounding_keeps_boundary_roots_outside_the_turn() {
        let rounded = round_event_time(1.00005, 10_000.0);
        assert!((rounded - 1.0001).abs() < 1e-12);
        assert!(rounded > 1.0);
        let inside = round_event_time(0.99996, 10_000.0);
        assert!(inside <= 1.0);
    }

    #[test]
    fn segment_clips_circle_in_the_middle() {
        let circle = probe(5.0, 0.4, 0.0, 0.0, 0.5);
        assert!(segment_circle_intersect(
            Location::new(0.0, 0.0),
            Location::new(10.0, 0.0),
            &circle,
            0.1,
        ));
        let far = probe(5.0, 3.0, 0.0, 0.0, 0.5);
        assert!(!segment_circle_intersect(
            Location::new(0.0, 0.0),
            Location::new(10.0, 0.0),
            &far,
            0.1,
        ));
    }

    #[test]
    fn segment_behind_the_start_does_not_count() {
        let circle = probe(-3.0, 0.0, 0.0, 0.0, 1.0);
        assert!(!segment_circle_intersect(
            Location::new(0.0, 0.0),
            Location::new(10.0, 0.0),
            &circle,
            0.1,
        ));
    }

    #[test]
    fn will_collide_flags_out_of_bounds_targets() {
        let config = Config::default();
        let mut world = World::new(100.0, 100.0, 1);
        let ship = test_ship(0, 1, 50.0, 50.0);
        world.insert_ship(ship.clone());
        assert!(will_collide(
            &world,
            &ship,
            Velocity::default(),
            Location::new(-1.0, 50.0),
            &config,
        ));
    }

    #[test]
    fn will_collide_sees_a_planet_dead_ahead() {
        let config = Config::default();
        let mut world = World::new(100.0, 100.0, 1);
        world.insert_planet(test_planet(0, 54.0, 50.0, 3.0));
        let ship = test_ship(0, 1, 50.0, 50.0);
        world.insert_ship(ship.clone());
        let velocity = Velocity::from_thrust(7.0, 0.0, 7.0);
        assert!(will_collide(
            &world,
            &ship,
            velocity,
            Location::new(60.0, 50.0),
            &config,
        ));
    }

    #[test]
    fn will_collide_ignores_clear_space_and_itself() {
        let config = Config::default();
        let mut world = World::new(100.0, 100.0, 1);
        let ship = test_ship(0, 1, 50.0, 50.0);
        world.insert_ship(ship.clone());
        world.insert_planet(test_planet(0, 20.0, 20.0, 3.0));
        let velocity = Velocity::from_thrust(7.0, 0.0, 7.0);
        assert!(!will_collide(
            &world,
            &ship,
            velocity,
            Location::new(60.0, 50.0),
            &config,
        ));
    }

    #[test]
    fn will_collide_sees_an_oncoming_ship() {
        let config = Config::default();
        let mut world = World::new(100.0, 100.0, 1);
        let ship = test_ship(0, 1, 50.0, 50.0);
        world.insert_ship(ship.clone());
        let mut other = test_ship(1, 2, 58.0, 50.0);
        other.velocity = Velocity::from_thrust(7.0, core::f64::consts::PI, 7.0);
        world.insert_ship(other);
        let velocity = Velocity::from_thrust(7.0, 0.0, 7.0);
        assert!(will_collide(
            &world,
            &ship,
            velocity,
            Location::new(60.0, 50.0),
            &config,
        ));
    }
}
