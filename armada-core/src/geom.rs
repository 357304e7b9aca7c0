//! 2-D value types: points, bounded velocities and angle helpers.

use crate::constants::VELOCITY_FLOOR;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Location) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    pub fn angle_to_rad(&self, other: Location) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Bearing toward `other` as an integer degree in [0, 360).
    pub fn angle_to_deg(&self, other: Location) -> i32 {
        rad_to_deg_clipped(self.angle_to_rad(other))
    }

    /// The point at `radius` from `center` along the bearing from `center`
    /// toward `self`, i.e. the closest point on a circle of that radius.
    pub fn closest_point_to(&self, center: Location, radius: f64) -> Location {
        let angle = center.angle_to_rad(*self);
        Location {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        }
    }

    /// Displace by `magnitude` along `angle_rad`.
    pub fn offset(&self, magnitude: f64, angle_rad: f64) -> Location {
        Location {
            x: self.x + magnitude * angle_rad.cos(),
            y: self.y + magnitude * angle_rad.sin(),
        }
    }
}

/// Normalize any integer angle into [0, 360).
pub fn clip_angle(angle: i64) -> i32 {
    (((angle % 360) + 360) % 360) as i32
}

/// Radians to the nearest integer degree, clipped into [0, 360).
pub fn rad_to_deg_clipped(angle_rad: f64) -> i32 {
    clip_angle(angle_rad.to_degrees().round() as i64)
}

/// A per-turn velocity vector. Components carry a near-zero floor so bearing
/// math never divides through an exact zero, and the magnitude is capped at
/// the configured max speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Default for Velocity {
    fn default() -> Self {
        Self {
            vx: VELOCITY_FLOOR,
            vy: VELOCITY_FLOOR,
        }
    }
}

impl Velocity {
    pub fn magnitude(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// Add a thrust vector; over the cap the result is rescaled in place,
    /// preserving direction.
    pub fn accelerate_by(&mut self, magnitude: f64, angle_rad: f64, max_speed: f64) {
        self.vx += magnitude * angle_rad.cos();
        self.vy += magnitude * angle_rad.sin();

        let current = self.magnitude();
        if current > max_speed {
            let scale = max_speed / current;
            self.vx *= scale;
            self.vy *= scale;
        }
    }

    /// The velocity a resting ship ends up with after one thrust command.
    pub fn from_thrust(magnitude: f64, angle_rad: f64, max_speed: f64) -> Self {
        let mut velocity = Self::default();
        velocity.accelerate_by(magnitude, angle_rad, max_speed);
        velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_and_bearing() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
        assert_eq!(a.angle_to_deg(Location::new(10.0, 0.0)), 0);
        assert_eq!(a.angle_to_deg(Location::new(0.0, 10.0)), 90);
        assert_eq!(a.angle_to_deg(Location::new(-10.0, 0.0)), 180);
        assert_eq!(a.angle_to_deg(Location::new(0.0, -10.0)), 270);
    }

    #[test]
    fn clip_angle_wraps_both_directions() {
        assert_eq!(clip_angle(0), 0);
        assert_eq!(clip_angle(360), 0);
        assert_eq!(clip_angle(725), 5);
        assert_eq!(clip_angle(-1), 359);
        assert_eq!(clip_angle(-721), 359);
    }

    #[test]
    fn closest_point_sits_on_the_near_side() {
        let ship = Location::new(0.0, 0.0);
        let center = Location::new(10.0, 0.0);
        let point = ship.closest_point_to(center, 3.0);
        assert!((point.x - 7.0).abs() < 1e-9);
        assert!(point.y.abs() < 1e-9);
    }

    #[test]
    fn velocity_floor_is_never_zero() {
        let velocity = Velocity::default();
        assert!(velocity.vx > 0.0 && velocity.vy > 0.0);
        assert!(velocity.magnitude() < 1e-5);
    }

    #[test]
    fn acceleration_caps_at_max_speed_preserving_direction() {
        let mut velocity = Velocity::default();
        velocity.accelerate_by(5.0, 0.0, 7.0);
        velocity.accelerate_by(5.0, 0.0, 7.0);
        assert!((velocity.magnitude() - 7.0).abs() < 1e-9);
        assert!(velocity.vx > 6.9 && velocity.vy.abs() < 1e-5);
    }
}
