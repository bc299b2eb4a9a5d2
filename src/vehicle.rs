use crate::math::{normalize_angle, Point2d};
use crate::RingRoad;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A simulated vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vehicle {
    /// The position along the ring in radians, within `[0, 2π)`.
    angle: f64,
    /// The speed along the ring.
    speed: f64,
    /// Scales the speed the driver aims for.
    velocity_adjust: f64,
}

impl Vehicle {
    /// Creates a stationary vehicle at the given angle.
    pub fn new(angle: f64) -> Self {
        Self {
            angle: normalize_angle(angle),
            speed: 0.0,
            velocity_adjust: 1.0,
        }
    }

    /// The position along the ring in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The vehicle's speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The desired velocity adjustment factor. [Read more](Self::set_velocity_adjust).
    pub fn velocity_adjust(&self) -> f64 {
        self.velocity_adjust
    }

    /// Whether the vehicle is stopped.
    pub fn has_stopped(&self) -> bool {
        self.speed < 0.1
    }

    /// The speed as a fraction of `speed_limit`.
    pub fn relative_speed(&self, speed_limit: f64) -> f64 {
        self.speed / speed_limit
    }

    /// The coordinates in world space of the vehicle.
    pub fn position(&self, road: &RingRoad) -> Point2d {
        road.position(self.angle)
    }

    /// Set the desired velocity adjustment factor for the vehicle, a scalar which is
    /// multiplied with the speed limit to give the speed the driver aims for.
    pub fn set_velocity_adjust(&mut self, factor: f64) {
        self.velocity_adjust = factor;
    }

    /// Moves the vehicle at `speed` for `dt`, wrapping its angle around the ring.
    pub(crate) fn advance(&mut self, speed: f64, dt: f64, road: &RingRoad) {
        self.speed = speed;
        self.angle = normalize_angle(self.angle + speed / road.radius() * dt);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::TAU;

    #[test]
    fn advance_wraps() {
        let road = RingRoad::default();
        let mut vehicle = Vehicle::new(TAU - 0.01);
        vehicle.advance(3.5, 0.02, &road);
        assert_approx_eq!(vehicle.angle(), 0.01);
        assert_eq!(vehicle.speed(), 3.5);
        assert!(!vehicle.has_stopped());
    }

    #[test]
    fn starts_stopped() {
        let vehicle = Vehicle::new(-1.0);
        assert!(vehicle.has_stopped());
        assert_approx_eq!(vehicle.angle(), TAU - 1.0);
        assert_eq!(vehicle.velocity_adjust(), 1.0);
    }

    #[test]
    fn world_position() {
        let road = RingRoad::default();
        let p = Vehicle::new(std::f64::consts::PI).position(&road);
        assert_approx_eq!(p.x, -3.5);
        assert_approx_eq!(p.y, 0.0);
    }
}
