use crate::config::{positive, ConfigError, SimulationConfig};
use crate::math::{forward_angle, rot90, Point2d, Vector2d};
use std::f64::consts::TAU;

/// Radius of the ring used to build the fundamental diagram.
pub const DEFAULT_RADIUS: f64 = 3.5;

/// A closed single-lane circular road.
///
/// Positions along the road are angles in radians, measured anti-clockwise
/// from the positive x-axis. Vehicles travel in the direction of increasing angle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RingRoadAttributes")
)]
pub struct RingRoad {
    radius: f64,
}

/// The unchecked form a road is deserialised from.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RingRoadAttributes {
    radius: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RingRoadAttributes> for RingRoad {
    type Error = ConfigError;

    fn try_from(attribs: RingRoadAttributes) -> Result<Self, Self::Error> {
        Self::new(attribs.radius)
    }
}

impl Default for RingRoad {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
        }
    }
}

impl RingRoad {
    /// Creates a ring with the given radius.
    pub fn new(radius: f64) -> Result<Self, ConfigError> {
        let road = Self { radius };
        road.validate()?;
        Ok(road)
    }

    /// Checks that the radius is positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("radius", self.radius)
    }

    /// Creates a ring without checking the radius.
    #[cfg(test)]
    pub(crate) fn unchecked(radius: f64) -> Self {
        Self { radius }
    }

    /// The radius of the ring.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The length of the ring's centre line.
    pub fn circumference(&self) -> f64 {
        TAU * self.radius
    }

    /// Converts an angle to a distance along the ring.
    pub fn arc_length(&self, angle: f64) -> f64 {
        angle * self.radius
    }

    /// Computes the usable gap between vehicle `idx` and its leader, vehicle `idx + 1`
    /// (wrapping around to vehicle 0).
    ///
    /// The gap is measured forwards along the ring, less one vehicle length,
    /// and is never smaller than `config.min_gap`. A lone vehicle follows itself
    /// a full lap ahead.
    ///
    /// # Parameters
    /// * `idx` - The index of the following vehicle
    /// * `angles` - The positions of every vehicle on the ring, in order
    /// * `config` - The simulation constants
    pub fn gap(&self, idx: usize, angles: &[f64], config: &SimulationConfig) -> f64 {
        let leader = (idx + 1) % angles.len();
        let distance = self.arc_length(forward_angle(angles[idx], angles[leader]));
        f64::max(distance - config.vehicle_length, config.min_gap)
    }

    /// Evenly spaced starting angles for `count` vehicles, the first at angle zero.
    pub fn evenly_spaced(count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| TAU / count as f64 * i as f64)
            .collect()
    }

    /// The world space coordinates of the point at `angle`,
    /// with the ring centred on the origin.
    pub fn position(&self, angle: f64) -> Point2d {
        Point2d::new(self.radius * angle.cos(), self.radius * angle.sin())
    }

    /// A unit vector tangent to the ring at `angle`, pointing in the direction of travel.
    pub fn heading(&self, angle: f64) -> Vector2d {
        rot90(Vector2d::new(angle.cos(), angle.sin()))
    }
}
