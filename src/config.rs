//! Physics constants shared by every vehicle on the ring.

use crate::model::FollowingModel;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Radius of the ring used by the live traffic jam scene.
pub const JAM_SCENE_RADIUS: f64 = 3.66;

/// Number of vehicles in the live traffic jam scene.
pub const JAM_SCENE_VEHICLES: usize = 25;

/// An invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("hazard probability per step must not exceed 1, got {0}")]
    HazardProbability(f64),

    #[error("hazard magnitude must lie in [0, 1), got {0}")]
    HazardMagnitude(f64),

    #[error("invalid velocity adjustment deviation: {0}")]
    InvalidDeviation(f64),

    #[cfg(feature = "serde")]
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// The physics constants of a simulation run.
///
/// Distances are in track units and times in simulated seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// The speed drivers aim for on a free road.
    pub speed_limit: f64,
    /// The nominal acceleration.
    pub acceleration: f64,
    /// The nominal (comfortable) deceleration, a positive number.
    pub braking: f64,
    /// The bumper-to-bumper distance kept when stopped.
    pub min_clearance: f64,
    /// The driver reaction time, used as the desired time headway.
    pub reaction_time: f64,
    /// The expected number of hazards per vehicle per unit time.
    pub hazard_frequency: f64,
    /// The fraction by which a hazard changes a vehicle's speed.
    pub hazard_magnitude: f64,
    /// The duration of one step.
    pub timestep: f64,
    /// The length of a vehicle, subtracted from the geometric gap.
    pub vehicle_length: f64,
    /// The smallest gap ever reported to a car-following model.
    pub min_gap: f64,
    /// The strongest braking the gap-acceptance model will apply.
    pub max_braking: f64,
    /// How far past the speed limit a vehicle may be pushed, as a fraction.
    pub speed_margin: f64,
    /// The car-following model driving every vehicle.
    pub model: FollowingModel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed_limit: 3.6,
            acceleration: 0.8,
            braking: 4.0,
            min_clearance: 0.1,
            reaction_time: 0.2,
            hazard_frequency: 0.05,
            hazard_magnitude: 0.05,
            timestep: 1.0 / 60.0,
            vehicle_length: 0.45,
            min_gap: 0.01,
            max_braking: 40.0,
            speed_margin: 0.05,
            model: FollowingModel::IntelligentDriver,
        }
    }
}

impl SimulationConfig {
    /// The constants of the live traffic jam scene: sluggish acceleration,
    /// short vehicles, frequent hazards and the gap-acceptance model.
    /// Pair with [JAM_SCENE_RADIUS] and [JAM_SCENE_VEHICLES].
    pub fn jam_scene() -> Self {
        Self {
            acceleration: 0.2,
            min_clearance: 0.02,
            hazard_frequency: 0.1,
            hazard_magnitude: 0.1,
            vehicle_length: 0.2,
            model: FollowingModel::GapAcceptance,
            ..Default::default()
        }
    }

    /// Returns a copy of the configuration using the given model.
    pub fn with_model(self, model: FollowingModel) -> Self {
        Self { model, ..self }
    }

    /// The hard upper bound on any vehicle's speed.
    pub fn speed_ceiling(&self) -> f64 {
        self.speed_limit * (1.0 + self.speed_margin)
    }

    /// The probability that a hazard strikes a given vehicle during one step.
    pub fn hazard_probability(&self) -> f64 {
        self.hazard_frequency * self.timestep
    }

    /// Checks every constant, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("speed_limit", self.speed_limit)?;
        positive("acceleration", self.acceleration)?;
        positive("braking", self.braking)?;
        positive("timestep", self.timestep)?;
        positive("min_gap", self.min_gap)?;
        positive("max_braking", self.max_braking)?;
        non_negative("min_clearance", self.min_clearance)?;
        non_negative("reaction_time", self.reaction_time)?;
        non_negative("hazard_frequency", self.hazard_frequency)?;
        non_negative("vehicle_length", self.vehicle_length)?;
        non_negative("speed_margin", self.speed_margin)?;

        let probability = self.hazard_probability();
        if probability > 1.0 {
            return Err(ConfigError::HazardProbability(probability));
        }
        if !(0.0..1.0).contains(&self.hazard_magnitude) {
            return Err(ConfigError::HazardMagnitude(self.hazard_magnitude));
        }
        Ok(())
    }

    /// Parses a configuration from JSON. Missing fields take their default values.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
