//! Car-following models.

pub use gap_acceptance::GapAcceptance;
pub use intelligent::IntelligentDriver;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod gap_acceptance;
mod intelligent;

/// What a driver sees when choosing its next speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Follower {
    /// The driver's own speed.
    pub speed: f64,
    /// The speed of the vehicle ahead.
    pub leader_speed: f64,
    /// The usable gap to the vehicle ahead, never below the configured floor.
    pub gap: f64,
    /// The speed the driver aims for on a free road.
    pub desired_speed: f64,
}

/// A longitudinal driver model.
pub trait CarFollowingModel {
    /// Computes the driver's speed one timestep from now.
    /// The result is not yet clamped to the speed ceiling.
    fn next_speed(&self, follower: &Follower) -> f64;
}

/// Selects the car-following model used by a simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FollowingModel {
    /// A continuous acceleration law. See [IntelligentDriver].
    #[default]
    IntelligentDriver,
    /// Free acceleration or panic braking. See [GapAcceptance].
    GapAcceptance,
}
