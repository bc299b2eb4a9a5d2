use super::{CarFollowingModel, Follower};
use crate::SimulationConfig;

/// The intelligent driver model.
///
/// A single continuous law covers both free driving and following:
/// a quartic free-road term pulls the driver towards its desired speed
/// while a squared interaction term brakes as the desired following distance
/// approaches the actual gap.
#[derive(Clone, Debug)]
pub struct IntelligentDriver {
    min_clearance: f64,
    headway: f64,
    max_acc: f64,
    comf_dec: f64,
    dt: f64,
}

impl IntelligentDriver {
    /// Creates a new model from the simulation constants.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            min_clearance: config.min_clearance,
            headway: config.reaction_time,
            max_acc: config.acceleration,
            comf_dec: config.braking,
            dt: config.timestep,
        }
    }

    /// The distance the driver would like to keep to the vehicle ahead.
    ///
    /// # Arguments
    /// * `my_vel` - The velocity of the simulated vehicle.
    /// * `their_vel` - The vehicle ahead's velocity.
    pub fn desired_distance(&self, my_vel: f64, their_vel: f64) -> f64 {
        let appr = my_vel - their_vel;
        let factor = 1. / (2. * (self.max_acc * self.comf_dec).sqrt());
        self.min_clearance + (my_vel * self.headway) + (my_vel * appr * factor)
    }

    /// Computes an acceleration using the intelligent driver model.
    pub fn acceleration(&self, follower: &Follower) -> f64 {
        let free_road = 1. - (follower.speed / follower.desired_speed).powi(4);
        let term = self.desired_distance(follower.speed, follower.leader_speed) / follower.gap;
        self.max_acc * (free_road - (term * term))
    }
}

impl CarFollowingModel for IntelligentDriver {
    fn next_speed(&self, follower: &Follower) -> f64 {
        f64::max(follower.speed + self.acceleration(follower) * self.dt, 0.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn follower(speed: f64, leader_speed: f64, gap: f64) -> Follower {
        Follower {
            speed,
            leader_speed,
            gap,
            desired_speed: 3.6,
        }
    }

    #[test]
    fn desired_distance() {
        let idm = IntelligentDriver::new(&SimulationConfig::default());
        assert_approx_eq!(idm.desired_distance(0.0, 0.0), 0.1);
        assert_approx_eq!(idm.desired_distance(2.0, 2.0), 0.1 + 0.4);
        // Closing in at 1 unit/s: 2 * 1 / (2 * sqrt(0.8 * 4))
        assert_approx_eq!(idm.desired_distance(2.0, 1.0), 0.5 + 1.0 / 3.2f64.sqrt());
    }

    #[test]
    fn accelerates_from_rest_on_open_road() {
        let idm = IntelligentDriver::new(&SimulationConfig::default());
        let f = follower(0.0, 0.0, 1000.0);
        assert_approx_eq!(idm.acceleration(&f), 0.8, 1e-6);
        assert_approx_eq!(idm.next_speed(&f), 0.8 / 60.0, 1e-6);
    }

    #[test]
    fn stops_accelerating_at_desired_speed() {
        let idm = IntelligentDriver::new(&SimulationConfig::default());
        let acc = idm.acceleration(&follower(3.6, 3.6, 1e9));
        assert_approx_eq!(acc, 0.0, 1e-6);
    }

    #[test]
    fn brakes_when_too_close() {
        let idm = IntelligentDriver::new(&SimulationConfig::default());
        let f = follower(2.0, 0.0, 0.05);
        assert!(idm.acceleration(&f) < -10.0);
        assert_eq!(idm.next_speed(&f), 0.0);
    }
}
