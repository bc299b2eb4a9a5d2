use super::{CarFollowingModel, Follower};
use crate::SimulationConfig;

/// A gap-acceptance model with panic braking.
///
/// While the gap exceeds the safe distance the driver accelerates at the
/// nominal rate up to its desired speed. Otherwise it brakes with the deceleration
/// needed to stop within the safe distance, scaled by a panic factor
/// `exp(safe_distance / gap - 1)` and capped at `max_braking`.
/// The leader's speed is not used.
#[derive(Clone, Debug)]
pub struct GapAcceptance {
    min_clearance: f64,
    reaction_time: f64,
    max_acc: f64,
    max_braking: f64,
    dt: f64,
}

impl GapAcceptance {
    /// Creates a new model from the simulation constants.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            min_clearance: config.min_clearance,
            reaction_time: config.reaction_time,
            max_acc: config.acceleration,
            max_braking: config.max_braking,
            dt: config.timestep,
        }
    }

    /// The distance below which the driver starts braking.
    pub fn safe_distance(&self, vel: f64) -> f64 {
        self.min_clearance + vel * self.reaction_time
    }

    /// The deceleration applied when the gap is not accepted, a positive number.
    pub fn braking(&self, vel: f64, gap: f64) -> f64 {
        if vel <= 0.0 {
            return 0.0;
        }
        let safe = self.safe_distance(vel);
        let kinematic = vel.powi(2) / (2. * safe);
        let panic = (safe / gap - 1.).exp();
        f64::min(kinematic * panic, self.max_braking)
    }
}

impl CarFollowingModel for GapAcceptance {
    fn next_speed(&self, follower: &Follower) -> f64 {
        let vel = follower.speed;
        if follower.gap > self.safe_distance(vel) {
            if vel < follower.desired_speed {
                f64::min(vel + self.max_acc * self.dt, follower.desired_speed)
            } else {
                vel
            }
        } else {
            vel - self.braking(vel, follower.gap) * self.dt
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn model() -> GapAcceptance {
        GapAcceptance::new(&SimulationConfig::default())
    }

    fn follower(speed: f64, gap: f64) -> Follower {
        Follower {
            speed,
            leader_speed: 0.0,
            gap,
            desired_speed: 3.6,
        }
    }

    #[test]
    fn accelerates_when_gap_accepted() {
        let m = model();
        assert_approx_eq!(m.next_speed(&follower(1.0, 5.0)), 1.0 + 0.8 / 60.0);
    }

    #[test]
    fn never_overshoots_desired_speed() {
        let m = model();
        assert_eq!(m.next_speed(&follower(3.599, 5.0)), 3.6);
        assert_eq!(m.next_speed(&follower(3.7, 5.0)), 3.7);
    }

    #[test]
    fn brakes_with_panic_factor() {
        let m = model();
        // safe = 0.1 + 2 * 0.2 = 0.5, kinematic = 4 / 1 = 4, panic = exp(0.5 / 0.25 - 1) = e
        assert_approx_eq!(m.braking(2.0, 0.25), 4.0 * std::f64::consts::E);
        assert_approx_eq!(
            m.next_speed(&follower(2.0, 0.25)),
            2.0 - 4.0 * std::f64::consts::E / 60.0
        );
    }

    #[test]
    fn braking_is_capped() {
        let m = model();
        assert_eq!(m.braking(3.0, 0.01), 40.0);
        assert_eq!(m.braking(0.0, 0.01), 0.0);
        assert_approx_eq!(m.next_speed(&follower(3.0, 0.01)), 3.0 - 40.0 / 60.0);
    }

    #[test]
    fn at_the_threshold_brakes() {
        let m = model();
        // gap == safe distance is not accepted; the panic factor is exp(0) = 1
        assert_approx_eq!(m.braking(1.0, 0.3), 1.0 / 0.6);
        assert!(m.next_speed(&follower(1.0, 0.3)) < 1.0);
    }
}
