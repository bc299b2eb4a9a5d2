//! Random speed shocks independent of the car-following model.

use crate::SimulationConfig;
use log::trace;
use rand::Rng;

/// A per-vehicle, per-step speed perturbation.
///
/// Each step a hazard strikes with probability `hazard_frequency * timestep`.
/// A struck vehicle has its speed scaled down or up by `hazard_magnitude`,
/// with equal odds.
#[derive(Clone, Copy, Debug)]
pub struct Hazard {
    probability: f64,
    magnitude: f64,
}

impl Hazard {
    /// Creates the hazard described by the simulation constants.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            probability: config.hazard_probability(),
            magnitude: config.hazard_magnitude,
        }
    }

    /// The probability of a hazard striking a vehicle in one step.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Applies the hazard to a speed, consuming random draws from `rng`.
    pub fn apply<R: Rng + ?Sized>(&self, speed: f64, rng: &mut R) -> f64 {
        if rng.gen::<f64>() >= self.probability {
            return speed;
        }
        let factor = if rng.gen::<bool>() {
            1. - self.magnitude
        } else {
            1. + self.magnitude
        };
        trace!("hazard scaled speed {:.3} by {}", speed, factor);
        speed * factor
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn disabled_hazard_never_fires() {
        let hazard = Hazard::new(&SimulationConfig {
            hazard_frequency: 0.0,
            ..Default::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!((0..10_000).all(|_| hazard.apply(2.0, &mut rng) == 2.0));
    }

    #[test]
    fn certain_hazard_always_fires() {
        let config = SimulationConfig {
            hazard_frequency: 60.0,
            hazard_magnitude: 0.1,
            ..Default::default()
        };
        let hazard = Hazard::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let speeds: Vec<f64> = (0..1000).map(|_| hazard.apply(2.0, &mut rng)).collect();
        assert!(speeds.iter().all(|&s| s == 2.0 * 0.9 || s == 2.0 * 1.1));
        assert!(speeds.iter().any(|&s| s < 2.0));
        assert!(speeds.iter().any(|&s| s > 2.0));
    }

    #[test]
    fn fires_at_configured_rate() {
        let config = SimulationConfig {
            hazard_frequency: 6.0,
            ..Default::default()
        };
        let hazard = Hazard::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let fired = (0..100_000)
            .filter(|_| hazard.apply(1.0, &mut rng) != 1.0)
            .count();
        // p = 0.1; expect ~10_000 with a standard deviation under 100
        assert!((9_500..10_500).contains(&fired), "fired {} times", fired);
    }
}
