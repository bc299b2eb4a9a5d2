//! Macroscopic density and flow, and the fundamental diagram.

use crate::simulation::run;
use crate::{ConfigError, RingRoad, SimulationConfig, Vehicle};
use itertools::Itertools;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::ops::RangeInclusive;

/// The vehicle counts swept by default.
pub const DEFAULT_SWEEP: RangeInclusive<usize> = 1..=40;

/// Steps simulated per run by default, enough for speeds to settle.
pub const DEFAULT_STEPS: usize = 3000;

/// Macroscopic measurements of a fleet on a ring.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// The number of vehicles.
    pub vehicle_count: usize,
    /// Vehicles per unit length of road.
    pub density: f64,
    /// The mean vehicle speed.
    pub mean_speed: f64,
    /// Vehicles passing a point per unit time: density times mean speed.
    pub flow: f64,
}

/// Computes the density and flow of `vehicles` on a ring of the given circumference.
/// An empty ring has zero density and flow.
pub fn metrics(vehicles: &[Vehicle], circumference: f64) -> Metrics {
    let vehicle_count = vehicles.len();
    if vehicle_count == 0 {
        return Metrics::default();
    }
    let density = vehicle_count as f64 / circumference;
    let mean_speed = vehicles.iter().map(Vehicle::speed).sum::<f64>() / vehicle_count as f64;
    Metrics {
        vehicle_count,
        density,
        mean_speed,
        flow: density * mean_speed,
    }
}

/// The density/flow curve produced by sweeping the number of vehicles.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FundamentalDiagram {
    points: Vec<Metrics>,
}

impl FundamentalDiagram {
    /// The measured points, in order of increasing vehicle count.
    pub fn points(&self) -> &[Metrics] {
        &self.points
    }

    /// The number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the diagram has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns an iterator over the `(density, flow)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|p| (p.density, p.flow))
    }

    /// The point of maximum flow. Ties go to the lowest density.
    pub fn critical(&self) -> Option<&Metrics> {
        self.points
            .iter()
            .rev()
            .position_max_by(|a, b| a.flow.total_cmp(&b.flow))
            .map(|idx| &self.points[self.points.len() - 1 - idx])
    }

    /// The density at which flow is maximal.
    pub fn critical_density(&self) -> Option<f64> {
        self.critical().map(|p| p.density)
    }
}

impl FromIterator<Metrics> for FundamentalDiagram {
    fn from_iter<I: IntoIterator<Item = Metrics>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Builds a fundamental diagram by running an independent simulation for every
/// vehicle count in `counts`, each from evenly spaced vehicles at rest.
///
/// Each run draws hazards from its own ChaCha8 stream of `seed`, so a run's
/// result depends only on `seed` and its vehicle count.
pub fn sweep(
    counts: RangeInclusive<usize>,
    step_count: usize,
    road: &RingRoad,
    config: &SimulationConfig,
    seed: u64,
) -> Result<FundamentalDiagram, ConfigError> {
    road.validate()?;
    config.validate()?;
    let diagram = counts
        .map(|count| -> Result<Metrics, ConfigError> {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(count as u64);
            let state = run(count, step_count, road, config, &mut rng)?;
            let point = metrics(state.vehicles(), road.circumference());
            debug!(
                "vehicles: {:2} | density: {:.2} | flow: {:.2}",
                count, point.density, point.flow
            );
            Ok(point)
        })
        .collect::<Result<FundamentalDiagram, _>>()?;

    if let Some(critical) = diagram.critical() {
        info!(
            "critical density {:.3} with {} vehicles (flow {:.3})",
            critical.density, critical.vehicle_count, critical.flow
        );
    }
    Ok(diagram)
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn point(vehicle_count: usize, flow: f64) -> Metrics {
        Metrics {
            vehicle_count,
            density: vehicle_count as f64,
            mean_speed: flow / vehicle_count as f64,
            flow,
        }
    }

    #[test]
    fn density_and_flow() {
        let vehicles = [Vehicle::new(0.0), Vehicle::new(1.0)];
        let m = metrics(&vehicles, 10.0);
        assert_eq!(m.vehicle_count, 2);
        assert_approx_eq!(m.density, 0.2);
        assert_eq!(m.mean_speed, 0.0);
        assert_eq!(m.flow, 0.0);
        assert_eq!(metrics(&[], 10.0), Metrics::default());
    }

    #[test]
    fn critical_point_is_arg_max() {
        let diagram: FundamentalDiagram =
            [point(1, 0.5), point(2, 2.0), point(3, 2.0), point(4, 1.0)]
                .into_iter()
                .collect();
        assert_eq!(diagram.critical().map(|p| p.vehicle_count), Some(2));
        assert_eq!(diagram.critical_density(), Some(2.0));
        assert_eq!(diagram.iter().count(), 4);
        assert_eq!(FundamentalDiagram::default().critical(), None);
    }

    #[test]
    fn sweep_is_reproducible() {
        let road = RingRoad::default();
        let config = SimulationConfig {
            hazard_frequency: 5.0,
            ..Default::default()
        };
        let a = sweep(1..=6, 200, &road, &config, 11).unwrap();
        let b = sweep(1..=6, 200, &road, &config, 11).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);

        // A run only depends on its own vehicle count.
        let c = sweep(4..=6, 200, &road, &config, 11).unwrap();
        assert_eq!(&a.points()[3..], c.points());
    }

    #[test]
    fn sweep_rejects_bad_config() {
        let config = SimulationConfig {
            braking: -1.0,
            ..Default::default()
        };
        assert!(sweep(1..=3, 10, &RingRoad::default(), &config, 0).is_err());
    }

    #[test]
    fn sweep_rejects_degenerate_road() {
        let road = RingRoad::unchecked(0.0);
        assert!(matches!(
            sweep(1..=3, 10, &road, &SimulationConfig::default(), 0),
            Err(ConfigError::NotPositive { name: "radius", .. })
        ));
    }
}
