use crate::hazard::Hazard;
use crate::metrics::{metrics, Metrics};
use crate::model::{CarFollowingModel, Follower, FollowingModel, GapAcceptance, IntelligentDriver};
use crate::{ConfigError, RingRoad, SimulationConfig, Vehicle};
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Distribution;

/// The state of every vehicle on the ring at one instant.
///
/// Vehicle `i` follows vehicle `i + 1`, and the last vehicle follows the first.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RingState {
    vehicles: Vec<Vehicle>,
}

impl RingState {
    /// Creates `count` stationary vehicles evenly spaced around the ring.
    pub fn evenly_spaced(count: usize) -> Self {
        let vehicles = RingRoad::evenly_spaced(count)
            .into_iter()
            .map(Vehicle::new)
            .collect();
        Self { vehicles }
    }

    /// Creates a state from vehicles listed in ring order.
    pub fn from_vehicles(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }

    /// The number of vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether there are no vehicles.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// The vehicles, in ring order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// The angle of every vehicle.
    pub fn angles(&self) -> Vec<f64> {
        self.vehicles.iter().map(Vehicle::angle).collect()
    }

    /// The speed of every vehicle.
    pub fn speeds(&self) -> Vec<f64> {
        self.vehicles.iter().map(Vehicle::speed).collect()
    }

    /// Consumes the state, returning its vehicles.
    pub fn into_vehicles(self) -> Vec<Vehicle> {
        self.vehicles
    }
}

/// Advances every vehicle by one timestep using the model chosen by `config`.
///
/// Every vehicle reads the same pre-step snapshot, so the result does not depend
/// on the order vehicles are visited in. The only randomness is the hazard,
/// drawn from `rng`.
pub fn step<R: Rng + ?Sized>(
    state: &RingState,
    road: &RingRoad,
    config: &SimulationConfig,
    rng: &mut R,
) -> RingState {
    let mut next = RingState::default();
    step_into(state, &mut next, road, config, rng);
    next
}

/// Advances every vehicle by one timestep using a caller supplied model.
/// See [step].
pub fn step_with<M, R>(
    state: &RingState,
    road: &RingRoad,
    config: &SimulationConfig,
    model: &M,
    rng: &mut R,
) -> RingState
where
    M: CarFollowingModel + ?Sized,
    R: Rng + ?Sized,
{
    let mut next = RingState::default();
    advance_all(state, &mut next, road, config, model, rng);
    next
}

/// Runs `vehicle_count` evenly spaced vehicles, starting from rest,
/// for `step_count` steps and returns the final state.
pub fn run<R: Rng + ?Sized>(
    vehicle_count: usize,
    step_count: usize,
    road: &RingRoad,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<RingState, ConfigError> {
    road.validate()?;
    config.validate()?;
    let mut state = RingState::evenly_spaced(vehicle_count);
    let mut next = RingState::default();
    for _ in 0..step_count {
        step_into(&state, &mut next, road, config, rng);
        std::mem::swap(&mut state, &mut next);
    }
    Ok(state)
}

/// Writes the state one step after `prev` into `next`, replacing its contents.
fn step_into<R: Rng + ?Sized>(
    prev: &RingState,
    next: &mut RingState,
    road: &RingRoad,
    config: &SimulationConfig,
    rng: &mut R,
) {
    match config.model {
        FollowingModel::IntelligentDriver => {
            advance_all(prev, next, road, config, &IntelligentDriver::new(config), rng)
        }
        FollowingModel::GapAcceptance => {
            advance_all(prev, next, road, config, &GapAcceptance::new(config), rng)
        }
    }
}

fn advance_all<M, R>(
    prev: &RingState,
    next: &mut RingState,
    road: &RingRoad,
    config: &SimulationConfig,
    model: &M,
    rng: &mut R,
) where
    M: CarFollowingModel + ?Sized,
    R: Rng + ?Sized,
{
    let hazard = Hazard::new(config);
    let angles = prev.angles();
    next.vehicles.clear();
    for idx in 0..prev.len() {
        let vehicle = advance_vehicle(idx, prev, &angles, road, config, model, &hazard, rng);
        next.vehicles.push(vehicle);
    }
}

/// Computes the new state of vehicle `idx` from the snapshot `prev`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn advance_vehicle<M, R>(
    idx: usize,
    prev: &RingState,
    angles: &[f64],
    road: &RingRoad,
    config: &SimulationConfig,
    model: &M,
    hazard: &Hazard,
    rng: &mut R,
) -> Vehicle
where
    M: CarFollowingModel + ?Sized,
    R: Rng + ?Sized,
{
    let mut vehicle = prev.vehicles[idx];
    let leader = prev.vehicles[(idx + 1) % prev.len()];
    let follower = Follower {
        speed: vehicle.speed(),
        leader_speed: leader.speed(),
        gap: road.gap(idx, angles, config),
        desired_speed: vehicle.velocity_adjust() * config.speed_limit,
    };

    let speed = model.next_speed(&follower);
    let speed = hazard.apply(speed, rng);
    let speed = speed.clamp(0.0, config.speed_ceiling());

    vehicle.advance(speed, config.timestep, road);
    vehicle
}

/// A simulation of a fleet of vehicles on a ring road, advanced one step at a time.
///
/// This is the driver for live visualisations: call [step](Self::step) once per
/// frame and draw [iter_vehicles](Self::iter_vehicles).
#[derive(Clone, Debug)]
pub struct Simulation<R = ChaCha8Rng> {
    /// The road.
    road: RingRoad,
    /// The physics constants.
    config: SimulationConfig,
    /// The current vehicle states.
    state: RingState,
    /// Scratch buffer the next step is written into.
    back: RingState,
    /// The source of hazard randomness.
    rng: R,
    /// The number of steps simulated so far.
    frame: usize,
}

/// One step of a simulation's trajectory.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// The number of steps simulated to reach this frame.
    pub index: usize,
    /// The simulated time at this frame.
    pub time: f64,
    /// The vehicles, in ring order.
    pub vehicles: Vec<Vehicle>,
}

impl Simulation<ChaCha8Rng> {
    /// Creates a simulation whose hazards are drawn from a ChaCha8 generator seeded with `seed`.
    pub fn seeded(
        road: RingRoad,
        config: SimulationConfig,
        vehicle_count: usize,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(road, config, vehicle_count, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Creates a simulation of `vehicle_count` stationary vehicles, evenly spaced.
    pub fn new(
        road: RingRoad,
        config: SimulationConfig,
        vehicle_count: usize,
        rng: R,
    ) -> Result<Self, ConfigError> {
        road.validate()?;
        config.validate()?;
        info!(
            "simulating {} vehicles on a ring of radius {} with {:?}",
            vehicle_count,
            road.radius(),
            config.model
        );
        Ok(Self {
            road,
            config,
            state: RingState::evenly_spaced(vehicle_count),
            back: RingState::default(),
            rng,
            frame: 0,
        })
    }

    /// Advances the simulation by one timestep.
    pub fn step(&mut self) {
        step_into(&self.state, &mut self.back, &self.road, &self.config, &mut self.rng);
        std::mem::swap(&mut self.state, &mut self.back);
        self.frame += 1;
    }

    /// Randomly assigns a desired velocity adjustment factor to each vehicle,
    /// which is sampled from a normal distribution with a mean of 1 (no adjustment)
    /// and standard deviation of `stddev`.
    ///
    /// Fails without touching any vehicle if `stddev` is negative or not finite.
    pub fn randomise_velocity_adjusts(&mut self, stddev: f64) -> Result<(), ConfigError> {
        if !(stddev.is_finite() && stddev >= 0.0) {
            return Err(ConfigError::InvalidDeviation(stddev));
        }
        let distr = rand_distr::Normal::new(1.0, stddev)
            .map_err(|_| ConfigError::InvalidDeviation(stddev))?;
        for vehicle in &mut self.state.vehicles {
            let factor = distr.sample(&mut self.rng).clamp(0.75, 1.25);
            vehicle.set_velocity_adjust(factor);
        }
        Ok(())
    }

    /// Returns an endless iterator that steps the simulation and yields each new frame.
    /// Use [Iterator::take] for a fixed number of steps.
    pub fn frames(&mut self) -> Frames<'_, R> {
        Frames { sim: self }
    }
}

impl<R> Simulation<R> {
    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The simulated time elapsed.
    pub fn time(&self) -> f64 {
        self.frame as f64 * self.config.timestep
    }

    /// The road being simulated.
    pub fn road(&self) -> &RingRoad {
        &self.road
    }

    /// The physics constants.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The current state of every vehicle.
    pub fn state(&self) -> &RingState {
        &self.state
    }

    /// Returns an iterator over all the vehicles in the simulation, in ring order.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.state.vehicles.iter()
    }

    /// The density and flow of the current state.
    pub fn metrics(&self) -> Metrics {
        metrics(self.state.vehicles(), self.road.circumference())
    }

    /// Captures the current state as a [Frame].
    pub fn snapshot(&self) -> Frame {
        Frame {
            index: self.frame,
            time: self.time(),
            vehicles: self.state.vehicles.clone(),
        }
    }

    /// Consumes the simulation, returning the current state.
    pub fn into_state(self) -> RingState {
        self.state
    }
}

/// An iterator over the frames of a [Simulation]. See [Simulation::frames].
pub struct Frames<'a, R> {
    sim: &'a mut Simulation<R>,
}

impl<R: Rng> Iterator for Frames<'_, R> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        self.sim.step();
        Some(self.sim.snapshot())
    }
}
