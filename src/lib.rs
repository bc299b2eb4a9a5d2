pub use cgmath;
pub use config::{ConfigError, SimulationConfig, JAM_SCENE_RADIUS, JAM_SCENE_VEHICLES};
pub use hazard::Hazard;
pub use metrics::{metrics, sweep, FundamentalDiagram, Metrics, DEFAULT_STEPS, DEFAULT_SWEEP};
pub use model::{CarFollowingModel, Follower, FollowingModel, GapAcceptance, IntelligentDriver};
pub use ring::{RingRoad, DEFAULT_RADIUS};
pub use simulation::{run, step, step_with, Frame, Frames, RingState, Simulation};
pub use space_time::{SpaceTimeDiagram, SpaceTimePoint};
pub use vehicle::Vehicle;

mod config;
mod hazard;
pub mod math;
mod metrics;
pub mod model;
mod ring;
mod simulation;
mod space_time;
mod vehicle;
