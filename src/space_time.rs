//! Data for time-space diagrams: where each vehicle was, and how fast, over time.

use crate::simulation::Frame;

/// One vehicle's position at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpaceTimePoint {
    /// The simulated time.
    pub time: f64,
    /// The index of the vehicle.
    pub vehicle: usize,
    /// The vehicle's position along the ring in radians.
    pub angle: f64,
    /// The vehicle's speed as a fraction of the speed limit.
    pub relative_speed: f64,
}

/// Collects vehicle positions from every `stride`-th frame until `horizon`.
#[derive(Clone, Debug)]
pub struct SpaceTimeDiagram {
    stride: usize,
    horizon: f64,
    speed_limit: f64,
    points: Vec<SpaceTimePoint>,
}

impl SpaceTimeDiagram {
    /// Creates an empty diagram.
    ///
    /// # Parameters
    /// * `stride` - Record every this many frames; zero is treated as one
    /// * `horizon` - Frames at or after this time are ignored
    /// * `speed_limit` - Speeds are recorded relative to this
    pub fn new(stride: usize, horizon: f64, speed_limit: f64) -> Self {
        Self {
            stride: stride.max(1),
            horizon,
            speed_limit,
            points: vec![],
        }
    }

    /// Records a frame if it falls on the stride and before the horizon.
    /// Returns `true` iff the frame was recorded.
    pub fn record(&mut self, frame: &Frame) -> bool {
        if frame.index % self.stride != 0 || frame.time >= self.horizon {
            return false;
        }
        let points = frame
            .vehicles
            .iter()
            .enumerate()
            .map(|(vehicle, v)| SpaceTimePoint {
                time: frame.time,
                vehicle,
                angle: v.angle(),
                relative_speed: v.relative_speed(self.speed_limit),
            });
        self.points.extend(points);
        true
    }

    /// Whether frames from `time` onwards will be ignored.
    pub fn is_complete(&self, time: f64) -> bool {
        time >= self.horizon
    }

    /// The recorded points, in order of time then vehicle.
    pub fn points(&self) -> &[SpaceTimePoint] {
        &self.points
    }
}
