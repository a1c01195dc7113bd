//! Simulation tuning and the per-tick time scale
//!
//! [`SimulationConfig`] can be built in code (every field has a default) or
//! loaded from YAML. Missing keys fall back to their defaults:
//!
//! ```yaml
//! gravity_constant: 0.1
//! theta: 0.5
//! node_capacity: 64
//! board:
//!   origin: [0.0, 0.0]
//!   width: 10000.0
//!   height: 10000.0
//! worker_threads: 4
//! ```

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::forces::GRAVITY_CONSTANT;
use crate::quadtree::Rect;

/// The bounded board bodies live on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    /// Top-left corner
    pub origin: Point2<f64>,
    pub width: f64,
    pub height: f64,
}

impl Board {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            origin: Point2::origin(),
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.origin,
            Point2::new(self.origin.x + self.width, self.origin.y + self.height),
        )
    }

    pub fn center(&self) -> Point2<f64> {
        self.rect().center()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(10_000.0, 10_000.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Base gravitational constant before time scaling
    pub gravity_constant: f64,
    /// Barnes-Hut opening angle
    pub theta: f64,
    /// Bodies a quadtree leaf holds before it subdivides
    pub node_capacity: usize,
    /// Floor on separations in the force law
    pub distance_epsilon: f64,
    /// Floor on displacement when orienting a swept collision shape
    pub min_sweep_length: f64,
    pub board: Board,
    /// Worker pool size; `None` uses the available hardware parallelism
    pub worker_threads: Option<usize>,
    /// Speed growth factor in one tick that gets reported as a spike
    pub velocity_spike_ratio: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity_constant: GRAVITY_CONSTANT,
            theta: 0.5,
            node_capacity: 64,
            distance_epsilon: 1e-5,
            min_sweep_length: 0.001,
            board: Board::default(),
            worker_threads: None,
            velocity_spike_ratio: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Parses a YAML document and validates it
    ///
    /// # Examples
    ///
    /// ```
    /// use gravsim::config::SimulationConfig;
    ///
    /// let config = SimulationConfig::from_yaml_str("theta: 0.8\nnode_capacity: 16\n").unwrap();
    /// assert_eq!(config.theta, 0.8);
    /// assert_eq!(config.gravity_constant, 0.1);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: SimulationConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SimError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )))
            }
        };

        positive("gravity_constant", self.gravity_constant)?;
        positive("distance_epsilon", self.distance_epsilon)?;
        positive("min_sweep_length", self.min_sweep_length)?;
        positive("board.width", self.board.width)?;
        positive("board.height", self.board.height)?;
        positive("velocity_spike_ratio", self.velocity_spike_ratio)?;

        if !(self.theta >= 0.0 && self.theta.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "theta must be non-negative and finite, got {}",
                self.theta
            )));
        }
        if self.node_capacity == 0 {
            return Err(SimError::InvalidConfig("node_capacity must be at least 1".into()));
        }
        if self.worker_threads == Some(0) {
            return Err(SimError::InvalidConfig("worker_threads must be at least 1".into()));
        }
        Ok(())
    }
}

/// Time-scale scalar handed to each tick
///
/// Doubles or halves within `[MIN, MAX]`. While paused, [`TimeScale::value`]
/// is zero, which makes a tick a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    scale: f64,
    paused: bool,
}

impl TimeScale {
    pub const DEFAULT: f64 = 1.0;
    pub const MIN: f64 = 0.1;
    pub const MAX: f64 = 10.0;

    pub fn new(scale: f64) -> Self {
        Self {
            scale: scale.clamp(Self::MIN, Self::MAX),
            paused: false,
        }
    }

    pub fn value(&self) -> f64 {
        if self.paused { 0.0 } else { self.scale }
    }

    /// The scale that applies once unpaused
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn faster(&mut self) {
        self.scale = (self.scale * 2.0).min(Self::MAX);
    }

    pub fn slower(&mut self) {
        self.scale = (self.scale / 2.0).max(Self::MIN);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}
