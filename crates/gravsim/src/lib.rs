//! Two-dimensional gravity simulation
//!
//! Bodies attract each other through a Barnes-Hut quadtree, move with a
//! direct Euler step, and merge when their swept paths overlap.

pub mod body;
pub mod collisions;
pub mod config;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod preview;
pub mod quadtree;
pub mod scenario;
pub mod simulation;
pub mod state;

#[cfg(test)]
mod body_test;
#[cfg(test)]
mod integrator_test;

pub use body::{Body, BodyId, BodySpec};
pub use config::{Board, SimulationConfig, TimeScale};
pub use error::{Result, SimError};
pub use simulation::{Simulation, TickReport};
