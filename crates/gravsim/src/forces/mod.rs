//! Force models for the simulation
//!
//! A force model turns the tick's frozen quadtree into an acceleration for
//! one body. Models only read the tree, so one instance is shared by every
//! worker during the parallel force phase.

use nalgebra::Vector2;

use crate::body::Body;
use crate::quadtree::QuadTree;

pub mod tree_gravity;


pub use tree_gravity::TreeGravity;

/// Gravitational constant in board units (mass · distance³ · tick⁻²)
pub const GRAVITY_CONSTANT: f64 = 0.1;

/// A source of acceleration on bodies
pub trait ForceModel: Send + Sync {
    /// Acceleration on `tree.items()[index]` for this tick
    ///
    /// # Arguments
    ///
    /// * `tree` - Index built from the tick's starting positions
    /// * `index` - Slot of the body in the tree's backing slice
    /// * `gravity` - Effective constant, `GRAVITY_CONSTANT * time_scale`
    ///
    /// # Returns
    ///
    /// Velocity change for one tick, in board units per tick
    fn acceleration(&self, tree: &QuadTree<'_, Body>, index: usize, gravity: f64) -> Vector2<f64>;
}
