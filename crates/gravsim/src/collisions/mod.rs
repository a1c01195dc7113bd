//! Collision detection and resolution
//!
//! Detection compares swept shapes so fast movers cannot tunnel through each
//! other between ticks; resolution merges each overlapping pair into the
//! heavier body.

pub mod detection;
pub mod resolution;
pub mod shape;

#[cfg(test)]
mod detection_test;
#[cfg(test)]
mod resolution_test;

pub use detection::{CollisionDetector, CollisionEvent, Detection, DirectDetector, TreeDetector};
pub use resolution::{MergeEvent, resolve_collisions, survivor_of};
pub use shape::SweptShape;
