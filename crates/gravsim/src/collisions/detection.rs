//! Collision detection on end-of-tick positions
//!
//! Provides two detectors:
//! - DirectDetector: O(N²) pair scan, for small sets and cross-checking
//! - TreeDetector: quadtree range queries over swept bounding boxes

use std::collections::HashSet;

use nalgebra::Point2;

use crate::body::{Body, BodyId};
use crate::collisions::shape::SweptShape;
use crate::config::SimulationConfig;
use crate::quadtree::{Massive, QuadTree, Rect};

/// Two bodies whose swept shapes overlap this tick
///
/// `body_a` always comes before `body_b` in the slice the detector scanned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Distance between end-of-tick centres
    pub separation: f64,
}

/// Everything a detector found in one pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    /// Overlapping pairs in scan order
    pub events: Vec<CollisionEvent>,
    /// Bodies left out because their swept box misses the board
    pub dropped: Vec<BodyId>,
}

/// Collision detector trait
pub trait CollisionDetector: Send + Sync {
    /// Finds every overlapping pair among `bodies`
    ///
    /// Events come out ordered by the slice position of `body_a`, then of
    /// `body_b`, so resolution order is reproducible.
    fn detect(&self, bodies: &[Body]) -> Detection;
}

/// A body's swept shape as a quadtree item
#[derive(Debug, Clone, Copy)]
struct Swept {
    shape: SweptShape,
    mass: f64,
}

impl Massive for Swept {
    fn position(&self) -> Point2<f64> {
        self.shape.end()
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn bounds(&self) -> Rect {
        self.shape.bounds()
    }
}

fn sweep_all(bodies: &[Body], min_sweep_length: f64) -> Vec<Swept> {
    bodies
        .iter()
        .map(|body| Swept {
            shape: SweptShape::of(body, min_sweep_length),
            mass: body.mass(),
        })
        .collect()
}

fn event(a: &Body, b: &Body) -> CollisionEvent {
    CollisionEvent {
        body_a: a.id,
        body_b: b.id,
        separation: a.distance_to(b),
    }
}

/// Direct O(N²) detector
///
/// Checks every pair. No board bounds apply, so nothing is ever dropped.
///
/// # Examples
///
/// ```
/// use gravsim::body::{Body, BodyId, BodySpec};
/// use gravsim::collisions::{CollisionDetector, DirectDetector};
/// use nalgebra::Point2;
///
/// let bodies = vec![
///     Body::new(BodyId(0), BodySpec::at_rest(Point2::new(0.0, 0.0), 100.0, 0.141)).unwrap(),
///     Body::new(BodyId(1), BodySpec::at_rest(Point2::new(5.0, 0.0), 100.0, 0.141)).unwrap(),
/// ];
///
/// let detection = DirectDetector::default().detect(&bodies);
/// assert_eq!(detection.events.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DirectDetector {
    pub min_sweep_length: f64,
}

impl Default for DirectDetector {
    fn default() -> Self {
        Self {
            min_sweep_length: SimulationConfig::default().min_sweep_length,
        }
    }
}

impl CollisionDetector for DirectDetector {
    fn detect(&self, bodies: &[Body]) -> Detection {
        let swept = sweep_all(bodies, self.min_sweep_length);
        let n = bodies.len();

        let events = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter(|&(i, j)| swept[i].shape.overlaps(&swept[j].shape))
            .map(|(i, j)| event(&bodies[i], &bodies[j]))
            .collect();

        Detection {
            events,
            dropped: Vec::new(),
        }
    }
}

/// Quadtree-backed detector
///
/// Rebuilds a quadtree over the bodies' swept bounding boxes, then for each
/// body queries the boxes that touch its own and runs the precise overlap
/// test only on those candidates.
#[derive(Debug, Clone, Copy)]
pub struct TreeDetector {
    pub board: Rect,
    pub capacity: usize,
    pub min_sweep_length: f64,
}

impl TreeDetector {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            board: config.board.rect(),
            capacity: config.node_capacity,
            min_sweep_length: config.min_sweep_length,
        }
    }
}

impl Default for TreeDetector {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl CollisionDetector for TreeDetector {
    fn detect(&self, bodies: &[Body]) -> Detection {
        if bodies.is_empty() {
            return Detection::default();
        }

        let swept = sweep_all(bodies, self.min_sweep_length);
        let tree = QuadTree::build(&swept, self.board, self.capacity);

        let excluded: HashSet<usize> = tree.dropped().iter().copied().collect();

        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for (i, item) in swept.iter().enumerate() {
            if excluded.contains(&i) {
                continue;
            }
            pairs.extend(
                tree.query_range(&item.bounds())
                    .into_iter()
                    // Canonical ordering: each pair is reported from its lower index only
                    .filter(|&j| j > i)
                    .filter(|&j| item.shape.overlaps(&swept[j].shape))
                    .map(|j| (i, j)),
            );
        }
        pairs.sort_unstable();

        Detection {
            events: pairs
                .into_iter()
                .map(|(i, j)| event(&bodies[i], &bodies[j]))
                .collect(),
            dropped: tree.dropped().iter().map(|&i| bodies[i].id).collect(),
        }
    }
}
