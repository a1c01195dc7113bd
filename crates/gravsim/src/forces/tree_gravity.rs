//! Tree-based gravity using the Barnes-Hut approximation (O(N log N))

use nalgebra::{Point2, Vector2};

use crate::body::Body;
use crate::config::SimulationConfig;
use crate::forces::ForceModel;
use crate::quadtree::{Node, NodeId, NodeKind, QuadTree};

/// Barnes-Hut gravitational acceleration over a [`QuadTree`]
///
/// A node is collapsed into a single point mass at its centre of mass when
/// `size / distance < theta`, or when it is a leaf holding exactly one other
/// body. `size` is the longer side of the node's region or of the extent its
/// bodies occupy, whichever is larger. Otherwise its children (or, for a leaf, its bodies) are
/// visited individually.
///
/// # Opening Angle (θ)
///
/// - θ = 0.0: exact pairwise sum
/// - θ = 0.5: default
/// - θ = 1.0: faster and coarser
///
/// # Examples
///
/// ```
/// use gravsim::body::{Body, BodyId, BodySpec};
/// use gravsim::forces::{ForceModel, TreeGravity};
/// use gravsim::quadtree::{QuadTree, Rect};
/// use nalgebra::Point2;
///
/// let bodies = vec![
///     Body::new(BodyId(0), BodySpec::at_rest(Point2::new(100.0, 500.0), 1000.0, 0.141)).unwrap(),
///     Body::new(BodyId(1), BodySpec::at_rest(Point2::new(900.0, 500.0), 10.0, 0.141)).unwrap(),
/// ];
/// let board = Rect::new(Point2::new(0.0, 0.0), Point2::new(1000.0, 1000.0));
/// let tree = QuadTree::build(&bodies, board, 64);
///
/// let accel = TreeGravity::new().acceleration(&tree, 1, 0.1);
/// assert!(accel.x < 0.0); // pulled back toward the heavy body
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TreeGravity {
    /// Opening angle threshold
    pub theta: f64,
    /// Floor applied to every separation before dividing by it
    pub epsilon: f64,
}

impl TreeGravity {
    /// Creates tree gravity with θ = 0.5 and a 1e-5 distance floor
    pub fn new() -> Self {
        Self {
            theta: 0.5,
            epsilon: 1e-5,
        }
    }

    pub fn with_theta(theta: f64) -> Self {
        Self {
            theta,
            ..Self::new()
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            theta: config.theta,
            epsilon: config.distance_epsilon,
        }
    }

    fn accumulate(
        &self,
        tree: &QuadTree<'_, Body>,
        id: NodeId,
        index: usize,
        target: &Body,
        gravity: f64,
    ) -> Vector2<f64> {
        let node = tree.node(id);
        if node.total_mass <= 0.0 {
            return Vector2::zeros();
        }

        match &node.kind {
            NodeKind::Leaf(held) => {
                if let [only] = held.as_slice() {
                    if *only as usize == index {
                        return Vector2::zeros();
                    }
                    return self.point_mass(target.position, node.center_of_mass, node.total_mass, gravity);
                }

                if self.is_far(node, target) {
                    return self.point_mass(target.position, node.center_of_mass, node.total_mass, gravity);
                }

                let bodies = tree.items();
                held.iter()
                    .map(|&i| i as usize)
                    .filter(|&i| i != index)
                    .map(|i| {
                        let other = &bodies[i];
                        self.point_mass(target.position, other.position, other.mass(), gravity)
                    })
                    .fold(Vector2::zeros(), |a, b| a + b)
            }

            NodeKind::Internal(children) => {
                if self.is_far(node, target) {
                    return self.point_mass(target.position, node.center_of_mass, node.total_mass, gravity);
                }

                children
                    .iter()
                    .map(|&child| self.accumulate(tree, child, index, target, gravity))
                    .fold(Vector2::zeros(), |a, b| a + b)
            }
        }
    }

    /// Barnes-Hut criterion `s / d < θ`
    ///
    /// A node whose occupied extent contains the target may hold the target
    /// itself, so it is never collapsed.
    fn is_far(&self, node: &Node, target: &Body) -> bool {
        if node
            .extent()
            .is_some_and(|extent| extent.contains_point(&target.position))
        {
            return false;
        }

        let distance = (node.center_of_mass - target.position)
            .magnitude()
            .max(self.epsilon);
        node_size(node) / distance < self.theta
    }

    /// `a = G * M / d²` directed from `from` toward `toward`
    ///
    /// The force `G * m * M / d²` divided by the target mass `m`, which cancels.
    #[inline]
    fn point_mass(&self, from: Point2<f64>, toward: Point2<f64>, mass: f64, gravity: f64) -> Vector2<f64> {
        let diff = toward - from;
        let distance = diff.magnitude().max(self.epsilon);
        diff / distance * (gravity * mass / (distance * distance))
    }
}

/// Side length `s` used by the opening test
///
/// Bodies are filed under the first quadrant their disc touches, so a node
/// can hold centres up to one radius outside its region. The occupied extent
/// bounds those centres; the larger of the two sides is used.
fn node_size(node: &Node) -> f64 {
    let region = node.region.width().max(node.region.height());
    match node.extent() {
        Some(extent) => region.max(extent.width()).max(extent.height()),
        None => region,
    }
}

impl Default for TreeGravity {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceModel for TreeGravity {
    fn acceleration(&self, tree: &QuadTree<'_, Body>, index: usize, gravity: f64) -> Vector2<f64> {
        let Some(target) = tree.items().get(index) else {
            return Vector2::zeros();
        };
        if gravity == 0.0 {
            return Vector2::zeros();
        }
        self.accumulate(tree, NodeId::ROOT, index, target, gravity)
    }
}
