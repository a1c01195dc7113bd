//! Arena-based capacity quadtree used both for Barnes-Hut gravity and for
//! collision candidate queries.
//!
//! Nodes live contiguously in a `Vec` and refer to each other by [`NodeId`].
//! The tree never owns the bodies: it stores indices into the slice it was
//! built from, so a tree borrowed for one tick is cheap to throw away.
//!
//! # Structure
//!
//! - Every node owns an axis-aligned `region` and keeps a running
//!   `total_mass` and `center_of_mass` for everything inserted beneath it.
//! - A node is either a [`NodeKind::Leaf`] holding up to `capacity` body
//!   indices, or a [`NodeKind::Internal`] node with exactly four children.
//!   Never both.
//! - A full leaf subdivides into NW, NE, SW, SE quadrants and redistributes
//!   what it held. Subdivision is never undone.
//!
//! Board coordinates grow to the right (+x) and downward (+y), so "north" is
//! the half with the smaller y.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::Point2;
//! use gravsim::body::{Body, BodyId, BodySpec};
//! use gravsim::quadtree::{QuadTree, Rect};
//!
//! let bodies = vec![
//!     Body::new(BodyId(0), BodySpec::at_rest(Point2::new(10.0, 10.0), 100.0, 0.141)).unwrap(),
//!     Body::new(BodyId(1), BodySpec::at_rest(Point2::new(90.0, 90.0), 10.0, 0.141)).unwrap(),
//! ];
//!
//! let board = Rect::new(Point2::new(0.0, 0.0), Point2::new(100.0, 100.0));
//! let tree = QuadTree::build(&bodies, board, 64);
//!
//! assert_eq!(tree.root_node().total_mass, 110.0);
//! assert!(tree.dropped().is_empty());
//! ```

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Subdivision stops here even if a leaf overflows, so bodies sharing one
/// position cannot recurse forever.
const MAX_DEPTH: u8 = 24;

/// Anything the quadtree can index: a mass at a point with a bounding box.
///
/// The bounding box decides which regions accept the item. Gravity builds
/// use the body's disc; collision builds use the box around its swept path.
pub trait Massive: Copy {
    fn position(&self) -> Point2<f64>;

    fn mass(&self) -> f64;

    fn bounds(&self) -> Rect;
}

/// Axis-aligned rectangle in board coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Rect {
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    /// Square of half-width `half_extent` centred on `center`
    pub fn around(center: Point2<f64>, half_extent: f64) -> Self {
        let offset = Vector2::new(half_extent, half_extent);
        Self {
            min: center - offset,
            max: center + offset,
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Closed-interval overlap test; shared edges count as intersecting
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn contains_point(&self, point: &Point2<f64>) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// The four equal quadrants in child order `[NW, NE, SW, SE]`
    ///
    /// ```text
    /// +-------+-------+   min.y
    /// |  NW   |  NE   |
    /// +-------+-------+
    /// |  SW   |  SE   |
    /// +-------+-------+   max.y
    /// ```
    pub fn quadrants(&self) -> [Rect; 4] {
        let c = self.center();
        [
            Rect::new(self.min, c),
            Rect::new(Point2::new(c.x, self.min.y), Point2::new(self.max.x, c.y)),
            Rect::new(Point2::new(self.min.x, c.y), Point2::new(c.x, self.max.y)),
            Rect::new(c, self.max),
        ]
    }
}

/// Index into the node arena
///
/// `u32` keeps the four child handles of an internal node at 16 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "NodeId overflow");
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Indices into the body slice, at most `capacity` unless at `MAX_DEPTH`
    Leaf(Vec<u32>),
    /// Children in `[NW, NE, SW, SE]` order
    Internal([NodeId; 4]),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub region: Rect,
    pub total_mass: f64,
    pub center_of_mass: Point2<f64>,
    pub kind: NodeKind,
    /// Union of the bounding boxes of everything beneath this node. Items may
    /// overhang `region` when they straddle an edge.
    extent: Option<Rect>,
    depth: u8,
}

impl Node {
    fn leaf(region: Rect, depth: u8) -> Self {
        Node {
            region,
            total_mass: 0.0,
            center_of_mass: region.center(),
            kind: NodeKind::Leaf(Vec::new()),
            extent: None,
            depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn extent(&self) -> Option<Rect> {
        self.extent
    }

    /// Folds one item into the running aggregate:
    /// `center = (center * M + p * m) / (M + m)`
    fn accumulate<B: Massive>(&mut self, item: &B) {
        let mass = item.mass();
        let weighted = self.center_of_mass.coords * self.total_mass + item.position().coords * mass;
        self.total_mass += mass;
        self.center_of_mass = Point2::from(weighted / self.total_mass);

        let bounds = item.bounds();
        self.extent = Some(match self.extent {
            Some(extent) => extent.union(&bounds),
            None => bounds,
        });
    }
}

/// Capacity quadtree over a borrowed slice of items
///
/// Built fresh from a slice each tick. Items whose bounding box misses the
/// root region are left out and listed in [`QuadTree::dropped`].
pub struct QuadTree<'a, B: Massive> {
    nodes: Vec<Node>,
    items: &'a [B],
    capacity: usize,
    dropped: Vec<usize>,
}

impl<'a, B: Massive> QuadTree<'a, B> {
    /// Creates a tree with a single empty leaf covering `region`
    pub fn new(items: &'a [B], region: Rect, capacity: usize) -> Self {
        QuadTree {
            nodes: vec![Node::leaf(region, 0)],
            items,
            capacity: capacity.max(1),
            dropped: Vec::new(),
        }
    }

    /// Inserts every item of `items` in slice order
    pub fn build(items: &'a [B], region: Rect, capacity: usize) -> Self {
        let mut tree = Self::new(items, region, capacity);
        for index in 0..items.len() {
            if !tree.insert(index) {
                tree.dropped.push(index);
            }
        }
        tree
    }

    /// Inserts the item at `index` of the backing slice
    ///
    /// Returns `false` (and changes nothing) when `index` is out of range or
    /// the item's bounding box does not intersect the root region.
    pub fn insert(&mut self, index: usize) -> bool {
        if self.items.get(index).is_none() {
            return false;
        }
        self.insert_at(NodeId::ROOT, index)
    }

    fn insert_at(&mut self, id: NodeId, index: usize) -> bool {
        let item = self.items[index];
        let node = &mut self.nodes[id.index()];
        if !node.region.intersects(&item.bounds()) {
            return false;
        }

        let at_max_depth = node.depth >= MAX_DEPTH;
        if let NodeKind::Leaf(held) = &mut node.kind {
            if held.len() < self.capacity || at_max_depth {
                held.push(index as u32);
                node.accumulate(&item);
                return true;
            }
            self.subdivide(id);
        }

        let NodeKind::Internal(children) = self.nodes[id.index()].kind else {
            return false;
        };

        // First child that accepts wins; a straddling item lands in one child only
        let accepted = children.iter().any(|&child| self.insert_at(child, index));
        if accepted {
            self.nodes[id.index()].accumulate(&item);
        }
        accepted
    }

    /// Splits a full leaf into four children and moves its items down.
    /// The node's own aggregate already covers them and is left untouched.
    fn subdivide(&mut self, id: NodeId) {
        let node = &self.nodes[id.index()];
        let depth = node.depth + 1;
        let quadrants = node.region.quadrants();

        let children: [NodeId; 4] = std::array::from_fn(|q| {
            let child = NodeId::new(self.nodes.len());
            self.nodes.push(Node::leaf(quadrants[q], depth));
            child
        });

        let held = match std::mem::replace(
            &mut self.nodes[id.index()].kind,
            NodeKind::Internal(children),
        ) {
            NodeKind::Leaf(held) => held,
            NodeKind::Internal(_) => Vec::new(),
        };

        for index in held {
            // Children tile the parent, so anything the parent accepted fits one of them
            let placed = children
                .iter()
                .any(|&child| self.insert_at(child, index as usize));
            debug_assert!(placed, "item {index} fit parent but no quadrant");
        }
    }

    /// Returns the indices of all items whose bounding box intersects `range`
    ///
    /// Subtrees are pruned by their occupied extent rather than their region,
    /// so items overhanging a quadrant edge are still found.
    pub fn query_range(&self, range: &Rect) -> Vec<usize> {
        let mut found = Vec::new();
        self.query_recursive(NodeId::ROOT, range, &mut found);
        found
    }

    fn query_recursive(&self, id: NodeId, range: &Rect, found: &mut Vec<usize>) {
        let node = &self.nodes[id.index()];
        match node.extent {
            Some(extent) if extent.intersects(range) => {}
            _ => return,
        }

        match &node.kind {
            NodeKind::Leaf(held) => found.extend(
                held.iter()
                    .map(|&i| i as usize)
                    .filter(|&i| self.items[i].bounds().intersects(range)),
            ),
            NodeKind::Internal(children) => {
                for &child in children {
                    self.query_recursive(child, range, found);
                }
            }
        }
    }

    /// All item indices stored anywhere beneath `id`
    pub fn indices_beneath(&self, id: NodeId) -> Vec<usize> {
        let mut found = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            match &self.nodes[next.index()].kind {
                NodeKind::Leaf(held) => found.extend(held.iter().map(|&i| i as usize)),
                NodeKind::Internal(children) => stack.extend(children.iter().copied()),
            }
        }
        found
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn root_node(&self) -> &Node {
        self.node(NodeId::ROOT)
    }

    /// Ids of every node in arena order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn items(&self) -> &'a [B] {
        self.items
    }

    /// Slice indices that [`QuadTree::build`] could not place
    pub fn dropped(&self) -> &[usize] {
        &self.dropped
    }
}
