//! Swept collision shapes
//!
//! A body that moves further than its own diameter in one tick can skip
//! straight over another body if only end-of-tick discs are compared. The
//! swept shape covers the whole path instead: a quadrilateral built by
//! offsetting the segment `prior_position -> position` sideways by the body's
//! radius, capped at both ends by the body's disc.

use nalgebra::{Point2, Vector2};

use crate::body::Body;
use crate::quadtree::Rect;

/// Region swept by one body during the most recent tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweptShape {
    start: Point2<f64>,
    end: Point2<f64>,
    radius: f64,
    corners: [Point2<f64>; 4],
}

impl SweptShape {
    /// Builds the swept shape of `body` from `prior_position` to `position`
    ///
    /// Displacements shorter than `min_sweep_length` are treated as no
    /// motion: the offset axis falls back to +y so the corners stay defined.
    ///
    /// # Examples
    ///
    /// ```
    /// use gravsim::body::{Body, BodyId, BodySpec};
    /// use gravsim::collisions::SweptShape;
    /// use nalgebra::Point2;
    ///
    /// let mut body = Body::new(BodyId(0), BodySpec::at_rest(Point2::new(0.0, 0.0), 10.0, 0.141)).unwrap();
    /// body.prior_position = Point2::new(0.0, 0.0);
    /// body.position = Point2::new(100.0, 0.0);
    ///
    /// let shape = SweptShape::of(&body, 0.001);
    /// let corners = shape.corners();
    /// assert_eq!(corners[0].x, 0.0);
    /// assert_eq!(corners[1].x, 100.0);
    /// ```
    pub fn of(body: &Body, min_sweep_length: f64) -> Self {
        Self::between(body.prior_position, body.position, body.radius(), min_sweep_length)
    }

    pub fn between(start: Point2<f64>, end: Point2<f64>, radius: f64, min_sweep_length: f64) -> Self {
        let displacement = end - start;
        let length = displacement.magnitude();
        let direction = if length < min_sweep_length {
            Vector2::new(1.0, 0.0)
        } else {
            displacement / length.max(min_sweep_length)
        };

        let offset = Vector2::new(-direction.y, direction.x) * radius;
        let corners = [start + offset, end + offset, end - offset, start - offset];

        Self {
            start,
            end,
            radius,
            corners,
        }
    }

    /// Corners in drawing order: start+, end+, end-, start-
    pub fn corners(&self) -> [Point2<f64>; 4] {
        self.corners
    }

    pub fn start(&self) -> Point2<f64> {
        self.start
    }

    pub fn end(&self) -> Point2<f64> {
        self.end
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Axis-aligned box covering the quadrilateral and both end discs
    pub fn bounds(&self) -> Rect {
        Rect::around(self.start, self.radius).union(&Rect::around(self.end, self.radius))
    }

    /// Whether two swept shapes share any point
    ///
    /// The quadrilaterals are tested with the separating-axis theorem. The
    /// end discs are covered by a segment-distance test: two capped paths
    /// touch when their centre segments come within the sum of the radii.
    pub fn overlaps(&self, other: &SweptShape) -> bool {
        if !self.bounds().intersects(&other.bounds()) {
            return false;
        }
        quads_intersect(&self.corners, &other.corners)
            || segment_distance(self.start, self.end, other.start, other.end)
                < self.radius + other.radius
    }
}

fn quads_intersect(a: &[Point2<f64>; 4], b: &[Point2<f64>; 4]) -> bool {
    !separating_axis_exists(a, b) && !separating_axis_exists(b, a)
}

/// Looks for a gap along the edge normals of `polygon`
fn separating_axis_exists(polygon: &[Point2<f64>; 4], other: &[Point2<f64>; 4]) -> bool {
    (0..4).any(|i| {
        let edge = polygon[(i + 1) % 4] - polygon[i];
        let axis = Vector2::new(-edge.y, edge.x);
        if axis.magnitude_squared() == 0.0 {
            return false;
        }
        let (a_min, a_max) = project(polygon, &axis);
        let (b_min, b_max) = project(other, &axis);
        a_max < b_min || b_max < a_min
    })
}

fn project(polygon: &[Point2<f64>; 4], axis: &Vector2<f64>) -> (f64, f64) {
    polygon
        .iter()
        .map(|p| p.coords.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)))
}

/// Shortest distance between segments `p1-p2` and `q1-q2`
pub(crate) fn segment_distance(p1: Point2<f64>, p2: Point2<f64>, q1: Point2<f64>, q2: Point2<f64>) -> f64 {
    if segments_cross(p1, p2, q1, q2) {
        return 0.0;
    }
    point_segment_distance(p1, q1, q2)
        .min(point_segment_distance(p2, q1, q2))
        .min(point_segment_distance(q1, p1, p2))
        .min(point_segment_distance(q2, p1, p2))
}

fn point_segment_distance(point: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let ab = b - a;
    let length_sq = ab.magnitude_squared();
    if length_sq == 0.0 {
        return (point - a).magnitude();
    }
    let t = ((point - a).dot(&ab) / length_sq).clamp(0.0, 1.0);
    (point - (a + ab * t)).magnitude()
}

fn segments_cross(p1: Point2<f64>, p2: Point2<f64>, q1: Point2<f64>, q2: Point2<f64>) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Sign of the cross product `(b - a) x (c - a)`
fn orientation(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}
