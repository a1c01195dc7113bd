//! A body being placed by the user before it joins the simulation
//!
//! The preview is anchored where placement started. Dragging away from the
//! anchor sets the launch velocity; growing and shrinking scale the mass.

use nalgebra::Point2;

use crate::body::BodySpec;

/// Launch speed per unit of drag distance
pub const VELOCITY_MULTIPLIER: f64 = 0.01;
/// Mass factor for one grow or shrink step
pub const MASS_STEP: f64 = 1.1;
pub const DEFAULT_MASS: f64 = 10.0;
pub const DEFAULT_DENSITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preview {
    anchor: Point2<f64>,
    mass: f64,
    density: f64,
    speed: f64,
    direction: f64,
}

impl Preview {
    pub fn begin(anchor: Point2<f64>, mass: f64, density: f64) -> Self {
        Self {
            anchor,
            mass,
            density,
            speed: 0.0,
            direction: 0.0,
        }
    }

    /// Aims the launch from the anchor towards `point`
    ///
    /// # Examples
    ///
    /// ```
    /// use gravsim::preview::Preview;
    /// use nalgebra::Point2;
    ///
    /// let mut preview = Preview::begin(Point2::new(0.0, 0.0), 10.0, 0.1);
    /// preview.drag_to(Point2::new(0.0, 300.0));
    ///
    /// let spec = preview.spec();
    /// assert_eq!(spec.position, Point2::new(0.0, 0.0));
    /// assert!((spec.speed - 3.0).abs() < 1e-12);
    /// ```
    pub fn drag_to(&mut self, point: Point2<f64>) {
        let drag = point - self.anchor;
        self.speed = drag.magnitude() * VELOCITY_MULTIPLIER;
        self.direction = drag.y.atan2(drag.x);
    }

    pub fn grow(&mut self) {
        self.mass *= MASS_STEP;
    }

    pub fn shrink(&mut self) {
        self.mass /= MASS_STEP;
    }

    pub fn anchor(&self) -> Point2<f64> {
        self.anchor
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// The body this preview would become, for rendering or committing
    pub fn spec(&self) -> BodySpec {
        BodySpec {
            position: self.anchor,
            mass: self.mass,
            density: self.density,
            speed: self.speed,
            direction: self.direction,
        }
    }
}

impl Default for Preview {
    fn default() -> Self {
        Self::begin(Point2::origin(), DEFAULT_MASS, DEFAULT_DENSITY)
    }
}
