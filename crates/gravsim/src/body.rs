use std::f64::consts::PI;

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::quadtree::{Massive, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Initial state of a body as supplied by a scenario or the creation preview
///
/// Velocity is polar: `speed` in board units per tick, `direction` in radians
/// measured from the +x axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub position: Point2<f64>,
    pub mass: f64,
    pub density: f64,
    pub speed: f64,
    pub direction: f64,
}

impl BodySpec {
    /// Creates a spec for a body that is not moving
    pub fn at_rest(position: Point2<f64>, mass: f64, density: f64) -> Self {
        Self {
            position,
            mass,
            density,
            speed: 0.0,
            direction: 0.0,
        }
    }

    /// Replaces the polar velocity with the given Cartesian vector
    pub fn with_velocity(mut self, velocity: Vector2<f64>) -> Self {
        self.speed = velocity.magnitude();
        self.direction = velocity.y.atan2(velocity.x);
        self
    }

    pub fn velocity(&self) -> Vector2<f64> {
        polar_to_cartesian(self.speed, self.direction)
    }
}

/// Physical state of one simulated point mass
///
/// Mass and density are private so the only way to change mass is
/// [`Body::absorb`], which keeps both strictly positive. The radius is always
/// derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Body {
    pub id: BodyId,
    pub position: Point2<f64>,
    /// Position at the start of the most recent tick
    pub prior_position: Point2<f64>,
    pub speed: f64,
    pub direction: f64,
    mass: f64,
    density: f64,
}

impl Body {
    /// Validates a spec and builds a body from it
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidMass`] or [`SimError::InvalidDensity`] when either
    /// value is zero, negative, or not finite. [`SimError::InvalidPosition`]
    /// or [`SimError::InvalidVelocity`] when a coordinate, the speed or the
    /// direction is NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use gravsim::body::{Body, BodyId, BodySpec};
    /// use nalgebra::Point2;
    ///
    /// let spec = BodySpec::at_rest(Point2::new(10.0, 10.0), 100.0, 0.141);
    /// let body = Body::new(BodyId(0), spec).unwrap();
    /// assert!(body.radius() > 0.0);
    ///
    /// let bad = BodySpec::at_rest(Point2::new(10.0, 10.0), 0.0, 0.141);
    /// assert!(Body::new(BodyId(1), bad).is_err());
    /// ```
    pub fn new(id: BodyId, spec: BodySpec) -> Result<Self> {
        if !(spec.mass > 0.0 && spec.mass.is_finite()) {
            return Err(SimError::InvalidMass(spec.mass));
        }
        if !(spec.density > 0.0 && spec.density.is_finite()) {
            return Err(SimError::InvalidDensity(spec.density));
        }
        if !(spec.position.x.is_finite() && spec.position.y.is_finite()) {
            return Err(SimError::InvalidPosition(spec.position.x, spec.position.y));
        }
        if !(spec.speed.is_finite() && spec.direction.is_finite()) {
            return Err(SimError::InvalidVelocity(spec.speed, spec.direction));
        }

        Ok(Self {
            id,
            position: spec.position,
            prior_position: spec.position,
            speed: spec.speed,
            direction: spec.direction,
            mass: spec.mass,
            density: spec.density,
        })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Radius of a disc of this mass and density: `sqrt(m / (ρπ))`
    pub fn radius(&self) -> f64 {
        (self.mass / (self.density * PI)).sqrt()
    }

    /// Cartesian velocity in board units per tick
    pub fn velocity(&self) -> Vector2<f64> {
        polar_to_cartesian(self.speed, self.direction)
    }

    /// Stores a Cartesian velocity back into polar form
    pub fn set_velocity(&mut self, velocity: Vector2<f64>) {
        self.speed = velocity.magnitude();
        self.direction = velocity.y.atan2(velocity.x);
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity() * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.speed * self.speed
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.position - other.position).magnitude()
    }

    /// Axis-aligned box around the body's current disc
    pub fn bounds(&self) -> Rect {
        Rect::around(self.position, self.radius())
    }

    /// Consumes `other` into this body
    ///
    /// Mass is summed and the new velocity conserves momentum:
    /// `v' = (v_self * m_self + v_other * m_other) / (m_self + m_other)`.
    /// Position, prior position, and density stay those of `self`.
    pub fn absorb(&mut self, other: &Body) {
        let total_mass = self.mass + other.mass;
        let velocity = (self.momentum() + other.momentum()) / total_mass;
        self.mass = total_mass;
        self.set_velocity(velocity);
    }

    pub fn spec(&self) -> BodySpec {
        BodySpec {
            position: self.position,
            mass: self.mass,
            density: self.density,
            speed: self.speed,
            direction: self.direction,
        }
    }
}

impl Massive for Body {
    fn position(&self) -> Point2<f64> {
        self.position
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn bounds(&self) -> Rect {
        Body::bounds(self)
    }
}

#[inline]
fn polar_to_cartesian(speed: f64, direction: f64) -> Vector2<f64> {
    Vector2::new(direction.cos() * speed, direction.sin() * speed)
}
