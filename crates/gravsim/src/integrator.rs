//! Time integration for a single body
//!
//! Integration is per body and independent, so the orchestrator can run it
//! on worker threads right after that body's force evaluation.

use nalgebra::Vector2;

use crate::body::Body;

/// Advances one body by one tick given its acceleration
pub trait Integrator: Send + Sync {
    /// Applies `acceleration` (already scaled by the tick's effective
    /// gravity) to `body` and moves it
    fn advance(&self, body: &mut Body, acceleration: Vector2<f64>);
}

/// Direct Euler step in tick units
///
/// 1. `v' = v + a`
/// 2. `prior_position = position`
/// 3. `position = position + v'`
///
/// The time scale already lives inside the acceleration through the effective
/// gravitational constant, so the position update takes the new velocity as is.
///
/// # Examples
///
/// ```
/// use gravsim::body::{Body, BodyId, BodySpec};
/// use gravsim::integrator::{Euler, Integrator};
/// use nalgebra::{Point2, Vector2};
///
/// let spec = BodySpec::at_rest(Point2::new(0.0, 0.0), 10.0, 0.141);
/// let mut body = Body::new(BodyId(0), spec).unwrap();
///
/// Euler.advance(&mut body, Vector2::new(1.0, 0.0));
/// assert_eq!(body.position, Point2::new(1.0, 0.0));
/// assert_eq!(body.prior_position, Point2::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Euler;

impl Integrator for Euler {
    fn advance(&self, body: &mut Body, acceleration: Vector2<f64>) {
        let velocity = body.velocity() + acceleration;
        body.set_velocity(velocity);
        body.prior_position = body.position;
        body.position += velocity;
    }
}
