use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::body::{Body, BodyId, BodySpec};
use crate::integrator::{Euler, Integrator};

fn moving_body(velocity: Vector2<f64>) -> Body {
    let spec = BodySpec::at_rest(Point2::new(10.0, 20.0), 5.0, 0.141).with_velocity(velocity);
    Body::new(BodyId(0), spec).unwrap()
}

#[test]
fn test_euler_adds_acceleration_then_moves() {
    let mut body = moving_body(Vector2::new(1.0, 0.0));

    Euler.advance(&mut body, Vector2::new(0.0, 2.0));

    // v' = (1, 2); x' = x + v'
    assert_relative_eq!(body.position.x, 11.0, epsilon = 1e-12);
    assert_relative_eq!(body.position.y, 22.0, epsilon = 1e-12);
    assert_relative_eq!(body.speed, 5f64.sqrt(), epsilon = 1e-12);
    assert_relative_eq!(body.direction, 2f64.atan2(1.0), epsilon = 1e-12);
}

#[test]
fn test_euler_saves_prior_position() {
    let mut body = moving_body(Vector2::new(3.0, 4.0));

    Euler.advance(&mut body, Vector2::zeros());
    assert_eq!(body.prior_position, Point2::new(10.0, 20.0));

    Euler.advance(&mut body, Vector2::zeros());
    assert_relative_eq!(body.prior_position.x, 13.0, epsilon = 1e-12);
    assert_relative_eq!(body.prior_position.y, 24.0, epsilon = 1e-12);
}

#[test]
fn test_euler_at_rest_with_no_force_stays_put() {
    let mut body = moving_body(Vector2::zeros());

    Euler.advance(&mut body, Vector2::zeros());

    assert_eq!(body.position, Point2::new(10.0, 20.0));
    assert_eq!(body.speed, 0.0);
}
