use std::f64::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::body::{Body, BodyId, BodySpec};
use crate::error::SimError;

fn body(id: u32, position: [f64; 2], mass: f64, velocity: [f64; 2]) -> Body {
    let spec = BodySpec::at_rest(Point2::new(position[0], position[1]), mass, 0.141)
        .with_velocity(Vector2::new(velocity[0], velocity[1]));
    Body::new(BodyId(id), spec).unwrap()
}

#[test]
fn test_new_rejects_bad_mass_and_density() {
    let origin = Point2::new(0.0, 0.0);

    assert!(matches!(
        Body::new(BodyId(0), BodySpec::at_rest(origin, 0.0, 0.141)),
        Err(SimError::InvalidMass(_))
    ));
    assert!(matches!(
        Body::new(BodyId(0), BodySpec::at_rest(origin, -5.0, 0.141)),
        Err(SimError::InvalidMass(_))
    ));
    assert!(matches!(
        Body::new(BodyId(0), BodySpec::at_rest(origin, f64::NAN, 0.141)),
        Err(SimError::InvalidMass(_))
    ));
    assert!(matches!(
        Body::new(BodyId(0), BodySpec::at_rest(origin, 10.0, 0.0)),
        Err(SimError::InvalidDensity(_))
    ));
    assert!(matches!(
        Body::new(BodyId(0), BodySpec::at_rest(origin, 10.0, f64::INFINITY)),
        Err(SimError::InvalidDensity(_))
    ));
}

#[test]
fn test_new_rejects_non_finite_state() {
    let at = |x: f64, y: f64| BodySpec::at_rest(Point2::new(x, y), 10.0, 0.141);

    assert!(matches!(
        Body::new(BodyId(0), at(f64::NAN, 0.0)),
        Err(SimError::InvalidPosition(_, _))
    ));
    assert!(matches!(
        Body::new(BodyId(0), at(0.0, f64::NEG_INFINITY)),
        Err(SimError::InvalidPosition(_, _))
    ));

    let fast = BodySpec { speed: f64::INFINITY, ..at(0.0, 0.0) };
    assert!(matches!(Body::new(BodyId(0), fast), Err(SimError::InvalidVelocity(_, _))));

    let lost = BodySpec { direction: f64::NAN, speed: 1.0, ..at(0.0, 0.0) };
    assert!(matches!(Body::new(BodyId(0), lost), Err(SimError::InvalidVelocity(_, _))));
}

#[test]
fn test_new_starts_with_prior_at_position() {
    let b = body(3, [12.0, 8.0], 10.0, [1.0, 0.0]);

    assert_eq!(b.id, BodyId(3));
    assert_eq!(b.prior_position, b.position);
}

#[test]
fn test_radius_from_mass_and_density() {
    let b = body(0, [0.0, 0.0], 1000.0, [0.0, 0.0]);

    // π r² ρ = m
    assert_relative_eq!(PI * b.radius() * b.radius() * 0.141, 1000.0, epsilon = 1e-9);
}

#[test]
fn test_velocity_polar_conversion() {
    let spec = BodySpec {
        position: Point2::new(0.0, 0.0),
        mass: 1.0,
        density: 0.141,
        speed: 2.0,
        direction: FRAC_PI_2,
    };
    let mut b = Body::new(BodyId(0), spec).unwrap();

    let v = b.velocity();
    assert!(v.x.abs() < 1e-12);
    assert_relative_eq!(v.y, 2.0, epsilon = 1e-12);

    b.set_velocity(Vector2::new(-3.0, 0.0));
    assert_relative_eq!(b.speed, 3.0);
    assert_relative_eq!(b.direction, PI);
}

#[test]
fn test_momentum() {
    let b = body(0, [1.0, 0.0], 2.0, [3.0, 4.0]);

    let momentum = b.momentum();
    assert_relative_eq!(momentum.x, 6.0, epsilon = 1e-12);
    assert_relative_eq!(momentum.y, 8.0, epsilon = 1e-12);
}

#[test]
fn test_kinetic_energy() {
    let b = body(0, [0.0, 0.0], 2.0, [3.0, 4.0]);

    // KE = 0.5 * 2 * 25
    assert_relative_eq!(b.kinetic_energy(), 25.0, epsilon = 1e-12);
}

#[test]
fn test_distance_to() {
    let a = body(0, [0.0, 0.0], 1.0, [0.0, 0.0]);
    let b = body(1, [3.0, 4.0], 1.0, [0.0, 0.0]);

    assert_eq!(a.distance_to(&b), 5.0);
}

#[test]
fn test_bounds_cover_disc() {
    let b = body(0, [50.0, 50.0], 100.0, [0.0, 0.0]);
    let r = b.radius();
    let bounds = b.bounds();

    assert_relative_eq!(bounds.min.x, 50.0 - r);
    assert_relative_eq!(bounds.max.y, 50.0 + r);
}

#[test]
fn test_absorb_conserves_momentum() {
    let mut heavy = body(0, [0.0, 0.0], 30.0, [1.0, 0.0]);
    let light = body(1, [1.0, 0.0], 10.0, [0.0, 4.0]);
    let before = heavy.momentum() + light.momentum();
    let radius_before = heavy.radius();

    heavy.absorb(&light);

    assert_eq!(heavy.mass(), 40.0);
    assert_relative_eq!(heavy.momentum().x, before.x, epsilon = 1e-9);
    assert_relative_eq!(heavy.momentum().y, before.y, epsilon = 1e-9);
    assert_eq!(heavy.position, Point2::new(0.0, 0.0));
    assert!(heavy.radius() > radius_before);
}

#[test]
fn test_spec_round_trips_state() {
    let b = body(0, [5.0, 6.0], 7.0, [0.5, -0.5]);
    let rebuilt = Body::new(BodyId(0), b.spec()).unwrap();

    assert_eq!(rebuilt, b);
}
