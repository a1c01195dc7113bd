//! Ready-made initial body sets
//!
//! Scenarios only produce [`BodySpec`]s. They are validated like any other
//! input when handed to [`crate::simulation::Simulation::new`].

use std::f64::consts::TAU;

use nalgebra::{Point2, Vector2};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};

use crate::body::BodySpec;
use crate::config::{Board, SimulationConfig};

/// Density shared by every scenario body
pub const DEFAULT_DENSITY: f64 = 0.141;

pub const SUN_MASS: f64 = 33_300.0;
pub const URATH_MASS: f64 = 1_000.0;
pub const WOON_MASS: f64 = 12.0;

/// Fraction of circular speed given to solar-system satellites
pub const SATELLITE_SPEED_FACTOR: f64 = 0.7;

/// Ranges used by [`Scenario::RandomField`]
pub const RANDOM_FIELD_MAX_MASS: f64 = 1_000.0;
pub const RANDOM_FIELD_MAX_SPEED: f64 = 1.0;

/// Speed of a circular orbit: `sqrt(G * M / r)`
///
/// # Examples
///
/// ```
/// use gravsim::scenario::orbital_speed;
///
/// assert_eq!(orbital_speed(0.1, 1000.0, 100.0), 1.0);
/// ```
pub fn orbital_speed(gravity_constant: f64, central_mass: f64, radius: f64) -> f64 {
    (gravity_constant * central_mass / radius).sqrt()
}

/// A satellite of `central`, placed `radius` along +x
///
/// Velocity is tangential (+y) at `speed_factor` times the circular speed,
/// on top of the central body's own velocity so the pair moves together.
pub fn orbiting(
    central: &BodySpec,
    radius: f64,
    mass: f64,
    density: f64,
    gravity_constant: f64,
    speed_factor: f64,
) -> BodySpec {
    let speed = speed_factor * orbital_speed(gravity_constant, central.mass, radius);
    let velocity = central.velocity() + Vector2::new(0.0, speed);

    BodySpec::at_rest(central.position + Vector2::new(radius, 0.0), mass, density)
        .with_velocity(velocity)
}

/// Sun, planet and moon
///
/// The planet orbits at 40% of the board's shorter side from the centre and
/// its moon at a twentieth of that.
pub fn solar_system(board: &Board, gravity_constant: f64) -> Vec<BodySpec> {
    let orbit_radius = 0.4 * board.width.min(board.height);

    let sun = BodySpec::at_rest(board.center(), SUN_MASS, DEFAULT_DENSITY);
    let urath = orbiting(
        &sun,
        orbit_radius,
        URATH_MASS,
        DEFAULT_DENSITY,
        gravity_constant,
        SATELLITE_SPEED_FACTOR,
    );
    let woon = orbiting(
        &urath,
        orbit_radius / 20.0,
        WOON_MASS,
        DEFAULT_DENSITY,
        gravity_constant,
        SATELLITE_SPEED_FACTOR,
    );

    vec![sun, urath, woon]
}

/// `count` bodies scattered uniformly over the board
///
/// Same seed, same field. Masses fall in `[max_mass / 100, max_mass]`,
/// speeds in `[0, max_speed)` with uniformly random headings.
pub fn random_field(seed: u64, count: usize, max_mass: f64, max_speed: f64, board: &Board) -> Vec<BodySpec> {
    let mut rng = ChaChaRng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let position = Point2::new(
                board.origin.x + rng.random::<f64>() * board.width,
                board.origin.y + rng.random::<f64>() * board.height,
            );
            let mass = max_mass * rng.random_range(0.01..=1.0);
            BodySpec {
                position,
                mass,
                density: DEFAULT_DENSITY,
                speed: rng.random::<f64>() * max_speed,
                direction: rng.random_range(0.0..TAU),
            }
        })
        .collect()
}

/// Two equal bodies heading at each other along the board's horizontal centre line
pub fn collision_course(board: &Board) -> Vec<BodySpec> {
    let center = board.center();
    let offset = Vector2::new(board.width * 0.1, 0.0);
    let speed = 2.0;

    vec![
        BodySpec::at_rest(center - offset, 100.0, DEFAULT_DENSITY)
            .with_velocity(Vector2::new(speed, 0.0)),
        BodySpec::at_rest(center + offset, 100.0, DEFAULT_DENSITY)
            .with_velocity(Vector2::new(-speed, 0.0)),
    ]
}

/// Selectable starting configurations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Scenario {
    SolarSystem,
    RandomField { seed: u64, count: usize },
    CollisionCourse,
}

impl Scenario {
    /// Initial bodies for this scenario on the configured board
    pub fn bodies(&self, config: &SimulationConfig) -> Vec<BodySpec> {
        match *self {
            Scenario::SolarSystem => solar_system(&config.board, config.gravity_constant),
            Scenario::RandomField { seed, count } => random_field(
                seed,
                count,
                RANDOM_FIELD_MAX_MASS,
                RANDOM_FIELD_MAX_SPEED,
                &config.board,
            ),
            Scenario::CollisionCourse => collision_course(&config.board),
        }
    }
}
