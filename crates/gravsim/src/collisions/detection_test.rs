use nalgebra::{Point2, Vector2};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::body::{Body, BodyId, BodySpec};
use crate::collisions::{CollisionDetector, DirectDetector, TreeDetector};
use crate::quadtree::Rect;

fn body_at(id: u32, x: f64, y: f64, mass: f64) -> Body {
    Body::new(BodyId(id), BodySpec::at_rest(Point2::new(x, y), mass, 0.141)).unwrap()
}

/// A body that moved from `from` to its current position this tick
fn moved(id: u32, from: [f64; 2], to: [f64; 2], mass: f64) -> Body {
    let mut body = body_at(id, to[0], to[1], mass);
    body.prior_position = Point2::new(from[0], from[1]);
    body
}

fn tree_detector() -> TreeDetector {
    TreeDetector {
        board: Rect::new(Point2::new(0.0, 0.0), Point2::new(1000.0, 1000.0)),
        capacity: 4,
        min_sweep_length: 0.001,
    }
}

#[test]
fn test_overlapping_pair_found() {
    let bodies = vec![body_at(0, 100.0, 100.0, 100.0), body_at(1, 110.0, 100.0, 100.0)];

    let detection = tree_detector().detect(&bodies);
    assert_eq!(detection.events.len(), 1);
    assert_eq!(detection.events[0].body_a, BodyId(0));
    assert_eq!(detection.events[0].body_b, BodyId(1));
    assert_eq!(detection.events[0].separation, 10.0);
}

#[test]
fn test_separated_pair_not_found() {
    let bodies = vec![body_at(0, 100.0, 100.0, 100.0), body_at(1, 300.0, 100.0, 100.0)];

    assert!(tree_detector().detect(&bodies).events.is_empty());
    assert!(DirectDetector::default().detect(&bodies).events.is_empty());
}

#[test]
fn test_tunneling_mover_found() {
    // Ends far past the target; the end-of-tick discs are 200 apart
    let bodies = vec![
        body_at(0, 500.0, 500.0, 100.0),
        moved(1, [300.0, 500.0], [700.0, 500.0], 1.0),
    ];

    let detection = tree_detector().detect(&bodies);
    assert_eq!(detection.events.len(), 1);
    assert!(detection.events[0].separation > 100.0);
}

#[test]
fn test_off_board_body_is_dropped() {
    let bodies = vec![body_at(0, 100.0, 100.0, 10.0), body_at(1, -500.0, 100.0, 10.0)];

    let detection = tree_detector().detect(&bodies);
    assert!(detection.events.is_empty());
    assert_eq!(detection.dropped, vec![BodyId(1)]);
}

#[test]
fn test_each_pair_reported_once() {
    let bodies: Vec<Body> = (0..5).map(|i| body_at(i, 500.0 + i as f64, 500.0, 50.0)).collect();

    let detection = tree_detector().detect(&bodies);
    // Every pair of five coincident-ish bodies
    assert_eq!(detection.events.len(), 10);
    assert!(detection.events.iter().all(|e| e.body_a < e.body_b));
}

#[test]
fn test_tree_agrees_with_direct() {
    let mut rng = ChaChaRng::seed_from_u64(2024);

    for _ in 0..20 {
        let bodies: Vec<Body> = (0..150)
            .map(|i| {
                let to = Point2::new(rng.random_range(20.0..980.0), rng.random_range(20.0..980.0));
                let step = Vector2::new(rng.random_range(-40.0..40.0), rng.random_range(-40.0..40.0));
                let from = to - step;
                moved(i, [from.x, from.y], [to.x, to.y], rng.random_range(1.0..60.0))
            })
            .collect();

        let tree = tree_detector().detect(&bodies);
        let direct = DirectDetector::default().detect(&bodies);

        assert!(tree.dropped.is_empty());
        assert_eq!(tree.events, direct.events);
    }
}
