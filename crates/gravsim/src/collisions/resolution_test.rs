use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::body::{Body, BodyId, BodySpec};
use crate::collisions::resolution::*;
use crate::collisions::CollisionEvent;
use crate::state::BodyStore;

fn spec(x: f64, mass: f64, velocity: [f64; 2]) -> BodySpec {
    BodySpec::at_rest(Point2::new(x, 0.0), mass, 0.141)
        .with_velocity(Vector2::new(velocity[0], velocity[1]))
}

fn event(a: BodyId, b: BodyId) -> CollisionEvent {
    CollisionEvent {
        body_a: a,
        body_b: b,
        separation: 0.0,
    }
}

#[test]
fn test_survivor_is_heavier() {
    let light = Body::new(BodyId(0), spec(0.0, 1.0, [0.0, 0.0])).unwrap();
    let heavy = Body::new(BodyId(1), spec(1.0, 2.0, [0.0, 0.0])).unwrap();

    assert_eq!(survivor_of(&light, &heavy).0.id, BodyId(1));
    assert_eq!(survivor_of(&heavy, &light).0.id, BodyId(1));
}

#[test]
fn test_survivor_tie_goes_to_lower_id() {
    let a = Body::new(BodyId(4), spec(0.0, 5.0, [0.0, 0.0])).unwrap();
    let b = Body::new(BodyId(9), spec(1.0, 5.0, [0.0, 0.0])).unwrap();

    assert_eq!(survivor_of(&a, &b).0.id, BodyId(4));
    assert_eq!(survivor_of(&b, &a).0.id, BodyId(4));
}

#[test]
fn test_merge_conserves_mass_and_momentum() {
    let mut store = BodyStore::new();
    let a = store.add(spec(1.0, 1.0, [0.0, 5.0])).unwrap();
    let b = store.add(spec(1.1, 2.0, [0.0, 3.0])).unwrap();

    let merges = resolve_collisions(&mut store, &[event(a, b)]);
    store.compact();

    assert_eq!(
        merges,
        vec![MergeEvent {
            survivor: b,
            consumed: a,
            survivor_mass: 3.0,
        }]
    );
    let merged = store.get(b).unwrap();
    // p = 1*5 + 2*3 = 11
    assert_relative_eq!(merged.momentum().y, 11.0, epsilon = 1e-9);
    assert_relative_eq!(merged.velocity().y, 11.0 / 3.0, epsilon = 1e-9);
    assert_eq!(merged.position, Point2::new(1.1, 0.0));
    assert!(store.get(a).is_none());
}

#[test]
fn test_consumed_body_is_not_merged_again() {
    let mut store = BodyStore::new();
    let small = store.add(spec(0.0, 1.0, [0.0, 0.0])).unwrap();
    let big = store.add(spec(1.0, 10.0, [0.0, 0.0])).unwrap();
    let medium = store.add(spec(2.0, 5.0, [0.0, 0.0])).unwrap();

    // small is gone after the first event, so the second is skipped
    let events = [event(small, big), event(small, medium), event(big, medium)];
    let merges = resolve_collisions(&mut store, &events);
    store.compact();

    assert_eq!(merges.len(), 2);
    assert_eq!(merges[0].consumed, small);
    assert_eq!(merges[1].consumed, medium);
    assert_eq!(merges[1].survivor_mass, 16.0);
    assert_eq!(store.ids(), vec![big]);
}

#[test]
fn test_survivor_compounds_sequentially() {
    let mut store = BodyStore::new();
    let hub = store.add(spec(0.0, 3.0, [0.0, 0.0])).unwrap();
    let a = store.add(spec(1.0, 2.0, [0.0, 0.0])).unwrap();
    let b = store.add(spec(2.0, 4.0, [0.0, 0.0])).unwrap();

    // hub eats a (3 > 2) and grows to 5, then outweighs b (5 > 4)
    let merges = resolve_collisions(&mut store, &[event(hub, a), event(hub, b)]);

    assert_eq!(merges.len(), 2);
    assert!(merges.iter().all(|m| m.survivor == hub));
    assert_eq!(store.get(hub).unwrap().mass(), 9.0);
}

#[test]
fn test_unknown_ids_are_skipped() {
    let mut store = BodyStore::new();
    let a = store.add(spec(0.0, 1.0, [0.0, 0.0])).unwrap();

    let merges = resolve_collisions(&mut store, &[event(a, BodyId(77))]);

    assert!(merges.is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_random_merges_conserve_momentum() {
    let mut rng = ChaChaRng::seed_from_u64(5);

    for _ in 0..100 {
        let mut store = BodyStore::new();
        let ids: Vec<BodyId> = (0..8)
            .map(|i| {
                let velocity = [rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0)];
                store
                    .add(spec(i as f64, rng.random_range(0.1..100.0), velocity))
                    .unwrap()
            })
            .collect();
        let mass_before = store.total_mass();
        let momentum_before = store.total_momentum();

        let events: Vec<CollisionEvent> = (0..12)
            .map(|_| {
                let a = rng.random_range(0..ids.len());
                let b = (a + rng.random_range(1..ids.len())) % ids.len();
                event(ids[a], ids[b])
            })
            .collect();
        let merges = resolve_collisions(&mut store, &events);
        store.compact();

        assert_eq!(store.len(), ids.len() - merges.len());
        assert_relative_eq!(store.total_mass(), mass_before, max_relative = 1e-12);
        let momentum_after = store.total_momentum();
        assert_relative_eq!(momentum_after.x, momentum_before.x, epsilon = 1e-9);
        assert_relative_eq!(momentum_after.y, momentum_before.y, epsilon = 1e-9);
    }
}
