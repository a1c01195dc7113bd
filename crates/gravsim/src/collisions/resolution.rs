//! Collision resolution through momentum-conserving mergers
//!
//! The heavier body of each colliding pair absorbs the lighter one:
//! - Mass is summed onto the survivor
//! - Momentum is conserved: `v' = (v_h * m_h + v_l * m_l) / (m_h + m_l)`
//! - The survivor keeps its position and density, so its radius grows

use serde::Serialize;
use tracing::debug;

use crate::body::{Body, BodyId};
use crate::collisions::CollisionEvent;
use crate::state::BodyStore;

/// One body consumed by another during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MergeEvent {
    pub survivor: BodyId,
    pub consumed: BodyId,
    /// Survivor mass after the merge
    pub survivor_mass: f64,
}

/// Decides which of two bodies survives a merge
///
/// Greater mass wins; equal masses go to the lower id.
///
/// # Returns
///
/// `(survivor, consumed)`
pub fn survivor_of<'a>(a: &'a Body, b: &'a Body) -> (&'a Body, &'a Body) {
    if a.mass() > b.mass() || (a.mass() == b.mass() && a.id < b.id) {
        (a, b)
    } else {
        (b, a)
    }
}

/// Applies every collision event to the store, in event order
///
/// Before each merge both bodies are checked against the store's liveness
/// flags, so a body consumed earlier in the tick is never merged again
/// while one survivor can absorb several bodies in sequence. Consumed bodies
/// are only marked dead here; the caller compacts the store afterwards.
///
/// # Examples
///
/// ```
/// use gravsim::body::BodySpec;
/// use gravsim::collisions::{resolve_collisions, CollisionEvent};
/// use gravsim::state::BodyStore;
/// use nalgebra::Point2;
///
/// let mut store = BodyStore::new();
/// let a = store.add(BodySpec::at_rest(Point2::new(0.0, 0.0), 30.0, 0.141)).unwrap();
/// let b = store.add(BodySpec::at_rest(Point2::new(1.0, 0.0), 10.0, 0.141)).unwrap();
///
/// let events = vec![CollisionEvent { body_a: a, body_b: b, separation: 1.0 }];
/// let merges = resolve_collisions(&mut store, &events);
/// store.compact();
///
/// assert_eq!(merges.len(), 1);
/// assert_eq!(store.len(), 1);
/// assert_eq!(store.get(a).unwrap().mass(), 40.0);
/// ```
pub fn resolve_collisions(store: &mut BodyStore, events: &[CollisionEvent]) -> Vec<MergeEvent> {
    let mut merges = Vec::new();

    for event in events {
        // Skip if either body was already consumed
        let (Some(slot_a), Some(slot_b)) = (store.slot_of(event.body_a), store.slot_of(event.body_b))
        else {
            continue;
        };
        let (Some(a), Some(b)) = (store.slot_mut(slot_a).copied(), store.slot_mut(slot_b).copied())
        else {
            continue;
        };

        let (survivor, consumed) = survivor_of(&a, &b);
        let (survivor_slot, consumed_slot) = if survivor.id == a.id {
            (slot_a, slot_b)
        } else {
            (slot_b, slot_a)
        };
        let consumed = *consumed;

        let Some(target) = store.slot_mut(survivor_slot) else {
            continue;
        };
        target.absorb(&consumed);
        let merge = MergeEvent {
            survivor: target.id,
            consumed: consumed.id,
            survivor_mass: target.mass(),
        };
        store.kill(consumed_slot);

        debug!(
            survivor = merge.survivor.0,
            consumed = merge.consumed.0,
            mass = merge.survivor_mass,
            "bodies merged"
        );
        merges.push(merge);
    }

    merges
}
