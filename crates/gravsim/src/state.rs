use std::collections::HashMap;

use nalgebra::{Point2, Vector2};

use crate::body::{Body, BodyId, BodySpec};
use crate::error::Result;

#[derive(Debug, Clone)]
struct Slot {
    body: Body,
    alive: bool,
}

/// Authoritative set of bodies, keyed by id
///
/// Bodies sit in an arena of slots. Collision resolution marks consumed
/// bodies dead instead of removing them, so slot indices stay valid for the
/// rest of the tick; [`BodyStore::compact`] reclaims the dead slots afterwards.
#[derive(Debug, Clone, Default)]
pub struct BodyStore {
    slots: Vec<Slot>,
    index: HashMap<BodyId, usize>,
    /// Next available body ID
    next_id: u32,
}

impl BodyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a spec, stores the body, and returns its new id
    ///
    /// Ids are handed out in increasing order and never reused.
    ///
    /// # Examples
    ///
    /// ```
    /// use gravsim::body::BodySpec;
    /// use gravsim::state::BodyStore;
    /// use nalgebra::Point2;
    ///
    /// let mut store = BodyStore::new();
    /// let a = store.add(BodySpec::at_rest(Point2::new(1.0, 1.0), 10.0, 0.141)).unwrap();
    /// let b = store.add(BodySpec::at_rest(Point2::new(2.0, 2.0), 10.0, 0.141)).unwrap();
    ///
    /// assert!(a < b);
    /// assert_eq!(store.len(), 2);
    /// assert!(store.add(BodySpec::at_rest(Point2::new(3.0, 3.0), -1.0, 0.141)).is_err());
    /// ```
    pub fn add(&mut self, spec: BodySpec) -> Result<BodyId> {
        let id = BodyId(self.next_id);
        let body = Body::new(id, spec)?;
        self.next_id += 1;
        self.index.insert(id, self.slots.len());
        self.slots.push(Slot { body, alive: true });
        Ok(id)
    }

    /// Removes a body outright and returns it
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let slot = self.index.remove(&id)?;
        let removed = self.slots.remove(slot);
        self.reindex();
        removed.alive.then_some(removed.body)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.index
            .get(&id)
            .map(|&slot| &self.slots[slot])
            .filter(|slot| slot.alive)
            .map(|slot| &slot.body)
    }

    /// Mutable access for collaborators that reposition a body between ticks
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        let slot = *self.index.get(&id)?;
        let slot = &mut self.slots[slot];
        slot.alive.then_some(&mut slot.body)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live bodies
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live bodies in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.slots
            .iter()
            .filter(|slot| slot.alive)
            .map(|slot| &slot.body)
    }

    pub fn ids(&self) -> Vec<BodyId> {
        self.iter().map(|b| b.id).collect()
    }

    /// Copies of the live bodies in slot order
    pub fn snapshot(&self) -> Vec<Body> {
        self.iter().copied().collect()
    }

    /// Overwrites stored bodies with same-id entries from `bodies`
    pub(crate) fn write_back(&mut self, bodies: &[Body]) {
        for body in bodies {
            if let Some(&slot) = self.index.get(&body.id) {
                self.slots[slot].body = *body;
            }
        }
    }

    /// Slot index of a live body
    pub(crate) fn slot_of(&self, id: BodyId) -> Option<usize> {
        self.index
            .get(&id)
            .copied()
            .filter(|&slot| self.slots[slot].alive)
    }

    pub(crate) fn slot_mut(&mut self, slot: usize) -> Option<&mut Body> {
        self.slots
            .get_mut(slot)
            .filter(|slot| slot.alive)
            .map(|slot| &mut slot.body)
    }

    /// Marks a slot dead without moving any other slot
    pub(crate) fn kill(&mut self, slot: usize) -> Option<Body> {
        let slot = self.slots.get_mut(slot).filter(|slot| slot.alive)?;
        slot.alive = false;
        Some(slot.body)
    }

    /// Drops dead slots and rebuilds the id index
    pub fn compact(&mut self) {
        if self.slots.iter().all(|slot| slot.alive) {
            return;
        }
        self.slots.retain(|slot| slot.alive);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .slots
            .iter()
            .enumerate()
            .map(|(slot, s)| (s.body.id, slot))
            .collect();
    }

    pub fn total_mass(&self) -> f64 {
        self.iter().map(|b| b.mass()).sum()
    }

    /// Sum of `m * v` over all live bodies
    pub fn total_momentum(&self) -> Vector2<f64> {
        self.iter()
            .map(|b| b.momentum())
            .fold(Vector2::zeros(), |acc, p| acc + p)
    }

    /// Mass-weighted centroid, or `None` for an empty store
    pub fn center_of_mass(&self) -> Option<Point2<f64>> {
        let total = self.total_mass();
        if total <= 0.0 {
            return None;
        }
        let weighted = self
            .iter()
            .map(|b| b.position.coords * b.mass())
            .fold(Vector2::zeros(), |acc, p| acc + p);
        Some(Point2::from(weighted / total))
    }
}
