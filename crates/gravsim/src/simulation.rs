//! Tick orchestration
//!
//! Each call to [`Simulation::step`] runs, in order:
//! 1. Build a quadtree over the tick's starting positions
//! 2. Compute every body's acceleration and integrate it on the worker pool
//! 3. Publish the moved bodies to the store
//! 4. Detect swept-shape collisions on the new positions and merge pairs
//! 5. Compact the store
//!
//! Steps 1, 3, 4 and 5 are single-threaded. Step 2 reads the frozen tree from
//! every worker and joins before anything else touches the store.

use std::collections::HashSet;

use nalgebra::{Point2, Vector2};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::body::{Body, BodyId, BodySpec};
use crate::collisions::{CollisionDetector, MergeEvent, TreeDetector, resolve_collisions};
use crate::config::SimulationConfig;
use crate::error::{Result, SimError};
use crate::forces::{ForceModel, TreeGravity};
use crate::integrator::{Euler, Integrator};
use crate::preview::{self, Preview};
use crate::quadtree::QuadTree;
use crate::state::BodyStore;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// Tick counter after this step, starting at 1
    pub tick: u64,
    /// Merges in the order they were applied
    pub merges: Vec<MergeEvent>,
    /// Bodies left out of force or collision work because they sit off the board
    pub dropped: Vec<BodyId>,
    /// Bodies whose speed jumped by more than the configured ratio
    pub velocity_spikes: Vec<BodyId>,
}

/// Owns the body set and the worker pool that advances it
///
/// # Examples
///
/// ```
/// use gravsim::config::SimulationConfig;
/// use gravsim::scenario::Scenario;
/// use gravsim::simulation::Simulation;
///
/// let config = SimulationConfig::default();
/// let bodies = Scenario::SolarSystem.bodies(&config);
/// let mut sim = Simulation::new(config, bodies).unwrap();
///
/// let report = sim.step(1.0).unwrap();
/// assert_eq!(report.tick, 1);
/// assert_eq!(sim.bodies().len(), 3);
///
/// sim.shutdown();
/// ```
pub struct Simulation {
    config: SimulationConfig,
    store: BodyStore,
    gravity: TreeGravity,
    integrator: Euler,
    detector: TreeDetector,
    pool: ThreadPool,
    preview: Option<Preview>,
    /// Mass the next preview starts with
    preview_mass: f64,
    tick: u64,
}

impl Simulation {
    /// Validates the config, starts the worker pool and loads the initial bodies
    ///
    /// # Errors
    ///
    /// Any invalid config value or body spec, or a pool that fails to start.
    pub fn new(config: SimulationConfig, specs: impl IntoIterator<Item = BodySpec>) -> Result<Self> {
        config.validate()?;

        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("gravsim-worker-{i}"));
        if let Some(threads) = config.worker_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;
        debug!(threads = pool.current_num_threads(), "worker pool started");

        let mut store = BodyStore::new();
        for spec in specs {
            store.add(spec)?;
        }

        Ok(Self {
            gravity: TreeGravity::from_config(&config),
            integrator: Euler,
            detector: TreeDetector::from_config(&config),
            config,
            store,
            pool,
            preview: None,
            preview_mass: preview::DEFAULT_MASS,
            tick: 0,
        })
    }

    pub fn add_body(&mut self, spec: BodySpec) -> Result<BodyId> {
        self.store.add(spec)
    }

    pub fn remove_body(&mut self, id: BodyId) -> Result<Body> {
        self.store.remove(id).ok_or(SimError::UnknownBody(id))
    }

    /// The authoritative body set as of the last completed tick
    pub fn bodies(&self) -> &BodyStore {
        &self.store
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Advances the simulation by one tick
    ///
    /// `time_scale` multiplies the gravitational constant. Zero pauses: the
    /// tick counter moves but no body does.
    ///
    /// # Errors
    ///
    /// [`SimError::NegativeTimeScale`] for a negative or non-finite scale.
    /// Nothing is changed in that case.
    pub fn step(&mut self, time_scale: f64) -> Result<TickReport> {
        if !(time_scale >= 0.0 && time_scale.is_finite()) {
            return Err(SimError::NegativeTimeScale(time_scale));
        }

        self.tick += 1;
        let tick = self.tick;
        trace!(tick, time_scale, bodies = self.store.len(), "tick started");

        if time_scale == 0.0 {
            return Ok(TickReport {
                tick,
                ..TickReport::default()
            });
        }

        let gravity = self.config.gravity_constant * time_scale;
        let snapshot = self.store.snapshot();
        let tree = QuadTree::build(&snapshot, self.config.board.rect(), self.config.node_capacity);
        let off_board: HashSet<usize> = tree.dropped().iter().copied().collect();

        let (model, integrator) = (&self.gravity, &self.integrator);
        let advanced: Vec<Body> = self.pool.install(|| {
            snapshot
                .par_iter()
                .enumerate()
                .map(|(index, body)| {
                    let mut body = *body;
                    let acceleration = if off_board.contains(&index) {
                        Vector2::zeros()
                    } else {
                        model.acceleration(&tree, index, gravity)
                    };
                    integrator.advance(&mut body, acceleration);
                    body
                })
                .collect()
        });

        let velocity_spikes = self.velocity_spikes(&snapshot, &advanced);
        self.store.write_back(&advanced);

        let detection = self.detector.detect(&advanced);
        let merges = resolve_collisions(&mut self.store, &detection.events);
        self.store.compact();

        let mut dropped: Vec<BodyId> = tree
            .dropped()
            .iter()
            .map(|&index| snapshot[index].id)
            .chain(detection.dropped)
            .collect();
        dropped.sort_unstable();
        dropped.dedup();
        for id in &dropped {
            warn!(tick, body = id.0, "body outside the board, skipped for this tick");
        }

        trace!(tick, bodies = self.store.len(), merges = merges.len(), "tick finished");

        Ok(TickReport {
            tick,
            merges,
            dropped,
            velocity_spikes,
        })
    }

    fn velocity_spikes(&self, before: &[Body], after: &[Body]) -> Vec<BodyId> {
        let ratio = self.config.velocity_spike_ratio;
        before
            .iter()
            .zip(after)
            .filter(|(old, new)| old.speed > 0.0 && new.speed > old.speed * ratio)
            .map(|(old, new)| {
                warn!(
                    tick = self.tick,
                    body = new.id.0,
                    from = old.speed,
                    to = new.speed,
                    "velocity spike"
                );
                new.id
            })
            .collect()
    }

    /// Starts placing a new body at `anchor`
    ///
    /// The mass carries over from the last preview, committed or cancelled, or
    /// from the one in progress, which this replaces.
    pub fn begin_preview(&mut self, anchor: Point2<f64>) -> &mut Preview {
        let mass = self.preview.as_ref().map_or(self.preview_mass, Preview::mass);
        self.preview
            .insert(Preview::begin(anchor, mass, preview::DEFAULT_DENSITY))
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn preview_mut(&mut self) -> Option<&mut Preview> {
        self.preview.as_mut()
    }

    pub fn cancel_preview(&mut self) -> Option<Preview> {
        let preview = self.preview.take()?;
        self.preview_mass = preview.mass();
        Some(preview)
    }

    /// Adds the preview to the body set
    ///
    /// Returns `Ok(None)` when no preview is in progress. The preview is
    /// consumed either way.
    pub fn commit_preview(&mut self) -> Result<Option<BodyId>> {
        let Some(preview) = self.preview.take() else {
            return Ok(None);
        };
        self.preview_mass = preview.mass();
        self.store.add(preview.spec()).map(Some)
    }

    /// Stops the worker pool and hands back the final body set
    pub fn shutdown(self) -> BodyStore {
        let Simulation { store, pool, tick, .. } = self;
        drop(pool);
        debug!(tick, "worker pool stopped");
        store
    }
}
