//! The substrate: owner of every junction and tubule, and the per-tick
//! pipeline that moves them.
//!
//! A typical driver loop looks like:
//! 1. [`Substrate::sweep_pending`] — drop entities marked for removal.
//! 2. Optionally [`Substrate::split_tubule`] — branch a new tip.
//! 3. [`Substrate::tick`] — run the registered pipeline once.
//! 4. Read [`Substrate::junctions`] / [`Substrate::tubules`] to draw.
//!
//! Topology edits (split, merge) live in [`crate::topology`], the edge
//! handling in [`crate::boundary`] and the sweep in [`crate::driver`].

use glam::Vec2;
use log::info;
use rand::Rng;

use crate::{
    arena::Arena,
    config::SubstrateConfig,
    error::{SubstrateError, SubstrateResult},
    junction::{Junction, JunctionOptions},
    pipeline::{Operation, Pipeline},
    tubule::{Tubule, TubuleOptions},
    types::{JunctionId, TubuleId},
};

#[derive(Debug, Clone)]
pub struct Substrate {
    pub(crate) cfg: SubstrateConfig,
    pub(crate) junctions: Arena<Junction>,
    pub(crate) tubules: Arena<Tubule>,
    pipeline: Pipeline,
    ticks: u64,
}

impl Substrate {
    /// Creates an empty substrate with an empty pipeline.
    pub fn new(cfg: SubstrateConfig) -> SubstrateResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            junctions: Arena::new(),
            tubules: Arena::new(),
            pipeline: Pipeline::new(),
            ticks: 0,
        })
    }

    pub fn config(&self) -> &SubstrateConfig {
        &self.cfg
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.cfg.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.cfg.height
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    /// Registers operations by name. Unknown names are logged, skipped and
    /// returned.
    pub fn add_functions<I, S>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pipeline.register(names)
    }

    /// Number of ticks run since construction or the last [`Substrate::reset`].
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Drops every junction and tubule, keeping config and pipeline.
    pub fn reset(&mut self) {
        self.junctions.clear();
        self.tubules.clear();
        self.ticks = 0;
    }

    /// Creates a junction at `pos`, filling unset options from the config.
    pub fn add_junction(&mut self, pos: Vec2, opts: JunctionOptions) -> JunctionId {
        let mut j = Junction::new(pos, opts.width.unwrap_or(self.cfg.width));
        j.anchor = opts.anchor.unwrap_or(false);
        j.growing = opts.growing.unwrap_or(false);
        j.flowing = opts.flowing.unwrap_or(self.cfg.flowing);
        j.flowrate = opts.flowrate.unwrap_or(self.cfg.flowrate);
        j.dragrate = opts.dragrate.unwrap_or(self.cfg.dragrate);
        j.cross = opts.cross.unwrap_or(0).clamp(-1, 1);
        self.junctions.insert(j)
    }

    /// Creates a tubule from `j1` to `j2` and links the two as adjacent.
    ///
    /// ### Errors
    /// - [`SubstrateError::DegenerateTubule`] if `j1 == j2`.
    /// - [`SubstrateError::UnknownJunction`] if either end is not live.
    pub fn add_tubule(
        &mut self,
        j1: JunctionId,
        j2: JunctionId,
        opts: TubuleOptions,
    ) -> SubstrateResult<TubuleId> {
        if j1 == j2 {
            return Err(SubstrateError::DegenerateTubule(j1));
        }
        for id in [j1, j2] {
            if !self.junctions.contains(id) {
                return Err(SubstrateError::UnknownJunction(id));
            }
        }
        let Some((a, b)) = self.junctions.pair_mut(j1, j2) else {
            return Err(SubstrateError::UnknownJunction(j1));
        };
        a.adjacent.insert(j2);
        b.adjacent.insert(j1);
        let (p1, p2) = (a.pos, b.pos);

        let mut t = Tubule::new(j1, j2, p1, p2, opts.width.unwrap_or(self.cfg.width));
        t.hookes = opts.hookes.unwrap_or(self.cfg.hookes);
        t.growth = opts.growth.unwrap_or(self.cfg.growth);
        t.contracting = opts.contracting.unwrap_or(self.cfg.contracting);
        t.crossover = opts.crossover.unwrap_or(0).clamp(-1, 1);
        t.update(p1, p2);
        Ok(self.tubules.insert(t))
    }

    /// Seeds two anchored vertical strands spanning the substrate at
    /// random x positions.
    ///
    /// The bottom and top x pairs are drawn and sorted independently, so
    /// the strands never cross each other.
    pub fn init_substrate(&mut self, rng: &mut impl Rng) -> SubstrateResult<[TubuleId; 2]> {
        let w = self.cfg.width;
        let mut bottom = [rng.random_range(0.0..w), rng.random_range(0.0..w)];
        let mut top = [rng.random_range(0.0..w), rng.random_range(0.0..w)];
        bottom.sort_by(f32::total_cmp);
        top.sort_by(f32::total_cmp);
        self.seed_strands(bottom, top)
    }

    /// Seeds two anchored strands from `(bottom[i], 0)` to `(top[i], height)`.
    pub fn seed_strands(
        &mut self,
        bottom: [f32; 2],
        top: [f32; 2],
    ) -> SubstrateResult<[TubuleId; 2]> {
        let h = self.cfg.height;
        let b0 = self.add_junction(Vec2::new(bottom[0], 0.0), JunctionOptions::anchored());
        let b1 = self.add_junction(Vec2::new(bottom[1], 0.0), JunctionOptions::anchored());
        let t0 = self.add_junction(Vec2::new(top[0], h), JunctionOptions::anchored());
        let t1 = self.add_junction(Vec2::new(top[1], h), JunctionOptions::anchored());

        info!(
            "seeding strands: x {:.1} -> {:.1} and x {:.1} -> {:.1}",
            bottom[0], top[0], bottom[1], top[1]
        );

        let left = self.add_tubule(b0, t0, TubuleOptions::default())?;
        let right = self.add_tubule(b1, t1, TubuleOptions::default())?;
        Ok([left, right])
    }

    /// Advances the simulation by one unit of time.
    ///
    /// Every junction operation runs over all junctions, one operation at
    /// a time in registration order; then every tubule operation runs
    /// over all tubules the same way. Nothing is removed from the
    /// collections during a tick.
    pub fn tick(&mut self) {
        let junction_ops = self.pipeline.junction_ops().to_vec();
        let tubule_ops = self.pipeline.tubule_ops().to_vec();

        for op in junction_ops {
            self.run(op);
        }
        for op in tubule_ops {
            self.run(op);
        }
        self.ticks += 1;
    }

    /// Applies a single operation to every entity of its kind.
    pub fn run(&mut self, op: Operation) {
        match op {
            Operation::MoveJunction => {
                for id in self.junctions.ids() {
                    self.move_junction(id);
                }
            }
            Operation::BoundSubstrate => {
                for id in self.junctions.ids() {
                    self.bound_substrate(id);
                }
            }
            Operation::MergeTubule => {
                for id in self.junctions.ids() {
                    self.merge_tubule(id);
                }
            }
            Operation::PruneJunction => {
                for id in self.junctions.ids() {
                    self.prune_junction(id);
                }
            }
            Operation::UpdateTubule => {
                for id in self.tubules.ids() {
                    self.update_tubule(id);
                }
            }
            Operation::ContractTubule => {
                for id in self.tubules.ids() {
                    self.contract_tubule(id);
                }
            }
            Operation::GrowTubule => {
                for id in self.tubules.ids() {
                    self.grow_tubule(id);
                }
            }
            Operation::PruneTubule => {
                for id in self.tubules.ids() {
                    self.prune_tubule(id);
                }
            }
            Operation::WrapSubstrate => {
                for id in self.tubules.ids() {
                    self.wrap_substrate(id);
                }
            }
        }
    }

    pub fn move_junction(&mut self, id: JunctionId) {
        if let Some(j) = self.junctions.get_mut(id) {
            j.step();
        }
    }

    pub fn update_tubule(&mut self, id: TubuleId) {
        let Some(t) = self.tubules.get_mut(id) else {
            return;
        };
        let (Some(a), Some(b)) = (self.junctions.get(t.j1), self.junctions.get(t.j2)) else {
            return;
        };
        t.update(a.pos, b.pos);
    }

    pub fn contract_tubule(&mut self, id: TubuleId) {
        let Some(t) = self.tubules.get(id) else {
            return;
        };
        if let Some((a, b)) = self.junctions.pair_mut(t.j1, t.j2) {
            t.contract(a, b);
        }
    }

    pub fn grow_tubule(&mut self, id: TubuleId) {
        let Some(t) = self.tubules.get(id) else {
            return;
        };
        if let Some((a, b)) = self.junctions.pair_mut(t.j1, t.j2) {
            t.grow(a, b);
        }
    }

    /// Extension point for removing tubules; does nothing yet.
    pub fn prune_tubule(&mut self, _id: TubuleId) {}

    /// Extension point for removing junctions; does nothing yet.
    pub fn prune_junction(&mut self, _id: JunctionId) {}

    pub fn junction(&self, id: JunctionId) -> Option<&Junction> {
        self.junctions.get(id)
    }

    pub fn tubule(&self, id: TubuleId) -> Option<&Tubule> {
        self.tubules.get(id)
    }

    /// Direct mutable access, for drivers that reset or poke individual
    /// junctions between ticks (e.g. clearing an anchor).
    pub fn junction_mut(&mut self, id: JunctionId) -> Option<&mut Junction> {
        self.junctions.get_mut(id)
    }

    pub fn junctions(&self) -> impl Iterator<Item = (JunctionId, &Junction)> + '_ {
        self.junctions.iter()
    }

    pub fn tubules(&self) -> impl Iterator<Item = (TubuleId, &Tubule)> + '_ {
        self.tubules.iter()
    }

    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    pub fn tubule_count(&self) -> usize {
        self.tubules.len()
    }

    /// `true` if every adjacency entry has its mirror entry and points at
    /// a live junction.
    pub fn is_adjacency_symmetric(&self) -> bool {
        self.junctions.iter().all(|(id, j)| {
            j.adjacent.iter().all(|&other| {
                self.junctions
                    .get(other)
                    .is_some_and(|o| o.adjacent.contains(&id))
            })
        })
    }
}
