//! Topology edits: branching a new tip off a tubule, and fusing a
//! growing tip into a tubule it runs into.
//!
//! Neither edit removes anything; the replaced tubule is only marked
//! `pending_removal` and is dropped by the next sweep.
//!
//! The crossover rules for the new tubules keep the pieces of a tubule
//! that straddles the periodic edge pointing the right way.

use log::debug;
use rand::Rng;

use crate::{
    geometry,
    junction::JunctionOptions,
    substrate::Substrate,
    tubule::TubuleOptions,
    types::{JunctionId, TubuleId},
};

/// Distance from the branch point to a freshly split tip.
pub const BRANCH_OFFSET: f32 = 0.1;

/// Tips closer than this to a tubule's first end merge as long as they
/// lie on its forward side.
pub const MERGE_CAPTURE_DIST: f32 = 0.1;

/// Below this distance the relaxed collinearity threshold applies.
pub const MERGE_NEAR_DIST: f32 = 1.0;
pub const MERGE_NEAR_COLLINEARITY: f32 = 0.9;
pub const MERGE_FAR_COLLINEARITY: f32 = 0.999;

/// What a split created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitOutcome {
    /// The tubule that was split, now marked for removal.
    pub target: TubuleId,
    /// New junction on the old tubule's path.
    pub branch: JunctionId,
    /// New growing tip.
    pub tip: JunctionId,
    /// `[branch -> old j1, branch -> old j2, branch -> tip]`.
    pub tubules: [TubuleId; 3],
}

/// What a merge created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    pub tip: JunctionId,
    /// The tubule the tip ran into, now marked for removal.
    pub target: TubuleId,
    /// `[tip -> old j1, tip -> old j2]`.
    pub tubules: [TubuleId; 2],
}

/// Whether a tip at `dist` from a tubule's first end, with direction
/// agreement `dot`, counts as lying on the tubule.
#[inline]
pub fn is_collinear(dist: f32, dot: f32) -> bool {
    if dist < MERGE_CAPTURE_DIST {
        // A tip exactly on the first end has a zero unit, so dot is 0.
        dot > 0.0
    } else if dist < MERGE_NEAR_DIST {
        dot > MERGE_NEAR_COLLINEARITY
    } else {
        dot > MERGE_FAR_COLLINEARITY
    }
}

impl Substrate {
    /// Sum of the lengths of every tubule still in play.
    pub fn total_length(&self) -> f32 {
        self.tubules
            .iter()
            .filter(|(_, t)| !t.pending_removal)
            .map(|(_, t)| t.norm)
            .sum()
    }

    /// Finds the tubule that arc length `r` falls on, walking tubules in
    /// collection order, and the offset along it from its first end.
    ///
    /// A value exactly on a boundary belongs to the earlier tubule. If
    /// rounding leaves `r` past the last tubule, that tubule is returned
    /// with the offset clamped to its length. `None` if there are no
    /// tubules.
    pub fn select_split_target(&self, r: f32) -> Option<(TubuleId, f32)> {
        let mut rest = r.max(0.0);
        let mut last = None;
        for (id, t) in self.tubules.iter().filter(|(_, t)| !t.pending_removal) {
            if rest > t.norm {
                rest -= t.norm;
                last = Some((id, t.norm));
            } else {
                return Some((id, rest));
            }
        }
        last
    }

    /// Branches a new growing tip off a random point of the network.
    ///
    /// The point is uniform over total tubule length; the tip goes to a
    /// random side. Does nothing (and returns `None`) when the network
    /// has no length.
    pub fn split_tubule(&mut self, rng: &mut impl Rng) -> Option<SplitOutcome> {
        let total = self.total_length();
        if !(total > 0.0 && total.is_finite()) {
            debug!("split skipped: total length is {total}");
            return None;
        }
        let r = rng.random_range(0.0..total);
        let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.split_at(r, side)
    }

    /// Deterministic split at arc length `r`, tip on `side` (sign only).
    pub fn split_at(&mut self, r: f32, side: f32) -> Option<SplitOutcome> {
        let (target, offset) = self.select_split_target(r)?;
        self.split_tubule_at(target, offset, side)
    }

    /// Splits `target` at `offset` from its first end.
    pub fn split_tubule_at(
        &mut self,
        target: TubuleId,
        offset: f32,
        side: f32,
    ) -> Option<SplitOutcome> {
        let w = self.cfg.width;
        let t = self.tubules.get(target)?;
        if t.pending_removal {
            return None;
        }
        let (j1, j2, unit, crossover) = (t.j1, t.j2, t.unit, t.crossover);
        if j1 == j2 {
            return None;
        }
        let p1 = self.junctions.get(j1)?.pos;
        let p2 = self.junctions.get(j2)?.pos;

        let branch_pos = p1 + offset * unit;
        let tip_pos = branch_pos + BRANCH_OFFSET * geometry::branch_direction(unit, side);

        let (to_j1, to_j2) = split_crossovers(crossover, branch_pos.x, p1.x, p2.x);

        let mut to_tip = 0;
        if tip_pos.x > w && branch_pos.x < w {
            to_tip += 1;
        } else if tip_pos.x < 0.0 && branch_pos.x > 0.0 {
            to_tip -= 1;
        }

        let branch = self.add_junction(branch_pos, JunctionOptions::default());
        let tip = self.add_junction(tip_pos, JunctionOptions::growing());

        // Every endpoint below is live and distinct, so the factory
        // cannot reject these tubules.
        let a = self
            .add_tubule(branch, j1, TubuleOptions::with_crossover(to_j1))
            .ok()?;
        let b = self
            .add_tubule(branch, j2, TubuleOptions::with_crossover(to_j2))
            .ok()?;
        let c = self
            .add_tubule(branch, tip, TubuleOptions::with_crossover(to_tip))
            .ok()?;
        self.unlink(j1, j2, target);

        if let Some(t) = self.tubules.get_mut(target) {
            t.pending_removal = true;
        }

        debug!(
            "split tubule {target} at {offset:.2}: branch {branch} at {branch_pos}, tip {tip}"
        );

        Some(SplitOutcome {
            target,
            branch,
            tip,
            tubules: [a, b, c],
        })
    }

    /// Fuses a growing tip into the first tubule it lies on.
    ///
    /// Only growing tips are tested, and a fresh tip skips its first
    /// test (clearing `just_split`) so it cannot fuse into the tubule it
    /// was just split from. Tubules already touching the tip, and tubules
    /// already marked for removal, are ignored. At most one merge per
    /// call.
    pub fn merge_tubule(&mut self, id: JunctionId) -> Option<MergeOutcome> {
        let w = self.cfg.width;
        let j = self.junctions.get_mut(id)?;
        if !j.growing {
            return None;
        }
        if j.just_split {
            j.just_split = false;
            return None;
        }
        let pos = j.pos;

        // Brute-force scan over every tubule.
        let mut hit = None;
        for (tid, t) in self.tubules.iter() {
            if t.pending_removal || t.j1 == id || t.j2 == id {
                continue;
            }
            let (Some(a), Some(b)) = (self.junctions.get(t.j1), self.junctions.get(t.j2)) else {
                continue;
            };
            if a.is_adjacent(id) || b.is_adjacent(id) {
                continue;
            }

            let mut offset = pos - a.pos;
            if t.crossover > 0 {
                if pos.x < b.pos.x {
                    offset.x += w;
                }
            } else if t.crossover < 0 && pos.x > b.pos.x {
                offset.x -= w;
            }
            let (dist, dir) = geometry::norm_and_unit(offset);

            if dist > t.norm {
                continue;
            }
            if is_collinear(dist, dir.dot(t.unit)) {
                hit = Some((tid, t.j1, t.j2, t.crossover, a.pos.x, b.pos.x));
                break;
            }
        }

        let (target, j1, j2, crossover, x1, x2) = hit?;
        let (to_j1, to_j2) = split_crossovers(crossover, pos.x, x1, x2);

        // The scan only hits live tubules that do not touch `id`, so the
        // factory cannot reject these tubules.
        let a = self
            .add_tubule(id, j1, TubuleOptions::with_crossover(to_j1))
            .ok()?;
        let b = self
            .add_tubule(id, j2, TubuleOptions::with_crossover(to_j2))
            .ok()?;
        self.unlink(j1, j2, target);

        if let Some(j) = self.junctions.get_mut(id) {
            j.growing = false;
        }
        if let Some(t) = self.tubules.get_mut(target) {
            t.pending_removal = true;
        }

        debug!("merged tip {id} into tubule {target} at {pos}");

        Some(MergeOutcome {
            tip: id,
            target,
            tubules: [a, b],
        })
    }

    /// Drops the adjacency between `a` and `b` unless a live tubule other
    /// than `replaced` still connects them. Missing entries are ignored.
    pub(crate) fn unlink(&mut self, a: JunctionId, b: JunctionId, replaced: TubuleId) {
        let still_connected = self.tubules.iter().any(|(id, t)| {
            id != replaced
                && !t.pending_removal
                && ((t.j1 == a && t.j2 == b) || (t.j1 == b && t.j2 == a))
        });
        if still_connected {
            return;
        }
        if let Some(ja) = self.junctions.get_mut(a) {
            ja.adjacent.remove(&b);
        }
        if let Some(jb) = self.junctions.get_mut(b) {
            jb.adjacent.remove(&a);
        }
    }
}

/// Crossovers for the two pieces `(p -> old j1, p -> old j2)` when a
/// point `p` on a tubule replaces it.
///
/// Only tubules that straddle the periodic edge need correcting; which
/// piece gets it depends on which side of the edge `p` ended up on.
fn split_crossovers(crossover: i8, px: f32, x1: f32, x2: f32) -> (i8, i8) {
    let mut to_j1 = 0;
    let mut to_j2 = 0;
    if crossover > 0 {
        if px < x2 {
            to_j1 = -1;
        } else if px > x1 {
            to_j2 = 1;
        }
    } else if crossover < 0 {
        if px < x1 {
            to_j2 = -1;
        } else if px > x2 {
            to_j1 = 1;
        }
    }
    (to_j1, to_j2)
}
