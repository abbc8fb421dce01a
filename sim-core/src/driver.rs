//! The contract between the substrate and whatever drives it frame by
//! frame: the removal sweep, the per-frame step and the drawing geometry.

use glam::Vec2;
use log::debug;
use rand::Rng;

use crate::{
    geometry,
    substrate::Substrate,
    topology::SplitOutcome,
    types::{JunctionId, TubuleId},
};

/// Entities dropped by one [`Substrate::sweep_pending`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub junctions: Vec<JunctionId>,
    /// Marked tubules plus any tubule left without an endpoint.
    pub tubules: Vec<TubuleId>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty() && self.tubules.is_empty()
    }
}

/// What happened during one [`Substrate::step_frame`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub swept: SweepReport,
    pub split: Option<SplitOutcome>,
}

/// A straight piece of a tubule in substrate coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub tubule: TubuleId,
    pub a: Vec2,
    pub b: Vec2,
}

impl Substrate {
    /// Removes every junction and tubule marked `pending_removal`.
    ///
    /// Call between ticks, never during one. Markers are collected and
    /// cleared first, then the entries are removed. Tubules whose
    /// endpoint is removed go with it, and removed junctions are scrubbed
    /// from their neighbours' adjacency sets.
    pub fn sweep_pending(&mut self) -> SweepReport {
        let mut report = SweepReport::default();

        for id in self.junctions.ids() {
            if let Some(j) = self.junctions.get_mut(id)
                && j.pending_removal
            {
                j.pending_removal = false;
                report.junctions.push(id);
            }
        }
        for id in self.tubules.ids() {
            if let Some(t) = self.tubules.get_mut(id)
                && t.pending_removal
            {
                t.pending_removal = false;
                report.tubules.push(id);
            }
        }

        for &id in &report.junctions {
            let Some(j) = self.junctions.remove(id) else {
                continue;
            };
            for other in j.adjacent {
                if let Some(o) = self.junctions.get_mut(other) {
                    o.adjacent.remove(&id);
                }
            }
        }

        if !report.junctions.is_empty() {
            for (id, t) in self.tubules.iter() {
                let orphaned = !self.junctions.contains(t.j1) || !self.junctions.contains(t.j2);
                if orphaned && !report.tubules.contains(&id) {
                    report.tubules.push(id);
                }
            }
        }

        for &id in &report.tubules {
            self.tubules.remove(id);
        }

        if !report.is_empty() {
            debug!(
                "swept {} junctions, {} tubules",
                report.junctions.len(),
                report.tubules.len()
            );
        }
        report
    }

    /// One driver frame: sweep, optionally split, then tick.
    pub fn step_frame(&mut self, split_requested: bool, rng: &mut impl Rng) -> FrameReport {
        let swept = self.sweep_pending();
        let split = if split_requested {
            self.split_tubule(rng)
        } else {
            None
        };
        self.tick();
        FrameReport { swept, split }
    }

    /// Line segments to draw every tubule inside `[0, width]`.
    ///
    /// A tubule with no crossover is drawn between its endpoints. A
    /// tubule that crosses the periodic edge is cut where its path meets
    /// the edge and drawn as two pieces, one on each side.
    pub fn render_segments(&self) -> Vec<Segment> {
        let w = self.cfg.width;
        let mut out = Vec::with_capacity(self.tubules.len() + 8);

        for (id, t) in self.tubules.iter() {
            let (Some(j1), Some(j2)) = (self.junctions.get(t.j1), self.junctions.get(t.j2)) else {
                continue;
            };

            if t.crossover == 0 {
                out.push(Segment {
                    tubule: id,
                    a: j1.pos,
                    b: j2.pos,
                });
                continue;
            }

            let start = Vec2::new(geometry::wrap_x(j1.pos.x, w), j1.pos.y);
            let end = start + t.vector;
            let edge = if end.x > w {
                w
            } else if end.x < 0.0 {
                0.0
            } else {
                out.push(Segment {
                    tubule: id,
                    a: start,
                    b: end,
                });
                continue;
            };

            let s = (edge - start.x) / t.vector.x;
            let y = start.y + s * t.vector.y;
            let shift = if edge > 0.0 { w } else { -w };
            out.push(Segment {
                tubule: id,
                a: start,
                b: Vec2::new(edge, y),
            });
            out.push(Segment {
                tubule: id,
                a: Vec2::new(edge - shift, y),
                b: Vec2::new(end.x - shift, end.y),
            });
        }
        out
    }
}
