//! Edge handling: the solid clamp and the periodic x bookkeeping.

use crate::{
    substrate::Substrate,
    types::{JunctionId, TubuleId},
};

impl Substrate {
    /// Clamps a junction into the substrate and pins it if it was outside.
    ///
    /// y is always bounded; x only when `bound_x` is set. A clamped
    /// junction becomes an anchor and stops growing, permanently.
    ///
    /// ### Returns
    /// `true` if the junction was clamped.
    pub fn bound_substrate(&mut self, id: JunctionId) -> bool {
        let (w, h, bound_x) = (self.cfg.width, self.cfg.height, self.cfg.bound_x);
        let Some(j) = self.junctions.get_mut(id) else {
            return false;
        };

        let mut clamped = false;
        if bound_x {
            if j.pos.x > w {
                j.pos.x = w;
                clamped = true;
            } else if j.pos.x < 0.0 {
                j.pos.x = 0.0;
                clamped = true;
            }
        }
        if j.pos.y > h {
            j.pos.y = h;
            clamped = true;
        } else if j.pos.y < 0.0 {
            j.pos.y = 0.0;
            clamped = true;
        }

        if clamped {
            j.anchor = true;
            j.growing = false;
        }
        clamped
    }

    /// Records that an endpoint of the tubule left the substrate through
    /// a periodic edge.
    ///
    /// The endpoint's `cross` is pushed toward the edge it left through
    /// (its position is wrapped on its next move) and the tubule's
    /// `crossover` is adjusted so its displacement stays correct once the
    /// endpoint re-enters on the other side. Both stay within [-1, 1].
    pub fn wrap_substrate(&mut self, id: TubuleId) {
        if !self.cfg.wrap_x {
            return;
        }
        let w = self.cfg.width;
        let Some(t) = self.tubules.get_mut(id) else {
            return;
        };

        // j1 leaving to the right means j2 now sits a width behind it.
        if let Some(j1) = self.junctions.get_mut(t.j1) {
            if j1.pos.x > w {
                t.crossover = (t.crossover - 1).max(-1);
                j1.cross = (j1.cross + 1).min(1);
            } else if j1.pos.x < 0.0 {
                t.crossover = (t.crossover + 1).min(1);
                j1.cross = (j1.cross - 1).max(-1);
            }
        }

        if let Some(j2) = self.junctions.get_mut(t.j2) {
            if j2.pos.x > w {
                t.crossover = (t.crossover + 1).min(1);
                j2.cross = (j2.cross + 1).min(1);
            } else if j2.pos.x < 0.0 {
                t.crossover = (t.crossover - 1).max(-1);
                j2.cross = (j2.cross - 1).max(-1);
            }
        }
    }
}
