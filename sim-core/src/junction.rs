use std::collections::BTreeSet;

use glam::{DVec2, Vec2};

use crate::{geometry, types::JunctionId};

/// A point where tubules meet: an anchor, a free mass or a growing tip.
#[derive(Debug, Clone)]
pub struct Junction {
    pub pos: Vec2,
    pub velocity: Vec2,

    /// Constant external drift, only applied while `flowing` is set.
    pub flowing: bool,
    pub flowrate: Vec2,
    /// Part of the accumulated drift too small to show up in `pos` yet.
    drift: DVec2,
    /// Velocity multiplier applied after every move.
    pub dragrate: f32,

    /// Frozen against velocity and periodic wrap (not against clamping).
    pub anchor: bool,
    /// Open tip: extended by growth and tested for merges.
    pub growing: bool,
    /// Skip the next merge test. Set on every new junction.
    pub just_split: bool,

    /// Pending periodic wrap, -1, 0 or 1. Set by the wrap bookkeeping,
    /// consumed by [`Junction::step`].
    pub cross: i8,
    /// Period of the x wrap.
    pub width: f32,

    /// Junctions connected to this one by a tubule.
    pub adjacent: BTreeSet<JunctionId>,

    pub pending_removal: bool,
}

/// Per-junction overrides for [`crate::substrate::Substrate::add_junction`].
///
/// Fields left as `None` take the substrate defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct JunctionOptions {
    pub anchor: Option<bool>,
    pub growing: Option<bool>,
    pub flowing: Option<bool>,
    pub flowrate: Option<Vec2>,
    pub dragrate: Option<f32>,
    pub width: Option<f32>,
    pub cross: Option<i8>,
}

impl JunctionOptions {
    pub fn anchored() -> Self {
        Self {
            anchor: Some(true),
            ..Self::default()
        }
    }

    pub fn growing() -> Self {
        Self {
            growing: Some(true),
            ..Self::default()
        }
    }
}

impl Junction {
    pub fn new(pos: Vec2, width: f32) -> Self {
        Self {
            pos,
            velocity: Vec2::ZERO,
            flowing: false,
            flowrate: Vec2::ZERO,
            drift: DVec2::ZERO,
            dragrate: 1.0,
            anchor: false,
            growing: false,
            just_split: true,
            cross: 0,
            width,
            adjacent: BTreeSet::new(),
            pending_removal: false,
        }
    }

    /// Advances the junction by one tick.
    ///
    /// Order matters: a pending wrap is applied first, then the drift,
    /// then the velocity (which is decayed by `dragrate` afterwards).
    pub fn step(&mut self) {
        if !self.anchor && self.cross != 0 {
            self.pos.x = geometry::wrap_x(self.pos.x, self.width);
            self.cross = 0;
        }

        if self.flowing {
            // Summed in f64: typical rates are below the f32 step at
            // substrate-scale coordinates.
            let target = self.pos.as_dvec2() + self.drift + self.flowrate.as_dvec2();
            self.pos = target.as_vec2();
            self.drift = target - self.pos.as_dvec2();
        }

        if !self.anchor {
            self.pos += self.velocity;
            self.velocity *= self.dragrate;
        }
    }

    #[inline]
    pub fn is_adjacent(&self, other: JunctionId) -> bool {
        self.adjacent.contains(&other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_junction_is_free_and_skips_first_merge() {
        let j = Junction::new(Vec2::new(1.0, 2.0), 100.0);
        assert_eq!(j.pos, Vec2::new(1.0, 2.0));
        assert_eq!(j.velocity, Vec2::ZERO);
        assert!(!j.anchor);
        assert!(!j.growing);
        assert!(j.just_split);
        assert_eq!(j.cross, 0);
        assert!(j.adjacent.is_empty());
        assert!(!j.pending_removal);
    }

    #[test]
    fn step_integrates_velocity_then_applies_drag() {
        let mut j = Junction::new(Vec2::new(10.0, 10.0), 100.0);
        j.velocity = Vec2::new(2.0, -4.0);
        j.dragrate = 0.5;

        j.step();
        assert_eq!(j.pos, Vec2::new(12.0, 6.0));
        assert_eq!(j.velocity, Vec2::new(1.0, -2.0));

        j.step();
        assert_eq!(j.pos, Vec2::new(13.0, 4.0));
    }

    #[test]
    fn anchored_junction_ignores_velocity_and_wrap() {
        let mut j = Junction::new(Vec2::new(105.0, 10.0), 100.0);
        j.anchor = true;
        j.velocity = Vec2::new(1.0, 1.0);
        j.cross = 1;

        j.step();
        assert_eq!(j.pos, Vec2::new(105.0, 10.0));
        assert_eq!(j.velocity, Vec2::new(1.0, 1.0));
        // The wrap is never consumed while anchored.
        assert_eq!(j.cross, 1);
    }

    #[test]
    fn pending_cross_wraps_position_and_resets() {
        let mut j = Junction::new(Vec2::new(402.0, 50.0), 400.0);
        j.cross = 1;
        j.step();
        assert_eq!(j.pos, Vec2::new(2.0, 50.0));
        assert_eq!(j.cross, 0);

        let mut k = Junction::new(Vec2::new(-5.0, 50.0), 400.0);
        k.cross = -1;
        k.step();
        assert_eq!(k.pos, Vec2::new(395.0, 50.0));
        assert_eq!(k.cross, 0);
    }

    #[test]
    fn flow_drifts_even_anchored_junctions() {
        let mut j = Junction::new(Vec2::new(0.0, 0.0), 100.0);
        j.anchor = true;
        j.flowing = true;
        j.flowrate = Vec2::new(0.0, -0.5);

        j.step();
        j.step();
        assert_eq!(j.pos, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn flow_below_f32_resolution_still_accumulates() {
        let mut j = Junction::new(Vec2::new(50.0, 200.0), 400.0);
        j.flowing = true;
        j.flowrate = Vec2::new(0.0, -0.000_000_1);

        for _ in 0..1000 {
            j.step();
        }
        assert_eq!(j.pos.x, 50.0);
        assert!((j.pos.y - 199.9999).abs() < 2e-5, "y = {}", j.pos.y);
    }
}
