use glam::Vec2;

use crate::{geometry, junction::Junction, types::JunctionId};

/// A spring-like segment between two junctions.
///
/// The geometry (`vector`, `norm`, `unit`) is cached and only refreshed
/// by [`Tubule::update`]; forces computed between updates use the cached
/// values.
#[derive(Debug, Clone)]
pub struct Tubule {
    pub j1: JunctionId,
    pub j2: JunctionId,

    /// Number of substrate widths (-1, 0 or 1) added to the x component of
    /// `vector` to account for the periodic boundary.
    pub crossover: i8,
    pub width: f32,

    /// `j2.pos - j1.pos`, corrected by `crossover * width` on x.
    pub vector: Vec2,
    pub norm: f32,
    /// Direction of `vector`; zero for a zero-length tubule.
    pub unit: Vec2,

    pub hookes: f32,
    pub growth: f32,
    pub contracting: bool,

    pub pending_removal: bool,
}

/// Per-tubule overrides for [`crate::substrate::Substrate::add_tubule`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TubuleOptions {
    pub hookes: Option<f32>,
    pub growth: Option<f32>,
    pub width: Option<f32>,
    pub crossover: Option<i8>,
    pub contracting: Option<bool>,
}

impl TubuleOptions {
    pub fn with_crossover(crossover: i8) -> Self {
        Self {
            crossover: Some(crossover),
            ..Self::default()
        }
    }
}

impl Tubule {
    /// Creates a tubule and computes its geometry from the endpoint positions.
    pub fn new(j1: JunctionId, j2: JunctionId, p1: Vec2, p2: Vec2, width: f32) -> Self {
        let mut t = Self {
            j1,
            j2,
            crossover: 0,
            width,
            vector: Vec2::ZERO,
            norm: 0.0,
            unit: Vec2::ZERO,
            hookes: 0.0,
            growth: 0.0,
            contracting: true,
            pending_removal: false,
        };
        t.update(p1, p2);
        t
    }

    /// Recomputes the cached geometry from the current endpoint positions.
    pub fn update(&mut self, p1: Vec2, p2: Vec2) {
        let mut v = p2 - p1;
        v.x += f32::from(self.crossover) * self.width;
        self.vector = v;
        (self.norm, self.unit) = geometry::norm_and_unit(v);
    }

    /// Hookean pull of the two endpoints toward each other (no rest length).
    pub fn contract(&self, j1: &mut Junction, j2: &mut Junction) {
        if !self.contracting {
            return;
        }
        let pull = self.hookes * self.vector;
        if !j1.anchor {
            j1.velocity += pull;
        }
        if !j2.anchor {
            j2.velocity -= pull;
        }
    }

    /// Pushes growing endpoints outward, away from the opposite end.
    ///
    /// The tip gets a velocity kick against the spring and is displaced
    /// by `growth` along the tubule axis.
    pub fn grow(&self, j1: &mut Junction, j2: &mut Junction) {
        if j1.growing {
            j1.velocity -= self.hookes * self.vector;
            j1.pos -= self.growth * self.unit;
        }
        if j2.growing {
            j2.velocity += self.hookes * self.vector;
            j2.pos += self.growth * self.unit;
        }
    }
}
