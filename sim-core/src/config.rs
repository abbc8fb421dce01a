use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{SubstrateError, SubstrateResult};

/// Construction options for a [`crate::substrate::Substrate`].
///
/// `width` and `height` are required; everything else falls back to the
/// defaults below when missing from a JSON document. The physical
/// parameters are the defaults handed to newly created junctions and
/// tubules; individual entities can override them at creation time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubstrateConfig {
    pub width: f32,
    pub height: f32,

    /// Clamp (and anchor) junctions at the left/right edges.
    #[serde(default)]
    pub bound_x: bool,
    /// Treat the left/right edges as periodic.
    #[serde(default = "default_wrap_x")]
    pub wrap_x: bool,

    #[serde(default)]
    pub flowing: bool,
    #[serde(default = "default_flowrate")]
    pub flowrate: Vec2,
    /// Velocity multiplier applied every tick, in (0, 1].
    #[serde(default = "default_dragrate")]
    pub dragrate: f32,
    /// Spring constant of the contraction force.
    #[serde(default = "default_hookes")]
    pub hookes: f32,
    /// Distance a growing tip advances per tick.
    #[serde(default = "default_growth")]
    pub growth: f32,
    #[serde(default = "default_contracting")]
    pub contracting: bool,
}

fn default_wrap_x() -> bool {
    true
}

fn default_flowrate() -> Vec2 {
    Vec2::new(0.0, -0.000_000_1)
}

fn default_dragrate() -> f32 {
    0.99
}

fn default_hookes() -> f32 {
    0.000_05
}

fn default_growth() -> f32 {
    0.5
}

fn default_contracting() -> bool {
    true
}

impl SubstrateConfig {
    /// A config of the given size with every other option at its default.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            bound_x: false,
            wrap_x: default_wrap_x(),
            flowing: false,
            flowrate: default_flowrate(),
            dragrate: default_dragrate(),
            hookes: default_hookes(),
            growth: default_growth(),
            contracting: default_contracting(),
        }
    }

    /// Checks every value for range and finiteness.
    pub fn validate(&self) -> SubstrateResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(SubstrateError::Config(format!(
                "width must be finite and > 0, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(SubstrateError::Config(format!(
                "height must be finite and > 0, got {}",
                self.height
            )));
        }
        if !(self.dragrate > 0.0 && self.dragrate <= 1.0) {
            return Err(SubstrateError::Config(format!(
                "dragrate must be in (0, 1], got {}",
                self.dragrate
            )));
        }
        if !(self.hookes.is_finite() && self.hookes >= 0.0) {
            return Err(SubstrateError::Config(format!(
                "hookes must be finite and >= 0, got {}",
                self.hookes
            )));
        }
        if !(self.growth.is_finite() && self.growth >= 0.0) {
            return Err(SubstrateError::Config(format!(
                "growth must be finite and >= 0, got {}",
                self.growth
            )));
        }
        if !self.flowrate.is_finite() {
            return Err(SubstrateError::Config(format!(
                "flowrate must be finite, got {}",
                self.flowrate
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> SubstrateResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| SubstrateError::ConfigParse(format!("JSON parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_documented_defaults() {
        let cfg = SubstrateConfig::new(400.0, 300.0);
        assert_eq!(cfg.width, 400.0);
        assert_eq!(cfg.height, 300.0);
        assert!(!cfg.bound_x);
        assert!(cfg.wrap_x);
        assert!(!cfg.flowing);
        assert_eq!(cfg.flowrate, Vec2::new(0.0, -0.000_000_1));
        assert_eq!(cfg.dragrate, 0.99);
        assert_eq!(cfg.hookes, 0.000_05);
        assert_eq!(cfg.growth, 0.5);
        assert!(cfg.contracting);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn from_json_fills_missing_fields_with_defaults() {
        let cfg = SubstrateConfig::from_json(r#"{"width": 200, "height": 100, "bound_x": true}"#)
            .unwrap();
        assert_eq!(cfg.width, 200.0);
        assert_eq!(cfg.height, 100.0);
        assert!(cfg.bound_x);
        assert!(cfg.wrap_x);
        assert_eq!(cfg.growth, 0.5);
    }

    #[test]
    fn from_json_requires_size() {
        let err = SubstrateConfig::from_json(r#"{"width": 200}"#).unwrap_err();
        assert!(matches!(err, SubstrateError::ConfigParse(_)));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = SubstrateConfig::new(0.0, 10.0);
        assert!(matches!(cfg.validate(), Err(SubstrateError::Config(_))));

        cfg = SubstrateConfig::new(10.0, 10.0);
        cfg.dragrate = 0.0;
        assert!(cfg.validate().is_err());

        cfg.dragrate = 1.5;
        assert!(cfg.validate().is_err());

        cfg.dragrate = 1.0;
        cfg.hookes = -1.0;
        assert!(cfg.validate().is_err());

        cfg.hookes = 0.0;
        cfg.growth = f32::NAN;
        assert!(cfg.validate().is_err());

        cfg.growth = 0.0;
        assert!(cfg.validate().is_ok());
    }
}
