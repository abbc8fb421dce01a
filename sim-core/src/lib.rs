//! Core 2-D tubule network simulation library.
//!
//! A network of line-segment tubules joined at point junctions grows,
//! contracts, branches and fuses on a substrate whose left and right
//! edges wrap around.
//!
//! Main components:
//! - [`geometry`] — small vector helpers on top of `glam`.
//! - [`junction`] — point entities and their per-tick integration.
//! - [`tubule`] — spring-like edges between junctions.
//! - [`arena`] — id-addressed storage for both.
//! - [`config`] — construction options and their defaults.
//! - [`pipeline`] — the registry of per-tick operations.
//! - [`substrate`] — the engine: factories, tick and queries.
//! - [`boundary`] — wall clamping and periodic-edge bookkeeping.
//! - [`topology`] — splitting and merging tubules.
//! - [`driver`] — removal sweep, frame step and drawing geometry.
//! - [`error`] — the error type.
//! - [`types`] — shared ids.

pub mod arena;
pub mod boundary;
pub mod config;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod junction;
pub mod pipeline;
pub mod substrate;
pub mod topology;
pub mod tubule;
pub mod types;

pub use config::SubstrateConfig;
pub use error::{SubstrateError, SubstrateResult};
pub use pipeline::{Operation, Pipeline};
pub use substrate::Substrate;
