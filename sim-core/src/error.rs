use thiserror::Error;

use crate::types::JunctionId;

/// Errors raised while configuring or seeding a [`crate::substrate::Substrate`].
///
/// Per-tick operations never fail; these only come out of construction,
/// config parsing and the public factory calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubstrateError {
    /// A configuration value is out of range.
    #[error("config error: {0}")]
    Config(String),

    /// The configuration text could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// A pipeline operation name that is not in the registry.
    #[error("no such operation: {0}")]
    UnknownOperation(String),

    /// A tubule endpoint refers to a junction that does not exist (or was swept).
    #[error("unknown junction id {0}")]
    UnknownJunction(JunctionId),

    /// Both tubule endpoints are the same junction.
    #[error("tubule endpoints must differ, got junction {0} twice")]
    DegenerateTubule(JunctionId),
}

pub type SubstrateResult<T> = Result<T, SubstrateError>;
