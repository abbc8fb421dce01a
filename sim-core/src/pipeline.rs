//! The per-tick operation registry.
//!
//! Each [`Operation`] runs over either every junction or every tubule.
//! A [`Pipeline`] keeps two ordered lists, one per entity kind; a tick
//! runs every junction operation to completion, in order, and then every
//! tubule operation.

use std::{fmt, str::FromStr};

use log::warn;

use crate::error::SubstrateError;

/// Which collection an operation walks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Junction,
    Tubule,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    MoveJunction,
    BoundSubstrate,
    MergeTubule,
    PruneJunction,
    UpdateTubule,
    ContractTubule,
    GrowTubule,
    PruneTubule,
    WrapSubstrate,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::MoveJunction,
        Operation::BoundSubstrate,
        Operation::MergeTubule,
        Operation::PruneJunction,
        Operation::UpdateTubule,
        Operation::ContractTubule,
        Operation::GrowTubule,
        Operation::PruneTubule,
        Operation::WrapSubstrate,
    ];

    pub fn kind(self) -> EntityKind {
        match self {
            Operation::MoveJunction
            | Operation::BoundSubstrate
            | Operation::MergeTubule
            | Operation::PruneJunction => EntityKind::Junction,
            Operation::UpdateTubule
            | Operation::ContractTubule
            | Operation::GrowTubule
            | Operation::PruneTubule
            | Operation::WrapSubstrate => EntityKind::Tubule,
        }
    }

    /// Registry name, as accepted by [`Pipeline::register`].
    pub fn name(self) -> &'static str {
        match self {
            Operation::MoveJunction => "moveJunction",
            Operation::BoundSubstrate => "boundSubstrate",
            Operation::MergeTubule => "mergeTubule",
            Operation::PruneJunction => "pruneJunction",
            Operation::UpdateTubule => "updateTubule",
            Operation::ContractTubule => "contractTubule",
            Operation::GrowTubule => "growTubule",
            Operation::PruneTubule => "pruneTubule",
            Operation::WrapSubstrate => "wrapSubstrate",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = SubstrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| SubstrateError::UnknownOperation(s.to_string()))
    }
}

/// Ordered junction and tubule operation lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pipeline {
    junction_ops: Vec<Operation>,
    tubule_ops: Vec<Operation>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pipeline the interactive driver runs: full growth, contraction,
    /// boundary handling and merging.
    pub fn default_growth() -> Self {
        let mut p = Self::new();
        p.extend([
            Operation::MoveJunction,
            Operation::UpdateTubule,
            Operation::GrowTubule,
            Operation::ContractTubule,
            Operation::BoundSubstrate,
            Operation::MergeTubule,
            Operation::WrapSubstrate,
        ]);
        p
    }

    /// Appends operations by name, preserving order within each kind.
    ///
    /// Unknown names are logged and skipped. Returns the rejected names.
    pub fn register<I, S>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rejected = Vec::new();
        for name in names {
            let name = name.as_ref();
            match name.parse::<Operation>() {
                Ok(op) => self.push(op),
                Err(e) => {
                    warn!("{e}; skipping");
                    rejected.push(name.to_string());
                }
            }
        }
        rejected
    }

    pub fn push(&mut self, op: Operation) {
        match op.kind() {
            EntityKind::Junction => self.junction_ops.push(op),
            EntityKind::Tubule => self.tubule_ops.push(op),
        }
    }

    pub fn extend(&mut self, ops: impl IntoIterator<Item = Operation>) {
        for op in ops {
            self.push(op);
        }
    }

    pub fn junction_ops(&self) -> &[Operation] {
        &self.junction_ops
    }

    pub fn tubule_ops(&self) -> &[Operation] {
        &self.tubule_ops
    }

    pub fn is_empty(&self) -> bool {
        self.junction_ops.is_empty() && self.tubule_ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>(), Ok(op));
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert_eq!(
            "explodeTubule".parse::<Operation>(),
            Err(SubstrateError::UnknownOperation("explodeTubule".into()))
        );
    }

    #[test]
    fn register_splits_by_kind_and_keeps_order() {
        let mut p = Pipeline::new();
        let rejected = p.register([
            "wrapSubstrate",
            "moveJunction",
            "updateTubule",
            "mergeTubule",
            "boundSubstrate",
            "contractTubule",
        ]);

        assert!(rejected.is_empty());
        assert_eq!(
            p.junction_ops(),
            &[
                Operation::MoveJunction,
                Operation::MergeTubule,
                Operation::BoundSubstrate
            ]
        );
        assert_eq!(
            p.tubule_ops(),
            &[
                Operation::WrapSubstrate,
                Operation::UpdateTubule,
                Operation::ContractTubule
            ]
        );
    }

    #[test]
    fn register_skips_unknown_names() {
        let mut p = Pipeline::new();
        let rejected = p.register(vec!["moveJunction", "noSuchThing", "growTubule"]);

        assert_eq!(rejected, vec!["noSuchThing".to_string()]);
        assert_eq!(p.junction_ops(), &[Operation::MoveJunction]);
        assert_eq!(p.tubule_ops(), &[Operation::GrowTubule]);
    }

    #[test]
    fn prune_operations_are_registered_with_their_kind() {
        let mut p = Pipeline::new();
        p.register(["pruneTubule", "pruneJunction"]);
        assert_eq!(p.junction_ops(), &[Operation::PruneJunction]);
        assert_eq!(p.tubule_ops(), &[Operation::PruneTubule]);
    }

    #[test]
    fn default_growth_pipeline_contents() {
        let p = Pipeline::default_growth();
        assert_eq!(
            p.junction_ops(),
            &[
                Operation::MoveJunction,
                Operation::BoundSubstrate,
                Operation::MergeTubule
            ]
        );
        assert_eq!(
            p.tubule_ops(),
            &[
                Operation::UpdateTubule,
                Operation::GrowTubule,
                Operation::ContractTubule,
                Operation::WrapSubstrate
            ]
        );
        assert!(!p.is_empty());
    }
}
