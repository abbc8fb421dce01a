/// Identifier for a junction in a [`crate::substrate::Substrate`].
///
/// This is an index into the substrate's junction arena. Ids are never
/// reused, so an id is only meaningful within the lifetime of a given
/// `Substrate` instance and goes stale once the junction is swept.
pub type JunctionId = usize;

/// Identifier for a tubule in a [`crate::substrate::Substrate`].
///
/// Same lifetime rules as [`JunctionId`].
pub type TubuleId = usize;
