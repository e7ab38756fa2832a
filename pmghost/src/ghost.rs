//! # Ghost Exchange
//!
//! Replicates particles whose halo reaches into the regions of other ranks, and reduces quantities
//! computed on those replicas back into their owners.
//!
//! An exchange session borrows the particle storage in a [`types::GhostData`]. Ghosts are appended
//! once with [`types::GhostData::append_ghosts`], after which any number of reductions may be made
//! with [`types::GhostData::reduce_ghosts`], possibly over different attribute selections.
pub mod helpers;
pub mod types;

mod data;
mod exchange;
mod probe;

pub use probe::iter_ghosts;
