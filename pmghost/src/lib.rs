//! # Ghost Particle Exchange for Particle-Mesh Simulations
//!
//! Distributed particle-mesh codes decompose the simulation box over a grid of MPI ranks. Particles
//! near the edge of a rank's region influence mesh cells owned by neighbouring ranks, so a copy of
//! their data (a 'ghost') has to be present on those ranks before the mesh is painted, and any
//! quantity computed on a ghost has to be reduced back into its owner afterwards.
//!
//! Notable features of this library are:
//! * Neighbour probing over a configurable halo of mesh cells, with per particle de-duplication of destination ranks.
//! * A two phase collective protocol, counts are exchanged before any data so that all receive buffers are sized exactly.
//! * Reduction of ghost computed quantities back into owners, over arbitrary attribute selections.
//! * A stack (LIFO) arena for the transient exchange buffers, which never fragments between timesteps.
//! * Trait based interfaces for the decomposition, particle storage and communicator, with an in-process
//!   communicator for testing and an MPI communicator behind the `mpi` feature.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod arena;
pub mod comm;
pub mod domain;
pub mod ghost;
pub mod particles;
pub mod traits;

// Public API
#[doc(inline)]
pub use arena::types::Arena;
#[doc(inline)]
pub use arena::types::Block;
#[doc(inline)]
pub use comm::types::LocalCommunicator;
#[doc(inline)]
pub use comm::AbortOnError;
#[doc(inline)]
pub use domain::types::HaloMargin;
#[doc(inline)]
pub use domain::types::ProcessGrid;
#[doc(inline)]
pub use domain::types::ProcessGridBuilder;
#[doc(inline)]
pub use ghost::types::GhostData;
#[doc(inline)]
pub use ghost::types::GhostTarget;
#[doc(inline)]
pub use particles::types::Attributes;
#[doc(inline)]
pub use particles::types::Particles;
#[doc(inline)]
pub use traits::types::Error;
#[doc(inline)]
pub use traits::types::Result;
