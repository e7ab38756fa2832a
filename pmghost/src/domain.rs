//! # Domain Decomposition
//!
//! A periodic box discretised by a mesh, split over a two dimensional grid of ranks, with a halo of
//! mesh cells that sets how far a particle's influence reaches.
pub mod types;

mod builder;
mod halo;
mod process_grid;
