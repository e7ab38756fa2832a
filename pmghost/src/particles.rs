//! # Particle Storage
//!
//! Attribute selections for packing, and a structure of arrays particle store with room for ghosts.
pub mod types;

mod attributes;
mod store;
