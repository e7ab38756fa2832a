//! # Trait Definitions
pub mod comm;
pub mod domain;
pub mod particles;
pub mod types;
