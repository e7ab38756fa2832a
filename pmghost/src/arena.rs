//! # Stack Arena
//!
//! A fixed size pool serving page granular allocations from a bump pointer. Only the most recent
//! allocation may be released, so the pool never fragments and is empty again at the end of each
//! exchange.
pub mod constants;
pub mod types;

mod heap;
