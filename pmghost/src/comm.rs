//! # Communicators
//!
//! Implementations of [`Collective`], and the boundary at which a fatal error is turned into a
//! collective abort.
pub mod types;

mod local;
#[cfg(feature = "mpi")]
mod mpi_comm;

use tracing::error;

use crate::traits::{comm::Collective, types::Result};

/// Exit code passed to [`Collective::abort`] by [`AbortOnError`].
pub const ABORT_CODE: i32 = -1;

/// Terminate every rank on a fatal error.
///
/// Ghost exchange errors cannot be recovered from on a single rank, since peers are left waiting
/// in a collective. This is meant to be used once, by the caller owning the process lifetime.
pub trait AbortOnError<T> {
    /// Return the value, or log the error and abort all ranks of `comm`.
    fn or_abort<C: Collective>(self, comm: &C) -> T;
}

impl<T> AbortOnError<T> for Result<T> {
    fn or_abort<C: Collective>(self, comm: &C) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                error!(rank = comm.this_rank(), %err, "fatal error, aborting all ranks");
                comm.abort(ABORT_CODE)
            }
        }
    }
}
