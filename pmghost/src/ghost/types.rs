//! Data structures for the ghost exchange.
use crate::traits::{particles::ParticleSource, types::Count};

/// A (particle, rank) pair selected by the neighbour probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostTarget {
    /// Slot of the owned particle.
    pub particle: usize,

    /// Position of this pair in the probe pass, increases by one per pair across the whole pass.
    pub slot: usize,

    /// Foreign rank receiving a ghost of the particle.
    pub rank: usize,
}

/// Progress of an exchange session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GhostState {
    /// Counts allocated, no ghosts present.
    Initialised,
    /// Ghosts unpacked after the owned particles, counts describe the exchange that produced them.
    Appended,
}

/// State of one ghost exchange session.
///
/// Per rank counts and displacements are allocated once, when the session is created, and persist
/// between the forward exchange and any number of reductions. Send and receive buffers are arena
/// allocations that only live for the duration of a single call.
///
/// # Fields
/// - `source` - Borrowed particle storage, owned particles followed by room for ghosts.
///
/// - `n_owned` - Number of owned particles.
///
/// - `send_counts` - Ghosts sent to each rank by the forward exchange.
///
/// - `send_displacements` - Exclusive prefix sum of `send_counts`, in records.
///
/// - `receive_counts` - Ghosts received from each rank by the forward exchange.
///
/// - `receive_displacements` - Exclusive prefix sum of `receive_counts`, in records.
///
/// - `element_size` - Packed record size of the most recent exchange, in bytes.
///
/// - `n_ghosts` - Ghosts received by the forward exchange, stored in slots `n_owned..n_owned + n_ghosts`.
///
/// - `state` - Progress of the session.
pub struct GhostData<'a, P>
where
    P: ParticleSource,
{
    pub(crate) source: &'a mut P,
    pub(crate) n_owned: usize,
    pub(crate) send_counts: Vec<Count>,
    pub(crate) send_displacements: Vec<Count>,
    pub(crate) receive_counts: Vec<Count>,
    pub(crate) receive_displacements: Vec<Count>,
    pub(crate) element_size: usize,
    pub(crate) n_ghosts: usize,
    pub(crate) state: GhostState,
}
