//! Data structures for communicators.
use crossbeam_channel::{Receiver, Sender};

/// An in-process communicator, each rank runs on its own thread.
///
/// Ranks are connected by one unbounded channel per ordered pair of ranks, so messages between
/// two ranks arrive in the order they were sent and successive collectives cannot interleave.
///
/// # Fields
/// - `rank` - Rank of this handle.
///
/// - `senders` - Channel to each destination rank, indexed by destination.
///
/// - `receivers` - Channel from each source rank, indexed by source.
#[derive(Debug)]
pub struct LocalCommunicator {
    pub(crate) rank: usize,
    pub(crate) senders: Vec<Sender<Vec<u8>>>,
    pub(crate) receivers: Vec<Receiver<Vec<u8>>>,
}
