//! General type definitions

/// Count type used for per rank message sizes, matches the MPI count type.
pub type Count = i32;

/// Error type shared by the arena, the communicators and the ghost exchange.
///
/// None of these are recoverable in a running simulation, they either indicate an exhausted
/// resource or a broken invariant between ranks. They are surfaced as values so that the single
/// caller owning the process lifetime can trigger a collective abort, see [`crate::comm::AbortOnError`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The arena could not reserve its pool.
    #[error("Failed to reserve {0} bytes for the arena")]
    ArenaReserve(usize),

    /// An allocation would exceed the capacity of the arena.
    #[error("Failed to allocate {requested} bytes from the arena, {available} bytes available")]
    ArenaExhausted {
        /// Page rounded size of the request.
        requested: usize,
        /// Bytes remaining in the pool.
        available: usize,
    },

    /// The bounded stack of outstanding allocations is full.
    #[error("Too many outstanding arena allocations, at most {0} are supported")]
    TooManyAllocations(usize),

    /// Release called with no outstanding allocation.
    #[error("Release of block at offset {0} with no outstanding allocation")]
    ReleaseEmpty(usize),

    /// Release called with a block that is not the most recent allocation.
    #[error("Block at offset {offset} is not the last allocated block (offset {top} of size {top_size})")]
    ReleaseOutOfOrder {
        /// Offset of the block passed to release.
        offset: usize,
        /// Offset of the most recent allocation.
        top: usize,
        /// Size of the most recent allocation.
        top_size: usize,
    },

    /// More ghosts were received than the caller reserved space for.
    #[error("Too many ghosts; asking for {requested}, space for {available}")]
    TooManyGhosts {
        /// Ghosts received by this rank.
        requested: usize,
        /// Ghost slots available below the capacity.
        available: usize,
    },

    /// The requested capacity is larger than the particle storage.
    #[error("Capacity {capacity} exceeds particle storage of {storage}")]
    CapacityExceedsStorage {
        /// Capacity requested for owned and ghost particles.
        capacity: usize,
        /// Capacity of the particle storage.
        storage: usize,
    },

    /// The particle store has no free slot for another owned particle.
    #[error("Particle store is full at {0} particles")]
    StoreFull(usize),

    /// A received block does not match the size agreed in the count exchange.
    #[error("Expected {expected} bytes from rank {source_rank}, received {received}")]
    ShapeMismatch {
        /// Rank the block came from.
        source_rank: usize,
        /// Size agreed in the count exchange.
        expected: usize,
        /// Size actually received.
        received: usize,
    },

    /// A partition segment does not fit its buffer.
    #[error("Segment for rank {rank} does not fit a buffer of {len} bytes")]
    SegmentOutOfBounds {
        /// Rank of the offending segment.
        rank: usize,
        /// Length of the buffer in bytes.
        len: usize,
    },

    /// A per rank array does not have one entry per rank.
    #[error("Expected one entry for each of {expected} ranks, found {found}")]
    RankCountMismatch {
        /// Number of ranks in the communicator.
        expected: usize,
        /// Length of the array.
        found: usize,
    },

    /// A peer rank dropped out of a collective.
    #[error("Rank {0} disconnected during a collective")]
    PeerDisconnected(usize),

    /// A message size does not fit the MPI count type.
    #[error("Message of {0} bytes overflows the MPI count type")]
    CountOverflow(usize),

    /// The communicator and the decomposition disagree on the rank layout.
    #[error("Communicator is rank {comm_rank} of {comm_size}, decomposition is rank {domain_rank} of {domain_size}")]
    RankMismatch {
        /// Rank reported by the communicator.
        comm_rank: usize,
        /// Size reported by the communicator.
        comm_size: usize,
        /// Rank reported by the decomposition.
        domain_rank: usize,
        /// Size reported by the decomposition.
        domain_size: usize,
    },

    /// Reduction requested before ghosts were appended.
    #[error("Ghosts must be appended before they can be reduced")]
    GhostsNotAppended,

    /// A probe pass disagreed with the counts established by the first pass.
    #[error("Probe visited {visited} ghost slots, expected {expected}")]
    ProbeMismatch {
        /// Number of slots established by the count pass.
        expected: usize,
        /// Number of slots visited by this pass.
        visited: usize,
    },

    /// The particle source packed a record of the wrong size.
    #[error("Packed {written} bytes for particle {particle}, element size is {expected}")]
    PackSize {
        /// Particle being packed.
        particle: usize,
        /// Element size from the size query.
        expected: usize,
        /// Bytes actually written.
        written: usize,
    },

    /// A position could not be mapped to a rank.
    #[error("Position of particle {0} could not be mapped to a rank")]
    UnmappedPosition(usize),

    /// A position was mapped to a rank outside the decomposition.
    #[error("Position of particle {particle} was mapped to rank {rank}, decomposition has {n_ranks} ranks")]
    RankOutOfRange {
        /// Particle being probed.
        particle: usize,
        /// Rank returned by the decomposition.
        rank: usize,
        /// Number of ranks in the decomposition.
        n_ranks: usize,
    },

    /// More owned particles than the requested capacity.
    #[error("{n_owned} owned particles exceed a capacity of {capacity}")]
    OwnedExceedsCapacity {
        /// Number of owned particles in the session.
        n_owned: usize,
        /// Capacity requested for owned and ghost particles.
        capacity: usize,
    },

    /// Invalid parameters for a decomposition.
    #[error("Invalid decomposition: {0}")]
    InvalidDecomposition(String),

    /// Invalid halo margin.
    #[error("Invalid halo margin: {0}")]
    InvalidHalo(String),
}

/// Result Type
pub type Result<T> = std::result::Result<T, Error>;
