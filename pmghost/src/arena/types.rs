//! Data structures for the stack arena.

/// Record of one outstanding allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AllocationRecord {
    /// Offset of the allocation in the pool.
    pub(crate) offset: usize,

    /// Page rounded size of the allocation.
    pub(crate) size: usize,

    /// Unique id of the allocation over the lifetime of the arena.
    pub(crate) serial: u64,
}

/// A fixed capacity pool with bump allocation and strictly nested (LIFO) release.
///
/// # Fields
/// - `pool` - The reserved region.
///
/// - `free` - Offset of the first unallocated byte.
///
/// - `used_bytes` - Bytes currently allocated, always equal to `free`.
///
/// - `max_usage` - Largest value of `used_bytes` seen over the lifetime of the arena.
///
/// - `records` - Stack of outstanding allocations, most recent last.
///
/// - `next_serial` - Serial assigned to the next allocation.
#[derive(Debug)]
pub struct Arena {
    pub(crate) pool: Vec<u8>,
    pub(crate) free: usize,
    pub(crate) used_bytes: usize,
    pub(crate) max_usage: usize,
    pub(crate) records: Vec<AllocationRecord>,
    pub(crate) next_serial: u64,
}

/// Handle to a live allocation in an [`Arena`].
///
/// Handles are move only and consumed by [`Arena::release`], so a released block cannot be read
/// through a stale handle.
#[derive(Debug, PartialEq, Eq)]
pub struct Block {
    /// Offset of the block in the pool.
    pub(crate) offset: usize,

    /// Requested size in bytes.
    pub(crate) len: usize,

    /// Serial of the matching allocation record.
    pub(crate) serial: u64,
}
