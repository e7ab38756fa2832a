//! Implementation of the stack arena.
use tracing::trace;

use crate::{
    arena::{
        constants::{MAX_ALLOCATIONS, PAGE_SIZE},
        types::{AllocationRecord, Arena, Block},
    },
    traits::types::{Error, Result},
};

/// Round a request up to a whole number of pages.
fn page_round(bytes: usize) -> usize {
    bytes.div_ceil(PAGE_SIZE) * PAGE_SIZE
}

impl Arena {
    /// Reserve a pool of `capacity` bytes.
    ///
    /// # Arguments
    /// * `capacity` - Size of the pool in bytes, fixed for the lifetime of the arena.
    pub fn new(capacity: usize) -> Result<Self> {
        let mut pool = Vec::new();
        pool.try_reserve_exact(capacity)
            .map_err(|_| Error::ArenaReserve(capacity))?;
        pool.resize(capacity, 0u8);

        Ok(Self {
            pool,
            free: 0,
            used_bytes: 0,
            max_usage: 0,
            records: Vec::with_capacity(MAX_ALLOCATIONS),
            next_serial: 0,
        })
    }

    /// Allocate a block of at least `bytes` bytes, rounded up to a whole number of pages.
    ///
    /// Contents of the block are whatever was last written to that part of the pool.
    ///
    /// # Arguments
    /// * `bytes` - Requested size in bytes.
    pub fn allocate(&mut self, bytes: usize) -> Result<Block> {
        let size = page_round(bytes);

        if self.records.len() == MAX_ALLOCATIONS {
            return Err(Error::TooManyAllocations(MAX_ALLOCATIONS));
        }

        if size > self.available_bytes() {
            return Err(Error::ArenaExhausted {
                requested: size,
                available: self.available_bytes(),
            });
        }

        let offset = self.free;
        let serial = self.next_serial;
        self.next_serial += 1;
        self.free += size;
        self.used_bytes += size;
        self.max_usage = self.max_usage.max(self.used_bytes);
        self.records.push(AllocationRecord {
            offset,
            size,
            serial,
        });

        trace!(offset, size, used = self.used_bytes, "arena allocate");

        Ok(Block {
            offset,
            len: bytes,
            serial,
        })
    }

    /// Release the most recent allocation.
    ///
    /// Releasing any other block is an integrity error. The arena is left untouched in that case,
    /// callers are expected to abort rather than continue.
    ///
    /// # Arguments
    /// * `block` - The most recently allocated live block.
    pub fn release(&mut self, block: Block) -> Result<()> {
        let Some(&top) = self.records.last() else {
            return Err(Error::ReleaseEmpty(block.offset));
        };

        if top.serial != block.serial || top.offset != block.offset {
            return Err(Error::ReleaseOutOfOrder {
                offset: block.offset,
                top: top.offset,
                top_size: top.size,
            });
        }

        self.records.pop();
        self.free -= top.size;
        self.used_bytes -= top.size;

        trace!(offset = top.offset, size = top.size, used = self.used_bytes, "arena release");

        Ok(())
    }

    /// Maximum number of bytes in use at any point over the lifetime of the arena.
    pub fn peak_usage(&self) -> usize {
        self.max_usage
    }

    /// Bytes currently allocated, including page rounding.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Capacity of the pool.
    pub fn total_bytes(&self) -> usize {
        self.pool.len()
    }

    /// Bytes that can still be allocated.
    pub fn available_bytes(&self) -> usize {
        self.total_bytes() - self.used_bytes
    }

    /// Number of outstanding allocations.
    pub fn n_allocations(&self) -> usize {
        self.records.len()
    }

    /// Contents of a live block.
    pub fn bytes(&self, block: &Block) -> &[u8] {
        &self.pool[block.offset..block.offset + block.len]
    }

    /// Mutable contents of a live block.
    pub fn bytes_mut(&mut self, block: &Block) -> &mut [u8] {
        &mut self.pool[block.offset..block.offset + block.len]
    }

    /// Mutable contents of two distinct live blocks at once, returned in argument order.
    ///
    /// # Panics
    /// If the same block is passed twice.
    pub fn pair_mut(&mut self, a: &Block, b: &Block) -> (&mut [u8], &mut [u8]) {
        assert_ne!(a.serial, b.serial, "pair_mut requires two distinct blocks");

        let (lower, upper, swapped) = if (a.offset, a.serial) < (b.offset, b.serial) {
            (a, b, false)
        } else {
            (b, a, true)
        };

        let (head, tail) = self.pool.split_at_mut(upper.offset);
        let lower_bytes = &mut head[lower.offset..lower.offset + lower.len];
        let upper_bytes = &mut tail[..upper.len];

        if swapped {
            (upper_bytes, lower_bytes)
        } else {
            (lower_bytes, upper_bytes)
        }
    }
}

impl Block {
    /// Requested size of the block in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the block has zero length.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of the block within the pool, always a multiple of the page size.
    pub fn offset(&self) -> usize {
        self.offset
    }
}
