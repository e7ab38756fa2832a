//! Collective communication traits
use crate::traits::types::{Count, Error, Result};

/// Per rank counts and displacements describing how a buffer is split between ranks.
///
/// Both are measured in records of a fixed element size, not bytes.
#[derive(Clone, Copy, Debug)]
pub struct Segments<'a> {
    /// Number of records for each rank.
    pub counts: &'a [Count],

    /// Offset of the first record for each rank.
    pub displacements: &'a [Count],
}

impl<'a> Segments<'a> {
    /// Constructor
    pub fn new(counts: &'a [Count], displacements: &'a [Count]) -> Self {
        Self {
            counts,
            displacements,
        }
    }

    /// Byte range of the segment belonging to `rank`.
    pub fn byte_range(&self, rank: usize, element_size: usize) -> std::ops::Range<usize> {
        let start = self.displacements[rank] as usize * element_size;
        start..start + self.counts[rank] as usize * element_size
    }

    /// Check there is one segment per rank and that every segment lies inside a buffer.
    ///
    /// # Arguments
    /// * `n_ranks` - Number of ranks in the communicator.
    /// * `len` - Length of the buffer in bytes.
    /// * `element_size` - Size of one record in bytes.
    pub fn validate(&self, n_ranks: usize, len: usize, element_size: usize) -> Result<()> {
        for found in [self.counts.len(), self.displacements.len()] {
            if found != n_ranks {
                return Err(Error::RankCountMismatch {
                    expected: n_ranks,
                    found,
                });
            }
        }

        for rank in 0..n_ranks {
            if self.counts[rank] < 0
                || self.displacements[rank] < 0
                || self.byte_range(rank, element_size).end > len
            {
                return Err(Error::SegmentOutOfBounds { rank, len });
            }
        }

        Ok(())
    }
}

/// The blocking collectives needed by the ghost exchange.
///
/// Every rank must enter each collective, in the same order, with mutually consistent shapes. There
/// is no timeout, a rank that never arrives stalls all of its peers.
pub trait Collective {
    /// Rank of this process.
    fn this_rank(&self) -> usize;

    /// Number of ranks taking part in collectives.
    fn n_ranks(&self) -> usize;

    /// Exchange one count with every rank, entry `r` of the result is the count rank `r` sent here.
    ///
    /// # Arguments
    /// * `send_counts` - One count per destination rank.
    fn all_to_all_counts(&self, send_counts: &[Count]) -> Result<Vec<Count>>;

    /// Variable sized all to all exchange of fixed size records.
    ///
    /// # Arguments
    /// * `send` - Records to send, split between destination ranks by `send_segments`.
    /// * `send_segments` - Records sent to each rank.
    /// * `recv` - Buffer for received records, split between source ranks by `recv_segments`.
    /// * `recv_segments` - Records received from each rank.
    /// * `element_size` - Size of one record in bytes.
    fn all_to_all_varcount(
        &self,
        send: &[u8],
        send_segments: Segments<'_>,
        recv: &mut [u8],
        recv_segments: Segments<'_>,
        element_size: usize,
    ) -> Result<()>;

    /// Terminate every rank taking part in this communicator.
    fn abort(&self, code: i32) -> !;
}
