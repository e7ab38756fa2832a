//! MPI communicator.
use mpi::{
    datatype::{Partition, PartitionMut},
    topology::SimpleCommunicator,
    traits::{Communicator, CommunicatorCollectives},
};

use crate::traits::{
    comm::{Collective, Segments},
    types::{Count, Error, Result},
};

/// Scale record counts or displacements to bytes, checking they still fit the MPI count type.
fn to_bytes(records: &[Count], element_size: usize) -> Result<Vec<Count>> {
    records
        .iter()
        .map(|&r| {
            let bytes = r as usize * element_size;
            Count::try_from(bytes).map_err(|_| Error::CountOverflow(bytes))
        })
        .collect()
}

impl Collective for SimpleCommunicator {
    fn this_rank(&self) -> usize {
        Communicator::rank(self) as usize
    }

    fn n_ranks(&self) -> usize {
        Communicator::size(self) as usize
    }

    fn all_to_all_counts(&self, send_counts: &[Count]) -> Result<Vec<Count>> {
        let n_ranks = Collective::n_ranks(self);
        if send_counts.len() != n_ranks {
            return Err(Error::RankCountMismatch {
                expected: n_ranks,
                found: send_counts.len(),
            });
        }

        let mut receive_counts = vec![0 as Count; n_ranks];
        self.all_to_all_into(send_counts, &mut receive_counts[..]);
        Ok(receive_counts)
    }

    fn all_to_all_varcount(
        &self,
        send: &[u8],
        send_segments: Segments<'_>,
        recv: &mut [u8],
        recv_segments: Segments<'_>,
        element_size: usize,
    ) -> Result<()> {
        let n_ranks = Collective::n_ranks(self);
        send_segments.validate(n_ranks, send.len(), element_size)?;
        recv_segments.validate(n_ranks, recv.len(), element_size)?;

        // Records are exchanged as contiguous runs of bytes
        let send_counts = to_bytes(send_segments.counts, element_size)?;
        let send_displacements = to_bytes(send_segments.displacements, element_size)?;
        let recv_counts = to_bytes(recv_segments.counts, element_size)?;
        let recv_displacements = to_bytes(recv_segments.displacements, element_size)?;

        let partition_send = Partition::new(send, &send_counts[..], &send_displacements[..]);
        let mut partition_recv =
            PartitionMut::new(recv, &recv_counts[..], &recv_displacements[..]);

        self.all_to_all_varcount_into(&partition_send, &mut partition_recv);

        Ok(())
    }

    fn abort(&self, code: i32) -> ! {
        tracing::error!(rank = Collective::this_rank(self), code, "calling MPI_Abort");
        Communicator::abort(self, code)
    }
}
