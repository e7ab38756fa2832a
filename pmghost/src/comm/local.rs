//! In-process communicator, one thread per rank.
use std::{panic, thread};

use crossbeam_channel::unbounded;
use tracing::error;

use crate::{
    comm::types::LocalCommunicator,
    traits::{
        comm::{Collective, Segments},
        types::{Count, Error, Result},
    },
};

impl LocalCommunicator {
    /// Create the handles of a group of `size` ranks, handle `r` is rank `r`.
    ///
    /// # Arguments
    /// * `size` - Number of ranks in the group.
    pub fn group(size: usize) -> Vec<Self> {
        let mut senders = (0..size).map(|_| Vec::with_capacity(size)).collect::<Vec<_>>();
        let mut receivers = (0..size).map(|_| Vec::with_capacity(size)).collect::<Vec<_>>();

        // receivers[dst] is filled in source order
        for source in senders.iter_mut() {
            for destination in receivers.iter_mut() {
                let (s, r) = unbounded();
                source.push(s);
                destination.push(r);
            }
        }

        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (senders, receivers))| Self {
                rank,
                senders,
                receivers,
            })
            .collect()
    }

    /// Run `f` on every rank of a new group of `size` ranks, each on its own thread, returning the
    /// results in rank order.
    ///
    /// A panic on any rank is propagated once all threads have finished.
    ///
    /// # Arguments
    /// * `size` - Number of ranks in the group.
    /// * `f` - Body executed by every rank.
    pub fn spawn<F, R>(size: usize, f: F) -> Vec<R>
    where
        F: Fn(LocalCommunicator) -> R + Sync,
        R: Send,
    {
        let f = &f;
        thread::scope(|scope| {
            let handles = Self::group(size)
                .into_iter()
                .map(|comm| scope.spawn(move || f(comm)))
                .collect::<Vec<_>>();

            let results = handles.into_iter().map(|h| h.join()).collect::<Vec<_>>();

            results
                .into_iter()
                .map(|result| result.unwrap_or_else(|payload| panic::resume_unwind(payload)))
                .collect()
        })
    }

    /// Send one block to every rank and receive one block from every rank.
    fn exchange(&self, blocks: Vec<Vec<u8>>) -> Result<Vec<Vec<u8>>> {
        for (destination, block) in blocks.into_iter().enumerate() {
            self.senders[destination]
                .send(block)
                .map_err(|_| Error::PeerDisconnected(destination))?;
        }

        self.receivers
            .iter()
            .enumerate()
            .map(|(source, receiver)| receiver.recv().map_err(|_| Error::PeerDisconnected(source)))
            .collect()
    }
}

impl Collective for LocalCommunicator {
    fn this_rank(&self) -> usize {
        self.rank
    }

    fn n_ranks(&self) -> usize {
        self.senders.len()
    }

    fn all_to_all_counts(&self, send_counts: &[Count]) -> Result<Vec<Count>> {
        if send_counts.len() != self.n_ranks() {
            return Err(Error::RankCountMismatch {
                expected: self.n_ranks(),
                found: send_counts.len(),
            });
        }

        let blocks = send_counts
            .iter()
            .map(|count| count.to_le_bytes().to_vec())
            .collect();

        self.exchange(blocks)?
            .into_iter()
            .enumerate()
            .map(|(source, block)| {
                let bytes: [u8; 4] = block.as_slice().try_into().map_err(|_| Error::ShapeMismatch {
                    source_rank: source,
                    expected: 4,
                    received: block.len(),
                })?;
                Ok(Count::from_le_bytes(bytes))
            })
            .collect()
    }

    fn all_to_all_varcount(
        &self,
        send: &[u8],
        send_segments: Segments<'_>,
        recv: &mut [u8],
        recv_segments: Segments<'_>,
        element_size: usize,
    ) -> Result<()> {
        let n_ranks = self.n_ranks();
        send_segments.validate(n_ranks, send.len(), element_size)?;
        recv_segments.validate(n_ranks, recv.len(), element_size)?;

        let blocks = (0..n_ranks)
            .map(|destination| send[send_segments.byte_range(destination, element_size)].to_vec())
            .collect();

        for (source, block) in self.exchange(blocks)?.into_iter().enumerate() {
            let range = recv_segments.byte_range(source, element_size);
            if block.len() != range.len() {
                return Err(Error::ShapeMismatch {
                    source_rank: source,
                    expected: range.len(),
                    received: block.len(),
                });
            }
            recv[range].copy_from_slice(&block);
        }

        Ok(())
    }

    fn abort(&self, code: i32) -> ! {
        error!(rank = self.rank, code, "local communicator aborted");
        // Unwinding drops this rank's channels, so peers blocked on it observe a disconnect
        panic!("rank {} aborted with code {code}", self.rank)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::comm::AbortOnError;

    #[test]
    fn test_all_to_all_counts() {
        let results = LocalCommunicator::spawn(3, |comm| {
            let rank = comm.this_rank() as Count;
            // Rank r sends 10 * r + destination to each destination
            let send = (0..3).map(|d| 10 * rank + d).collect::<Vec<_>>();
            comm.all_to_all_counts(&send).unwrap()
        });

        for (rank, received) in results.iter().enumerate() {
            let expected = (0..3).map(|s| 10 * s + rank as Count).collect::<Vec<_>>();
            assert_eq!(received, &expected);
        }
    }

    #[test]
    fn test_successive_collectives_do_not_interleave() {
        let results = LocalCommunicator::spawn(4, |comm| {
            let mut received = Vec::new();
            for round in 0..5 {
                let send = vec![round; 4];
                received.push(comm.all_to_all_counts(&send).unwrap());
            }
            received
        });

        for received in results {
            for (round, counts) in received.into_iter().enumerate() {
                assert_eq!(counts, vec![round as Count; 4]);
            }
        }
    }

    #[test]
    fn test_all_to_all_varcount() {
        let element_size = 2;
        let results = LocalCommunicator::spawn(2, |comm| {
            let rank = comm.this_rank();
            // Rank 0 sends one record to itself and two to rank 1, rank 1 sends one record to each
            let (send_counts, send_displs, recv_counts, recv_displs) = if rank == 0 {
                (vec![1, 2], vec![0, 1], vec![1, 1], vec![0, 1])
            } else {
                (vec![1, 1], vec![0, 1], vec![2, 1], vec![0, 2])
            };
            let n_send: Count = send_counts.iter().sum();
            let n_recv: Count = recv_counts.iter().sum();

            let send = (0..n_send as usize * element_size)
                .map(|i| (100 * rank + i) as u8)
                .collect::<Vec<_>>();
            let mut recv = vec![0u8; n_recv as usize * element_size];

            comm.all_to_all_varcount(
                &send,
                Segments::new(&send_counts, &send_displs),
                &mut recv,
                Segments::new(&recv_counts, &recv_displs),
                element_size,
            )
            .unwrap();
            recv
        });

        assert_eq!(results[0], vec![0, 1, 100, 101]);
        assert_eq!(results[1], vec![2, 3, 4, 5, 102, 103]);
    }

    #[test]
    fn test_shape_mismatch() {
        let results = LocalCommunicator::spawn(2, |comm| {
            // Both ranks send one record to the other, but rank 1 expects two
            let recv_counts = if comm.this_rank() == 0 {
                vec![0, 1]
            } else {
                vec![2, 0]
            };
            let recv_displs = vec![0, 0];
            let send_counts = if comm.this_rank() == 0 {
                vec![0, 1]
            } else {
                vec![1, 0]
            };
            let send = vec![7u8; 4];
            let mut recv = vec![0u8; 8];

            comm.all_to_all_varcount(
                &send,
                Segments::new(&send_counts, &[0, 0]),
                &mut recv,
                Segments::new(&recv_counts, &recv_displs),
                4,
            )
        });

        assert!(results[0].is_ok());
        assert_eq!(
            results[1],
            Err(Error::ShapeMismatch {
                source_rank: 0,
                expected: 8,
                received: 4
            })
        );
    }

    #[test]
    fn test_segment_validation() {
        let mut comm = LocalCommunicator::group(1);
        let comm = comm.remove(0);
        let mut recv = vec![0u8; 4];

        let result = comm.all_to_all_varcount(
            &[0u8; 4],
            Segments::new(&[2], &[0]),
            &mut recv,
            Segments::new(&[1], &[0]),
            4,
        );
        assert_eq!(result, Err(Error::SegmentOutOfBounds { rank: 0, len: 4 }));

        let result = comm.all_to_all_counts(&[1, 2]);
        assert_eq!(
            result,
            Err(Error::RankCountMismatch {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_peer_disconnected() {
        let mut group = LocalCommunicator::group(2);
        let survivor = group.remove(0);
        drop(group);

        assert_eq!(
            survivor.all_to_all_counts(&[0, 1]),
            Err(Error::PeerDisconnected(1))
        );
    }

    #[test]
    #[should_panic(expected = "aborted")]
    fn test_or_abort() {
        let mut group = LocalCommunicator::group(1);
        let comm = group.remove(0);
        let result: Result<()> = Err(Error::GhostsNotAppended);
        result.or_abort(&comm);
    }
}
