//! Forward and reverse ghost exchange.
use tracing::{debug, warn};

use crate::{
    arena::types::{Arena, Block},
    ghost::{
        helpers::{exclusive_scan, total, SegmentCursor},
        probe::iter_ghosts,
        types::{GhostData, GhostState},
    },
    particles::types::Attributes,
    traits::{
        comm::{Collective, Segments},
        domain::Decomposition,
        particles::ParticleSource,
        types::{Error, Result},
    },
};

impl<'a, P> GhostData<'a, P>
where
    P: ParticleSource,
{
    /// Replicate owned particles into the ranks their halo reaches, returning the number of ghosts
    /// received.
    ///
    /// Received ghosts are unpacked into slots `n_owned..n_owned + n_ghosts`, grouped by source
    /// rank in ascending order. Every rank of `comm` must call this collectively. Any ghosts from a
    /// previous call are discarded.
    ///
    /// # Arguments
    /// * `domain` - Decomposition, must agree with `comm` on rank and size.
    /// * `comm` - Communicator used for the count and data exchanges.
    /// * `arena` - Arena for the transient send and receive buffers.
    /// * `capacity` - Upper bound on owned plus ghost particles, at most the storage capacity.
    /// * `attributes` - Selection of attributes copied into the ghosts.
    pub fn append_ghosts<D, C>(
        &mut self,
        domain: &D,
        comm: &C,
        arena: &mut Arena,
        capacity: usize,
        attributes: Attributes,
    ) -> Result<usize>
    where
        D: Decomposition<Scalar = P::Scalar>,
        C: Collective,
    {
        self.check_layout(domain, comm)?;

        let storage = self.source.capacity();
        if capacity > storage {
            return Err(Error::CapacityExceedsStorage { capacity, storage });
        }
        if self.n_owned > capacity {
            return Err(Error::OwnedExceedsCapacity {
                n_owned: self.n_owned,
                capacity,
            });
        }

        if self.state == GhostState::Appended {
            warn!(
                rank = comm.this_rank(),
                n_ghosts = self.n_ghosts,
                "discarding previously appended ghosts"
            );
        }
        self.n_ghosts = 0;
        self.state = GhostState::Initialised;

        let element_size = self.source.packed_size(attributes);
        self.element_size = element_size;

        // Count pass
        self.send_counts.fill(0);
        let send_counts = &mut self.send_counts;
        iter_ghosts(domain, &mut *self.source, self.n_owned, |_, target| {
            send_counts[target.rank] += 1;
            Ok(())
        })?;
        let total_send = exclusive_scan(&self.send_counts, &mut self.send_displacements)?;

        let send = arena.allocate(total_send * element_size)?;
        let result = self.forward(domain, comm, arena, &send, capacity, attributes, total_send);
        let released = arena.release(send);
        let n_ghosts = result?;
        released?;

        self.n_ghosts = n_ghosts;
        self.state = GhostState::Appended;

        debug!(
            rank = comm.this_rank(),
            sent = total_send,
            received = n_ghosts,
            element_size,
            "appended ghosts"
        );

        Ok(n_ghosts)
    }

    /// Combine quantities computed on the ghosts back into their owners.
    ///
    /// Each owner receives one contribution per ghost made of it by the last call to
    /// [`GhostData::append_ghosts`], combined with [`ParticleSource::reduce`]. Owned positions must
    /// not have changed since then. Every rank of `comm` must call this collectively, it may be
    /// repeated with different attribute selections.
    ///
    /// # Arguments
    /// * `domain` - Decomposition used to append the ghosts.
    /// * `comm` - Communicator used to append the ghosts.
    /// * `arena` - Arena for the transient send and receive buffers.
    /// * `attributes` - Selection of attributes to reduce.
    pub fn reduce_ghosts<D, C>(
        &mut self,
        domain: &D,
        comm: &C,
        arena: &mut Arena,
        attributes: Attributes,
    ) -> Result<()>
    where
        D: Decomposition<Scalar = P::Scalar>,
        C: Collective,
    {
        if self.state != GhostState::Appended {
            return Err(Error::GhostsNotAppended);
        }
        self.check_layout(domain, comm)?;

        let element_size = self.source.packed_size(attributes);
        self.element_size = element_size;

        let ghosts = arena.allocate(self.n_ghosts * element_size)?;
        let result = self.reverse(domain, comm, arena, &ghosts, attributes);
        let released = arena.release(ghosts);
        result?;
        released?;

        debug!(
            rank = comm.this_rank(),
            sent = self.n_ghosts,
            received = total(&self.send_counts),
            element_size,
            "reduced ghosts"
        );

        Ok(())
    }

    /// Check the communicator, the decomposition and the per rank counts describe the same ranks.
    fn check_layout<D, C>(&self, domain: &D, comm: &C) -> Result<()>
    where
        D: Decomposition,
        C: Collective,
    {
        if comm.this_rank() != domain.this_rank() || comm.n_ranks() != domain.n_ranks() {
            return Err(Error::RankMismatch {
                comm_rank: comm.this_rank(),
                comm_size: comm.n_ranks(),
                domain_rank: domain.this_rank(),
                domain_size: domain.n_ranks(),
            });
        }

        if self.send_counts.len() != comm.n_ranks() {
            return Err(Error::RankCountMismatch {
                expected: comm.n_ranks(),
                found: self.send_counts.len(),
            });
        }

        Ok(())
    }

    /// Pack pass, count exchange and data exchange of `append_ghosts`, once the send block exists.
    #[allow(clippy::too_many_arguments)]
    fn forward<D, C>(
        &mut self,
        domain: &D,
        comm: &C,
        arena: &mut Arena,
        send: &Block,
        capacity: usize,
        attributes: Attributes,
        total_send: usize,
    ) -> Result<usize>
    where
        D: Decomposition<Scalar = P::Scalar>,
        C: Collective,
    {
        let element_size = self.element_size;

        // Pack pass, records are grouped by destination rank
        let buffer = arena.bytes_mut(send);
        let mut cursor = SegmentCursor::new(&self.send_counts, &self.send_displacements);
        let visited = iter_ghosts(domain, &mut *self.source, self.n_owned, |source, target| {
            let record = cursor
                .advance(target.rank)
                .ok_or(Error::ProbeMismatch {
                    expected: total_send,
                    visited: target.slot + 1,
                })?;

            let start = record * element_size;
            let out = &mut buffer[start..start + element_size];
            let written = source.pack(target.particle, out, attributes);
            if written != element_size {
                return Err(Error::PackSize {
                    particle: target.particle,
                    expected: element_size,
                    written,
                });
            }
            Ok(())
        })?;

        if visited != total_send {
            return Err(Error::ProbeMismatch {
                expected: total_send,
                visited,
            });
        }

        // Receive sizes are known on every rank before any data moves
        let receive_counts = comm.all_to_all_counts(&self.send_counts)?;
        if receive_counts.len() != self.receive_counts.len() {
            return Err(Error::RankCountMismatch {
                expected: self.receive_counts.len(),
                found: receive_counts.len(),
            });
        }
        self.receive_counts.copy_from_slice(&receive_counts);
        let total_receive = exclusive_scan(&self.receive_counts, &mut self.receive_displacements)?;

        if self.n_owned + total_receive > capacity {
            return Err(Error::TooManyGhosts {
                requested: total_receive,
                available: capacity.saturating_sub(self.n_owned),
            });
        }

        let receive = arena.allocate(total_receive * element_size)?;
        let result = self.receive(comm, arena, send, &receive, attributes, total_receive);
        let released = arena.release(receive);
        result?;
        released?;

        Ok(total_receive)
    }

    /// Data exchange of `append_ghosts`, unpacking received records after the owned particles.
    fn receive<C>(
        &mut self,
        comm: &C,
        arena: &mut Arena,
        send: &Block,
        receive: &Block,
        attributes: Attributes,
        total_receive: usize,
    ) -> Result<()>
    where
        C: Collective,
    {
        let element_size = self.element_size;
        let (send_bytes, receive_bytes) = arena.pair_mut(send, receive);

        comm.all_to_all_varcount(
            send_bytes,
            Segments::new(&self.send_counts, &self.send_displacements),
            receive_bytes,
            Segments::new(&self.receive_counts, &self.receive_displacements),
            element_size,
        )?;

        for i in 0..total_receive {
            let start = i * element_size;
            self.source.unpack(
                self.n_owned + i,
                &receive_bytes[start..start + element_size],
                attributes,
            );
        }

        Ok(())
    }

    /// Pack the ghosts, run the inverse exchange and combine the records into their owners.
    fn reverse<D, C>(
        &mut self,
        domain: &D,
        comm: &C,
        arena: &mut Arena,
        ghosts: &Block,
        attributes: Attributes,
    ) -> Result<()>
    where
        D: Decomposition<Scalar = P::Scalar>,
        C: Collective,
    {
        let element_size = self.element_size;

        let buffer = arena.bytes_mut(ghosts);
        for i in 0..self.n_ghosts {
            let particle = self.n_owned + i;
            let start = i * element_size;
            let written = self
                .source
                .pack(particle, &mut buffer[start..start + element_size], attributes);
            if written != element_size {
                return Err(Error::PackSize {
                    particle,
                    expected: element_size,
                    written,
                });
            }
        }

        let total_send = total(&self.send_counts);
        let owners = arena.allocate(total_send * element_size)?;
        let result = self.combine(domain, comm, arena, ghosts, &owners, attributes, total_send);
        let released = arena.release(owners);
        result?;
        released
    }

    /// Inverse data exchange of `reduce_ghosts` followed by the reduction probe.
    #[allow(clippy::too_many_arguments)]
    fn combine<D, C>(
        &mut self,
        domain: &D,
        comm: &C,
        arena: &mut Arena,
        ghosts: &Block,
        owners: &Block,
        attributes: Attributes,
        total_send: usize,
    ) -> Result<()>
    where
        D: Decomposition<Scalar = P::Scalar>,
        C: Collective,
    {
        let element_size = self.element_size;
        let (ghost_bytes, owner_bytes) = arena.pair_mut(ghosts, owners);

        // Forward receive side sends, forward send side receives
        comm.all_to_all_varcount(
            ghost_bytes,
            Segments::new(&self.receive_counts, &self.receive_displacements),
            owner_bytes,
            Segments::new(&self.send_counts, &self.send_displacements),
            element_size,
        )?;

        let owner_bytes: &[u8] = owner_bytes;
        let mut cursor = SegmentCursor::new(&self.send_counts, &self.send_displacements);
        let visited = iter_ghosts(domain, &mut *self.source, self.n_owned, |source, target| {
            let record = cursor
                .advance(target.rank)
                .ok_or(Error::ProbeMismatch {
                    expected: total_send,
                    visited: target.slot + 1,
                })?;

            let start = record * element_size;
            source.reduce(
                target.particle,
                &owner_bytes[start..start + element_size],
                attributes,
            );
            Ok(())
        })?;

        if visited != total_send {
            return Err(Error::ProbeMismatch {
                expected: total_send,
                visited,
            });
        }

        Ok(())
    }
}
