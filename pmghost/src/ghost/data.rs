//! Construction and accessors of an exchange session.
use crate::{
    ghost::types::{GhostData, GhostState},
    traits::{domain::Decomposition, particles::ParticleSource, types::Count},
};

impl<'a, P> GhostData<'a, P>
where
    P: ParticleSource,
{
    /// Start an exchange session over borrowed particle storage.
    ///
    /// Per rank counts are sized to the decomposition and zeroed. The session is torn down when
    /// dropped, which also ends the borrow of `source`.
    ///
    /// # Arguments
    /// * `domain` - Decomposition the exchange runs over.
    /// * `source` - Particle storage, owned particles in slots `0..n_owned`.
    /// * `n_owned` - Number of owned particles.
    pub fn new<D>(domain: &D, source: &'a mut P, n_owned: usize) -> Self
    where
        D: Decomposition<Scalar = P::Scalar>,
    {
        let n_ranks = domain.n_ranks();

        Self {
            source,
            n_owned,
            send_counts: vec![0; n_ranks],
            send_displacements: vec![0; n_ranks],
            receive_counts: vec![0; n_ranks],
            receive_displacements: vec![0; n_ranks],
            element_size: 0,
            n_ghosts: 0,
            state: GhostState::Initialised,
        }
    }

    /// Number of owned particles.
    pub fn n_owned(&self) -> usize {
        self.n_owned
    }

    /// Number of ghosts held after the owned particles.
    pub fn n_ghosts(&self) -> usize {
        self.n_ghosts
    }

    /// Record size of the most recent exchange in bytes.
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Ghosts sent to each rank by the forward exchange.
    pub fn send_counts(&self) -> &[Count] {
        &self.send_counts
    }

    /// Offset of the first record sent to each rank.
    pub fn send_displacements(&self) -> &[Count] {
        &self.send_displacements
    }

    /// Ghosts received from each rank by the forward exchange.
    pub fn receive_counts(&self) -> &[Count] {
        &self.receive_counts
    }

    /// Offset of the first record received from each rank.
    pub fn receive_displacements(&self) -> &[Count] {
        &self.receive_displacements
    }

    /// Borrowed particle storage.
    pub fn particles(&self) -> &P {
        &*self.source
    }

    /// Mutable borrowed particle storage, for computing on owned particles and ghosts between
    /// exchanges.
    pub fn particles_mut(&mut self) -> &mut P {
        &mut *self.source
    }

    /// Whether ghosts have been appended in this session.
    pub fn is_appended(&self) -> bool {
        self.state == GhostState::Appended
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        domain::types::HaloMargin,
        ghost::helpers::fixtures::{particles_fixture, slab_grid},
    };

    #[test]
    fn test_new_session() {
        let grid = slab_grid(1, 3, HaloMargin::symmetric(1));
        let mut particles = particles_fixture(&grid, 10, 20, 0);

        let session = GhostData::new(&grid, &mut particles, 10);
        assert_eq!(session.n_owned(), 10);
        assert_eq!(session.n_ghosts(), 0);
        assert_eq!(session.element_size(), 0);
        assert_eq!(session.send_counts(), &[0, 0, 0]);
        assert_eq!(session.send_displacements(), &[0, 0, 0]);
        assert_eq!(session.receive_counts(), &[0, 0, 0]);
        assert_eq!(session.receive_displacements(), &[0, 0, 0]);
        assert!(!session.is_appended());
        assert_eq!(session.particles().capacity(), 20);
    }

    #[test]
    fn test_drop_ends_borrow() {
        let grid = slab_grid(0, 2, HaloMargin::zero());
        let mut particles = particles_fixture(&grid, 4, 4, 0);

        {
            let mut session = GhostData::new(&grid, &mut particles, 4);
            session.particles_mut().densities_mut()[0] = 2.0;
        }

        assert_eq!(particles.densities()[0], 2.0);
    }
}
