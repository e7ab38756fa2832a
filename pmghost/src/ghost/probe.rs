//! Neighbour probing and ghost target selection.
use num::NumCast;

use crate::{
    ghost::types::GhostTarget,
    traits::{
        domain::Decomposition,
        particles::ParticleSource,
        types::{Error, Result},
    },
};

/// Visit every (particle, foreign rank) pair whose halo crosses into that rank, returning the
/// number of pairs visited.
///
/// Each owned particle is shifted by every halo offset, in the order of [`crate::HaloMargin::offsets`],
/// and each shifted position is mapped to a rank. The visitor is called once for each distinct
/// rank other than this one, in the order the ranks are first reached. The slot passed to the
/// visitor counts pairs across the whole pass, so two passes over unchanged positions visit
/// identical sequences of targets.
///
/// # Arguments
/// * `domain` - Decomposition providing the halo and the position to rank map.
/// * `source` - Particle storage, also handed to the visitor.
/// * `n_owned` - Number of owned particles, stored in slots `0..n_owned`.
/// * `visit` - Called for every target, an error stops the pass.
pub fn iter_ghosts<D, P, F>(domain: &D, source: &mut P, n_owned: usize, mut visit: F) -> Result<usize>
where
    D: Decomposition,
    P: ParticleSource<Scalar = D::Scalar>,
    F: FnMut(&mut P, GhostTarget) -> Result<()>,
{
    let this_rank = domain.this_rank();
    let n_ranks = domain.n_ranks();
    let cell_size = domain.cell_size();

    // Displacement of each offset, computed once per pass
    let shifts = domain
        .halo()
        .offsets()
        .map(|offset| -> Option<[D::Scalar; 3]> {
            Some([
                <D::Scalar as NumCast>::from(offset[0])? * cell_size[0],
                <D::Scalar as NumCast>::from(offset[1])? * cell_size[1],
                <D::Scalar as NumCast>::from(offset[2])? * cell_size[2],
            ])
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| Error::InvalidHalo("offset not representable".to_string()))?;

    let mut ranks = Vec::with_capacity(shifts.len());
    let mut slot = 0;

    for particle in 0..n_owned {
        let position = source.position(particle);
        ranks.clear();

        for shift in shifts.iter() {
            let candidate = [
                position[0] + shift[0],
                position[1] + shift[1],
                position[2] + shift[2],
            ];

            let rank = domain
                .pos_to_rank(&candidate)
                .ok_or(Error::UnmappedPosition(particle))?;

            if rank >= n_ranks {
                return Err(Error::RankOutOfRange {
                    particle,
                    rank,
                    n_ranks,
                });
            }

            if rank == this_rank || ranks.contains(&rank) {
                continue;
            }
            ranks.push(rank);

            visit(source, GhostTarget { particle, slot, rank })?;
            slot += 1;
        }
    }

    Ok(slot)
}

/// Targets of every owned particle, in visiting order.
#[cfg(test)]
pub(crate) fn ghost_targets<D, P>(domain: &D, source: &mut P, n_owned: usize) -> Result<Vec<GhostTarget>>
where
    D: Decomposition,
    P: ParticleSource<Scalar = D::Scalar>,
{
    let mut targets = Vec::new();
    iter_ghosts(domain, source, n_owned, |_, target| {
        targets.push(target);
        Ok(())
    })?;
    Ok(targets)
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use itertools::Itertools;

    use super::*;
    use crate::{
        domain::types::{HaloMargin, ProcessGrid, ProcessGridBuilder},
        ghost::helpers::fixtures::{particles_fixture, slab_grid},
        particles::types::Particles,
    };

    /// Slab decomposition whose rank map points one past the last rank on the far side of the box.
    struct OverflowingGrid(ProcessGrid<f64>);

    impl Decomposition for OverflowingGrid {
        type Scalar = f64;

        fn box_size(&self) -> &[f64; 3] {
            self.0.box_size()
        }

        fn n_mesh(&self) -> &[usize; 3] {
            self.0.n_mesh()
        }

        fn halo(&self) -> &HaloMargin {
            self.0.halo()
        }

        fn this_rank(&self) -> usize {
            self.0.this_rank()
        }

        fn n_ranks(&self) -> usize {
            self.0.n_ranks()
        }

        fn pos_to_rank(&self, position: &[f64; 3]) -> Option<usize> {
            if position[0] >= 50. {
                Some(self.0.n_ranks())
            } else {
                self.0.pos_to_rank(position)
            }
        }
    }

    #[test]
    fn test_zero_halo_has_no_targets() {
        let grid = slab_grid(1, 4, HaloMargin::zero());
        let mut particles = particles_fixture(&grid, 1000, 1000, 0);
        let n = particles.n_owned();
        let targets = ghost_targets(&grid, &mut particles, n).unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn test_boundary_particles_on_slabs() {
        let grid = slab_grid(0, 4, HaloMargin::symmetric(1));
        let mut particles = Particles::<f64>::new(4);
        // Upper edge, lower edge (wraps to the last rank), interior
        particles.push([24.5, 50., 50.], [0.; 3], 0).unwrap();
        particles.push([0.5, 50., 50.], [0.; 3], 1).unwrap();
        particles.push([12.0, 0.5, 99.5], [0.; 3], 2).unwrap();

        let targets = ghost_targets(&grid, &mut particles, 3).unwrap();

        assert_eq!(
            targets,
            vec![
                GhostTarget {
                    particle: 0,
                    slot: 0,
                    rank: 1
                },
                GhostTarget {
                    particle: 1,
                    slot: 1,
                    rank: 3
                },
            ]
        );
    }

    #[test]
    fn test_corner_particle_on_pencils() {
        let grid = ProcessGridBuilder::<f64>::new()
            .mesh([1., 1., 1.], [8, 8, 8])
            .unwrap()
            .decomposition([2, 2], 0)
            .unwrap()
            .halo(HaloMargin::symmetric(1))
            .unwrap()
            .build()
            .unwrap();

        // Inside the last cell of rank 0 along axes 0 and 1
        let mut particles = Particles::<f64>::new(1);
        particles.push([0.45, 0.45, 0.5], [0.; 3], 0).unwrap();

        let targets = ghost_targets(&grid, &mut particles, 1).unwrap();
        let ranks = targets.iter().map(|t| t.rank).collect_vec();

        // Each neighbour exactly once, in the order first reached, never this rank
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(targets.iter().map(|t| t.slot).collect_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn test_targets_are_unique_per_particle() {
        let grid = slab_grid(2, 4, HaloMargin::symmetric(1));
        let mut particles = particles_fixture(&grid, 5000, 5000, 3);
        let n = particles.n_owned();
        let targets = ghost_targets(&grid, &mut particles, n).unwrap();

        assert!(!targets.is_empty());
        let unique = targets
            .iter()
            .map(|t| (t.particle, t.rank))
            .collect::<HashSet<_>>();
        assert_eq!(unique.len(), targets.len());
        assert!(targets.iter().all(|t| t.rank != 2));

        // Slots count every visit
        for (i, target) in targets.iter().enumerate() {
            assert_eq!(target.slot, i);
        }
    }

    #[test]
    fn test_two_passes_agree() {
        let grid = slab_grid(0, 4, HaloMargin::new([-1, -1, -1], [1, 1, 1]).unwrap());
        let mut particles = particles_fixture(&grid, 2000, 2000, 5);
        let n = particles.n_owned();

        let mut counts = vec![0usize; 4];
        let n_counted = iter_ghosts(&grid, &mut particles, n, |_, target| {
            counts[target.rank] += 1;
            Ok(())
        })
        .unwrap();

        let mut n_visited = 0;
        let n_packed = iter_ghosts(&grid, &mut particles, n, |_, target| {
            assert_eq!(target.slot, n_visited);
            n_visited += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(n_counted, counts.iter().sum::<usize>());
        assert_eq!(n_counted, n_packed);
        assert_eq!(n_visited, n_packed);
        assert_eq!(counts[0], 0);
    }

    #[test]
    fn test_unmapped_position() {
        let grid = slab_grid(0, 2, HaloMargin::symmetric(1));
        let mut particles = Particles::<f64>::new(2);
        particles.push([1., 1., 1.], [0.; 3], 0).unwrap();
        particles.push([f64::NAN, 1., 1.], [0.; 3], 1).unwrap();

        assert_eq!(
            ghost_targets(&grid, &mut particles, 2),
            Err(Error::UnmappedPosition(1))
        );
    }

    #[test]
    fn test_visitor_error_stops_pass() {
        let grid = slab_grid(0, 4, HaloMargin::symmetric(1));
        let mut particles = particles_fixture(&grid, 1000, 1000, 9);
        let n = particles.n_owned();

        let mut calls = 0;
        let result = iter_ghosts(&grid, &mut particles, n, |_, _| {
            calls += 1;
            Err(Error::GhostsNotAppended)
        });
        assert_eq!(result, Err(Error::GhostsNotAppended));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_rank_out_of_range() {
        let grid = OverflowingGrid(slab_grid(0, 2, HaloMargin::symmetric(1)));
        let mut particles = Particles::<f64>::new(2);
        particles.push([10., 1., 1.], [0.; 3], 0).unwrap();
        particles.push([49.5, 1., 1.], [0.; 3], 1).unwrap();

        let mut calls = 0;
        let result = iter_ghosts(&grid, &mut particles, 2, |_, _| {
            calls += 1;
            Ok(())
        });

        assert_eq!(
            result,
            Err(Error::RankOutOfRange {
                particle: 1,
                rank: 2,
                n_ranks: 2
            })
        );
        assert_eq!(calls, 0);
    }
}
