//! Builder for process grid decompositions.
use num::Float;

use crate::{
    domain::{
        process_grid::slab_edges,
        types::{HaloMargin, ProcessGrid, ProcessGridBuilder},
    },
    traits::types::{Error, Result},
};

impl<T> ProcessGridBuilder<T>
where
    T: Float,
{
    /// Init
    pub fn new() -> Self {
        Self {
            box_size: None,
            n_mesh: None,
            process_mesh: None,
            rank: None,
            halo: None,
        }
    }

    /// Periodic box and its mesh.
    ///
    /// # Arguments
    /// * `box_size` - Side length of the box along each axis, must be positive.
    /// * `n_mesh` - Number of mesh cells along each axis, must be positive.
    pub fn mesh(mut self, box_size: [T; 3], n_mesh: [usize; 3]) -> Result<Self> {
        if box_size.iter().any(|&l| !(l.is_finite() && l > T::zero())) {
            Err(Error::InvalidDecomposition(
                "box size must be finite and positive along every axis".to_string(),
            ))
        } else if n_mesh.iter().any(|&n| n == 0) {
            Err(Error::InvalidDecomposition(
                "mesh must have at least one cell along every axis".to_string(),
            ))
        } else {
            self.box_size = Some(box_size);
            self.n_mesh = Some(n_mesh);
            Ok(self)
        }
    }

    /// Process grid and the rank this decomposition is viewed from.
    ///
    /// # Arguments
    /// * `process_mesh` - Number of ranks along axes 0 and 1.
    /// * `rank` - This rank, `rank < process_mesh[0] * process_mesh[1]`.
    pub fn decomposition(mut self, process_mesh: [usize; 2], rank: usize) -> Result<Self> {
        let n_ranks = process_mesh[0] * process_mesh[1];
        if n_ranks == 0 {
            Err(Error::InvalidDecomposition(
                "process mesh must have at least one rank along each axis".to_string(),
            ))
        } else if rank >= n_ranks {
            Err(Error::InvalidDecomposition(format!(
                "rank {rank} outside a process mesh of {n_ranks} ranks"
            )))
        } else {
            self.process_mesh = Some(process_mesh);
            self.rank = Some(rank);
            Ok(self)
        }
    }

    /// Halo margin, defaults to [`HaloMargin::zero`].
    ///
    /// # Arguments
    /// * `halo` - Halo of mesh cells around each particle.
    pub fn halo(mut self, halo: HaloMargin) -> Result<Self> {
        self.halo = Some(halo);
        Ok(self)
    }

    /// Validate and construct the decomposition.
    pub fn build(self) -> Result<ProcessGrid<T>> {
        let (Some(box_size), Some(n_mesh)) = (self.box_size, self.n_mesh) else {
            return Err(Error::InvalidDecomposition(
                "mesh must be set before building".to_string(),
            ));
        };

        let (Some(process_mesh), Some(rank)) = (self.process_mesh, self.rank) else {
            return Err(Error::InvalidDecomposition(
                "process mesh must be set before building".to_string(),
            ));
        };

        let halo = self.halo.unwrap_or_default();

        for d in 0..2 {
            if process_mesh[d] > n_mesh[d] {
                return Err(Error::InvalidDecomposition(format!(
                    "{} ranks along axis {d} of a mesh with {} cells",
                    process_mesh[d], n_mesh[d]
                )));
            }

            // Narrowest slab bounds how far a halo may reach
            let narrowest = n_mesh[d] / process_mesh[d];
            if process_mesh[d] > 1 && halo.reach(d) > narrowest {
                return Err(Error::InvalidHalo(format!(
                    "reach of {} cells along axis {d} exceeds the narrowest slab of {narrowest} cells",
                    halo.reach(d)
                )));
            }
        }

        let edges = [
            slab_edges(n_mesh[0], process_mesh[0]),
            slab_edges(n_mesh[1], process_mesh[1]),
        ];

        Ok(ProcessGrid {
            box_size,
            n_mesh,
            process_mesh,
            edges,
            halo,
            rank,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::domain::Decomposition;

    #[test]
    fn test_build() {
        let grid = ProcessGridBuilder::<f32>::new()
            .mesh([10., 20., 30.], [10, 20, 30])
            .unwrap()
            .decomposition([2, 1], 1)
            .unwrap()
            .halo(HaloMargin::new([-1, 0, 0], [2, 0, 0]).unwrap())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(grid.this_rank(), 1);
        assert_eq!(grid.n_ranks(), 2);
        assert_eq!(grid.cell_size(), [1., 1., 1.]);
        assert_eq!(grid.halo().above(), &[2, 0, 0]);
    }

    #[test]
    fn test_default_halo() {
        let grid = ProcessGridBuilder::<f64>::new()
            .mesh([1., 1., 1.], [4, 4, 4])
            .unwrap()
            .decomposition([1, 1], 0)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(grid.halo(), &HaloMargin::zero());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(ProcessGridBuilder::<f64>::new()
            .mesh([0., 1., 1.], [4, 4, 4])
            .is_err());
        assert!(ProcessGridBuilder::<f64>::new()
            .mesh([1., 1., 1.], [4, 0, 4])
            .is_err());
        assert!(ProcessGridBuilder::<f64>::new()
            .decomposition([2, 2], 4)
            .is_err());
        assert!(ProcessGridBuilder::<f64>::new()
            .decomposition([0, 2], 0)
            .is_err());

        // Missing mesh
        assert!(ProcessGridBuilder::<f64>::new()
            .decomposition([1, 1], 0)
            .unwrap()
            .build()
            .is_err());

        // More ranks than cells
        assert!(ProcessGridBuilder::<f64>::new()
            .mesh([1., 1., 1.], [4, 4, 4])
            .unwrap()
            .decomposition([8, 1], 0)
            .unwrap()
            .build()
            .is_err());
    }

    #[test]
    fn test_halo_wider_than_slab() {
        let result = ProcessGridBuilder::<f64>::new()
            .mesh([1., 1., 1.], [8, 8, 8])
            .unwrap()
            .decomposition([4, 1], 0)
            .unwrap()
            .halo(HaloMargin::symmetric(3))
            .unwrap()
            .build();

        assert!(matches!(result, Err(Error::InvalidHalo(_))));
    }
}
