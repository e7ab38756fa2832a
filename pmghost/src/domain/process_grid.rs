//! Implementation of a two dimensional process grid decomposition.
use num::Float;

use crate::{
    domain::types::{HaloMargin, ProcessGrid},
    traits::domain::Decomposition,
};

/// Cell boundaries of `n_procs` contiguous slabs over `n_mesh` cells.
pub(crate) fn slab_edges(n_mesh: usize, n_procs: usize) -> Vec<usize> {
    (0..=n_procs).map(|k| k * n_mesh / n_procs).collect()
}

impl<T> ProcessGrid<T>
where
    T: Float,
{
    /// Number of ranks along axes 0 and 1.
    pub fn process_mesh(&self) -> &[usize; 2] {
        &self.process_mesh
    }

    /// Coordinates of a rank in the process grid.
    ///
    /// # Arguments
    /// * `rank` - Rank to locate.
    pub fn grid_coordinates(&self, rank: usize) -> [usize; 2] {
        [rank / self.process_mesh[1], rank % self.process_mesh[1]]
    }

    /// Rank at a given set of process grid coordinates.
    ///
    /// # Arguments
    /// * `coordinates` - Position of the rank in the process grid.
    pub fn rank_at(&self, coordinates: [usize; 2]) -> usize {
        coordinates[0] * self.process_mesh[1] + coordinates[1]
    }

    /// First mesh cell and number of cells owned by a rank along each axis.
    ///
    /// # Arguments
    /// * `rank` - Rank whose region is queried.
    pub fn region(&self, rank: usize) -> ([usize; 3], [usize; 3]) {
        let coordinates = self.grid_coordinates(rank);
        let mut start = [0, 0, 0];
        let mut size = self.n_mesh;
        for d in 0..2 {
            let edges = &self.edges[d];
            start[d] = edges[coordinates[d]];
            size[d] = edges[coordinates[d] + 1] - edges[coordinates[d]];
        }
        (start, size)
    }

    /// Lower and upper corner of the region owned by a rank, in box coordinates.
    ///
    /// # Arguments
    /// * `rank` - Rank whose region is queried.
    pub fn bounds(&self, rank: usize) -> ([T; 3], [T; 3]) {
        let (start, size) = self.region(rank);
        let cell_size = self.cell_size();
        let mut lower = [T::zero(); 3];
        let mut upper = [T::zero(); 3];
        for d in 0..3 {
            let first = T::from(start[d]).unwrap_or_else(T::zero);
            let last = T::from(start[d] + size[d]).unwrap_or_else(T::zero);
            lower[d] = first * cell_size[d];
            upper[d] = last * cell_size[d];
        }
        (lower, upper)
    }

    /// Index of the mesh cell containing a coordinate along an axis, wrapped periodically.
    fn wrapped_cell(&self, coordinate: T, axis: usize) -> Option<usize> {
        let n = self.n_mesh[axis];
        let scaled = coordinate * T::from(n)? / self.box_size[axis];
        let cell = scaled.floor().to_i64()?;
        Some(cell.rem_euclid(n as i64) as usize)
    }
}

impl<T> Decomposition for ProcessGrid<T>
where
    T: Float,
{
    type Scalar = T;

    fn box_size(&self) -> &[T; 3] {
        &self.box_size
    }

    fn n_mesh(&self) -> &[usize; 3] {
        &self.n_mesh
    }

    fn halo(&self) -> &HaloMargin {
        &self.halo
    }

    fn this_rank(&self) -> usize {
        self.rank
    }

    fn n_ranks(&self) -> usize {
        self.process_mesh[0] * self.process_mesh[1]
    }

    fn pos_to_rank(&self, position: &[T; 3]) -> Option<usize> {
        if !position[2].is_finite() {
            return None;
        }

        let mut coordinates = [0usize; 2];
        for d in 0..2 {
            let cell = self.wrapped_cell(position[d], d)?;
            // First slab whose upper edge lies beyond the cell
            coordinates[d] = self.edges[d].partition_point(|&edge| edge <= cell) - 1;
        }

        Some(self.rank_at(coordinates))
    }
}
