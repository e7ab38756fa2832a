//! Domain decomposition traits
use num::{Float, NumCast, One, Zero};

use crate::domain::types::HaloMargin;

/// A decomposition of a periodic simulation box over ranks.
pub trait Decomposition {
    /// Scalar type of positions.
    type Scalar: Float;

    /// Side length of the box along each axis.
    fn box_size(&self) -> &[Self::Scalar; 3];

    /// Number of mesh cells along each axis.
    fn n_mesh(&self) -> &[usize; 3];

    /// Halo of mesh cells around each particle that must be present on the rank painting it.
    fn halo(&self) -> &HaloMargin;

    /// Rank this decomposition is viewed from.
    fn this_rank(&self) -> usize;

    /// Number of ranks in the decomposition.
    fn n_ranks(&self) -> usize;

    /// Rank owning a position.
    ///
    /// Must be a pure function of the position that agrees on every rank, particles on a boundary
    /// are otherwise ghosted inconsistently. Returns `None` if the position cannot be mapped, for
    /// example if it is not finite.
    ///
    /// # Arguments
    /// * `position` - Cartesian position, need not be wrapped into the box.
    fn pos_to_rank(&self, position: &[Self::Scalar; 3]) -> Option<usize>;

    /// Side length of a mesh cell along each axis.
    fn cell_size(&self) -> [Self::Scalar; 3] {
        let box_size = self.box_size();
        let n_mesh = self.n_mesh();
        let mut result = [<Self::Scalar as Zero>::zero(); 3];
        for d in 0..3 {
            let n = <Self::Scalar as NumCast>::from(n_mesh[d])
                .unwrap_or_else(<Self::Scalar as One>::one);
            result[d] = box_size[d] / n;
        }
        result
    }
}
