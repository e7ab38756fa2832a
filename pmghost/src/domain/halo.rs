//! Halo margins.
use itertools::iproduct;

use crate::{
    domain::types::HaloMargin,
    traits::types::{Error, Result},
};

impl HaloMargin {
    /// Construct a halo from the lowest and highest cell offset along each axis.
    ///
    /// # Arguments
    /// * `below` - Lowest offset along each axis, must be non positive.
    /// * `above` - Highest offset along each axis, must be non negative.
    pub fn new(below: [i64; 3], above: [i64; 3]) -> Result<Self> {
        for d in 0..3 {
            if below[d] > 0 || above[d] < 0 {
                return Err(Error::InvalidHalo(format!(
                    "axis {d} has range {}..={}, which must contain 0",
                    below[d], above[d]
                )));
            }
        }
        Ok(Self { below, above })
    }

    /// Halo containing only the particle's own cell, no particle is ever ghosted.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Symmetric halo of `width` cells along every axis.
    pub fn symmetric(width: u32) -> Self {
        let w = width as i64;
        Self {
            below: [-w; 3],
            above: [w; 3],
        }
    }

    /// Lowest offset along each axis.
    pub fn below(&self) -> &[i64; 3] {
        &self.below
    }

    /// Highest offset along each axis.
    pub fn above(&self) -> &[i64; 3] {
        &self.above
    }

    /// Widest reach of the halo along an axis, in cells.
    pub fn reach(&self, axis: usize) -> usize {
        self.below[axis].unsigned_abs().max(self.above[axis].unsigned_abs()) as usize
    }

    /// Number of offsets visited per particle.
    pub fn n_offsets(&self) -> usize {
        (0..3)
            .map(|d| (self.above[d] - self.below[d] + 1) as usize)
            .product()
    }

    /// All cell offsets, axis 2 outermost, then axis 0, then axis 1 innermost.
    ///
    /// The order fixes the ghost slot assigned to each (particle, rank) pair and so the layout of
    /// the send buffer, it must be the same on every probe pass.
    pub fn offsets(&self) -> impl Iterator<Item = [i64; 3]> {
        iproduct!(
            self.below[2]..=self.above[2],
            self.below[0]..=self.above[0],
            self.below[1]..=self.above[1]
        )
        .map(|(k, i, j)| [i, j, k])
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_offset_order() {
        let halo = HaloMargin::new([-1, 0, 0], [0, 1, 1]).unwrap();
        let offsets = halo.offsets().collect_vec();

        assert_eq!(offsets.len(), halo.n_offsets());
        assert_eq!(
            offsets,
            vec![
                [-1, 0, 0],
                [-1, 1, 0],
                [0, 0, 0],
                [0, 1, 0],
                [-1, 0, 1],
                [-1, 1, 1],
                [0, 0, 1],
                [0, 1, 1],
            ]
        );
    }

    #[test]
    fn test_zero_halo() {
        let halo = HaloMargin::zero();
        assert_eq!(halo.offsets().collect_vec(), vec![[0, 0, 0]]);
        assert_eq!(halo.reach(0), 0);
    }

    #[test]
    fn test_symmetric() {
        let halo = HaloMargin::symmetric(1);
        assert_eq!(halo, HaloMargin::new([-1, -1, -1], [1, 1, 1]).unwrap());
        assert_eq!(halo.n_offsets(), 27);
        assert_eq!(halo.reach(2), 1);
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            HaloMargin::new([1, 0, 0], [1, 0, 0]),
            Err(Error::InvalidHalo(_))
        ));
        assert!(matches!(
            HaloMargin::new([0, 0, 0], [0, -1, 0]),
            Err(Error::InvalidHalo(_))
        ));
    }
}
