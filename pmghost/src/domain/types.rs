//! Data structures describing a decomposition.
use num::Float;

/// Per axis range of mesh cell offsets around a particle that must be present on the rank painting it.
///
/// Offsets run over the inclusive range `below[d]..=above[d]` along each axis, with
/// `below[d] <= 0 <= above[d]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HaloMargin {
    /// Lowest offset along each axis, non positive.
    pub(crate) below: [i64; 3],

    /// Highest offset along each axis, non negative.
    pub(crate) above: [i64; 3],
}

/// A box of `n_mesh` cells split into contiguous slabs along axes 0 and 1 over a
/// `process_mesh[0] x process_mesh[1]` grid of ranks. Axis 2 is never split.
///
/// # Fields
/// - `box_size` - Side length of the periodic box along each axis.
///
/// - `n_mesh` - Number of mesh cells along each axis.
///
/// - `process_mesh` - Number of ranks along axes 0 and 1, rank `r` sits at grid coordinates
///   `(r / process_mesh[1], r % process_mesh[1])`.
///
/// - `edges` - Mesh cell boundaries of the slabs along axes 0 and 1, `process_mesh[d] + 1` entries each.
///
/// - `halo` - Halo margin in mesh cells.
///
/// - `rank` - The rank this decomposition is viewed from.
#[derive(Clone, Debug)]
pub struct ProcessGrid<T>
where
    T: Float,
{
    pub(crate) box_size: [T; 3],
    pub(crate) n_mesh: [usize; 3],
    pub(crate) process_mesh: [usize; 2],
    pub(crate) edges: [Vec<usize>; 2],
    pub(crate) halo: HaloMargin,
    pub(crate) rank: usize,
}

/// Builder for a validated [`ProcessGrid`].
#[derive(Clone, Debug, Default)]
pub struct ProcessGridBuilder<T>
where
    T: Float,
{
    pub(crate) box_size: Option<[T; 3]>,
    pub(crate) n_mesh: Option<[usize; 3]>,
    pub(crate) process_mesh: Option<[usize; 2]>,
    pub(crate) rank: Option<usize>,
    pub(crate) halo: Option<HaloMargin>,
}
