//! Data structures for particle storage.
use bytemuck::Pod;
use num::Float;

/// A selection of particle attributes, used to choose which fields are packed for an exchange.
///
/// Selections combine with `|`, attributes are always packed in the order of their flag bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Attributes(pub(crate) u32);

/// A fixed capacity structure of arrays particle store.
///
/// Slots `0..n_owned` hold particles owned by this rank, the remaining slots up to `capacity` are
/// available for ghosts.
///
/// # Fields
/// - `position` - Position of each slot.
///
/// - `velocity` - Velocity of each slot.
///
/// - `acceleration` - Acceleration of each slot, typically accumulated from the mesh.
///
/// - `density` - Density estimate at each slot.
///
/// - `potential` - Potential at each slot.
///
/// - `id` - Globally unique identifier of each particle.
///
/// - `n_owned` - Number of owned particles.
#[derive(Clone, Debug)]
pub struct Particles<T>
where
    T: Float + Pod,
{
    pub(crate) position: Vec<[T; 3]>,
    pub(crate) velocity: Vec<[T; 3]>,
    pub(crate) acceleration: Vec<[T; 3]>,
    pub(crate) density: Vec<T>,
    pub(crate) potential: Vec<T>,
    pub(crate) id: Vec<u64>,
    pub(crate) n_owned: usize,
}
