//! Particle storage traits
use num::Float;

use crate::particles::types::Attributes;

/// Callbacks giving the ghost exchange access to a particle storage layout.
///
/// Storage holds owned particles in slots `0..n_owned`, ghosts are unpacked into the slots that
/// follow, up to [`ParticleSource::capacity`].
pub trait ParticleSource {
    /// Scalar type of positions.
    type Scalar: Float;

    /// Total number of slots, owned and ghost.
    fn capacity(&self) -> usize;

    /// Position of a particle.
    ///
    /// # Arguments
    /// * `index` - Slot of the particle.
    fn position(&self, index: usize) -> [Self::Scalar; 3];

    /// Size in bytes of one packed record for a selection of attributes.
    ///
    /// # Arguments
    /// * `attributes` - Selection of attributes to pack.
    fn packed_size(&self, attributes: Attributes) -> usize;

    /// Serialise the selected attributes of a particle, returning the number of bytes written.
    ///
    /// # Arguments
    /// * `index` - Slot of the particle.
    /// * `out` - Destination, at least `packed_size(attributes)` bytes.
    /// * `attributes` - Selection of attributes to pack.
    fn pack(&self, index: usize, out: &mut [u8], attributes: Attributes) -> usize;

    /// Overwrite the selected attributes of a particle from a packed record.
    ///
    /// # Arguments
    /// * `index` - Slot of the particle.
    /// * `input` - Record produced by `pack` with the same attributes.
    /// * `attributes` - Selection of attributes to unpack.
    fn unpack(&mut self, index: usize, input: &[u8], attributes: Attributes);

    /// Combine the selected attributes of a packed record into a particle.
    ///
    /// The combination must be associative and commutative, e.g. accumulation, contributions from
    /// different ranks arrive in an unspecified order.
    ///
    /// # Arguments
    /// * `index` - Slot of the particle.
    /// * `input` - Record produced by `pack` with the same attributes.
    /// * `attributes` - Selection of attributes to combine.
    fn reduce(&mut self, index: usize, input: &[u8], attributes: Attributes);
}
