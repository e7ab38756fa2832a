//! Implementation of the particle store.
use std::mem::size_of;

use bytemuck::{bytes_of, pod_read_unaligned, Pod};
use num::Float;

use crate::{
    particles::types::{Attributes, Particles},
    traits::{
        particles::ParticleSource,
        types::{Error, Result},
    },
};

/// Write a value at `offset`, advancing it.
fn write_value<P: Pod>(out: &mut [u8], offset: &mut usize, value: &P) {
    let bytes = bytes_of(value);
    out[*offset..*offset + bytes.len()].copy_from_slice(bytes);
    *offset += bytes.len();
}

/// Read a value at `offset`, advancing it.
fn read_value<P: Pod>(input: &[u8], offset: &mut usize) -> P {
    let n = size_of::<P>();
    let value = pod_read_unaligned(&input[*offset..*offset + n]);
    *offset += n;
    value
}

fn accumulate<T: Float>(lhs: &mut [T; 3], rhs: [T; 3]) {
    for (l, r) in lhs.iter_mut().zip(rhs) {
        *l = *l + r;
    }
}

impl<T> Particles<T>
where
    T: Float + Pod,
{
    /// Create an empty store with room for `capacity` particles, owned and ghost.
    ///
    /// # Arguments
    /// * `capacity` - Total number of slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            position: vec![[T::zero(); 3]; capacity],
            velocity: vec![[T::zero(); 3]; capacity],
            acceleration: vec![[T::zero(); 3]; capacity],
            density: vec![T::zero(); capacity],
            potential: vec![T::zero(); capacity],
            id: vec![0; capacity],
            n_owned: 0,
        }
    }

    /// Add an owned particle, returning its slot.
    ///
    /// Owned particles must be added before any ghosts are appended, ghosts occupy the slots
    /// directly after the owned particles.
    ///
    /// # Arguments
    /// * `position` - Position of the particle.
    /// * `velocity` - Velocity of the particle.
    /// * `id` - Globally unique identifier.
    pub fn push(&mut self, position: [T; 3], velocity: [T; 3], id: u64) -> Result<usize> {
        let slot = self.n_owned;
        if slot == self.capacity() {
            return Err(Error::StoreFull(self.capacity()));
        }

        self.position[slot] = position;
        self.velocity[slot] = velocity;
        self.acceleration[slot] = [T::zero(); 3];
        self.density[slot] = T::zero();
        self.potential[slot] = T::zero();
        self.id[slot] = id;
        self.n_owned += 1;

        Ok(slot)
    }

    /// Number of owned particles.
    pub fn n_owned(&self) -> usize {
        self.n_owned
    }

    /// Positions of all slots.
    pub fn positions(&self) -> &[[T; 3]] {
        &self.position
    }

    /// Mutable positions of all slots.
    pub fn positions_mut(&mut self) -> &mut [[T; 3]] {
        &mut self.position
    }

    /// Velocities of all slots.
    pub fn velocities(&self) -> &[[T; 3]] {
        &self.velocity
    }

    /// Accelerations of all slots.
    pub fn accelerations(&self) -> &[[T; 3]] {
        &self.acceleration
    }

    /// Mutable accelerations of all slots.
    pub fn accelerations_mut(&mut self) -> &mut [[T; 3]] {
        &mut self.acceleration
    }

    /// Densities of all slots.
    pub fn densities(&self) -> &[T] {
        &self.density
    }

    /// Mutable densities of all slots.
    pub fn densities_mut(&mut self) -> &mut [T] {
        &mut self.density
    }

    /// Potentials of all slots.
    pub fn potentials(&self) -> &[T] {
        &self.potential
    }

    /// Mutable potentials of all slots.
    pub fn potentials_mut(&mut self) -> &mut [T] {
        &mut self.potential
    }

    /// Identifiers of all slots.
    pub fn ids(&self) -> &[u64] {
        &self.id
    }

    /// Packed size of a single attribute.
    fn attribute_size(attribute: Attributes) -> usize {
        match attribute {
            Attributes::POSITION | Attributes::VELOCITY | Attributes::ACCELERATION => {
                size_of::<[T; 3]>()
            }
            Attributes::DENSITY | Attributes::POTENTIAL => size_of::<T>(),
            Attributes::ID => size_of::<u64>(),
            _ => 0,
        }
    }
}

impl<T> ParticleSource for Particles<T>
where
    T: Float + Pod,
{
    type Scalar = T;

    fn capacity(&self) -> usize {
        self.position.len()
    }

    fn position(&self, index: usize) -> [T; 3] {
        self.position[index]
    }

    fn packed_size(&self, attributes: Attributes) -> usize {
        attributes.iter().map(Self::attribute_size).sum()
    }

    fn pack(&self, index: usize, out: &mut [u8], attributes: Attributes) -> usize {
        let mut offset = 0;
        for attribute in attributes.iter() {
            match attribute {
                Attributes::POSITION => write_value(out, &mut offset, &self.position[index]),
                Attributes::VELOCITY => write_value(out, &mut offset, &self.velocity[index]),
                Attributes::ACCELERATION => {
                    write_value(out, &mut offset, &self.acceleration[index])
                }
                Attributes::DENSITY => write_value(out, &mut offset, &self.density[index]),
                Attributes::POTENTIAL => write_value(out, &mut offset, &self.potential[index]),
                Attributes::ID => write_value(out, &mut offset, &self.id[index]),
                _ => {}
            }
        }
        offset
    }

    fn unpack(&mut self, index: usize, input: &[u8], attributes: Attributes) {
        let mut offset = 0;
        for attribute in attributes.iter() {
            match attribute {
                Attributes::POSITION => self.position[index] = read_value(input, &mut offset),
                Attributes::VELOCITY => self.velocity[index] = read_value(input, &mut offset),
                Attributes::ACCELERATION => {
                    self.acceleration[index] = read_value(input, &mut offset)
                }
                Attributes::DENSITY => self.density[index] = read_value(input, &mut offset),
                Attributes::POTENTIAL => self.potential[index] = read_value(input, &mut offset),
                Attributes::ID => self.id[index] = read_value(input, &mut offset),
                _ => {}
            }
        }
    }

    fn reduce(&mut self, index: usize, input: &[u8], attributes: Attributes) {
        let mut offset = 0;
        for attribute in attributes.iter() {
            match attribute {
                Attributes::VELOCITY => {
                    let value = read_value(input, &mut offset);
                    accumulate(&mut self.velocity[index], value)
                }
                Attributes::ACCELERATION => {
                    let value = read_value(input, &mut offset);
                    accumulate(&mut self.acceleration[index], value)
                }
                Attributes::DENSITY => {
                    let value: T = read_value(input, &mut offset);
                    self.density[index] = self.density[index] + value
                }
                Attributes::POTENTIAL => {
                    let value: T = read_value(input, &mut offset);
                    self.potential[index] = self.potential[index] + value
                }
                // Not additive, skipped
                _ => offset += Self::attribute_size(attribute),
            }
        }
    }
}
