//! Attribute selections.
use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::particles::types::Attributes;

impl Attributes {
    /// Position.
    pub const POSITION: Self = Self(1 << 0);
    /// Velocity.
    pub const VELOCITY: Self = Self(1 << 1);
    /// Acceleration.
    pub const ACCELERATION: Self = Self(1 << 2);
    /// Density.
    pub const DENSITY: Self = Self(1 << 3);
    /// Potential.
    pub const POTENTIAL: Self = Self(1 << 4);
    /// Particle id.
    pub const ID: Self = Self(1 << 5);

    /// Every attribute, in packing order.
    pub const ALL: [Self; 6] = [
        Self::POSITION,
        Self::VELOCITY,
        Self::ACCELERATION,
        Self::DENSITY,
        Self::POTENTIAL,
        Self::ID,
    ];

    /// The empty selection.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Selection of every attribute.
    pub const fn all() -> Self {
        Self((1 << 6) - 1)
    }

    /// Raw flag bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every attribute of `other` is selected.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether nothing is selected.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Selected attributes one at a time, in packing order.
    pub fn iter(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |&a| self.contains(a))
    }
}

impl BitOr for Attributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Attributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitAnd for Attributes {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn test_selection() {
        let mut selection = Attributes::POSITION | Attributes::DENSITY;
        assert!(selection.contains(Attributes::POSITION));
        assert!(!selection.contains(Attributes::VELOCITY));
        assert!(!selection.contains(Attributes::POSITION | Attributes::VELOCITY));

        selection |= Attributes::ID;
        assert_eq!(
            selection.iter().collect_vec(),
            vec![Attributes::POSITION, Attributes::DENSITY, Attributes::ID]
        );

        assert_eq!(selection & Attributes::ID, Attributes::ID);
        assert!((selection & Attributes::VELOCITY).is_empty());
    }

    #[test]
    fn test_all() {
        let all = Attributes::ALL
            .into_iter()
            .fold(Attributes::empty(), |acc, a| acc | a);
        assert_eq!(all, Attributes::all());
        assert_eq!(Attributes::empty().iter().count(), 0);
    }
}
