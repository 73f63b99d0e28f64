//! # Signatures
//!
//! A signature is a 32-bit set with one bit per registered component type.
//! An entity's signature records the types it owns; a system's signature
//! records the types it requires.

use std::fmt;

/// Index of a registered component type, and its bit in a [`Signature`].
///
/// Assigned by the registry in registration order starting at 0. Never
/// reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentType(u8);

impl ComponentType {
    /// Wraps a raw bit position.
    ///
    /// # Arguments
    ///
    /// * `bit` - The bit position (0-31)
    #[inline]
    #[must_use]
    pub(crate) const fn new(bit: u8) -> Self {
        Self(bit)
    }

    /// Returns the bit position of this component type.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u8 {
        self.0
    }

    #[inline]
    const fn mask(self) -> u32 {
        1 << self.0
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed-width bitset of component types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u32);

impl Signature {
    /// The signature with no bits set.
    ///
    /// As a system requirement it is satisfied by every entity.
    pub const EMPTY: Self = Self(0);

    /// Builds a signature from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns a copy with the component type's bit set.
    #[inline]
    #[must_use]
    pub const fn with(self, component: ComponentType) -> Self {
        Self(self.0 | component.mask())
    }

    /// Returns a copy with the component type's bit cleared.
    #[inline]
    #[must_use]
    pub const fn without(self, component: ComponentType) -> Self {
        Self(self.0 & !component.mask())
    }

    /// Sets or clears the component type's bit in place.
    #[inline]
    pub fn set(&mut self, component: ComponentType, present: bool) {
        *self = if present {
            self.with(component)
        } else {
            self.without(component)
        };
    }

    /// Checks whether the component type's bit is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, component: ComponentType) -> bool {
        self.0 & component.mask() != 0
    }

    /// Checks whether this signature owns every bit of `required`.
    ///
    /// This is the system membership test: `(self & required) == required`.
    #[inline]
    #[must_use]
    pub const fn matches(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }

    /// Returns `true` if no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of bits set.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl From<ComponentType> for Signature {
    fn from(component: ComponentType) -> Self {
        Self::EMPTY.with(component)
    }
}

impl FromIterator<ComponentType> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#034b}", self.0)
    }
}
