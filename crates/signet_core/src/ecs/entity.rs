//! # Entity Management
//!
//! Entities are lightweight identifiers consisting of:
//! - A slot index in `[0, capacity)`
//! - A generation counter for detecting stale references
//!
//! Slot indices are handed out from a FIFO free list, so a destroyed slot is
//! reused only after every other free slot has been used once.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

use super::signature::Signature;
use crate::error::{EcsError, EcsResult};

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Lower 32 bits: Slot index
/// - Upper 32 bits: Generation counter for detecting stale references
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Creates a new entity ID from index and generation.
    ///
    /// # Arguments
    ///
    /// * `index` - The slot index
    /// * `generation` - The generation counter
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.index() as usize
    }
}

// Ordered by slot first so membership sets iterate in slot order.
impl Ord for Entity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index()
            .cmp(&other.index())
            .then_with(|| self.generation().cmp(&other.generation()))
    }
}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// Allocates entity ids and stores each live entity's signature.
///
/// All memory is allocated at construction; `create`/`destroy` never
/// allocate.
pub struct EntityManager {
    /// Free slot indices, popped from the front and returned to the back.
    available: VecDeque<u32>,
    /// Current generation of every slot.
    generations: Box<[u32]>,
    /// Signature of every slot (empty for free slots).
    signatures: Box<[Signature]>,
    /// Whether each slot is currently live.
    alive: Box<[bool]>,
    /// Number of currently live entities.
    living_count: u32,
    /// Maximum capacity.
    capacity: u32,
}

impl EntityManager {
    /// Creates a manager with `capacity` free slots, queued in index order.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of entity slots (validated by
    ///   [`RegistryConfig`](crate::RegistryConfig))
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        let slots = capacity as usize;
        Self {
            available: (0..capacity).collect(),
            generations: vec![0; slots].into_boxed_slice(),
            signatures: vec![Signature::EMPTY; slots].into_boxed_slice(),
            alive: vec![false; slots].into_boxed_slice(),
            living_count: 0,
            capacity,
        }
    }

    /// Returns the maximum number of live entities.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the number of currently live entities.
    #[inline]
    #[must_use]
    pub const fn living_count(&self) -> u32 {
        self.living_count
    }

    /// Takes the oldest free slot and returns a live entity for it.
    ///
    /// The new entity's signature is empty.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] if every slot is live.
    pub fn create(&mut self) -> EcsResult<Entity> {
        let Some(index) = self.available.pop_front() else {
            return Err(EcsError::CapacityExceeded {
                pool: "entity",
                limit: self.capacity as usize,
            });
        };

        let slot = index as usize;
        self.alive[slot] = true;
        self.signatures[slot] = Signature::EMPTY;
        self.living_count += 1;

        Ok(Entity::new(index, self.generations[slot]))
    }

    /// Releases a live entity, clearing its signature.
    ///
    /// The slot's generation is bumped so the released id goes stale, and
    /// the slot joins the back of the free list.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidEntity`] if the entity is out of range,
    /// already destroyed, or stale.
    pub fn destroy(&mut self, entity: Entity) -> EcsResult<()> {
        self.ensure_alive(entity)?;

        let slot = entity.slot();
        self.alive[slot] = false;
        self.signatures[slot] = Signature::EMPTY;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.available.push_back(entity.index());
        self.living_count -= 1;

        Ok(())
    }

    /// Checks if an entity is live and its generation is current.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.slot();
        slot < self.alive.len()
            && self.alive[slot]
            && self.generations[slot] == entity.generation()
    }

    /// Returns `Ok` for a live entity, `InvalidEntity` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidEntity`] if the entity is not live.
    #[inline]
    pub fn ensure_alive(&self, entity: Entity) -> EcsResult<()> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::InvalidEntity(entity))
        }
    }

    /// Returns a live entity's signature.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidEntity`] if the entity is not live.
    #[inline]
    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        self.ensure_alive(entity)?;
        Ok(self.signatures[entity.slot()])
    }

    /// Replaces a live entity's signature.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidEntity`] if the entity is not live.
    #[inline]
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> EcsResult<()> {
        self.ensure_alive(entity)?;
        self.signatures[entity.slot()] = signature;
        Ok(())
    }

    /// Iterates over all live entities with their signatures, in slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = (Entity, Signature)> + '_ {
        self.alive
            .iter()
            .zip(self.generations.iter().zip(self.signatures.iter()))
            .zip(0u32..)
            .filter(|((alive, _), _)| **alive)
            .map(|((_, (generation, signature)), index)| {
                (Entity::new(index, *generation), *signature)
            })
    }

    /// Number of slots waiting in the free list.
    #[inline]
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.available.len()
    }
}
