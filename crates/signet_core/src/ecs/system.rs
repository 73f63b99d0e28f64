//! # System Management
//!
//! A system is any application type that operates on the entities carrying
//! a required set of components. The manager owns one instance per system
//! type, its required [`Signature`] and its membership set, and keeps that
//! set equal to `{ e : signature(e) ⊇ required }` after every mutation.
//!
//! ## Ownership
//!
//! System values are shared: the driver keeps a [`SystemHandle`] to call
//! per-frame behavior while the manager keeps its own. Membership lives in
//! the manager, not in the system value, so only the manager mutates it.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::entity::Entity;
use super::signature::Signature;
use crate::error::{EcsError, EcsResult};

/// Marker trait for ECS systems.
///
/// # Example
///
/// ```rust
/// use signet_core::System;
///
/// #[derive(Default)]
/// struct PhysicsSystem {
///     steps: u64,
/// }
///
/// impl System for PhysicsSystem {}
/// ```
pub trait System: 'static {}

/// Shared handle to a registered system instance.
///
/// Cloning the handle shares the same instance; it lives as long as the
/// longest holder.
pub struct SystemHandle<S> {
    inner: Arc<RwLock<S>>,
}

impl<S> SystemHandle<S> {
    fn new(system: S) -> Self {
        Self {
            inner: Arc::new(RwLock::new(system)),
        }
    }

    /// Locks the system for reading.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, S> {
        self.inner.read()
    }

    /// Locks the system for writing.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, S> {
        self.inner.write()
    }

    /// Checks whether two handles share the same instance.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of live handles to this instance, the manager's included.
    #[inline]
    #[must_use]
    pub fn holder_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<S> Clone for SystemHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// One registered system.
struct SystemEntry {
    name: &'static str,
    /// Components an entity must own to be a member.
    required: Signature,
    /// Current members.
    members: BTreeSet<Entity>,
    /// The manager's `SystemHandle<S>`, erased.
    handle: Box<dyn Any>,
}

/// Owns every registered system and keeps membership in sync with entity
/// signatures.
#[derive(Default)]
pub struct SystemManager {
    systems: HashMap<TypeId, SystemEntry>,
}

impl SystemManager {
    /// Creates a manager with no systems.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the single instance of `S` and returns a shared handle.
    ///
    /// The system starts with an empty required signature, which every live
    /// entity satisfies, so `living` seeds its membership.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::DuplicateRegistration`] if `S` is already
    /// registered.
    pub fn register<S, I>(&mut self, system: S, living: I) -> EcsResult<SystemHandle<S>>
    where
        S: System,
        I: IntoIterator<Item = (Entity, Signature)>,
    {
        let key = TypeId::of::<S>();
        if self.systems.contains_key(&key) {
            return Err(EcsError::DuplicateRegistration {
                kind: "system",
                name: type_name::<S>(),
            });
        }

        let handle = SystemHandle::new(system);
        self.systems.insert(
            key,
            SystemEntry {
                name: type_name::<S>(),
                required: Signature::EMPTY,
                members: living.into_iter().map(|(entity, _)| entity).collect(),
                handle: Box::new(handle.clone()),
            },
        );

        Ok(handle)
    }

    /// Replaces the required signature of `S` and recomputes its members
    /// from `living`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownSystem`] if `S` was never registered.
    pub fn set_signature<S, I>(&mut self, required: Signature, living: I) -> EcsResult<()>
    where
        S: System,
        I: IntoIterator<Item = (Entity, Signature)>,
    {
        let entry = self.entry_mut::<S>()?;
        entry.required = required;
        entry.members = living
            .into_iter()
            .filter(|(_, signature)| signature.matches(required))
            .map(|(entity, _)| entity)
            .collect();
        Ok(())
    }

    /// Returns the required signature of `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownSystem`] if `S` was never registered.
    pub fn signature<S: System>(&self) -> EcsResult<Signature> {
        self.entry::<S>().map(|entry| entry.required)
    }

    /// Returns the current members of `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownSystem`] if `S` was never registered.
    pub fn entities<S: System>(&self) -> EcsResult<&BTreeSet<Entity>> {
        self.entry::<S>().map(|entry| &entry.members)
    }

    /// Returns another shared handle to the instance of `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownSystem`] if `S` was never registered.
    pub fn handle<S: System>(&self) -> EcsResult<SystemHandle<S>> {
        self.entry::<S>()?
            .handle
            .downcast_ref::<SystemHandle<S>>()
            .cloned()
            .ok_or(EcsError::UnknownSystem(type_name::<S>()))
    }

    /// Checks if `S` is registered.
    #[inline]
    #[must_use]
    pub fn is_registered<S: System>(&self) -> bool {
        self.systems.contains_key(&TypeId::of::<S>())
    }

    /// Returns the number of registered systems.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no system is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Updates every system's membership for an entity whose signature
    /// changed. O(number of systems).
    pub fn signature_changed(&mut self, entity: Entity, signature: Signature) {
        for entry in self.systems.values_mut() {
            if signature.matches(entry.required) {
                entry.members.insert(entity);
            } else {
                entry.members.remove(&entity);
            }
        }
    }

    /// Removes a destroyed entity from every system.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for entry in self.systems.values_mut() {
            entry.members.remove(&entity);
        }
    }

    /// Iterates over `(system name, required signature, member count)`.
    pub fn summaries(&self) -> impl Iterator<Item = (&'static str, Signature, usize)> + '_ {
        self.systems
            .values()
            .map(|entry| (entry.name, entry.required, entry.members.len()))
    }

    fn entry<S: System>(&self) -> EcsResult<&SystemEntry> {
        self.systems
            .get(&TypeId::of::<S>())
            .ok_or(EcsError::UnknownSystem(type_name::<S>()))
    }

    fn entry_mut<S: System>(&mut self) -> EcsResult<&mut SystemEntry> {
        self.systems
            .get_mut(&TypeId::of::<S>())
            .ok_or(EcsError::UnknownSystem(type_name::<S>()))
    }
}
