//! # ECS Registry
//!
//! The single entry point for entity, component and system operations.
//! Sequences the three managers so that, between calls:
//! - An entity's signature bit `i` is set iff component array `i` holds it
//! - Every system's members are exactly the live entities matching it

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use super::component::{Component, ComponentManager};
use super::entity::{Entity, EntityManager};
use super::signature::{ComponentType, Signature};
use super::storage::ComponentArray;
use super::system::{System, SystemHandle, SystemManager};
use crate::config::RegistryConfig;
use crate::error::{EcsError, EcsResult};

/// The ECS registry - owner of all entities, components and systems.
///
/// All entity and component memory is allocated at creation. Capacities
/// are fixed for the registry's lifetime.
///
/// Systems receive the registry explicitly from the driver; there is no
/// process-wide instance.
///
/// # Example
///
/// ```rust
/// use signet_core::{Component, Registry, System};
///
/// struct Position { x: f32 }
/// impl Component for Position {}
///
/// struct Mover;
/// impl System for Mover {}
///
/// # fn main() -> signet_core::EcsResult<()> {
/// let mut registry = Registry::new();
/// let position = registry.register_component::<Position>()?;
/// registry.register_system(Mover)?;
/// registry.set_system_signature::<Mover>(position.into())?;
///
/// let entity = registry.create_entity()?;
/// registry.add_component(entity, Position { x: 1.0 })?;
///
/// let members: Vec<_> = registry.system_entities::<Mover>()?.iter().copied().collect();
/// for member in members {
///     registry.get_component_mut::<Position>(member)?.x += 1.0;
/// }
/// assert_eq!(registry.get_component::<Position>(entity)?.x, 2.0);
/// # Ok(())
/// # }
/// ```
pub struct Registry {
    entities: EntityManager,
    components: ComponentManager,
    systems: SystemManager,
}

impl Registry {
    /// Creates a registry with the default capacities.
    #[must_use]
    pub fn new() -> Self {
        let config = RegistryConfig::default();
        Self::build(&config)
    }

    /// Creates a registry with the given capacities.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the config fails validation.
    pub fn with_config(config: &RegistryConfig) -> EcsResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &RegistryConfig) -> Self {
        debug!(
            max_entities = config.max_entities,
            max_component_types = config.max_component_types,
            "registry created"
        );
        Self {
            entities: EntityManager::new(config.max_entities),
            components: ComponentManager::new(config.max_entities, config.max_component_types),
            systems: SystemManager::new(),
        }
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Returns the maximum number of live entities.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.entities.capacity()
    }

    /// Returns the number of currently live entities.
    #[inline]
    #[must_use]
    pub const fn living_count(&self) -> u32 {
        self.entities.living_count()
    }

    /// Creates an entity with no components.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] if every slot is live.
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        let entity = self.entities.create().map_err(|err| {
            warn!(capacity = self.entities.capacity(), "entity pool exhausted");
            err
        })?;
        self.systems.signature_changed(entity, Signature::EMPTY);
        trace!(%entity, "entity created");
        Ok(entity)
    }

    /// Destroys an entity, dropping its components and system memberships.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidEntity`] if the entity is not live.
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.entities.destroy(entity)?;
        let dropped = self.components.entity_destroyed(entity);
        self.systems.entity_destroyed(entity);
        trace!(%entity, dropped, "entity destroyed");
        Ok(())
    }

    /// Returns the number of free entity slots.
    ///
    /// Always `capacity() - living_count()`.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.entities.available_count()
    }

    /// Checks if an entity is live and not stale.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns a live entity's signature.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidEntity`] if the entity is not live.
    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        self.entities.signature(entity)
    }

    /// Iterates over all live entities in slot order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter_alive().map(|(entity, _)| entity)
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Registers component type `T` and returns its id.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DuplicateRegistration`] if `T` is already registered
    /// - [`EcsError::CapacityExceeded`] if the type pool is full
    pub fn register_component<T: Component>(&mut self) -> EcsResult<ComponentType> {
        let id = self.components.register::<T>().map_err(|err| {
            if matches!(err, EcsError::CapacityExceeded { .. }) {
                warn!(
                    component = std::any::type_name::<T>(),
                    limit = self.components.max_types(),
                    "component type pool exhausted"
                );
            }
            err
        })?;
        debug!(component = std::any::type_name::<T>(), %id, "component type registered");
        Ok(id)
    }

    /// Returns the id of component type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredType`] if `T` was never registered.
    pub fn component_type<T: Component>(&self) -> EcsResult<ComponentType> {
        self.components.type_id::<T>()
    }

    /// Returns the number of registered component types.
    #[inline]
    #[must_use]
    pub fn registered_component_count(&self) -> usize {
        self.components.registered_count()
    }

    /// Attaches `value` to the entity as its `T`.
    ///
    /// Storage is updated first, then the entity's signature, then system
    /// membership.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if the entity is not live
    /// - [`EcsError::UnregisteredType`] if `T` was never registered
    /// - [`EcsError::DuplicateComponent`] if the entity already has a `T`
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        let signature = self.entities.signature(entity)?;
        let id = self.components.type_id::<T>()?;

        self.components.add(entity, value)?;
        self.publish(entity, signature.with(id))?;
        trace!(%entity, %id, "component added");
        Ok(())
    }

    /// Detaches and returns the entity's `T`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if the entity is not live
    /// - [`EcsError::UnregisteredType`] if `T` was never registered
    /// - [`EcsError::MissingComponent`] if the entity has no `T`
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        let signature = self.entities.signature(entity)?;
        let id = self.components.type_id::<T>()?;

        let value = self.components.remove::<T>(entity)?;
        self.publish(entity, signature.without(id))?;
        trace!(%entity, %id, "component removed");
        Ok(value)
    }

    /// Gets the entity's `T`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if the entity is not live
    /// - [`EcsError::UnregisteredType`] if `T` was never registered
    /// - [`EcsError::MissingComponent`] if the entity has no `T`
    pub fn get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.entities.ensure_alive(entity)?;
        self.components.get::<T>(entity)
    }

    /// Gets the entity's `T` mutably.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if the entity is not live
    /// - [`EcsError::UnregisteredType`] if `T` was never registered
    /// - [`EcsError::MissingComponent`] if the entity has no `T`
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.entities.ensure_alive(entity)?;
        self.components.get_mut::<T>(entity)
    }

    /// Checks if a live entity has a `T`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if the entity is not live
    /// - [`EcsError::UnregisteredType`] if `T` was never registered
    pub fn has_component<T: Component>(&self, entity: Entity) -> EcsResult<bool> {
        let signature = self.entities.signature(entity)?;
        Ok(signature.contains(self.components.type_id::<T>()?))
    }

    /// Returns the dense array of `T` for batch reads.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredType`] if `T` was never registered.
    pub fn components<T: Component>(&self) -> EcsResult<&ComponentArray<T>> {
        self.components.array::<T>()
    }

    /// Returns the number of entities that own a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredType`] if `T` was never registered.
    pub fn component_count<T: Component>(&self) -> EcsResult<usize> {
        self.components.array::<T>().map(ComponentArray::len)
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Registers the single instance of `S` and returns a shared handle.
    ///
    /// Until [`set_system_signature`](Self::set_system_signature) is called
    /// the system requires nothing, so every live entity is a member.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::DuplicateRegistration`] if `S` is already
    /// registered.
    pub fn register_system<S: System>(&mut self, system: S) -> EcsResult<SystemHandle<S>> {
        let handle = self.systems.register(system, self.entities.iter_alive())?;
        debug!(system = std::any::type_name::<S>(), "system registered");
        Ok(handle)
    }

    /// Replaces the required signature of `S` and recomputes its members.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownSystem`] if `S` was never registered.
    pub fn set_system_signature<S: System>(&mut self, signature: Signature) -> EcsResult<()> {
        self.systems
            .set_signature::<S, _>(signature, self.entities.iter_alive())?;
        debug!(
            system = std::any::type_name::<S>(),
            %signature,
            members = self.systems.entities::<S>().map_or(0, BTreeSet::len),
            "system signature set"
        );
        Ok(())
    }

    /// Returns the required signature of `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownSystem`] if `S` was never registered.
    pub fn system_signature<S: System>(&self) -> EcsResult<Signature> {
        self.systems.signature::<S>()
    }

    /// Returns the entities currently matching `S`, in slot order.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownSystem`] if `S` was never registered.
    pub fn system_entities<S: System>(&self) -> EcsResult<&BTreeSet<Entity>> {
        self.systems.entities::<S>()
    }

    /// Returns another shared handle to the instance of `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownSystem`] if `S` was never registered.
    pub fn system<S: System>(&self) -> EcsResult<SystemHandle<S>> {
        self.systems.handle::<S>()
    }

    /// Returns the number of registered systems.
    #[inline]
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Stores the entity's new signature, then notifies systems.
    fn publish(&mut self, entity: Entity, signature: Signature) -> EcsResult<()> {
        self.entities.set_signature(entity, signature)?;
        self.systems.signature_changed(entity, signature);
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
