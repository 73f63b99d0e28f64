//! # Component System
//!
//! Components are pure data containers with no behavior. Each registered
//! type gets a [`ComponentType`] (its signature bit) and one dense
//! [`ComponentArray`], owned here behind a type-erased handle.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use super::entity::Entity;
use super::signature::ComponentType;
use super::storage::{ComponentArray, ErasedArray};
use crate::error::{EcsError, EcsResult};

/// Marker trait for ECS components.
///
/// # Example
///
/// ```rust
/// use signet_core::Component;
///
/// struct Transform {
///     position: [f32; 3],
/// }
///
/// impl Component for Transform {}
/// ```
pub trait Component: 'static {}

/// One registered component type.
struct ComponentSlot {
    id: ComponentType,
    array: Box<dyn ErasedArray>,
}

/// Owns the component type registry and routes operations to the right
/// dense array.
pub struct ComponentManager {
    /// Registered types by their type token.
    slots: HashMap<TypeId, ComponentSlot>,
    /// Next id to hand out; equals the number of registered types.
    next_id: u8,
    /// Maximum number of registered types.
    max_types: u8,
    /// Entity slot capacity each new array is built with.
    entity_capacity: u32,
}

impl ComponentManager {
    /// Creates an empty registry.
    ///
    /// # Arguments
    ///
    /// * `entity_capacity` - Slot capacity of every component array
    /// * `max_types` - Maximum number of registrable types (at most 32)
    #[must_use]
    pub fn new(entity_capacity: u32, max_types: u8) -> Self {
        Self {
            slots: HashMap::with_capacity(usize::from(max_types)),
            next_id: 0,
            max_types,
            entity_capacity,
        }
    }

    /// Registers `T`, assigning the next unused component type id.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DuplicateRegistration`] if `T` is already registered
    /// - [`EcsError::CapacityExceeded`] if the type pool is full
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentType> {
        let key = TypeId::of::<T>();
        if self.slots.contains_key(&key) {
            return Err(EcsError::DuplicateRegistration {
                kind: "component",
                name: type_name::<T>(),
            });
        }
        if self.next_id >= self.max_types {
            return Err(EcsError::CapacityExceeded {
                pool: "component type",
                limit: usize::from(self.max_types),
            });
        }

        let id = ComponentType::new(self.next_id);
        self.slots.insert(
            key,
            ComponentSlot {
                id,
                array: Box::new(ComponentArray::<T>::new(self.entity_capacity)),
            },
        );
        self.next_id += 1;

        Ok(id)
    }

    /// Returns the number of registered component types.
    #[inline]
    #[must_use]
    pub fn registered_count(&self) -> usize {
        usize::from(self.next_id)
    }

    /// Returns the maximum number of registrable component types.
    #[inline]
    #[must_use]
    pub fn max_types(&self) -> usize {
        usize::from(self.max_types)
    }

    /// Checks if `T` is registered.
    #[inline]
    #[must_use]
    pub fn is_registered<T: Component>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    /// Returns the component type id of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredType`] if `T` was never registered.
    pub fn type_id<T: Component>(&self) -> EcsResult<ComponentType> {
        self.slot::<T>().map(|slot| slot.id)
    }

    /// Returns the dense array of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredType`] if `T` was never registered.
    pub fn array<T: Component>(&self) -> EcsResult<&ComponentArray<T>> {
        self.slot::<T>()?
            .array
            .as_any()
            .downcast_ref::<ComponentArray<T>>()
            .ok_or(EcsError::UnregisteredType(type_name::<T>()))
    }

    /// Returns the dense array of `T` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredType`] if `T` was never registered.
    pub fn array_mut<T: Component>(&mut self) -> EcsResult<&mut ComponentArray<T>> {
        self.slots
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| slot.array.as_any_mut().downcast_mut::<ComponentArray<T>>())
            .ok_or(EcsError::UnregisteredType(type_name::<T>()))
    }

    /// Stores `value` as the entity's `T`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredType`] if `T` was never registered
    /// - [`EcsError::DuplicateComponent`] if the entity already has a `T`
    pub fn add<T: Component>(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        self.array_mut::<T>()?.insert(entity, value)
    }

    /// Removes and returns the entity's `T`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredType`] if `T` was never registered
    /// - [`EcsError::MissingComponent`] if the entity has no `T`
    pub fn remove<T: Component>(&mut self, entity: Entity) -> EcsResult<T> {
        self.array_mut::<T>()?.remove(entity)
    }

    /// Gets the entity's `T`.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredType`] if `T` was never registered
    /// - [`EcsError::MissingComponent`] if the entity has no `T`
    pub fn get<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.array::<T>()?.get(entity)
    }

    /// Gets the entity's `T` mutably.
    ///
    /// # Errors
    ///
    /// - [`EcsError::UnregisteredType`] if `T` was never registered
    /// - [`EcsError::MissingComponent`] if the entity has no `T`
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.array_mut::<T>()?.get_mut(entity)
    }

    /// Removes the entity from every array that holds it.
    ///
    /// Arrays that never stored the entity are left untouched.
    ///
    /// # Returns
    ///
    /// The number of components removed.
    pub fn entity_destroyed(&mut self, entity: Entity) -> usize {
        self.slots
            .values_mut()
            .map(|slot| usize::from(slot.array.entity_destroyed(entity)))
            .sum()
    }

    /// Total number of stored components across all types.
    #[must_use]
    pub fn stored_count(&self) -> usize {
        self.slots.values().map(|slot| slot.array.len()).sum()
    }

    fn slot<T: Component>(&self) -> EcsResult<&ComponentSlot> {
        self.slots
            .get(&TypeId::of::<T>())
            .ok_or(EcsError::UnregisteredType(type_name::<T>()))
    }
}
