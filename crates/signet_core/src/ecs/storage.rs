//! # Component Storage
//!
//! Pre-allocated, dense component storage.
//!
//! The storage uses a packed array strategy:
//! - Values of one component type sit contiguously in `[0, len)`
//! - `entity_to_index` (by slot) and `index_to_entity` form a bijection
//!   between stored entities and dense positions
//! - Removal swaps the last value into the hole, so iteration order is
//!   unspecified after any removal

use std::any::{type_name, Any};

use super::entity::Entity;
use crate::error::{EcsError, EcsResult};

/// Dense storage for a single component type.
///
/// This storage guarantees:
/// - No reallocation after construction
/// - O(1) insert, swap-remove and lookup by entity
/// - Cache-friendly iteration over stored values
///
/// # Type Parameters
///
/// * `T` - The component type to store
///
/// # Example
///
/// ```rust,ignore
/// let mut storage: ComponentArray<Position> = ComponentArray::new(5000);
/// storage.insert(entity, Position::new(1.0, 2.0, 3.0))?;
/// ```
pub struct ComponentArray<T> {
    /// The packed component values.
    data: Vec<T>,
    /// Dense position of each slot's value, `None` if absent.
    entity_to_index: Box<[Option<u32>]>,
    /// Owner of each dense position.
    index_to_entity: Vec<Entity>,
}

impl<T> ComponentArray<T> {
    /// Creates empty storage for entity slots `0..capacity`.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of entities this storage can hold
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        let slots = capacity as usize;
        Self {
            data: Vec::with_capacity(slots),
            entity_to_index: vec![None; slots].into_boxed_slice(),
            index_to_entity: Vec::with_capacity(slots),
        }
    }

    /// Returns the capacity of this storage.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entity_to_index.len()
    }

    /// Returns the number of stored components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no component is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the dense index of the entity's value, if stored.
    ///
    /// A stale entity whose slot now belongs to a newer generation is
    /// reported as absent.
    #[inline]
    fn index_of(&self, entity: Entity) -> Option<usize> {
        let index = (*self.entity_to_index.get(entity.slot())?)? as usize;
        (self.index_to_entity[index] == entity).then_some(index)
    }

    /// Checks if the entity has a stored value.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.index_of(entity).is_some()
    }

    /// Appends a value for the entity at the end of the dense array.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidEntity`] if the slot is beyond capacity
    /// - [`EcsError::DuplicateComponent`] if the slot already holds a value
    pub fn insert(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        let Some(slot) = self.entity_to_index.get(entity.slot()) else {
            return Err(EcsError::InvalidEntity(entity));
        };
        if slot.is_some() {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: type_name::<T>(),
            });
        }

        // Bijection keeps len < capacity <= u32::MAX while a slot is vacant.
        #[allow(clippy::cast_possible_truncation)]
        let index = self.data.len() as u32;
        self.entity_to_index[entity.slot()] = Some(index);
        self.index_to_entity.push(entity);
        self.data.push(value);

        Ok(())
    }

    /// Removes and returns the entity's value.
    ///
    /// The last value is moved into the vacated position and its owner is
    /// re-pointed there.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no value.
    pub fn remove(&mut self, entity: Entity) -> EcsResult<T> {
        let Some(index) = self.index_of(entity) else {
            return Err(Self::missing(entity));
        };

        let value = self.data.swap_remove(index);
        self.index_to_entity.swap_remove(index);
        self.entity_to_index[entity.slot()] = None;

        if let Some(&moved) = self.index_to_entity.get(index) {
            // `index` < len <= capacity, fits in u32.
            #[allow(clippy::cast_possible_truncation)]
            let new_index = index as u32;
            self.entity_to_index[moved.slot()] = Some(new_index);
        }

        Ok(value)
    }

    /// Gets the entity's value.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no value.
    #[inline]
    pub fn get(&self, entity: Entity) -> EcsResult<&T> {
        match self.index_of(entity) {
            Some(index) => Ok(&self.data[index]),
            None => Err(Self::missing(entity)),
        }
    }

    /// Gets the entity's value mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no value.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> EcsResult<&mut T> {
        match self.index_of(entity) {
            Some(index) => Ok(&mut self.data[index]),
            None => Err(Self::missing(entity)),
        }
    }

    /// Removes the entity's value if present; no-op otherwise.
    ///
    /// # Returns
    ///
    /// `true` if a value was removed.
    pub fn entity_destroyed(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_ok()
    }

    /// Returns the packed values. Order is unspecified.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the owners of the packed values, parallel to [`as_slice`](Self::as_slice).
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.index_to_entity
    }

    /// Iterates over stored values with their owners.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.index_to_entity.iter().copied().zip(self.data.iter())
    }

    /// Iterates mutably over stored values with their owners.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.index_to_entity.iter().copied().zip(self.data.iter_mut())
    }

    fn missing(entity: Entity) -> EcsError {
        EcsError::MissingComponent {
            entity,
            component: type_name::<T>(),
        }
    }
}

/// Type-erased view of a [`ComponentArray`], one per registered type.
pub(crate) trait ErasedArray {
    /// Removes the entity's value if present.
    fn entity_destroyed(&mut self, entity: Entity) -> bool;

    /// Number of stored values.
    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedArray for ComponentArray<T> {
    fn entity_destroyed(&mut self, entity: Entity) -> bool {
        ComponentArray::entity_destroyed(self, entity)
    }

    fn len(&self) -> usize {
        ComponentArray::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(index: u32) -> Entity {
        Entity::new(index, 0)
    }

    /// Checks the two index maps are mutually inverse over exactly `len` entries.
    fn assert_consistent<T>(array: &ComponentArray<T>) {
        assert_eq!(array.data.len(), array.index_to_entity.len());
        for (index, entity) in array.index_to_entity.iter().enumerate() {
            assert_eq!(array.entity_to_index[entity.slot()], Some(index as u32));
        }
        let mapped = array.entity_to_index.iter().filter(|i| i.is_some()).count();
        assert_eq!(mapped, array.len());
    }

    #[test]
    fn test_insert_get() {
        let mut array = ComponentArray::new(8);
        array.insert(e(3), 30).unwrap();
        array.insert(e(5), 50).unwrap();

        assert_eq!(*array.get(e(3)).unwrap(), 30);
        assert_eq!(*array.get(e(5)).unwrap(), 50);
        assert_eq!(array.len(), 2);
        assert_eq!(array.capacity(), 8);
        assert_consistent(&array);
    }

    #[test]
    fn test_duplicate_insert_leaves_array_intact() {
        let mut array = ComponentArray::new(4);
        array.insert(e(1), 'a').unwrap();
        assert!(matches!(
            array.insert(e(1), 'b'),
            Err(EcsError::DuplicateComponent { .. })
        ));
        assert_eq!(*array.get(e(1)).unwrap(), 'a');
        assert_eq!(array.len(), 1);
        assert_consistent(&array);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut array = ComponentArray::new(2);
        assert_eq!(array.insert(e(2), 0u8), Err(EcsError::InvalidEntity(e(2))));
    }

    #[test]
    fn test_swap_remove_repoints_last() {
        let mut array = ComponentArray::new(8);
        for i in 0..4 {
            array.insert(e(i), i * 10).unwrap();
        }

        assert_eq!(array.remove(e(1)).unwrap(), 10);
        // Last value (slot 3) moved into position 1.
        assert_eq!(array.entities(), &[e(0), e(3), e(2)]);
        assert_eq!(array.as_slice(), &[0, 30, 20]);
        assert_eq!(*array.get(e(3)).unwrap(), 30);
        assert_consistent(&array);

        assert!(matches!(
            array.get(e(1)),
            Err(EcsError::MissingComponent { .. })
        ));
    }

    #[test]
    fn test_remove_last_and_only() {
        let mut array = ComponentArray::new(2);
        array.insert(e(0), 1).unwrap();
        array.insert(e(1), 2).unwrap();
        assert_eq!(array.remove(e(1)).unwrap(), 2);
        assert_eq!(array.remove(e(0)).unwrap(), 1);
        assert!(array.is_empty());
        assert_consistent(&array);
        assert!(matches!(
            array.remove(e(0)),
            Err(EcsError::MissingComponent { .. })
        ));
    }

    #[test]
    fn test_entity_destroyed_is_idempotent() {
        let mut array = ComponentArray::new(4);
        array.insert(e(2), "x").unwrap();
        assert!(!array.entity_destroyed(e(0)));
        assert!(array.entity_destroyed(e(2)));
        assert!(!array.entity_destroyed(e(2)));
        assert!(array.is_empty());
        assert_consistent(&array);
    }

    #[test]
    fn test_stale_generation_is_absent() {
        let mut array = ComponentArray::new(4);
        let old = Entity::new(1, 0);
        let new = Entity::new(1, 1);
        array.insert(new, 7).unwrap();
        assert!(!array.contains(old));
        assert!(array.get(old).is_err());
        assert!(!array.entity_destroyed(old));
        assert_eq!(*array.get(new).unwrap(), 7);
    }

    #[test]
    fn test_interleaved_churn_stays_consistent() {
        let mut array = ComponentArray::new(64);
        for round in 0..8u32 {
            for i in 0..64 {
                if (i + round) % 3 == 0 && !array.contains(e(i)) {
                    array.insert(e(i), i).unwrap();
                } else if (i * 7 + round) % 5 == 0 && array.contains(e(i)) {
                    array.remove(e(i)).unwrap();
                }
            }
            assert_consistent(&array);
            for (entity, value) in array.iter() {
                assert_eq!(entity.index(), *value);
            }
        }
    }

    #[test]
    fn test_iter_mut_updates_values() {
        let mut array = ComponentArray::new(4);
        array.insert(e(0), 1).unwrap();
        array.insert(e(2), 3).unwrap();
        for (_, value) in array.iter_mut() {
            *value *= 2;
        }
        assert_eq!(*array.get(e(0)).unwrap(), 2);
        assert_eq!(*array.get_mut(e(2)).unwrap(), 6);
    }
}
