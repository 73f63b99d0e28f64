//! # Registry Error Types
//!
//! All contract violations the registry can report.

use thiserror::Error;

use crate::ecs::Entity;

/// Errors that can occur while operating on a [`Registry`](crate::Registry).
///
/// Every variant is a caller contract violation. The failed operation has
/// not mutated any state, so the registry stays consistent and the caller
/// decides whether the error is fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity pool or the component type pool is full.
    #[error("{pool} capacity exceeded: limit is {limit}")]
    CapacityExceeded {
        /// Which pool ran out (`"entity"` or `"component type"`).
        pool: &'static str,
        /// The configured limit of that pool.
        limit: usize,
    },

    /// The entity is out of range, not live, or a stale generation.
    #[error("invalid entity: {0}")]
    InvalidEntity(Entity),

    /// A component type or system type was registered twice.
    #[error("{kind} type already registered: {name}")]
    DuplicateRegistration {
        /// `"component"` or `"system"`.
        kind: &'static str,
        /// Type name of the offending type.
        name: &'static str,
    },

    /// A component operation was issued before its type was registered.
    #[error("component type not registered: {0}")]
    UnregisteredType(&'static str),

    /// The entity already owns a component of this type.
    #[error("entity {entity} already has component {component}")]
    DuplicateComponent {
        /// The entity.
        entity: Entity,
        /// Type name of the component.
        component: &'static str,
    },

    /// The entity owns no component of this type.
    #[error("entity {entity} has no component {component}")]
    MissingComponent {
        /// The entity.
        entity: Entity,
        /// Type name of the component.
        component: &'static str,
    },

    /// A system operation was issued before the system was registered.
    #[error("system not registered: {0}")]
    UnknownSystem(&'static str),

    /// Registry configuration failed to parse or validate.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for registry operations.
pub type EcsResult<T> = Result<T, EcsError>;
