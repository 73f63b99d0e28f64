//! # SIGNET Core
//!
//! Fixed-capacity Entity Component System (ECS) registry built around
//! component signatures:
//! - Entities are generational ids recycled through a FIFO free list
//! - Components live in dense per-type arrays with O(1) insert/remove/lookup
//! - Systems declare a required [`Signature`] and always see exactly the
//!   entities that satisfy it
//!
//! ## Architecture Rules
//!
//! 1. **Capacities are fixed at startup** - nothing grows during a frame
//! 2. **Contract violations are errors** - every misuse returns [`EcsError`]
//! 3. **One entry point** - application code only talks to [`Registry`]
//!
//! ## Example
//!
//! ```rust
//! use signet_core::{Component, Registry, System};
//!
//! struct Position(f32, f32);
//! impl Component for Position {}
//!
//! struct Mover;
//! impl System for Mover {}
//!
//! # fn main() -> signet_core::EcsResult<()> {
//! let mut registry = Registry::new();
//! let position = registry.register_component::<Position>()?;
//!
//! let entity = registry.create_entity()?;
//! registry.add_component(entity, Position(0.0, 0.0))?;
//!
//! registry.register_system(Mover)?;
//! registry.set_system_signature::<Mover>(position.into())?;
//! assert!(registry.system_entities::<Mover>()?.contains(&entity));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::{RegistryConfig, MAX_COMPONENTS, MAX_ENTITIES};
pub use ecs::{
    Component, ComponentArray, ComponentManager, ComponentType, Entity, EntityManager, Registry,
    Signature, System, SystemHandle, SystemManager,
};
pub use error::{EcsError, EcsResult};
