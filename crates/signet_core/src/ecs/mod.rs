//! # Entity Component System
//!
//! A fixed-capacity, signature-driven ECS.
//!
//! ## Design Philosophy
//!
//! - Entity ids are slot indices with generation counters
//! - Components are stored in dense arrays, one per registered type
//! - Each entity carries a [`Signature`] of the component types it owns
//! - Systems track their members incrementally on every signature change
//! - [`Registry`] sequences the managers so no intermediate state leaks

mod component;
mod entity;
mod registry;
mod signature;
mod storage;
mod system;

pub use component::{Component, ComponentManager};
pub use entity::{Entity, EntityManager};
pub use registry::Registry;
pub use signature::{ComponentType, Signature};
pub use storage::ComponentArray;
pub use system::{System, SystemHandle, SystemManager};
