//! # Registry Configuration
//!
//! Capacities are decided once, when the registry is built, and never grow.
//! Defaults match the compile-time constants; a TOML file can lower or raise
//! the entity pool and lower the component type pool.
//!
//! ```toml
//! max_entities = 10000
//! max_component_types = 16
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{EcsError, EcsResult};

/// Default capacity of the entity pool.
pub const MAX_ENTITIES: u32 = 5000;

/// Width of a [`Signature`](crate::Signature), and the hard ceiling on
/// registered component types.
pub const MAX_COMPONENTS: usize = 32;

const DEFAULT_COMPONENT_TYPES: u8 = 32;

/// Startup capacities for a [`Registry`](crate::Registry).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Number of entity slots. Valid ids are `0..max_entities`.
    pub max_entities: u32,
    /// Number of component types that may be registered (`1..=32`).
    pub max_component_types: u8,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_entities: MAX_ENTITIES,
            max_component_types: DEFAULT_COMPONENT_TYPES,
        }
    }
}

impl RegistryConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// Missing keys take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the text is not valid TOML,
    /// has unexpected value types, or fails [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|err| EcsError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the capacities are usable.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if `max_entities` is zero or
    /// `u32::MAX` (reserved), or `max_component_types` is outside `1..=32`.
    pub fn validate(&self) -> EcsResult<()> {
        if self.max_entities == 0 || self.max_entities == u32::MAX {
            return Err(EcsError::InvalidConfig(format!(
                "max_entities must be in 1..{}, got {}",
                u32::MAX,
                self.max_entities
            )));
        }
        if self.max_component_types == 0 || usize::from(self.max_component_types) > MAX_COMPONENTS
        {
            return Err(EcsError::InvalidConfig(format!(
                "max_component_types must be in 1..={MAX_COMPONENTS}, got {}",
                self.max_component_types
            )));
        }
        Ok(())
    }
}
