//! Schedule configuration.
//!
//! A [`ScheduleConfig`] lists systems by name with an optional order. It is
//! resolved against a [`SystemCatalog`] of host-provided handles:
//!
//! ```json
//! {
//!     "systems": [
//!         { "name": "physics", "order": -10 },
//!         { "name": "render", "order": 100 },
//!         { "name": "input" }
//!     ]
//! }
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::EcsError;
use crate::order::SystemOrder;
use crate::system::{SystemHandle, system_name};

/// One system entry of a schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduledSystem {
    /// Catalog name of the system.
    pub name: String,
    /// Raw order value. Validated when the entry is resolved, so a
    /// non-integer order reports [`EcsError::InvalidOrder`] rather than a
    /// parse error.
    #[serde(default)]
    pub order: Option<Value>,
}

impl ScheduledSystem {
    /// The validated order, or [`SystemOrder::DEFAULT`] when absent.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidOrder`] if the value is not an integer.
    pub fn order(&self) -> Result<SystemOrder, EcsError> {
        match &self.order {
            Some(value) => SystemOrder::try_from(value),
            None => Ok(SystemOrder::DEFAULT),
        }
    }
}

/// A list of systems to register, in registration order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleConfig {
    /// Systems to register.
    #[serde(default)]
    pub systems: Vec<ScheduledSystem>,
}

impl ScheduleConfig {
    /// Parse a schedule from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::Config`] if the document is malformed.
    pub fn from_json_str(source: &str) -> Result<Self, EcsError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Resolve every entry against `catalog`, in document order.
    ///
    /// Nothing is registered here; the caller feeds the result to
    /// [`Scheduler::add_system`](crate::Scheduler::add_system).
    ///
    /// # Errors
    ///
    /// Stops at the first entry that fails: [`EcsError::InvalidSystem`] for
    /// a name missing from the catalog or a handle that is mutably borrowed,
    /// [`EcsError::InvalidOrder`] for a non-integer order.
    pub fn resolve<D>(
        &self,
        catalog: &SystemCatalog<D>,
    ) -> Result<Vec<(SystemHandle<D>, SystemOrder)>, EcsError> {
        self.systems
            .iter()
            .map(|entry| -> Result<_, EcsError> {
                let system = catalog.get(&entry.name)?;
                system_name(&system)?;
                Ok((system, entry.order()?))
            })
            .collect()
    }
}

/// Named system handles a schedule can refer to.
pub struct SystemCatalog<D = ()> {
    systems: HashMap<String, SystemHandle<D>>,
}

impl<D> SystemCatalog<D> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            systems: HashMap::new(),
        }
    }

    /// Make `system` available under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, system: SystemHandle<D>) {
        self.systems.insert(name.into(), system);
    }

    /// Builder form of [`SystemCatalog::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, system: SystemHandle<D>) -> Self {
        self.insert(name, system);
        self
    }

    /// Look up a system by name. The same handle is returned on every call,
    /// so a name listed twice registers one system.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidSystem`] if no system has that name.
    pub fn get(&self, name: &str) -> Result<SystemHandle<D>, EcsError> {
        self.systems
            .get(name)
            .cloned()
            .ok_or_else(|| EcsError::InvalidSystem(format!("no system named '{name}'")))
    }

    /// Returns the number of named systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl<D> Default for SystemCatalog<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> std::fmt::Debug for SystemCatalog<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.systems.keys()).finish()
    }
}
