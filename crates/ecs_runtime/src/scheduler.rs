//! System scheduler: ordered registration and per-frame execution.
//!
//! Systems are kept in a list sorted by `(order, registration sequence)`, so
//! ties between equal orders resolve to whichever system registered first.
//! A frame walks the list front to back and stops at the first failure.

use tracing::{debug, warn};

use crate::error::EcsError;
use crate::order::SystemOrder;
use crate::system::{SystemHandle, same_system, system_name};
use crate::world::World;

/// A registered system with its ordering key.
struct Entry<D> {
    handle: SystemHandle<D>,
    order: SystemOrder,
    /// Registration sequence; breaks ties between equal orders.
    seq: u64,
    /// Name captured at registration, so errors can name a busy system.
    name: String,
}

/// Ordered set of systems run once per frame.
pub struct Scheduler<D = ()> {
    entries: Vec<Entry<D>>,
    next_seq: u64,
}

impl<D> Scheduler<D> {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Register `system` to run every frame at `order`.
    ///
    /// Registering a handle that is already present (same object) only moves
    /// it to the new order; it keeps its first registration sequence.
    ///
    /// # Errors
    ///
    /// - [`EcsError::InvalidOrder`] if `order` does not convert to an integer key.
    /// - [`EcsError::InvalidSystem`] if the handle is mutably borrowed, so the
    ///   system cannot be inspected. This applies to re-registration too; the
    ///   existing entry is left unchanged.
    pub fn add_system<O>(&mut self, system: SystemHandle<D>, order: O) -> Result<(), EcsError>
    where
        O: TryInto<SystemOrder>,
        EcsError: From<O::Error>,
    {
        let order: SystemOrder = order.try_into()?;
        let name = system_name(&system)?;

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| same_system(&entry.handle, &system))
        {
            debug!(
                system = %entry.name,
                from = entry.order.get(),
                to = order.get(),
                "re-ordered system"
            );
            entry.order = order;
        } else {
            debug!(system = %name, order = order.get(), "registered system");
            self.entries.push(Entry {
                handle: system,
                order,
                seq: self.next_seq,
                name,
            });
            self.next_seq += 1;
        }

        self.entries.sort_by_key(|entry| (entry.order, entry.seq));
        Ok(())
    }

    /// Run every system once, in order, handing each the world and `data`.
    ///
    /// # Errors
    ///
    /// Stops at the first system that fails and returns
    /// [`EcsError::SystemFailed`]; systems after it are not run this frame.
    /// Returns [`EcsError::SystemBusy`] if a system's handle is borrowed
    /// elsewhere when its turn comes.
    pub fn run(&self, world: &mut World, data: &D) -> Result<(), EcsError> {
        for entry in &self.entries {
            let mut system = entry
                .handle
                .try_borrow_mut()
                .map_err(|_| EcsError::SystemBusy(entry.name.clone()))?;

            if let Err(source) = system.update(world, data) {
                warn!(
                    system = %entry.name,
                    order = entry.order.get(),
                    error = %source,
                    "system failed, skipping rest of frame"
                );
                return Err(EcsError::SystemFailed {
                    name: entry.name.clone(),
                    source,
                });
            }
        }
        Ok(())
    }

    /// The order `system` is registered at, if it is registered.
    #[must_use]
    pub fn order_of(&self, system: &SystemHandle<D>) -> Option<SystemOrder> {
        self.entries
            .iter()
            .find(|entry| same_system(&entry.handle, system))
            .map(|entry| entry.order)
    }

    /// `(name, order)` of every system, in execution order.
    #[must_use]
    pub fn systems(&self) -> Vec<(&str, SystemOrder)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.order))
            .collect()
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D> Default for Scheduler<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> std::fmt::Debug for Scheduler<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("systems", &self.systems())
            .finish()
    }
}
