//! The [`EntityManager`]: the host's single point of contact with the ECS.
//!
//! It owns one [`World`] (entity registry and component store) and one
//! [`Scheduler`], and drives frames:
//!
//! 1. The host creates entities and attaches components.
//! 2. The host registers systems, directly or from a [`ScheduleConfig`].
//! 3. The host calls [`EntityManager::do_frame`] once per frame; each system
//!    gets `&mut World` and the frame data in turn.

use tracing::{debug, info};

use crate::component::{Component, ComponentType};
use crate::config::{ScheduleConfig, SystemCatalog};
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;
use crate::order::SystemOrder;
use crate::scheduler::Scheduler;
use crate::system::SystemHandle;
use crate::world::World;

/// Entity registry, component store and system scheduler in one place.
///
/// `D` is the per-frame data handed to every system (for example elapsed
/// time). Single-threaded: a host sharing a manager across threads must put
/// the whole manager behind one lock.
#[derive(Debug)]
pub struct EntityManager<D = ()> {
    /// Entity registry and component store.
    world: World,
    /// Registered systems.
    scheduler: Scheduler<D>,
    /// Number of frames started so far.
    frame: u64,
}

impl<D> EntityManager<D> {
    /// Create a manager with its own entity counter.
    #[must_use]
    pub fn new() -> Self {
        Self::with_allocator(EntityAllocator::new())
    }

    /// Create a manager drawing entity ids from `allocator`.
    ///
    /// Managers built from clones of the same allocator never issue the same
    /// id.
    #[must_use]
    pub fn with_allocator(allocator: EntityAllocator) -> Self {
        Self {
            world: World::with_allocator(allocator),
            scheduler: Scheduler::new(),
            frame: 0,
        }
    }

    /// Returns a reference to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns a mutable reference to the world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Returns a reference to the scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler<D> {
        &self.scheduler
    }

    /// Returns the number of frames started so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // -- Entity registry --

    /// See [`World::create_entity`].
    pub fn create_entity(&mut self, initial: Vec<Box<dyn Component>>) -> Entity {
        self.world.create_entity(initial)
    }

    /// See [`World::delete_entity`].
    pub fn delete_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.world.delete_entity(entity)
    }

    /// See [`World::list_entities`].
    #[must_use]
    pub fn list_entities(&self) -> Vec<Entity> {
        self.world.list_entities()
    }

    /// See [`World::contains`].
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    /// See [`World::entity_count`].
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.world.entity_count()
    }

    // -- Component store --

    /// See [`World::add_component`].
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> Result<(), EcsError> {
        self.world.add_component(entity, component)
    }

    /// See [`World::get_component`].
    pub fn get_component(
        &self,
        entity: Entity,
        ty: ComponentType,
    ) -> Result<Option<&dyn Component>, EcsError> {
        self.world.get_component(entity, ty)
    }

    /// See [`World::get`].
    pub fn get<T: Component>(&self, entity: Entity) -> Result<Option<&T>, EcsError> {
        self.world.get(entity)
    }

    /// See [`World::get_mut`].
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<Option<&mut T>, EcsError> {
        self.world.get_mut(entity)
    }

    /// See [`World::remove_component`].
    pub fn remove_component(&mut self, entity: Entity, ty: ComponentType) -> Result<bool, EcsError> {
        self.world.remove_component(entity, ty)
    }

    /// See [`World::has_component`].
    pub fn has_component(&self, entity: Entity, types: &[ComponentType]) -> Result<bool, EcsError> {
        self.world.has_component(entity, types)
    }

    /// See [`World::clear_entity`].
    pub fn clear_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.world.clear_entity(entity)
    }

    /// See [`World::query_entities_with`].
    #[must_use]
    pub fn query_entities_with(&self, types: &[ComponentType]) -> Vec<Entity> {
        self.world.query_entities_with(types)
    }

    // -- System scheduler --

    /// Register a system at an explicit order. See [`Scheduler::add_system`].
    pub fn add_system<O>(&mut self, system: SystemHandle<D>, order: O) -> Result<(), EcsError>
    where
        O: TryInto<SystemOrder>,
        EcsError: From<O::Error>,
    {
        self.scheduler.add_system(system, order)
    }

    /// Register a system at [`SystemOrder::DEFAULT`].
    pub fn add_system_default(&mut self, system: SystemHandle<D>) -> Result<(), EcsError> {
        self.scheduler.add_system(system, SystemOrder::DEFAULT)
    }

    /// Number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.scheduler.len()
    }

    /// Register every system listed in `config`, looking names up in
    /// `catalog`.
    ///
    /// The whole schedule is validated before anything is registered (names,
    /// orders, and that every handle can be borrowed), so a bad entry leaves
    /// the scheduler untouched.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidSystem`] for an unknown name or a mutably borrowed
    /// handle, [`EcsError::InvalidOrder`] for a non-integer order.
    pub fn apply_schedule(
        &mut self,
        config: &ScheduleConfig,
        catalog: &SystemCatalog<D>,
    ) -> Result<(), EcsError> {
        let resolved = config.resolve(catalog)?;
        let count = resolved.len();
        for (system, order) in resolved {
            self.scheduler.add_system(system, order)?;
        }
        info!(
            systems = count,
            registered = self.scheduler.len(),
            "applied schedule"
        );
        Ok(())
    }

    /// Run every registered system once, in order, passing `data` to each.
    ///
    /// # Errors
    ///
    /// The first failing system's error is returned as
    /// [`EcsError::SystemFailed`] and the remaining systems are skipped for
    /// this frame. The failing system stays registered.
    pub fn do_frame(&mut self, data: &D) -> Result<(), EcsError> {
        self.frame += 1;
        debug!(
            frame = self.frame,
            systems = self.scheduler.len(),
            entities = self.world.entity_count(),
            "frame start"
        );
        self.scheduler.run(&mut self.world, data)
    }
}

impl<D> Default for EntityManager<D> {
    fn default() -> Self {
        Self::new()
    }
}
