//! Entity registry and component store.
//!
//! The [`World`] maps every live [`Entity`] to exactly one [`ComponentBag`].
//! All component operations are keyed by entity and fail with
//! [`EcsError::NotFound`] when the entity is not registered.
//!
//! Queries are linear scans: every entity, and for each one every required
//! type against its bag. No index is maintained.

use std::collections::BTreeMap;

use tracing::debug;

use crate::bag::ComponentBag;
use crate::component::{Component, ComponentType};
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;

/// Entity registry and component store.
#[derive(Debug, Default)]
pub struct World {
    /// Entity ID allocator.
    allocator: EntityAllocator,
    /// Component bag of every live entity. Ids are allocated in increasing
    /// order, so iteration order is creation order.
    entities: BTreeMap<Entity, ComponentBag>,
}

impl World {
    /// Create an empty world with its own entity counter.
    #[must_use]
    pub fn new() -> Self {
        Self::with_allocator(EntityAllocator::new())
    }

    /// Create an empty world drawing ids from `allocator`.
    ///
    /// Pass clones of one allocator to several worlds to keep ids unique
    /// across all of them.
    #[must_use]
    pub fn with_allocator(allocator: EntityAllocator) -> Self {
        Self {
            allocator,
            entities: BTreeMap::new(),
        }
    }

    /// The allocator this world draws ids from.
    #[must_use]
    pub fn allocator(&self) -> &EntityAllocator {
        &self.allocator
    }

    // -- Entity lifecycle --

    /// Allocate a new entity and attach `initial` in order.
    ///
    /// Use [`components!`](crate::components) to build the list.
    pub fn create_entity(&mut self, initial: Vec<Box<dyn Component>>) -> Entity {
        let entity = self.allocator.allocate();
        let bag: ComponentBag = initial.into_iter().collect();
        debug!(entity = %entity, components = bag.len(), "created entity");
        self.entities.insert(entity, bag);
        entity
    }

    /// Remove an entity and all its components.
    ///
    /// Components are dropped without [`Component::cleanup`] being called.
    pub fn delete_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        let bag = self
            .entities
            .remove(&entity)
            .ok_or(EcsError::NotFound(entity))?;
        debug!(entity = %entity, dropped = bag.len(), "deleted entity");
        Ok(())
    }

    /// All live entity ids, in creation order.
    #[must_use]
    pub fn list_entities(&self) -> Vec<Entity> {
        self.entities.keys().copied().collect()
    }

    /// Check if an entity exists.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Return the count of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // -- Component operations --

    fn bag(&self, entity: Entity) -> Result<&ComponentBag, EcsError> {
        self.entities.get(&entity).ok_or(EcsError::NotFound(entity))
    }

    fn bag_mut(&mut self, entity: Entity) -> Result<&mut ComponentBag, EcsError> {
        self.entities
            .get_mut(&entity)
            .ok_or(EcsError::NotFound(entity))
    }

    /// Append a component to an entity.
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> Result<(), EcsError> {
        self.add_boxed(entity, Box::new(component))
    }

    /// Append an already boxed component to an entity.
    pub fn add_boxed(&mut self, entity: Entity, component: Box<dyn Component>) -> Result<(), EcsError> {
        self.bag_mut(entity)?.push(component);
        Ok(())
    }

    /// First component of type `ty` on an entity, or `None`.
    pub fn get_component(
        &self,
        entity: Entity,
        ty: ComponentType,
    ) -> Result<Option<&dyn Component>, EcsError> {
        Ok(self.bag(entity)?.get(ty))
    }

    /// First component of type `ty` on an entity, mutably.
    pub fn get_component_mut(
        &mut self,
        entity: Entity,
        ty: ComponentType,
    ) -> Result<Option<&mut dyn Component>, EcsError> {
        Ok(self.bag_mut(entity)?.get_mut(ty))
    }

    /// First `T` on an entity, or `None`.
    pub fn get<T: Component>(&self, entity: Entity) -> Result<Option<&T>, EcsError> {
        Ok(self
            .get_component(entity, ComponentType::of::<T>())?
            .and_then(|c| c.downcast_ref::<T>()))
    }

    /// First `T` on an entity, mutably.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<Option<&mut T>, EcsError> {
        Ok(self
            .get_component_mut(entity, ComponentType::of::<T>())?
            .and_then(|c| c.downcast_mut::<T>()))
    }

    /// Remove the first component of type `ty`, calling its
    /// [`Component::cleanup`] first.
    ///
    /// Returns `false` when the entity holds no such component; that is not an
    /// error.
    pub fn remove_component(&mut self, entity: Entity, ty: ComponentType) -> Result<bool, EcsError> {
        let Some(mut component) = self.bag_mut(entity)?.take(ty) else {
            return Ok(false);
        };
        component.cleanup();
        debug!(entity = %entity, component = %ty, "removed component");
        Ok(true)
    }

    /// Remove the first `T`, calling its cleanup first.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Result<bool, EcsError> {
        self.remove_component(entity, ComponentType::of::<T>())
    }

    /// Returns `true` if the entity holds at least one component of every
    /// listed type. An empty list is trivially satisfied.
    pub fn has_component(&self, entity: Entity, types: &[ComponentType]) -> Result<bool, EcsError> {
        Ok(self.bag(entity)?.contains_all(types))
    }

    /// Returns `true` if the entity holds a `T`.
    pub fn has<T: Component>(&self, entity: Entity) -> Result<bool, EcsError> {
        self.has_component(entity, &[ComponentType::of::<T>()])
    }

    /// Drop every component of an entity, keeping the entity alive.
    ///
    /// Like [`World::delete_entity`], this skips [`Component::cleanup`].
    pub fn clear_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        let bag = self.bag_mut(entity)?;
        let dropped = bag.len();
        bag.clear();
        debug!(entity = %entity, dropped, "cleared entity");
        Ok(())
    }

    /// Names of the components on an entity, in bag order.
    pub fn component_names(&self, entity: Entity) -> Result<Vec<&'static str>, EcsError> {
        Ok(self.bag(entity)?.types().map(|ty| ty.name()).collect())
    }

    /// Number of components on an entity, duplicates included.
    pub fn component_count(&self, entity: Entity) -> Result<usize, EcsError> {
        Ok(self.bag(entity)?.len())
    }

    // -- Query --

    /// Every live entity holding all of `types`, in creation order.
    #[must_use]
    pub fn query_entities_with(&self, types: &[ComponentType]) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|(_, bag)| bag.contains_all(types))
            .map(|(entity, _)| *entity)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::components;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
        z: f32,
    }

    impl Component for Position {}

    /// Counts cleanup calls through a shared cell.
    struct Model {
        cleanups: Rc<Cell<u32>>,
    }

    impl Component for Model {
        fn cleanup(&mut self) {
            self.cleanups.set(self.cleanups.get() + 1);
        }
    }

    struct Frozen;

    impl Component for Frozen {}

    fn origin() -> Position {
        Position {
            x: 0.0,
            y: 0.0,
            z: 5.0,
        }
    }

    fn pos() -> ComponentType {
        ComponentType::of::<Position>()
    }

    fn model() -> ComponentType {
        ComponentType::of::<Model>()
    }

    #[test]
    fn test_create_ids_strictly_increase() {
        let mut world = World::new();
        let ids: Vec<Entity> = (0..16).map(|_| world.create_entity(components![])).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(world.entity_count(), 16);
    }

    #[test]
    fn test_create_with_initial_components() {
        let mut world = World::new();
        let e = world.create_entity(components![origin(), Frozen]);
        assert_eq!(world.component_count(e).unwrap(), 2);
        assert_eq!(world.get::<Position>(e).unwrap(), Some(&origin()));
        assert!(world.has::<Frozen>(e).unwrap());
    }

    #[test]
    fn test_delete_then_operations_fail() {
        let mut world = World::new();
        let e = world.create_entity(components![origin()]);
        world.delete_entity(e).unwrap();

        assert!(!world.contains(e));
        assert!(matches!(world.delete_entity(e), Err(EcsError::NotFound(id)) if id == e));
        assert!(matches!(world.add_component(e, Frozen), Err(EcsError::NotFound(_))));
        assert!(matches!(world.get_component(e, pos()), Err(EcsError::NotFound(_))));
        assert!(matches!(world.remove_component(e, pos()), Err(EcsError::NotFound(_))));
        assert!(matches!(world.has_component(e, &[]), Err(EcsError::NotFound(_))));
        assert!(matches!(world.clear_entity(e), Err(EcsError::NotFound(_))));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut world = World::new();
        let e1 = world.create_entity(components![]);
        world.delete_entity(e1).unwrap();
        let e2 = world.create_entity(components![]);
        assert!(e2 > e1);
    }

    #[test]
    fn test_add_then_get() {
        let mut world = World::new();
        let e = world.create_entity(components![]);
        world.add_component(e, origin()).unwrap();
        assert_eq!(world.get::<Position>(e).unwrap(), Some(&origin()));
        assert!(world.has_component(e, &[pos()]).unwrap());
        let dynamic = world.get_component(e, pos()).unwrap().unwrap();
        assert_eq!(dynamic.component_type(), pos());
    }

    #[test]
    fn test_get_missing_is_none() {
        let mut world = World::new();
        let e = world.create_entity(components![Frozen]);
        assert!(world.get::<Position>(e).unwrap().is_none());
        assert!(world.get_component(e, pos()).unwrap().is_none());
    }

    #[test]
    fn test_duplicates_act_on_first_match() {
        let mut world = World::new();
        let first = origin();
        let second = Position {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        };
        let e = world.create_entity(components![first, second]);
        assert_eq!(world.get::<Position>(e).unwrap(), Some(&first));

        assert!(world.remove::<Position>(e).unwrap());
        assert_eq!(world.get::<Position>(e).unwrap(), Some(&second));
    }

    #[test]
    fn test_get_mut_mutates_in_place() {
        let mut world = World::new();
        let e = world.create_entity(components![origin()]);
        if let Some(p) = world.get_mut::<Position>(e).unwrap() {
            p.x = 3.0;
        }
        assert_eq!(world.get::<Position>(e).unwrap().map(|p| p.x), Some(3.0));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut world = World::new();
        let e = world.create_entity(components![origin()]);
        assert!(!world.remove_component(e, model()).unwrap());
        assert_eq!(world.component_count(e).unwrap(), 1);
        assert_eq!(world.get::<Position>(e).unwrap(), Some(&origin()));
    }

    #[test]
    fn test_remove_invokes_cleanup_once() {
        let cleanups = Rc::new(Cell::new(0));
        let mut world = World::new();
        let e = world.create_entity(components![origin()]);
        world
            .add_component(
                e,
                Model {
                    cleanups: Rc::clone(&cleanups),
                },
            )
            .unwrap();

        assert!(world.remove_component(e, model()).unwrap());
        assert_eq!(cleanups.get(), 1);
        assert!(!world.has_component(e, &[model()]).unwrap());
        assert!(world.has_component(e, &[pos()]).unwrap());

        // A second removal finds nothing and must not call cleanup again.
        assert!(!world.remove_component(e, model()).unwrap());
        assert_eq!(cleanups.get(), 1);
    }

    #[test]
    fn test_remove_without_cleanup_capability() {
        let mut world = World::new();
        let e = world.create_entity(components![origin(), Frozen]);
        assert!(world.remove::<Frozen>(e).unwrap());
        assert!(!world.has::<Frozen>(e).unwrap());
    }

    #[test]
    fn test_bulk_removal_skips_cleanup() {
        let cleanups = Rc::new(Cell::new(0));
        let mut world = World::new();

        let cleared = world.create_entity(components![Model {
            cleanups: Rc::clone(&cleanups)
        }]);
        world.clear_entity(cleared).unwrap();
        assert!(world.contains(cleared));
        assert_eq!(world.component_count(cleared).unwrap(), 0);

        let deleted = world.create_entity(components![Model {
            cleanups: Rc::clone(&cleanups)
        }]);
        world.delete_entity(deleted).unwrap();

        assert_eq!(cleanups.get(), 0);
    }

    #[test]
    fn test_has_component_conjunction() {
        let mut world = World::new();
        let e = world.create_entity(components![origin()]);
        assert!(world.has_component(e, &[]).unwrap());
        assert!(world.has_component(e, &[pos()]).unwrap());
        assert!(!world.has_component(e, &[pos(), model()]).unwrap());
    }

    #[test]
    fn test_query_matches_has_component() {
        let cleanups = Rc::new(Cell::new(0));
        let mut world = World::new();
        let e1 = world.create_entity(components![
            origin(),
            Model {
                cleanups: Rc::clone(&cleanups)
            }
        ]);
        let e2 = world.create_entity(components![origin()]);
        let _e3 = world.create_entity(components![Frozen]);

        assert_eq!(world.query_entities_with(&[pos(), model()]), vec![e1]);
        assert_eq!(world.query_entities_with(&[pos()]), vec![e1, e2]);

        let expected: Vec<Entity> = world
            .list_entities()
            .into_iter()
            .filter(|e| world.has_component(*e, &[pos(), model()]).unwrap())
            .collect();
        assert_eq!(world.query_entities_with(&[pos(), model()]), expected);
    }

    #[test]
    fn test_query_with_duplicates_lists_entity_once() {
        let mut world = World::new();
        let e = world.create_entity(components![origin(), origin()]);
        assert_eq!(world.query_entities_with(&[pos(), pos()]), vec![e]);
    }

    #[test]
    fn test_query_empty_signature_matches_all() {
        let mut world = World::new();
        let e1 = world.create_entity(components![]);
        let e2 = world.create_entity(components![Frozen]);
        assert_eq!(world.query_entities_with(&[]), vec![e1, e2]);
    }

    #[test]
    fn test_list_entities_skips_deleted() {
        let mut world = World::new();
        let e1 = world.create_entity(components![]);
        let e2 = world.create_entity(components![]);
        let e3 = world.create_entity(components![]);
        world.delete_entity(e2).unwrap();
        assert_eq!(world.list_entities(), vec![e1, e3]);
    }

    #[test]
    fn test_component_names() {
        let mut world = World::new();
        let e = world.create_entity(components![Frozen, origin()]);
        let names = world.component_names(e).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names[0].ends_with("Frozen"));
        assert!(names[1].ends_with("Position"));
    }

    #[test]
    fn test_shared_allocator_across_worlds() {
        let allocator = EntityAllocator::new();
        let mut a = World::with_allocator(allocator.clone());
        let mut b = World::with_allocator(allocator);
        let e1 = a.create_entity(components![]);
        let e2 = b.create_entity(components![]);
        assert_ne!(e1, e2);
        assert!(a.allocator().shares_counter_with(b.allocator()));
    }
}
