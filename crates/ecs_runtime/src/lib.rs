//! # ecs_runtime
//!
//! A small entity-component-system runtime: entities are plain ids, each
//! carrying an ordered bag of type-erased components, and systems run once
//! per frame in a deterministic order.
//!
//! This crate provides:
//!
//! - [`Entity`] / [`EntityAllocator`]: never-reused `u64` ids.
//! - [`Component`] / [`ComponentType`]: host data with an optional cleanup hook.
//! - [`World`]: entity registry and component store, with linear queries.
//! - [`System`] / [`Scheduler`]: per-frame behaviour ordered by [`SystemOrder`].
//! - [`ScheduleConfig`] / [`SystemCatalog`]: JSON-described schedules.
//! - [`EntityManager`]: the facade a host drives.
//!
//! ## Usage
//!
//! ```rust
//! use ecs_runtime::{Component, ComponentType, EntityManager, FnSystem, World, components, handle};
//!
//! struct Position { x: f32 }
//! impl Component for Position {}
//!
//! let mut ecs: EntityManager<f32> = EntityManager::new();
//! let e = ecs.create_entity(components![Position { x: 0.0 }]);
//!
//! ecs.add_system(
//!     handle(FnSystem::new("move", |world: &mut World, dt: &f32| -> anyhow::Result<()> {
//!         for e in world.query_entities_with(&[ComponentType::of::<Position>()]) {
//!             if let Some(p) = world.get_mut::<Position>(e)? {
//!                 p.x += dt;
//!             }
//!         }
//!         Ok(())
//!     })),
//!     10,
//! )?;
//!
//! ecs.do_frame(&0.5)?;
//! assert_eq!(ecs.get::<Position>(e)?.map(|p| p.x), Some(0.5));
//! # Ok::<(), ecs_runtime::EcsError>(())
//! ```

pub mod bag;
pub mod component;
pub mod config;
pub mod entity;
pub mod error;
pub mod manager;
pub mod order;
pub mod scheduler;
pub mod system;
pub mod world;

pub use bag::ComponentBag;
pub use component::{AsAny, Component, ComponentType};
pub use config::{ScheduleConfig, ScheduledSystem, SystemCatalog};
pub use entity::{Entity, EntityAllocator};
pub use error::EcsError;
pub use manager::EntityManager;
pub use order::SystemOrder;
pub use scheduler::Scheduler;
pub use system::{FnSystem, System, SystemHandle, handle, same_system};
pub use world::World;
