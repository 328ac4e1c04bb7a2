//! The [`System`] trait and shared system handles.
//!
//! A system is host code run once per frame. It receives the
//! [`World`](crate::World) and the frame data `D` the host passed to
//! [`EntityManager::do_frame`](crate::EntityManager::do_frame).

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::EcsError;
use crate::world::World;

/// Per-frame behaviour registered with a [`Scheduler`](crate::Scheduler).
///
/// `D` is the frame data forwarded unchanged to every system of a frame
/// (elapsed time, input snapshot, ...). It defaults to `()`.
///
/// # Examples
///
/// ```rust
/// use ecs_runtime::{Component, ComponentType, System, World};
///
/// struct Velocity(f32);
/// impl Component for Velocity {}
///
/// struct Damping;
///
/// impl System<f32> for Damping {
///     fn update(&mut self, world: &mut World, dt: &f32) -> anyhow::Result<()> {
///         for e in world.query_entities_with(&[ComponentType::of::<Velocity>()]) {
///             if let Some(v) = world.get_mut::<Velocity>(e)? {
///                 v.0 *= 1.0 - 0.1 * dt;
///             }
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait System<D = ()> {
    /// Run the system for one frame.
    ///
    /// # Errors
    ///
    /// Any error aborts the rest of the frame and is returned to the caller
    /// of `do_frame`, wrapped in [`EcsError::SystemFailed`](crate::EcsError::SystemFailed).
    fn update(&mut self, world: &mut World, data: &D) -> anyhow::Result<()>;

    /// Name used in logs and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A shared, identity-carrying system.
///
/// Registration compares handles by pointer, so registering a clone of a
/// handle again updates the existing entry.
pub type SystemHandle<D = ()> = Rc<RefCell<dyn System<D>>>;

/// Wrap a system in a fresh [`SystemHandle`].
pub fn handle<D, S>(system: S) -> SystemHandle<D>
where
    S: System<D> + 'static,
{
    Rc::new(RefCell::new(system))
}

/// A system built from a name and a closure.
pub struct FnSystem<F> {
    name: String,
    func: F,
}

impl<F> FnSystem<F> {
    /// Create a named closure system.
    #[must_use]
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<D, F> System<D> for FnSystem<F>
where
    F: FnMut(&mut World, &D) -> anyhow::Result<()>,
{
    fn update(&mut self, world: &mut World, data: &D) -> anyhow::Result<()> {
        (self.func)(world, data)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> std::fmt::Debug for FnSystem<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSystem").field("name", &self.name).finish()
    }
}

/// Name of the system behind `system`.
///
/// # Errors
///
/// [`EcsError::InvalidSystem`] if the handle is mutably borrowed, so the
/// system cannot be inspected.
pub(crate) fn system_name<D>(system: &SystemHandle<D>) -> Result<String, EcsError> {
    let system = system.try_borrow().map_err(|_| {
        EcsError::InvalidSystem("system is mutably borrowed during registration".into())
    })?;
    Ok(system.name().to_owned())
}

/// Returns `true` if both handles point at the same system object.
#[must_use]
pub fn same_system<D>(a: &SystemHandle<D>, b: &SystemHandle<D>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
