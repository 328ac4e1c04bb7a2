//! Core [`Component`] trait and runtime type keys.
//!
//! Components are arbitrary host values. The store keeps them type-erased as
//! `Box<dyn Component>` and matches them against a [`ComponentType`], which
//! pairs the concrete [`TypeId`] with a readable name for logs and errors.

use std::any::{Any, TypeId};

/// Upcast helper so a `dyn Component` can be downcast to its concrete type.
///
/// Implemented for every `'static` type; hosts never implement it by hand.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Borrow as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The core component trait.
///
/// Any `'static` type can be a component. The only optional capability is
/// [`Component::cleanup`], called by
/// [`World::remove_component`](crate::World::remove_component) right before
/// the component is dropped from its entity. Components that hold nothing to
/// release keep the default, which does nothing.
///
/// # Examples
///
/// ```rust
/// use ecs_runtime::Component;
///
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {}
///
/// struct SceneNode {
///     attached: bool,
/// }
///
/// impl Component for SceneNode {
///     fn cleanup(&mut self) {
///         self.attached = false;
///     }
/// }
/// ```
pub trait Component: AsAny {
    /// Release whatever host resources this component holds.
    ///
    /// Invoked exactly once by a per-type removal. Bulk removal
    /// ([`World::delete_entity`](crate::World::delete_entity),
    /// [`World::clear_entity`](crate::World::clear_entity)) drops components
    /// without calling it.
    fn cleanup(&mut self) {}

    /// Human-readable type name, used in logs.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<'a> dyn Component + 'a {
    /// Returns the [`ComponentType`] of the concrete value behind this object.
    #[must_use]
    pub fn component_type(&self) -> ComponentType {
        ComponentType {
            id: self.as_any().type_id(),
            name: self.type_name(),
        }
    }

    /// Returns `true` if the concrete value is a `T`.
    #[must_use]
    pub fn is<T: Component>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcast to a concrete component type.
    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably downcast to a concrete component type.
    #[must_use]
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Runtime key identifying a concrete component type.
///
/// Equality and hashing use only the [`TypeId`]; the name is carried along
/// for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
}

impl ComponentType {
    /// The key for component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying [`TypeId`].
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The Rust type name of the component.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentType {}

impl std::hash::Hash for ComponentType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Build the initial component list for
/// [`World::create_entity`](crate::World::create_entity).
///
/// ```rust
/// use ecs_runtime::{Component, World, components};
///
/// struct Position(f32, f32, f32);
/// impl Component for Position {}
///
/// let mut world = World::new();
/// let e = world.create_entity(components![Position(0.0, 0.0, 5.0)]);
/// assert!(world.has::<Position>(e).unwrap());
/// ```
#[macro_export]
macro_rules! components {
    () => {
        ::std::vec::Vec::<::std::boxed::Box<dyn $crate::Component>>::new()
    };
    ($($component:expr),+ $(,)?) => {
        ::std::vec![$(::std::boxed::Box::new($component) as ::std::boxed::Box<dyn $crate::Component>),+]
    };
}
