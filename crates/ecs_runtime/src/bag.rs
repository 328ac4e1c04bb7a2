//! Per-entity component storage.
//!
//! A [`ComponentBag`] is an ordered list of type-erased components. Lookups
//! scan it front to back and act on the first component whose concrete type
//! matches, so the bag tolerates several components of one type without
//! enforcing uniqueness.

use crate::component::{Component, ComponentType};

/// The components currently attached to one entity.
#[derive(Default)]
pub struct ComponentBag {
    components: Vec<Box<dyn Component>>,
}

impl ComponentBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Append a component. No uniqueness check is made.
    pub fn push(&mut self, component: Box<dyn Component>) {
        self.components.push(component);
    }

    /// Index of the first component of type `ty`.
    fn position(&self, ty: ComponentType) -> Option<usize> {
        self.components
            .iter()
            .position(|c| c.component_type() == ty)
    }

    /// First component of type `ty`.
    #[must_use]
    pub fn get(&self, ty: ComponentType) -> Option<&dyn Component> {
        self.position(ty).map(|idx| self.components[idx].as_ref())
    }

    /// First component of type `ty`, mutably.
    #[must_use]
    pub fn get_mut(&mut self, ty: ComponentType) -> Option<&mut dyn Component> {
        let idx = self.position(ty)?;
        Some(self.components[idx].as_mut())
    }

    /// Detach the first component of type `ty`, keeping the order of the rest.
    pub fn take(&mut self, ty: ComponentType) -> Option<Box<dyn Component>> {
        let idx = self.position(ty)?;
        Some(self.components.remove(idx))
    }

    /// Returns `true` if at least one component of type `ty` is present.
    #[must_use]
    pub fn contains(&self, ty: ComponentType) -> bool {
        self.position(ty).is_some()
    }

    /// Returns `true` if every type in `types` is present. An empty list is
    /// trivially satisfied.
    #[must_use]
    pub fn contains_all(&self, types: &[ComponentType]) -> bool {
        types.iter().all(|ty| self.contains(*ty))
    }

    /// Drop every component without calling [`Component::cleanup`].
    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// Number of components in the bag, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if the bag holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component types in bag order.
    pub fn types(&self) -> impl Iterator<Item = ComponentType> + '_ {
        self.components.iter().map(|c| c.component_type())
    }
}

impl std::fmt::Debug for ComponentBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.components.iter().map(|c| c.type_name()))
            .finish()
    }
}

impl FromIterator<Box<dyn Component>> for ComponentBag {
    fn from_iter<I: IntoIterator<Item = Box<dyn Component>>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}
