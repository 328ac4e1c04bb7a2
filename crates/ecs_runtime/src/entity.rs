//! Entity identifiers and their allocator.
//!
//! An [`Entity`] is a `u64` key with no data of its own. The
//! [`EntityAllocator`] hands out keys from an increasing counter and never
//! reuses one.

use std::cell::Cell;
use std::rc::Rc;

/// A unique entity identifier.
///
/// Components attached through the [`World`](crate::World) give it meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates increasing entity ids, starting at 1.
///
/// Each `EntityAllocator::new()` owns an independent counter. Cloning an
/// allocator shares the counter, so worlds built from clones of one
/// allocator never hand out the same id. Like the rest of the runtime it is
/// single-threaded.
#[derive(Debug, Clone)]
pub struct EntityAllocator {
    next_id: Rc<Cell<u64>>,
}

impl EntityAllocator {
    /// Creates an allocator with a fresh counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: Rc::new(Cell::new(1)),
        }
    }

    /// Allocates a fresh entity id.
    pub fn allocate(&self) -> Entity {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Entity(id)
    }

    /// Number of ids handed out so far by every clone sharing this counter.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id.get() - 1
    }

    /// Returns `true` if `other` draws from the same counter.
    #[must_use]
    pub fn shares_counter_with(&self, other: &EntityAllocator) -> bool {
        Rc::ptr_eq(&self.next_id, &other.next_id)
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_starts_at_one_and_counts() {
        let alloc = EntityAllocator::new();
        let ids: Vec<u64> = (0..3).map(|_| alloc.allocate().id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(alloc.count(), 3);
    }

    #[test]
    fn test_independent_allocators_restart() {
        let a = EntityAllocator::new();
        let b = EntityAllocator::new();
        assert_eq!(a.allocate(), b.allocate());
        assert!(!a.shares_counter_with(&b));
    }

    #[test]
    fn test_cloned_allocator_shares_counter() {
        let a = EntityAllocator::new();
        let b = a.clone();
        let e1 = a.allocate();
        let e2 = b.allocate();
        assert!(e2 > e1);
        assert_eq!(b.count(), 2);
        assert!(a.shares_counter_with(&b));
    }

    #[test]
    fn test_entity_display() {
        let alloc = EntityAllocator::new();
        alloc.allocate();
        assert_eq!(alloc.allocate().to_string(), "Entity(2)");
    }
}
