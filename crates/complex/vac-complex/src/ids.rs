//! Node identifiers and their allocator.

use serde::{Deserialize, Serialize};

/// Opaque handle to a node (group or cell) in a complex.
///
/// Ids are the only stable reference collaborators may hold across edits:
/// the node behind an id can be destroyed (including by undo) and later
/// resurrected by redo under the same id, but a given id is never handed
/// out twice by the allocator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Monotonic id allocator, owned by the complex that uses it.
///
/// Deliberately not a process-wide singleton: independent complexes (side
/// documents, tests) each carry their own allocator and never contend.
/// `bump_past` keeps the high-water mark ahead of explicitly re-inserted
/// ids so redo can never cause a future collision.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct NodeIdAllocator {
    next: u64,
}

impl NodeIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Ensure future allocations are strictly greater than `id`.
    #[inline]
    pub fn bump_past(&mut self, id: NodeId) {
        if id.0 >= self.next {
            self.next = id.0 + 1;
        }
    }
}
