//! Change notifications: one batch per top-level operation.
//!
//! The source material broadcasts structural changes through an
//! observer/signal pattern; here each top-level call returns one `Diff`
//! instead, and readers treat its delivery as the barrier after which the
//! complex may be read again. Batches are cheap to merge so undo/redo of
//! a whole group still yields a single notification.

use crate::ids::NodeId;
use serde::{Deserialize, Serialize};

/// A node that changed parent (or sibling position) during the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reparented {
    pub node: NodeId,
    pub old_parent: NodeId,
    pub new_parent: NodeId,
}

/// Structural changes performed by one top-level operation (or one
/// undo/redo step). Consumed by document-sync/rendering collaborators to
/// update their shadow representation incrementally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    #[serde(default)]
    pub created: Vec<NodeId>,
    #[serde(default)]
    pub destroyed: Vec<NodeId>,
    #[serde(default)]
    pub reparented: Vec<Reparented>,
    /// Cells whose cached geometry was invalidated and will be lazily
    /// recomputed on the next query.
    #[serde(default)]
    pub geometry_dirty: Vec<NodeId>,
}

impl Diff {
    #[inline]
    pub fn clear(&mut self) {
        self.created.clear();
        self.destroyed.clear();
        self.reparented.clear();
        self.geometry_dirty.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
            && self.destroyed.is_empty()
            && self.reparented.is_empty()
            && self.geometry_dirty.is_empty()
    }

    pub fn record_created(&mut self, id: NodeId) {
        // A node destroyed and re-created within one batch nets out to
        // created-only; collaborators never see the intermediate state.
        self.destroyed.retain(|d| *d != id);
        if !self.created.contains(&id) {
            self.created.push(id);
        }
    }

    pub fn record_destroyed(&mut self, id: NodeId) {
        if self.created.contains(&id) {
            self.created.retain(|c| *c != id);
        } else if !self.destroyed.contains(&id) {
            self.destroyed.push(id);
        }
        self.geometry_dirty.retain(|g| *g != id);
        self.reparented.retain(|r| r.node != id);
    }

    pub fn record_reparented(&mut self, node: NodeId, old_parent: NodeId, new_parent: NodeId) {
        if let Some(existing) = self.reparented.iter_mut().find(|r| r.node == node) {
            existing.new_parent = new_parent;
        } else {
            self.reparented.push(Reparented {
                node,
                old_parent,
                new_parent,
            });
        }
    }

    pub fn record_geometry_dirty(&mut self, id: NodeId) {
        if !self.geometry_dirty.contains(&id) && !self.created.contains(&id) {
            self.geometry_dirty.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_destroy_nets_out() {
        let mut diff = Diff::default();
        diff.record_created(NodeId(1));
        diff.record_destroyed(NodeId(1));
        assert!(diff.created.is_empty());
        assert!(diff.destroyed.is_empty());
    }

    #[test]
    fn destroy_then_recreate_is_created_only() {
        let mut diff = Diff::default();
        diff.record_destroyed(NodeId(1));
        diff.record_created(NodeId(1));
        assert_eq!(diff.created, vec![NodeId(1)]);
        assert!(diff.destroyed.is_empty());
    }

    #[test]
    fn dirty_on_created_node_is_folded() {
        let mut diff = Diff::default();
        diff.record_created(NodeId(2));
        diff.record_geometry_dirty(NodeId(2));
        assert!(diff.geometry_dirty.is_empty());
    }

    #[test]
    fn serializes_round_trip() {
        let mut diff = Diff::default();
        diff.record_created(NodeId(3));
        diff.record_reparented(NodeId(4), NodeId(1), NodeId(2));
        let json = serde_json::to_string(&diff).unwrap();
        let back: Diff = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diff);
    }
}
