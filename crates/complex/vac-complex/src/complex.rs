//! The complex: exclusive owner of every node.
//!
//! Boundary and star form a cyclic reference graph, so nodes refer to each
//! other by `NodeId` through the arena table here rather than by owning
//! references. Everything a collaborator holds is an id to be revalidated
//! with `find`; destroying the complex destroys all nodes.

use crate::cell::{CellData, CellKind};
use crate::error::{OpError, OpResult};
use crate::ids::{NodeId, NodeIdAllocator};
use crate::node::{Node, NodeData};
use crate::time::Time;
use hashbrown::HashMap;
use vac_geom::{Point2, Stroke};

#[derive(Debug)]
pub struct Complex {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    ids: NodeIdAllocator,
}

impl Default for Complex {
    fn default() -> Self {
        Self::new()
    }
}

impl Complex {
    /// A fresh complex containing only its root group.
    pub fn new() -> Self {
        let mut ids = NodeIdAllocator::new();
        let root = ids.alloc();
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new_group(root, None));
        Self { nodes, root, ids }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub(crate) fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Look up a node or fail with the missing-node precondition error.
    pub fn get(&self, id: NodeId) -> OpResult<&Node> {
        self.nodes.get(&id).ok_or(OpError::MissingNode(id))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> OpResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(OpError::MissingNode(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root group always exists.
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (NodeId, &CellData)> {
        self.nodes.values().filter_map(|n| match &n.data {
            NodeData::Cell(c) => Some((n.id, c)),
            NodeData::Group(_) => None,
        })
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, group: NodeId) -> OpResult<&[NodeId]> {
        let node = self.get(group)?;
        node.as_group()
            .map(|g| g.children.as_slice())
            .ok_or(OpError::WrongKind {
                node: group,
                expected: "group",
            })
    }

    /// Is `ancestor` on the parent chain of `node` (inclusive)?
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    /// All nodes under `group`, depth-first, excluding `group` itself.
    pub fn descendants(&self, group: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.find(group).and_then(Node::as_group) {
            Some(g) => g.children.iter().rev().copied().collect(),
            None => Vec::new(),
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(g) = self.find(id).and_then(Node::as_group) {
                stack.extend(g.children.iter().rev().copied());
            }
        }
        out
    }

    // ----- boundary / star ---------------------------------------------

    /// Direct boundary of a cell (empty for groups and vertices).
    pub fn boundary(&self, id: NodeId) -> Vec<NodeId> {
        self.find(id)
            .and_then(Node::as_cell)
            .map(CellData::boundary)
            .unwrap_or_default()
    }

    /// Direct star of a cell: cells whose boundary contains `id`.
    pub fn star(&self, id: NodeId) -> &[NodeId] {
        self.find(id)
            .and_then(Node::as_cell)
            .map(|c| c.star.as_slice())
            .unwrap_or(&[])
    }

    /// Transitive star: every cell that depends on `id` directly or
    /// through intermediate cells (edges before the faces above them).
    pub fn star_closure(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut queue: Vec<NodeId> = self.star(id).to_vec();
        while let Some(dep) = queue.pop() {
            if out.contains(&dep) {
                continue;
            }
            out.push(dep);
            queue.extend(self.star(dep).iter().copied());
        }
        out
    }

    // ----- cell accessors ----------------------------------------------

    pub fn cell_time(&self, id: NodeId) -> OpResult<Time> {
        self.get(id)?
            .as_cell()
            .map(|c| c.time)
            .ok_or(OpError::WrongKind {
                node: id,
                expected: "cell",
            })
    }

    pub fn vertex_position(&self, id: NodeId) -> OpResult<Point2> {
        let cell = self.get(id)?.as_cell().ok_or(OpError::WrongKind {
            node: id,
            expected: "vertex",
        })?;
        cell.as_vertex()
            .map(|v| v.position)
            .ok_or(OpError::WrongKind {
                node: id,
                expected: "vertex",
            })
    }

    /// Current sampled geometry of an edge.
    ///
    /// Lazy: the cache is rebuilt here (never at edit time) when the dirty
    /// flag is set. Open edges are re-anchored to the current positions of
    /// their end vertices, so a vertex drag deforms every incident edge.
    pub fn edge_sampled(&mut self, edge: NodeId) -> OpResult<&Stroke> {
        // Phase 1: read-only checks and endpoint snapshot.
        let (dirty, ends) = {
            let cell = self.get(edge)?.as_cell().ok_or(OpError::WrongKind {
                node: edge,
                expected: "edge",
            })?;
            let e = cell.as_edge().ok_or(OpError::WrongKind {
                node: edge,
                expected: "edge",
            })?;
            (cell.dirty || e.sampled.is_none(), e.ends)
        };
        let anchors = match ends {
            Some((a, b)) => Some((self.vertex_position(a)?, self.vertex_position(b)?)),
            None => None,
        };
        // Phase 2: rebuild the cache if needed.
        let cell = self
            .nodes
            .get_mut(&edge)
            .and_then(Node::as_cell_mut)
            .ok_or(OpError::MissingNode(edge))?;
        if dirty {
            let stroke = match &cell.kind {
                CellKind::Edge(e) => match anchors {
                    Some((start, end)) => e.stroke.snapped(start, end),
                    None => e.stroke.clone(),
                },
                _ => return Err(OpError::MissingNode(edge)),
            };
            if let CellKind::Edge(e) = &mut cell.kind {
                e.sampled = Some(stroke);
            }
            cell.dirty = false;
        }
        match &cell.kind {
            CellKind::Edge(e) => Ok(e.sampled.as_ref().unwrap_or(&e.stroke)),
            _ => Err(OpError::MissingNode(edge)),
        }
    }

    // ----- mutation plumbing (crate-internal, used by edit application) --

    pub(crate) fn alloc_id(&mut self) -> NodeId {
        self.ids.alloc()
    }

    /// Insert a fully-built node under `parent` at `index`, registering it
    /// in the star of every boundary cell. Fails on id collision.
    pub(crate) fn attach(&mut self, node: Node, parent: NodeId, index: usize) -> OpResult<()> {
        let id = node.id;
        if self.nodes.contains_key(&id) {
            return Err(OpError::IdCollision(id));
        }
        let boundary = node.as_cell().map(CellData::boundary).unwrap_or_default();
        self.ids.bump_past(id);
        self.nodes.insert(id, node);
        {
            let group = self.get_mut(parent)?.as_group_mut().ok_or(OpError::WrongKind {
                node: parent,
                expected: "group",
            })?;
            let index = index.min(group.children.len());
            group.children.insert(index, id);
        }
        for b in boundary {
            self.add_to_star(b, id);
        }
        Ok(())
    }

    /// Remove a node, unregistering it from the stars of its boundary.
    /// The caller guarantees the node's own star is already empty.
    pub(crate) fn detach(&mut self, id: NodeId) -> OpResult<(Node, NodeId, usize)> {
        let parent = self
            .get(id)?
            .parent
            .ok_or(OpError::MissingNode(id))?;
        let index = self
            .children(parent)?
            .iter()
            .position(|c| *c == id)
            .ok_or(OpError::NotAChild { child: id, parent })?;
        let boundary = self.boundary(id);
        for b in boundary {
            self.remove_from_star(b, id);
        }
        if let Some(group) = self.get_mut(parent)?.as_group_mut() {
            group.children.remove(index);
        }
        let node = self
            .nodes
            .remove(&id)
            .ok_or(OpError::MissingNode(id))?;
        Ok((node, parent, index))
    }

    pub(crate) fn add_to_star(&mut self, of: NodeId, dependent: NodeId) {
        if let Some(cell) = self.nodes.get_mut(&of).and_then(Node::as_cell_mut) {
            if !cell.star.contains(&dependent) {
                cell.star.push(dependent);
            }
        }
    }

    pub(crate) fn remove_from_star(&mut self, of: NodeId, dependent: NodeId) {
        if let Some(cell) = self.nodes.get_mut(&of).and_then(Node::as_cell_mut) {
            cell.star.retain(|s| *s != dependent);
        }
    }

    /// Set the dirty flag on `id` and everything in its star closure.
    /// Returns the ids newly marked, in propagation order.
    pub(crate) fn mark_dirty(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut marked = Vec::new();
        let mut queue = vec![id];
        while let Some(cur) = queue.pop() {
            if marked.contains(&cur) {
                continue;
            }
            if let Some(cell) = self.nodes.get_mut(&cur).and_then(Node::as_cell_mut) {
                cell.dirty = true;
                if let CellKind::Edge(e) = &mut cell.kind {
                    e.sampled = None;
                }
                marked.push(cur);
                queue.extend(cell.star.iter().copied());
            }
        }
        marked
    }

    // ----- invariants ---------------------------------------------------

    /// Check the structural invariants; used by tests after every
    /// operation. Returns a description of the first violation found.
    pub fn debug_validate(&self) -> Result<(), String> {
        // Rooted, acyclic parent chains; table <-> reachability.
        let mut reachable = vec![self.root];
        let mut i = 0;
        while i < reachable.len() {
            let id = reachable[i];
            i += 1;
            let node = self
                .find(id)
                .ok_or_else(|| format!("child {id:?} missing from table"))?;
            if let Some(g) = node.as_group() {
                for c in &g.children {
                    let child = self
                        .find(*c)
                        .ok_or_else(|| format!("child {c:?} missing from table"))?;
                    if child.parent != Some(id) {
                        return Err(format!("child {c:?} has wrong parent"));
                    }
                    if reachable.contains(c) {
                        return Err(format!("parent cycle through {c:?}"));
                    }
                    reachable.push(*c);
                }
            }
        }
        if reachable.len() != self.nodes.len() {
            return Err(format!(
                "{} nodes in table, {} reachable from root",
                self.nodes.len(),
                reachable.len()
            ));
        }
        // Boundary/star duality and no dangling references.
        for (id, cell) in self.iter_cells() {
            for b in cell.boundary() {
                let other = self
                    .find(b)
                    .ok_or_else(|| format!("{id:?} has dangling boundary {b:?}"))?;
                let star = other
                    .as_cell()
                    .ok_or_else(|| format!("{id:?} boundary {b:?} is not a cell"))?
                    .star
                    .clone();
                if !star.contains(&id) {
                    return Err(format!("{b:?} star is missing {id:?}"));
                }
            }
            for s in &cell.star {
                let deps = self
                    .find(*s)
                    .and_then(Node::as_cell)
                    .map(CellData::boundary)
                    .ok_or_else(|| format!("{id:?} has dangling star entry {s:?}"))?;
                if !deps.contains(&id) {
                    return Err(format!("{s:?} boundary is missing {id:?}"));
                }
            }
        }
        Ok(())
    }
}
