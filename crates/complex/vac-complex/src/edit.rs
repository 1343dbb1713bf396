//! Primitive reversible edits.
//!
//! Every structural change to a complex is expressed as an `Edit`, applied
//! through [`Edit::apply`]. Operations record the edits they apply into
//! the open history group; undo replays `inverted()` edits in reverse
//! order, redo replays them forward. Because application is the single
//! mutation channel, star caches and dirty propagation stay consistent no
//! matter which direction history is moving.

use crate::cell::{CellKind, Cycle};
use crate::complex::Complex;
use crate::diff::Diff;
use crate::error::{OpError, OpResult};
use crate::ids::NodeId;
use crate::node::Node;
use vac_geom::{Point2, Stroke};

#[derive(Clone, Debug)]
pub(crate) enum Edit {
    /// Insert a fully-built node under `parent` at `index`.
    Insert {
        node: Node,
        parent: NodeId,
        index: usize,
    },
    /// Remove a node whose star is already empty. `node` carries the
    /// payload snapshot so the inverse insert restores identical state.
    Remove {
        node: Node,
        parent: NodeId,
        index: usize,
    },
    /// Move a node between (or within) groups. `to.1` is the insertion
    /// index in the list as it stands after the removal.
    Reparent {
        node: NodeId,
        from: (NodeId, usize),
        to: (NodeId, usize),
    },
    SetVertexPosition {
        node: NodeId,
        from: Point2,
        to: Point2,
    },
    SetEdgeStroke {
        node: NodeId,
        from: Stroke,
        to: Stroke,
    },
    /// Rewire an edge's end vertices (glue).
    SetEdgeEnds {
        node: NodeId,
        from: Option<(NodeId, NodeId)>,
        to: Option<(NodeId, NodeId)>,
    },
    /// Rewrite a face's boundary cycles (cut, glue).
    SetFaceCycles {
        node: NodeId,
        from: Vec<Cycle>,
        to: Vec<Cycle>,
    },
}

impl Edit {
    /// The exact inverse edit.
    pub(crate) fn inverted(&self) -> Edit {
        match self {
            Edit::Insert {
                node,
                parent,
                index,
            } => Edit::Remove {
                node: node.clone(),
                parent: *parent,
                index: *index,
            },
            Edit::Remove {
                node,
                parent,
                index,
            } => Edit::Insert {
                node: node.clone(),
                parent: *parent,
                index: *index,
            },
            Edit::Reparent { node, from, to } => Edit::Reparent {
                node: *node,
                from: *to,
                to: *from,
            },
            Edit::SetVertexPosition { node, from, to } => Edit::SetVertexPosition {
                node: *node,
                from: *to,
                to: *from,
            },
            Edit::SetEdgeStroke { node, from, to } => Edit::SetEdgeStroke {
                node: *node,
                from: to.clone(),
                to: from.clone(),
            },
            Edit::SetEdgeEnds { node, from, to } => Edit::SetEdgeEnds {
                node: *node,
                from: *to,
                to: *from,
            },
            Edit::SetFaceCycles { node, from, to } => Edit::SetFaceCycles {
                node: *node,
                from: to.clone(),
                to: from.clone(),
            },
        }
    }

    /// Apply to the complex, recording the structural change into `diff`.
    pub(crate) fn apply(&self, complex: &mut Complex, diff: &mut Diff) -> OpResult<()> {
        match self {
            Edit::Insert {
                node,
                parent,
                index,
            } => {
                complex.attach(node.clone(), *parent, *index)?;
                diff.record_created(node.id);
            }
            Edit::Remove { node, .. } => {
                let id = node.id;
                debug_assert!(
                    complex.star(id).is_empty(),
                    "removing a cell with a non-empty star"
                );
                complex.detach(id)?;
                diff.record_destroyed(id);
            }
            Edit::Reparent { node, from, to } => {
                // Validate the stored indices against the live tree before
                // touching either child list.
                {
                    let children = complex.children(from.0)?;
                    if children.get(from.1) != Some(node) {
                        return Err(OpError::NotAChild {
                            child: *node,
                            parent: from.0,
                        });
                    }
                }
                complex.children(to.0)?;
                if let Some(group) = complex.get_mut(from.0)?.as_group_mut() {
                    group.children.remove(from.1);
                }
                if let Some(group) = complex.get_mut(to.0)?.as_group_mut() {
                    let index = to.1.min(group.children.len());
                    group.children.insert(index, *node);
                }
                complex.get_mut(*node)?.parent = Some(to.0);
                diff.record_reparented(*node, from.0, to.0);
            }
            Edit::SetVertexPosition { node, to, .. } => {
                let cell = complex
                    .get_mut(*node)?
                    .as_cell_mut()
                    .ok_or(OpError::WrongKind {
                        node: *node,
                        expected: "vertex",
                    })?;
                match &mut cell.kind {
                    CellKind::Vertex(v) => v.position = *to,
                    _ => {
                        return Err(OpError::WrongKind {
                            node: *node,
                            expected: "vertex",
                        })
                    }
                }
                cell.properties.notify_geometry_change();
                for marked in complex.mark_dirty(*node) {
                    diff.record_geometry_dirty(marked);
                }
            }
            Edit::SetEdgeStroke { node, to, .. } => {
                let cell = complex
                    .get_mut(*node)?
                    .as_cell_mut()
                    .ok_or(OpError::WrongKind {
                        node: *node,
                        expected: "edge",
                    })?;
                match &mut cell.kind {
                    CellKind::Edge(e) => {
                        e.stroke = to.clone();
                        e.sampled = None;
                    }
                    _ => {
                        return Err(OpError::WrongKind {
                            node: *node,
                            expected: "edge",
                        })
                    }
                }
                cell.properties.notify_geometry_change();
                for marked in complex.mark_dirty(*node) {
                    diff.record_geometry_dirty(marked);
                }
            }
            Edit::SetEdgeEnds { node, from, to } => {
                {
                    let cell = complex
                        .get_mut(*node)?
                        .as_cell_mut()
                        .ok_or(OpError::WrongKind {
                            node: *node,
                            expected: "edge",
                        })?;
                    match &mut cell.kind {
                        CellKind::Edge(e) => e.ends = *to,
                        _ => {
                            return Err(OpError::WrongKind {
                                node: *node,
                                expected: "edge",
                            })
                        }
                    }
                }
                if let Some((a, b)) = from {
                    complex.remove_from_star(*a, *node);
                    complex.remove_from_star(*b, *node);
                }
                if let Some((a, b)) = to {
                    complex.add_to_star(*a, *node);
                    complex.add_to_star(*b, *node);
                }
                for marked in complex.mark_dirty(*node) {
                    diff.record_geometry_dirty(marked);
                }
            }
            Edit::SetFaceCycles { node, from, to } => {
                let old: Vec<NodeId> = from.iter().flat_map(Cycle::referenced_cells).collect();
                let new: Vec<NodeId> = to.iter().flat_map(Cycle::referenced_cells).collect();
                {
                    let cell = complex
                        .get_mut(*node)?
                        .as_cell_mut()
                        .ok_or(OpError::WrongKind {
                            node: *node,
                            expected: "face",
                        })?;
                    match &mut cell.kind {
                        CellKind::Face(f) => f.cycles = to.clone(),
                        _ => {
                            return Err(OpError::WrongKind {
                                node: *node,
                                expected: "face",
                            })
                        }
                    }
                }
                for id in old {
                    if !new.contains(&id) {
                        complex.remove_from_star(id, *node);
                    }
                }
                for id in new {
                    complex.add_to_star(id, *node);
                }
                for marked in complex.mark_dirty(*node) {
                    diff.record_geometry_dirty(marked);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellData, VertexCell};
    use crate::time::Time;

    #[test]
    fn insert_then_inverse_restores_table() {
        let mut complex = Complex::new();
        let mut diff = Diff::default();
        let root = complex.root();
        let id = complex.alloc_id();
        let node = Node::new_cell(
            id,
            root,
            CellData::new(
                Time(0),
                CellKind::Vertex(VertexCell {
                    position: Point2::new(1.0, 2.0),
                }),
            ),
        );
        let edit = Edit::Insert {
            node,
            parent: root,
            index: 0,
        };
        edit.apply(&mut complex, &mut diff).unwrap();
        assert!(complex.contains(id));
        assert_eq!(diff.created, vec![id]);

        let mut diff2 = Diff::default();
        edit.inverted().apply(&mut complex, &mut diff2).unwrap();
        assert!(!complex.contains(id));
        assert_eq!(diff2.destroyed, vec![id]);
        complex.debug_validate().unwrap();
    }

    #[test]
    fn reparent_is_exactly_invertible() {
        let mut complex = Complex::new();
        let mut diff = Diff::default();
        let root = complex.root();
        let a = complex.alloc_id();
        let b = complex.alloc_id();
        for (i, id) in [a, b].into_iter().enumerate() {
            Edit::Insert {
                node: Node::new_group(id, Some(root)),
                parent: root,
                index: i,
            }
            .apply(&mut complex, &mut diff)
            .unwrap();
        }
        let edit = Edit::Reparent {
            node: a,
            from: (root, 0),
            to: (b, 0),
        };
        edit.apply(&mut complex, &mut diff).unwrap();
        assert_eq!(complex.parent(a), Some(b));
        edit.inverted().apply(&mut complex, &mut diff).unwrap();
        assert_eq!(complex.parent(a), Some(root));
        assert_eq!(complex.children(root).unwrap(), &[a, b]);
        complex.debug_validate().unwrap();
    }
}
