//! Operation context: the mutation choke point plus shared validators.

use crate::cell::CellKind;
use crate::complex::Complex;
use crate::diff::Diff;
use crate::edit::Edit;
use crate::error::{OpError, OpResult};
use crate::ids::NodeId;
use crate::node::Node;
use crate::time::Time;

/// Borrows everything one operation needs: the complex, the edit log of
/// the surrounding history group, and the notification batch under
/// construction.
pub(crate) struct OpCtx<'a> {
    pub complex: &'a mut Complex,
    pub edits: &'a mut Vec<Edit>,
    pub diff: &'a mut Diff,
}

impl OpCtx<'_> {
    /// Apply one primitive edit and record it for history.
    pub fn apply(&mut self, edit: Edit) -> OpResult<()> {
        edit.apply(self.complex, self.diff)?;
        self.edits.push(edit);
        Ok(())
    }

    /// Insertion index for a new child of `parent`, honoring the optional
    /// `next_sibling` (insert before it; append when `None`).
    pub fn sibling_index(
        &self,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> OpResult<usize> {
        let children = self.complex.children(parent)?;
        match next_sibling {
            None => Ok(children.len()),
            Some(sib) => children
                .iter()
                .position(|c| *c == sib)
                .ok_or(OpError::NotAChild {
                    child: sib,
                    parent,
                }),
        }
    }

    pub fn expect_group(&self, id: NodeId) -> OpResult<()> {
        if self.complex.get(id)?.is_group() {
            Ok(())
        } else {
            Err(OpError::WrongKind {
                node: id,
                expected: "group",
            })
        }
    }

    pub fn expect_vertex(&self, id: NodeId) -> OpResult<Time> {
        let cell = self.complex.get(id)?.as_cell().ok_or(OpError::WrongKind {
            node: id,
            expected: "vertex",
        })?;
        match cell.kind {
            CellKind::Vertex(_) => Ok(cell.time),
            _ => Err(OpError::WrongKind {
                node: id,
                expected: "vertex",
            }),
        }
    }

    pub fn expect_edge(&self, id: NodeId) -> OpResult<Time> {
        let cell = self.complex.get(id)?.as_cell().ok_or(OpError::WrongKind {
            node: id,
            expected: "edge",
        })?;
        match cell.kind {
            CellKind::Edge(_) => Ok(cell.time),
            _ => Err(OpError::WrongKind {
                node: id,
                expected: "edge",
            }),
        }
    }

    pub fn expect_cell_at(&self, id: NodeId, time: Time) -> OpResult<()> {
        let actual = self.complex.cell_time(id)?;
        if actual != time {
            return Err(OpError::WrongTime {
                node: id,
                expected: time,
                actual,
            });
        }
        Ok(())
    }

    /// Oriented endpoints of an open edge: `(start, end)` when traversed
    /// `forward`, swapped otherwise. `None` for closed edges.
    pub fn oriented_ends(
        &self,
        edge: NodeId,
        forward: bool,
    ) -> OpResult<Option<(NodeId, NodeId)>> {
        let cell = self
            .complex
            .get(edge)?
            .as_cell()
            .and_then(|c| c.as_edge())
            .ok_or(OpError::WrongKind {
                node: edge,
                expected: "edge",
            })?;
        Ok(cell.ends.map(|(a, b)| if forward { (a, b) } else { (b, a) }))
    }

    /// Snapshot a live node for a `Remove` edit.
    pub fn snapshot(&self, id: NodeId) -> OpResult<Node> {
        Ok(self.complex.get(id)?.clone())
    }

    /// Parent and sibling index of a live node (root has neither).
    pub fn position_of(&self, id: NodeId) -> OpResult<(NodeId, usize)> {
        let parent = self
            .complex
            .parent(id)
            .ok_or(OpError::MissingNode(id))?;
        let index = self
            .complex
            .children(parent)?
            .iter()
            .position(|c| *c == id)
            .ok_or(OpError::NotAChild { child: id, parent })?;
        Ok((parent, index))
    }
}
