//! Geometry edits and reparenting.

use crate::cell::CellKind;
use crate::edit::Edit;
use crate::error::{OpError, OpResult};
use crate::ids::NodeId;
use crate::ops::ctx::OpCtx;
use vac_geom::{Point2, Stroke};

/// Move a key vertex. A no-op when the position is unchanged; otherwise
/// every cell in the vertex's transitive star goes geometry-dirty and is
/// resampled lazily on its next query.
pub(crate) fn set_key_vertex_position(
    ctx: &mut OpCtx<'_>,
    vertex: NodeId,
    position: Point2,
) -> OpResult<()> {
    ctx.expect_vertex(vertex)?;
    let from = ctx.complex.vertex_position(vertex)?;
    if from == position {
        return Ok(());
    }
    ctx.apply(Edit::SetVertexPosition {
        node: vertex,
        from,
        to: position,
    })
}

/// Replace a key edge's authored stroke. For open edges the stroke is
/// re-anchored to the current vertex positions at sampling time, so the
/// authored endpoints need not match exactly.
pub(crate) fn set_key_edge_geometry(
    ctx: &mut OpCtx<'_>,
    edge: NodeId,
    stroke: Stroke,
) -> OpResult<()> {
    ctx.expect_edge(edge)?;
    let from = match &ctx
        .complex
        .get(edge)?
        .as_cell()
        .ok_or(OpError::WrongKind {
            node: edge,
            expected: "edge",
        })?
        .kind
    {
        CellKind::Edge(e) => e.stroke.clone(),
        _ => {
            return Err(OpError::WrongKind {
                node: edge,
                expected: "edge",
            })
        }
    };
    if from == stroke {
        return Ok(());
    }
    ctx.apply(Edit::SetEdgeStroke {
        node: edge,
        from,
        to: stroke,
    })
}

/// Reparent without touching boundary relations.
pub(crate) fn move_to_group(
    ctx: &mut OpCtx<'_>,
    node: NodeId,
    new_parent: NodeId,
    next_sibling: Option<NodeId>,
) -> OpResult<()> {
    ctx.complex.get(node)?;
    ctx.expect_group(new_parent)?;
    if ctx.complex.is_ancestor(node, new_parent) {
        return Err(OpError::WouldCycle {
            node,
            target: new_parent,
        });
    }
    let (old_parent, old_index) = ctx.position_of(node)?;
    let mut new_index = ctx.sibling_index(new_parent, next_sibling)?;
    if new_parent == old_parent {
        if new_index == old_index || new_index == old_index + 1 {
            return Ok(()); // already in place
        }
        // Index in the post-removal list.
        if new_index > old_index {
            new_index -= 1;
        }
    }
    ctx.apply(Edit::Reparent {
        node,
        from: (old_parent, old_index),
        to: (new_parent, new_index),
    })
}
