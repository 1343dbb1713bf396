//! Creation operations: groups, key vertices, key edges, key faces.

use crate::cell::{CellData, CellKind, Cycle, EdgeCell, FaceCell, VertexCell};
use crate::edit::Edit;
use crate::error::{OpError, OpResult};
use crate::ids::NodeId;
use crate::node::Node;
use crate::ops::ctx::OpCtx;
use crate::time::Time;
use vac_geom::{Point2, Stroke};

pub(crate) fn create_group(
    ctx: &mut OpCtx<'_>,
    parent: NodeId,
    next_sibling: Option<NodeId>,
) -> OpResult<NodeId> {
    ctx.expect_group(parent)?;
    let index = ctx.sibling_index(parent, next_sibling)?;
    let id = ctx.complex.alloc_id();
    ctx.apply(Edit::Insert {
        node: Node::new_group(id, Some(parent)),
        parent,
        index,
    })?;
    Ok(id)
}

pub(crate) fn create_key_vertex(
    ctx: &mut OpCtx<'_>,
    position: Point2,
    parent: NodeId,
    next_sibling: Option<NodeId>,
    time: Time,
) -> OpResult<NodeId> {
    ctx.expect_group(parent)?;
    let index = ctx.sibling_index(parent, next_sibling)?;
    let id = ctx.complex.alloc_id();
    ctx.apply(Edit::Insert {
        node: Node::new_cell(
            id,
            parent,
            CellData::new(time, CellKind::Vertex(VertexCell { position })),
        ),
        parent,
        index,
    })?;
    Ok(id)
}

pub(crate) fn create_key_open_edge(
    ctx: &mut OpCtx<'_>,
    start: NodeId,
    end: NodeId,
    stroke: Stroke,
    parent: NodeId,
    next_sibling: Option<NodeId>,
) -> OpResult<NodeId> {
    ctx.expect_group(parent)?;
    let index = ctx.sibling_index(parent, next_sibling)?;
    let t0 = ctx.expect_vertex(start)?;
    let t1 = ctx.expect_vertex(end)?;
    if t0 != t1 {
        return Err(OpError::WrongTime {
            node: end,
            expected: t0,
            actual: t1,
        });
    }
    let id = ctx.complex.alloc_id();
    ctx.apply(Edit::Insert {
        node: Node::new_cell(
            id,
            parent,
            CellData::new(
                t0,
                CellKind::Edge(EdgeCell {
                    ends: Some((start, end)),
                    stroke,
                    sampled: None,
                }),
            ),
        ),
        parent,
        index,
    })?;
    Ok(id)
}

pub(crate) fn create_key_closed_edge(
    ctx: &mut OpCtx<'_>,
    stroke: Stroke,
    parent: NodeId,
    next_sibling: Option<NodeId>,
    time: Time,
) -> OpResult<NodeId> {
    ctx.expect_group(parent)?;
    let index = ctx.sibling_index(parent, next_sibling)?;
    let id = ctx.complex.alloc_id();
    ctx.apply(Edit::Insert {
        node: Node::new_cell(
            id,
            parent,
            CellData::new(
                time,
                CellKind::Edge(EdgeCell {
                    ends: None,
                    stroke,
                    sampled: None,
                }),
            ),
        ),
        parent,
        index,
    })?;
    Ok(id)
}

pub(crate) fn create_key_face(
    ctx: &mut OpCtx<'_>,
    cycles: Vec<Cycle>,
    parent: NodeId,
    next_sibling: Option<NodeId>,
    time: Time,
) -> OpResult<NodeId> {
    ctx.expect_group(parent)?;
    let index = ctx.sibling_index(parent, next_sibling)?;
    for cycle in &cycles {
        validate_cycle(ctx, cycle, time)?;
    }
    let id = ctx.complex.alloc_id();
    ctx.apply(Edit::Insert {
        node: Node::new_cell(
            id,
            parent,
            CellData::new(time, CellKind::Face(FaceCell { cycles })),
        ),
        parent,
        index,
    })?;
    Ok(id)
}

/// A cycle is well-formed when every referenced cell exists at `time` and
/// the halfedge walk is a consistent closed chain. Closed edges stand
/// alone in their walk; open halfedges must link end-to-start and the
/// walk must return to its first vertex.
pub(crate) fn validate_cycle(ctx: &OpCtx<'_>, cycle: &Cycle, time: Time) -> OpResult<()> {
    match cycle {
        Cycle::Vertex(v) => {
            ctx.expect_vertex(*v)?;
            ctx.expect_cell_at(*v, time)?;
            Ok(())
        }
        Cycle::Halfedges(hes) => {
            if hes.is_empty() {
                return Err(OpError::MalformedCycle {
                    reason: "empty halfedge walk".to_string(),
                });
            }
            for he in hes {
                ctx.expect_edge(he.edge)?;
                ctx.expect_cell_at(he.edge, time)?;
            }
            let closed_count = hes
                .iter()
                .filter(|he| {
                    ctx.complex
                        .find(he.edge)
                        .and_then(|n| n.as_cell())
                        .and_then(|c| c.as_edge())
                        .is_some_and(EdgeCell::is_closed)
                })
                .count();
            if closed_count > 0 {
                if hes.len() != 1 {
                    return Err(OpError::MalformedCycle {
                        reason: "a closed edge must be the only halfedge of its cycle"
                            .to_string(),
                    });
                }
                return Ok(());
            }
            // Open-edge walk: consecutive halfedges share a vertex and the
            // walk closes on itself.
            let mut first_start = None;
            let mut prev_end: Option<NodeId> = None;
            for he in hes {
                let (start, end) = match ctx.oriented_ends(he.edge, he.forward)? {
                    Some(ends) => ends,
                    None => {
                        return Err(OpError::MalformedCycle {
                            reason: "closed edge mixed into an open walk".to_string(),
                        })
                    }
                };
                if first_start.is_none() {
                    first_start = Some(start);
                }
                if let Some(prev) = prev_end {
                    if prev != start {
                        return Err(OpError::MalformedCycle {
                            reason: format!(
                                "halfedge on {:?} starts at {start:?}, previous ends at {prev:?}",
                                he.edge
                            ),
                        });
                    }
                }
                prev_end = Some(end);
            }
            // A single open halfedge is accepted as a degenerate disc
            // boundary; longer walks must return to their first vertex.
            if hes.len() > 1 && first_start != prev_end {
                return Err(OpError::MalformedCycle {
                    reason: "halfedge walk does not close".to_string(),
                });
            }
            Ok(())
        }
    }
}
