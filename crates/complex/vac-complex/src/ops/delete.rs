//! Deletion: cascading hard delete and connectivity-preserving soft
//! delete.

use crate::cell::{CellKind, EdgeCell};
use crate::edit::Edit;
use crate::error::{OpError, OpResult};
use crate::ids::NodeId;
use crate::node::Node;
use crate::ops::ctx::OpCtx;
use crate::property::PropertyMap;
use vac_geom::Stroke;

/// The closure of nodes that must go when `node` goes: the node itself,
/// its group descendants, and everything whose boundary transitively
/// includes any of those cells.
fn delete_closure(ctx: &OpCtx<'_>, node: NodeId) -> Vec<NodeId> {
    let mut set = vec![node];
    set.extend(ctx.complex.descendants(node));
    let mut i = 0;
    while i < set.len() {
        let id = set[i];
        i += 1;
        for dep in ctx.complex.star_closure(id) {
            if !set.contains(&dep) {
                set.push(dep);
            }
        }
    }
    set
}

/// Order a delete set so that every removal happens with an empty star:
/// faces, then edges, then vertices, then groups deepest-first.
fn removal_order(ctx: &OpCtx<'_>, set: &[NodeId]) -> Vec<NodeId> {
    let mut ordered: Vec<NodeId> = set.to_vec();
    let rank = |id: NodeId| -> (u8, usize) {
        match ctx.complex.find(id) {
            Some(node) if node.is_group() => {
                // Deeper groups first so children detach before parents.
                let mut depth = 0usize;
                let mut cur = node.parent;
                while let Some(p) = cur {
                    depth += 1;
                    cur = ctx.complex.parent(p);
                }
                (3, usize::MAX - depth)
            }
            Some(node) => match node.as_cell().map(|c| c.kind.dimension()) {
                Some(2) => (0, 0),
                Some(1) => (1, 0),
                _ => (2, 0),
            },
            None => (4, 0),
        }
    };
    ordered.sort_by_key(|id| rank(*id));
    ordered
}

fn remove_all(ctx: &mut OpCtx<'_>, set: &[NodeId]) -> OpResult<()> {
    for id in removal_order(ctx, set) {
        let node = ctx.snapshot(id)?;
        let (parent, index) = ctx.position_of(id)?;
        ctx.apply(Edit::Remove {
            node,
            parent,
            index,
        })?;
    }
    Ok(())
}

/// Vertices outside `deleted` whose remaining star is empty once the
/// cascade lands.
fn orphaned_vertices(ctx: &OpCtx<'_>, deleted: &[NodeId]) -> Vec<NodeId> {
    let mut orphans = Vec::new();
    for id in deleted {
        for b in ctx.complex.boundary(*id) {
            if deleted.contains(&b) || orphans.contains(&b) {
                continue;
            }
            let is_vertex = ctx
                .complex
                .find(b)
                .and_then(Node::as_cell)
                .is_some_and(|c| matches!(c.kind, CellKind::Vertex(_)));
            if is_vertex
                && ctx
                    .complex
                    .star(b)
                    .iter()
                    .all(|s| deleted.contains(s))
            {
                orphans.push(b);
            }
        }
    }
    orphans
}

pub(crate) fn hard_delete(
    ctx: &mut OpCtx<'_>,
    node: NodeId,
    delete_isolated_vertices: bool,
) -> OpResult<()> {
    ctx.complex.get(node)?;
    if node == ctx.complex.root() {
        return Err(OpError::WrongKind {
            node,
            expected: "non-root node",
        });
    }
    let mut set = delete_closure(ctx, node);
    if delete_isolated_vertices {
        set.extend(orphaned_vertices(ctx, &set));
    }
    remove_all(ctx, &set)
}

/// Soft delete: preserve connectivity where possible. A vertex of degree
/// two (exactly two distinct incident open edges, neither a loop, and no
/// incident faces anywhere above) is dissolved by concatenating its two
/// edges into one replacement edge; anything else falls back to the hard
/// cascade.
pub(crate) fn soft_delete(
    ctx: &mut OpCtx<'_>,
    node: NodeId,
    delete_isolated_vertices: bool,
) -> OpResult<()> {
    ctx.complex.get(node)?;
    if let Some((e1, e2)) = dissolvable_vertex(ctx, node) {
        return dissolve_vertex(ctx, node, e1, e2);
    }
    hard_delete(ctx, node, delete_isolated_vertices)
}

/// The two incident open edges of a dissolvable degree-2 vertex.
fn dissolvable_vertex(ctx: &OpCtx<'_>, vertex: NodeId) -> Option<(NodeId, NodeId)> {
    let cell = ctx.complex.find(vertex).and_then(Node::as_cell)?;
    if !matches!(cell.kind, CellKind::Vertex(_)) {
        return None;
    }
    let star = ctx.complex.star(vertex);
    if star.len() != 2 || star[0] == star[1] {
        return None;
    }
    let (e1, e2) = (star[0], star[1]);
    for e in [e1, e2] {
        let edge = ctx
            .complex
            .find(e)
            .and_then(Node::as_cell)
            .and_then(|c| c.as_edge())?;
        let (a, b) = edge.ends?;
        if a == b {
            return None; // loop at the vertex
        }
        if !ctx.complex.star(e).is_empty() {
            return None; // a face uses this edge
        }
    }
    Some((e1, e2))
}

fn dissolve_vertex(ctx: &mut OpCtx<'_>, vertex: NodeId, e1: NodeId, e2: NodeId) -> OpResult<()> {
    // Orient e1 to end at the vertex and e2 to start at it.
    let oriented = |ctx: &OpCtx<'_>, edge: NodeId, into: bool| -> OpResult<(NodeId, bool)> {
        let (a, b) = ctx
            .oriented_ends(edge, true)?
            .ok_or(OpError::WrongKind {
                node: edge,
                expected: "open edge",
            })?;
        // `into`: we want the edge to end at `vertex`.
        if into {
            Ok((if b == vertex { a } else { b }, b == vertex))
        } else {
            Ok((if a == vertex { b } else { a }, a == vertex))
        }
    };
    let (far1, fwd1) = oriented(ctx, e1, true)?;
    let (far2, fwd2) = oriented(ctx, e2, false)?;

    let stroke_of = |ctx: &mut OpCtx<'_>, edge: NodeId, forward: bool| -> OpResult<Stroke> {
        let sampled = ctx.complex.edge_sampled(edge)?.clone();
        Ok(if forward { sampled } else { sampled.reversed() })
    };
    let s1 = stroke_of(ctx, e1, fwd1)?;
    let s2 = stroke_of(ctx, e2, fwd2)?;
    let joined = s1.concat(&s2);

    let mut properties = PropertyMap::new();
    for e in [e1, e2] {
        if let Some(cell) = ctx.complex.find(e).and_then(Node::as_cell) {
            properties.merge_from(&cell.properties);
        }
    }

    let time = ctx.complex.cell_time(e1)?;
    let (parent, index) = ctx.position_of(e1)?;

    // Remove the old pieces, then insert the replacement.
    for e in [e1, e2] {
        let node = ctx.snapshot(e)?;
        let (p, i) = ctx.position_of(e)?;
        ctx.apply(Edit::Remove {
            node,
            parent: p,
            index: i,
        })?;
    }
    let vnode = ctx.snapshot(vertex)?;
    let (vp, vi) = ctx.position_of(vertex)?;
    ctx.apply(Edit::Remove {
        node: vnode,
        parent: vp,
        index: vi,
    })?;

    let id = ctx.complex.alloc_id();
    let mut cell = crate::cell::CellData::new(
        time,
        CellKind::Edge(EdgeCell {
            ends: Some((far1, far2)),
            stroke: joined,
            sampled: None,
        }),
    );
    cell.properties = properties;
    let index = index.min(ctx.complex.children(parent)?.len());
    ctx.apply(Edit::Insert {
        node: Node::new_cell(id, parent, cell),
        parent,
        index,
    })?;
    Ok(())
}
