//! Glue: identify halfedges (or vertices) as one topological cell.
//!
//! Gluing creates fresh replacement cells and retires the originals, so
//! the history record stays a plain insert/remove sequence. Every face,
//! edge and vertex that referenced an original is rewritten to reference
//! the replacement; star caches follow automatically because rewrites go
//! through the primitive edits.

use crate::cell::{CellData, CellKind, Cycle, EdgeCell, HalfEdge, VertexCell};
use crate::edit::Edit;
use crate::error::{OpError, OpResult};
use crate::ids::NodeId;
use crate::node::Node;
use crate::ops::ctx::OpCtx;
use crate::property::PropertyMap;
use crate::time::Time;
use vac_geom::{Point2, Stroke};

fn common_time(ctx: &OpCtx<'_>, cells: &[NodeId]) -> OpResult<Time> {
    let mut iter = cells.iter();
    let first = *iter.next().ok_or(OpError::IncompatibleGlue {
        reason: "nothing to glue".to_string(),
    })?;
    let t = ctx.complex.cell_time(first)?;
    for &c in iter {
        let tc = ctx.complex.cell_time(c)?;
        if tc != t {
            return Err(OpError::WrongTime {
                node: c,
                expected: t,
                actual: tc,
            });
        }
    }
    Ok(t)
}

fn merged_properties(ctx: &OpCtx<'_>, cells: &[NodeId]) -> PropertyMap {
    let mut props = PropertyMap::new();
    for &c in cells {
        if let Some(cell) = ctx.complex.find(c).and_then(Node::as_cell) {
            props.merge_from(&cell.properties);
        }
    }
    props
}

fn centroid(ctx: &OpCtx<'_>, vertices: &[NodeId]) -> OpResult<Point2> {
    let mut acc = Point2::ZERO;
    for &v in vertices {
        acc = acc + ctx.complex.vertex_position(v)?;
    }
    Ok(acc * (1.0 / vertices.len().max(1) as f64))
}

/// Rewire every non-glued edge and every face cycle that references one
/// of `old_vertices`, mapping those references to `replacement`.
fn rewire_vertex_references(
    ctx: &mut OpCtx<'_>,
    old_vertices: &[NodeId],
    replacement: NodeId,
    skip_edges: &[NodeId],
) -> OpResult<()> {
    let map = |id: NodeId| -> NodeId {
        if old_vertices.contains(&id) {
            replacement
        } else {
            id
        }
    };
    let mut edges = Vec::new();
    let mut faces = Vec::new();
    for &v in old_vertices {
        for &dep in ctx.complex.star(v) {
            let node = match ctx.complex.find(dep) {
                Some(n) => n,
                None => continue,
            };
            match node.as_cell().map(|c| &c.kind) {
                Some(CellKind::Edge(_)) if !skip_edges.contains(&dep) => {
                    if !edges.contains(&dep) {
                        edges.push(dep);
                    }
                }
                Some(CellKind::Face(_)) => {
                    if !faces.contains(&dep) {
                        faces.push(dep);
                    }
                }
                _ => {}
            }
        }
    }
    for edge in edges {
        let from = ctx
            .complex
            .get(edge)?
            .as_cell()
            .and_then(|c| c.as_edge())
            .map(|e| e.ends)
            .ok_or(OpError::MissingNode(edge))?;
        let to = from.map(|(a, b)| (map(a), map(b)));
        if from != to {
            ctx.apply(Edit::SetEdgeEnds {
                node: edge,
                from,
                to,
            })?;
        }
    }
    for face in faces {
        let from = match ctx.complex.get(face)?.as_cell().and_then(|c| c.as_face()) {
            Some(f) => f.cycles.clone(),
            None => continue,
        };
        let to: Vec<Cycle> = from
            .iter()
            .map(|cycle| match cycle {
                Cycle::Vertex(v) => Cycle::Vertex(map(*v)),
                Cycle::Halfedges(hes) => Cycle::Halfedges(hes.clone()),
            })
            .collect();
        if from != to {
            ctx.apply(Edit::SetFaceCycles {
                node: face,
                from,
                to,
            })?;
        }
    }
    Ok(())
}

fn remove_node(ctx: &mut OpCtx<'_>, id: NodeId) -> OpResult<()> {
    let node = ctx.snapshot(id)?;
    let (parent, index) = ctx.position_of(id)?;
    ctx.apply(Edit::Remove {
        node,
        parent,
        index,
    })
}

/// Merge several key vertices into one new vertex at their centroid.
pub(crate) fn glue_key_vertices(ctx: &mut OpCtx<'_>, vertices: &[NodeId]) -> OpResult<NodeId> {
    let mut distinct: Vec<NodeId> = Vec::new();
    for &v in vertices {
        if !distinct.contains(&v) {
            distinct.push(v);
        }
    }
    if distinct.len() < 2 {
        return Err(OpError::IncompatibleGlue {
            reason: "vertex glue needs at least two distinct vertices".to_string(),
        });
    }
    for &v in &distinct {
        ctx.expect_vertex(v)?;
    }
    let time = common_time(ctx, &distinct)?;
    let position = centroid(ctx, &distinct)?;
    let properties = merged_properties(ctx, &distinct);
    let (parent, index) = ctx.position_of(distinct[0])?;

    let id = ctx.complex.alloc_id();
    let mut cell = CellData::new(time, CellKind::Vertex(VertexCell { position }));
    cell.properties = properties;
    ctx.apply(Edit::Insert {
        node: Node::new_cell(id, parent, cell),
        parent,
        index,
    })?;

    rewire_vertex_references(ctx, &distinct, id, &[])?;
    for v in distinct {
        remove_node(ctx, v)?;
    }
    Ok(id)
}

struct GlueInput {
    edges: Vec<NodeId>,
    orientations: Vec<bool>,
}

fn validate_halfedges(
    ctx: &OpCtx<'_>,
    halfedges: &[HalfEdge],
    want_closed: bool,
) -> OpResult<GlueInput> {
    if halfedges.len() < 2 {
        return Err(OpError::IncompatibleGlue {
            reason: "edge glue needs at least two halfedges".to_string(),
        });
    }
    let mut edges = Vec::with_capacity(halfedges.len());
    let mut orientations = Vec::with_capacity(halfedges.len());
    for he in halfedges {
        if edges.contains(&he.edge) {
            return Err(OpError::IncompatibleGlue {
                reason: format!("edge {:?} appears twice in the glue input", he.edge),
            });
        }
        ctx.expect_edge(he.edge)?;
        let closed = ctx
            .complex
            .find(he.edge)
            .and_then(Node::as_cell)
            .and_then(|c| c.as_edge())
            .is_some_and(EdgeCell::is_closed);
        if closed != want_closed {
            return Err(OpError::IncompatibleGlue {
                reason: format!(
                    "edge {:?} is {}, expected {}",
                    he.edge,
                    if closed { "closed" } else { "open" },
                    if want_closed { "closed" } else { "open" }
                ),
            });
        }
        edges.push(he.edge);
        orientations.push(he.forward);
    }
    common_time(ctx, &edges)?;
    Ok(GlueInput {
        edges,
        orientations,
    })
}

fn glued_stroke_of(
    ctx: &mut OpCtx<'_>,
    provided: Option<Stroke>,
    first: HalfEdge,
) -> OpResult<Stroke> {
    match provided {
        Some(s) => Ok(s),
        None => {
            let sampled = ctx.complex.edge_sampled(first.edge)?.clone();
            Ok(if first.forward {
                sampled
            } else {
                sampled.reversed()
            })
        }
    }
}

/// Identify open halfedges as one edge. The oriented start vertices merge
/// into one new vertex and the oriented end vertices into another (or the
/// same one, when a vertex sits on both sides).
pub(crate) fn glue_key_open_edges(
    ctx: &mut OpCtx<'_>,
    halfedges: &[HalfEdge],
    glued_stroke: Option<Stroke>,
) -> OpResult<NodeId> {
    let input = validate_halfedges(ctx, halfedges, false)?;
    let time = common_time(ctx, &input.edges)?;

    let mut starts = Vec::new();
    let mut ends = Vec::new();
    for he in halfedges {
        let (s, e) = match ctx.oriented_ends(he.edge, he.forward)? {
            Some(ends) => ends,
            None => {
                return Err(OpError::IncompatibleGlue {
                    reason: "closed edge in open glue".to_string(),
                })
            }
        };
        if !starts.contains(&s) {
            starts.push(s);
        }
        if !ends.contains(&e) {
            ends.push(e);
        }
    }
    let fused = starts.iter().any(|s| ends.contains(s));
    let stroke = glued_stroke_of(ctx, glued_stroke, halfedges[0])?;
    let (parent, index) = ctx.position_of(input.edges[0])?;

    // Replacement vertices.
    let (start_vertex, end_vertex, old_vertices) = if fused {
        let mut all = starts.clone();
        for e in &ends {
            if !all.contains(e) {
                all.push(*e);
            }
        }
        let id = ctx.complex.alloc_id();
        let mut cell = CellData::new(
            time,
            CellKind::Vertex(VertexCell {
                position: centroid(ctx, &all)?,
            }),
        );
        cell.properties = merged_properties(ctx, &all);
        ctx.apply(Edit::Insert {
            node: Node::new_cell(id, parent, cell),
            parent,
            index,
        })?;
        (id, id, all)
    } else {
        let sid = ctx.complex.alloc_id();
        let mut scell = CellData::new(
            time,
            CellKind::Vertex(VertexCell {
                position: centroid(ctx, &starts)?,
            }),
        );
        scell.properties = merged_properties(ctx, &starts);
        ctx.apply(Edit::Insert {
            node: Node::new_cell(sid, parent, scell),
            parent,
            index,
        })?;
        let eid = ctx.complex.alloc_id();
        let mut ecell = CellData::new(
            time,
            CellKind::Vertex(VertexCell {
                position: centroid(ctx, &ends)?,
            }),
        );
        ecell.properties = merged_properties(ctx, &ends);
        ctx.apply(Edit::Insert {
            node: Node::new_cell(eid, parent, ecell),
            parent,
            index: index + 1,
        })?;
        let mut all = starts.clone();
        for e in &ends {
            if !all.contains(e) {
                all.push(*e);
            }
        }
        (sid, eid, all)
    };

    // Replacement edge.
    let glued = ctx.complex.alloc_id();
    let mut gcell = CellData::new(
        time,
        CellKind::Edge(EdgeCell {
            ends: Some((start_vertex, end_vertex)),
            stroke,
            sampled: None,
        }),
    );
    gcell.properties = merged_properties(ctx, &input.edges);
    {
        let idx = ctx.complex.children(parent)?.len().min(index + 2);
        ctx.apply(Edit::Insert {
            node: Node::new_cell(glued, parent, gcell),
            parent,
            index: idx,
        })?;
    }

    rewrite_face_halfedges(ctx, &input, glued)?;
    if fused {
        rewire_vertex_references(ctx, &old_vertices, start_vertex, &input.edges)?;
    } else {
        rewire_vertex_references(ctx, &starts, start_vertex, &input.edges)?;
        rewire_vertex_references(ctx, &ends, end_vertex, &input.edges)?;
    }
    for &e in &input.edges {
        remove_node(ctx, e)?;
    }
    for v in old_vertices {
        remove_node(ctx, v)?;
    }
    Ok(glued)
}

/// Identify closed halfedges as one closed edge.
pub(crate) fn glue_key_closed_edges(
    ctx: &mut OpCtx<'_>,
    halfedges: &[HalfEdge],
    glued_stroke: Option<Stroke>,
) -> OpResult<NodeId> {
    let input = validate_halfedges(ctx, halfedges, true)?;
    let time = common_time(ctx, &input.edges)?;
    let stroke = glued_stroke_of(ctx, glued_stroke, halfedges[0])?;
    let (parent, index) = ctx.position_of(input.edges[0])?;

    let glued = ctx.complex.alloc_id();
    let mut gcell = CellData::new(
        time,
        CellKind::Edge(EdgeCell {
            ends: None,
            stroke,
            sampled: None,
        }),
    );
    gcell.properties = merged_properties(ctx, &input.edges);
    ctx.apply(Edit::Insert {
        node: Node::new_cell(glued, parent, gcell),
        parent,
        index,
    })?;

    rewrite_face_halfedges(ctx, &input, glued)?;
    for &e in &input.edges {
        remove_node(ctx, e)?;
    }
    Ok(glued)
}

/// Rewrite every face cycle referencing a glued edge to reference the
/// replacement, with orientation relative to the glue input ("forward"
/// in the input means "same direction as the glued edge").
fn rewrite_face_halfedges(
    ctx: &mut OpCtx<'_>,
    input: &GlueInput,
    replacement: NodeId,
) -> OpResult<()> {
    let mut faces = Vec::new();
    for &e in &input.edges {
        for &dep in ctx.complex.star(e) {
            let is_face = ctx
                .complex
                .find(dep)
                .and_then(Node::as_cell)
                .map(|c| matches!(c.kind, CellKind::Face(_)))
                .unwrap_or(false);
            if is_face && !faces.contains(&dep) {
                faces.push(dep);
            }
        }
    }
    for face in faces {
        let from = match ctx.complex.get(face)?.as_cell().and_then(|c| c.as_face()) {
            Some(f) => f.cycles.clone(),
            None => continue,
        };
        let to: Vec<Cycle> = from
            .iter()
            .map(|cycle| match cycle {
                Cycle::Vertex(v) => Cycle::Vertex(*v),
                Cycle::Halfedges(hes) => Cycle::Halfedges(
                    hes.iter()
                        .map(|he| {
                            match input.edges.iter().position(|e| *e == he.edge) {
                                Some(i) => HalfEdge::new(
                                    replacement,
                                    he.forward == input.orientations[i],
                                ),
                                None => *he,
                            }
                        })
                        .collect(),
                ),
            })
            .collect();
        ctx.apply(Edit::SetFaceCycles {
            node: face,
            from,
            to,
        })?;
    }
    Ok(())
}
