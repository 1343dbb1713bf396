//! Cut: split a key edge at normalized arclength parameters.

use crate::cell::{CellData, CellKind, Cycle, EdgeCell, HalfEdge, VertexCell};
use crate::edit::Edit;
use crate::error::{OpError, OpResult};
use crate::ids::NodeId;
use crate::node::Node;
use crate::ops::ctx::OpCtx;
use vac_geom::Stroke;

/// What a cut produced. `new_vertices[i]` sits at `params[i]` (sorted);
/// `new_edges` are the replacement sub-edges in traversal order.
#[derive(Clone, Debug, Default)]
pub struct CutOutcome {
    pub params: Vec<f64>,
    pub new_vertices: Vec<NodeId>,
    pub new_edges: Vec<NodeId>,
}

const PARAM_EPS: f64 = 1e-9;

fn normalized_params(raw: &[f64]) -> OpResult<Vec<f64>> {
    if raw.is_empty() {
        return Err(OpError::InvalidCutParameter(f64::NAN));
    }
    let mut params: Vec<f64> = Vec::with_capacity(raw.len());
    for &p in raw {
        if !p.is_finite() || p <= 0.0 || p >= 1.0 {
            return Err(OpError::InvalidCutParameter(p));
        }
        params.push(p);
    }
    params.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    params.dedup_by(|a, b| (*a - *b).abs() <= PARAM_EPS);
    Ok(params)
}

pub(crate) fn cut_key_edge(
    ctx: &mut OpCtx<'_>,
    edge: NodeId,
    raw_params: &[f64],
) -> OpResult<CutOutcome> {
    let time = ctx.expect_edge(edge)?;
    let params = normalized_params(raw_params)?;
    let ends = ctx
        .complex
        .get(edge)?
        .as_cell()
        .and_then(|c| c.as_edge())
        .map(|e| e.ends)
        .ok_or(OpError::WrongKind {
            node: edge,
            expected: "edge",
        })?;
    // Slice the sampled (snapped) geometry so new vertices land exactly on
    // what the user sees.
    let stroke = ctx.complex.edge_sampled(edge)?.clone();
    let pieces = stroke.split_at(&params);
    let properties = ctx
        .complex
        .get(edge)?
        .as_cell()
        .map(|c| c.properties.clone())
        .unwrap_or_default();
    let (parent, base_index) = ctx.position_of(edge)?;

    // New vertices at the split samples.
    let mut new_vertices = Vec::with_capacity(params.len());
    let mut insert_index = base_index;
    for piece in pieces.iter().take(params.len()) {
        let sample = piece.end().unwrap_or_default();
        let id = ctx.complex.alloc_id();
        ctx.apply(Edit::Insert {
            node: Node::new_cell(
                id,
                parent,
                CellData::new(
                    time,
                    CellKind::Vertex(VertexCell {
                        position: sample.pos,
                    }),
                ),
            ),
            parent,
            index: insert_index,
        })?;
        insert_index += 1;
        new_vertices.push(id);
    }

    // Replacement sub-edges.
    let (sub_strokes, sub_ends): (Vec<Stroke>, Vec<(NodeId, NodeId)>) = match ends {
        Some((a, b)) => {
            let mut endpoints = Vec::with_capacity(pieces.len());
            let mut walk = a;
            for v in &new_vertices {
                endpoints.push((walk, *v));
                walk = *v;
            }
            endpoints.push((walk, b));
            (pieces, endpoints)
        }
        None => {
            // Closed edge: k params yield k sub-edges; the last one wraps
            // through the seam.
            let k = new_vertices.len();
            let mut strokes = Vec::with_capacity(k);
            let mut endpoints = Vec::with_capacity(k);
            for j in 0..k.saturating_sub(1) {
                strokes.push(pieces[j + 1].clone());
                endpoints.push((new_vertices[j], new_vertices[j + 1]));
            }
            strokes.push(pieces[k].concat(&pieces[0]));
            endpoints.push((new_vertices[k - 1], new_vertices[0]));
            (strokes, endpoints)
        }
    };

    let piece_props = properties.split(sub_strokes.len());
    let mut new_edges = Vec::with_capacity(sub_strokes.len());
    for ((stroke, (start, end)), props) in
        sub_strokes.into_iter().zip(sub_ends).zip(piece_props)
    {
        let id = ctx.complex.alloc_id();
        let mut cell = CellData::new(
            time,
            CellKind::Edge(EdgeCell {
                ends: Some((start, end)),
                stroke,
                sampled: None,
            }),
        );
        cell.properties = props;
        ctx.apply(Edit::Insert {
            node: Node::new_cell(id, parent, cell),
            parent,
            index: insert_index,
        })?;
        insert_index += 1;
        new_edges.push(id);
    }

    // Rewrite every face cycle that referenced the original edge.
    let faces: Vec<NodeId> = ctx.complex.star(edge).to_vec();
    for face in faces {
        let old_cycles = match ctx.complex.get(face)?.as_cell().and_then(|c| c.as_face()) {
            Some(f) => f.cycles.clone(),
            None => continue,
        };
        let new_cycles = old_cycles
            .iter()
            .map(|cycle| rewrite_cycle(cycle, edge, &new_edges))
            .collect::<Vec<_>>();
        ctx.apply(Edit::SetFaceCycles {
            node: face,
            from: old_cycles,
            to: new_cycles,
        })?;
    }

    // The original edge's star is now empty; retire it.
    let snapshot = ctx.snapshot(edge)?;
    let (p, i) = ctx.position_of(edge)?;
    ctx.apply(Edit::Remove {
        node: snapshot,
        parent: p,
        index: i,
    })?;

    Ok(CutOutcome {
        params,
        new_vertices,
        new_edges,
    })
}

/// Replace each halfedge over `edge` with the sub-edge sequence, in the
/// traversal direction of the halfedge.
fn rewrite_cycle(cycle: &Cycle, edge: NodeId, subs: &[NodeId]) -> Cycle {
    match cycle {
        Cycle::Vertex(v) => Cycle::Vertex(*v),
        Cycle::Halfedges(hes) => {
            let mut out = Vec::with_capacity(hes.len());
            for he in hes {
                if he.edge != edge {
                    out.push(*he);
                } else if he.forward {
                    out.extend(subs.iter().map(|e| HalfEdge::new(*e, true)));
                } else {
                    out.extend(subs.iter().rev().map(|e| HalfEdge::new(*e, false)));
                }
            }
            Cycle::Halfedges(out)
        }
    }
}
