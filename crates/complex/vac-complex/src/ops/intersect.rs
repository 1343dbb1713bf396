//! Intersect: materialize every crossing among a set of edges.
//!
//! The plan is strict cut-then-glue. Cutting first guarantees each
//! intersection point exists as a vertex; gluing second merges the
//! duplicate vertices the independent cuts introduced. A crossing that
//! lands within tolerance of an open edge's endpoint reuses that endpoint
//! vertex instead of producing a sliver cut; one at a closed edge's seam
//! wraps to a single interior cut there.

use crate::cell::CellKind;
use crate::config::IntersectSettings;
use crate::error::{OpError, OpResult};
use crate::ids::NodeId;
use crate::node::Node;
use crate::ops::ctx::OpCtx;
use crate::ops::cut::{cut_key_edge, CutOutcome};
use crate::ops::glue::glue_key_vertices;
use hashbrown::HashMap;
use vac_geom::{polyline_intersections, self_intersections, Stroke};

/// The cells the intersection left behind: every vertex standing at an
/// intersection point, and the full set of (sub-)edges now covering the
/// inputs.
#[derive(Clone, Debug, Default)]
pub struct IntersectOutcome {
    pub vertices: Vec<NodeId>,
    pub edges: Vec<NodeId>,
}

/// One site on one input edge where a crossing was found.
#[derive(Clone, Copy, Debug)]
struct Site {
    input: usize,
    param: f64,
}

struct UnionFind {
    parent: HashMap<usize, usize>,
}

impl UnionFind {
    fn new() -> Self {
        Self {
            parent: HashMap::new(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let p = *self.parent.entry(x).or_insert(x);
        if p == x {
            return x;
        }
        let root = self.find(p);
        self.parent.insert(x, root);
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent.insert(ra, rb);
        }
    }
}

pub(crate) fn intersect(
    ctx: &mut OpCtx<'_>,
    edges: &[NodeId],
    settings: IntersectSettings,
) -> OpResult<IntersectOutcome> {
    if edges.is_empty() {
        return Ok(IntersectOutcome::default());
    }
    let mut distinct = Vec::new();
    for &e in edges {
        if !distinct.contains(&e) {
            distinct.push(e);
        }
    }
    let mut time = None;
    for &e in &distinct {
        let t = ctx.expect_edge(e)?;
        match time {
            None => time = Some(t),
            Some(t0) if t0 != t => {
                return Err(OpError::WrongTime {
                    node: e,
                    expected: t0,
                    actual: t,
                })
            }
            Some(_) => {}
        }
    }

    // Snapshot sampled geometry before planning any edit.
    let mut strokes: Vec<Stroke> = Vec::with_capacity(distinct.len());
    let mut open_ends: Vec<Option<(NodeId, NodeId)>> = Vec::with_capacity(distinct.len());
    for &e in &distinct {
        strokes.push(ctx.complex.edge_sampled(e)?.clone());
        let ends = ctx
            .complex
            .get(e)?
            .as_cell()
            .and_then(|c| c.as_edge())
            .map(|ec| ec.ends)
            .ok_or(OpError::MissingNode(e))?;
        open_ends.push(ends);
    }

    // Plan: every crossing becomes one event of two sites. A crossing at
    // a closed edge's seam is reported as parameter 0 or 1 (the same
    // point); both wrap to one canonical interior parameter so the seam
    // is cut once and every seam site resolves to the same vertex.
    let param_eps: Vec<f64> = strokes
        .iter()
        .map(|s| (settings.tolerance / s.arclength().max(settings.tolerance)).max(1e-9))
        .collect();
    let closed: Vec<bool> = open_ends.iter().map(Option::is_none).collect();
    let canon = |i: usize, t: f64| -> f64 {
        if closed[i] && (t <= param_eps[i] || t >= 1.0 - param_eps[i]) {
            param_eps[i].min(0.5)
        } else {
            t
        }
    };
    let mut events: Vec<(Site, Site)> = Vec::new();
    for i in 0..distinct.len() {
        for j in (i + 1)..distinct.len() {
            for (ti, tj) in polyline_intersections(&strokes[i], &strokes[j], settings.tolerance)
            {
                events.push((
                    Site {
                        input: i,
                        param: canon(i, ti),
                    },
                    Site {
                        input: j,
                        param: canon(j, tj),
                    },
                ));
            }
        }
        if settings.self_intersections {
            for (t1, t2) in self_intersections(&strokes[i], settings.tolerance) {
                events.push((
                    Site {
                        input: i,
                        param: canon(i, t1),
                    },
                    Site {
                        input: i,
                        param: canon(i, t2),
                    },
                ));
            }
        }
    }

    // Aggregate cut parameters per edge. Params within tolerance of an
    // open edge's endpoints are not cut; the site resolves to the
    // existing endpoint vertex instead.
    let at_start = |i: usize, t: f64| !closed[i] && t <= param_eps[i];
    let at_end = |i: usize, t: f64| !closed[i] && t >= 1.0 - param_eps[i];
    let mut cut_params: Vec<Vec<f64>> = vec![Vec::new(); distinct.len()];
    for (a, b) in &events {
        for site in [a, b] {
            if !at_start(site.input, site.param) && !at_end(site.input, site.param) {
                cut_params[site.input].push(site.param);
            }
        }
    }

    // Cut phase.
    let mut outcomes: Vec<Option<CutOutcome>> = Vec::with_capacity(distinct.len());
    let mut result_edges: Vec<NodeId> = Vec::new();
    for (i, params) in cut_params.iter().enumerate() {
        if params.is_empty() {
            outcomes.push(None);
            result_edges.push(distinct[i]);
        } else {
            let outcome = cut_key_edge(ctx, distinct[i], params)?;
            result_edges.extend(outcome.new_edges.iter().copied());
            outcomes.push(Some(outcome));
        }
    }

    // Resolve each site to its vertex.
    let resolve = |i: usize, t: f64| -> Option<NodeId> {
        if at_start(i, t) {
            return open_ends[i].map(|(s, _)| s);
        }
        if at_end(i, t) {
            return open_ends[i].map(|(_, e)| e);
        }
        let outcome = outcomes[i].as_ref()?;
        let mut best: Option<(f64, NodeId)> = None;
        for (p, v) in outcome.params.iter().zip(&outcome.new_vertices) {
            let d = (p - t).abs();
            if best.map(|(bd, _)| d < bd).unwrap_or(true) {
                best = Some((d, *v));
            }
        }
        best.map(|(_, v)| v)
    };

    // Glue phase: group the sites of each event, merging transitively
    // when events share a vertex.
    let mut site_vertices: Vec<(NodeId, NodeId)> = Vec::new();
    for (a, b) in &events {
        if let (Some(va), Some(vb)) = (
            resolve(a.input, a.param),
            resolve(b.input, b.param),
        ) {
            site_vertices.push((va, vb));
        }
    }
    let mut index_of: HashMap<NodeId, usize> = HashMap::new();
    let mut vertex_list: Vec<NodeId> = Vec::new();
    let mut uf = UnionFind::new();
    for (va, vb) in &site_vertices {
        for v in [*va, *vb] {
            if !index_of.contains_key(&v) {
                index_of.insert(v, vertex_list.len());
                vertex_list.push(v);
            }
        }
        uf.union(index_of[va], index_of[vb]);
    }
    let mut groups: HashMap<usize, Vec<NodeId>> = HashMap::new();
    for (idx, v) in vertex_list.iter().enumerate() {
        groups.entry(uf.find(idx)).or_default().push(*v);
    }

    let mut result_vertices: Vec<NodeId> = Vec::new();
    for (_, group) in groups {
        if group.len() >= 2 {
            result_vertices.push(glue_key_vertices(ctx, &group)?);
        } else if let Some(v) = group.first() {
            result_vertices.push(*v);
        }
    }

    // Gluing may have replaced endpoint vertices of result edges, but the
    // edge ids themselves are stable unless a glued vertex retired them;
    // filter to what is still alive.
    result_edges.retain(|e| ctx.complex.contains(*e));
    result_vertices.retain(|v| {
        ctx.complex
            .find(*v)
            .and_then(Node::as_cell)
            .map(|c| matches!(c.kind, CellKind::Vertex(_)))
            .unwrap_or(false)
    });

    Ok(IntersectOutcome {
        vertices: result_vertices,
        edges: result_edges,
    })
}
