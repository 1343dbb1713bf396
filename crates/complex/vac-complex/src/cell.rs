//! Cell payloads: the closed tagged variant over vertex/edge/face.
//!
//! The source material models the vertex/edge/face × key/inbetween matrix
//! with multiple inheritance; here it is one `CellKind` enum carried by
//! `CellData`, with behavior dispatched by matching. The star cache lives
//! on `CellData` and is only ever touched by edit application.

use crate::ids::NodeId;
use crate::property::PropertyMap;
use crate::time::Time;
use vac_geom::{Point2, Stroke};

/// An edge plus a traversal direction, as used inside face cycles and as
/// glue input.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct HalfEdge {
    pub edge: NodeId,
    pub forward: bool,
}

impl HalfEdge {
    #[inline]
    pub fn new(edge: NodeId, forward: bool) -> Self {
        Self { edge, forward }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        Self {
            edge: self.edge,
            forward: !self.forward,
        }
    }
}

/// One boundary component of a face: either an isolated (Steiner) vertex
/// or a closed walk of halfedges. A closed edge forms a one-element walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cycle {
    Vertex(NodeId),
    Halfedges(Vec<HalfEdge>),
}

impl Cycle {
    /// Cells directly referenced by this cycle, in walk order.
    pub fn referenced_cells(&self) -> Vec<NodeId> {
        match self {
            Cycle::Vertex(v) => vec![*v],
            Cycle::Halfedges(hes) => hes.iter().map(|he| he.edge).collect(),
        }
    }
}

/// 0-cell payload.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexCell {
    pub position: Point2,
}

/// 1-cell payload. `ends: None` is a closed (loop) edge; otherwise the
/// edge runs from `ends.0` to `ends.1` (which may be the same vertex).
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeCell {
    pub ends: Option<(NodeId, NodeId)>,
    pub stroke: Stroke,
    /// Lazily recomputed snapped stroke; invalidated by the dirty flag.
    pub sampled: Option<Stroke>,
}

impl EdgeCell {
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.ends.is_none()
    }
}

/// 2-cell payload: outer and inner boundaries as cycles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceCell {
    pub cycles: Vec<Cycle>,
}

/// Spatial kind of a cell, as a closed set.
#[derive(Clone, Debug)]
pub enum CellKind {
    Vertex(VertexCell),
    Edge(EdgeCell),
    Face(FaceCell),
}

impl CellKind {
    pub fn dimension(&self) -> u8 {
        match self {
            CellKind::Vertex(_) => 0,
            CellKind::Edge(_) => 1,
            CellKind::Face(_) => 2,
        }
    }
}

/// A cell: kind payload, authoring time, properties, and the derived
/// caches (star, geometry dirty flag) maintained by edit application.
#[derive(Clone, Debug)]
pub struct CellData {
    pub time: Time,
    pub kind: CellKind,
    pub properties: PropertyMap,
    /// Geometry cache invalid; cleared on the next sampled-geometry query.
    pub dirty: bool,
    /// Cells whose boundary contains this cell. Derived, never authored.
    pub star: Vec<NodeId>,
}

impl CellData {
    pub fn new(time: Time, kind: CellKind) -> Self {
        Self {
            time,
            kind,
            properties: PropertyMap::new(),
            dirty: true,
            star: Vec::new(),
        }
    }

    /// The lower-dimensional cells this cell directly depends on,
    /// deduplicated, in reference order.
    pub fn boundary(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut push = |id: NodeId, out: &mut Vec<NodeId>| {
            if !out.contains(&id) {
                out.push(id);
            }
        };
        match &self.kind {
            CellKind::Vertex(_) => {}
            CellKind::Edge(e) => {
                if let Some((a, b)) = e.ends {
                    push(a, &mut out);
                    push(b, &mut out);
                }
            }
            CellKind::Face(f) => {
                for cycle in &f.cycles {
                    for id in cycle.referenced_cells() {
                        push(id, &mut out);
                    }
                }
            }
        }
        out
    }

    pub fn as_vertex(&self) -> Option<&VertexCell> {
        match &self.kind {
            CellKind::Vertex(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&EdgeCell> {
        match &self.kind {
            CellKind::Edge(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_face(&self) -> Option<&FaceCell> {
        match &self.kind {
            CellKind::Face(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_boundary_is_its_ends() {
        let cell = CellData::new(
            Time(0),
            CellKind::Edge(EdgeCell {
                ends: Some((NodeId(1), NodeId(2))),
                stroke: Stroke::default(),
                sampled: None,
            }),
        );
        assert_eq!(cell.boundary(), vec![NodeId(1), NodeId(2)]);
    }

    #[test]
    fn loop_edge_boundary_dedups() {
        let cell = CellData::new(
            Time(0),
            CellKind::Edge(EdgeCell {
                ends: Some((NodeId(7), NodeId(7))),
                stroke: Stroke::default(),
                sampled: None,
            }),
        );
        assert_eq!(cell.boundary(), vec![NodeId(7)]);
    }

    #[test]
    fn face_boundary_collects_cycles() {
        let cell = CellData::new(
            Time(0),
            CellKind::Face(FaceCell {
                cycles: vec![
                    Cycle::Halfedges(vec![
                        HalfEdge::new(NodeId(3), true),
                        HalfEdge::new(NodeId(4), false),
                    ]),
                    Cycle::Vertex(NodeId(9)),
                ],
            }),
        );
        assert_eq!(cell.boundary(), vec![NodeId(3), NodeId(4), NodeId(9)]);
    }
}
