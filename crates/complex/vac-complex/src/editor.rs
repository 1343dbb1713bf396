//! The editor facade: one complex, its operations, and its history.
//!
//! `VacEditor` is what the command layer of an application talks to. Each
//! entry point is a whole top-level operation: validate, mutate through
//! primitive edits, record for history, and leave the resulting change
//! notification in `last_diff()`. Readers (renderer, document sync) treat
//! diff delivery as the barrier after which the complex may be read.

use crate::cell::{Cycle, HalfEdge};
use crate::complex::Complex;
use crate::config::{EditorConfig, IntersectSettings};
use crate::diff::Diff;
use crate::edit::Edit;
use crate::error::OpResult;
use crate::history::History;
use crate::ids::NodeId;
use crate::ops;
use crate::ops::ctx::OpCtx;
use crate::ops::{CutOutcome, IntersectOutcome};
use crate::time::Time;
use vac_geom::{Point2, Stroke};

#[derive(Debug)]
pub struct VacEditor {
    complex: Complex,
    history: History,
    diff: Diff,
}

impl Default for VacEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl VacEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            complex: Complex::new(),
            history: History::new(config.history_capacity),
            diff: Diff::default(),
        }
    }

    /// Read-only access for traversal and geometry queries.
    pub fn complex(&self) -> &Complex {
        &self.complex
    }

    /// Current sampled geometry of an edge (lazy recompute, cached).
    pub fn edge_sampled(&mut self, edge: NodeId) -> OpResult<&Stroke> {
        self.complex.edge_sampled(edge)
    }

    pub fn root(&self) -> NodeId {
        self.complex.root()
    }

    /// The change notification of the most recent top-level call
    /// (operation, undo, redo, or abort).
    pub fn last_diff(&self) -> &Diff {
        &self.diff
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Run one top-level operation: clear the previous diff, open an
    /// implicit single-op group when none is open, and commit or discard
    /// it depending on the outcome. Operations validate before mutating,
    /// and any edits a failing call did apply are reverted here, so an
    /// `Err` always leaves the complex unchanged.
    fn run<T>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut OpCtx<'_>) -> OpResult<T>,
    ) -> OpResult<T> {
        self.diff.clear();
        let implicit = !self.history.has_open_group();
        if implicit {
            self.history.begin_group(name);
        }
        let mut edits: Vec<Edit> = Vec::new();
        let mut ctx = OpCtx {
            complex: &mut self.complex,
            edits: &mut edits,
            diff: &mut self.diff,
        };
        let result = f(&mut ctx);
        match result {
            Ok(value) => {
                self.history.record(edits);
                if implicit {
                    self.history.end_group();
                }
                Ok(value)
            }
            Err(err) => {
                // A planner working from live geometry (intersect) can
                // fail after earlier edits in its batch landed; revert
                // them so the failed call stays atomic.
                for edit in edits.iter().rev() {
                    edit.inverted().apply(&mut self.complex, &mut self.diff)?;
                }
                self.diff.clear();
                if implicit {
                    // Nothing recorded; drop the implicit group.
                    self.history.abort_group(&mut self.complex, &mut self.diff)?;
                }
                Err(err)
            }
        }
    }

    // ----- creation -----------------------------------------------------

    pub fn create_group(
        &mut self,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> OpResult<NodeId> {
        self.run("create group", |ctx| {
            ops::create::create_group(ctx, parent, next_sibling)
        })
    }

    pub fn create_key_vertex(
        &mut self,
        position: Point2,
        parent: NodeId,
        next_sibling: Option<NodeId>,
        time: Time,
    ) -> OpResult<NodeId> {
        self.run("create vertex", |ctx| {
            ops::create::create_key_vertex(ctx, position, parent, next_sibling, time)
        })
    }

    pub fn create_key_open_edge(
        &mut self,
        start: NodeId,
        end: NodeId,
        stroke: Stroke,
        parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> OpResult<NodeId> {
        self.run("create edge", |ctx| {
            ops::create::create_key_open_edge(ctx, start, end, stroke, parent, next_sibling)
        })
    }

    pub fn create_key_closed_edge(
        &mut self,
        stroke: Stroke,
        parent: NodeId,
        next_sibling: Option<NodeId>,
        time: Time,
    ) -> OpResult<NodeId> {
        self.run("create edge", |ctx| {
            ops::create::create_key_closed_edge(ctx, stroke, parent, next_sibling, time)
        })
    }

    pub fn create_key_face(
        &mut self,
        cycles: Vec<Cycle>,
        parent: NodeId,
        next_sibling: Option<NodeId>,
        time: Time,
    ) -> OpResult<NodeId> {
        self.run("create face", |ctx| {
            ops::create::create_key_face(ctx, cycles, parent, next_sibling, time)
        })
    }

    // ----- geometry & structure edits ------------------------------------

    pub fn set_key_vertex_position(&mut self, vertex: NodeId, position: Point2) -> OpResult<()> {
        self.run("move vertex", |ctx| {
            ops::edit_geometry::set_key_vertex_position(ctx, vertex, position)
        })
    }

    pub fn set_key_edge_geometry(&mut self, edge: NodeId, stroke: Stroke) -> OpResult<()> {
        self.run("edit edge geometry", |ctx| {
            ops::edit_geometry::set_key_edge_geometry(ctx, edge, stroke)
        })
    }

    pub fn move_to_group(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
        next_sibling: Option<NodeId>,
    ) -> OpResult<()> {
        self.run("move to group", |ctx| {
            ops::edit_geometry::move_to_group(ctx, node, new_parent, next_sibling)
        })
    }

    // ----- deletion -------------------------------------------------------

    pub fn hard_delete(
        &mut self,
        node: NodeId,
        delete_isolated_vertices: bool,
    ) -> OpResult<()> {
        self.run("delete", |ctx| {
            ops::delete::hard_delete(ctx, node, delete_isolated_vertices)
        })
    }

    pub fn soft_delete(
        &mut self,
        node: NodeId,
        delete_isolated_vertices: bool,
    ) -> OpResult<()> {
        self.run("delete", |ctx| {
            ops::delete::soft_delete(ctx, node, delete_isolated_vertices)
        })
    }

    // ----- topology -------------------------------------------------------

    pub fn cut_key_edge(&mut self, edge: NodeId, params: &[f64]) -> OpResult<CutOutcome> {
        self.run("cut edge", |ctx| ops::cut::cut_key_edge(ctx, edge, params))
    }

    pub fn glue_key_open_edges(
        &mut self,
        halfedges: &[HalfEdge],
        glued_stroke: Option<Stroke>,
    ) -> OpResult<NodeId> {
        self.run("glue edges", |ctx| {
            ops::glue::glue_key_open_edges(ctx, halfedges, glued_stroke)
        })
    }

    pub fn glue_key_closed_edges(
        &mut self,
        halfedges: &[HalfEdge],
        glued_stroke: Option<Stroke>,
    ) -> OpResult<NodeId> {
        self.run("glue edges", |ctx| {
            ops::glue::glue_key_closed_edges(ctx, halfedges, glued_stroke)
        })
    }

    pub fn glue_key_vertices(&mut self, vertices: &[NodeId]) -> OpResult<NodeId> {
        self.run("glue vertices", |ctx| {
            ops::glue::glue_key_vertices(ctx, vertices)
        })
    }

    pub fn intersect(
        &mut self,
        edges: &[NodeId],
        settings: IntersectSettings,
    ) -> OpResult<IntersectOutcome> {
        self.run("intersect", |ctx| ops::intersect::intersect(ctx, edges, settings))
    }

    // ----- history control ------------------------------------------------

    /// Bracket one logical user action; groups nest and only the
    /// outermost `end_group` commits one undoable unit.
    pub fn begin_group(&mut self, name: &str) {
        self.history.begin_group(name);
    }

    pub fn end_group(&mut self) -> bool {
        self.history.end_group()
    }

    /// Commit, merging into the previous group when the names match
    /// (coalesces successive small drags into one undo step).
    pub fn end_group_amend(&mut self) -> bool {
        self.history.end_group_amend()
    }

    /// Discard the open group, reverting everything since `begin_group`.
    pub fn abort_group(&mut self) -> OpResult<()> {
        self.diff.clear();
        self.history.abort_group(&mut self.complex, &mut self.diff)
    }

    /// Undo one group. No-op (Ok(false)) at the start of history.
    pub fn undo_one(&mut self) -> OpResult<bool> {
        self.diff.clear();
        self.history.undo_one(&mut self.complex, &mut self.diff)
    }

    /// Redo one group. No-op (Ok(false)) at the end of history.
    pub fn redo_one(&mut self) -> OpResult<bool> {
        self.diff.clear();
        self.history.redo_one(&mut self.complex, &mut self.diff)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
