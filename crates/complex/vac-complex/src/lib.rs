//! Vector animation complex (engine-agnostic core).
//!
//! A complex is a topological graph of time-indexed cells (vertices,
//! edges, faces) organized into nested groups. All mutation goes through
//! the operations on [`VacEditor`], which validate preconditions, keep the
//! boundary/star caches consistent, return a change notification per
//! call, and record every edit into a grouped, linear undo history.

pub mod cell;
pub mod complex;
pub mod config;
pub mod diff;
mod edit;
pub mod editor;
pub mod error;
pub mod history;
pub mod ids;
pub mod node;
pub mod ops;
pub mod property;
pub mod time;

// Re-exports for consumers (command layer, document sync, renderers).
pub use cell::{CellData, CellKind, Cycle, EdgeCell, FaceCell, HalfEdge, VertexCell};
pub use complex::Complex;
pub use config::{EditorConfig, IntersectSettings};
pub use diff::{Diff, Reparented};
pub use editor::VacEditor;
pub use error::{OpError, OpResult};
pub use history::History;
pub use ids::{NodeId, NodeIdAllocator};
pub use node::{GroupData, Node, NodeData};
pub use ops::{CutOutcome, IntersectOutcome};
pub use property::{CellProperty, PropertyMap};
pub use time::Time;
pub use vac_geom::{Point2, Stroke, StrokeSample};
