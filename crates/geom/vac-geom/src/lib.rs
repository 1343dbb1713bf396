//! Stroke geometry primitives shared by the complex core and by hosts.
//!
//! This crate is deliberately leaf-level: points, sampled strokes and the
//! polyline intersection helpers the topological operations need. It knows
//! nothing about cells, groups or history.

pub mod intersect;
pub mod point;
pub mod stroke;

pub use intersect::{polyline_intersections, segment_intersection, self_intersections};
pub use point::Point2;
pub use stroke::{Stroke, StrokeSample};
