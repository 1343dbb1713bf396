//! Structural operations: the only legal mutators of a complex.
//!
//! Each operation validates its preconditions in full, then performs its
//! primitive edits through [`ctx::OpCtx::apply`], the single choke point
//! that keeps boundary/star caches and the dirty propagation consistent
//! and records every edit for history. Operations validate before
//! mutating wherever possible; the editor reverts whatever a failed call
//! had already applied, so every call is atomic either way.

pub(crate) mod ctx;
pub(crate) mod create;
pub(crate) mod cut;
pub(crate) mod delete;
pub(crate) mod edit_geometry;
pub(crate) mod glue;
pub(crate) mod intersect;

pub use cut::CutOutcome;
pub use intersect::IntersectOutcome;
