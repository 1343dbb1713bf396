//! Editor and operation configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::VacEditor`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Maximum number of retained history groups; `None` is unbounded.
    /// Committing past the limit evicts the oldest group (its effects
    /// remain part of the current state, it just stops being undoable).
    pub history_capacity: Option<usize>,
}

/// Settings for the `intersect` operation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct IntersectSettings {
    /// Geometric tolerance: intersection points closer than this are
    /// considered the same point, and cut parameters this close to an
    /// endpoint reuse the endpoint vertex instead of cutting.
    pub tolerance: f64,
    /// Also cut each edge at its self-intersections.
    pub self_intersections: bool,
}

impl Default for IntersectSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            self_intersections: false,
        }
    }
}
