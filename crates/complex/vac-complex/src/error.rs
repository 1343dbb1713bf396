//! Operation precondition errors.
//!
//! Every entry point validates eagerly and returns one of these before
//! mutating anything; the command layer above the core is responsible for
//! surfacing them to the user. None of them are expected runtime
//! conditions inside the core itself.

use crate::ids::NodeId;
use crate::time::Time;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OpError {
    #[error("node {0:?} does not exist in this complex")]
    MissingNode(NodeId),

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { child: NodeId, parent: NodeId },

    #[error("node {node:?} is not a {expected}")]
    WrongKind {
        node: NodeId,
        expected: &'static str,
    },

    #[error("cell {node:?} exists at {actual:?}, expected {expected:?}")]
    WrongTime {
        node: NodeId,
        expected: Time,
        actual: Time,
    },

    #[error("identifier {0:?} is already in use")]
    IdCollision(NodeId),

    #[error("moving {node:?} under {target:?} would create a parent cycle")]
    WouldCycle { node: NodeId, target: NodeId },

    #[error("malformed face cycle: {reason}")]
    MalformedCycle { reason: String },

    #[error("cut parameter {0} is not strictly inside (0,1)")]
    InvalidCutParameter(f64),

    #[error("incompatible glue input: {reason}")]
    IncompatibleGlue { reason: String },
}

pub type OpResult<T> = Result<T, OpError>;
