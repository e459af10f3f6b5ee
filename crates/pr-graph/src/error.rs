//! Graph-subsystem error type.

use thiserror::Error;

use pr_core::{GeoPoint, NodeId};

/// Errors produced by `pr-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("invalid coordinate {0}")]
    InvalidCoordinate(GeoPoint),

    #[error("edge load error: {0}")]
    Load(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
