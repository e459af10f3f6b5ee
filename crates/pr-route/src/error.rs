use thiserror::Error;

use pr_core::{CoreError, GeoPoint, Location};
use pr_graph::GraphError;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid coordinate {0}")]
    InvalidCoordinate(GeoPoint),

    #[error("unknown presence provider {0:?}")]
    UnknownProvider(String),

    #[error("unknown location {0}")]
    UnknownLocation(Location),

    #[error("{label} coordinate {point} has no connection to the network")]
    Unconnected { label: &'static str, point: GeoPoint },

    #[error("no route between source and destination")]
    NoPath,

    #[error("geometry error: {0}")]
    Geometry(#[from] CoreError),

    #[error("graph error: {0}")]
    Graph(GraphError),

    #[error("engine configuration error: {0}")]
    Config(String),

    #[error("presence load error: {0}")]
    Load(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RouteError {
    /// `true` for errors caused by the request itself (bad input, unknown
    /// names, unreachable target).  Everything else is a server-side defect
    /// or a startup failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RouteError::InvalidCoordinate(_)
                | RouteError::UnknownProvider(_)
                | RouteError::UnknownLocation(_)
                | RouteError::Unconnected { .. }
                | RouteError::NoPath
        )
    }
}

impl From<GraphError> for RouteError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::NoPath { .. } => RouteError::NoPath,
            GraphError::InvalidCoordinate(p) => RouteError::InvalidCoordinate(p),
            other => RouteError::Graph(other),
        }
    }
}

pub type RouteResult<T> = Result<T, RouteError>;
