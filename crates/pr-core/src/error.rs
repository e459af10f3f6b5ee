//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `From`.

use thiserror::Error;

/// Errors produced by geometry, WKT parsing and configuration checks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("a path needs at least one coordinate")]
    EmptyPath,

    #[error("cut distance {distance_km} km is outside the path length [0, {length_km}] km")]
    OutOfRange { distance_km: f64, length_km: f64 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `pr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
