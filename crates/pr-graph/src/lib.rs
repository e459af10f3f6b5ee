//! `pr-graph` — physical cable network, coordinate index, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`network`] | `PhysNetwork` (CSR + coordinate index), `PhysNetworkBuilder`, `NearEdge` |
//! | [`index`]   | `CoordIndex` — R-tree over unit-sphere coordinates            |
//! | [`build`]   | `build_network` from the three edge sources, `BuildReport`    |
//! | [`loader`]  | `EdgeRecord`, `EdgeSource`, `load_edges_csv`, `load_edges_reader` |
//! | [`query`]   | `QueryGraph` request-scoped overlay, `Augmentation`           |
//! | [`router`]  | `Router` trait, `Route`, `DijkstraRouter`                     |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                                |
//!
//! # Lifecycle
//!
//! ```text
//! startup:  EdgeRecord rows ─► build_network ─► PhysNetwork (immutable)
//! request:  QueryGraph::new(&network) ─► augment(src) ─► augment(dst) ─► Router::route
//! ```
//!
//! The shared network is never mutated after `build`; each request owns a
//! `QueryGraph` that borrows it and holds only the nodes and edges the
//! request adds.

pub mod build;
pub mod error;
pub mod index;
pub mod loader;
pub mod network;
pub mod query;
pub mod router;


pub use build::{BuildReport, CoordinateDrift, SkipReason, SkippedRow, build_network};
pub use error::{GraphError, GraphResult};
pub use index::{CoordIndex, KnownCoord};
pub use loader::{EdgeRecord, EdgeSource, load_edges_csv, load_edges_reader};
pub use network::{NearEdge, PhysNetwork, PhysNetworkBuilder};
pub use query::{Augmentation, EdgeRef, QueryGraph};
pub use router::{DijkstraRouter, Route, Router};
