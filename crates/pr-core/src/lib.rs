//! `pr-core` — foundational types for the physical-route engine.
//!
//! This crate is a dependency of every other `pr-*` crate.  It has no `pr-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`ids`]        | `NodeId`, `EdgeId`                                     |
//! | [`geo`]        | `GeoPoint`, haversine distance, great-circle helpers   |
//! | [`path`]       | `GeoPath`, projection, `CutAt`, `PathCut`              |
//! | [`wkt`]        | `LINESTRING` parsing, `LINESTRING`/`MULTILINESTRING` output |
//! | [`location`]   | `Location` (normalized node key), `CableType`          |
//! | [`config`]     | `RouteConfig`, `AugmentConfig`, `SpliceConfig`         |
//! | [`error`]      | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public value types.      |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod location;
pub mod path;
pub mod wkt;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AugmentConfig, DEFAULT_HOP_KM, RouteConfig, SpliceConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{EARTH_RADIUS_KM, GeoPoint};
pub use ids::{EdgeId, NodeId};
pub use location::{CableType, Location};
pub use path::{CutAt, GeoPath, PathCut, PathProjection};
