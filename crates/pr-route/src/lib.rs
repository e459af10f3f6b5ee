//! `pr-route` — physical route queries over a shared cable network.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`engine`]   | `RouteEngine` — the per-query pipeline, batch routing      |
//! | [`builder`]  | `EngineBuilder` — fluent construction from edge rows       |
//! | [`presence`] | `PresencePoint`, `PresenceSet`, `PresenceScope`, CSV loader |
//! | [`splice`]   | `splice_presence`, `SplicedRoute`                          |
//! | [`query`]    | `RouteQuery` request type                                  |
//! | [`response`] | `RouteResponse` response type                              |
//! | [`error`]    | `RouteError`, `RouteResult<T>`                             |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `RouteEngine::route_all` runs on Rayon's thread pool.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pr_graph::load_edges_csv;
//! use pr_route::{EngineBuilder, RouteQuery, load_presence_csv};
//!
//! let (engine, report) = EngineBuilder::new()
//!     .land(load_edges_csv("land.csv".as_ref())?)
//!     .submarine(load_edges_csv("submarine.csv".as_ref())?)
//!     .bridge(load_edges_csv("bridge.csv".as_ref())?)
//!     .presence(load_presence_csv("presence.csv".as_ref())?)
//!     .build()?;
//! let query = RouteQuery::new(src, dst).src_provider("aws");
//! println!("{}", serde_json::to_string(&engine.route(&query)?)?);
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod presence;
pub mod query;
pub mod response;
pub mod splice;

#[cfg(test)]
mod tests;

pub use builder::EngineBuilder;
pub use engine::{NearbyLink, RouteEngine};
pub use error::{RouteError, RouteResult};
pub use presence::{
    PresenceHit, PresencePoint, PresenceScope, PresenceSet, load_presence_csv, load_presence_reader,
};
pub use query::RouteQuery;
pub use response::RouteResponse;
pub use splice::{SplicedRoute, splice_presence};
