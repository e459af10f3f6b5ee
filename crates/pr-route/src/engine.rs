//! The route engine: one immutable network, many concurrent queries.
//!
//! # Query pipeline
//!
//! ```text
//! validate ─► presence scope ─► augment src ─► augment dst ─► route ─► splice ─► assemble
//! ```
//!
//! Each query builds its own [`QueryGraph`] over the shared network and drops
//! it on return.  Nothing in the engine is mutated after construction, so
//! `&RouteEngine` can be shared freely across threads.

use pr_core::{GeoPoint, Location, NodeId, RouteConfig};
use pr_graph::{DijkstraRouter, PhysNetwork, QueryGraph, Router};

use crate::presence::{PresenceScope, PresenceSet};
use crate::query::RouteQuery;
use crate::response::RouteResponse;
use crate::splice::{SplicedRoute, splice_presence};
use crate::{RouteError, RouteResult};

const SOURCE_LABEL: &str = "source";
const DESTINATION_LABEL: &str = "destination";

/// A link reported by [`RouteEngine::edges_near`].
#[derive(Clone, Debug, PartialEq)]
pub struct NearbyLink<'a> {
    pub from:      &'a Location,
    pub to:        &'a Location,
    pub offset_km: f64,
}

/// Answers route queries against a shared [`PhysNetwork`].
pub struct RouteEngine<R: Router = DijkstraRouter> {
    network:  PhysNetwork,
    presence: PresenceSet,
    config:   RouteConfig,
    router:   R,
}

impl<R: Router> RouteEngine<R> {
    /// Assemble an engine.  Fails if `config` does not validate.
    pub fn new(network: PhysNetwork, presence: PresenceSet, config: RouteConfig, router: R) -> RouteResult<Self> {
        config.validate().map_err(|e| RouteError::Config(e.to_string()))?;
        Ok(Self { network, presence, config, router })
    }

    pub fn network(&self) -> &PhysNetwork {
        &self.network
    }

    pub fn presence(&self) -> &PresenceSet {
        &self.presence
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    // ── Coordinate queries ────────────────────────────────────────────────

    /// Answer one query.
    pub fn route(&self, query: &RouteQuery) -> RouteResult<RouteResponse> {
        self.solve(query).map(RouteResponse::from)
    }

    /// Like [`route`](Self::route) but returns the typed route before
    /// assembly.
    pub fn solve(&self, query: &RouteQuery) -> RouteResult<SplicedRoute> {
        let (src, dst) = (query.src(), query.dst());
        for p in [src, dst] {
            if !p.is_valid() {
                return Err(RouteError::InvalidCoordinate(p));
            }
        }

        // Named providers are checked even without presence search, and
        // before any graph work.
        let scope = self.presence.scope(&query.providers())?;
        let scope = query.search_presence.then_some(scope);

        let mut graph = QueryGraph::new(&self.network);
        let src_node = self.attach(&mut graph, src, SOURCE_LABEL)?;
        let dst_node = self.attach(&mut graph, dst, DESTINATION_LABEL)?;

        if src_node == dst_node {
            log::debug!("{src} and {dst} resolve to the same node; direct route");
            return Ok(SplicedRoute::direct(src, dst));
        }

        let route = self.router.route(&graph, src_node, dst_node)?;
        log::debug!("{src} -> {dst}: {} hops, cost {:.4}", route.hops(), route.cost);
        splice_presence(&graph, &route, scope.as_ref(), &self.config.splice)
    }

    /// Augment `point` into `graph`, rejecting it if it ends up with no
    /// edges at all.  Checked per point, so a source that could not attach
    /// to the network is not rescued by the destination linking to it.
    fn attach(&self, graph: &mut QueryGraph<'_>, point: GeoPoint, label: &'static str) -> RouteResult<NodeId> {
        let node = graph.augment(point, label, &self.config.augment)?.node;
        if graph.out_degree(node) == 0 {
            return Err(RouteError::Unconnected { label, point });
        }
        Ok(node)
    }

    /// Answer a batch of queries.  With the `parallel` feature the batch is
    /// spread over Rayon's thread pool; results keep the input order.
    pub fn route_all(&self, queries: &[RouteQuery]) -> Vec<RouteResult<RouteResponse>> {
        #[cfg(not(feature = "parallel"))]
        {
            queries.iter().map(|q| self.route(q)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            queries.par_iter().map(|q| self.route(q)).collect()
        }
    }

    // ── Named-location queries ────────────────────────────────────────────

    /// Route between two locations of the network.  `providers` selects the
    /// presence scope; `None` disables presence search and an empty slice
    /// searches every provider.
    pub fn route_locations(
        &self,
        from:      &Location,
        to:        &Location,
        providers: Option<&[&str]>,
    ) -> RouteResult<RouteResponse> {
        let scope: Option<PresenceScope<'_>> = providers.map(|names| self.presence.scope(names)).transpose()?;
        let lookup = |loc: &Location| {
            self.network
                .node_id(loc)
                .ok_or_else(|| RouteError::UnknownLocation(loc.clone()))
        };
        let (a, b) = (lookup(from)?, lookup(to)?);

        let graph = QueryGraph::new(&self.network);
        let route = self.router.route(&graph, a, b)?;
        splice_presence(&graph, &route, scope.as_ref(), &self.config.splice).map(RouteResponse::from)
    }

    /// The location with the known coordinate nearest to `point`, and the
    /// distance to it.
    pub fn nearest_location(&self, point: GeoPoint) -> Option<(&Location, f64)> {
        self.network
            .nearest_node(point)
            .map(|hit| (&self.network.node_loc[hit.node.index()], hit.distance_km))
    }

    /// Links whose geometry passes within `max_km` of `point`, nearest first.
    pub fn edges_near(&self, point: GeoPoint, max_km: f64) -> Vec<NearbyLink<'_>> {
        let net = &self.network;
        net.edges_near(point, max_km)
            .into_iter()
            .map(|near| {
                let e = near.edge.index();
                NearbyLink {
                    from:      &net.node_loc[net.edge_from[e].index()],
                    to:        &net.node_loc[net.edge_to[e].index()],
                    offset_km: near.offset_km,
                }
            })
            .collect()
    }
}
