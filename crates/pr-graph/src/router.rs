//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `pr-route` calls routing via the [`Router`] trait, so applications can
//! swap in a different search (A*, k-shortest, policy-constrained) without
//! touching the engine.  The default [`DijkstraRouter`] is exact for the
//! non-negative cost below.
//!
//! # Cost
//!
//! Every edge costs `1 + length_km / hop_km`.  The constant term charges each
//! hop for its terminal equipment, so the solver prefers fewer hops unless a
//! hop is long relative to `hop_km`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use pr_core::{DEFAULT_HOP_KM, EdgeId, NodeId};

use crate::query::QueryGraph;
use crate::GraphError;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes visited in order, source first.  `nodes.len() == edges.len() + 1`.
    pub nodes: Vec<NodeId>,
    /// Edges to traverse in order, from source to destination.
    pub edges: Vec<EdgeId>,
    /// Sum of edge costs along the route.
    pub cost:  f64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of hops (edges).
    pub fn hops(&self) -> usize {
        self.edges.len()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve concurrent
/// requests, each on its own [`QueryGraph`].
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` yields an empty route; an unreachable `to` yields
    /// [`GraphError::NoPath`].
    fn route(&self, graph: &QueryGraph<'_>, from: NodeId, to: NodeId) -> Result<Route, GraphError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra's algorithm over the overlay graph with the hop-weighted cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DijkstraRouter {
    /// Cost constant `K` in `1 + length_km / K`.
    pub hop_km: f64,
}

impl DijkstraRouter {
    pub fn new(hop_km: f64) -> Self {
        Self { hop_km }
    }

    /// Cost of traversing one edge of `length_km`.
    #[inline]
    pub fn edge_cost(&self, length_km: f64) -> f64 {
        1.0 + length_km / self.hop_km
    }
}

impl Default for DijkstraRouter {
    fn default() -> Self {
        Self::new(DEFAULT_HOP_KM)
    }
}

impl Router for DijkstraRouter {
    fn route(&self, graph: &QueryGraph<'_>, from: NodeId, to: NodeId) -> Result<Route, GraphError> {
        dijkstra(self, graph, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(
    router: &DijkstraRouter,
    graph:  &QueryGraph<'_>,
    from:   NodeId,
    to:     NodeId,
) -> Result<Route, GraphError> {
    let n = graph.node_count();
    for node in [from, to] {
        if node.index() >= n {
            return Err(GraphError::NodeNotFound(node));
        }
    }
    if from == to {
        return Ok(Route { nodes: vec![from], edges: vec![], cost: 0.0 });
    }

    // dist[v] = best known cost to reach v.
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to(edge);
            let new_cost = cost + router.edge_cost(graph.edge_length_km(edge));

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((OrderedFloat(new_cost), neighbor)));
            }
        }
    }

    Err(GraphError::NoPath { from, to })
}

fn reconstruct(
    graph:     &QueryGraph<'_>,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    cost:      f64,
) -> Route {
    let mut edges = Vec::new();
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_from(e);
        nodes.push(cur);
    }
    edges.reverse();
    nodes.reverse();
    Route { nodes, edges, cost }
}
