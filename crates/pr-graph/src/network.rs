//! Physical network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_km`, `edge_cable`,
//! `edge_path`) are sorted by source node and indexed by `EdgeId`.  Several
//! edges may join the same pair of nodes (a land route and a submarine
//! route, say); the graph is a multigraph.
//!
//! # Coordinate index
//!
//! Every endpoint coordinate seen during ingestion is registered against its
//! node in a [`CoordIndex`].  That set is the universe of "known nodes" a
//! query coordinate can attach to.  It is wider than `node_pos`, which keeps
//! only one representative coordinate per location.

use std::collections::HashMap;

use pr_core::{CableType, EdgeId, GeoPath, GeoPoint, Location, NodeId};

use crate::build::CoordinateDrift;
use crate::index::{CoordIndex, KnownCoord};

// ── PhysNetwork ───────────────────────────────────────────────────────────────

/// Directed cable graph in CSR format plus the coordinate index.
///
/// All array fields are `pub` for direct indexed access on hot paths.  Do
/// not construct directly; use [`PhysNetworkBuilder`] or
/// [`build_network`](crate::build_network).  Immutable once built, so a
/// single instance can be shared across threads without locking.
#[derive(Debug)]
pub struct PhysNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Normalized location of each node.  Indexed by `NodeId`.
    pub node_loc: Vec<Location>,

    /// Representative coordinate of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Cable length in kilometres, as supplied by the edge source.
    pub edge_length_km: Vec<f64>,

    /// Physical medium of each edge.
    pub edge_cable: Vec<CableType>,

    /// Route geometry, oriented from `edge_from` to `edge_to`.
    pub edge_path: Vec<GeoPath>,

    // ── Lookups ───────────────────────────────────────────────────────────
    by_location: HashMap<Location, NodeId>,
    coords:      CoordIndex,
}

impl PhysNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        PhysNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Number of directed edges of the given medium.
    pub fn edge_count_of(&self, cable: CableType) -> usize {
        self.edge_cable.iter().filter(|&&c| c == cable).count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range; nothing is allocated.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// The node keyed by `location`, if any.  `location` must already be
    /// normalized (built with [`Location::new`]).
    pub fn node_id(&self, location: &Location) -> Option<NodeId> {
        self.by_location.get(location).copied()
    }

    /// The coordinate index of every registered endpoint coordinate.
    pub fn coords(&self) -> &CoordIndex {
        &self.coords
    }

    /// The node owning the known coordinate nearest to `pos`.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<KnownCoord> {
        self.coords.nearest(pos)
    }

    /// Links whose geometry passes within `max_km` (exclusive) of `pos`,
    /// nearest first.  Each undirected link is reported once, by its
    /// lower-id direction.
    ///
    /// This is a linear scan over every geometry; it serves diagnostics, not
    /// the per-request hot path.
    pub fn edges_near(&self, pos: GeoPoint, max_km: f64) -> Vec<NearEdge> {
        let mut found: Vec<NearEdge> = (0..self.edge_count())
            .filter(|&e| self.edge_from[e] < self.edge_to[e])
            .filter_map(|e| {
                let proj = self.edge_path[e].project(pos);
                (proj.offset_km < max_km).then(|| NearEdge {
                    edge:      EdgeId::from_index(e),
                    offset_km: proj.offset_km,
                    along_km:  proj.along_km,
                })
            })
            .collect();
        found.sort_by(|a, b| a.offset_km.total_cmp(&b.offset_km).then(a.edge.cmp(&b.edge)));
        found
    }
}

/// A link found by [`PhysNetwork::edges_near`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NearEdge {
    pub edge:      EdgeId,
    /// Distance from the query point to the geometry.
    pub offset_km: f64,
    /// Distance along the geometry to the nearest point.
    pub along_km:  f64,
}

// ── PhysNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`PhysNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use pr_core::{CableType, GeoPath, GeoPoint, Location};
/// use pr_graph::PhysNetworkBuilder;
///
/// let (sj, la) = (GeoPoint::new(37.34, -121.89), GeoPoint::new(34.05, -118.24));
/// let mut b = PhysNetworkBuilder::new();
/// let (a, _) = b.add_location(Location::new("San Jose", "CA", "USA"), sj);
/// let (c, _) = b.add_location(Location::new("Los Angeles", "CA", "USA"), la);
/// b.add_link(a, c, 490.0, GeoPath::straight(sj, la), CableType::Land);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // both directions
/// ```
pub struct PhysNetworkBuilder {
    locations:          Vec<Location>,
    positions:          Vec<GeoPoint>,
    by_location:        HashMap<Location, NodeId>,
    coords:             HashMap<(u64, u64), (GeoPoint, NodeId)>,
    raw_edges:          Vec<RawEdge>,
    drift_tolerance_km: f64,
}

struct RawEdge {
    from:      NodeId,
    to:        NodeId,
    length_km: f64,
    cable:     CableType,
    path:      GeoPath,
}

impl PhysNetworkBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Pre-allocate for the expected number of nodes and directed edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            locations:          Vec::with_capacity(nodes),
            positions:          Vec::with_capacity(nodes),
            by_location:        HashMap::with_capacity(nodes),
            coords:             HashMap::with_capacity(nodes),
            raw_edges:          Vec::with_capacity(edges),
            drift_tolerance_km: pr_core::AugmentConfig::default().same_city_km,
        }
    }

    /// Coordinates of the same location further apart than this are reported
    /// as drift by [`add_location`](Self::add_location).
    pub fn drift_tolerance_km(mut self, km: f64) -> Self {
        self.drift_tolerance_km = km;
        self
    }

    /// Return the node for `location`, creating it at `pos` if new.
    ///
    /// An existing node's coordinate is overwritten by `pos`.  If the two
    /// differ by more than the drift tolerance the overwrite is returned as a
    /// [`CoordinateDrift`] so the caller can report it.
    pub fn add_location(&mut self, location: Location, pos: GeoPoint) -> (NodeId, Option<CoordinateDrift>) {
        if let Some(&id) = self.by_location.get(&location) {
            let previous = self.positions[id.index()];
            self.positions[id.index()] = pos;
            let drift = (!previous.is_close(pos, Some(self.drift_tolerance_km))).then(|| CoordinateDrift {
                distance_km: previous.distance_km(pos),
                location,
                previous,
                current: pos,
            });
            return (id, drift);
        }

        let id = NodeId::from_index(self.locations.len());
        self.locations.push(location.clone());
        self.positions.push(pos);
        self.by_location.insert(location, id);
        (id, None)
    }

    /// Register `pos` as a known coordinate of `node`.  The last registration
    /// of an identical coordinate wins.
    pub fn register_coordinate(&mut self, pos: GeoPoint, node: NodeId) {
        self.coords.insert((pos.lat.to_bits(), pos.lon.to_bits()), (pos, node));
    }

    /// Add a **directed** edge from `from` to `to`.  `path` must run from
    /// `from` to `to`.
    pub fn add_directed_edge(
        &mut self,
        from:      NodeId,
        to:        NodeId,
        length_km: f64,
        path:      GeoPath,
        cable:     CableType,
    ) {
        self.raw_edges.push(RawEdge { from, to, length_km, cable, path });
    }

    /// Add an edge in **both directions**; the reverse edge carries the
    /// reversed geometry, the same length and the same cable type.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, length_km: f64, path: GeoPath, cable: CableType) {
        let reversed = path.reversed();
        self.add_directed_edge(a, b, length_km, path, cable);
        self.add_directed_edge(b, a, length_km, reversed, cable);
    }

    /// Current position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.positions[id.index()]
    }

    pub fn node_id(&self, location: &Location) -> Option<NodeId> {
        self.by_location.get(location).copied()
    }

    pub fn node_count(&self) -> usize { self.locations.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`PhysNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(C log C) for the
    /// R-tree bulk load, where E = edges and C = registered coordinates.
    pub fn build(self) -> PhysNetwork {
        let node_count = self.locations.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps insertion order among a node's out-edges.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let mut edge_from      = Vec::with_capacity(edge_count);
        let mut edge_to        = Vec::with_capacity(edge_count);
        let mut edge_length_km = Vec::with_capacity(edge_count);
        let mut edge_cable     = Vec::with_capacity(edge_count);
        let mut edge_path      = Vec::with_capacity(edge_count);
        for e in raw {
            edge_from.push(e.from);
            edge_to.push(e.to);
            edge_length_km.push(e.length_km);
            edge_cable.push(e.cable);
            edge_path.push(e.path);
        }

        let coords = CoordIndex::bulk_load(self.coords.into_values());

        PhysNetwork {
            node_loc: self.locations,
            node_pos: self.positions,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_km,
            edge_cable,
            edge_path,
            by_location: self.by_location,
            coords,
        }
    }
}

impl Default for PhysNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
