//! Request-scoped graph overlay.
//!
//! A [`QueryGraph`] borrows the shared [`PhysNetwork`] and owns only what a
//! single request adds to it: synthetic query nodes, their connection edges,
//! and the query coordinates themselves.  Overlay ids continue where the
//! base ids stop, so `NodeId`/`EdgeId` values from the base network remain
//! valid in the overlay and the router sees one graph.
//!
//! Dropping the `QueryGraph` discards the request's additions; the shared
//! network is never written.

use std::collections::HashMap;

use pr_core::{AugmentConfig, CableType, EdgeId, GeoPath, GeoPoint, Location, NodeId};

use crate::index::KnownCoord;
use crate::network::PhysNetwork;
use crate::{GraphError, GraphResult};

// ── Public types ──────────────────────────────────────────────────────────────

/// Outcome of [`QueryGraph::augment`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Augmentation {
    /// The node the query coordinate resolved to.
    pub node:        NodeId,
    /// `true` when an existing node was reused instead of a synthetic one.
    pub reused:      bool,
    /// Number of bidirectional connection links added.
    pub connections: usize,
}

/// Borrowed view of one edge of a [`QueryGraph`].
#[derive(Copy, Clone, Debug)]
pub struct EdgeRef<'a> {
    pub id:        EdgeId,
    pub from:      NodeId,
    pub to:        NodeId,
    pub length_km: f64,
    pub cable:     CableType,
    pub path:      &'a GeoPath,
}

struct OverlayEdge {
    from:      NodeId,
    to:        NodeId,
    length_km: f64,
    path:      GeoPath,
}

// ── QueryGraph ────────────────────────────────────────────────────────────────

/// The shared network plus one request's ephemeral nodes and edges.
pub struct QueryGraph<'n> {
    base:      &'n PhysNetwork,
    loc:       Vec<Location>,
    pos:       Vec<GeoPoint>,
    edges:     Vec<OverlayEdge>,
    /// Overlay out-edges, for base and overlay nodes alike.
    out:       HashMap<NodeId, Vec<EdgeId>>,
    /// Query coordinates registered by earlier `augment` calls.
    coords:    Vec<(GeoPoint, NodeId)>,
    by_label:  HashMap<Location, NodeId>,
}

impl<'n> QueryGraph<'n> {
    pub fn new(base: &'n PhysNetwork) -> Self {
        Self {
            base,
            loc:      Vec::new(),
            pos:      Vec::new(),
            edges:    Vec::new(),
            out:      HashMap::new(),
            coords:   Vec::new(),
            by_label: HashMap::new(),
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.base.node_count() + self.loc.len()
    }

    pub fn edge_count(&self) -> usize {
        self.base.edge_count() + self.edges.len()
    }

    /// Nodes added by this request.
    pub fn overlay_node_count(&self) -> usize {
        self.loc.len()
    }

    /// Directed edges added by this request.
    pub fn overlay_edge_count(&self) -> usize {
        self.edges.len()
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Outgoing edges of `node`: its base edges first, then overlay edges.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let base = (node.index() < self.base.node_count())
            .then(|| self.base.out_edges(node))
            .into_iter()
            .flatten();
        let overlay = self.out.get(&node).into_iter().flatten().copied();
        base.chain(overlay)
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        let base = if node.index() < self.base.node_count() { self.base.out_degree(node) } else { 0 };
        base + self.out.get(&node).map_or(0, Vec::len)
    }

    /// Full view of edge `id`.
    ///
    /// # Panics
    /// If `id` is not an edge of this graph.
    pub fn edge(&self, id: EdgeId) -> EdgeRef<'_> {
        let i = id.index();
        let base = self.base;
        if i < base.edge_count() {
            return EdgeRef {
                id,
                from:      base.edge_from[i],
                to:        base.edge_to[i],
                length_km: base.edge_length_km[i],
                cable:     base.edge_cable[i],
                path:      &base.edge_path[i],
            };
        }
        let e = &self.edges[i - base.edge_count()];
        EdgeRef {
            id,
            from:      e.from,
            to:        e.to,
            length_km: e.length_km,
            cable:     CableType::Land,
            path:      &e.path,
        }
    }

    #[inline]
    pub fn edge_to(&self, id: EdgeId) -> NodeId {
        let i = id.index();
        match i.checked_sub(self.base.edge_count()) {
            None => self.base.edge_to[i],
            Some(j) => self.edges[j].to,
        }
    }

    #[inline]
    pub fn edge_from(&self, id: EdgeId) -> NodeId {
        let i = id.index();
        match i.checked_sub(self.base.edge_count()) {
            None => self.base.edge_from[i],
            Some(j) => self.edges[j].from,
        }
    }

    #[inline]
    pub fn edge_length_km(&self, id: EdgeId) -> f64 {
        let i = id.index();
        match i.checked_sub(self.base.edge_count()) {
            None => self.base.edge_length_km[i],
            Some(j) => self.edges[j].length_km,
        }
    }

    /// Representative coordinate of `node`.
    pub fn node_pos(&self, node: NodeId) -> Option<GeoPoint> {
        let i = node.index();
        match i.checked_sub(self.base.node_count()) {
            None => self.base.node_pos.get(i).copied(),
            Some(j) => self.pos.get(j).copied(),
        }
    }

    pub fn location(&self, node: NodeId) -> Option<&Location> {
        let i = node.index();
        match i.checked_sub(self.base.node_count()) {
            None => self.base.node_loc.get(i),
            Some(j) => self.loc.get(j),
        }
    }

    pub fn node_id(&self, location: &Location) -> Option<NodeId> {
        self.base
            .node_id(location)
            .or_else(|| self.by_label.get(location).copied())
    }

    // ── Augmentation ──────────────────────────────────────────────────────

    /// Attach `point` to the graph and return the node it resolved to.
    ///
    /// 1. The nearest known coordinate fixes the radius:
    ///    `max(connect_radius_km, nearest_km * widen_factor)`.
    /// 2. An identical known coordinate, or failing that a nearest one within
    ///    `same_city_km`, is reused as the query node.  Otherwise a synthetic
    ///    node labelled `label` is created at `point`.
    /// 3. Every candidate within the radius that is neither the query node
    ///    nor same-city close to `point` gets a bidirectional land link whose
    ///    length is the great-circle distance and whose geometry is the
    ///    straight two-point path.  Several coordinates of one node yield a
    ///    single link, to the nearest.
    ///
    /// With no known coordinates at all the node is created without links;
    /// the caller decides what an isolated query node means.
    pub fn augment(&mut self, point: GeoPoint, label: &str, cfg: &AugmentConfig) -> GraphResult<Augmentation> {
        if !point.is_valid() {
            return Err(GraphError::InvalidCoordinate(point));
        }

        let Some(nearest) = self.nearest_known(point) else {
            let node = self.add_synthetic(point, label);
            self.coords.push((point, node));
            log::debug!("{label} {point}: no known coordinates, node {node} left isolated");
            return Ok(Augmentation { node, reused: false, connections: 0 });
        };

        let radius = cfg.connect_radius_km.max(nearest.distance_km * cfg.widen_factor);
        let candidates = self.known_within(point, radius);

        let reuse = candidates
            .iter()
            .find(|k| k.pos.is_close(point, None))
            .or_else(|| (nearest.distance_km < cfg.same_city_km).then_some(&nearest))
            .map(|k| k.node);
        let (node, reused) = match reuse {
            Some(node) => (node, true),
            None => (self.add_synthetic(point, label), false),
        };
        self.coords.push((point, node));

        let mut linked: Vec<NodeId> = Vec::new();
        for cand in &candidates {
            if cand.node == node
                || cand.pos.is_close(point, Some(cfg.same_city_km))
                || linked.contains(&cand.node)
            {
                continue;
            }
            self.add_link(node, cand.node, point, cand.pos);
            linked.push(cand.node);
        }

        log::debug!(
            "{label} {point}: node {node} ({}), radius {radius:.1} km, {} links",
            if reused { "reused" } else { "synthetic" },
            linked.len(),
        );
        Ok(Augmentation { node, reused, connections: linked.len() })
    }

    // ── Known coordinates (base index + this request's query points) ─────

    fn nearest_known(&self, pos: GeoPoint) -> Option<KnownCoord> {
        let overlay = self.coords.iter().map(|&(p, node)| KnownCoord {
            pos: p,
            node,
            distance_km: pos.distance_km(p),
        });
        self.base
            .coords()
            .nearest(pos)
            .into_iter()
            .chain(overlay)
            .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
    }

    fn known_within(&self, pos: GeoPoint, km: f64) -> Vec<KnownCoord> {
        let mut found = self.base.coords().within_km(pos, km);
        found.extend(
            self.coords
                .iter()
                .map(|&(p, node)| KnownCoord { pos: p, node, distance_km: pos.distance_km(p) })
                .filter(|k| k.distance_km <= km),
        );
        found.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km).then(a.node.cmp(&b.node)));
        found
    }

    // ── Mutation (overlay only) ───────────────────────────────────────────

    fn add_synthetic(&mut self, pos: GeoPoint, label: &str) -> NodeId {
        let mut location = Location::synthetic(label);
        let mut n = 2;
        while self.node_id(&location).is_some() {
            location = Location::synthetic(&format!("{label}#{n}"));
            n += 1;
        }
        let id = NodeId::from_index(self.node_count());
        self.loc.push(location.clone());
        self.pos.push(pos);
        self.by_label.insert(location, id);
        id
    }

    fn add_link(&mut self, a: NodeId, b: NodeId, a_pos: GeoPoint, b_pos: GeoPoint) {
        let length_km = a_pos.distance_km(b_pos);
        let path = GeoPath::straight(a_pos, b_pos);
        let reversed = path.reversed();
        self.push_edge(a, b, length_km, path);
        self.push_edge(b, a, length_km, reversed);
    }

    fn push_edge(&mut self, from: NodeId, to: NodeId, length_km: f64, path: GeoPath) {
        let id = EdgeId::from_index(self.edge_count());
        self.edges.push(OverlayEdge { from, to, length_km, path });
        self.out.entry(from).or_default().push(id);
    }
}
