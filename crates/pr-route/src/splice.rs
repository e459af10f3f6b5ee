//! Presence splicing: insert presence points into a solved route.
//!
//! # Output shape
//!
//! ```text
//! coordinates:  c0      c1      c2   …   cN
//! segments:        s0      s1   …   sN-1
//! cable_types:     t0      t1   …   tN-1
//! ```
//!
//! Segment `i` runs from `coordinates[i]` to `coordinates[i + 1]`.  Without
//! presence points every edge is one segment; every accepted presence point
//! splits its edge once more.

use pr_core::{CableType, CutAt, GeoPath, GeoPoint, NodeId, SpliceConfig};
use pr_graph::{QueryGraph, Route};

use crate::presence::{PresencePoint, PresenceScope};
use crate::{RouteError, RouteResult};

/// A route expanded into emitted coordinates and geometry segments.
#[derive(Clone, Debug, PartialEq)]
pub struct SplicedRoute {
    /// Edge lengths plus every traversed spur (twice per spur).
    pub total_distance_km: f64,
    /// Stops in order: route nodes and inserted presence points.
    pub coordinates:       Vec<GeoPoint>,
    /// Geometry between consecutive stops.
    pub segments:          Vec<GeoPath>,
    /// Medium of each segment.
    pub cable_types:       Vec<CableType>,
    /// Presence points that were spliced in, in route order.
    pub inserted:          Vec<PresencePoint>,
}

impl SplicedRoute {
    /// A two-stop route along a single straight land segment.
    pub fn direct(from: GeoPoint, to: GeoPoint) -> Self {
        Self {
            total_distance_km: from.distance_km(to),
            coordinates:       vec![from, to],
            segments:          vec![GeoPath::straight(from, to)],
            cable_types:       vec![CableType::Land],
            inserted:          Vec::new(),
        }
    }
}

/// Walk `route` edge by edge, splicing in presence points from `scope`.
///
/// With `scope == None` no presence search happens and every edge is
/// emitted unchanged.  Edges shorter than `cfg.min_hop_km` are never
/// searched.
pub fn splice_presence(
    graph: &QueryGraph<'_>,
    route: &Route,
    scope: Option<&PresenceScope<'_>>,
    cfg:   &SpliceConfig,
) -> RouteResult<SplicedRoute> {
    let mut out = SplicedRoute {
        total_distance_km: 0.0,
        coordinates:       Vec::with_capacity(route.nodes.len()),
        segments:          Vec::with_capacity(route.edges.len()),
        cable_types:       Vec::with_capacity(route.edges.len()),
        inserted:          Vec::new(),
    };

    for (i, &edge_id) in route.edges.iter().enumerate() {
        let edge = graph.edge(edge_id);
        let n1 = node_pos(graph, route.nodes[i])?;
        let n2 = node_pos(graph, route.nodes[i + 1])?;
        out.total_distance_km += edge.length_km;

        let hits = match scope {
            Some(scope) if edge.length_km >= cfg.min_hop_km => {
                scope.near_path(edge.path, cfg.max_point_to_path_km)
            }
            _ => Vec::new(),
        };

        out.coordinates.push(n1);
        out.cable_types.push(edge.cable);
        if hits.is_empty() {
            out.segments.push(edge.path.clone());
            continue;
        }

        let mut remaining = edge.path.clone();
        for hit in hits {
            let p = hit.point.pos;
            let last = out.coordinates.last().copied().unwrap_or(n1);
            if p.is_close(last, Some(cfg.min_insert_spacing_km))
                || p.is_close(n2, Some(cfg.min_insert_spacing_km))
            {
                log::debug!("skipping {}/{} at {p}: too close to a neighbouring stop", hit.point.provider, hit.point.region);
                continue;
            }

            let cut = remaining.cut(CutAt::Point(p))?;
            if !cut.is_split() {
                continue;
            }
            let spur_km = cut.spur_km();
            let mut parts = cut.segments.into_iter();
            let (Some(head), Some(tail)) = (parts.next(), parts.next()) else {
                return Err(RouteError::Internal("split cut without two segments".into()));
            };

            out.total_distance_km += 2.0 * spur_km;
            out.segments.push(head);
            out.coordinates.push(p);
            out.cable_types.push(edge.cable);
            out.inserted.push(hit.point.clone());
            log::debug!(
                "inserted {}/{} at {p} (spur {spur_km:.2} km, {:.1} km along)",
                hit.point.provider, hit.point.region, hit.along_km
            );
            remaining = tail;
        }
        out.segments.push(remaining);
    }

    if let Some(&last) = route.nodes.last() {
        out.coordinates.push(node_pos(graph, last)?);
    }
    Ok(out)
}

fn node_pos(graph: &QueryGraph<'_>, node: NodeId) -> RouteResult<GeoPoint> {
    graph
        .node_pos(node)
        .ok_or_else(|| RouteError::Internal(format!("route visits unknown node {node}")))
}
