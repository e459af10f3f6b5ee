//! Spatial index over known endpoint coordinates.
//!
//! Coordinates are stored as unit vectors on the sphere.  The straight-line
//! (chord) distance between unit vectors grows monotonically with the
//! great-circle distance, so the R-tree's Euclidean nearest/within queries
//! give exact great-circle answers at any latitude, including across the
//! antimeridian.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use pr_core::geo::chord_for_km;
use pr_core::{GeoPoint, NodeId};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct CoordEntry {
    xyz:  [f64; 3],
    pos:  GeoPoint,
    node: NodeId,
}

impl RTreeObject for CoordEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xyz)
    }
}

impl PointDistance for CoordEntry {
    /// Squared chord length through the unit sphere.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.xyz[0] - point[0];
        let dy = self.xyz[1] - point[1];
        let dz = self.xyz[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── CoordIndex ────────────────────────────────────────────────────────────────

/// A known coordinate together with the node it belongs to and its distance
/// from the query point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KnownCoord {
    pub pos:         GeoPoint,
    pub node:        NodeId,
    pub distance_km: f64,
}

/// Coordinate → node index used to attach query points to the graph.
#[derive(Debug)]
pub struct CoordIndex {
    tree: RTree<CoordEntry>,
}

impl CoordIndex {
    pub fn empty() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load `(coordinate, node)` pairs in O(N log N).
    pub fn bulk_load<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (GeoPoint, NodeId)>,
    {
        let entries: Vec<CoordEntry> = entries
            .into_iter()
            .map(|(pos, node)| CoordEntry { xyz: pos.to_unit_vector(), pos, node })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The closest known coordinate to `pos`, or `None` if the index is empty.
    pub fn nearest(&self, pos: GeoPoint) -> Option<KnownCoord> {
        self.tree
            .nearest_neighbor(&pos.to_unit_vector())
            .map(|e| known(e, pos))
    }

    /// Every known coordinate within `km` (inclusive) of `pos`, nearest first.
    pub fn within_km(&self, pos: GeoPoint, km: f64) -> Vec<KnownCoord> {
        // Slack on the chord so float error never drops a boundary entry; the
        // exact haversine filter below decides.
        let chord = chord_for_km(km) + 1e-12;
        let mut found: Vec<KnownCoord> = self
            .tree
            .locate_within_distance(pos.to_unit_vector(), chord * chord)
            .map(|e| known(e, pos))
            .filter(|k| k.distance_km <= km)
            .collect();
        found.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then(a.node.cmp(&b.node))
        });
        found
    }
}

impl Default for CoordIndex {
    fn default() -> Self {
        Self::empty()
    }
}

fn known(entry: &CoordEntry, from: GeoPoint) -> KnownCoord {
    KnownCoord {
        pos:         entry.pos,
        node:        entry.node,
        distance_km: from.distance_km(entry.pos),
    }
}
