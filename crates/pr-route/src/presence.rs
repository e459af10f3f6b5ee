//! Third-party presence points (cloud regions, IXPs, …) and their loader.
//!
//! # CSV format
//!
//! ```csv
//! provider,region,latitude,longitude
//! aws,us-west-1,37.2379,-121.7946
//! aws,us-east-1,39.0127,-77.5342
//! ```
//!
//! `region` may be empty.  Provider names are trimmed and lower-cased, so
//! `AWS ` and `aws` name the same provider.
//!
//! Each provider keeps its own R-tree over unit-sphere coordinates, so
//! "which points lie near this path" only touches points in the bounding
//! sphere of each path segment.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use serde::{Deserialize, Serialize};

use pr_core::geo::chord_for_km;
use pr_core::{GeoPath, GeoPoint};

use crate::{RouteError, RouteResult};

// ── PresencePoint ─────────────────────────────────────────────────────────────

/// A known infrastructure coordinate tagged with its provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresencePoint {
    pub provider: String,
    pub region:   String,
    pub pos:      GeoPoint,
}

impl PresencePoint {
    pub fn new(provider: &str, region: &str, pos: GeoPoint) -> Self {
        Self {
            provider: normalize_provider(provider),
            region:   region.trim().to_owned(),
            pos,
        }
    }
}

/// Trimmed, lower-cased provider key.
pub fn normalize_provider(name: &str) -> String {
    name.trim().to_lowercase()
}

// ── Spatial index ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct PresenceEntry {
    xyz: [f64; 3],
    idx: usize,
}

impl RTreeObject for PresenceEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xyz)
    }
}

impl PointDistance for PresenceEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.xyz[0] - point[0];
        let dy = self.xyz[1] - point[1];
        let dz = self.xyz[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

#[derive(Debug)]
struct ProviderPoints {
    points: Vec<PresencePoint>,
    tree:   RTree<PresenceEntry>,
}

impl ProviderPoints {
    fn new(points: Vec<PresencePoint>) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(idx, p)| PresenceEntry { xyz: p.pos.to_unit_vector(), idx })
            .collect();
        Self { points, tree: RTree::bulk_load(entries) }
    }
}

// ── PresenceSet ───────────────────────────────────────────────────────────────

/// All presence points, grouped by provider.  Built once, read-only after.
#[derive(Debug, Default)]
pub struct PresenceSet {
    providers: BTreeMap<String, ProviderPoints>,
}

impl PresenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group `points` by provider.  Points with an out-of-range coordinate
    /// are dropped with a warning.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = PresencePoint>,
    {
        let mut grouped: BTreeMap<String, Vec<PresencePoint>> = BTreeMap::new();
        for mut p in points {
            if !p.pos.is_valid() {
                log::warn!("dropping presence point {}/{}: invalid coordinate {}", p.provider, p.region, p.pos);
                continue;
            }
            p.provider = normalize_provider(&p.provider);
            grouped.entry(p.provider.clone()).or_default().push(p);
        }
        let providers = grouped
            .into_iter()
            .map(|(name, pts)| (name, ProviderPoints::new(pts)))
            .collect();
        Self { providers }
    }

    /// Total number of points across all providers.
    pub fn len(&self) -> usize {
        self.providers.values().map(|p| p.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Provider names in sorted order.
    pub fn providers(&self) -> impl Iterator<Item = &str> + '_ {
        self.providers.keys().map(String::as_str)
    }

    pub fn contains_provider(&self, name: &str) -> bool {
        self.providers.contains_key(&normalize_provider(name))
    }

    /// Every point of one provider, or `None` if the provider is unknown.
    pub fn points(&self, provider: &str) -> Option<&[PresencePoint]> {
        self.providers
            .get(&normalize_provider(provider))
            .map(|p| p.points.as_slice())
    }

    /// A named region of a provider, e.g. `("aws", "us-west-1")`.
    pub fn region(&self, provider: &str, region: &str) -> Option<&PresencePoint> {
        let region = region.trim();
        self.points(provider)?
            .iter()
            .find(|p| p.region.eq_ignore_ascii_case(region))
    }

    /// The providers a query searches.
    ///
    /// An empty `names` selects every provider.  Any name that is not a
    /// known provider fails the whole scope with
    /// [`RouteError::UnknownProvider`].
    pub fn scope(&self, names: &[&str]) -> RouteResult<PresenceScope<'_>> {
        if names.is_empty() {
            return Ok(PresenceScope { providers: self.providers.values().collect() });
        }
        let mut keys = BTreeSet::new();
        for name in names {
            let key = normalize_provider(name);
            if !self.providers.contains_key(&key) {
                return Err(RouteError::UnknownProvider(name.trim().to_owned()));
            }
            keys.insert(key);
        }
        let providers = keys.iter().filter_map(|k| self.providers.get(k)).collect();
        Ok(PresenceScope { providers })
    }
}

// ── PresenceScope ─────────────────────────────────────────────────────────────

/// A presence point near a path, with its projection onto the path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PresenceHit<'p> {
    pub point:     &'p PresencePoint,
    /// Distance along the path to the foot of the perpendicular.
    pub along_km:  f64,
    /// Distance from the point to the path.
    pub offset_km: f64,
}

/// The providers selected for one query.
#[derive(Debug)]
pub struct PresenceScope<'p> {
    providers: Vec<&'p ProviderPoints>,
}

impl<'p> PresenceScope<'p> {
    /// Points whose distance to `path` is below `max_km`, ordered by their
    /// projected distance along the path.
    pub fn near_path(&self, path: &GeoPath, max_km: f64) -> Vec<PresenceHit<'p>> {
        let pts = path.points();
        let segments: Vec<(GeoPoint, GeoPoint)> = match pts {
            [only] => vec![(*only, *only)],
            _ => pts.windows(2).map(|w| (w[0], w[1])).collect(),
        };

        let mut hits = Vec::new();
        for &provider in &self.providers {
            // Any point within `max_km` of a segment is within
            // `half_length + max_km` of its midpoint.
            let mut candidates = BTreeSet::new();
            for &(a, b) in &segments {
                let mid = a.intermediate(b, 0.5);
                let chord = chord_for_km(a.distance_km(b) * 0.5 + max_km) + 1e-12;
                candidates.extend(
                    provider
                        .tree
                        .locate_within_distance(mid.to_unit_vector(), chord * chord)
                        .map(|e| e.idx),
                );
            }
            for idx in candidates {
                let point = &provider.points[idx];
                let proj = path.project(point.pos);
                if proj.offset_km < max_km {
                    hits.push(PresenceHit { point, along_km: proj.along_km, offset_km: proj.offset_km });
                }
            }
        }
        hits.sort_by(|a, b| {
            a.along_km
                .total_cmp(&b.along_km)
                .then(a.offset_km.total_cmp(&b.offset_km))
        });
        hits
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PresenceRecord {
    provider:  String,
    #[serde(default)]
    region:    String,
    latitude:  f64,
    longitude: f64,
}

/// Load a [`PresenceSet`] from a CSV file with a header row.
pub fn load_presence_csv(path: &Path) -> RouteResult<PresenceSet> {
    let file = std::fs::File::open(path)?;
    load_presence_reader(file)
}

/// Like [`load_presence_csv`] but accepts any `Read` source.
pub fn load_presence_reader<R: Read>(reader: R) -> RouteResult<PresenceSet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let points = csv_reader
        .deserialize::<PresenceRecord>()
        .map(|row| {
            let r = row.map_err(|e| RouteError::Load(e.to_string()))?;
            Ok(PresencePoint::new(&r.provider, &r.region, GeoPoint::new(r.latitude, r.longitude)))
        })
        .collect::<RouteResult<Vec<_>>>()?;

    let set = PresenceSet::from_points(points);
    log::info!("loaded {} presence points from {} providers", set.len(), set.providers().count());
    Ok(set)
}
