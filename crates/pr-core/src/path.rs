//! Path geometry: an ordered, non-empty sequence of coordinates.
//!
//! # Distances
//!
//! Path length is the sum of great-circle distances between consecutive
//! vertices.  Projection and interpolation follow the great-circle arcs
//! between vertices, so cutting a path at a distance and re-measuring the two
//! halves gives back the original length up to float error.
//!
//! # Cutting
//!
//! ```text
//!   a ──────────── cp ──────────── b          cut at distance(cp)
//!                  │
//!                  p                          insert point off the path
//!
//!   head: a … cp, p        tail: p, cp … b   (spur cp↔p on both halves)
//! ```

use crate::geo::project_on_arc;
use crate::{CoreError, CoreResult, GeoPoint};

/// Distances within this many kilometres of a vertex, of zero, or of the
/// full length are treated as landing exactly on them.
const CUT_TOLERANCE_KM: f64 = 1e-6;

// ── GeoPath ───────────────────────────────────────────────────────────────────

/// Ordered, non-empty vertex list describing the physical route of one edge.
/// Direction matters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<GeoPoint>"))]
pub struct GeoPath(Vec<GeoPoint>);

impl TryFrom<Vec<GeoPoint>> for GeoPath {
    type Error = CoreError;

    fn try_from(points: Vec<GeoPoint>) -> CoreResult<Self> {
        GeoPath::new(points)
    }
}

/// Where a point projects onto a path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathProjection {
    /// Distance along the path from its first vertex to `foot`.
    pub along_km: f64,
    /// Great-circle distance from the projected point to `foot`.
    pub offset_km: f64,
    /// Nearest point on the path.
    pub foot: GeoPoint,
}

/// Where to cut a path.  Exactly one of a distance or an insert point is
/// the normal case; `DistanceWithPoint` is for callers that already
/// projected.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CutAt {
    /// Cut at this distance along the path; never adds a spur.
    Distance(f64),
    /// Cut where `point` projects onto the path, adding a spur to `point`
    /// when it is off the path.
    Point(GeoPoint),
    /// Cut at `distance_km`, adding a spur to `point` when it differs from
    /// the cut coordinate.
    DistanceWithPoint { distance_km: f64, point: GeoPoint },
}

/// Result of [`GeoPath::cut`].
#[derive(Clone, Debug, PartialEq)]
pub struct PathCut {
    /// Either the original path alone, or exactly two sub-paths.
    pub segments: Vec<GeoPath>,
    /// `true` when both sub-paths end/start with a spur to the insert point.
    /// The spur length is not part of any edge distance; callers add it.
    pub added_spur: bool,
}

impl PathCut {
    fn whole(path: GeoPath) -> Self {
        Self { segments: vec![path], added_spur: false }
    }

    /// `true` if the path was actually split in two.
    pub fn is_split(&self) -> bool {
        self.segments.len() == 2
    }

    /// Great-circle length of one spur (cut coordinate → insert point), or
    /// zero when no spur was added.
    pub fn spur_km(&self) -> f64 {
        if !self.added_spur {
            return 0.0;
        }
        let head = self.segments[0].points();
        match head {
            [.., cp, p] => cp.distance_km(*p),
            _ => 0.0,
        }
    }
}

impl GeoPath {
    /// Wrap a vertex list.  Fails with [`CoreError::EmptyPath`] if empty.
    pub fn new(points: Vec<GeoPoint>) -> CoreResult<Self> {
        if points.is_empty() {
            return Err(CoreError::EmptyPath);
        }
        Ok(Self(points))
    }

    /// The two-point path `a → b`.
    pub fn straight(a: GeoPoint, b: GeoPoint) -> Self {
        Self(vec![a, b])
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; paths are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> GeoPoint {
        self.0[0]
    }

    pub fn last(&self) -> GeoPoint {
        self.0[self.0.len() - 1]
    }

    /// The same geometry traversed in the opposite direction.
    pub fn reversed(&self) -> GeoPath {
        let mut points = self.0.clone();
        points.reverse();
        GeoPath(points)
    }

    /// Sum of great-circle distances between consecutive vertices.
    pub fn length_km(&self) -> f64 {
        self.0.windows(2).map(|w| w[0].distance_km(w[1])).sum()
    }

    /// Nearest point on the path to `point`.  The first segment wins ties.
    pub fn project(&self, point: GeoPoint) -> PathProjection {
        let first = self.0[0];
        let mut best = PathProjection {
            along_km:  0.0,
            offset_km: first.distance_km(point),
            foot:      first,
        };

        let mut walked = 0.0;
        for w in self.0.windows(2) {
            let (along, foot) = project_on_arc(w[0], w[1], point);
            let offset = foot.distance_km(point);
            if offset < best.offset_km {
                best = PathProjection { along_km: walked + along, offset_km: offset, foot };
            }
            walked += w[0].distance_km(w[1]);
        }
        best
    }

    /// Distance along the path to the point on it nearest to `point`.
    pub fn project_km(&self, point: GeoPoint) -> f64 {
        self.project(point).along_km
    }

    /// Cut the path in two.
    ///
    /// - A distance (numerically) at 0 or at the full length returns the
    ///   original path unmodified with `added_spur = false`.
    /// - A distance outside `[0, length]` fails with
    ///   [`CoreError::OutOfRange`].
    /// - A distance landing on a vertex splits there, sharing the vertex,
    ///   with no spur.
    /// - Otherwise the cut coordinate `cp` is interpolated; if an insert
    ///   point was given and differs from `cp`, the head ends `…, cp, p` and
    ///   the tail starts `p, cp, …`.
    pub fn cut(&self, at: CutAt) -> CoreResult<PathCut> {
        let (distance_km, insert) = match at {
            CutAt::Distance(d) => (d, None),
            CutAt::Point(p) => (self.project_km(p), Some(p)),
            CutAt::DistanceWithPoint { distance_km, point } => (distance_km, Some(point)),
        };

        let length_km = self.length_km();
        if !distance_km.is_finite()
            || distance_km < -CUT_TOLERANCE_KM
            || distance_km > length_km + CUT_TOLERANCE_KM
        {
            return Err(CoreError::OutOfRange { distance_km, length_km });
        }
        if distance_km <= CUT_TOLERANCE_KM || length_km - distance_km <= CUT_TOLERANCE_KM {
            return Ok(PathCut::whole(self.clone()));
        }

        let pts = &self.0;
        let mut walked = 0.0;
        for i in 1..pts.len() {
            let seg_km = pts[i - 1].distance_km(pts[i]);
            let next = walked + seg_km;

            if (next - distance_km).abs() <= CUT_TOLERANCE_KM {
                return Ok(PathCut {
                    segments:   vec![GeoPath(pts[..=i].to_vec()), GeoPath(pts[i..].to_vec())],
                    added_spur: false,
                });
            }

            if next > distance_km {
                let f = (distance_km - walked) / seg_km;
                let cp = pts[i - 1].intermediate(pts[i], f);

                let mut head = pts[..i].to_vec();
                head.push(cp);
                let mut tail = vec![cp];

                let added_spur = match insert {
                    Some(p) if !p.is_close(cp, None) => {
                        head.push(p);
                        tail.insert(0, p);
                        true
                    }
                    _ => false,
                };
                tail.extend_from_slice(&pts[i..]);

                return Ok(PathCut {
                    segments: vec![GeoPath(head), GeoPath(tail)],
                    added_spur,
                });
            }
            walked = next;
        }

        // Rounding left the distance past the last vertex.
        Ok(PathCut::whole(self.clone()))
    }
}
