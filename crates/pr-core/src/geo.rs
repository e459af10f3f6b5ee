//! Geographic coordinate type and spherical helpers.
//!
//! `GeoPoint` uses `f64` latitude/longitude in decimal degrees.  Every
//! distance in the engine is a great-circle distance on a sphere of radius
//! [`EARTH_RADIUS_KM`]; geodetic (ellipsoidal) accuracy is not needed for the
//! kilometre-scale threshold comparisons the router makes.

use std::fmt;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.008_8;

/// Relative tolerance for "numerically the same coordinate".
const REL_TOLERANCE: f64 = 1e-9;
/// Absolute floor so that values near zero can still compare equal.
const ABS_TOLERANCE: f64 = 1e-12;

/// A WGS-84 geographic coordinate, `(lat, lon)` in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` if both components are finite and inside the valid
    /// latitude/longitude ranges.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Haversine great-circle distance in kilometres.
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Closeness test used throughout the engine.
    ///
    /// With `Some(max_km)` the points are close when their great-circle
    /// distance is strictly below `max_km`.  With `None` both components must
    /// be numerically near-equal.
    pub fn is_close(self, other: GeoPoint, max_km: Option<f64>) -> bool {
        match max_km {
            Some(km) => self.distance_km(other) < km,
            None => approx_eq(self.lat, other.lat) && approx_eq(self.lon, other.lon),
        }
    }

    /// Unit vector on the sphere (x towards lon 0, z towards the north pole).
    pub fn to_unit_vector(self) -> [f64; 3] {
        let (lat, lon) = (self.lat.to_radians(), self.lon.to_radians());
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    /// Inverse of [`to_unit_vector`](Self::to_unit_vector).  `v` need not be
    /// normalized.
    pub fn from_unit_vector(v: [f64; 3]) -> Self {
        let lat = v[2].atan2((v[0] * v[0] + v[1] * v[1]).sqrt());
        let lon = v[1].atan2(v[0]);
        Self::new(lat.to_degrees(), lon.to_degrees())
    }

    /// The point a fraction `f` of the way along the great circle from
    /// `self` to `other`.
    pub fn intermediate(self, other: GeoPoint, f: f64) -> GeoPoint {
        let delta = self.distance_km(other) / EARTH_RADIUS_KM;
        let sin_delta = delta.sin();
        if sin_delta.abs() < 1e-12 {
            // Coincident (or antipodal) endpoints: no unique great circle.
            return GeoPoint::new(
                self.lat + (other.lat - self.lat) * f,
                self.lon + (other.lon - self.lon) * f,
            );
        }
        let a = ((1.0 - f) * delta).sin() / sin_delta;
        let b = (f * delta).sin() / sin_delta;
        let (va, vb) = (self.to_unit_vector(), other.to_unit_vector());
        GeoPoint::from_unit_vector([
            a * va[0] + b * vb[0],
            a * va[1] + b * vb[1],
            a * va[2] + b * vb[2],
        ])
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Straight-line (chord) length through the unit sphere that corresponds to
/// a great-circle distance of `km`.
///
/// Chord length is monotonic in arc length, so Euclidean queries over unit
/// vectors (e.g. in an R-tree) answer great-circle questions exactly.
pub fn chord_for_km(km: f64) -> f64 {
    let angle = (km / EARTH_RADIUS_KM).clamp(0.0, std::f64::consts::PI);
    2.0 * (angle * 0.5).sin()
}

/// Foot of the perpendicular from `p` onto the great-circle arc `a → b`.
///
/// Returns `(along_km, foot)`, where `along_km` is measured from `a` and
/// clamped to the arc, so `foot` is always on the arc.
pub(crate) fn project_on_arc(a: GeoPoint, b: GeoPoint, p: GeoPoint) -> (f64, GeoPoint) {
    let arc_km = a.distance_km(b);
    if arc_km < 1e-9 {
        return (0.0, a);
    }

    let (va, vb, vp) = (a.to_unit_vector(), b.to_unit_vector(), p.to_unit_vector());
    let n = normalize(cross(va, vb));

    // Drop the component of p normal to the arc's plane.
    let h = dot(vp, n);
    let in_plane = [vp[0] - h * n[0], vp[1] - h * n[1], vp[2] - h * n[2]];
    if norm(in_plane) < 1e-15 {
        // p is a pole of the circle; every point of the arc is equidistant.
        return (0.0, a);
    }
    let q = normalize(in_plane);

    let along = dot(cross(va, q), n).atan2(dot(va, q)) * EARTH_RADIUS_KM;
    if along > 0.0 && along < arc_km {
        return (along, GeoPoint::from_unit_vector(q));
    }
    // Off the arc: atan2 wraps at ±π, so the sign of `along` does not say
    // which end is nearer.
    if p.distance_km(a) <= p.distance_km(b) {
        (0.0, a)
    } else {
        (arc_km, b)
    }
}

#[inline]
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= (REL_TOLERANCE * a.abs().max(b.abs())).max(ABS_TOLERANCE)
}

#[inline]
fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn norm(v: [f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

#[inline]
fn normalize(v: [f64; 3]) -> [f64; 3] {
    let n = norm(v);
    [v[0] / n, v[1] / n, v[2] / n]
}
