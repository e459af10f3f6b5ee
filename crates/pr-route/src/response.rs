//! External response shape.

use serde::{Deserialize, Serialize};

use pr_core::wkt::format_multilinestring;
use pr_core::CableType;

use crate::splice::SplicedRoute;

/// The answer to one route query, ready for JSON.
///
/// ```json
/// {
///   "total_distance_km": 1010.0,
///   "route_coordinates": [[0.0, 0.0], [0.04, 4.5], [0.0, 9.0]],
///   "route_geometry": "MULTILINESTRING ((0 0, 4.5 0, 4.5 0.04), (…))",
///   "cable_types": ["land", "land"]
/// }
/// ```
///
/// Coordinates are `[lat, lon]`; the geometry text is `(lon lat)` like any
/// WKT.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub total_distance_km: f64,
    pub route_coordinates: Vec<[f64; 2]>,
    pub route_geometry:    String,
    pub cable_types:       Vec<CableType>,
}

impl From<SplicedRoute> for RouteResponse {
    fn from(route: SplicedRoute) -> Self {
        Self::from(&route)
    }
}

impl From<&SplicedRoute> for RouteResponse {
    fn from(route: &SplicedRoute) -> Self {
        Self {
            total_distance_km: route.total_distance_km,
            route_coordinates: route.coordinates.iter().map(|p| [p.lat, p.lon]).collect(),
            route_geometry:    format_multilinestring(&route.segments),
            cable_types:       route.cable_types.clone(),
        }
    }
}
