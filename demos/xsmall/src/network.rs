//! Tiny trans-Pacific topology.
//!
//! ```text
//!  San Jose ── Los Angeles ── Hermosa Beach ≈≈≈≈≈≈≈≈≈≈≈≈≈≈ Chikura ── Tokyo ── Osaka
//!              (land)        (bridge)       (submarine)     (bridge)  (land)
//! ```
//!
//! The submarine segment crosses the antimeridian.  Geometry is stored
//! `(lon lat)` exactly as an edge table export would hold it.

use std::io::Cursor;

use anyhow::Result;

use pr_graph::{EdgeRecord, load_edges_reader};
use pr_route::{PresenceSet, load_presence_reader};

const LAND_CSV: &str = "\
from_city,from_state,from_country,to_city,to_state,to_country,distance_km,path_wkt
San Jose,CA,USA,Los Angeles,CA,USA,490.0,\"LINESTRING (-121.8863 37.3382, -120.6596 35.2828, -118.2437 34.0522)\"
Tokyo,,Japan,Osaka,,Japan,403.0,\"LINESTRING (139.6503 35.6762, 138.3831 34.9756, 136.9066 35.1815, 135.5023 34.6937)\"
 Los Angeles ,CA,USA,Los Angeles,CA,USA,0.5,\"LINESTRING (-118.2437 34.0522, -118.2400 34.0500)\"
";

const SUBMARINE_CSV: &str = "\
from_city,from_state,from_country,to_city,to_state,to_country,distance_km,path_wkt
Hermosa Beach,CA,USA,Chikura,,Japan,9200.0,\"LINESTRING (-118.3995 33.8622, -140.0 32.0, -165.0 33.5, 180.0 34.5, 160.0 34.0, 139.9500 34.9500)\"
";

const BRIDGE_CSV: &str = "\
from_city,from_state,from_country,to_city,to_state,to_country,distance_km,path_wkt
Hermosa Beach,CA,USA,Los Angeles,CA,USA,25.0,\"LINESTRING (-118.3995 33.8622, -118.2437 34.0522)\"
Chikura,,Japan,Tokyo,,Japan,85.0,\"LINESTRING (139.9500 34.9500, 139.6503 35.6762)\"
";

const PRESENCE_CSV: &str = "\
provider,region,latitude,longitude
aws,us-west-1,37.2379,-121.7946
aws,ap-northeast-1,35.6895,139.6917
aws,ap-northeast-3,34.6937,135.5023
gcp,us-west2,34.0522,-118.2437
gcp,mid-pacific,33.52,-165.02
";

/// The three edge sources.  The last land row is a self-loop once its
/// location is trimmed, so the build report has something to show.
pub struct EdgeSources {
    pub land:      Vec<EdgeRecord>,
    pub submarine: Vec<EdgeRecord>,
    pub bridge:    Vec<EdgeRecord>,
}

pub fn edge_sources() -> Result<EdgeSources> {
    Ok(EdgeSources {
        land:      load_edges_reader(Cursor::new(LAND_CSV))?,
        submarine: load_edges_reader(Cursor::new(SUBMARINE_CSV))?,
        bridge:    load_edges_reader(Cursor::new(BRIDGE_CSV))?,
    })
}

pub fn presence() -> Result<PresenceSet> {
    Ok(load_presence_reader(Cursor::new(PRESENCE_CSV))?)
}
