//! CSV edge loader.
//!
//! # CSV format
//!
//! One row per physical link.  The three edge sources (land paths, submarine
//! paths, submarine-to-land bridges) share the same shape; which source a
//! file belongs to is decided by the caller via [`EdgeSource`].
//!
//! ```csv
//! from_city,from_state,from_country,to_city,to_state,to_country,distance_km,path_wkt
//! San Jose,CA,USA,Los Angeles,CA,USA,490.2,"LINESTRING (-121.89 37.34, -118.24 34.05)"
//! Tokyo,,Japan,Los Angeles,CA,USA,8815.0,"LINESTRING (139.69 35.68, 180 40, -118.24 34.05)"
//! ```
//!
//! `path_wkt` is stored in (lon, lat) order; the flip to (lat, lon) happens
//! when the builder parses it.  Fields are trimmed, but otherwise rows are
//! returned as-is: location normalization, distance checks and geometry
//! validation are the builder's job so that one malformed row never aborts a
//! load.  Only a structurally broken file (wrong field count, bad UTF-8)
//! fails the whole load.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use pr_core::CableType;

use crate::GraphError;

// ── CSV record ────────────────────────────────────────────────────────────────

/// One row of any of the three edge sources.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EdgeRecord {
    pub from_city:    String,
    #[serde(default)]
    pub from_state:   String,
    #[serde(default)]
    pub from_country: String,
    pub to_city:      String,
    #[serde(default)]
    pub to_state:     String,
    #[serde(default)]
    pub to_country:   String,
    /// Empty or unparseable values read as `NaN` and are skipped by the
    /// builder as a bad distance.
    #[serde(deserialize_with = "lenient_km")]
    pub distance_km:  f64,
    pub path_wkt:     String,
}

fn lenient_km<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().unwrap_or(f64::NAN))
}

/// Which dataset a row came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EdgeSource {
    /// Terrestrial fibre routes.
    Land,
    /// Submarine cable segments between landing stations.
    Submarine,
    /// Short links from a landing station to the nearest land node.
    Bridge,
}

impl EdgeSource {
    /// Only submarine-sourced rows are `Submarine`; bridges count as land.
    pub fn cable_type(self) -> CableType {
        match self {
            EdgeSource::Submarine => CableType::Submarine,
            EdgeSource::Land | EdgeSource::Bridge => CableType::Land,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeSource::Land      => "land",
            EdgeSource::Submarine => "submarine",
            EdgeSource::Bridge    => "bridge",
        }
    }
}

impl std::fmt::Display for EdgeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every edge row from a CSV file with a header row.
pub fn load_edges_csv(path: &Path) -> Result<Vec<EdgeRecord>, GraphError> {
    let file = std::fs::File::open(path)?;
    load_edges_reader(file)
}

/// Like [`load_edges_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from a database
/// export stream.
pub fn load_edges_reader<R: Read>(reader: R) -> Result<Vec<EdgeRecord>, GraphError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<EdgeRecord>()
        .map(|row| row.map_err(|e| GraphError::Load(e.to_string())))
        .collect()
}
