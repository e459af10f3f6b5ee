//! Network construction from the three edge sources.
//!
//! Ingestion is best-effort: a self-loop, a malformed geometry or an unusable
//! distance drops that row only.  Every dropped row and every coordinate
//! overwrite is recorded in the [`BuildReport`] as well as logged, so callers
//! and tests can observe what was discarded.

use pr_core::wkt::parse_linestring;
use pr_core::{GeoPoint, Location};

use crate::loader::{EdgeRecord, EdgeSource};
use crate::network::{PhysNetwork, PhysNetworkBuilder};

// ── Report types ──────────────────────────────────────────────────────────────

/// Why a row was dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// Both endpoints normalize to the same location.
    SelfLoop,
    /// `path_wkt` did not parse; carries the parser message.
    BadGeometry(String),
    /// `distance_km` was negative or not finite.
    BadDistance(f64),
}

/// A dropped input row.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedRow {
    pub source: EdgeSource,
    /// Zero-based row index within its source.
    pub row:    usize,
    pub reason: SkipReason,
}

/// A location whose representative coordinate was overwritten by one that is
/// not "same city" close to the previous value.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateDrift {
    pub location:    Location,
    pub previous:    GeoPoint,
    pub current:     GeoPoint,
    pub distance_km: f64,
}

/// Everything `build_network` discarded or found suspicious.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildReport {
    /// Rows accepted (each contributes two directed edges).
    pub accepted:             usize,
    pub skipped:              Vec<SkippedRow>,
    pub drifts:               Vec<CoordinateDrift>,
    /// Edges whose geometry endpoints are not within the same-city tolerance
    /// of their nodes' final coordinates.
    pub endpoint_mismatches:  usize,
}

impl BuildReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// `true` when nothing was skipped, drifted or mismatched.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.drifts.is_empty() && self.endpoint_mismatches == 0
    }
}

// ── build_network ─────────────────────────────────────────────────────────────

/// Build the shared network from the land, submarine and bridge row sets.
///
/// Each accepted row becomes a forward and a reverse edge; its geometry's
/// first and last vertices become the representative coordinates of the
/// from/to locations and are registered in the coordinate index.
/// `same_city_km` is the tolerance for drift warnings and the endpoint check.
pub fn build_network(
    land:         &[EdgeRecord],
    submarine:    &[EdgeRecord],
    bridge:       &[EdgeRecord],
    same_city_km: f64,
) -> (PhysNetwork, BuildReport) {
    let total_rows = land.len() + submarine.len() + bridge.len();
    let mut builder = PhysNetworkBuilder::with_capacity(total_rows, total_rows * 2)
        .drift_tolerance_km(same_city_km);
    let mut report = BuildReport::default();

    let sources = [
        (EdgeSource::Land, land),
        (EdgeSource::Submarine, submarine),
        (EdgeSource::Bridge, bridge),
    ];
    for (source, rows) in sources {
        for (row, record) in rows.iter().enumerate() {
            match ingest_row(&mut builder, &mut report, source, record) {
                Ok(()) => report.accepted += 1,
                Err(reason) => {
                    log::warn!("skipping {source} row {row}: {reason:?}");
                    report.skipped.push(SkippedRow { source, row, reason });
                }
            }
        }
    }

    let network = builder.build();
    report.endpoint_mismatches = count_endpoint_mismatches(&network, same_city_km);

    log::info!(
        "built network: {} nodes, {} edges, {} coordinates ({} rows skipped, {} drifts)",
        network.node_count(),
        network.edge_count(),
        network.coords().len(),
        report.skipped.len(),
        report.drifts.len(),
    );
    if report.endpoint_mismatches > 0 {
        log::warn!(
            "{} edges have geometry endpoints further than {same_city_km} km from their nodes",
            report.endpoint_mismatches
        );
    }

    (network, report)
}

fn ingest_row(
    builder: &mut PhysNetworkBuilder,
    report:  &mut BuildReport,
    source:  EdgeSource,
    record:  &EdgeRecord,
) -> Result<(), SkipReason> {
    let from = Location::new(&record.from_city, &record.from_state, &record.from_country);
    let to   = Location::new(&record.to_city, &record.to_state, &record.to_country);
    if from == to {
        return Err(SkipReason::SelfLoop);
    }
    if !record.distance_km.is_finite() || record.distance_km < 0.0 {
        return Err(SkipReason::BadDistance(record.distance_km));
    }
    let path = parse_linestring(&record.path_wkt)
        .map_err(|e| SkipReason::BadGeometry(e.to_string()))?;

    let (from_pos, to_pos) = (path.first(), path.last());
    let (a, drift_a) = builder.add_location(from, from_pos);
    let (b, drift_b) = builder.add_location(to, to_pos);
    for drift in [drift_a, drift_b].into_iter().flatten() {
        log::warn!(
            "{} moved {:.1} km: {} -> {}",
            drift.location, drift.distance_km, drift.previous, drift.current
        );
        report.drifts.push(drift);
    }

    builder.register_coordinate(from_pos, a);
    builder.register_coordinate(to_pos, b);
    builder.add_link(a, b, record.distance_km, path, source.cable_type());
    Ok(())
}

/// Each undirected link is checked once, on its lower-id direction.
fn count_endpoint_mismatches(network: &PhysNetwork, tolerance_km: f64) -> usize {
    (0..network.edge_count())
        .filter(|&e| network.edge_from[e] < network.edge_to[e])
        .filter(|&e| {
            let path = &network.edge_path[e];
            let from = network.node_pos[network.edge_from[e].index()];
            let to   = network.node_pos[network.edge_to[e].index()];
            let ok = path.first().is_close(from, Some(tolerance_km))
                && path.last().is_close(to, Some(tolerance_km));
            if !ok {
                log::debug!(
                    "edge {} -> {} geometry does not meet its endpoints",
                    network.node_loc[network.edge_from[e].index()],
                    network.node_loc[network.edge_to[e].index()],
                );
            }
            !ok
        })
        .count()
}
