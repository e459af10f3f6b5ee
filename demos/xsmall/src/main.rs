//! xsmall — smallest example for the physical-route engine.
//!
//! Builds a six-location trans-Pacific topology, then answers a few route
//! queries and prints the responses as JSON.  Set `RUST_LOG=debug` to see
//! augmentation and splicing decisions.

mod network;

use std::time::Instant;

use anyhow::Result;

use pr_core::{GeoPoint, Location, RouteConfig};
use pr_route::{EngineBuilder, RouteQuery};

use network::{edge_sources, presence};

// ── Query points ──────────────────────────────────────────────────────────────

const SANTA_CLARA: GeoPoint = GeoPoint { lat: 37.3541, lon: -121.9552 };
const OSAKA_PORT:  GeoPoint = GeoPoint { lat: 34.6500, lon: 135.4300 };
const PASADENA:    GeoPoint = GeoPoint { lat: 34.1478, lon: -118.1445 };

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== xsmall — physical route engine ===");
    println!();

    // 1. Build the engine.
    let sources = edge_sources()?;
    let t0 = Instant::now();
    let (engine, report) = EngineBuilder::new()
        .land(sources.land)
        .submarine(sources.submarine)
        .bridge(sources.bridge)
        .presence(presence()?)
        .config(RouteConfig::default())
        .build()?;
    let net = engine.network();
    println!(
        "Network: {} locations, {} edges, {} known coordinates (built in {:.3} ms)",
        net.node_count(),
        net.edge_count(),
        net.coords().len(),
        t0.elapsed().as_secs_f64() * 1e3,
    );
    println!(
        "Build report: {} rows accepted, {} skipped, {} drifts, {} endpoint mismatches",
        report.accepted,
        report.skipped_count(),
        report.drifts.len(),
        report.endpoint_mismatches,
    );
    for skipped in &report.skipped {
        println!("  skipped {} row {}: {:?}", skipped.source, skipped.row, skipped.reason);
    }
    println!();

    // 2. Coordinate query with presence splicing.
    let query = RouteQuery::new(SANTA_CLARA, OSAKA_PORT).src_provider("aws").dst_provider("gcp");
    let response = engine.route(&query)?;
    println!("Santa Clara → Osaka (aws + gcp presence):");
    println!("{}", serde_json::to_string_pretty(&response)?);
    println!();

    // 3. Batch, including requests the engine rejects.
    let batch = [
        RouteQuery::new(PASADENA, SANTA_CLARA),
        RouteQuery::new(PASADENA, PASADENA),
        RouteQuery::new(PASADENA, OSAKA_PORT).src_provider("azure"),
    ];
    println!("{:<28} {:>12} {:>6}", "Query", "Distance km", "Stops");
    println!("{}", "-".repeat(48));
    for (q, result) in batch.iter().zip(engine.route_all(&batch)) {
        let label = format!("{} → {}", q.src(), q.dst());
        match result {
            Ok(r) => println!("{label:<28} {:>12.1} {:>6}", r.total_distance_km, r.route_coordinates.len()),
            Err(e) => println!("{label:<28} rejected ({}): {e}", if e.is_client_error() { "client" } else { "server" }),
        }
    }
    println!();

    // 4. Named locations and diagnostics.
    let from = Location::parse("San Jose/CA/USA")?;
    let to = Location::parse("Tokyo/Japan")?;
    let every_provider: &[&str] = &[];
    let named = engine.route_locations(&from, &to, Some(every_provider))?;
    println!(
        "{from} → {to}: {:.1} km over {} segments ({})",
        named.total_distance_km,
        named.cable_types.len(),
        named.cable_types.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", "),
    );

    if let Some(region) = engine.presence().region("aws", "us-west-1") {
        if let Some((loc, km)) = engine.nearest_location(region.pos) {
            println!("aws/us-west-1 is {km:.1} km from {loc}");
        }
        for link in engine.edges_near(region.pos, 20.0) {
            println!("  passes {:.1} km away: {} – {}", link.offset_km, link.from, link.to);
        }
    }

    Ok(())
}
