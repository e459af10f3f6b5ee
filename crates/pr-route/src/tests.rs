//! Unit tests for pr-route.
//!
//! Every test builds its network from hand-written rows.

#[cfg(test)]
mod helpers {
    use pr_core::{EARTH_RADIUS_KM, RouteConfig};
    use pr_graph::EdgeRecord;

    use crate::{EngineBuilder, PresencePoint, PresenceSet, RouteEngine};

    /// Degrees of arc per kilometre on the sphere.
    pub const DEG_PER_KM: f64 = 180.0 / (std::f64::consts::PI * EARTH_RADIUS_KM);

    pub fn row(from: &str, to: &str, distance_km: f64, points: &[(f64, f64)]) -> EdgeRecord {
        let body: Vec<String> = points.iter().map(|(lat, lon)| format!("{lon} {lat}")).collect();
        EdgeRecord {
            from_city:    from.to_owned(),
            from_state:   String::new(),
            from_country: "X".to_owned(),
            to_city:      to.to_owned(),
            to_state:     String::new(),
            to_country:   "X".to_owned(),
            distance_km,
            path_wkt:     format!("LINESTRING ({})", body.join(", ")),
        }
    }

    /// Land chain A(0,0) – B(0,0.9) – C(0,2.7) – D(0,4.05), 100 / 200 / 150 km.
    pub fn chain_rows() -> Vec<EdgeRecord> {
        vec![
            row("A", "B", 100.0, &[(0.0, 0.0), (0.0, 0.9)]),
            row("B", "C", 200.0, &[(0.0, 0.9), (0.0, 2.7)]),
            row("C", "D", 150.0, &[(0.0, 2.7), (0.0, 4.05)]),
        ]
    }

    pub fn chain_engine() -> RouteEngine {
        EngineBuilder::new().land(chain_rows()).build().unwrap().0
    }

    /// One 1000 km equatorial edge from (0,0) eastwards.
    pub fn long_edge() -> EdgeRecord {
        row("West", "East", 1000.0, &[(0.0, 0.0), (0.0, 1000.0 * DEG_PER_KM)])
    }

    /// `km_north` kilometres north of the point `km_along` down [`long_edge`].
    pub fn off_edge(km_along: f64, km_north: f64) -> pr_core::GeoPoint {
        pr_core::GeoPoint::new(km_north * DEG_PER_KM, km_along * DEG_PER_KM)
    }

    pub fn long_edge_engine(presence: Vec<PresencePoint>, max_point_to_path_km: f64) -> RouteEngine {
        let mut config = RouteConfig::default();
        config.splice.max_point_to_path_km = max_point_to_path_km;
        EngineBuilder::new()
            .submarine(vec![long_edge()])
            .presence(PresenceSet::from_points(presence))
            .config(config)
            .build()
            .unwrap()
            .0
    }
}

// ── End-to-end scenarios ──────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use pr_core::{CableType, GeoPoint};

    use super::helpers::{DEG_PER_KM, chain_engine, long_edge_engine, off_edge};
    use crate::{PresencePoint, RouteQuery};

    #[test]
    fn identical_points_give_direct_path() {
        let engine = chain_engine();
        let p = GeoPoint::new(0.0, 0.45);
        let resp = engine.route(&RouteQuery::new(p, p)).unwrap();

        assert_eq!(resp.route_coordinates, vec![[0.0, 0.45], [0.0, 0.45]]);
        assert_eq!(resp.cable_types, vec![CableType::Land]);
        assert_eq!(resp.total_distance_km, 0.0);
    }

    #[test]
    fn same_city_points_give_direct_path() {
        let engine = chain_engine();
        let (src, dst) = (GeoPoint::new(0.0, 0.0), GeoPoint::new(0.02, 0.0));
        let route = engine.solve(&RouteQuery::new(src, dst)).unwrap();

        assert_eq!(route.coordinates, vec![src, dst]);
        assert!((route.total_distance_km - src.distance_km(dst)).abs() < 1e-9);
    }

    #[test]
    fn three_edge_chain() {
        let engine = chain_engine();
        let query = RouteQuery::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 4.05));
        let resp = engine.route(&query).unwrap();

        assert!((resp.total_distance_km - 450.0).abs() < 1e-9);
        assert_eq!(resp.route_coordinates.len(), 4);
        assert_eq!(resp.cable_types, vec![CableType::Land; 3]);
        assert_eq!(resp.route_coordinates[1], [0.0, 0.9]);
    }

    #[test]
    fn presence_point_off_midpoint() {
        let aws = PresencePoint::new("aws", "mid", off_edge(500.0, 5.0));
        let engine = long_edge_engine(vec![aws.clone()], 50.0);
        let query = RouteQuery::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1000.0 * DEG_PER_KM))
            .src_provider("aws");
        let route = engine.solve(&query).unwrap();

        assert_eq!(route.coordinates.len(), 3);
        assert_eq!(route.coordinates[1], aws.pos);
        assert_eq!(route.segments.len(), 2);
        assert_eq!(route.cable_types, vec![CableType::Submarine; 2]);
        assert!((route.total_distance_km - 1010.0).abs() < 1e-6, "{}", route.total_distance_km);
        assert_eq!(route.inserted, vec![aws]);
    }

    #[test]
    fn presence_ignored_without_search() {
        let engine = long_edge_engine(vec![PresencePoint::new("aws", "mid", off_edge(500.0, 5.0))], 50.0);
        let query = RouteQuery::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1000.0 * DEG_PER_KM));
        let route = engine.solve(&query).unwrap();
        assert_eq!(route.coordinates.len(), 2);
        assert!((route.total_distance_km - 1000.0).abs() < 1e-9);
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pr_core::{GeoPoint, NodeId, RouteConfig};
    use pr_graph::{DijkstraRouter, GraphError, QueryGraph, Route, Router};

    use super::helpers::{chain_rows, row};
    use crate::{EngineBuilder, PresencePoint, PresenceSet, RouteError, RouteQuery};

    #[derive(Default)]
    struct CountingRouter {
        calls: AtomicUsize,
    }

    impl Router for CountingRouter {
        fn route(&self, graph: &QueryGraph<'_>, from: NodeId, to: NodeId) -> Result<Route, GraphError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            DijkstraRouter::default().route(graph, from, to)
        }
    }

    #[test]
    fn unknown_provider_rejected_before_routing() {
        let (engine, _) = EngineBuilder::new()
            .land(chain_rows())
            .presence(PresenceSet::from_points([PresencePoint::new("aws", "r", GeoPoint::new(0.0, 1.0))]))
            .router(CountingRouter::default())
            .build()
            .unwrap();

        let query = RouteQuery::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 4.05)).src_provider("gcp");
        let err = engine.route(&query).unwrap_err();
        assert!(matches!(&err, RouteError::UnknownProvider(name) if name == "gcp"));
        assert!(err.is_client_error());

        let known = RouteQuery::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 4.05)).src_provider(" AWS");
        engine.route(&known).unwrap();
        // Only the second query reached the router.
        assert_eq!(engine_router_calls(&engine), 1);
    }

    fn engine_router_calls(engine: &crate::RouteEngine<CountingRouter>) -> usize {
        engine.router().calls.load(Ordering::Relaxed)
    }

    #[test]
    fn disconnected_components_are_no_path() {
        let land = vec![
            row("A", "B", 100.0, &[(0.0, 0.0), (0.0, 0.9)]),
            row("C", "D", 100.0, &[(40.0, 40.0), (40.0, 41.0)]),
        ];
        let (engine, _) = EngineBuilder::new().land(land).build().unwrap();
        let err = engine
            .route(&RouteQuery::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(40.0, 41.0)))
            .unwrap_err();
        assert!(matches!(err, RouteError::NoPath));
        assert!(err.is_client_error());
    }

    #[test]
    fn empty_network_is_unconnected() {
        let (engine, _) = EngineBuilder::new().build().unwrap();
        let err = engine
            .route(&RouteQuery::new(GeoPoint::new(1.0, 1.0), GeoPoint::new(2.0, 2.0)))
            .unwrap_err();
        assert!(matches!(err, RouteError::Unconnected { label: "source", .. }));
    }

    #[test]
    fn invalid_coordinate_rejected() {
        let (engine, _) = EngineBuilder::new().land(chain_rows()).build().unwrap();
        let err = engine
            .route(&RouteQuery::new(GeoPoint::new(95.0, 0.0), GeoPoint::new(0.0, 0.0)))
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidCoordinate(_)));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = RouteConfig { hop_km: -1.0, ..RouteConfig::default() };
        let err = EngineBuilder::new().config(config).build().err().unwrap();
        assert!(matches!(err, RouteError::Config(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn malformed_rows_reported_not_fatal() {
        let mut rows = chain_rows();
        rows[1].path_wkt = "POINT (0 0)".into();
        let (engine, report) = EngineBuilder::new().land(rows).build().unwrap();
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(engine.network().edge_count(), 4);
    }
}

// ── Presence set ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod presence {
    use std::io::{Cursor, Write};

    use pr_core::{GeoPath, GeoPoint};

    use super::helpers::{DEG_PER_KM, off_edge};
    use crate::{PresencePoint, PresenceSet, RouteError, load_presence_csv, load_presence_reader};

    fn set() -> PresenceSet {
        PresenceSet::from_points([
            PresencePoint::new("AWS ", "us-west-1", GeoPoint::new(37.2379, -121.7946)),
            PresencePoint::new("aws", "us-east-1", GeoPoint::new(39.0127, -77.5342)),
            PresencePoint::new("gcp", "us-west2", GeoPoint::new(34.05, -118.24)),
        ])
    }

    #[test]
    fn providers_are_normalized() {
        let s = set();
        assert_eq!(s.len(), 3);
        assert_eq!(s.providers().collect::<Vec<_>>(), vec!["aws", "gcp"]);
        assert_eq!(s.points("Aws").map(<[_]>::len), Some(2));
        assert!(s.contains_provider(" GCP "));
    }

    #[test]
    fn region_lookup() {
        let s = set();
        let p = s.region("aws", "US-WEST-1").unwrap();
        assert_eq!(p.pos, GeoPoint::new(37.2379, -121.7946));
        assert!(s.region("aws", "eu-west-1").is_none());
        assert!(s.region("azure", "us-west-1").is_none());
    }

    #[test]
    fn invalid_points_dropped() {
        let s = PresenceSet::from_points([PresencePoint::new("aws", "bad", GeoPoint::new(0.0, 200.0))]);
        assert!(s.is_empty());
    }

    #[test]
    fn scope_selection() {
        let s = set();
        let path = GeoPath::straight(GeoPoint::new(37.0, -122.0), GeoPoint::new(34.0, -118.0));

        let all = s.scope(&[]).unwrap();
        assert!(!all.is_empty());
        assert!(matches!(s.scope(&["aws", "azure"]), Err(RouteError::UnknownProvider(n)) if n == "azure"));

        let gcp = s.scope(&["gcp"]).unwrap();
        let hits = gcp.near_path(&path, 50.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].point.region, "us-west2");
    }

    #[test]
    fn near_path_orders_by_along_distance() {
        let s = PresenceSet::from_points([
            PresencePoint::new("x", "far", off_edge(700.0, 2.0)),
            PresencePoint::new("x", "near", off_edge(300.0, -2.0)),
            PresencePoint::new("x", "off", off_edge(500.0, 30.0)),
        ]);
        let path = GeoPath::straight(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1000.0 * DEG_PER_KM));
        let scope = s.scope(&["x"]).unwrap();
        let hits = scope.near_path(&path, 5.0);

        let regions: Vec<_> = hits.iter().map(|h| h.point.region.as_str()).collect();
        assert_eq!(regions, vec!["near", "far"]);
        assert!((hits[0].along_km - 300.0).abs() < 1e-6);
        assert!((hits[1].offset_km - 2.0).abs() < 1e-6);
    }

    const CSV: &str = "provider,region,latitude,longitude\n\
                       aws,us-west-1,37.2379,-121.7946\n\
                       AWS,us-east-1,39.0127,-77.5342\n\
                       ixp,,35.68,139.69\n";

    #[test]
    fn loads_csv_reader() {
        let s = load_presence_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.points("aws").map(<[_]>::len), Some(2));
        assert_eq!(s.points("ixp").unwrap()[0].region, "");
    }

    #[test]
    fn loads_csv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        assert_eq!(load_presence_csv(file.path()).unwrap().len(), 3);
    }

    #[test]
    fn bad_row_fails_load() {
        let csv = "provider,region,latitude,longitude\naws,r,north,0\n";
        assert!(matches!(load_presence_reader(Cursor::new(csv)), Err(RouteError::Load(_))));
    }
}

// ── Splicer ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod splice {
    use pr_core::GeoPoint;

    use super::helpers::{DEG_PER_KM, long_edge_engine, off_edge};
    use crate::{PresencePoint, RouteQuery};

    fn query() -> RouteQuery {
        RouteQuery::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1000.0 * DEG_PER_KM)).with_presence()
    }

    #[test]
    fn two_points_split_in_order() {
        let engine = long_edge_engine(
            vec![
                PresencePoint::new("x", "b", off_edge(700.0, 2.0)),
                PresencePoint::new("x", "a", off_edge(300.0, 2.0)),
            ],
            5.0,
        );
        let route = engine.solve(&query()).unwrap();

        assert_eq!(route.coordinates.len(), 4);
        assert_eq!(route.segments.len(), 3);
        assert_eq!(route.cable_types.len(), 3);
        assert_eq!(route.inserted.iter().map(|p| p.region.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
        assert!((route.total_distance_km - 1008.0).abs() < 1e-6, "{}", route.total_distance_km);
        for (i, seg) in route.segments.iter().enumerate() {
            assert_eq!(seg.first(), route.coordinates[i]);
            assert_eq!(seg.last(), route.coordinates[i + 1]);
        }
    }

    #[test]
    fn point_on_path_adds_no_spur() {
        let engine = long_edge_engine(vec![PresencePoint::new("x", "on", off_edge(400.0, 0.0))], 5.0);
        let route = engine.solve(&query()).unwrap();
        assert_eq!(route.coordinates.len(), 3);
        assert!((route.total_distance_km - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn points_near_endpoints_skipped() {
        let engine = long_edge_engine(
            vec![
                PresencePoint::new("x", "start", off_edge(5.0, 1.0)),
                PresencePoint::new("x", "end", off_edge(995.0, 1.0)),
            ],
            5.0,
        );
        let route = engine.solve(&query()).unwrap();
        assert_eq!(route.coordinates.len(), 2);
        assert!(route.inserted.is_empty());
    }

    #[test]
    fn crowded_points_keep_spacing() {
        let engine = long_edge_engine(
            vec![
                PresencePoint::new("x", "first", off_edge(500.0, 1.0)),
                PresencePoint::new("x", "second", off_edge(504.0, 1.0)),
            ],
            5.0,
        );
        let route = engine.solve(&query()).unwrap();
        assert_eq!(route.inserted.len(), 1);
        assert_eq!(route.inserted[0].region, "first");
    }

    #[test]
    fn short_edges_not_searched() {
        use pr_core::RouteConfig;

        use super::helpers::row;
        use crate::{EngineBuilder, PresenceSet};

        let (engine, _) = EngineBuilder::new()
            .land(vec![row("A", "B", 90.0, &[(0.0, 0.0), (0.0, 0.8)])])
            .presence(PresenceSet::from_points([PresencePoint::new("x", "mid", GeoPoint::new(0.0, 0.4))]))
            .config(RouteConfig::default())
            .build()
            .unwrap();
        let route = engine
            .solve(&RouteQuery::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.8)).with_presence())
            .unwrap();
        assert_eq!(route.coordinates.len(), 2);
    }
}

// ── Response & queries ────────────────────────────────────────────────────────

#[cfg(test)]
mod response {
    use pr_core::{GeoPoint, Location};

    use super::helpers::chain_engine;
    use crate::{RouteError, RouteQuery};

    #[test]
    fn json_shape() {
        let engine = chain_engine();
        let resp = engine
            .route(&RouteQuery::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 2.7)))
            .unwrap();
        let json = serde_json::to_value(&resp).unwrap();

        assert!((json["total_distance_km"].as_f64().unwrap() - 300.0).abs() < 1e-9);
        assert_eq!(json["route_coordinates"][1], serde_json::json!([0.0, 0.9]));
        assert_eq!(json["cable_types"], serde_json::json!(["land", "land"]));
        let geometry = json["route_geometry"].as_str().unwrap();
        assert!(geometry.starts_with("MULTILINESTRING (("), "{geometry}");
        assert!(geometry.contains("0.9 0"), "{geometry}");
    }

    #[test]
    fn query_from_json() {
        let q: RouteQuery = serde_json::from_str(
            r#"{"src_latitude": 1.0, "src_longitude": 2.0, "dst_latitude": 3.0, "dst_longitude": 4.0,
                "src_provider": "aws"}"#,
        )
        .unwrap();
        assert_eq!(q.src(), GeoPoint::new(1.0, 2.0));
        assert!(!q.search_presence);
        assert_eq!(q.providers(), vec!["aws"]);
    }

    #[test]
    fn batch_keeps_order() {
        let engine = chain_engine();
        let queries = [
            RouteQuery::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 4.05)),
            RouteQuery::new(GeoPoint::new(99.0, 0.0), GeoPoint::new(0.0, 0.0)),
            RouteQuery::new(GeoPoint::new(0.0, 0.9), GeoPoint::new(0.0, 2.7)),
        ];
        let results = engine.route_all(&queries);
        assert_eq!(results.len(), 3);
        assert!((results[0].as_ref().unwrap().total_distance_km - 450.0).abs() < 1e-9);
        assert!(matches!(results[1], Err(RouteError::InvalidCoordinate(_))));
        assert!((results[2].as_ref().unwrap().total_distance_km - 200.0).abs() < 1e-9);
    }

    #[test]
    fn named_locations() {
        let engine = chain_engine();
        let (a, d) = (Location::new("A", "", "X"), Location::new("D", "", "X"));
        let resp = engine.route_locations(&a, &d, None).unwrap();
        assert!((resp.total_distance_km - 450.0).abs() < 1e-9);

        let nowhere = Location::new("Nowhere", "", "X");
        let err = engine.route_locations(&a, &nowhere, None).unwrap_err();
        assert!(matches!(err, RouteError::UnknownLocation(l) if l == nowhere));
    }

    #[test]
    fn nearest_location_and_edges_near() {
        let engine = chain_engine();
        let (loc, km) = engine.nearest_location(GeoPoint::new(0.1, 2.6)).unwrap();
        assert_eq!(loc, &Location::new("C", "", "X"));
        assert!(km < 20.0);

        let links = engine.edges_near(GeoPoint::new(0.02, 1.8), 5.0);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].from, &Location::new("B", "", "X"));
        assert_eq!(links[0].to, &Location::new("C", "", "X"));
    }
}
