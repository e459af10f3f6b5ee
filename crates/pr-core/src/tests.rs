//! Unit tests for pr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId::from_index(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id, NodeId(42));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::default(), EdgeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(EdgeId(7).to_string(), "EdgeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::geo::chord_for_km;
    use crate::{EARTH_RADIUS_KM, GeoPoint};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(37.3382, -121.8863);
        assert!(p.distance_km(p) < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let expected = EARTH_RADIUS_KM * 1f64.to_radians();
        assert!((a.distance_km(b) - expected).abs() < 1e-9);
    }

    #[test]
    fn closeness_by_distance_and_by_value() {
        let sj = GeoPoint::new(37.3382, -121.8863);
        let santa_clara = GeoPoint::new(37.3541, -121.9552);
        assert!(sj.is_close(santa_clara, Some(10.0)));
        assert!(!sj.is_close(santa_clara, None));
        assert!(sj.is_close(GeoPoint::new(37.3382, -121.8863), None));
        assert!(GeoPoint::new(0.0, 0.0).is_close(GeoPoint::new(0.0, 0.0), None));
    }

    #[test]
    fn validity() {
        assert!(GeoPoint::new(90.0, -180.0).is_valid());
        assert!(!GeoPoint::new(90.5, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn intermediate_halfway_on_equator() {
        let mid = GeoPoint::new(0.0, 0.0).intermediate(GeoPoint::new(0.0, 10.0), 0.5);
        assert!(mid.lat.abs() < 1e-12);
        assert!((mid.lon - 5.0).abs() < 1e-9);
    }

    #[test]
    fn unit_vector_roundtrip() {
        let p = GeoPoint::new(-33.8688, 151.2093);
        let q = GeoPoint::from_unit_vector(p.to_unit_vector());
        assert!(p.is_close(q, None), "{p} vs {q}");
    }

    #[test]
    fn chord_is_monotonic() {
        assert_eq!(chord_for_km(0.0), 0.0);
        assert!(chord_for_km(10.0) < chord_for_km(20.0));
        assert!((chord_for_km(1.0e9) - 2.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod path {
    use crate::{CoreError, CutAt, EARTH_RADIUS_KM, GeoPath, GeoPoint};

    fn km_per_degree() -> f64 {
        EARTH_RADIUS_KM * 1f64.to_radians()
    }

    /// Equator path with vertices at lon 0, 1 and 3.
    fn equator() -> GeoPath {
        GeoPath::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn empty_path_rejected() {
        assert_eq!(GeoPath::new(vec![]), Err(CoreError::EmptyPath));
    }

    #[test]
    fn length_is_great_circle_sum() {
        assert!((equator().length_km() - 3.0 * km_per_degree()).abs() < 1e-6);
        let single = GeoPath::new(vec![GeoPoint::new(1.0, 1.0)]).unwrap();
        assert_eq!(single.length_km(), 0.0);
    }

    #[test]
    fn reversed_keeps_length() {
        let path = equator();
        let rev = path.reversed();
        assert_eq!(rev.first(), path.last());
        assert_eq!(rev.last(), path.first());
        assert!((rev.length_km() - path.length_km()).abs() < 1e-9);
    }

    #[test]
    fn project_onto_interior_and_beyond_ends() {
        let path = equator();
        // Off the path to the north, above lon 2.
        let p = path.project(GeoPoint::new(0.5, 2.0));
        assert!((p.along_km - 2.0 * km_per_degree()).abs() < 1e-6);
        assert!((p.offset_km - 0.5 * km_per_degree()).abs() < 1e-6);

        // Before the first vertex clamps to zero.
        assert_eq!(path.project_km(GeoPoint::new(0.0, -2.0)), 0.0);
        // Past the last vertex clamps to the full length.
        let end = path.project_km(GeoPoint::new(0.0, 5.0));
        assert!((end - path.length_km()).abs() < 1e-9);
    }

    #[test]
    fn project_past_end_of_long_segment() {
        // Past `b` on a 170° arc the in-plane angle wraps negative; the
        // nearer end is still `b`.
        let b = GeoPoint::new(0.0, 170.0);
        let path = GeoPath::new(vec![GeoPoint::new(0.0, 0.0), b]).unwrap();
        let point = GeoPoint::new(0.0, -175.0);
        let p = path.project(point);
        assert_eq!(p.foot, b);
        assert!((p.offset_km - 15.0 * km_per_degree()).abs() < 1e-6, "{}", p.offset_km);
        assert!((p.along_km - path.length_km()).abs() < 1e-9);
    }

    #[test]
    fn empty_vertex_list_is_rejected() {
        assert!(matches!(GeoPath::try_from(Vec::new()), Err(CoreError::EmptyPath)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_rejects_empty_path() {
        assert!(serde_json::from_str::<GeoPath>("[]").is_err());
        let path: GeoPath = serde_json::from_str(r#"[{"lat": 0.0, "lon": 1.0}]"#).unwrap();
        assert_eq!(path.first(), GeoPoint::new(0.0, 1.0));
    }

    #[test]
    fn cut_at_ends_returns_original() {
        let path = equator();
        for d in [0.0, path.length_km()] {
            let cut = path.cut(CutAt::Distance(d)).unwrap();
            assert!(!cut.added_spur);
            assert_eq!(cut.segments, vec![path.clone()]);
        }
    }

    #[test]
    fn cut_out_of_range() {
        let path = equator();
        let len = path.length_km();
        assert!(matches!(path.cut(CutAt::Distance(-5.0)), Err(CoreError::OutOfRange { .. })));
        assert!(matches!(path.cut(CutAt::Distance(len + 5.0)), Err(CoreError::OutOfRange { .. })));
    }

    #[test]
    fn cut_on_vertex_shares_it() {
        let path = equator();
        let cut = path.cut(CutAt::Distance(km_per_degree())).unwrap();
        assert!(cut.is_split());
        assert!(!cut.added_spur);
        assert_eq!(cut.segments[0].points(), &path.points()[..2]);
        assert_eq!(cut.segments[1].points(), &path.points()[1..]);
    }

    #[test]
    fn cut_without_spur_conserves_length() {
        let path = GeoPath::new(vec![
            GeoPoint::new(10.0, 10.0),
            GeoPoint::new(20.0, 30.0),
            GeoPoint::new(15.0, 45.0),
        ])
        .unwrap();
        let len = path.length_km();
        for fraction in [0.1, 0.37, 0.5, 0.93] {
            let cut = path.cut(CutAt::Distance(len * fraction)).unwrap();
            assert!(cut.is_split());
            assert!(!cut.added_spur);
            let sum = cut.segments[0].length_km() + cut.segments[1].length_km();
            assert!((sum - len).abs() < 1e-6, "fraction {fraction}: {sum} vs {len}");
            assert!((cut.segments[0].length_km() - len * fraction).abs() < 1e-6);
        }
    }

    #[test]
    fn cut_with_off_path_point_adds_spur() {
        let path = equator();
        let insert = GeoPoint::new(0.1, 2.0);
        let cut = path.cut(CutAt::Point(insert)).unwrap();
        assert!(cut.added_spur);

        let head = cut.segments[0].points();
        let tail = cut.segments[1].points();
        assert_eq!(head.last(), Some(&insert));
        assert_eq!(tail.first(), Some(&insert));
        // The cut coordinate sits next to the spur on both sides.
        assert_eq!(head[head.len() - 2], tail[1]);
        assert!((cut.spur_km() - 0.1 * km_per_degree()).abs() < 1e-6);
    }

    #[test]
    fn cut_with_on_path_point_has_no_spur() {
        let path = equator();
        let cp = GeoPoint::new(0.0, 2.0);
        let cut = path
            .cut(CutAt::DistanceWithPoint { distance_km: 2.0 * km_per_degree(), point: cp })
            .unwrap();
        assert!(cut.is_split());
        assert!(!cut.added_spur);
        assert_eq!(cut.spur_km(), 0.0);
    }
}

#[cfg(test)]
mod wkt {
    use crate::wkt::{format_linestring, format_multilinestring, parse_linestring};
    use crate::{CoreError, GeoPath, GeoPoint};

    #[test]
    fn parse_flips_to_lat_lon() {
        let path = parse_linestring("LINESTRING (-122.42 37.77, -118.24 34.05)").unwrap();
        assert_eq!(path.first(), GeoPoint::new(37.77, -122.42));
        assert_eq!(path.last(), GeoPoint::new(34.05, -118.24));
    }

    #[test]
    fn parse_tolerates_case_and_z() {
        let path = parse_linestring("linestring z(1 2 3,4 5 6)").unwrap();
        assert_eq!(path.points(), &[GeoPoint::new(2.0, 1.0), GeoPoint::new(5.0, 4.0)]);
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in [
            "POINT (1 2)",
            "LINESTRING (1 abc)",
            "LINESTRING (1 2, 3)",
            "LINESTRING (1 2",
            "LINESTRING EMPTY",
            "LINESTRING (200 10, 0 0)",
            "",
        ] {
            assert!(matches!(parse_linestring(bad), Err(CoreError::Parse(_))), "{bad:?}");
        }
    }

    #[test]
    fn format_roundtrip() {
        let path = GeoPath::straight(GeoPoint::new(1.5, 2.5), GeoPoint::new(-3.0, 4.0));
        let text = format_linestring(&path);
        assert_eq!(text, "LINESTRING (2.5 1.5, 4 -3)");
        assert_eq!(parse_linestring(&text).unwrap(), path);
    }

    #[test]
    fn format_multi() {
        let a = GeoPath::straight(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0));
        let b = GeoPath::straight(GeoPoint::new(1.0, 1.0), GeoPoint::new(2.0, 3.0));
        assert_eq!(
            format_multilinestring(&[a, b]),
            "MULTILINESTRING ((0 0, 1 1), (1 1, 3 2))"
        );
        assert_eq!(format_multilinestring(&[]), "MULTILINESTRING EMPTY");
    }
}

#[cfg(test)]
mod location {
    use crate::{CableType, Location};

    #[test]
    fn fields_are_trimmed() {
        assert_eq!(Location::new(" San Jose ", "CA ", " USA"), Location::new("San Jose", "CA", "USA"));
    }

    #[test]
    fn display_skips_empty_fields() {
        assert_eq!(Location::new("San Jose", "CA", "USA").to_string(), "San Jose/CA/USA");
        assert_eq!(Location::new("Tokyo", "", "Japan").to_string(), "Tokyo/Japan");
        assert_eq!(Location::synthetic("source").to_string(), "source");
    }

    #[test]
    fn parse_shorthand() {
        assert_eq!(Location::parse("Tokyo/Japan").unwrap(), Location::new("Tokyo", "", "Japan"));
        assert_eq!(Location::parse("San Jose / CA / USA").unwrap(), Location::new("San Jose", "CA", "USA"));
        assert_eq!(Location::parse("source").unwrap(), Location::synthetic("source"));
        assert!(Location::parse("").is_err());
        assert!(Location::parse("a/b/c/d").is_err());
    }

    #[test]
    fn parse_reads_display() {
        let loc = Location::new("Los Angeles", "CA", "USA");
        assert_eq!(Location::parse(&loc.to_string()).unwrap(), loc);
    }

    #[test]
    fn cable_labels() {
        assert_eq!(CableType::Land.to_string(), "land");
        assert_eq!(CableType::Submarine.as_str(), "submarine");
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, RouteConfig};

    #[test]
    fn defaults_validate() {
        let cfg = RouteConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.augment.connect_radius_km, 50.0);
        assert_eq!(cfg.augment.widen_factor, 1.5);
    }

    #[test]
    fn non_positive_hop_km_rejected() {
        let cfg = RouteConfig { hop_km: 0.0, ..RouteConfig::default() };
        assert!(matches!(cfg.validate(), Err(CoreError::Config(_))));
    }
}
