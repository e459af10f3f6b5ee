//! Well-known-text codec for path geometry.
//!
//! Stored geometry is `LINESTRING (lon lat, lon lat, …)`, i.e. **(x, y) =
//! (lon, lat)**.  Everything inside the engine is `(lat, lon)`; this module is
//! the only place the order flips.
//!
//! ```text
//! LINESTRING (-122.42 37.77, -118.24 34.05)
//! MULTILINESTRING ((-122.42 37.77, -118.24 34.05), (-118.24 34.05, 139.69 35.68))
//! ```

use std::fmt::Write;

use crate::{CoreError, CoreResult, GeoPath, GeoPoint};

/// Parse a `LINESTRING` into a [`GeoPath`].
///
/// The keyword is case-insensitive and Z/M ordinates, if present, are
/// ignored.  Every coordinate must be a valid latitude/longitude.
pub fn parse_linestring(text: &str) -> CoreResult<GeoPath> {
    let trimmed = text.trim();
    let upper = trimmed.to_ascii_uppercase();
    let Some(rest) = upper.strip_prefix("LINESTRING") else {
        return Err(CoreError::Parse(format!("expected LINESTRING, got {:?}", truncate(trimmed))));
    };

    // Byte offsets are identical between `trimmed` and its ASCII uppercase.
    let body = trimmed[trimmed.len() - rest.len()..].trim_start();
    let body = skip_dimension_tag(body);

    let inner = body
        .strip_prefix('(')
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(|| CoreError::Parse(format!("unbalanced LINESTRING body {:?}", truncate(body))))?;

    let points = inner
        .split(',')
        .map(parse_position)
        .collect::<CoreResult<Vec<_>>>()?;

    GeoPath::new(points)
}

/// Format a path as `LINESTRING (lon lat, …)`.
pub fn format_linestring(path: &GeoPath) -> String {
    let mut out = String::from("LINESTRING ");
    push_coords(&mut out, path);
    out
}

/// Format several paths as one `MULTILINESTRING ((lon lat, …), …)`.
///
/// An empty slice yields `MULTILINESTRING EMPTY`.
pub fn format_multilinestring(paths: &[GeoPath]) -> String {
    if paths.is_empty() {
        return String::from("MULTILINESTRING EMPTY");
    }
    let mut out = String::from("MULTILINESTRING (");
    for (i, path) in paths.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_coords(&mut out, path);
    }
    out.push(')');
    out
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn push_coords(out: &mut String, path: &GeoPath) {
    out.push('(');
    for (i, p) in path.points().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{} {}", p.lon, p.lat);
    }
    out.push(')');
}

fn skip_dimension_tag(body: &str) -> &str {
    for tag in ["ZM", "Z", "M"] {
        if body.get(..tag.len()).is_some_and(|head| head.eq_ignore_ascii_case(tag)) {
            let after = &body[tag.len()..];
            if after.trim_start().starts_with('(') {
                return after.trim_start();
            }
        }
    }
    body
}

fn parse_position(raw: &str) -> CoreResult<GeoPoint> {
    let mut parts = raw.split_whitespace();
    let (Some(x), Some(y)) = (parts.next(), parts.next()) else {
        return Err(CoreError::Parse(format!("coordinate {:?} needs two ordinates", raw.trim())));
    };

    let lon: f64 = x
        .parse()
        .map_err(|_| CoreError::Parse(format!("invalid longitude {x:?}")))?;
    let lat: f64 = y
        .parse()
        .map_err(|_| CoreError::Parse(format!("invalid latitude {y:?}")))?;

    let point = GeoPoint::new(lat, lon);
    if !point.is_valid() {
        return Err(CoreError::Parse(format!("coordinate {point} is out of range")));
    }
    Ok(point)
}

fn truncate(s: &str) -> String {
    s.chars().take(48).collect()
}
