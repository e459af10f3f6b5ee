//! Routing configuration.
//!
//! Typically deserialized from a TOML/JSON file by the application crate
//! (enable the `serde` feature) and handed to the engine builder.

use crate::{CoreError, CoreResult};

/// Default per-hop cost constant, in kilometres.
///
/// The edge cost is `1 + length_km / hop_km`: one unit for the fixed
/// per-hop device draw plus a distance-proportional amplifier/regenerator
/// share.  The power breakeven this was derived from (≈ 5.5 km) does not
/// match the constant in use (5 500 km); the value is kept as-is and
/// exposed as [`RouteConfig::hop_km`] until the intended breakeven is
/// confirmed.
pub const DEFAULT_HOP_KM: f64 = 5_500.0;

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouteConfig {
    /// How query coordinates are attached to the graph.
    pub augment: AugmentConfig,

    /// How presence points are spliced into a solved path.
    pub splice: SpliceConfig,

    /// Cost constant `K` of the edge cost `1 + length_km / K`.  Larger values
    /// favour fewer hops more strongly.  Default: [`DEFAULT_HOP_KM`].
    pub hop_km: f64,
}

/// Query augmentation parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AugmentConfig {
    /// Fixed connection radius around a query coordinate.  Default: 50 km.
    pub connect_radius_km: f64,

    /// The radius widens to `nearest_km * widen_factor` in sparse regions so
    /// at least one candidate always exists.  Default: 1.5.
    pub widen_factor: f64,

    /// Two coordinates closer than this are the "same city".  Used to reuse
    /// existing locations, to skip zero-length connections, and for the
    /// coordinate-drift and edge-endpoint checks at build time.
    /// Default: 10 km.
    pub same_city_km: f64,
}

/// Presence splicing parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpliceConfig {
    /// Edges shorter than this are never searched.  Default: 100 km.
    pub min_hop_km: f64,

    /// A presence point must lie within this distance of an edge's geometry.
    /// Default: 5 km.
    pub max_point_to_path_km: f64,

    /// Inserted points closer than this to the previous emitted coordinate or
    /// to the edge's far end are skipped.  Default: 10 km.
    pub min_insert_spacing_km: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            augment: AugmentConfig::default(),
            splice:  SpliceConfig::default(),
            hop_km:  DEFAULT_HOP_KM,
        }
    }
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            connect_radius_km: 50.0,
            widen_factor:      1.5,
            same_city_km:      10.0,
        }
    }
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            min_hop_km:            100.0,
            max_point_to_path_km:  5.0,
            min_insert_spacing_km: 10.0,
        }
    }
}

impl RouteConfig {
    /// Reject values that would make routing meaningless.
    pub fn validate(&self) -> CoreResult<()> {
        let checks = [
            ("hop_km", self.hop_km, self.hop_km > 0.0),
            ("augment.connect_radius_km", self.augment.connect_radius_km, self.augment.connect_radius_km >= 0.0),
            ("augment.widen_factor", self.augment.widen_factor, self.augment.widen_factor >= 1.0),
            ("augment.same_city_km", self.augment.same_city_km, self.augment.same_city_km >= 0.0),
            ("splice.min_hop_km", self.splice.min_hop_km, self.splice.min_hop_km >= 0.0),
            ("splice.max_point_to_path_km", self.splice.max_point_to_path_km, self.splice.max_point_to_path_km >= 0.0),
            ("splice.min_insert_spacing_km", self.splice.min_insert_spacing_km, self.splice.min_insert_spacing_km >= 0.0),
        ];
        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(CoreError::Config(format!("{name} = {value} is out of range")));
            }
        }
        Ok(())
    }
}
