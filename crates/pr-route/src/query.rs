//! Route query input.

use serde::{Deserialize, Serialize};

use pr_core::GeoPoint;

/// One "physical route between two coordinates" request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub src_latitude:    f64,
    pub src_longitude:   f64,
    pub dst_latitude:    f64,
    pub dst_longitude:   f64,
    #[serde(default)]
    pub src_provider:    Option<String>,
    #[serde(default)]
    pub dst_provider:    Option<String>,
    #[serde(default)]
    pub search_presence: bool,
}

impl RouteQuery {
    /// A plain query without presence search.
    pub fn new(src: GeoPoint, dst: GeoPoint) -> Self {
        Self {
            src_latitude:    src.lat,
            src_longitude:   src.lon,
            dst_latitude:    dst.lat,
            dst_longitude:   dst.lon,
            src_provider:    None,
            dst_provider:    None,
            search_presence: false,
        }
    }

    /// Enable presence search.  With no provider named, every provider is
    /// searched.
    pub fn with_presence(mut self) -> Self {
        self.search_presence = true;
        self
    }

    pub fn src_provider(mut self, name: &str) -> Self {
        self.src_provider = Some(name.to_owned());
        self.search_presence = true;
        self
    }

    pub fn dst_provider(mut self, name: &str) -> Self {
        self.dst_provider = Some(name.to_owned());
        self.search_presence = true;
        self
    }

    pub fn src(&self) -> GeoPoint {
        GeoPoint::new(self.src_latitude, self.src_longitude)
    }

    pub fn dst(&self) -> GeoPoint {
        GeoPoint::new(self.dst_latitude, self.dst_longitude)
    }

    /// Named providers, blank names ignored.
    pub fn providers(&self) -> Vec<&str> {
        [self.src_provider.as_deref(), self.dst_provider.as_deref()]
            .into_iter()
            .flatten()
            .filter(|name| !name.trim().is_empty())
            .collect()
    }
}
