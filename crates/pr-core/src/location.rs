//! Canonical node identity and cable classification.

use std::fmt;

use crate::{CoreError, CoreResult};

/// A `(city, state, country)` node key.
///
/// Edge sources spell the same place inconsistently (stray whitespace in
/// particular), so [`Location::new`] is the single normalization point and
/// every graph key must be built through it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub city:    String,
    pub state:   String,
    pub country: String,
}

impl Location {
    /// Build a location, trimming surrounding whitespace from every field.
    pub fn new(city: &str, state: &str, country: &str) -> Self {
        Self {
            city:    city.trim().to_owned(),
            state:   state.trim().to_owned(),
            country: country.trim().to_owned(),
        }
    }

    /// A query-scoped location `(label, "", "")`.
    pub fn synthetic(label: &str) -> Self {
        Self::new(label, "", "")
    }

    /// Parse the `/`-separated shorthand: `city`, `city/country` or
    /// `city/state/country`.
    pub fn parse(text: &str) -> CoreResult<Self> {
        let parts: Vec<&str> = text.split('/').collect();
        let location = match parts.as_slice() {
            [city] => Self::new(city, "", ""),
            [city, country] => Self::new(city, "", country),
            [city, state, country] => Self::new(city, state, country),
            _ => return Err(CoreError::Parse(format!("location {text:?} has more than three parts"))),
        };
        if location.city.is_empty() {
            return Err(CoreError::Parse(format!("location {text:?} has no city")));
        }
        Ok(location)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.state.is_empty(), self.country.is_empty()) {
            (true, true)   => write!(f, "{}", self.city),
            (true, false)  => write!(f, "{}/{}", self.city, self.country),
            (false, true)  => write!(f, "{}/{}", self.city, self.state),
            (false, false) => write!(f, "{}/{}/{}", self.city, self.state, self.country),
        }
    }
}

/// Physical medium of an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CableType {
    #[default]
    Land,
    Submarine,
}

impl CableType {
    pub fn as_str(self) -> &'static str {
        match self {
            CableType::Land => "land",
            CableType::Submarine => "submarine",
        }
    }
}

impl fmt::Display for CableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
