//! Fluent builder for constructing a [`RouteEngine`].

use pr_core::RouteConfig;
use pr_graph::{BuildReport, DijkstraRouter, EdgeRecord, Router, build_network};

use crate::presence::PresenceSet;
use crate::{RouteEngine, RouteError, RouteResult};

enum RouterChoice<R> {
    FromConfig(fn(&RouteConfig) -> R),
    Given(R),
}

/// Fluent builder for [`RouteEngine<R>`].
///
/// # Inputs (all optional)
///
/// | Method           | Default                                     |
/// |------------------|---------------------------------------------|
/// | `.land(rows)`    | no land edges                               |
/// | `.submarine(rows)` | no submarine edges                        |
/// | `.bridge(rows)`  | no bridge edges                             |
/// | `.presence(set)` | empty `PresenceSet`                         |
/// | `.config(cfg)`   | `RouteConfig::default()`                    |
/// | `.router(r)`     | `DijkstraRouter` with `config.hop_km`       |
///
/// # Example
///
/// ```rust,ignore
/// let (engine, report) = EngineBuilder::new()
///     .land(load_edges_csv("land.csv".as_ref())?)
///     .submarine(load_edges_csv("submarine.csv".as_ref())?)
///     .presence(load_presence_csv("presence.csv".as_ref())?)
///     .build()?;
/// let response = engine.route(&RouteQuery::new(src, dst))?;
/// ```
pub struct EngineBuilder<R: Router = DijkstraRouter> {
    land:      Vec<EdgeRecord>,
    submarine: Vec<EdgeRecord>,
    bridge:    Vec<EdgeRecord>,
    presence:  PresenceSet,
    config:    RouteConfig,
    router:    RouterChoice<R>,
}

impl EngineBuilder<DijkstraRouter> {
    pub fn new() -> Self {
        Self {
            land:      Vec::new(),
            submarine: Vec::new(),
            bridge:    Vec::new(),
            presence:  PresenceSet::new(),
            config:    RouteConfig::default(),
            router:    RouterChoice::FromConfig(|cfg| DijkstraRouter::new(cfg.hop_km)),
        }
    }
}

impl Default for EngineBuilder<DijkstraRouter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Router> EngineBuilder<R> {
    /// Terrestrial cable rows.
    pub fn land(mut self, rows: Vec<EdgeRecord>) -> Self {
        self.land = rows;
        self
    }

    /// Submarine cable rows.
    pub fn submarine(mut self, rows: Vec<EdgeRecord>) -> Self {
        self.submarine = rows;
        self
    }

    /// Landing-station-to-land bridge rows.
    pub fn bridge(mut self, rows: Vec<EdgeRecord>) -> Self {
        self.bridge = rows;
        self
    }

    pub fn presence(mut self, presence: PresenceSet) -> Self {
        self.presence = presence;
        self
    }

    pub fn config(mut self, config: RouteConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the routing algorithm.
    pub fn router<R2: Router>(self, router: R2) -> EngineBuilder<R2> {
        EngineBuilder {
            land:      self.land,
            submarine: self.submarine,
            bridge:    self.bridge,
            presence:  self.presence,
            config:    self.config,
            router:    RouterChoice::Given(router),
        }
    }

    /// Validate the configuration, build the network and return the engine
    /// together with the ingestion report.
    pub fn build(self) -> RouteResult<(RouteEngine<R>, BuildReport)> {
        self.config
            .validate()
            .map_err(|e| RouteError::Config(e.to_string()))?;
        let router = match self.router {
            RouterChoice::FromConfig(make) => make(&self.config),
            RouterChoice::Given(r) => r,
        };
        let (network, report) = build_network(
            &self.land,
            &self.submarine,
            &self.bridge,
            self.config.augment.same_city_km,
        );
        let engine = RouteEngine::new(network, self.presence, self.config, router)?;
        Ok((engine, report))
    }
}
