use std::fmt;
use std::io::BufRead;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, NetworkConfig};
use crate::graph::{GraphStore, Stop, StopId, StoreError};
use crate::load::{self, LoadError, LoadReport};
use crate::traversal::{self, Distance, PathOutcome};

#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A query endpoint that has no loaded stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Start node {0} does not exist.")]
    UnknownStart(i64),
    #[error("End node {0} does not exist.")]
    UnknownEnd(i64),
}

/// One stop along a route. `stop` is `None` when an edge led through an
/// id that was never loaded from the stops file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStep {
    pub id: StopId,
    pub stop: Option<Stop>,
}

/// A resolved shortest route, origin first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub steps: Vec<PathStep>,
    pub distance: Distance,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Found(Route),
    NoPath { start: StopId, end: StopId },
}

/// A loaded transit network: owns the graph store for its whole lifetime
/// and answers route queries against it.
pub struct TransitNetwork {
    config: NetworkConfig,
    store: GraphStore,
}

impl TransitNetwork {
    /// Validate `config` and allocate the store.
    pub fn new(config: NetworkConfig) -> Result<Self, InitError> {
        config.validate()?;
        let store = GraphStore::initialize(config.capacity)?;
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn load_stops(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, LoadError> {
        load::load_stops_file(&mut self.store, path, self.config.max_field_len)
    }

    pub fn load_edges(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, LoadError> {
        load::load_edges_file(&mut self.store, path, self.config.max_field_len)
    }

    pub fn load_stops_from<R: BufRead>(&mut self, reader: R) -> Result<LoadReport, LoadError> {
        load::load_stops(&mut self.store, reader, self.config.max_field_len)
    }

    pub fn load_edges_from<R: BufRead>(&mut self, reader: R) -> Result<LoadReport, LoadError> {
        load::load_edges(&mut self.store, reader, self.config.max_field_len)
    }

    /// Shortest route between two loaded stops.
    ///
    /// Both ids must name loaded stops; the engine is not run otherwise.
    pub fn route(&self, start: i64, end: i64) -> Result<RouteOutcome, QueryError> {
        let origin = self.known_stop(start).ok_or(QueryError::UnknownStart(start))?;
        let destination = self.known_stop(end).ok_or(QueryError::UnknownEnd(end))?;

        debug!(origin, destination, "running shortest path");
        let outcome = match traversal::shortest_path(&self.store, origin, destination) {
            PathOutcome::Found(path) => RouteOutcome::Found(Route {
                steps: path
                    .stops
                    .into_iter()
                    .map(|id| PathStep {
                        id,
                        stop: self.store.stop(id).cloned(),
                    })
                    .collect(),
                distance: path.distance,
            }),
            PathOutcome::NoPath => RouteOutcome::NoPath {
                start: origin,
                end: destination,
            },
        };
        Ok(outcome)
    }

    fn known_stop(&self, id: i64) -> Option<StopId> {
        self.store
            .index(id)
            .filter(|&i| self.store.stop(i).is_some())
    }
}

const UNKNOWN_NAME: &str = "<unknown>";

impl PathStep {
    pub fn name(&self) -> &str {
        self.stop.as_ref().map_or(UNKNOWN_NAME, |s| s.name.as_str())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(first), Some(last)) = (self.steps.first(), self.steps.last()) {
            writeln!(
                f,
                "Shortest path from {} ({}) to {} ({}):",
                first.id,
                first.name(),
                last.id,
                last.name()
            )?;
        }
        for step in &self.steps {
            match &step.stop {
                Some(stop) => writeln!(
                    f,
                    "{:<10} {:<30} {:<12.8} {:<12.8}",
                    step.id, stop.name, stop.latitude, stop.longitude
                )?,
                None => writeln!(f, "{:<10} {:<30}", step.id, UNKNOWN_NAME)?,
            }
        }
        write!(f, "Total distance: {}", self.distance)
    }
}

impl fmt::Display for RouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteOutcome::Found(route) => write!(f, "{route}"),
            RouteOutcome::NoPath { start, end } => {
                write!(f, "No path exists between {} and {}", start, end)
            }
        }
    }
}
