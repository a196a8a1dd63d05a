//! transit-route-core: CSV transit network loading and shortest routes.
//!
//! Stops and weighted undirected edges are read from two CSV files into a
//! fixed-capacity weight matrix, then queried with a single-pair Dijkstra.
//! No process or CLI concerns live here; the `transit-route` binary and the
//! benchmark are thin callers of this crate.

mod config;
mod graph;
mod load;
mod query;
mod record;
mod tokenizer;
mod traversal;

pub use config::{
    ConfigError, NetworkConfig, DEFAULT_CAPACITY, DEFAULT_MAX_FIELD_LEN, MAX_CAPACITY,
    MAX_FIELD_LEN_LIMIT,
};
pub use graph::{GraphStore, Stop, StopId, StoreError, Weight};
pub use load::{load_edges, load_edges_file, load_stops, load_stops_file, LoadError, LoadReport};
pub use query::{InitError, PathStep, QueryError, Route, RouteOutcome, TransitNetwork};
pub use record::{parse_float_lenient, parse_int_lenient, EdgeRecord, RecordReader, StopRecord};
pub use tokenizer::{Field, FieldEnd, FieldReader};
pub use traversal::{shortest_path, Distance, Path, PathOutcome};
