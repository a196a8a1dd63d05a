//! transit-route: load a stops CSV and an edges CSV, then print the
//! shortest route between two stop numbers.

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::{error, info};
use transit_route_core::{
    NetworkConfig, RouteOutcome, TransitNetwork, DEFAULT_CAPACITY, DEFAULT_MAX_FIELD_LEN,
};

#[derive(Debug, Parser)]
#[command(name = "transit-route", version, about)]
struct Cli {
    /// Stops CSV: stop_no,Name,Latitude,Longitude
    stops: PathBuf,

    /// Edges CSV: from,to,weight
    edges: PathBuf,

    /// Origin stop number
    #[arg(allow_negative_numbers = true)]
    start: i64,

    /// Destination stop number
    #[arg(allow_negative_numbers = true)]
    end: i64,

    /// Maximum number of stop ids; valid ids are 0..capacity
    #[arg(long, env = "TRANSIT_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Longest CSV field kept, in bytes; longer fields are truncated
    #[arg(long, env = "TRANSIT_MAX_FIELD_LEN", default_value_t = DEFAULT_MAX_FIELD_LEN)]
    max_field_len: usize,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> NetworkConfig {
        NetworkConfig {
            capacity: self.capacity,
            max_field_len: self.max_field_len,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut network =
        TransitNetwork::new(cli.config()).context("unable to initialize graph store")?;
    info!(
        capacity = network.config().capacity,
        max_field_len = network.config().max_field_len,
        memory_mb = network.store().memory_usage() / (1024 * 1024),
        "graph store ready"
    );

    // Open failures are reported and the query still runs; it will name
    // whichever endpoint is missing.
    if let Err(e) = network.load_stops(&cli.stops) {
        error!("{e}");
    }
    if let Err(e) = network.load_edges(&cli.edges) {
        error!("{e}");
    }

    match network.route(cli.start, cli.end) {
        Ok(outcome) => {
            if cli.json {
                println!("{}", render_json(&outcome)?);
            } else {
                println!("{outcome}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if cli.json {
                println!("{}", json!({ "status": "error", "message": e.to_string() }));
            } else {
                eprintln!("{e}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn render_json(outcome: &RouteOutcome) -> anyhow::Result<String> {
    let value = match outcome {
        RouteOutcome::Found(route) => json!({ "status": "found", "route": route }),
        RouteOutcome::NoPath { start, end } => {
            json!({ "status": "no_path", "start": start, "end": end })
        }
    };
    serde_json::to_string_pretty(&value).context("unable to render route as JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use transit_route_core::{PathStep, Route, Stop};

    #[test]
    fn test_cli_parses_positionals_and_defaults() {
        let cli = Cli::try_parse_from(["transit-route", "v.csv", "e.csv", "3", "7"]).unwrap();
        assert_eq!(cli.start, 3);
        assert_eq!(cli.end, 7);
        assert!(!cli.json);
        assert_eq!(cli.config().max_field_len, DEFAULT_MAX_FIELD_LEN);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "transit-route",
            "--capacity",
            "64",
            "--max-field-len",
            "20",
            "--json",
            "v.csv",
            "e.csv",
            "0",
            "-1",
        ])
        .unwrap();
        assert_eq!(
            cli.config(),
            NetworkConfig {
                capacity: 64,
                max_field_len: 20
            }
        );
        assert_eq!(cli.end, -1);
        assert!(cli.json);
    }

    #[test]
    fn test_cli_requires_endpoints() {
        assert!(Cli::try_parse_from(["transit-route", "v.csv", "e.csv", "3"]).is_err());
    }

    #[test]
    fn test_render_json_found() {
        let route = Route {
            steps: vec![PathStep {
                id: 5,
                stop: Some(Stop {
                    id: 5,
                    name: "Harbour".into(),
                    latitude: 1.5,
                    longitude: 2.5,
                }),
            }],
            distance: 0,
        };
        let text = render_json(&RouteOutcome::Found(route)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "found");
        assert_eq!(value["route"]["steps"][0]["stop"]["name"], "Harbour");
        assert_eq!(value["route"]["distance"], 0);
    }

    #[test]
    fn test_render_json_no_path() {
        let text = render_json(&RouteOutcome::NoPath { start: 1, end: 2 }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "no_path");
        assert_eq!(value["end"], 2);
    }
}
