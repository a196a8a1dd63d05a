use std::fmt::Write as _;
use std::time::Instant;

use transit_route_core::{NetworkConfig, RouteOutcome, TransitNetwork, MAX_CAPACITY};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let stop_count: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(2_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: transit-route-bench [mode] [stop_count]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  grid        Manhattan street grid with uniform block weights");
        println!("  corridor    Trunk line with branch routes hanging off it");
        println!("  smallworld  Ring of neighbouring stops plus express shortcuts");
        println!("  random      Uniform random edges (sparse, may be disconnected)");
        println!();
        println!("Default stop_count: 2000 (max {})", MAX_CAPACITY);
        return;
    }

    if stop_count < 2 || stop_count > MAX_CAPACITY {
        eprintln!("stop_count must be between 2 and {}", MAX_CAPACITY);
        return;
    }

    println!("transit-route-bench");
    println!("===================");
    println!();

    let generators: Vec<(&str, fn(usize) -> Dataset)> = match mode {
        "grid" => vec![("Street grid", gen_grid)],
        "corridor" => vec![("Trunk corridor with branches", gen_corridor)],
        "smallworld" => vec![("Small-world ring", gen_small_world)],
        "random" => vec![("Uniform random", gen_random)],
        "all" => vec![
            ("Street grid", gen_grid as fn(usize) -> Dataset),
            ("Trunk corridor with branches", gen_corridor),
            ("Small-world ring", gen_small_world),
            ("Uniform random", gen_random),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, stop_count);
    }
}

fn run_benchmark(name: &str, generator: fn(usize) -> Dataset, stop_count: usize) {
    println!("--- {} ---", name);
    println!("Target: {} stops", stop_count);

    let t = Instant::now();
    let data = generator(stop_count);
    println!(
        "Generated in {:.2}s: {} bytes of stops CSV, {} bytes of edges CSV",
        t.elapsed().as_secs_f64(),
        data.stops.len(),
        data.edges.len()
    );

    let t = Instant::now();
    let mut network = match TransitNetwork::new(NetworkConfig::with_capacity(stop_count)) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Unable to allocate store: {}", e);
            return;
        }
    };
    let alloc_time = t.elapsed();

    let t = Instant::now();
    let stops = network.load_stops_from(data.stops.as_bytes());
    let edges = network.load_edges_from(data.edges.as_bytes());
    let load_time = t.elapsed();

    match (stops, edges) {
        (Ok(s), Ok(e)) => println!(
            "Allocated in {:.1}ms, loaded {} stops / {} edges in {:.1}ms, ~{:.0}MB",
            alloc_time.as_secs_f64() * 1000.0,
            s.loaded,
            e.loaded,
            load_time.as_secs_f64() * 1000.0,
            network.store().memory_usage() as f64 / 1_048_576.0
        ),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Load failed: {}", e);
            return;
        }
    }

    println!();
    println!("{:>8} {:>8} {:>8} {:>12} {:>10}", "from", "to", "stops", "distance", "time");
    println!("{:->8} {:->8} {:->8} {:->12} {:->10}", "", "", "", "", "");

    let last = stop_count as i64 - 1;
    let mut rng = FastRng::new(2024);
    let mut pairs = vec![(0, last), (0, last / 2), (last / 3, last)];
    for _ in 0..5 {
        pairs.push((
            rng.next(stop_count as u64) as i64,
            rng.next(stop_count as u64) as i64,
        ));
    }

    for (from, to) in pairs {
        let t = Instant::now();
        let outcome = network.route(from, to);
        let elapsed = t.elapsed().as_secs_f64() * 1000.0;
        match outcome {
            Ok(RouteOutcome::Found(route)) => println!(
                "{:>8} {:>8} {:>8} {:>12} {:>8.1}ms",
                from,
                to,
                route.steps.len(),
                route.distance,
                elapsed
            ),
            Ok(RouteOutcome::NoPath { .. }) => {
                println!("{:>8} {:>8} {:>8} {:>12} {:>8.1}ms", from, to, "-", "no path", elapsed)
            }
            Err(e) => println!("{:>8} {:>8} {}", from, to, e),
        }
    }
    println!();
}

// ---------------------------------------------------------------------------
// Generators: deterministic, emit CSV text exactly as the loaders read it
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

const STREETS: [&str; 6] = ["Main St", "Quay Rd", "Mill Ln", "Church St", "Bridge Rd", "Market Sq"];

struct Dataset {
    stops: String,
    edges: String,
}

impl Dataset {
    /// Stop rows for ids `0..stop_count`, scattered around a city centre.
    /// Every other name is quoted with an embedded comma.
    fn new(stop_count: usize, rng: &mut FastRng) -> Self {
        let mut stops = String::from("stop_no,Name,Latitude,Longitude\n");
        for id in 0..stop_count {
            let street = STREETS[rng.next(STREETS.len() as u64) as usize];
            let lat = 53.30 + rng.next_f64() * 0.1;
            let lon = -6.30 + rng.next_f64() * 0.1;
            if id % 2 == 0 {
                let _ = writeln!(stops, "{},\"{}, Stop {}\",{:.6},{:.6}", id, street, id, lat, lon);
            } else {
                let _ = writeln!(stops, "{},{} {},{:.6},{:.6}", id, street, id, lat, lon);
            }
        }
        Self {
            stops,
            edges: String::from("from,to,weight\n"),
        }
    }

    fn edge(&mut self, from: usize, to: usize, weight: u64) {
        let _ = writeln!(self.edges, "{},{},{}", from, to, weight);
    }
}

/// Square street grid: each stop links to its east and south neighbour.
/// Many equal-cost routes, which exercises tie-breaking.
fn gen_grid(stop_count: usize) -> Dataset {
    let mut rng = FastRng::new(42);
    let mut data = Dataset::new(stop_count, &mut rng);
    let side = (stop_count as f64).sqrt().ceil() as usize;

    for id in 0..stop_count {
        let east = id + 1;
        let south = id + side;
        if east % side != 0 && east < stop_count {
            data.edge(id, east, 3);
        }
        if south < stop_count {
            data.edge(id, south, 3);
        }
    }
    data
}

/// A trunk line over the first quarter of stops, with the rest split into
/// branch lines that each join the trunk at a random stop.
fn gen_corridor(stop_count: usize) -> Dataset {
    let mut rng = FastRng::new(12345);
    let mut data = Dataset::new(stop_count, &mut rng);
    let trunk = (stop_count / 4).max(2);

    for id in 1..trunk {
        data.edge(id - 1, id, 1 + rng.next(4));
    }

    let mut id = trunk;
    while id < stop_count {
        let branch_len = 5 + rng.next(20) as usize;
        let junction = rng.next(trunk as u64) as usize;
        data.edge(junction, id, 2 + rng.next(8));
        for next in (id + 1)..(id + branch_len).min(stop_count) {
            data.edge(next - 1, next, 2 + rng.next(8));
        }
        id += branch_len;
    }
    data
}

/// Ring of neighbouring stops plus occasional long express links.
fn gen_small_world(stop_count: usize) -> Dataset {
    let k = 3usize;
    let p = 0.05f64;
    let mut rng = FastRng::new(67890);
    let mut data = Dataset::new(stop_count, &mut rng);

    for id in 0..stop_count {
        for j in 1..=k {
            data.edge(id, (id + j) % stop_count, 2 * j as u64);
        }
        if rng.next_f64() < p {
            let express = rng.next(stop_count as u64) as usize;
            if express != id {
                data.edge(id, express, 15 + rng.next(30));
            }
        }
    }
    data
}

/// Uniform random edges, about two per stop.
fn gen_random(stop_count: usize) -> Dataset {
    let mut rng = FastRng::new(99999);
    let mut data = Dataset::new(stop_count, &mut rng);

    for _ in 0..stop_count * 2 {
        let from = rng.next(stop_count as u64) as usize;
        let to = rng.next(stop_count as u64) as usize;
        if from != to {
            data.edge(from, to, 1 + rng.next(100));
        }
    }
    data
}
