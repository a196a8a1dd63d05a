use tracing::debug;

use crate::graph::{GraphStore, StopId};

/// Total path cost. Wider than [`crate::Weight`] so sums cannot overflow.
pub type Distance = u64;

/// Stop ids from origin to destination inclusive, plus the summed weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub stops: Vec<StopId>,
    pub distance: Distance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    Found(Path),
    /// The destination is not reachable from the origin.
    NoPath,
}

/// Single-pair Dijkstra over the dense weight matrix.
///
/// Label-setting with a linear minimum scan per iteration: at most
/// `capacity` iterations, stopping early once no unfinalized stop is
/// reachable or the destination has been finalized. Among equal
/// distances the lowest id is selected first, and a neighbor's
/// predecessor only changes on a strictly shorter distance, so equal-cost
/// routes resolve deterministically.
///
/// Ids outside the store's capacity yield [`PathOutcome::NoPath`].
pub fn shortest_path(store: &GraphStore, origin: StopId, destination: StopId) -> PathOutcome {
    let n = store.capacity();
    if origin >= n || destination >= n {
        return PathOutcome::NoPath;
    }

    // None = unreached / no predecessor
    let mut distance: Vec<Option<Distance>> = vec![None; n];
    let mut predecessor: Vec<Option<StopId>> = vec![None; n];
    let mut finalized = vec![false; n];
    distance[origin] = Some(0);

    let mut iterations = 0usize;
    for _ in 0..n {
        let Some((u, du)) = closest_unfinalized(&distance, &finalized) else {
            debug!(origin, destination, iterations, "no reachable stops left");
            break;
        };
        iterations += 1;
        finalized[u] = true;

        for (v, w) in store.neighbors(u) {
            if finalized[v] {
                continue;
            }
            let candidate = du + Distance::from(w);
            if distance[v].map_or(true, |dv| candidate < dv) {
                distance[v] = Some(candidate);
                predecessor[v] = Some(u);
            }
        }

        if u == destination {
            debug!(origin, destination, iterations, "destination finalized");
            break;
        }
    }

    let Some(total) = distance[destination] else {
        return PathOutcome::NoPath;
    };

    PathOutcome::Found(Path {
        stops: reconstruct_path(&predecessor, destination),
        distance: total,
    })
}

/// First unfinalized stop (in id order) with the strictly smallest distance.
fn closest_unfinalized(
    distance: &[Option<Distance>],
    finalized: &[bool],
) -> Option<(StopId, Distance)> {
    let mut best: Option<(StopId, Distance)> = None;
    for (id, (d, &done)) in distance.iter().zip(finalized).enumerate() {
        if done {
            continue;
        }
        if let Some(d) = *d {
            if best.map_or(true, |(_, b)| d < b) {
                best = Some((id, d));
            }
        }
    }
    best
}

/// Walk predecessor links back from `destination`; the origin is the only
/// reached stop without a predecessor.
fn reconstruct_path(predecessor: &[Option<StopId>], destination: StopId) -> Vec<StopId> {
    let mut path = vec![destination];
    let mut current = destination;

    while let Some(prev) = predecessor[current] {
        path.push(prev);
        current = prev;
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_graph(capacity: usize, edges: &[(i64, i64, i64)]) -> GraphStore {
        let mut g = GraphStore::initialize(capacity).unwrap();
        for &(from, to, weight) in edges {
            g.set_edge(from, to, weight).unwrap();
        }
        g
    }

    fn make_chain(n: i64) -> GraphStore {
        let edges: Vec<_> = (0..n - 1).map(|i| (i, i + 1, 1)).collect();
        make_graph(n as usize, &edges)
    }

    /// 0-1=1, 1-2=2, 2-3=1, 3-0=4
    fn make_cycle() -> GraphStore {
        make_graph(4, &[(0, 1, 1), (1, 2, 2), (2, 3, 1), (3, 0, 4)])
    }

    fn found(outcome: PathOutcome) -> Path {
        match outcome {
            PathOutcome::Found(p) => p,
            PathOutcome::NoPath => panic!("expected a path"),
        }
    }

    #[test]
    fn test_shortest_path_cycle() {
        let g = make_cycle();
        let path = found(shortest_path(&g, 0, 2));
        assert_eq!(path.stops, vec![0, 1, 2]);
        assert_eq!(path.distance, 3);
    }

    #[test]
    fn test_shortest_path_cycle_other_way() {
        let g = make_cycle();
        let path = found(shortest_path(&g, 0, 3));
        // 0-3 direct is 4, 0-1-2-3 is also 4; direct edge reaches 3 first
        assert_eq!(path.distance, 4);
        assert_eq!(path.stops, vec![0, 3]);
    }

    #[test]
    fn test_shortest_path_undirected() {
        let g = make_cycle();
        let path = found(shortest_path(&g, 2, 0));
        assert_eq!(path.stops, vec![2, 1, 0]);
        assert_eq!(path.distance, 3);
    }

    #[test]
    fn test_shortest_path_chain() {
        let g = make_chain(6);
        let path = found(shortest_path(&g, 0, 5));
        assert_eq!(path.stops, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(path.distance, 5);
    }

    #[test]
    fn test_shortest_path_self() {
        let g = make_chain(3);
        let path = found(shortest_path(&g, 1, 1));
        assert_eq!(path.stops, vec![1]);
        assert_eq!(path.distance, 0);
    }

    #[test]
    fn test_shortest_path_prefers_cheaper_detour() {
        let g = make_graph(4, &[(0, 3, 10), (0, 1, 2), (1, 2, 2), (2, 3, 2)]);
        let path = found(shortest_path(&g, 0, 3));
        assert_eq!(path.stops, vec![0, 1, 2, 3]);
        assert_eq!(path.distance, 6);
    }

    #[test]
    fn test_tie_break_lowest_id_first() {
        // two routes of cost 2: via 1 and via 2
        let g = make_graph(4, &[(0, 1, 1), (1, 3, 1), (0, 2, 1), (2, 3, 1)]);
        let path = found(shortest_path(&g, 0, 3));
        assert_eq!(path.stops, vec![0, 1, 3]);
        assert_eq!(path.distance, 2);
    }

    #[test]
    fn test_isolated_destination() {
        let g = make_graph(5, &[(0, 1, 1), (1, 2, 1)]);
        assert_eq!(shortest_path(&g, 0, 4), PathOutcome::NoPath);
    }

    #[test]
    fn test_disconnected_components() {
        let g = make_graph(4, &[(0, 1, 1), (2, 3, 1)]);
        assert_eq!(shortest_path(&g, 0, 3), PathOutcome::NoPath);
        assert_eq!(shortest_path(&g, 3, 2), found_outcome(vec![3, 2], 1));
    }

    fn found_outcome(stops: Vec<StopId>, distance: Distance) -> PathOutcome {
        PathOutcome::Found(Path { stops, distance })
    }

    #[test]
    fn test_out_of_range_ids() {
        let g = make_chain(3);
        assert_eq!(shortest_path(&g, 0, 3), PathOutcome::NoPath);
        assert_eq!(shortest_path(&g, 7, 0), PathOutcome::NoPath);
    }

    #[test]
    fn test_large_weights_do_not_overflow() {
        let max = i64::from(u32::MAX);
        let g = make_graph(3, &[(0, 1, max), (1, 2, max)]);
        let path = found(shortest_path(&g, 0, 2));
        assert_eq!(path.distance, 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_self_loop_ignored() {
        let g = make_graph(3, &[(0, 0, 5), (0, 1, 2)]);
        let path = found(shortest_path(&g, 0, 1));
        assert_eq!(path.stops, vec![0, 1]);
        assert_eq!(path.distance, 2);
    }

    #[test]
    fn test_closest_unfinalized_first_minimum_wins() {
        let distance = [Some(3), None, Some(1), Some(1)];
        let finalized = [false, false, false, false];
        assert_eq!(closest_unfinalized(&distance, &finalized), Some((2, 1)));

        let finalized = [false, false, true, false];
        assert_eq!(closest_unfinalized(&distance, &finalized), Some((3, 1)));

        let finalized = [true, false, true, true];
        assert_eq!(closest_unfinalized(&distance, &finalized), None);
    }
}
