use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::graph::GraphStore;
use crate::record::RecordReader;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read failed after {loaded} records: {source}")]
    Read {
        loaded: usize,
        #[source]
        source: io::Error,
    },
}

/// Outcome of one load pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records written into the store.
    pub loaded: usize,
    /// Records parsed but rejected by the store (bounds or weight checks).
    pub skipped: usize,
}

/// Load stop metadata from a CSV file with a header line.
///
/// A file that cannot be opened leaves `store` untouched.
pub fn load_stops_file(
    store: &mut GraphStore,
    path: impl AsRef<Path>,
    max_field_len: usize,
) -> Result<LoadReport, LoadError> {
    let reader = open(path.as_ref())?;
    load_stops(store, reader, max_field_len)
}

/// Load edges from a CSV file with a header line.
///
/// A file that cannot be opened leaves `store` untouched.
pub fn load_edges_file(
    store: &mut GraphStore,
    path: impl AsRef<Path>,
    max_field_len: usize,
) -> Result<LoadReport, LoadError> {
    let reader = open(path.as_ref())?;
    load_edges(store, reader, max_field_len)
}

/// Read `stop_no,Name,Latitude,Longitude` rows until the input runs out
/// or a row can no longer be parsed. Out-of-bounds stops are skipped.
pub fn load_stops<R: BufRead>(
    store: &mut GraphStore,
    reader: R,
    max_field_len: usize,
) -> Result<LoadReport, LoadError> {
    let mut records = RecordReader::new(reader, max_field_len);
    let mut report = LoadReport::default();

    records.skip_header().map_err(|e| read_error(&report, e))?;

    while let Some(record) = records.next_stop().map_err(|e| read_error(&report, e))? {
        match store.set_stop(record) {
            Ok(_) => report.loaded += 1,
            Err(e) => {
                warn!(error = %e, "skipping stop");
                report.skipped += 1;
            }
        }
    }

    info!(loaded = report.loaded, skipped = report.skipped, "Loaded {} vertices", report.loaded);
    Ok(report)
}

/// Read `from,to,weight` rows until the input runs out or a row can no
/// longer be parsed. Edges with out-of-bounds ids or unusable weights are
/// skipped.
pub fn load_edges<R: BufRead>(
    store: &mut GraphStore,
    reader: R,
    max_field_len: usize,
) -> Result<LoadReport, LoadError> {
    let mut records = RecordReader::new(reader, max_field_len);
    let mut report = LoadReport::default();

    records.skip_header().map_err(|e| read_error(&report, e))?;

    while let Some(edge) = records.next_edge().map_err(|e| read_error(&report, e))? {
        match store.set_edge(edge.from, edge.to, edge.weight) {
            Ok(()) => report.loaded += 1,
            Err(e) => {
                warn!(error = %e, "skipping edge");
                report.skipped += 1;
            }
        }
    }

    info!(loaded = report.loaded, skipped = report.skipped, "Loaded {} edges", report.loaded);
    Ok(report)
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn read_error(report: &LoadReport, source: io::Error) -> LoadError {
    LoadError::Read {
        loaded: report.loaded,
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const STOPS: &str = "\
stop_no,Name,Latitude,Longitude
0,\"Westmoreland St, Stop 1\",53.3470,-6.2590
1,O'Connell Bridge,53.3472,-6.2592
2,Trinity College,53.3438,-6.2546
";

    const EDGES: &str = "\
from,to,weight
0,1,120
1,2,300
";

    fn store(capacity: usize) -> GraphStore {
        GraphStore::initialize(capacity).unwrap()
    }

    #[test]
    fn test_load_stops() {
        let mut g = store(10);
        let report = load_stops(&mut g, STOPS.as_bytes(), 100).unwrap();
        assert_eq!(report, LoadReport { loaded: 3, skipped: 0 });
        assert!((0..3).all(|id| g.has_stop(id)));
        assert_eq!(g.stop(0).unwrap().name, "Westmoreland St, Stop 1");
    }

    #[test]
    fn test_load_edges() {
        let mut g = store(10);
        let report = load_edges(&mut g, EDGES.as_bytes(), 100).unwrap();
        assert_eq!(report.loaded, 2);
        assert_eq!(g.weight(2, 1), Some(300));
    }

    #[test]
    fn test_out_of_bounds_rows_skipped() {
        let mut g = store(3);
        let input = "h\n0,A,1,1\n3,Too Big,1,1\n-2,Negative,1,1\n2,C,1,1\n";
        let report = load_stops(&mut g, input.as_bytes(), 100).unwrap();
        assert_eq!(report, LoadReport { loaded: 2, skipped: 2 });
        assert_eq!(g.stop_count(), 2);

        let input = "h\n0,1,5\n0,9,5\n1,2,-3\n1,2,4\n";
        let report = load_edges(&mut g, input.as_bytes(), 100).unwrap();
        assert_eq!(report, LoadReport { loaded: 2, skipped: 2 });
        assert_eq!(g.weight(1, 2), Some(4));
    }

    #[test]
    fn test_duplicate_edge_overwrites() {
        let mut g = store(3);
        let input = "h\n0,1,5\n1,0,2\n";
        load_edges(&mut g, input.as_bytes(), 100).unwrap();
        assert_eq!(g.weight(0, 1), Some(2));
        assert_eq!(g.weight(1, 0), Some(2));
    }

    #[test]
    fn test_header_only_and_empty() {
        let mut g = store(3);
        assert_eq!(load_stops(&mut g, "h\n".as_bytes(), 100).unwrap().loaded, 0);
        assert_eq!(load_edges(&mut g, "".as_bytes(), 100).unwrap().loaded, 0);
    }

    #[test]
    fn test_edge_load_stops_at_malformed_row() {
        let mut g = store(5);
        let input = "h\n0,1,1\n\n2,3,1\n";
        let report = load_edges(&mut g, input.as_bytes(), 100).unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(g.weight(2, 3), None);
    }

    #[test]
    fn test_trailing_blank_line_does_not_overwrite_stop_zero() {
        let mut g = store(10);
        let input = "stop_no,Name,Latitude,Longitude\n0,Alpha,53.1,-6.1\n1,Bravo,53.2,-6.2\n\n";
        let report = load_stops(&mut g, input.as_bytes(), 100).unwrap();
        assert_eq!(report, LoadReport { loaded: 2, skipped: 0 });
        assert_eq!(g.stop(0).unwrap().name, "Alpha");
        assert_eq!(g.stop_count(), 2);
    }

    #[test]
    fn test_crlf_blank_line_adds_no_stop() {
        let mut g = store(10);
        let input = "stop_no,Name,Latitude,Longitude\r\n3,C,1,1\r\n\r\n";
        let report = load_stops(&mut g, input.as_bytes(), 100).unwrap();
        assert_eq!(report.loaded, 1);
        assert!(g.has_stop(3));
        assert!(!g.has_stop(0));
    }

    #[test]
    fn test_blank_and_whitespace_lines_between_stops() {
        let mut g = store(10);
        let input = "h\n\n4,D,1,1\n   \n\t\r\n5,E,2,2\n\n\n";
        let report = load_stops(&mut g, input.as_bytes(), 100).unwrap();
        assert_eq!(report, LoadReport { loaded: 2, skipped: 0 });
        assert!(g.has_stop(4) && g.has_stop(5));
        assert!(!g.has_stop(0));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let stops_path = dir.path().join("vertices.csv");
        let edges_path = dir.path().join("edges.csv");
        std::fs::File::create(&stops_path)
            .unwrap()
            .write_all(STOPS.as_bytes())
            .unwrap();
        std::fs::File::create(&edges_path)
            .unwrap()
            .write_all(EDGES.as_bytes())
            .unwrap();

        let mut g = store(10);
        assert_eq!(load_edges_file(&mut g, &edges_path, 100).unwrap().loaded, 2);
        assert_eq!(load_stops_file(&mut g, &stops_path, 100).unwrap().loaded, 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.stop_count(), 3);
    }

    #[test]
    fn test_missing_file_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = store(4);
        g.set_edge(0, 1, 3).unwrap();

        let err = load_edges_file(&mut g, dir.path().join("nope.csv"), 100).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().starts_with("unable to open"));
        assert_eq!(g.weight(0, 1), Some(3));
        assert_eq!(g.edge_count(), 1);
    }

    struct FailingReader;

    impl io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_read_error_reported() {
        let mut g = store(4);
        let err = load_stops(&mut g, BufReader::new(FailingReader), 100).unwrap_err();
        assert!(matches!(err, LoadError::Read { loaded: 0, .. }));
    }
}
