//! CSV ingestion of node and way records.
//!
//! Map-data parsing proper (pbf, xml, …) is an external concern; whatever
//! extracts the raw network hands it over as two CSV files.
//!
//! # CSV formats
//!
//! Nodes, one row per node:
//!
//! ```csv
//! node_id,latitude,longitude
//! 46374945,52.9483,6.6204
//! 46374946,52.9490,6.6215
//! ```
//!
//! Ways, one row per way; `nodes` is the ordered run of external node ids,
//! space-separated:
//!
//! ```csv
//! tag,nodes
//! cycleway,46374945 46374946 46374950
//! track,46374950 46374961
//! ```
//!
//! Rows whose `tag` is not in the registry are skipped — the registry
//! doubles as the way filter, so a loader fed a full map extract keeps
//! only the categories the planner knows about.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use trail_core::{GeoPoint, TagRegistry};

use crate::error::{GraphError, GraphResult};
use crate::network::Way;

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id: i64,
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct WayRecord {
    tag: String,
    nodes: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `(node_id, position)` records from a CSV file.
///
/// # Errors
///
/// I/O and CSV errors; malformed rows fail the whole load.
pub fn load_nodes_csv(path: &Path) -> GraphResult<Vec<(i64, GeoPoint)>> {
    let file = std::fs::File::open(path).map_err(GraphError::Io)?;
    load_nodes_reader(file)
}

/// Like [`load_nodes_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_nodes_reader<R: Read>(reader: R) -> GraphResult<Vec<(i64, GeoPoint)>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut nodes = Vec::new();
    for result in csv_reader.deserialize::<NodeRecord>() {
        let row = result?;
        nodes.push((row.node_id, GeoPoint::new(row.latitude, row.longitude)));
    }
    Ok(nodes)
}

/// Load way records from a CSV file, keeping only registered tags.
///
/// # Errors
///
/// I/O and CSV errors; a non-integer node id in a kept row is a
/// [`GraphError::Parse`].
pub fn load_ways_csv(path: &Path, registry: &TagRegistry) -> GraphResult<Vec<Way>> {
    let file = std::fs::File::open(path).map_err(GraphError::Io)?;
    load_ways_reader(file, registry)
}

/// Like [`load_ways_csv`] but accepts any `Read` source.
pub fn load_ways_reader<R: Read>(reader: R, registry: &TagRegistry) -> GraphResult<Vec<Way>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut ways = Vec::new();
    for result in csv_reader.deserialize::<WayRecord>() {
        let row = result?;
        // Unregistered categories (buildings, waterways, …) are not errors:
        // the registry is the filter deciding what enters the network.
        let Some(tag) = registry.lookup(&row.tag) else {
            continue;
        };
        let nodes = row
            .nodes
            .split_whitespace()
            .map(|s| {
                s.parse::<i64>()
                    .map_err(|_| GraphError::Parse(format!("invalid node id {s:?} in way row")))
            })
            .collect::<GraphResult<Vec<i64>>>()?;
        ways.push(Way::new(nodes, tag));
    }
    Ok(ways)
}
