//! `trail-graph` — routable network construction and annotation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`network`]   | `TrailNetwork` (CSR adjacency + edge records), `NetworkBuilder` |
//! | [`spatial`]   | `SpatialIndex` trait, `RTreeIndex` (rstar)                 |
//! | [`proximity`] | near-trunk / near-primary origin-node flagging             |
//! | [`cost`]      | `edge_cost`, `assign_costs`                                |
//! | [`loader`]    | CSV ingestion of node and way records                      |
//! | [`pipeline`]  | `prepare_network` — ingest → prune → tag → cost            |
//! | [`error`]     | `GraphError`, `GraphResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                        |
//! |------------|---------------------------------------------------------------|
//! | `parallel` | Proximity radius queries run on Rayon worker threads.         |
//! | `serde`    | Propagates serde derives to embedded `trail-core` types.      |

pub mod cost;
pub mod error;
pub mod loader;
pub mod network;
pub mod pipeline;
pub mod proximity;
pub mod spatial;

#[cfg(test)]
mod tests;

pub use cost::{assign_costs, edge_cost};
pub use error::{GraphError, GraphResult};
pub use loader::{load_nodes_csv, load_nodes_reader, load_ways_csv, load_ways_reader};
pub use network::{ExcludedEdge, NetworkBuilder, TrailEdge, TrailNetwork, Way};
pub use pipeline::{prepare_network, prepare_network_with};
pub use proximity::apply_proximity_flags;
pub use spatial::{RTreeIndex, SpatialIndex};
