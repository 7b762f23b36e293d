//! Proximity tagging: flag edges whose origin node lies near a busy road.
//!
//! Two independent passes with different source sets and radii:
//!
//! - **near-trunk** — motorway/trunk category, wide radius.  Walking
//!   anywhere near these is unpleasant, so the cost penalty reaches far.
//! - **near-primary** — primary roads, much shorter radius.  Tolerable at
//!   close range; only edges practically alongside one are penalized.
//!
//! A pass collects the coordinates of every node that *starts* an edge of
//! the source tag set, indexes them, and radius-queries every network node
//! against the index.  An edge is flagged when its origin (`from`) node has
//! at least one hit.  Because edge orientation is canonical (see
//! [`network`](crate::network)), the flags depend only on coordinates and
//! the tag assignment, never on ingestion order.
//!
//! With the `parallel` feature the per-node queries run on Rayon: graph and
//! index are read-only, and each query writes only its own output slot.

use trail_core::{FlatProjection, NodeId, TagSet};

use crate::network::TrailNetwork;
use crate::spatial::SpatialIndex;

/// Run both proximity passes and set the `near_trunk` / `near_primary`
/// flags on every routable edge.
///
/// An empty source set leaves the corresponding flag false everywhere.
pub fn apply_proximity_flags<S: SpatialIndex>(
    net: &mut TrailNetwork,
    projection: &FlatProjection,
    trunk_tags: TagSet,
    trunk_radius_deg: f64,
    primary_tags: TagSet,
    primary_radius_deg: f64,
) {
    let near_trunk = near_origin_nodes::<S>(net, projection, trunk_tags, trunk_radius_deg);
    let near_primary = near_origin_nodes::<S>(net, projection, primary_tags, primary_radius_deg);

    for edge in net.edges_mut() {
        edge.near_trunk = near_trunk[edge.from.index()];
        edge.near_primary = near_primary[edge.from.index()];
    }
}

/// One pass: per-node "within radius of a source origin" flags.
fn near_origin_nodes<S: SpatialIndex>(
    net: &TrailNetwork,
    projection: &FlatProjection,
    sources: TagSet,
    radius_deg: f64,
) -> Vec<bool> {
    let origins = net.origin_positions(sources);
    if origins.is_empty() {
        return vec![false; net.node_count()];
    }

    let points: Vec<[f64; 2]> = origins.iter().map(|&p| projection.to_flat(p)).collect();
    let index = S::build(&points);

    let query = |node: usize| {
        let p = projection.to_flat(net.position(NodeId(node as u32)));
        !index.within_radius(p, radius_deg).is_empty()
    };

    #[cfg(not(feature = "parallel"))]
    {
        (0..net.node_count()).map(query).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        (0..net.node_count()).into_par_iter().map(query).collect()
    }
}
