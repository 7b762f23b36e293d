//! One-shot pipeline: ingest → build/prune → proximity → cost.
//!
//! Each invocation builds its own network in memory and hands it to the
//! caller; there is no cross-invocation state.

use log::info;

use trail_core::{FlatProjection, GeoPoint, PlannerConfig, TagRegistry};

use crate::cost::assign_costs;
use crate::error::GraphResult;
use crate::network::{NetworkBuilder, TrailNetwork, Way};
use crate::proximity::apply_proximity_flags;
use crate::spatial::{RTreeIndex, SpatialIndex};

/// Build the fully annotated routable network with the default R-tree
/// index.
///
/// # Errors
///
/// Tag-set resolution and cost assignment errors; an empty input is not an
/// error and yields an empty network.
pub fn prepare_network(
    ways: Vec<Way>,
    nodes: Vec<(i64, GeoPoint)>,
    registry: &TagRegistry,
    config: &PlannerConfig,
) -> GraphResult<TrailNetwork> {
    prepare_network_with::<RTreeIndex>(ways, nodes, registry, config)
}

/// [`prepare_network`] with an explicit [`SpatialIndex`] implementation.
pub fn prepare_network_with<S: SpatialIndex>(
    ways: Vec<Way>,
    nodes: Vec<(i64, GeoPoint)>,
    registry: &TagRegistry,
    config: &PlannerConfig,
) -> GraphResult<TrailNetwork> {
    let trunk_tags = config.trunk_set(registry)?;
    let primary_tags = config.primary_set(registry)?;
    let projection = FlatProjection::new(config.reference_latitude);

    info!(
        "building network from {} way(s) and {} node record(s)",
        ways.len(),
        nodes.len()
    );
    let mut builder = NetworkBuilder::with_capacity(nodes.len(), ways.len());
    for (ext_id, position) in nodes {
        builder.add_node(ext_id, position);
    }
    for way in ways {
        builder.add_way(way);
    }
    let mut net = builder.build(trunk_tags, &projection);
    info!(
        "kept largest component: {} node(s), {} routable edge(s), {} excluded edge(s)",
        net.node_count(),
        net.edge_count(),
        net.excluded_edges().len()
    );

    apply_proximity_flags::<S>(
        &mut net,
        &projection,
        trunk_tags,
        config.trunk_radius_deg,
        primary_tags,
        config.primary_radius_deg,
    );
    info!(
        "proximity pass done: {} near-trunk, {} near-primary edge(s)",
        net.edges().iter().filter(|e| e.near_trunk).count(),
        net.edges().iter().filter(|e| e.near_primary).count()
    );

    assign_costs(&mut net, registry, config)?;
    info!("edge costs assigned");

    Ok(net)
}
