//! Edge traversal cost.
//!
//! `cost = length × cost_factor[tag] × penalty`, where the penalty is the
//! near-trunk multiplier when the edge is flagged near-trunk, else the
//! near-primary multiplier when flagged near-primary, else 1.  Near-trunk
//! takes precedence when both flags are set.
//!
//! All factors and multipliers are positive policy constants, and lengths
//! of distinct-node edges are floored at 1 m, so every routable edge ends
//! up with a strictly positive cost — the precondition for least-cost
//! search.

use trail_core::{PlannerConfig, TagId, TagRegistry};

use crate::error::{GraphError, GraphResult};
use crate::network::TrailNetwork;

/// Cost of a single edge.
#[inline]
pub fn edge_cost(
    cost_factor: f64,
    length_m: f64,
    near_trunk: bool,
    near_primary: bool,
    config: &PlannerConfig,
) -> f64 {
    let penalty = if near_trunk {
        config.near_trunk_factor
    } else if near_primary {
        config.near_primary_factor
    } else {
        1.0
    };
    length_m * cost_factor * penalty
}

/// Fill in the `cost` attribute of every routable edge.
///
/// # Errors
///
/// [`GraphError::MissingCostFactor`] when a routable edge carries a tag
/// without a cost factor — a configuration mismatch: a trunk-category tag
/// that was not excluded from routing.
pub fn assign_costs(
    net: &mut TrailNetwork,
    registry: &TagRegistry,
    config: &PlannerConfig,
) -> GraphResult<()> {
    // Per-ordinal factor table, resolved once.
    let factors: Vec<Option<f64>> = (0..registry.len())
        .map(|i| registry.cost_factor(TagId(i as u16)))
        .collect();

    for edge in net.edges_mut() {
        let Some(factor) = factors[edge.tag.index()] else {
            return Err(GraphError::MissingCostFactor(
                registry.name(edge.tag).to_owned(),
            ));
        };
        edge.cost = edge_cost(
            factor,
            edge.length_m,
            edge.near_trunk,
            edge.near_primary,
            config,
        );
    }
    Ok(())
}
