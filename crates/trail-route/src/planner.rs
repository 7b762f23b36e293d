//! Waypoint resolution and least-cost route stitching.
//!
//! A route request is an ordered list of waypoints.  Each coordinate
//! waypoint is snapped to the nearest routable node inside a bounded search
//! rectangle; consecutive resolved nodes are then connected with Dijkstra
//! over the edge `cost` attribute (non-negative by construction) and the
//! legs concatenated, dropping the duplicated junction node between them.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;

use trail_core::{BoundingBox, FlatProjection, GeoPoint, NodeId, PlannerConfig};
use trail_graph::{RTreeIndex, SpatialIndex, TrailNetwork};

use crate::error::{RouteError, RouteResult};
use crate::segment::Route;

/// One stop of a route request.
#[derive(Clone, Debug, PartialEq)]
pub enum Waypoint {
    /// A raw coordinate, resolved to the nearest routable node.
    Position(GeoPoint),
    /// An already-resolved external node id.
    Node(i64),
}

/// Plan a route and reconstruct it into tag-homogeneous segments, using
/// the default R-tree index.
///
/// # Errors
///
/// See [`plan_route`] and [`Route::reconstruct`].
pub fn find_route(
    net: &TrailNetwork,
    waypoints: &[Waypoint],
    config: &PlannerConfig,
) -> RouteResult<Route> {
    find_route_with::<RTreeIndex>(net, waypoints, config)
}

/// [`find_route`] with an explicit [`SpatialIndex`] implementation.
pub fn find_route_with<S: SpatialIndex>(
    net: &TrailNetwork,
    waypoints: &[Waypoint],
    config: &PlannerConfig,
) -> RouteResult<Route> {
    let path = plan_route_with::<S>(net, waypoints, config)?;
    Route::reconstruct(net, &path)
}

/// Resolve the waypoints and return the full least-cost node sequence from
/// the first to the last.
///
/// # Errors
///
/// [`RouteError::EmptyGraph`] on an empty network,
/// [`RouteError::NotEnoughWaypoints`] for fewer than two waypoints,
/// [`RouteError::NoNodeInRegion`] / [`RouteError::NodeNotFound`] when a
/// waypoint cannot be resolved, and [`RouteError::NoPath`] naming the leg
/// whose endpoints are not connected.
pub fn plan_route(
    net: &TrailNetwork,
    waypoints: &[Waypoint],
    config: &PlannerConfig,
) -> RouteResult<Vec<NodeId>> {
    plan_route_with::<RTreeIndex>(net, waypoints, config)
}

/// [`plan_route`] with an explicit [`SpatialIndex`] implementation.
pub fn plan_route_with<S: SpatialIndex>(
    net: &TrailNetwork,
    waypoints: &[Waypoint],
    config: &PlannerConfig,
) -> RouteResult<Vec<NodeId>> {
    if net.is_empty() {
        return Err(RouteError::EmptyGraph);
    }
    if waypoints.len() < 2 {
        return Err(RouteError::NotEnoughWaypoints(waypoints.len()));
    }

    let projection = FlatProjection::new(config.reference_latitude);
    let resolved = waypoints
        .iter()
        .enumerate()
        .map(|(i, wp)| resolve::<S>(net, &projection, i, wp, config.snap_margin_deg))
        .collect::<RouteResult<Vec<NodeId>>>()?;
    debug!("resolved {} waypoint(s): {:?}", resolved.len(), resolved);

    // Stitch the legs, dropping the duplicated junction node: each leg
    // contributes everything but its last node, which the next leg (or the
    // final push) supplies.
    let mut path = Vec::new();
    for (i, pair) in resolved.windows(2).enumerate() {
        let leg = dijkstra(net, pair[0], pair[1]).ok_or(RouteError::NoPath {
            from_waypoint: i,
            to_waypoint: i + 1,
        })?;
        path.extend_from_slice(&leg[..leg.len() - 1]);
    }
    path.push(resolved[resolved.len() - 1]);
    Ok(path)
}

// ── Waypoint resolution ───────────────────────────────────────────────────────

fn resolve<S: SpatialIndex>(
    net: &TrailNetwork,
    projection: &FlatProjection,
    waypoint: usize,
    wp: &Waypoint,
    margin_deg: f64,
) -> RouteResult<NodeId> {
    match *wp {
        Waypoint::Node(node) => net
            .node_by_external(node)
            .ok_or(RouteError::NodeNotFound { waypoint, node }),
        Waypoint::Position(p) => {
            // Restrict the candidate set to the search rectangle so the
            // index build stays proportional to the neighbourhood, not the
            // whole network.  Only nodes with a routable edge qualify.
            let rect = BoundingBox::around(p, margin_deg);
            let candidates: Vec<NodeId> = net
                .node_ids()
                .filter(|&n| net.degree(n) > 0 && rect.contains(net.position(n)))
                .collect();
            if candidates.is_empty() {
                return Err(RouteError::NoNodeInRegion { waypoint });
            }

            let points: Vec<[f64; 2]> = candidates
                .iter()
                .map(|&n| projection.to_flat(net.position(n)))
                .collect();
            let index = S::build(&points);
            let slot = index
                .nearest(projection.to_flat(p))
                .ok_or(RouteError::NoNodeInRegion { waypoint })?;
            Ok(candidates[slot])
        }
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Heap entry.  Ordered as a min-heap on cost with the node id as a
/// deterministic tie-break; costs are products of positive finite factors,
/// so `total_cmp` never sees a NaN.
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeId,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Least-cost path from `start` to `goal` over the routable edges, or
/// `None` when the nodes are in different routable components.
fn dijkstra(net: &TrailNetwork, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
    if start == goal {
        return Some(vec![start]);
    }

    let n = net.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev = vec![NodeId::INVALID; n];
    let mut heap = BinaryHeap::new();

    dist[start.index()] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: start,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if node == goal {
            return Some(backtrace(&prev, start, goal));
        }
        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (next, edge) in net.neighbors(node) {
            let next_cost = cost + net.edge(edge).cost;
            if next_cost < dist[next.index()] {
                dist[next.index()] = next_cost;
                prev[next.index()] = node;
                heap.push(State {
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    None
}

fn backtrace(prev: &[NodeId], start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = prev[current.index()];
        path.push(current);
    }
    path.reverse();
    path
}
