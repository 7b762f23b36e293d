//! Route-subsystem error type.
//!
//! Every variant names the waypoint or node pair it concerns, so callers
//! can report "no route exists for this leg" rather than a bare failure.

use thiserror::Error;

/// Errors produced by `trail-route`.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Ingestion produced nothing; callers should present an empty route
    /// set rather than abort.
    #[error("the routable graph is empty")]
    EmptyGraph,

    #[error("a route needs at least two waypoints, got {0}")]
    NotEnoughWaypoints(usize),

    /// The search rectangle around a coordinate waypoint contains no
    /// routable node.  Recoverable: widen the margin or fix the waypoint.
    #[error("no routable node near waypoint {waypoint}; widen the search margin")]
    NoNodeInRegion { waypoint: usize },

    /// A waypoint names a node id that is not in the network.
    #[error("waypoint {waypoint} refers to unknown node {node}")]
    NodeNotFound { waypoint: usize, node: i64 },

    /// The routable graph has no path between two consecutive resolved
    /// waypoints.  Not retried: an unchanged graph cannot succeed.
    #[error("no route between waypoint {from_waypoint} and waypoint {to_waypoint}")]
    NoPath {
        from_waypoint: usize,
        to_waypoint: usize,
    },

    /// A caller-supplied node sequence steps between nodes that share no
    /// routable edge.
    #[error("nodes {from} and {to} are not connected by a routable edge")]
    EdgeNotFound { from: i64, to: i64 },
}

/// Shorthand result type for `trail-route`.
pub type RouteResult<T> = Result<T, RouteError>;
