//! Segment reconstruction.
//!
//! A planned route is a flat node sequence; renderers and reports want
//! *segments* — maximal runs whose connecting edges share one tag, each
//! drawable as a single styled polyline.  Reconstruction walks the node
//! sequence once and computes every per-segment and whole-route metric
//! eagerly, so the results are plain fields with no lazy state.
//!
//! Neighbouring segments share their boundary node: a segment's node list
//! always starts where the previous one ended, which is what a polyline
//! renderer needs.  [`Route::nodes`] undoes the sharing and reproduces the
//! planner's exact node sequence.

use trail_core::{GeoPoint, NodeId, TagId, TagRegistry};
use trail_graph::{TrailEdge, TrailNetwork};

use crate::error::{RouteError, RouteResult};

/// A maximal tag-homogeneous run of a route.
#[derive(Clone, Debug)]
pub struct Segment {
    /// Nodes of the run, boundary nodes included on both ends.
    pub nodes: Vec<NodeId>,
    pub tag: TagId,
    pub length_m: f64,
    pub cost: f64,
    /// Metres of this segment on edges flagged near-trunk.
    pub near_trunk_m: f64,
    /// Metres of this segment on edges flagged near-primary.
    pub near_primary_m: f64,
}

impl Segment {
    fn start(first: NodeId, tag: TagId) -> Self {
        Self {
            nodes: vec![first],
            tag,
            length_m: 0.0,
            cost: 0.0,
            near_trunk_m: 0.0,
            near_primary_m: 0.0,
        }
    }

    fn push(&mut self, node: NodeId, edge: &TrailEdge) {
        self.nodes.push(node);
        self.length_m += edge.length_m;
        self.cost += edge.cost;
        if edge.near_trunk {
            self.near_trunk_m += edge.length_m;
        }
        if edge.near_primary {
            self.near_primary_m += edge.length_m;
        }
    }

    /// Node coordinates, for polyline rendering.
    pub fn coordinates(&self, net: &TrailNetwork) -> Vec<GeoPoint> {
        self.nodes.iter().map(|&n| net.position(n)).collect()
    }

    /// External node ids, for export formats that reference map data.
    pub fn external_ids(&self, net: &TrailNetwork) -> Vec<i64> {
        self.nodes.iter().map(|&n| net.external_id(n)).collect()
    }

    /// Display color of this segment's tag.
    pub fn color<'r>(&self, registry: &'r TagRegistry) -> Option<&'r str> {
        registry.color(self.tag)
    }
}

/// An ordered sequence of segments spanning a whole route request, with
/// whole-route totals.
#[derive(Clone, Debug, Default)]
pub struct Route {
    pub segments: Vec<Segment>,
    pub length_m: f64,
    pub cost: f64,
    pub near_trunk_m: f64,
    pub near_primary_m: f64,
}

impl Route {
    /// Collapse a planned node sequence into tag-homogeneous segments.
    ///
    /// A sequence of fewer than two nodes yields an empty route.
    ///
    /// # Errors
    ///
    /// [`RouteError::EdgeNotFound`] if two consecutive nodes share no
    /// routable edge — only possible for caller-constructed sequences, not
    /// for planner output.
    pub fn reconstruct(net: &TrailNetwork, path: &[NodeId]) -> RouteResult<Self> {
        let mut route = Route::default();
        if path.len() < 2 {
            return Ok(route);
        }

        for window in path.windows(2) {
            let (m, n) = (window[0], window[1]);
            let edge_id = net.edge_between(m, n).ok_or(RouteError::EdgeNotFound {
                from: net.external_id(m),
                to: net.external_id(n),
            })?;
            let edge = net.edge(edge_id);

            match route.segments.last_mut() {
                Some(segment) if segment.tag == edge.tag => segment.push(n, edge),
                _ => {
                    // Tag change: the new segment starts at the node the
                    // previous one ended on.
                    let mut segment = Segment::start(m, edge.tag);
                    segment.push(n, edge);
                    route.segments.push(segment);
                }
            }
        }

        for segment in &route.segments {
            route.length_m += segment.length_m;
            route.cost += segment.cost;
            route.near_trunk_m += segment.near_trunk_m;
            route.near_primary_m += segment.near_primary_m;
        }
        Ok(route)
    }

    /// The route's full node sequence: segment runs concatenated with the
    /// shared boundary nodes deduplicated.  Equals the planner output the
    /// route was reconstructed from.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for (i, segment) in self.segments.iter().enumerate() {
            let skip = usize::from(i > 0); // boundary node already emitted
            nodes.extend_from_slice(&segment.nodes[skip..]);
        }
        nodes
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
