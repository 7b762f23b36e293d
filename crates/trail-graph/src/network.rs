//! Network representation and builder.
//!
//! # Data layout
//!
//! Routable edges are undirected records in [`TrailEdge`], indexed by
//! `EdgeId`.  Adjacency uses **Compressed Sparse Row (CSR)** over
//! half-edges: for a `NodeId n`, the half-edges leaving `n` occupy
//!
//! ```text
//! half_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! with `half_edge` carrying the `EdgeId` of the undirected record each
//! half-edge belongs to.  Iteration over a node's neighbors is a contiguous
//! memory scan — ideal for Dijkstra's inner loop.
//!
//! # Determinism
//!
//! The built network is a pure function of the *set* of ingested ways and
//! coordinates, not of their order: nodes are laid out sorted by external
//! id, edges sorted by their canonical `(from, to)` pair, and each edge's
//! orientation puts the smaller external id first.  Proximity flags keyed
//! on an edge's origin node therefore never depend on ingestion order.
//!
//! # Pruning
//!
//! `build` keeps only the largest connected component of the full graph
//! (excluded trunk-category edges included): disconnected fragments can
//! never appear in a sensible route, waste memory, and would corrupt
//! nearest-node lookups by attracting waypoints onto unreachable debris.

use log::warn;
use rustc_hash::{FxHashMap, FxHashSet};

use trail_core::{EdgeId, FlatProjection, GeoPoint, NodeId, TagId, TagSet};

// ── Edge records ──────────────────────────────────────────────────────────────

/// One ingested way: an ordered run of external node ids sharing a tag.
#[derive(Clone, Debug)]
pub struct Way {
    pub nodes: Vec<i64>,
    pub tag: TagId,
}

impl Way {
    pub fn new(nodes: Vec<i64>, tag: TagId) -> Self {
        Self { nodes, tag }
    }
}

/// A routable undirected edge with its full attribute record.
///
/// `from` is always the endpoint with the smaller external id.  `length_m`
/// is set by the builder; `near_trunk`, `near_primary`, and `cost` start at
/// their defaults and are filled in by the proximity and cost passes.
#[derive(Clone, Debug)]
pub struct TrailEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub tag: TagId,
    pub length_m: f64,
    pub near_trunk: bool,
    pub near_primary: bool,
    pub cost: f64,
}

/// An edge excluded from routing (trunk-category tag).
///
/// Kept only as input for the proximity passes; never traversable.
#[derive(Clone, Debug)]
pub struct ExcludedEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub tag: TagId,
}

// ── TrailNetwork ──────────────────────────────────────────────────────────────

/// The pruned, deduplicated network: nodes of the largest connected
/// component, routable edges with attribute records, and the excluded
/// trunk-category edges.
///
/// Immutable after the annotation passes; construct via [`NetworkBuilder`].
pub struct TrailNetwork {
    /// External (map-data) id of each node, ascending.  Indexed by `NodeId`.
    ext_ids: Vec<i64>,
    /// Coordinates of each node.  Indexed by `NodeId`.
    node_pos: Vec<GeoPoint>,
    /// Reverse lookup external id → dense id.
    by_ext: FxHashMap<i64, NodeId>,

    /// CSR row pointer; half-edges of node `n` are at
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = node count + 1.
    node_out_start: Vec<u32>,
    /// Target node of each half-edge.
    half_to: Vec<NodeId>,
    /// Undirected edge record each half-edge belongs to.
    half_edge: Vec<EdgeId>,

    /// Routable edge records, sorted by canonical `(from, to)`.
    edges: Vec<TrailEdge>,
    /// Trunk-category edges, same canonical order.
    excluded: Vec<ExcludedEdge>,
}

impl TrailNetwork {
    pub fn node_count(&self) -> usize {
        self.ext_ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// `true` when the network has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.ext_ids.is_empty()
    }

    #[inline]
    pub fn external_id(&self, node: NodeId) -> i64 {
        self.ext_ids[node.index()]
    }

    #[inline]
    pub fn position(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    pub fn node_by_external(&self, ext: i64) -> Option<NodeId> {
        self.by_ext.get(&ext).copied()
    }

    /// Iterator over all dense node ids.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.ext_ids.len()).map(|i| NodeId(i as u32))
    }

    /// Neighbors of `node` over routable edges, as `(target, edge)` pairs.
    ///
    /// A contiguous index range — no heap allocation.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| (self.half_to[i], self.half_edge[i]))
    }

    /// Number of routable half-edges leaving `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &TrailEdge {
        &self.edges[id.index()]
    }

    pub fn edges(&self) -> &[TrailEdge] {
        &self.edges
    }

    pub fn excluded_edges(&self) -> &[ExcludedEdge] {
        &self.excluded
    }

    /// The routable edge connecting `a` and `b`, if any.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.neighbors(a)
            .find(|&(target, _)| target == b)
            .map(|(_, edge)| edge)
    }

    /// Coordinates of the origin (`from`) endpoints of every edge —
    /// routable or excluded — whose tag is in `sources`.
    ///
    /// This is the coordinate set the proximity passes index.
    pub fn origin_positions(&self, sources: TagSet) -> Vec<GeoPoint> {
        let routable = self
            .edges
            .iter()
            .filter(|e| sources.contains(e.tag))
            .map(|e| self.position(e.from));
        let excluded = self
            .excluded
            .iter()
            .filter(|e| sources.contains(e.tag))
            .map(|e| self.position(e.from));
        routable.chain(excluded).collect()
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [TrailEdge] {
        &mut self.edges
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Accumulates coordinate and way records, then `build()`s the pruned
/// network.
///
/// Records may arrive in any order; re-adding a node id overwrites its
/// coordinate (last write wins), so re-ingestion is idempotent.
pub struct NetworkBuilder {
    coords: FxHashMap<i64, GeoPoint>,
    ways: Vec<Way>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            coords: FxHashMap::default(),
            ways: Vec::new(),
        }
    }

    /// Pre-allocate for the expected number of records to reduce
    /// reallocations when bulk-loading.
    pub fn with_capacity(nodes: usize, ways: usize) -> Self {
        let mut coords = FxHashMap::default();
        coords.reserve(nodes);
        Self {
            coords,
            ways: Vec::with_capacity(ways),
        }
    }

    pub fn add_node(&mut self, ext_id: i64, position: GeoPoint) {
        self.coords.insert(ext_id, position);
    }

    pub fn add_way(&mut self, way: Way) {
        self.ways.push(way);
    }

    pub fn node_count(&self) -> usize {
        self.coords.len()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    /// Build the network: expand ways into unordered node pairs, dedupe,
    /// prune to the largest connected component, compute lengths, and
    /// split routable from excluded (trunk-category) edges.
    ///
    /// Empty input yields an empty network, not an error.
    pub fn build(self, excluded_tags: TagSet, projection: &FlatProjection) -> TrailNetwork {
        // ── Expand ways into canonical deduplicated pairs ─────────────────
        // Key is (min, max) of the external ids; the first way to produce a
        // pair decides its tag, matching insert-or-ignore ingestion.
        let mut pairs: FxHashMap<(i64, i64), TagId> = FxHashMap::default();
        let mut dropped = 0usize;

        for way in &self.ways {
            for window in way.nodes.windows(2) {
                let (m, n) = (window[0], window[1]);
                if m == n {
                    continue;
                }
                if !self.coords.contains_key(&m) || !self.coords.contains_key(&n) {
                    dropped += 1;
                    continue;
                }
                let key = (m.min(n), m.max(n));
                pairs.entry(key).or_insert(way.tag);
            }
        }
        if dropped > 0 {
            warn!("dropped {dropped} way segment(s) with unknown node coordinates");
        }

        if pairs.is_empty() {
            return TrailNetwork {
                ext_ids: Vec::new(),
                node_pos: Vec::new(),
                by_ext: FxHashMap::default(),
                node_out_start: vec![0],
                half_to: Vec::new(),
                half_edge: Vec::new(),
                edges: Vec::new(),
                excluded: Vec::new(),
            };
        }

        // ── Largest connected component over the full pair set ────────────
        // Provisional dense ids in ascending external-id order, so the
        // tie-break below is deterministic.
        let mut involved: Vec<i64> = pairs.keys().flat_map(|&(a, b)| [a, b]).collect();
        involved.sort_unstable();
        involved.dedup();

        let provisional: FxHashMap<i64, usize> = involved
            .iter()
            .enumerate()
            .map(|(i, &ext)| (ext, i))
            .collect();

        let mut dsu = DisjointSets::new(involved.len());
        for &(a, b) in pairs.keys() {
            dsu.union(provisional[&a], provisional[&b]);
        }

        // Component sizes, then the winner: largest, ties going to the
        // component holding the smallest external id (= first seen root).
        let mut size: FxHashMap<usize, u32> = FxHashMap::default();
        for i in 0..involved.len() {
            *size.entry(dsu.find(i)).or_insert(0) += 1;
        }
        let mut best_root = 0usize;
        let mut best_size = 0u32;
        let mut seen = FxHashSet::default();
        for i in 0..involved.len() {
            let root = dsu.find(i);
            if seen.insert(root) {
                let s = size[&root];
                if s > best_size {
                    best_size = s;
                    best_root = root;
                }
            }
        }

        // ── Final node layout: surviving nodes, ascending external id ─────
        let mut ext_ids = Vec::with_capacity(best_size as usize);
        let mut node_pos = Vec::with_capacity(best_size as usize);
        let mut by_ext: FxHashMap<i64, NodeId> = FxHashMap::default();
        by_ext.reserve(best_size as usize);

        for (i, &ext) in involved.iter().enumerate() {
            if dsu.find(i) == best_root {
                let id = NodeId(ext_ids.len() as u32);
                ext_ids.push(ext);
                node_pos.push(self.coords[&ext]);
                by_ext.insert(ext, id);
            }
        }

        // ── Edge records in canonical order ───────────────────────────────
        let mut sorted_pairs: Vec<((i64, i64), TagId)> = pairs.into_iter().collect();
        sorted_pairs.sort_unstable_by_key(|&(key, _)| key);

        let mut edges = Vec::new();
        let mut excluded = Vec::new();
        for ((a, b), tag) in sorted_pairs {
            let (Some(&from), Some(&to)) = (by_ext.get(&a), by_ext.get(&b)) else {
                continue; // pruned away with its component
            };
            if excluded_tags.contains(tag) {
                excluded.push(ExcludedEdge { from, to, tag });
            } else {
                let length_m = projection.distance_m(node_pos[from.index()], node_pos[to.index()]);
                edges.push(TrailEdge {
                    from,
                    to,
                    tag,
                    length_m,
                    near_trunk: false,
                    near_primary: false,
                    cost: 0.0,
                });
            }
        }

        // ── CSR assembly over routable half-edges ─────────────────────────
        let node_count = ext_ids.len();
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &edges {
            node_out_start[e.from.index() + 1] += 1;
            node_out_start[e.to.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }

        let half_count = edges.len() * 2;
        let mut half_to = vec![NodeId::INVALID; half_count];
        let mut half_edge = vec![EdgeId::INVALID; half_count];
        let mut cursor = node_out_start.clone();
        for (i, e) in edges.iter().enumerate() {
            let id = EdgeId(i as u32);
            let slot = cursor[e.from.index()] as usize;
            half_to[slot] = e.to;
            half_edge[slot] = id;
            cursor[e.from.index()] += 1;

            let slot = cursor[e.to.index()] as usize;
            half_to[slot] = e.from;
            half_edge[slot] = id;
            cursor[e.to.index()] += 1;
        }
        debug_assert_eq!(node_out_start[node_count] as usize, half_count);

        TrailNetwork {
            ext_ids,
            node_pos,
            by_ext,
            node_out_start,
            half_to,
            half_edge,
            edges,
            excluded,
        }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ── Disjoint sets ─────────────────────────────────────────────────────────────

/// Union-find with path halving and union by size, for component pruning.
struct DisjointSets {
    parent: Vec<u32>,
    size: Vec<u32>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] as usize != x {
            let grandparent = self.parent[self.parent[x] as usize];
            self.parent[x] = grandparent;
            x = grandparent as usize;
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra as u32;
        self.size[ra] += self.size[rb];
    }
}
