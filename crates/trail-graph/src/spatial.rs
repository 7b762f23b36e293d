//! Pluggable spatial index.
//!
//! The planner and the proximity tagger only need three operations — bulk
//! build, nearest neighbor, and radius search — so they are written against
//! the [`SpatialIndex`] trait and stay agnostic of the backing structure.
//! [`RTreeIndex`] (rstar) is the default implementation; a k-d tree or a
//! uniform grid would satisfy the same contract.
//!
//! Points live in the warped degree plane of
//! [`FlatProjection::to_flat`](trail_core::FlatProjection::to_flat), so a
//! radius expressed in latitude-equivalent degrees means the same ground
//! distance everywhere in the region.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// Build-once, query-many spatial index over 2-D points.
///
/// `Sync` is required so queries can run from Rayon worker threads; the
/// index is immutable after `build`.
pub trait SpatialIndex: Sync {
    /// Bulk-build from a point slice.  Query results refer to points by
    /// their slot in this slice.
    fn build(points: &[[f64; 2]]) -> Self;

    /// Slot of the point closest to `query`, or `None` for an empty index.
    fn nearest(&self, query: [f64; 2]) -> Option<usize>;

    /// Slots of all points within `radius` of `query`, in no particular
    /// order.  The boundary is **inclusive**: a point at exactly `radius`
    /// is returned.
    fn within_radius(&self, query: [f64; 2], radius: f64) -> Vec<usize>;
}

// ── R-tree implementation ─────────────────────────────────────────────────────

/// Entry stored in the R-tree: a point plus its slot in the build slice.
struct IndexedPoint {
    point: [f64; 2],
    slot: usize,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedPoint {
    /// Squared Euclidean distance in the warped degree plane.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Default [`SpatialIndex`] backed by an rstar R-tree.
pub struct RTreeIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex for RTreeIndex {
    fn build(points: &[[f64; 2]]) -> Self {
        // Bulk load is O(n log n) and much faster than n inserts.
        let entries: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(slot, &point)| IndexedPoint { point, slot })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    fn nearest(&self, query: [f64; 2]) -> Option<usize> {
        self.tree.nearest_neighbor(&query).map(|e| e.slot)
    }

    fn within_radius(&self, query: [f64; 2], radius: f64) -> Vec<usize> {
        // locate_within_distance compares distance_2 <= r², which gives the
        // inclusive boundary the contract promises.
        self.tree
            .locate_within_distance(query, radius * radius)
            .map(|e| e.slot)
            .collect()
    }
}
