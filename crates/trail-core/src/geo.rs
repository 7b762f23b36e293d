//! Geographic coordinate type and flat-earth distance math.
//!
//! # Design
//!
//! All ground distances go through [`FlatProjection`], a flat-earth
//! approximation anchored at one *fixed* reference latitude for the whole
//! region:
//!
//!   d = sqrt(dlat² + cos²(ref_lat)·dlon²) · (π/180 · R)
//!
//! Using a fixed reference latitude instead of each pair's own latitude
//! trades a little accuracy for speed and determinism: the same coordinate
//! pair always yields the same distance, and the projection doubles as the
//! coordinate plane of the spatial index (see `to_flat`), so index-space
//! distances and `distance_m` agree exactly.
//!
//! The approximation is good to well under 1 % for spans of a few tens of
//! kilometres at mid latitudes — more than enough for walking routes.

use std::f64::consts::PI;

/// Mean equatorial Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Metres per degree of latitude: π/180 · R.
const DEG_TO_M: f64 = PI / 180.0 * EARTH_RADIUS_M;

/// A WGS-84 geographic coordinate in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── FlatProjection ────────────────────────────────────────────────────────────

/// Flat-earth distance estimator anchored at a fixed reference latitude.
///
/// Cheap to copy; build one per pipeline run from
/// `PlannerConfig::reference_latitude`.
#[derive(Copy, Clone, Debug)]
pub struct FlatProjection {
    cos_ref: f64,
}

impl FlatProjection {
    /// `reference_latitude_deg` should be representative of the region the
    /// network covers (e.g. 52.09 for the Netherlands).
    pub fn new(reference_latitude_deg: f64) -> Self {
        Self {
            cos_ref: (reference_latitude_deg * PI / 180.0).cos(),
        }
    }

    /// Map a coordinate into the warped degree plane `[lat, lon·cos(ref)]`.
    ///
    /// Euclidean distance in this plane, scaled by π/180·R, equals
    /// [`distance_m`](Self::distance_m) (before the floor).  The spatial
    /// index stores points in this plane so its radius queries use the same
    /// metric as edge lengths.
    #[inline]
    pub fn to_flat(&self, p: GeoPoint) -> [f64; 2] {
        [p.lat, p.lon * self.cos_ref]
    }

    /// Ground distance in metres.
    ///
    /// Identical coordinates yield 0.  Distinct coordinates never yield less
    /// than 1 m, so every edge between distinct nodes has positive length
    /// and a least-cost search never sees a zero-weight edge.
    pub fn distance_m(&self, a: GeoPoint, b: GeoPoint) -> f64 {
        if a == b {
            return 0.0;
        }
        let d_lat = a.lat - b.lat;
        let d_lon = (a.lon - b.lon) * self.cos_ref;
        let d = (d_lat * d_lat + d_lon * d_lon).sqrt() * DEG_TO_M;
        d.max(1.0)
    }

    /// Metres spanned by one latitude-equivalent degree in the warped plane.
    #[inline]
    pub fn metres_per_degree(&self) -> f64 {
        DEG_TO_M
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// An axis-aligned latitude/longitude rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Rectangle of `margin_deg` around a single point.
    pub fn around(center: GeoPoint, margin_deg: f64) -> Self {
        Self {
            north: center.lat + margin_deg,
            south: center.lat - margin_deg,
            west: center.lon - margin_deg,
            east: center.lon + margin_deg,
        }
    }

    /// Smallest rectangle containing all `points`, widened by `margin_deg`.
    ///
    /// Returns `None` for an empty slice.
    pub fn around_all(points: &[GeoPoint], margin_deg: f64) -> Option<Self> {
        let first = points.first()?;
        let mut bb = Self::around(*first, 0.0);
        for p in &points[1..] {
            bb.north = bb.north.max(p.lat);
            bb.south = bb.south.min(p.lat);
            bb.west = bb.west.min(p.lon);
            bb.east = bb.east.max(p.lon);
        }
        bb.north += margin_deg;
        bb.south -= margin_deg;
        bb.west -= margin_deg;
        bb.east += margin_deg;
        Some(bb)
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat <= self.north && p.lat >= self.south && p.lon >= self.west && p.lon <= self.east
    }
}
