//! Planner configuration.
//!
//! One plain struct with the knobs every pipeline stage reads.  Defaults
//! reproduce the Dutch walking-network setup; applications targeting other
//! regions override the reference latitude and, if their map data uses a
//! different category vocabulary, supply their own `TagRegistry`.

use crate::error::CoreResult;
use crate::tags::{TagRegistry, TagSet};

/// Configuration for network building, proximity tagging, costing, and
/// waypoint resolution.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Fixed reference latitude for the flat-earth projection (degrees).
    pub reference_latitude: f64,

    /// Tags excluded from the routable graph; their edges only feed the
    /// near-trunk proximity pass.
    pub trunk_tags: Vec<String>,

    /// Tags of busy-but-crossable roads; their edges stay routable and
    /// feed the near-primary proximity pass.
    pub primary_tags: Vec<String>,

    /// Cost multiplier for edges whose origin node is near a trunk road.
    pub near_trunk_factor: f64,

    /// Cost multiplier for edges whose origin node is near a primary road.
    /// Applied only when the near-trunk multiplier is not.
    pub near_primary_factor: f64,

    /// Near-trunk radius in latitude-equivalent degrees (0.001 ≈ 110 m).
    pub trunk_radius_deg: f64,

    /// Near-primary radius in latitude-equivalent degrees (0.0002 ≈ 22 m).
    /// Primary roads are tolerable at close range; trunk roads are not.
    pub primary_radius_deg: f64,

    /// Half-width of the search rectangle used to resolve a coordinate
    /// waypoint to its nearest graph node (degrees).
    pub snap_margin_deg: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            reference_latitude: 52.09,
            trunk_tags: [
                "motorway",
                "motorway_link",
                "motorway_junction",
                "trunk",
                "trunk_link",
            ]
            .map(str::to_owned)
            .to_vec(),
            primary_tags: ["primary", "primary_link"].map(str::to_owned).to_vec(),
            near_trunk_factor: 3.0,
            near_primary_factor: 20.0,
            trunk_radius_deg: 0.001,
            primary_radius_deg: 0.0002,
            snap_margin_deg: 0.05,
        }
    }
}

impl PlannerConfig {
    /// Resolve `trunk_tags` against a registry.
    ///
    /// # Errors
    ///
    /// `CoreError::UnknownTag` if a configured name is not registered.
    pub fn trunk_set(&self, registry: &TagRegistry) -> CoreResult<TagSet> {
        registry.resolve_set(&self.trunk_tags)
    }

    /// Resolve `primary_tags` against a registry.
    ///
    /// # Errors
    ///
    /// `CoreError::UnknownTag` if a configured name is not registered.
    pub fn primary_set(&self, registry: &TagRegistry) -> CoreResult<TagSet> {
        registry.resolve_set(&self.primary_tags)
    }
}
