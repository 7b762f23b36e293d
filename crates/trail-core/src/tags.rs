//! Way-category registry: ordinal, cost factor, and display color per tag.
//!
//! The registry is built once (from configuration or the built-in default
//! table) and is read-only afterwards.  Tag *order matters*: the ordinal of
//! a tag is its [`TagId`], which is what edge records and the persisted
//! `edges.tag` column store.  Changing the order of a registry invalidates
//! any database written with the previous order.
//!
//! Two kinds of tags exist:
//!
//! - *costed* tags carry a cost factor and a display color and may appear on
//!   routable edges;
//! - *uncosted* tags (the motorway/trunk category) carry neither — ways with
//!   these tags are never traversed, they only feed the proximity passes.

use rustc_hash::FxHashMap;

use crate::error::{CoreError, CoreResult};
use crate::ids::TagId;

/// Upper bound on registry size, imposed by the `TagSet` bitmask.
pub const MAX_TAGS: usize = 64;

/// One registered way category.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagSpec {
    pub name: String,
    /// Cost multiplier applied to edge length; `None` for uncosted tags.
    pub cost_factor: Option<f64>,
    /// Render color for segments of this tag; `None` for uncosted tags.
    pub color: Option<String>,
}

impl TagSpec {
    /// A tag that routable edges may carry.
    pub fn costed(name: &str, cost_factor: f64, color: &str) -> Self {
        Self {
            name: name.to_owned(),
            cost_factor: Some(cost_factor),
            color: Some(color.to_owned()),
        }
    }

    /// A tag that is never traversed (motorway/trunk category).
    pub fn uncosted(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cost_factor: None,
            color: None,
        }
    }
}

// ── TagSet ────────────────────────────────────────────────────────────────────

/// A set of tag ordinals, stored as a bitmask.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagSet(u64);

impl TagSet {
    pub const EMPTY: TagSet = TagSet(0);

    pub fn of(ids: &[TagId]) -> Self {
        let mut set = Self::EMPTY;
        for &id in ids {
            set.insert(id);
        }
        set
    }

    #[inline]
    pub fn insert(&mut self, id: TagId) {
        self.0 |= 1 << id.0;
    }

    #[inline]
    pub fn contains(&self, id: TagId) -> bool {
        self.0 & (1 << id.0) != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

// ── TagRegistry ───────────────────────────────────────────────────────────────

/// Ordered, read-only table of way categories.
#[derive(Clone, Debug)]
pub struct TagRegistry {
    specs: Vec<TagSpec>,
    by_name: FxHashMap<String, TagId>,
}

impl TagRegistry {
    /// Build a registry from an ordered spec list.
    ///
    /// # Errors
    ///
    /// `CoreError::Config` if the list is longer than [`MAX_TAGS`] or
    /// contains a duplicate name.
    pub fn new(specs: Vec<TagSpec>) -> CoreResult<Self> {
        if specs.len() > MAX_TAGS {
            return Err(CoreError::Config(format!(
                "tag registry holds at most {MAX_TAGS} tags, got {}",
                specs.len()
            )));
        }
        let mut by_name = FxHashMap::default();
        for (i, spec) in specs.iter().enumerate() {
            if by_name.insert(spec.name.clone(), TagId(i as u16)).is_some() {
                return Err(CoreError::Config(format!(
                    "duplicate tag name {:?}",
                    spec.name
                )));
            }
        }
        Ok(Self { specs, by_name })
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Ordinal of a tag name.
    ///
    /// # Errors
    ///
    /// `CoreError::UnknownTag` if the name is not registered.
    pub fn id(&self, name: &str) -> CoreResult<TagId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| CoreError::UnknownTag(name.to_owned()))
    }

    /// `None` if the name is not registered — the non-failing lookup used
    /// by ingestion to filter ways.
    pub fn lookup(&self, name: &str) -> Option<TagId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: TagId) -> &str {
        &self.specs[id.index()].name
    }

    pub fn cost_factor(&self, id: TagId) -> Option<f64> {
        self.specs[id.index()].cost_factor
    }

    pub fn color(&self, id: TagId) -> Option<&str> {
        self.specs[id.index()].color.as_deref()
    }

    /// Resolve a list of tag names into a `TagSet`.
    ///
    /// # Errors
    ///
    /// `CoreError::UnknownTag` for the first unregistered name.
    pub fn resolve_set<S: AsRef<str>>(&self, names: &[S]) -> CoreResult<TagSet> {
        let mut set = TagSet::EMPTY;
        for name in names {
            set.insert(self.id(name.as_ref())?);
        }
        Ok(set)
    }
}

impl Default for TagRegistry {
    /// The built-in category table for Dutch walking/cycling networks.
    ///
    /// Order is stable; persisted databases depend on it.
    fn default() -> Self {
        let specs = vec![
            TagSpec::costed("track", 1.0, "green"),
            TagSpec::costed("footway", 1.0, "blue"),
            TagSpec::costed("path", 1.0, "black"),
            TagSpec::costed("cycleway", 1.5, "purple"),
            TagSpec::costed("living_street", 2.0, "purple"),
            TagSpec::costed("pedestrian", 1.2, "yellow"),
            TagSpec::costed("bridleway", 1.0, "black"),
            TagSpec::costed("residential", 1.2, "yellow"),
            TagSpec::costed("steps", 1.0, "green"),
            TagSpec::costed("service", 2.0, "black"),
            TagSpec::costed("unclassified", 1.5, "yellow"),
            TagSpec::costed("tertiary", 2.0, "orange"),
            TagSpec::costed("tertiary_link", 2.0, "orange"),
            TagSpec::costed("secondary", 3.0, "red"),
            TagSpec::costed("secondary_link", 3.0, "red"),
            // Deliberately punitive: primary roads stay routable but a
            // planner should only cross them, never follow them.
            TagSpec::costed("primary", 100.0, "red"),
            TagSpec::costed("primary_link", 100.0, "red"),
            TagSpec::uncosted("motorway"),
            TagSpec::uncosted("motorway_link"),
            TagSpec::uncosted("motorway_junction"),
            TagSpec::uncosted("trunk"),
            TagSpec::uncosted("trunk_link"),
        ];
        // The built-in table is well-formed by construction, so the
        // validation in new() is bypassed rather than unwrapped.
        let by_name = specs
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), TagId(i as u16)))
            .collect();
        Self { specs, by_name }
    }
}
