//! Per-tag route statistics and the plain-text summary report.

use std::collections::BTreeMap;

use trail_core::{TagId, TagRegistry};

use crate::segment::Route;

/// Length and cost contribution of one tag to a route.
#[derive(Clone, Debug, PartialEq)]
pub struct TagStat {
    pub tag: TagId,
    pub length_m: f64,
    /// Share of the whole-route length, 0–100.
    pub length_pct: f64,
    pub cost: f64,
    /// Share of the whole-route cost, 0–100.
    pub cost_pct: f64,
}

/// Aggregate a route's segments per tag, sorted by descending length
/// (ties by tag ordinal).  Empty route → empty breakdown.
pub fn tag_breakdown(route: &Route) -> Vec<TagStat> {
    if route.is_empty() || route.length_m <= 0.0 {
        return Vec::new();
    }

    // BTreeMap keeps the pre-sort order deterministic.
    let mut by_tag: BTreeMap<TagId, (f64, f64)> = BTreeMap::new();
    for segment in &route.segments {
        let entry = by_tag.entry(segment.tag).or_insert((0.0, 0.0));
        entry.0 += segment.length_m;
        entry.1 += segment.cost;
    }

    let mut stats: Vec<TagStat> = by_tag
        .into_iter()
        .map(|(tag, (length_m, cost))| TagStat {
            tag,
            length_m,
            length_pct: 100.0 * length_m / route.length_m,
            cost,
            cost_pct: 100.0 * cost / route.cost,
        })
        .collect();
    stats.sort_by(|a, b| {
        b.length_m
            .total_cmp(&a.length_m)
            .then_with(|| a.tag.cmp(&b.tag))
    });
    stats
}

/// Render the per-tag table plus totals, one line per tag:
///
/// ```text
/// path         black       334  60%    334  45%
/// cycleway     purple      223  40%    408  55%
/// total length: 557 m, total cost: 742
/// near primary: 0 m
/// near trunk: 223 m
/// ```
pub fn summary(route: &Route, registry: &TagRegistry) -> String {
    let mut out = String::new();
    for stat in tag_breakdown(route) {
        let name = registry.name(stat.tag);
        let color = registry.color(stat.tag).unwrap_or("-");
        out.push_str(&format!(
            "{name:<13}{color:<10}{length:>6} {length_pct:>3}%{cost:>8} {cost_pct:>3}%\n",
            length = stat.length_m.round() as i64,
            length_pct = stat.length_pct.round() as i64,
            cost = stat.cost.round() as i64,
            cost_pct = stat.cost_pct.round() as i64,
        ));
    }
    out.push_str(&format!(
        "total length: {} m, total cost: {}\n",
        route.length_m.round() as i64,
        route.cost.round() as i64
    ));
    out.push_str(&format!(
        "near primary: {} m\n",
        route.near_primary_m.round() as i64
    ));
    out.push_str(&format!(
        "near trunk: {} m\n",
        route.near_trunk_m.round() as i64
    ));
    out
}
