//! Unit tests for trail-graph.
//!
//! All tests use small hand-crafted networks around 52°N so that the
//! default projection behaves like it does on real data.

#[cfg(test)]
mod helpers {
    use trail_core::{FlatProjection, GeoPoint, PlannerConfig, TagRegistry};

    use crate::network::{NetworkBuilder, TrailNetwork, Way};
    use crate::{apply_proximity_flags, assign_costs, RTreeIndex};

    pub fn projection() -> FlatProjection {
        FlatProjection::new(52.09)
    }

    /// Test fixture around a four-node path chain:
    ///
    /// ```text
    /// 1 ── 2 ── 3 ── 4 ── 100   (1..4 "path", 4–100 "trunk")
    /// │
    /// 50                        (1–50 "primary")
    /// ```
    ///
    /// Chain nodes are 0.001° of latitude apart (≈ 111 m); node 50 sits
    /// 0.0001° of longitude (≈ 7 m) from node 1.
    pub fn sample_records() -> (Vec<Way>, Vec<(i64, GeoPoint)>, TagRegistry) {
        let registry = TagRegistry::default();
        let path = registry.id("path").unwrap();
        let trunk = registry.id("trunk").unwrap();
        let primary = registry.id("primary").unwrap();

        let ways = vec![
            Way::new(vec![1, 2, 3, 4], path),
            Way::new(vec![4, 100], trunk),
            Way::new(vec![1, 50], primary),
        ];
        let nodes = vec![
            (1, GeoPoint::new(52.0, 6.0)),
            (2, GeoPoint::new(52.001, 6.0)),
            (3, GeoPoint::new(52.002, 6.0)),
            (4, GeoPoint::new(52.003, 6.0)),
            (100, GeoPoint::new(52.004, 6.0)),
            (50, GeoPoint::new(52.0, 6.0001)),
        ];
        (ways, nodes, registry)
    }

    /// Radii chosen for the fixture: the trunk pass reaches node 3
    /// (≈ 111 m from the trunk origin at node 4) but not node 2; the
    /// primary pass only reaches node 1's immediate surroundings.
    pub fn sample_config() -> PlannerConfig {
        PlannerConfig {
            trunk_radius_deg: 0.0015,
            primary_radius_deg: 0.0002,
            ..PlannerConfig::default()
        }
    }

    /// Fully annotated fixture network.
    pub fn annotated() -> (TrailNetwork, TagRegistry, PlannerConfig) {
        let (ways, nodes, registry) = sample_records();
        let config = sample_config();
        let trunk = config.trunk_set(&registry).unwrap();
        let primary = config.primary_set(&registry).unwrap();

        let mut b = NetworkBuilder::new();
        for (id, p) in nodes {
            b.add_node(id, p);
        }
        for w in ways {
            b.add_way(w);
        }
        let mut net = b.build(trunk, &projection());
        apply_proximity_flags::<RTreeIndex>(
            &mut net,
            &projection(),
            trunk,
            config.trunk_radius_deg,
            primary,
            config.primary_radius_deg,
        );
        assign_costs(&mut net, &registry, &config).unwrap();
        (net, registry, config)
    }

    /// Look up a routable edge by its external endpoint ids.
    pub fn edge_by_ext(net: &TrailNetwork, a: i64, b: i64) -> crate::TrailEdge {
        let na = net.node_by_external(a).unwrap();
        let nb = net.node_by_external(b).unwrap();
        let id = net.edge_between(na, nb).unwrap();
        net.edge(id).clone()
    }
}

// ── Builder & dedup ───────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use trail_core::{GeoPoint, TagRegistry, TagSet};

    use super::helpers;
    use crate::network::{NetworkBuilder, Way};

    #[test]
    fn empty_input_builds_empty_network() {
        let net = NetworkBuilder::new().build(TagSet::EMPTY, &helpers::projection());
        assert!(net.is_empty());
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
    }

    #[test]
    fn duplicate_pairs_collapse_to_one_edge() {
        let reg = TagRegistry::default();
        let path = reg.id("path").unwrap();
        let track = reg.id("track").unwrap();

        let mut b = NetworkBuilder::new();
        b.add_node(1, GeoPoint::new(52.0, 6.0));
        b.add_node(2, GeoPoint::new(52.001, 6.0));
        b.add_way(Way::new(vec![1, 2], path));
        b.add_way(Way::new(vec![2, 1], track)); // reversed duplicate
        let net = b.build(TagSet::EMPTY, &helpers::projection());

        assert_eq!(net.edge_count(), 1);
        // First way wins the tag, insert-or-ignore style.
        assert_eq!(net.edges()[0].tag, path);
    }

    #[test]
    fn orientation_is_canonical() {
        let reg = TagRegistry::default();
        let path = reg.id("path").unwrap();

        // The way lists the larger external id first; the edge record must
        // still put the smaller id at `from`.
        let mut b = NetworkBuilder::new();
        b.add_node(9, GeoPoint::new(52.0, 6.0));
        b.add_node(3, GeoPoint::new(52.001, 6.0));
        b.add_way(Way::new(vec![9, 3], path));
        let net = b.build(TagSet::EMPTY, &helpers::projection());

        let e = &net.edges()[0];
        assert_eq!(net.external_id(e.from), 3);
        assert_eq!(net.external_id(e.to), 9);
    }

    #[test]
    fn self_referential_pairs_are_skipped() {
        let reg = TagRegistry::default();
        let path = reg.id("path").unwrap();

        let mut b = NetworkBuilder::new();
        b.add_node(1, GeoPoint::new(52.0, 6.0));
        b.add_node(2, GeoPoint::new(52.001, 6.0));
        b.add_way(Way::new(vec![1, 1, 2], path));
        let net = b.build(TagSet::EMPTY, &helpers::projection());
        assert_eq!(net.edge_count(), 1);
    }

    #[test]
    fn pairs_with_unknown_coordinates_are_dropped() {
        let reg = TagRegistry::default();
        let path = reg.id("path").unwrap();

        let mut b = NetworkBuilder::new();
        b.add_node(1, GeoPoint::new(52.0, 6.0));
        b.add_node(2, GeoPoint::new(52.001, 6.0));
        // Node 7 has no coordinate record: 2–7 vanishes, 1–2 survives.
        b.add_way(Way::new(vec![1, 2, 7], path));
        let net = b.build(TagSet::EMPTY, &helpers::projection());
        assert_eq!(net.edge_count(), 1);
        assert!(net.node_by_external(7).is_none());
    }

    #[test]
    fn edge_lengths_are_positive() {
        let (net, _, _) = helpers::annotated();
        for e in net.edges() {
            assert!(e.length_m >= 1.0, "edge length {} below floor", e.length_m);
        }
        // Chain spacing is 0.001° of latitude ≈ 111 m.
        let e = helpers::edge_by_ext(&net, 1, 2);
        assert!((e.length_m - 111.3).abs() < 1.0, "got {}", e.length_m);
    }

    #[test]
    fn csr_adjacency_matches_edges() {
        let (net, _, _) = helpers::annotated();
        let n2 = net.node_by_external(2).unwrap();
        let neighbors: Vec<i64> = net
            .neighbors(n2)
            .map(|(t, _)| net.external_id(t))
            .collect();
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains(&1) && neighbors.contains(&3));
        assert_eq!(net.degree(n2), 2);

        // Every half-edge must point back at its own record.
        for node in net.node_ids() {
            for (target, edge) in net.neighbors(node) {
                let e = net.edge(edge);
                assert!(
                    (e.from == node && e.to == target) || (e.to == node && e.from == target)
                );
            }
        }
    }
}

// ── Pruning ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pruning {
    use trail_core::{GeoPoint, TagRegistry, TagSet};

    use super::helpers;
    use crate::network::{NetworkBuilder, TrailNetwork, Way};

    fn two_fragments() -> TrailNetwork {
        let reg = TagRegistry::default();
        let path = reg.id("path").unwrap();

        let mut b = NetworkBuilder::new();
        // Fragment A: 3 nodes.
        b.add_node(1, GeoPoint::new(52.0, 6.0));
        b.add_node(2, GeoPoint::new(52.001, 6.0));
        b.add_node(3, GeoPoint::new(52.002, 6.0));
        b.add_way(Way::new(vec![1, 2, 3], path));
        // Fragment B: 2 nodes, far away.
        b.add_node(10, GeoPoint::new(53.0, 7.0));
        b.add_node(11, GeoPoint::new(53.001, 7.0));
        b.add_way(Way::new(vec![10, 11], path));
        b.build(TagSet::EMPTY, &helpers::projection())
    }

    #[test]
    fn only_largest_component_survives() {
        let net = two_fragments();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.edge_count(), 2);
        assert!(net.node_by_external(1).is_some());
        assert!(net.node_by_external(10).is_none());
    }

    #[test]
    fn excluded_edges_count_towards_connectivity() {
        let reg = TagRegistry::default();
        let path = reg.id("path").unwrap();
        let trunk = reg.id("trunk").unwrap();
        let excluded = reg.resolve_set(&["trunk"]).unwrap();

        // 1–2 path, 2–3 trunk, 3–4 path: one component of four nodes even
        // though the middle edge is unroutable.
        let mut b = NetworkBuilder::new();
        for (id, lat) in [(1, 52.0), (2, 52.001), (3, 52.002), (4, 52.003)] {
            b.add_node(id, GeoPoint::new(lat, 6.0));
        }
        b.add_way(Way::new(vec![1, 2], path));
        b.add_way(Way::new(vec![2, 3], trunk));
        b.add_way(Way::new(vec![3, 4], path));
        let net = b.build(excluded, &helpers::projection());

        assert_eq!(net.node_count(), 4);
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.excluded_edges().len(), 1);
    }

    #[test]
    fn pruning_is_idempotent() {
        let (net1, _, config) = helpers::annotated();
        let registry = TagRegistry::default();
        let trunk = config.trunk_set(&registry).unwrap();

        // Feed the first build's output back in as 2-node ways.
        let mut b = NetworkBuilder::new();
        for node in net1.node_ids() {
            b.add_node(net1.external_id(node), net1.position(node));
        }
        for e in net1.edges() {
            b.add_way(Way::new(
                vec![net1.external_id(e.from), net1.external_id(e.to)],
                e.tag,
            ));
        }
        for e in net1.excluded_edges() {
            b.add_way(Way::new(
                vec![net1.external_id(e.from), net1.external_id(e.to)],
                e.tag,
            ));
        }
        let net2 = b.build(trunk, &helpers::projection());

        let ids1: Vec<i64> = net1.node_ids().map(|n| net1.external_id(n)).collect();
        let ids2: Vec<i64> = net2.node_ids().map(|n| net2.external_id(n)).collect();
        assert_eq!(ids1, ids2);

        let edges1: Vec<(i64, i64, u16)> = net1
            .edges()
            .iter()
            .map(|e| (net1.external_id(e.from), net1.external_id(e.to), e.tag.0))
            .collect();
        let edges2: Vec<(i64, i64, u16)> = net2
            .edges()
            .iter()
            .map(|e| (net2.external_id(e.from), net2.external_id(e.to), e.tag.0))
            .collect();
        assert_eq!(edges1, edges2);
        assert_eq!(net1.excluded_edges().len(), net2.excluded_edges().len());
    }
}

// ── Spatial index ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod spatial {
    use crate::spatial::{RTreeIndex, SpatialIndex};

    #[test]
    fn nearest_on_empty_index_is_none() {
        let idx = RTreeIndex::build(&[]);
        assert_eq!(idx.nearest([0.0, 0.0]), None);
    }

    #[test]
    fn nearest_returns_build_slot() {
        let idx = RTreeIndex::build(&[[0.0, 0.0], [1.0, 0.0], [0.0, 2.0]]);
        assert_eq!(idx.nearest([0.9, 0.1]), Some(1));
        assert_eq!(idx.nearest([0.0, 1.5]), Some(2));
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        // One point at exactly the query radius: the delta 0.001 and the
        // radius 0.001 are the same f64, so the comparison is bit-exact.
        let idx = RTreeIndex::build(&[[0.001, 0.0]]);
        assert_eq!(idx.within_radius([0.0, 0.0], 0.001), vec![0]);
        assert!(idx.within_radius([0.0, 0.0], 0.0009).is_empty());
    }

    #[test]
    fn radius_collects_all_hits() {
        let idx = RTreeIndex::build(&[[0.0, 0.0], [0.5, 0.0], [3.0, 0.0]]);
        let mut hits = idx.within_radius([0.1, 0.0], 1.0);
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1]);
    }
}

// ── Proximity ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod proximity {
    use trail_core::TagSet;

    use super::helpers;
    use crate::network::NetworkBuilder;
    use crate::{apply_proximity_flags, RTreeIndex};

    #[test]
    fn near_trunk_flags_follow_the_origin_node() {
        let (net, _, _) = helpers::annotated();
        // Trunk origin is node 4 (52.003); radius 0.0015° reaches node 3
        // but not node 2.  Edge 3–4 has origin node 3 → flagged; edge 2–3
        // has origin node 2 → not flagged.
        assert!(helpers::edge_by_ext(&net, 3, 4).near_trunk);
        assert!(!helpers::edge_by_ext(&net, 2, 3).near_trunk);
        assert!(!helpers::edge_by_ext(&net, 1, 2).near_trunk);
    }

    #[test]
    fn near_primary_uses_its_own_shorter_radius() {
        let (net, _, _) = helpers::annotated();
        // Primary origin is node 1; only node 1 itself (and node 50, ~7 m
        // away) fall inside 0.0002°.
        assert!(helpers::edge_by_ext(&net, 1, 2).near_primary);
        assert!(helpers::edge_by_ext(&net, 1, 50).near_primary);
        assert!(!helpers::edge_by_ext(&net, 2, 3).near_primary);
        // The trunk radius must not leak into the primary pass.
        assert!(!helpers::edge_by_ext(&net, 3, 4).near_primary);
    }

    #[test]
    fn empty_source_set_leaves_flags_false() {
        let (ways, nodes, _) = helpers::sample_records();
        let mut b = NetworkBuilder::new();
        for (id, p) in nodes {
            b.add_node(id, p);
        }
        for w in ways {
            b.add_way(w);
        }
        let mut net = b.build(TagSet::EMPTY, &helpers::projection());
        apply_proximity_flags::<RTreeIndex>(
            &mut net,
            &helpers::projection(),
            TagSet::EMPTY,
            0.01,
            TagSet::EMPTY,
            0.01,
        );
        assert!(net.edges().iter().all(|e| !e.near_trunk && !e.near_primary));
    }

    #[test]
    fn flags_are_independent_of_way_order() {
        let (ways, nodes, registry) = helpers::sample_records();
        let config = helpers::sample_config();
        let trunk = config.trunk_set(&registry).unwrap();
        let primary = config.primary_set(&registry).unwrap();

        let build = |ways: Vec<crate::Way>, nodes: &[(i64, trail_core::GeoPoint)]| {
            let mut b = NetworkBuilder::new();
            for &(id, p) in nodes {
                b.add_node(id, p);
            }
            for w in ways {
                b.add_way(w);
            }
            let mut net = b.build(trunk, &helpers::projection());
            apply_proximity_flags::<RTreeIndex>(
                &mut net,
                &helpers::projection(),
                trunk,
                config.trunk_radius_deg,
                primary,
                config.primary_radius_deg,
            );
            net
        };

        let forward = build(ways.clone(), &nodes);
        let mut reversed_ways = ways;
        reversed_ways.reverse();
        for w in &mut reversed_ways {
            w.nodes.reverse(); // also reverse node order inside each way
        }
        let reversed = build(reversed_ways, &nodes);

        let flags = |net: &crate::TrailNetwork| -> Vec<(i64, i64, bool, bool)> {
            net.edges()
                .iter()
                .map(|e| {
                    (
                        net.external_id(e.from),
                        net.external_id(e.to),
                        e.near_trunk,
                        e.near_primary,
                    )
                })
                .collect()
        };
        assert_eq!(flags(&forward), flags(&reversed));
    }
}

// ── Cost model ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cost {
    use trail_core::{GeoPoint, PlannerConfig, TagRegistry, TagSet};

    use super::helpers;
    use crate::network::{NetworkBuilder, Way};
    use crate::{assign_costs, edge_cost};

    #[test]
    fn plain_edge_is_length_times_factor() {
        let cfg = PlannerConfig::default();
        assert_eq!(edge_cost(1.5, 100.0, false, false, &cfg), 150.0);
    }

    #[test]
    fn primary_edge_scenario() {
        let cfg = PlannerConfig::default();
        // Tag "primary" (factor 100), length 50, near a primary road.
        assert_eq!(edge_cost(100.0, 50.0, false, true, &cfg), 50.0 * 100.0 * 20.0);
        // Flipping near_trunk on switches to the trunk multiplier even
        // though near_primary is still set.
        assert_eq!(edge_cost(100.0, 50.0, true, true, &cfg), 50.0 * 100.0 * 3.0);
    }

    #[test]
    fn cost_is_monotonic_in_length() {
        let cfg = PlannerConfig::default();
        let short = edge_cost(2.0, 80.0, true, false, &cfg);
        let long = edge_cost(2.0, 80.1, true, false, &cfg);
        assert!(long > short);
    }

    #[test]
    fn all_routable_edges_get_positive_cost() {
        let (net, _, _) = helpers::annotated();
        assert!(net.edge_count() > 0);
        for e in net.edges() {
            assert!(e.cost > 0.0, "edge {:?} has non-positive cost", e);
        }
    }

    #[test]
    fn unexcluded_trunk_tag_is_a_configuration_error() {
        let registry = TagRegistry::default();
        let trunk = registry.id("trunk").unwrap();
        let config = PlannerConfig::default();

        // Build with an empty exclusion set so the trunk edge lands in the
        // routable graph; costing must refuse it.
        let mut b = NetworkBuilder::new();
        b.add_node(1, GeoPoint::new(52.0, 6.0));
        b.add_node(2, GeoPoint::new(52.001, 6.0));
        b.add_way(Way::new(vec![1, 2], trunk));
        let mut net = b.build(TagSet::EMPTY, &helpers::projection());

        let err = assign_costs(&mut net, &registry, &config).unwrap_err();
        assert!(matches!(err, crate::GraphError::MissingCostFactor(name) if name == "trunk"));
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use trail_core::TagRegistry;

    use crate::{load_nodes_reader, load_ways_reader};

    #[test]
    fn nodes_roundtrip() {
        let csv = "node_id,latitude,longitude\n46374945,52.9483,6.6204\n46374946,52.9490,6.6215\n";
        let nodes = load_nodes_reader(Cursor::new(csv)).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].0, 46374945);
        assert_eq!(nodes[0].1.lat, 52.9483);
    }

    #[test]
    fn unregistered_way_tags_are_filtered() {
        let reg = TagRegistry::default();
        let csv = "tag,nodes\ncycleway,1 2 3\nbuilding,4 5\ntrack,3 6\n";
        let ways = load_ways_reader(Cursor::new(csv), &reg).unwrap();
        assert_eq!(ways.len(), 2);
        assert_eq!(ways[0].nodes, vec![1, 2, 3]);
        assert_eq!(ways[0].tag, reg.id("cycleway").unwrap());
        assert_eq!(ways[1].tag, reg.id("track").unwrap());
    }

    #[test]
    fn malformed_node_id_fails() {
        let reg = TagRegistry::default();
        let csv = "tag,nodes\ntrack,1 x 3\n";
        assert!(matches!(
            load_ways_reader(Cursor::new(csv), &reg),
            Err(crate::GraphError::Parse(_))
        ));
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pipeline {
    use super::helpers;
    use crate::prepare_network;

    #[test]
    fn end_to_end_annotation() {
        let (ways, nodes, registry) = helpers::sample_records();
        let config = helpers::sample_config();
        let net = prepare_network(ways, nodes, &registry, &config).unwrap();

        assert_eq!(net.node_count(), 6);
        assert_eq!(net.edge_count(), 4); // 1–2, 2–3, 3–4, 1–50
        assert_eq!(net.excluded_edges().len(), 1); // 4–100
        assert!(net.edges().iter().all(|e| e.cost > 0.0));
        assert!(helpers::edge_by_ext(&net, 3, 4).near_trunk);
        assert!(helpers::edge_by_ext(&net, 1, 2).near_primary);
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let (_, _, registry) = helpers::sample_records();
        let net = prepare_network(Vec::new(), Vec::new(), &registry, &helpers::sample_config())
            .unwrap();
        assert!(net.is_empty());
    }
}
