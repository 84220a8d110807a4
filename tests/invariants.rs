// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the concept layout core
//!
//! These tests verify critical invariants:
//! 1. Cluster positions scale linearly with the viewport
//! 2. The prominence hierarchy survives a flatten/rebuild round trip
//! 3. Ranked links are a prefix of the full prominence ordering
//! 4. Scaling decisions follow the distribution heuristic

use concept_atlas::hierarchy::{build_hierarchy, ProminenceNode};
use concept_atlas::ingest::{load_str, IngestOptions};
use concept_atlas::layout::position;
use concept_atlas::mst::build_segments;
use concept_atlas::layout::ClusterLayout;
use concept_atlas::prelude::*;
use concept_atlas::scaling::{adaptive_exponent, CharWidthEstimate, WeightStats};
use concept_atlas::wheel::{rank_edges, RelatedEdge};
use proptest::prelude::*;

// =============================================================================
// Test Helpers
// =============================================================================

fn related(i: usize, prominence: f64) -> RelatedEdge {
    RelatedEdge {
        source_id: format!("s{i}"),
        target_id: format!("t{i}"),
        source_name: format!("source {i}"),
        target_name: format!("target {i}"),
        prominence,
        strength: 0.5,
        count: 1,
    }
}

/// Edges of a random tree: node `i` hangs under one of the nodes before it
fn tree_edges(parents: &[usize], weights: &[f64]) -> Vec<ProminenceEdge> {
    parents
        .iter()
        .zip(weights)
        .enumerate()
        .map(|(i, (parent, weight))| ProminenceEdge {
            from: format!("n{}", parent % (i + 1)),
            to: format!("n{}", i + 1),
            weight: *weight,
        })
        .collect()
}

/// Child-order-insensitive form of a tree
fn canonical(node: &ProminenceNode) -> String {
    let mut children: Vec<String> = node.children.iter().map(canonical).collect();
    children.sort();
    format!("{}:{:?}[{}]", node.name, node.weight, children.join(","))
}

fn name_of(id: &str) -> Option<String> {
    Some(id.to_uppercase())
}

// =============================================================================
// Cluster Positioning
// =============================================================================

proptest! {
    #[test]
    fn prop_position_scales_with_viewport(
        u in -1.0f64..=1.0,
        v in -1.0f64..=1.0,
        width in 1.0f64..4000.0,
        height in 1.0f64..4000.0,
    ) {
        let concept = Concept::new("1", "word", 1.0, Position { u, v });
        let base = position(&concept, width, height).unwrap();
        let doubled = position(&concept, width * 2.0, height * 2.0).unwrap();

        prop_assert!((doubled.x - 2.0 * base.x).abs() <= 1e-9 * width);
        prop_assert!((doubled.y - 2.0 * base.y).abs() <= 1e-9 * height);
    }
}

#[test]
fn test_non_finite_position_rejected() {
    let concept = Concept::new("7", "word", 1.0, Position { u: f64::NAN, v: 0.0 });
    assert_eq!(
        position(&concept, 900.0, 500.0),
        Err(DataError::InvalidPosition("7".into()))
    );
}

// =============================================================================
// Prominence Hierarchy
// =============================================================================

proptest! {
    #[test]
    fn prop_hierarchy_counts_every_node(
        parents in proptest::collection::vec(0usize..1000, 1..60),
        seed in 0.0f64..1.0,
    ) {
        let weights: Vec<f64> = (0..parents.len()).map(|i| seed + i as f64).collect();
        let edges = tree_edges(&parents, &weights);
        let tree = build_hierarchy(&edges, name_of).unwrap();

        prop_assert_eq!(tree.id.as_str(), "n0");
        prop_assert_eq!(tree.node_count(), parents.len() + 1);
    }

    #[test]
    fn prop_hierarchy_round_trip(
        parents in proptest::collection::vec(0usize..1000, 1..60),
        seed in 0.0f64..1.0,
    ) {
        let weights: Vec<f64> = (0..parents.len()).map(|i| seed * (i + 1) as f64).collect();
        let mut edges = tree_edges(&parents, &weights);
        edges.reverse();

        let tree = build_hierarchy(&edges, name_of).unwrap();
        let rebuilt = build_hierarchy(&tree.flatten(), name_of).unwrap();

        prop_assert_eq!(canonical(&tree), canonical(&rebuilt));
    }
}

#[test]
fn test_two_parentless_nodes() {
    let edges = vec![
        ProminenceEdge { from: "a".into(), to: "b".into(), weight: 1.0 },
        ProminenceEdge { from: "c".into(), to: "d".into(), weight: 1.0 },
    ];
    assert!(matches!(
        build_hierarchy(&edges, name_of),
        Err(DataError::MultipleRoots(roots)) if roots.len() == 2
    ));
}

// =============================================================================
// Relatedness Ranking
// =============================================================================

proptest! {
    #[test]
    fn prop_ranked_links_are_prefix(prominences in proptest::collection::vec(0u32..50, 300)) {
        let edges: Vec<RelatedEdge> = prominences
            .iter()
            .enumerate()
            .map(|(i, p)| related(i, f64::from(*p)))
            .collect();

        let mut full = edges.clone();
        full.sort_by(|a, b| b.prominence.total_cmp(&a.prominence));

        let ranked = rank_edges(edges, 200);
        prop_assert_eq!(ranked.len(), 200);
        prop_assert!(ranked.windows(2).all(|w| w[0].prominence >= w[1].prominence));
        prop_assert_eq!(&ranked[..], &full[..200]);
    }
}

#[test]
fn test_fewer_candidates_than_budget() {
    let edges = vec![related(0, 1.0), related(1, 3.0)];
    let ranked = rank_edges(edges, 200);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].prominence, 3.0);
}

// =============================================================================
// Adaptive Scaling
// =============================================================================

#[test]
fn test_wide_spread_clamps_to_minimum() {
    let stats = WeightStats {
        min: 0.0,
        max: 500.0,
        total: 1000.0,
        mean: 100.0,
        count: 10,
        below_mean: 2,
    };
    assert_eq!(adaptive_exponent(&stats).exponent, 0.8);
}

#[test]
fn test_near_uniform_stays_linear() {
    let stats = WeightStats {
        min: 25.0,
        max: 75.0,
        total: 100.0,
        mean: 50.0,
        count: 2,
        below_mean: 1,
    };
    assert_eq!(stats.range_fraction(), 0.5);
    assert_eq!(adaptive_exponent(&stats).exponent, 1.0);
}

// =============================================================================
// End to End
// =============================================================================

const TWO_CONCEPTS: &str = r#"{
    "concepts": {
        "1": {"value": "A", "weight": 10, "x": 0, "y": 0, "mstEdges": [{"to": "2"}, {"to": "99"}]},
        "2": {"value": "B", "weight": 20, "x": 1, "y": 1, "mstEdges": []}
    },
    "themes": {},
    "iprom": []
}"#;

#[test]
fn test_end_to_end_segment() {
    let dataset = load_str(TWO_CONCEPTS, &IngestOptions::default()).unwrap();
    let params = LayoutParams::default();
    let views = derive_views(&dataset, &params, &CharWidthEstimate::default()).unwrap();

    assert_eq!(views.spanning_tree.segments.len(), 1);
    assert_eq!(views.spanning_tree.dropped, 1);

    let segment = &views.spanning_tree.segments[0];
    assert_eq!(segment.x1, 0.0);
    assert_eq!(segment.y1, 0.0);
    assert_eq!(segment.x2, 450.0);
    assert_eq!(segment.y2, 250.0);
    assert_eq!(segment.source_name, "A");
    assert_eq!(segment.target_name, "B");
}

#[test]
fn test_views_are_deterministic() {
    let dataset = load_str(TWO_CONCEPTS, &IngestOptions::default()).unwrap();
    let params = LayoutParams {
        orientation: Orientation::Messy,
        ..LayoutParams::default()
    };
    let a = derive_views(&dataset, &params, &CharWidthEstimate::default()).unwrap();
    let b = derive_views(&dataset, &params, &CharWidthEstimate::default()).unwrap();

    assert_eq!(a.words, b.words);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_missing_mst_target_is_dropped() {
    let dataset = load_str(TWO_CONCEPTS, &IngestOptions::default()).unwrap();
    let layout = ClusterLayout::compute(&dataset, Viewport::default()).unwrap();
    let tree = build_segments(&dataset, &layout);
    assert!(tree.segments.iter().all(|s| s.target_name != "99"));
}
