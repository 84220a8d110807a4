// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Spanning tree segments for the concept web
//!
//! Each concept's outgoing spanning-tree edges become line segments between
//! cluster points. Edges are joined by concept ID; names only label the
//! segment. An edge whose target is missing is dropped, never an error.

use crate::ingest::Dataset;
use crate::layout::ClusterLayout;
use serde::Serialize;
use tracing::debug;

/// A drawable spanning-tree edge
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanningSegment {
    /// Start x
    pub x1: f64,
    /// Start y
    pub y1: f64,
    /// End x
    pub x2: f64,
    /// End y
    pub y2: f64,
    /// Source concept name
    pub source_name: String,
    /// Target concept name
    pub target_name: String,
}

/// Segments plus the number of edges that could not be resolved
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpanningTree {
    /// Segments in concept order, then edge order
    pub segments: Vec<SpanningSegment>,
    /// Edges skipped because an endpoint was unknown
    pub dropped: usize,
}

/// Build segments for every resolvable spanning-tree edge
#[must_use]
pub fn build_segments(dataset: &Dataset, layout: &ClusterLayout) -> SpanningTree {
    let mut tree = SpanningTree::default();

    for (idx, concept) in dataset.concepts().iter().enumerate() {
        let Some(start) = layout.point(idx) else {
            tree.dropped += concept.mst_edges.len();
            continue;
        };

        for edge in &concept.mst_edges {
            let target = dataset.concept(&edge.to).zip(layout.point_of(dataset, &edge.to));

            match target {
                Some((target, end)) => tree.segments.push(SpanningSegment {
                    x1: start.x,
                    y1: start.y,
                    x2: end.x,
                    y2: end.y,
                    source_name: concept.name.clone(),
                    target_name: target.name.clone(),
                }),
                None => tree.dropped += 1,
            }
        }
    }

    if tree.dropped > 0 {
        debug!("Dropped {} unresolved spanning-tree edges", tree.dropped);
    }

    tree
}
