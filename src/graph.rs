// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Concept graph with petgraph backing, for diagnostics and export

use crate::ingest::Dataset;
use crate::layout::ClusterLayout;
use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Concepts as nodes, spanning-tree edges as directed edges
pub struct ConceptGraph {
    /// The underlying directed graph; node weights are concept IDs
    graph: DiGraph<String, ()>,
    /// Map from concept ID to node index
    node_indices: HashMap<String, NodeIndex>,
}

impl ConceptGraph {
    /// Build from a dataset, skipping edges to unknown concepts
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut graph = DiGraph::with_capacity(dataset.len(), dataset.len());
        let mut node_indices = HashMap::with_capacity(dataset.len());

        for concept in dataset.concepts() {
            let idx = graph.add_node(concept.id.clone());
            node_indices.insert(concept.id.clone(), idx);
        }

        for concept in dataset.concepts() {
            for edge in &concept.mst_edges {
                if let (Some(&from_idx), Some(&to_idx)) =
                    (node_indices.get(&concept.id), node_indices.get(&edge.to))
                {
                    graph.add_edge(from_idx, to_idx, ());
                }
            }
        }

        Self { graph, node_indices }
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of weakly connected components; 1 for a proper spanning tree
    #[must_use]
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    /// IDs of concepts linked to `id` in either direction
    #[must_use]
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors_undirected(idx)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Export to DOT format for Graphviz, pinning nodes at cluster points
    #[must_use]
    pub fn to_dot(&self, dataset: &Dataset, layout: Option<&ClusterLayout>) -> String {
        let mut dot = String::from("graph concepts {\n");
        dot.push_str("  node [shape=plaintext];\n\n");

        for (idx, concept) in dataset.concepts().iter().enumerate() {
            let label = escape(&concept.name);
            match layout.and_then(|l| l.point(idx)) {
                Some(p) => {
                    // Graphviz y grows upwards
                    let _ = writeln!(
                        dot,
                        "  \"{}\" [label=\"{}\", pos=\"{:.1},{:.1}!\"];",
                        escape(&concept.id),
                        label,
                        p.x,
                        -p.y
                    );
                }
                None => {
                    let _ = writeln!(dot, "  \"{}\" [label=\"{}\"];", escape(&concept.id), label);
                }
            }
        }

        dot.push('\n');

        for edge in self.graph.raw_edges() {
            let _ = writeln!(
                dot,
                "  \"{}\" -- \"{}\";",
                escape(&self.graph[edge.source()]),
                escape(&self.graph[edge.target()])
            );
        }

        dot.push_str("}\n");
        dot
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
