// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Inverse-prominence hierarchy
//!
//! The analyser reports the prominence hierarchy as a flat list of
//! `(parent, child, weight)` edges. This module rebuilds it into exactly one
//! rooted tree:
//!
//! 1. index every id seen on either end of an edge,
//! 2. record children in edge order and the parent/weight of each child,
//! 3. require exactly one parentless node,
//! 4. materialise depth-first from that root with a visited set.
//!
//! Every walk uses an explicit stack, so chain depth is bounded by memory
//! rather than by the thread stack.
//!
//! A node reached twice (two parents) or a cycle that never touches the
//! root fails with [`DataError::CycleDetected`].

use crate::error::{DataError, DataResult};
use crate::types::ProminenceEdge;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Node of the rebuilt prominence tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProminenceNode {
    /// Concept ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Weight of the edge leading to this node; `None` at the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Children in edge order
    pub children: Vec<ProminenceNode>,
}

impl ProminenceNode {
    /// Total number of nodes in this subtree
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(&node.children);
        }
        count
    }

    /// Depth of this subtree (a leaf has depth 1)
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Flatten back into parent/child edges, pre-order
    #[must_use]
    pub fn flatten(&self) -> Vec<ProminenceEdge> {
        let mut edges = Vec::new();
        let mut stack: Vec<(&Self, &Self)> = self.children.iter().rev().map(|c| (self, c)).collect();
        while let Some((parent, child)) = stack.pop() {
            edges.push(ProminenceEdge {
                from: parent.id.clone(),
                to: child.id.clone(),
                weight: child.weight.unwrap_or_default(),
            });
            stack.extend(child.children.iter().rev().map(|grandchild| (child, grandchild)));
        }
        edges
    }
}

impl Drop for ProminenceNode {
    // Unlinks children onto a heap stack so long chains do not drop recursively.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

#[derive(Debug, Default)]
struct IndexEntry {
    parent: Option<String>,
    children: Vec<String>,
    weight: Option<f64>,
}

/// Flat node index in first-seen order
#[derive(Debug, Default)]
struct NodeIndex {
    order: Vec<String>,
    entries: HashMap<String, IndexEntry>,
}

impl NodeIndex {
    fn from_edges(edges: &[ProminenceEdge]) -> Self {
        let mut index = Self::default();
        for edge in edges {
            index.seed(&edge.from);
            index.seed(&edge.to);

            if let Some(parent) = index.entries.get_mut(&edge.from) {
                parent.children.push(edge.to.clone());
            }
            if let Some(child) = index.entries.get_mut(&edge.to) {
                child.parent = Some(edge.from.clone());
                child.weight = Some(edge.weight);
            }
        }
        index
    }

    fn seed(&mut self, id: &str) {
        if !self.entries.contains_key(id) {
            self.order.push(id.to_string());
            self.entries.insert(id.to_string(), IndexEntry::default());
        }
    }

    fn root(&self) -> DataResult<&str> {
        let roots: Vec<&String> = self
            .order
            .iter()
            .filter(|id| self.entries.get(*id).is_some_and(|e| e.parent.is_none()))
            .collect();

        match roots.as_slice() {
            [] => Err(DataError::NoRoot),
            [root] => Ok(root.as_str()),
            many => Err(DataError::MultipleRoots(many.iter().map(|r| (*r).clone()).collect())),
        }
    }

    /// Follow parent links from `start` until a node repeats
    fn cycle_member(&self, start: &str) -> String {
        let mut seen = HashSet::new();
        let mut current = start.to_string();
        while seen.insert(current.clone()) {
            match self.entries.get(&current).and_then(|e| e.parent.clone()) {
                Some(parent) => current = parent,
                None => return start.to_string(),
            }
        }
        current
    }
}

/// Rebuild the single rooted tree described by `edges`
///
/// `name_of` maps concept ids to display names; ids it does not know keep
/// their id as the name.
pub fn build_hierarchy<F>(edges: &[ProminenceEdge], name_of: F) -> DataResult<ProminenceNode>
where
    F: Fn(&str) -> Option<String>,
{
    let index = NodeIndex::from_edges(edges);
    let root = index.root()?;

    let mut visited = HashSet::with_capacity(index.order.len());
    let tree = materialize(root, &index, &name_of, &mut visited)?;

    if let Some(unreached) = index.order.iter().find(|id| !visited.contains(*id)) {
        return Err(DataError::CycleDetected(index.cycle_member(unreached)));
    }

    debug!(
        "Built prominence tree: {} nodes, depth {}",
        tree.node_count(),
        tree.depth()
    );

    Ok(tree)
}

/// Node whose children are still being materialised
struct Frame<'a> {
    id: &'a str,
    weight: Option<f64>,
    child_ids: &'a [String],
    next: usize,
    children: Vec<ProminenceNode>,
}

impl<'a> Frame<'a> {
    fn open(id: &'a str, index: &'a NodeIndex, visited: &mut HashSet<String>) -> DataResult<Self> {
        if !visited.insert(id.to_string()) {
            return Err(DataError::CycleDetected(id.to_string()));
        }
        let (weight, child_ids) = match index.entries.get(id) {
            Some(entry) => (entry.weight, entry.children.as_slice()),
            None => (None, &[][..]),
        };
        Ok(Self {
            id,
            weight,
            child_ids,
            next: 0,
            children: Vec::with_capacity(child_ids.len()),
        })
    }
}

/// Depth-first build from `root` on an explicit stack, children in edge order
fn materialize<F>(
    root: &str,
    index: &NodeIndex,
    name_of: &F,
    visited: &mut HashSet<String>,
) -> DataResult<ProminenceNode>
where
    F: Fn(&str) -> Option<String>,
{
    let mut stack = vec![Frame::open(root, index, visited)?];

    while let Some(frame) = stack.last_mut() {
        let child_ids = frame.child_ids;
        if let Some(child) = child_ids.get(frame.next) {
            frame.next += 1;
            let opened = Frame::open(child, index, visited)?;
            stack.push(opened);
            continue;
        }

        let Some(done) = stack.pop() else { break };
        let node = ProminenceNode {
            id: done.id.to_string(),
            name: name_of(done.id).unwrap_or_else(|| done.id.to_string()),
            weight: done.weight,
            children: done.children,
        };
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => return Ok(node),
        }
    }

    Err(DataError::NoRoot)
}
