// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use concept_atlas::hierarchy::build_hierarchy;
use concept_atlas::types::ProminenceEdge;
use libfuzzer_sys::fuzz_target;

// Each byte pair is one parent/child edge over a small id space
fuzz_target!(|data: &[u8]| {
    let edges: Vec<ProminenceEdge> = data
        .chunks_exact(2)
        .map(|pair| ProminenceEdge {
            from: (pair[0] % 32).to_string(),
            to: (pair[1] % 32).to_string(),
            weight: f64::from(pair[1]),
        })
        .collect();

    if let Ok(tree) = build_hierarchy(&edges, |id| Some(id.to_string())) {
        assert_eq!(tree.flatten().len() + 1, tree.node_count());
    }
});
