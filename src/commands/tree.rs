// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Tree command - inverse-prominence hierarchy

use super::{derive, print_json, Globals};
use crate::hierarchy::ProminenceNode;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Arguments for the tree command
#[derive(Debug, Clone, clap::Args)]
pub struct TreeArgs {
    /// Payload file (`-` for stdin)
    pub input: PathBuf,

    /// Stop printing below this depth
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Run the tree command
pub fn run(args: &TreeArgs, globals: &Globals) -> Result<()> {
    let params = globals.config.layout_params();
    let (_, views) = derive(&args.input, globals, &params)?;

    let Some(tree) = views.hierarchy else {
        bail!("Payload has no prominence edges");
    };

    if globals.json {
        return print_json(&tree);
    }

    println!(
        "{} ({} nodes, depth {})",
        globals.heading("Prominence tree"),
        tree.node_count(),
        tree.depth()
    );
    let mut lines = Vec::new();
    render(&tree, args.max_depth.unwrap_or(usize::MAX), &mut lines);
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn render(root: &ProminenceNode, max_depth: usize, out: &mut Vec<String>) {
    let mut stack = vec![(root, 0)];
    while let Some((node, depth)) = stack.pop() {
        if depth >= max_depth {
            continue;
        }
        let weight = node.weight.map(|w| format!(" ({w:.3})")).unwrap_or_default();
        out.push(format!("{}{}{}", "  ".repeat(depth + 1), node.name, weight));
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
}
