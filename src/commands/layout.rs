// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Layout command - word list and spanning-tree segments

use super::{derive, print_json, Globals, ViewportArgs};
use crate::themes::ThemeColor;
use crate::types::{Orientation, ScalingMode};
use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

/// Arguments for the layout command
#[derive(Debug, Clone, clap::Args)]
pub struct LayoutArgs {
    /// Payload file (`-` for stdin)
    pub input: PathBuf,

    #[command(flatten)]
    pub viewport: ViewportArgs,

    /// Word orientation (messy, horizontal, vertical)
    #[arg(long)]
    pub orientation: Option<Orientation>,

    /// Scaling mode (adaptive, linear, sqrt)
    #[arg(long)]
    pub scaling: Option<ScalingMode>,

    /// Concept web mode: list spanning-tree segments too
    #[arg(long)]
    pub web: bool,

    /// Show at most this many words
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Run the layout command
pub fn run(args: &LayoutArgs, globals: &Globals) -> Result<()> {
    let mut params = globals.config.layout_params();
    args.viewport.apply(&mut params)?;
    if let Some(orientation) = args.orientation {
        params.orientation = orientation;
    }
    if let Some(scaling) = args.scaling {
        params.scaling = scaling;
    }
    params.web_mode |= args.web;

    let (_, views) = derive(&args.input, globals, &params)?;
    let limit = args.limit.unwrap_or(views.words.len());

    if globals.json {
        let words: Vec<_> = views.words.iter().take(limit).collect();
        return print_json(&json!({
            "viewport": views.viewport,
            "sizeDomain": views.size_domain,
            "scaling": views.scaling,
            "fit": views.fit,
            "words": words,
            "spanningTree": views.spanning_tree,
        }));
    }

    println!(
        "{} ({}x{}, exponent {:.2}, ceiling {})",
        globals.heading("Words"),
        params.viewport.width,
        params.viewport.height,
        views.scaling.exponent,
        views.fit.ceiling
    );
    for word in views.words.iter().take(limit) {
        let size = if params.web_mode { word.web_font_size } else { word.font_size };
        println!(
            "  {:<24} {:>8.1}px {:>5}° {:<10} ({:.1}, {:.1})",
            globals.value(&word.name),
            size,
            word.rotate,
            color_label(word.color),
            word.x,
            word.y
        );
    }
    if limit < views.words.len() {
        println!("  {}", globals.dim(&format!("... {} more", views.words.len() - limit)));
    }

    if params.web_mode {
        println!();
        println!("{}", globals.heading("Spanning tree"));
        for s in &views.spanning_tree.segments {
            println!(
                "  {} -- {}  ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                s.source_name, s.target_name, s.x1, s.y1, s.x2, s.y2
            );
        }
    }

    println!();
    println!(
        "{}",
        globals.dim(&format!(
            "{} segments, {} unresolved edges, {} components",
            views.spanning_tree.segments.len(),
            views.spanning_tree.dropped,
            views.mst_components
        ))
    );
    Ok(())
}

pub(crate) fn color_label(color: ThemeColor) -> String {
    match color {
        ThemeColor::Bucket(b) => format!("theme-{b}"),
        ThemeColor::Inactive => "inactive".to_string(),
    }
}
