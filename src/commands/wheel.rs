// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Wheel command - ranked relatedness links and theme arcs

use super::{derive, print_json, Globals, ViewportArgs};
use anyhow::Result;
use std::path::PathBuf;

/// Arguments for the wheel command
#[derive(Debug, Clone, clap::Args)]
pub struct WheelArgs {
    /// Payload file (`-` for stdin)
    pub input: PathBuf,

    #[command(flatten)]
    pub viewport: ViewportArgs,

    /// Number of strongest links to keep
    #[arg(short = 'n', long)]
    pub num_links: Option<usize>,
}

/// Run the wheel command
pub fn run(args: &WheelArgs, globals: &Globals) -> Result<()> {
    let mut params = globals.config.layout_params();
    args.viewport.apply(&mut params)?;
    if let Some(n) = args.num_links {
        params.num_links = n;
    }

    let (_, views) = derive(&args.input, globals, &params)?;
    let wheel = views.wheel;

    if globals.json {
        return print_json(&wheel);
    }

    println!(
        "{} (radius {:.1}, arcs {:.1}..{:.1})",
        globals.heading("Correlation wheel"),
        wheel.radius,
        wheel.arc_inner,
        wheel.arc_outer
    );
    println!(
        "  {} of {} links kept",
        wheel.links.links.len(),
        wheel.links.candidates
    );
    for link in &wheel.links.links {
        println!(
            "  {:<20} {:<20} {} strength {:.3} count {}",
            globals.value(&link.source_name),
            globals.value(&link.target_name),
            globals.dim(&format!("prominence {:.3}", link.prominence)),
            link.strength,
            link.count
        );
    }

    if !wheel.arcs.is_empty() {
        println!();
        println!("{}", globals.heading("Theme arcs"));
        for arc in &wheel.arcs {
            println!(
                "  {:<12} {:>7.1}° .. {:>7.1}°",
                arc.theme_id,
                arc.start_angle.to_degrees(),
                arc.end_angle.to_degrees()
            );
        }
    }
    Ok(())
}
