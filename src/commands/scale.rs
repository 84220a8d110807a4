// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Scale command - adaptive font scaling decision

use super::{derive, print_json, Globals, ViewportArgs};
use crate::types::ScalingMode;
use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

/// Arguments for the scale command
#[derive(Debug, Clone, clap::Args)]
pub struct ScaleArgs {
    /// Payload file (`-` for stdin)
    pub input: PathBuf,

    #[command(flatten)]
    pub viewport: ViewportArgs,

    /// Scaling mode (adaptive, linear, sqrt)
    #[arg(long)]
    pub mode: Option<ScalingMode>,
}

/// Run the scale command
pub fn run(args: &ScaleArgs, globals: &Globals) -> Result<()> {
    let mut params = globals.config.layout_params();
    args.viewport.apply(&mut params)?;
    if let Some(mode) = args.mode {
        params.scaling = mode;
    }

    let (_, views) = derive(&args.input, globals, &params)?;

    if globals.json {
        return print_json(&json!({
            "mode": params.scaling,
            "stats": views.stats,
            "scaling": views.scaling,
            "sizeDomain": views.size_domain,
            "fontRange": [params.font_min, views.fit.ceiling],
            "fit": views.fit,
        }));
    }

    println!("{}", globals.heading("Font scaling"));
    println!("  Mode:         {}", params.scaling);
    println!("  Exponent:     {}", globals.value(&format!("{:.3}", views.scaling.exponent)));
    if let Some(stats) = views.stats {
        println!("  Weights:      {} .. {} (mean {:.2}, {} concepts)", stats.min, stats.max, stats.mean, stats.count);
        println!("  Spread:       {:.1}", stats.spread());
        println!("  Below mean:   {:.1}%", stats.below_mean_fraction() * 100.0);
        println!("  Range/total:  {:.3}", stats.range_fraction());
    } else {
        println!("  {}", globals.dim("No concepts"));
    }
    println!("  Font range:   {} .. {} px", params.font_min, views.fit.ceiling);
    if views.fit.floor_reached {
        println!("  {}", globals.dim("Ceiling stopped at the fit floor"));
    }
    Ok(())
}
