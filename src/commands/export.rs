// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - writes the concept graph or all derived views

use super::{derive, Globals, ViewportArgs};
use crate::graph::ConceptGraph;
use crate::layout::ClusterLayout;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Graphviz DOT of concepts and spanning-tree edges
    Dot,
    /// Every derived view as JSON
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Ok(Self::Dot),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown export format: {other}. Supported: dot, json")),
        }
    }
}

impl ExportFormat {
    /// Get file extension for format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Json => "json",
        }
    }
}

/// Arguments for the export command
#[derive(Debug, Clone, clap::Args)]
pub struct ExportArgs {
    /// Payload file (`-` for stdin)
    pub input: PathBuf,

    #[command(flatten)]
    pub viewport: ViewportArgs,

    /// Output format (dot, json)
    #[arg(short, long, default_value = "dot")]
    pub format: ExportFormat,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the export command
pub fn run(args: &ExportArgs, globals: &Globals) -> Result<()> {
    info!("Exporting to {}", args.format.extension());

    let mut params = globals.config.layout_params();
    args.viewport.apply(&mut params)?;
    let (dataset, views) = derive(&args.input, globals, &params)?;

    let content = match args.format {
        ExportFormat::Dot => {
            let layout = ClusterLayout::compute(&dataset, params.viewport)?;
            ConceptGraph::from_dataset(&dataset).to_dot(&dataset, Some(&layout))
        }
        ExportFormat::Json => serde_json::to_string_pretty(&views)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            if !globals.json {
                println!("Exported to {}", path.display());
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("DOT".parse::<ExportFormat>(), Ok(ExportFormat::Dot));
        assert_eq!("graphviz".parse::<ExportFormat>(), Ok(ExportFormat::Dot));
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert!("yaml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.extension(), "json");
    }
}
