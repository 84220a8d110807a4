// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod export;
pub mod layout;
pub mod scale;
pub mod tree;
pub mod wheel;

use crate::config::Config;
use crate::ingest::{load_str, Dataset};
use crate::scaling::CharWidthEstimate;
use crate::views::{derive_views, DerivedViews, LayoutParams};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Flags shared by every command
#[derive(Debug, Clone)]
pub struct Globals {
    /// Effective configuration
    pub config: Config,
    /// Print JSON instead of text
    pub json: bool,
    /// Colour text output
    pub color: bool,
}

impl Globals {
    /// Section heading
    #[must_use]
    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// De-emphasised text
    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Highlighted value
    #[must_use]
    pub fn value(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Viewport overrides accepted by layout commands
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct ViewportArgs {
    /// Viewport width in pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// Viewport height in pixels
    #[arg(long)]
    pub height: Option<f64>,
}

impl ViewportArgs {
    /// Apply the overrides to layout parameters
    pub fn apply(&self, params: &mut LayoutParams) -> Result<()> {
        if let Some(width) = self.width {
            anyhow::ensure!(width > 0.0, "--width must be positive");
            params.viewport.width = width;
        }
        if let Some(height) = self.height {
            anyhow::ensure!(height > 0.0, "--height must be positive");
            params.viewport.height = height;
        }
        Ok(())
    }
}

/// Read a payload file, or stdin for `-`
pub fn read_payload(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read payload from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read payload {}", input.display()))
}

/// Load and validate a payload
pub fn load_dataset(input: &Path, config: &Config) -> Result<Dataset> {
    let text = read_payload(input)?;
    let dataset = load_str(&text, &config.ingest_options())
        .with_context(|| format!("Invalid payload {}", input.display()))?;
    info!("Loaded {} concepts from {}", dataset.len(), input.display());
    Ok(dataset)
}

/// Load a payload and derive every view with the given parameters
pub fn derive(input: &Path, globals: &Globals, params: &LayoutParams) -> Result<(Dataset, DerivedViews)> {
    let dataset = load_dataset(input, &globals.config)?;
    let views = derive_views(&dataset, params, &CharWidthEstimate::default())
        .context("Failed to derive views")?;
    Ok((dataset, views))
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
