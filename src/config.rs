// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. a TOML file (`--config`, or `config.toml` in the project config dir)
//! 3. `CONCEPT_ATLAS__SECTION__KEY` environment variables

use crate::ingest::{IngestOptions, UnknownThemePolicy};
use crate::scaling::FitParams;
use crate::types::{FontSpec, Orientation, ScalingMode, Viewport};
use crate::views::LayoutParams;
use crate::wheel::{WheelGeometry, DEFAULT_NUM_LINKS};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CONCEPT_ATLAS";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Cloud and web layout
    pub layout: LayoutSection,
    /// Correlation wheel
    pub wheel: WheelSection,
    /// Theme colouring
    pub themes: ThemeSection,
}

/// `[layout]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSection {
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
    /// Font family
    pub font_family: String,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Word orientation
    pub orientation: Orientation,
    /// Weight to size mapping
    pub scaling: ScalingMode,
    /// Smallest font size
    pub font_min: f64,
    /// Largest font size
    pub font_max: f64,
    /// Lowest ceiling the fitting pass may reach
    pub fit_floor: f64,
    /// Ceiling decrement per fitting attempt
    pub fit_step: f64,
    /// Share of the viewport a word may occupy
    pub fit_ratio: f64,
    /// Concept web mode
    pub web_mode: bool,
}

impl Default for LayoutSection {
    fn default() -> Self {
        let viewport = Viewport::default();
        let font = FontSpec::default();
        let fit = FitParams::default();
        Self {
            width: viewport.width,
            height: viewport.height,
            font_family: font.family,
            bold: font.bold,
            italic: font.italic,
            orientation: Orientation::default(),
            scaling: ScalingMode::default(),
            font_min: 8.0,
            font_max: 160.0,
            fit_floor: fit.floor,
            fit_step: fit.step,
            fit_ratio: fit.ratio,
            web_mode: false,
        }
    }
}

/// `[wheel]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSection {
    /// Number of strongest links to draw
    pub num_links: usize,
    /// Theme arc thickness
    pub arc_width: f64,
    /// Gap between arcs and labels
    pub arc_padding: f64,
    /// Space reserved for labels outside the circle
    pub label_margin: f64,
}

impl Default for WheelSection {
    fn default() -> Self {
        let geometry = WheelGeometry::default();
        Self {
            num_links: DEFAULT_NUM_LINKS,
            arc_width: geometry.arc_width,
            arc_padding: geometry.arc_padding,
            label_margin: geometry.label_margin,
        }
    }
}

/// `[themes]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSection {
    /// Number of distinct theme colours
    pub palette_size: usize,
    /// What to do with concepts naming an unknown theme
    pub unknown: UnknownThemePolicy,
}

impl Default for ThemeSection {
    fn default() -> Self {
        Self {
            palette_size: 10,
            unknown: UnknownThemePolicy::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            layout: LayoutSection::default(),
            wheel: WheelSection::default(),
            themes: ThemeSection::default(),
        }
    }
}

impl Config {
    /// Parameters for view derivation
    #[must_use]
    pub fn layout_params(&self) -> LayoutParams {
        let l = &self.layout;
        LayoutParams {
            viewport: Viewport {
                width: l.width,
                height: l.height,
            },
            font: FontSpec {
                family: l.font_family.clone(),
                bold: l.bold,
                italic: l.italic,
                ..FontSpec::default()
            },
            orientation: l.orientation,
            scaling: l.scaling,
            font_min: l.font_min,
            font_max: l.font_max,
            fit: FitParams {
                floor: l.fit_floor,
                step: l.fit_step,
                ratio: l.fit_ratio,
            },
            web_mode: l.web_mode,
            num_links: self.wheel.num_links,
            palette_size: self.themes.palette_size,
            wheel: WheelGeometry {
                arc_width: self.wheel.arc_width,
                arc_padding: self.wheel.arc_padding,
                label_margin: self.wheel.label_margin,
            },
        }
    }

    /// Options for payload ingestion
    #[must_use]
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            unknown_theme: self.themes.unknown,
        }
    }

    /// Reject values no layout can work with
    pub fn validate(&self) -> Result<()> {
        let l = &self.layout;
        if !(l.width > 0.0 && l.height > 0.0) {
            bail!("layout.width and layout.height must be positive");
        }
        if !(l.font_min > 0.0 && l.font_min <= l.font_max) {
            bail!("layout.font_min must be positive and not above layout.font_max");
        }
        if !(l.fit_ratio > 0.0 && l.fit_ratio <= 1.0) {
            bail!("layout.fit_ratio must be in (0, 1]");
        }
        if self.themes.palette_size == 0 {
            bail!("themes.palette_size must be greater than 0");
        }
        Ok(())
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Default configuration file location
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "hyperpolymath", "concept-atlas")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration from defaults, file and environment
///
/// An explicit `path` must exist; the default location is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let mut builder = ::config::Config::builder();

    match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            debug!("Loading config from {}", p.display());
            builder = builder.add_source(::config::File::from(p).format(::config::FileFormat::Toml));
        }
        None => {
            if let Some(p) = default_path() {
                builder = builder.add_source(
                    ::config::File::from(p)
                        .format(::config::FileFormat::Toml)
                        .required(false),
                );
            }
        }
    }

    builder = builder.add_source(
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config: Config = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;
    config.validate()?;
    Ok(config)
}
