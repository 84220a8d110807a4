// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Concept Atlas library - layout core for text-analytics concept maps
//!
//! This crate turns a raw concept payload (concepts, themes, spanning-tree
//! edges, relatedness lists and an inverse-prominence edge list) into the
//! structures a renderer draws: cluster coordinates, spanning-tree segments,
//! a single-rooted prominence tree, ranked relatedness links with theme arcs,
//! and a font scaling decision.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod commands;
pub mod config;
pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod ingest;
pub mod layout;
pub mod mst;
pub mod scaling;
pub mod themes;
pub mod views;
pub mod wheel;

/// Core data types shared by every transform
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    // =========================================================================
    // Concepts
    // =========================================================================

    /// Normalised cluster position; each axis is nominally in [-1, 1]
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Position {
        /// Horizontal component
        pub u: f64,
        /// Vertical component
        pub v: f64,
    }

    /// Outgoing minimum-spanning-tree edge of a concept
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MstEdge {
        /// Target concept ID
        pub to: String,
    }

    /// One entry of a concept's `related` list
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RelatedLink {
        /// Related concept ID
        pub target_id: String,
        /// Co-occurrence strength
        pub strength: f64,
        /// Co-occurrence count
        pub count: u64,
        /// Prominence of the pairing, used for ranking
        pub prominence: f64,
    }

    /// A concept extracted from the analysed text
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Concept {
        /// Unique identifier
        pub id: String,
        /// Display name (expected to be unique within a dataset)
        pub name: String,
        /// Relative weight, never negative
        pub weight: f64,
        /// Theme membership, if any
        pub theme_id: Option<String>,
        /// Normalised cluster position
        pub position: Position,
        /// Outgoing spanning-tree edges
        #[serde(default)]
        pub mst_edges: Vec<MstEdge>,
        /// Relatedness list for the correlation wheel
        #[serde(default)]
        pub related: Vec<RelatedLink>,
        /// Raw occurrence count
        pub frequency: Option<u64>,
        /// Concept kind reported by the analyser (word, name, ...)
        pub kind: Option<String>,
    }

    impl Concept {
        /// Create a concept with no edges or optional metadata
        #[must_use]
        pub fn new(id: impl Into<String>, name: impl Into<String>, weight: f64, position: Position) -> Self {
            Self {
                id: id.into(),
                name: name.into(),
                weight,
                theme_id: None,
                position,
                mst_edges: Vec::new(),
                related: Vec::new(),
                frequency: None,
                kind: None,
            }
        }
    }

    // =========================================================================
    // Themes and prominence
    // =========================================================================

    /// A theme groups closely related concepts
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Theme {
        /// Unique identifier
        pub id: String,
        /// Theme label
        pub name: Option<String>,
        /// Hue suggested by the analyser
        pub hue: Option<f64>,
        /// Connectivity score, used for ordering and colour buckets
        pub connectivity: f64,
    }

    /// Raw parent/child edge of the inverse-prominence forest
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ProminenceEdge {
        /// Parent concept ID
        pub from: String,
        /// Child concept ID
        pub to: String,
        /// Edge weight, attached to the child node
        pub weight: f64,
    }

    // =========================================================================
    // Geometry and presentation inputs
    // =========================================================================

    /// Point in centred viewport space (origin in the middle)
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
    pub struct Point {
        /// X coordinate
        pub x: f64,
        /// Y coordinate
        pub y: f64,
    }

    /// Drawing surface dimensions in pixels
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Viewport {
        /// Width in pixels
        pub width: f64,
        /// Height in pixels
        pub height: f64,
    }

    impl Default for Viewport {
        fn default() -> Self {
            Self {
                width: 900.0,
                height: 500.0,
            }
        }
    }

    /// Font used when measuring and drawing a word
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct FontSpec {
        /// Font family
        pub family: String,
        /// Size in pixels
        pub size_px: f64,
        /// Bold weight
        pub bold: bool,
        /// Italic style
        pub italic: bool,
    }

    impl FontSpec {
        /// Same font at a different pixel size
        #[must_use]
        pub fn at_size(&self, size_px: f64) -> Self {
            Self {
                size_px,
                ..self.clone()
            }
        }
    }

    impl Default for FontSpec {
        fn default() -> Self {
            Self {
                family: "Trebuchet MS".into(),
                size_px: 16.0,
                bold: false,
                italic: false,
            }
        }
    }

    /// Word orientation scheme for the cloud
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Orientation {
        /// A few tilted angles
        Messy,
        /// Everything upright
        #[default]
        Horizontal,
        /// Everything rotated a quarter turn
        Vertical,
    }

    impl Orientation {
        /// Rotation parameters `[choices, step, offset]`
        #[must_use]
        pub fn params(self) -> [f64; 3] {
            match self {
                Self::Messy => [5.0, 30.0, 60.0],
                Self::Horizontal => [0.0, 0.0, 0.0],
                Self::Vertical => [0.0, 0.0, 90.0],
            }
        }

        /// Rotation in degrees for a sample drawn from [0, 1)
        #[must_use]
        pub fn rotation(self, sample: f64) -> f64 {
            let [choices, step, offset] = self.params();
            (sample.clamp(0.0, 1.0) * choices).floor().min((choices - 1.0).max(0.0)) * step - offset
        }

        /// Whether words run along the viewport width
        #[must_use]
        pub fn is_horizontal(self) -> bool {
            matches!(self, Self::Horizontal)
        }
    }

    impl FromStr for Orientation {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_lowercase().as_str() {
                "messy" => Ok(Self::Messy),
                "horizontal" | "h" => Ok(Self::Horizontal),
                "vertical" | "v" => Ok(Self::Vertical),
                other => Err(format!("Unknown orientation: {other}. Valid: messy, horizontal, vertical")),
            }
        }
    }

    impl fmt::Display for Orientation {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                Self::Messy => "messy",
                Self::Horizontal => "horizontal",
                Self::Vertical => "vertical",
            })
        }
    }

    /// How weights map onto font sizes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ScalingMode {
        /// Exponent chosen from the weight distribution
        #[default]
        Adaptive,
        /// Exponent 1
        Linear,
        /// Exponent 0.5
        Sqrt,
    }

    impl FromStr for ScalingMode {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_lowercase().as_str() {
                "adaptive" | "auto" => Ok(Self::Adaptive),
                "linear" => Ok(Self::Linear),
                "sqrt" => Ok(Self::Sqrt),
                other => Err(format!("Unknown scaling mode: {other}. Valid: adaptive, linear, sqrt")),
            }
        }
    }

    impl fmt::Display for ScalingMode {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                Self::Adaptive => "adaptive",
                Self::Linear => "linear",
                Self::Sqrt => "sqrt",
            })
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{DataError, Error};
    pub use crate::ingest::Dataset;
    pub use crate::types::*;
    pub use crate::views::{derive_views, DerivedViews, LayoutParams};
}
