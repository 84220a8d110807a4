// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Payload ingestion - raw concept documents into typed datasets
//!
//! The analyser emits loosely typed JSON: ids are numbers or strings, and
//! numeric fields of relatedness entries arrive as text. Ingestion coerces
//! everything into the records of [`crate::types`] and owns them in a
//! [`Dataset`] for the lifetime of one load.

use crate::error::{DataError, DataResult, Error};
use crate::types::{Concept, MstEdge, Position, ProminenceEdge, RelatedLink, Theme};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

// =============================================================================
// Raw document
// =============================================================================

/// Number or text, as the analyser emits either for numeric fields
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// JSON number
    Number(f64),
    /// JSON string
    Text(String),
    /// Anything else (`null`, booleans, arrays, objects); never numeric
    Other(serde_json::Value),
}

impl Default for Scalar {
    fn default() -> Self {
        Self::Other(serde_json::Value::Null)
    }
}

impl Scalar {
    /// Render as an identifier; integral numbers lose their fraction
    #[must_use]
    pub fn as_id(&self) -> String {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
            Self::Other(v) => v.to_string(),
        }
    }

    /// Finite numeric value, parsing text when needed
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Weight value; textual weights are truncated to integers
    #[must_use]
    pub fn as_weight(&self) -> Option<f64> {
        match self {
            Self::Number(_) => self.as_f64(),
            Self::Text(_) => self.as_f64().map(f64::trunc),
            Self::Other(_) => None,
        }
    }

    /// Non-negative integral count
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_count(&self) -> Option<u64> {
        self.as_f64().filter(|n| *n >= 0.0).map(|n| n.trunc() as u64)
    }
}

/// Raw outgoing spanning-tree edge
#[derive(Debug, Clone, Deserialize)]
pub struct RawMstEdge {
    /// Target concept ID
    pub to: Scalar,
}

/// Raw relatedness entry
#[derive(Debug, Clone, Deserialize)]
pub struct RawRelated {
    /// Related concept ID
    #[serde(default)]
    pub id: Option<Scalar>,
    /// Strength (`str` in analyser output)
    #[serde(default, alias = "str")]
    pub strength: Option<Scalar>,
    /// Count (`ct` in analyser output)
    #[serde(default, alias = "ct")]
    pub count: Option<Scalar>,
    /// Prominence (`pr` in analyser output)
    #[serde(default, alias = "pr")]
    pub prom: Option<Scalar>,
}

/// Raw concept record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConcept {
    /// ID; falls back to the collection key
    #[serde(default)]
    pub id: Option<Scalar>,
    /// Display name
    pub value: String,
    /// Weight
    #[serde(default)]
    pub weight: Scalar,
    /// Theme membership
    #[serde(default)]
    pub theme_id: Option<Scalar>,
    /// Normalised horizontal position
    #[serde(default)]
    pub x: Scalar,
    /// Normalised vertical position
    #[serde(default)]
    pub y: Scalar,
    /// Outgoing spanning-tree edges
    #[serde(default)]
    pub mst_edges: Vec<RawMstEdge>,
    /// Relatedness list
    #[serde(default)]
    pub related: Vec<RawRelated>,
    /// Raw occurrence count
    #[serde(default)]
    pub frequency: Option<Scalar>,
    /// Concept kind
    #[serde(default)]
    pub kind: Option<String>,
}

/// Raw theme record
#[derive(Debug, Clone, Deserialize)]
pub struct RawTheme {
    /// ID; falls back to the collection key
    #[serde(default)]
    pub id: Option<Scalar>,
    /// Theme label
    #[serde(default)]
    pub name: Option<String>,
    /// Suggested hue
    #[serde(default)]
    pub hue: Option<Scalar>,
    /// Connectivity score (`connectiv` in analyser output)
    #[serde(default, alias = "connectiv")]
    pub connectivity: Option<Scalar>,
}

/// Raw inverse-prominence edge
#[derive(Debug, Clone, Deserialize)]
pub struct RawProminenceEdge {
    /// Parent concept ID
    pub from: Scalar,
    /// Child concept ID
    pub to: Scalar,
    /// Edge weight (`w` in analyser output)
    #[serde(alias = "w")]
    pub weight: Scalar,
}

/// The marker collections produced by one analysis run
#[derive(Debug, Clone, Deserialize)]
pub struct RawMarkers {
    /// Concepts keyed by ID
    pub concepts: BTreeMap<String, RawConcept>,
    /// Themes keyed by ID
    #[serde(default)]
    pub themes: BTreeMap<String, RawTheme>,
    /// Inverse-prominence edges
    #[serde(default)]
    pub iprom: Vec<RawProminenceEdge>,
    /// Number of text blocks analysed
    #[serde(default, rename = "numBlocks")]
    pub num_blocks: Option<Scalar>,
}

/// Status document returned while an analysis is running or finished
#[derive(Debug, Clone, Deserialize)]
pub struct StatusEnvelope {
    /// Progress message
    #[serde(default)]
    pub message: Option<String>,
    /// Whether the analysis finished
    #[serde(default)]
    pub completed: bool,
    /// Progress percentage
    #[serde(default)]
    pub progress: Option<f64>,
    /// Markers, present once the analysis finished
    #[serde(default)]
    pub markers: Option<RawMarkers>,
}

// =============================================================================
// Options
// =============================================================================

/// What to do with a concept whose theme is not in the theme collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownThemePolicy {
    /// Keep the concept without a theme and log a warning
    #[default]
    Themeless,
    /// Fail the load with [`DataError::UnknownTheme`]
    Reject,
}

/// Ingestion options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Unknown theme handling
    pub unknown_theme: UnknownThemePolicy,
}

// =============================================================================
// Dataset
// =============================================================================

/// Canonical records of one loaded dataset
///
/// Concepts are kept in natural order: integral ids ascending, then the rest
/// lexically. Derived views are recomputed from a dataset, never stored in it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    concepts: Vec<Concept>,
    themes: Vec<Theme>,
    prominence: Vec<ProminenceEdge>,
    num_blocks: Option<u64>,
    by_id: HashMap<String, usize>,
}

impl Dataset {
    /// Assemble a dataset, keeping the given concept order
    pub fn from_parts(
        concepts: Vec<Concept>,
        themes: Vec<Theme>,
        prominence: Vec<ProminenceEdge>,
    ) -> DataResult<Self> {
        let mut by_id = HashMap::with_capacity(concepts.len());
        let mut names = HashSet::with_capacity(concepts.len());

        for (idx, concept) in concepts.iter().enumerate() {
            if by_id.insert(concept.id.clone(), idx).is_some() {
                return Err(DataError::DuplicateConcept(concept.id.clone()));
            }
            if !names.insert(concept.name.as_str()) {
                warn!("Duplicate concept name {:?} (id {})", concept.name, concept.id);
            }
        }

        Ok(Self {
            concepts,
            themes,
            prominence,
            num_blocks: None,
            by_id,
        })
    }

    /// Attach the analysed block count
    #[must_use]
    pub fn with_num_blocks(mut self, num_blocks: Option<u64>) -> Self {
        self.num_blocks = num_blocks;
        self
    }

    /// All concepts in natural order
    #[must_use]
    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    /// All themes
    #[must_use]
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Inverse-prominence edges
    #[must_use]
    pub fn prominence(&self) -> &[ProminenceEdge] {
        &self.prominence
    }

    /// Number of text blocks analysed
    #[must_use]
    pub fn num_blocks(&self) -> Option<u64> {
        self.num_blocks
    }

    /// Position of a concept in [`Dataset::concepts`]
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Get a concept by ID
    #[must_use]
    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.index_of(id).map(|idx| &self.concepts[idx])
    }

    /// Display name for a concept ID
    #[must_use]
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.concept(id).map(|c| c.name.as_str())
    }

    /// Concept weights in natural order
    #[must_use]
    pub fn weights(&self) -> Vec<f64> {
        self.concepts.iter().map(|c| c.weight).collect()
    }

    /// Number of concepts
    #[must_use]
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Check if the dataset has no concepts
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

/// Outcome of reading a status document
#[derive(Debug, Clone)]
pub enum LoadStatus {
    /// Markers were present and ingested
    Ready(Dataset),
    /// Analysis still running
    Pending {
        /// Progress message
        message: Option<String>,
        /// Progress percentage
        progress: Option<f64>,
    },
}

// =============================================================================
// Ingestion
// =============================================================================

/// Sort key giving the analyser's natural id order
fn natural_key(id: &str) -> (u8, u64, &str) {
    match id.parse::<u64>() {
        Ok(n) => (0, n, ""),
        Err(_) => (1, 0, id),
    }
}

/// Parse a payload document; accepts a status envelope or bare markers
pub fn load_str(json: &str, options: &IngestOptions) -> Result<Dataset, Error> {
    let mut value: serde_json::Value = serde_json::from_str(json)?;
    let markers = if value.get("markers").is_some() {
        value["markers"].take()
    } else {
        value
    };
    let raw: RawMarkers = serde_json::from_value(markers)?;
    Ok(ingest(raw, options)?)
}

/// Classify a status document as finished or still running
pub fn parse_status(json: &str, options: &IngestOptions) -> Result<LoadStatus, Error> {
    let envelope: StatusEnvelope = serde_json::from_str(json)?;
    match envelope.markers {
        Some(raw) => Ok(LoadStatus::Ready(ingest(raw, options)?)),
        None => Ok(LoadStatus::Pending {
            message: envelope.message,
            progress: envelope.progress,
        }),
    }
}

/// Convert raw markers into a dataset
pub fn ingest(raw: RawMarkers, options: &IngestOptions) -> DataResult<Dataset> {
    let themes = ingest_themes(&raw.themes)?;
    let theme_ids: HashSet<&str> = themes.iter().map(|t| t.id.as_str()).collect();

    let mut concepts = Vec::with_capacity(raw.concepts.len());
    for (key, rc) in &raw.concepts {
        concepts.push(ingest_concept(key, rc, &theme_ids, options)?);
    }
    concepts.sort_by(|a, b| natural_key(&a.id).cmp(&natural_key(&b.id)));

    let prominence = raw
        .iprom
        .iter()
        .map(|edge| {
            let to = edge.to.as_id();
            let weight = edge.weight.as_f64().ok_or_else(|| DataError::InvalidWeight(to.clone()))?;
            Ok(ProminenceEdge {
                from: edge.from.as_id(),
                to,
                weight,
            })
        })
        .collect::<DataResult<Vec<_>>>()?;

    let num_blocks = raw.num_blocks.as_ref().and_then(Scalar::as_count);

    info!(
        "Loaded {} concepts, {} themes, {} prominence edges",
        concepts.len(),
        themes.len(),
        prominence.len()
    );

    Ok(Dataset::from_parts(concepts, themes, prominence)?.with_num_blocks(num_blocks))
}

fn ingest_themes(raw: &BTreeMap<String, RawTheme>) -> DataResult<Vec<Theme>> {
    let mut themes = raw
        .iter()
        .map(|(key, rt)| {
            let id = rt.id.as_ref().map_or_else(|| key.clone(), Scalar::as_id);
            let connectivity = match &rt.connectivity {
                Some(c) => c.as_f64().ok_or_else(|| DataError::InvalidConnectivity(id.clone()))?,
                None => 0.0,
            };
            Ok(Theme {
                name: rt.name.clone(),
                hue: rt.hue.as_ref().and_then(Scalar::as_f64),
                connectivity,
                id,
            })
        })
        .collect::<DataResult<Vec<_>>>()?;
    themes.sort_by(|a, b| natural_key(&a.id).cmp(&natural_key(&b.id)));
    Ok(themes)
}

fn ingest_concept(
    key: &str,
    rc: &RawConcept,
    theme_ids: &HashSet<&str>,
    options: &IngestOptions,
) -> DataResult<Concept> {
    let id = rc.id.as_ref().map_or_else(|| key.to_string(), Scalar::as_id);

    let weight = rc
        .weight
        .as_weight()
        .filter(|w| *w >= 0.0)
        .ok_or_else(|| DataError::InvalidWeight(id.clone()))?;

    let u = rc.x.as_f64().ok_or_else(|| DataError::InvalidPosition(id.clone()))?;
    let v = rc.y.as_f64().ok_or_else(|| DataError::InvalidPosition(id.clone()))?;
    if u.abs() > 1.0 || v.abs() > 1.0 {
        warn!("Concept {} position ({}, {}) lies outside the unit square", id, u, v);
    }

    let theme_id = match rc.theme_id.as_ref().map(Scalar::as_id).filter(|t| !t.is_empty()) {
        Some(theme) if theme_ids.contains(theme.as_str()) => Some(theme),
        Some(theme) => match options.unknown_theme {
            UnknownThemePolicy::Themeless => {
                warn!("Concept {} references unknown theme {}; treating as themeless", id, theme);
                None
            }
            UnknownThemePolicy::Reject => {
                return Err(DataError::UnknownTheme { concept: id, theme });
            }
        },
        None => None,
    };

    let mst_edges = rc
        .mst_edges
        .iter()
        .map(|e| MstEdge { to: e.to.as_id() })
        .collect();

    let mut skipped = 0usize;
    let related = rc
        .related
        .iter()
        .filter_map(|r| {
            let link = related_link(r);
            if link.is_none() {
                skipped += 1;
            }
            link
        })
        .collect();
    if skipped > 0 {
        debug!("Concept {}: skipped {} unreadable related entries", id, skipped);
    }

    Ok(Concept {
        id,
        name: rc.value.clone(),
        weight,
        theme_id,
        position: Position { u, v },
        mst_edges,
        related,
        frequency: rc.frequency.as_ref().and_then(Scalar::as_count),
        kind: rc.kind.clone(),
    })
}

fn related_link(raw: &RawRelated) -> Option<RelatedLink> {
    Some(RelatedLink {
        target_id: raw.id.as_ref()?.as_id(),
        prominence: raw.prom.as_ref()?.as_f64()?,
        strength: raw.strength.as_ref().and_then(Scalar::as_f64).unwrap_or(0.0),
        count: raw.count.as_ref().and_then(Scalar::as_count).unwrap_or(0),
    })
}
