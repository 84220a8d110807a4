// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Correlation wheel - ranked relatedness links around a radial cluster
//!
//! Concepts sit on a circle, grouped by theme. The strongest relatedness
//! pairs are drawn as bundled splines across the circle and every theme gets
//! an arc spanning its members. Angles are in degrees unless a field says
//! otherwise.

use crate::ingest::Dataset;
use crate::types::Viewport;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Default link budget
pub const DEFAULT_NUM_LINKS: usize = 200;

/// Relatedness link between two concepts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedEdge {
    /// Source concept ID
    pub source_id: String,
    /// Target concept ID
    pub target_id: String,
    /// Source display name
    pub source_name: String,
    /// Target display name
    pub target_name: String,
    /// Ranking key
    pub prominence: f64,
    /// Co-occurrence strength
    pub strength: f64,
    /// Co-occurrence count
    pub count: u64,
}

/// Ranked links and resolution counters
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankedLinks {
    /// Links, highest prominence first, at most the link budget
    pub links: Vec<RelatedEdge>,
    /// Candidate links before truncation
    pub candidates: usize,
    /// Related entries whose target is not a known concept
    pub dropped: usize,
}

/// Sort by prominence, highest first, and keep `num_links`
///
/// The sort is stable: equal prominence keeps insertion order.
#[must_use]
pub fn rank_edges(mut edges: Vec<RelatedEdge>, num_links: usize) -> Vec<RelatedEdge> {
    edges.sort_by(|a, b| b.prominence.total_cmp(&a.prominence));
    edges.truncate(num_links);
    edges
}

/// Collect every resolvable relatedness entry and rank it
#[must_use]
pub fn rank_related(dataset: &Dataset, num_links: usize) -> RankedLinks {
    let mut candidates = Vec::new();
    let mut dropped = 0;

    for concept in dataset.concepts() {
        for rel in &concept.related {
            match dataset.concept(&rel.target_id) {
                Some(target) => candidates.push(RelatedEdge {
                    source_id: concept.id.clone(),
                    target_id: target.id.clone(),
                    source_name: concept.name.clone(),
                    target_name: target.name.clone(),
                    prominence: rel.prominence,
                    strength: rel.strength,
                    count: rel.count,
                }),
                None => dropped += 1,
            }
        }
    }

    if dropped > 0 {
        debug!("Dropped {} related entries with unknown targets", dropped);
    }

    let total = candidates.len();
    RankedLinks {
        links: rank_edges(candidates, num_links),
        candidates: total,
        dropped,
    }
}

// =============================================================================
// Radial placement
// =============================================================================

/// Polar coordinate: angle in degrees, radius in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarPoint {
    /// Angle in degrees, clockwise from the top
    pub angle: f64,
    /// Distance from the centre
    pub radius: f64,
}

/// Where a concept sits on the wheel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Concept ID
    pub concept_id: String,
    /// Theme of the concept
    pub theme_id: Option<String>,
    /// Polar position
    pub point: PolarPoint,
}

/// Wheel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelGeometry {
    /// Width of the theme arcs
    pub arc_width: f64,
    /// Gap between arcs, labels and links
    pub arc_padding: f64,
    /// Space reserved outside the leaf circle for labels
    pub label_margin: f64,
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self {
            arc_width: 20.0,
            arc_padding: 4.0,
            label_margin: 120.0,
        }
    }
}

impl WheelGeometry {
    /// Radius of the leaf circle
    #[must_use]
    pub fn radius(&self, viewport: Viewport) -> f64 {
        (viewport.height / 2.0 - self.label_margin).max(0.0)
    }

    /// Inner radius of the theme arcs
    #[must_use]
    pub fn arc_inner(&self, viewport: Viewport) -> f64 {
        self.radius(viewport) - self.arc_width - self.arc_padding
    }

    /// Outer radius of the theme arcs
    #[must_use]
    pub fn arc_outer(&self, viewport: Viewport) -> f64 {
        self.arc_inner(viewport) + self.arc_width
    }

    /// Radius at which links attach for a leaf at `radius`
    #[must_use]
    pub fn link_radius(&self, radius: f64) -> f64 {
        radius - (self.arc_width + self.arc_padding * 2.0)
    }
}

fn theme_key(theme: Option<&str>) -> (u8, u64, &str) {
    match theme {
        Some(t) => match t.parse::<u64>() {
            Ok(n) => (0, n, ""),
            Err(_) => (1, 0, t),
        },
        None => (2, 0, ""),
    }
}

/// Concept indices in wheel order: by theme, heaviest first within a theme
#[must_use]
pub fn cluster_order(dataset: &Dataset) -> Vec<usize> {
    let concepts = dataset.concepts();
    let mut order: Vec<usize> = (0..concepts.len()).collect();
    order.sort_by(|&a, &b| {
        let (ca, cb) = (&concepts[a], &concepts[b]);
        theme_key(ca.theme_id.as_deref())
            .cmp(&theme_key(cb.theme_id.as_deref()))
            .then_with(|| cb.weight.partial_cmp(&ca.weight).unwrap_or(Ordering::Equal))
    });
    order
}

/// Spread concepts evenly around the circle in wheel order
#[must_use]
pub fn default_placements(dataset: &Dataset, viewport: Viewport, geometry: &WheelGeometry) -> Vec<Placement> {
    let order = cluster_order(dataset);
    let n = order.len().max(1) as f64;
    let radius = geometry.radius(viewport);

    order
        .into_iter()
        .enumerate()
        .map(|(slot, idx)| {
            let concept = &dataset.concepts()[idx];
            Placement {
                concept_id: concept.id.clone(),
                theme_id: concept.theme_id.clone(),
                point: PolarPoint {
                    angle: (slot as f64 + 0.5) * 360.0 / n,
                    radius,
                },
            }
        })
        .collect()
}

// =============================================================================
// Arcs and splines
// =============================================================================

/// Angular extent of one theme, in radians for arc generators
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeArc {
    /// Theme ID
    pub theme_id: String,
    /// Start angle in radians
    pub start_angle: f64,
    /// End angle in radians
    pub end_angle: f64,
}

/// One arc per theme covering its members, widened by a degree each side
///
/// Themeless concepts get no arc. Arcs follow first appearance of their theme.
#[must_use]
pub fn theme_arcs(placements: &[Placement]) -> Vec<ThemeArc> {
    let mut order: Vec<&str> = Vec::new();
    let mut bounds: HashMap<&str, (f64, f64)> = HashMap::new();

    for placement in placements {
        let Some(theme) = placement.theme_id.as_deref() else {
            continue;
        };
        let angle = placement.point.angle;
        bounds
            .entry(theme)
            .and_modify(|(lo, hi)| {
                *lo = lo.min(angle);
                *hi = hi.max(angle);
            })
            .or_insert_with(|| {
                order.push(theme);
                (angle, angle)
            });
    }

    order
        .into_iter()
        .filter_map(|theme| {
            let (lo, hi) = bounds.get(theme)?;
            Some(ThemeArc {
                theme_id: theme.to_string(),
                start_angle: (lo - 1.0).to_radians(),
                end_angle: (hi + 1.0).to_radians(),
            })
        })
        .collect()
}

/// Control point bending a link towards the centre
///
/// Links between near neighbours stay close to the rim; links across the
/// wheel pass near the middle.
#[must_use]
pub fn spline_midpoint(source: PolarPoint, target: PolarPoint) -> PolarPoint {
    let gap = (target.angle - source.angle).abs();
    let bend = ((0.5 * gap).to_radians().sin() * 100.0).round() / 100.0;
    let mid = (source.angle + target.angle) / 2.0;
    PolarPoint {
        angle: if gap > 180.0 { mid + 180.0 } else { mid },
        radius: (1.0 - bend) * source.radius,
    }
}

/// Three-point path for a ranked link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSpline {
    /// Start of the link
    pub source: PolarPoint,
    /// Control point
    pub mid: PolarPoint,
    /// End of the link
    pub target: PolarPoint,
}

/// Splines for every link whose endpoints are placed
///
/// Endpoints are pulled inside the theme arcs to the geometry's link radius.
#[must_use]
pub fn link_splines(links: &[RelatedEdge], placements: &[Placement], geometry: &WheelGeometry) -> Vec<LinkSpline> {
    let by_id: HashMap<&str, PolarPoint> = placements
        .iter()
        .map(|p| {
            let point = PolarPoint {
                angle: p.point.angle,
                radius: geometry.link_radius(p.point.radius).max(0.0),
            };
            (p.concept_id.as_str(), point)
        })
        .collect();

    links
        .iter()
        .filter_map(|link| {
            let source = *by_id.get(link.source_id.as_str())?;
            let target = *by_id.get(link.target_id.as_str())?;
            Some(LinkSpline {
                source,
                mid: spline_midpoint(source, target),
                target,
            })
        })
        .collect()
}

/// Everything the correlation wheel draws
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelView {
    /// Ranked links
    pub links: RankedLinks,
    /// Concept placements in wheel order
    pub placements: Vec<Placement>,
    /// Theme arcs
    pub arcs: Vec<ThemeArc>,
    /// Link paths, aligned with resolvable links
    pub splines: Vec<LinkSpline>,
    /// Leaf circle radius
    pub radius: f64,
    /// Radius at which links attach
    pub link_radius: f64,
    /// Inner arc radius
    pub arc_inner: f64,
    /// Outer arc radius
    pub arc_outer: f64,
}

/// Build the wheel with the default even placement
#[must_use]
pub fn build_wheel(dataset: &Dataset, viewport: Viewport, geometry: &WheelGeometry, num_links: usize) -> WheelView {
    let placements = default_placements(dataset, viewport, geometry);
    build_wheel_with(dataset, placements, viewport, geometry, num_links)
}

/// Build the wheel around placements computed by an external layout
#[must_use]
pub fn build_wheel_with(
    dataset: &Dataset,
    placements: Vec<Placement>,
    viewport: Viewport,
    geometry: &WheelGeometry,
    num_links: usize,
) -> WheelView {
    let links = rank_related(dataset, num_links);
    let arcs = theme_arcs(&placements);
    let splines = link_splines(&links.links, &placements, geometry);
    let radius = geometry.radius(viewport);

    WheelView {
        links,
        arcs,
        splines,
        placements,
        radius,
        link_radius: geometry.link_radius(radius).max(0.0),
        arc_inner: geometry.arc_inner(viewport),
        arc_outer: geometry.arc_outer(viewport),
    }
}
