// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Derived views - every drawable structure for one dataset
//!
//! A [`Dataset`] is immutable; [`derive_views`] recomputes all views from
//! it and the current [`LayoutParams`] in one pass. Nothing is updated in
//! place: a new viewport, font or mode means a new [`DerivedViews`].

use crate::error::DataResult;
use crate::graph::ConceptGraph;
use crate::hierarchy::{build_hierarchy, ProminenceNode};
use crate::ingest::Dataset;
use crate::layout::ClusterLayout;
use crate::mst::{build_segments, SpanningTree};
use crate::scaling::{
    fit_ceiling, web_font_size, FitOutcome, FitParams, PowerScale, ScalingCache, ScalingDecision,
    TextMeasure, WeightStats,
};
use crate::themes::{ThemeColor, ThemePalette};
use crate::types::{FontSpec, Orientation, ScalingMode, Viewport};
use crate::wheel::{build_wheel, WheelGeometry, WheelView, DEFAULT_NUM_LINKS};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Every parameter that affects the derived views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Drawing surface
    pub viewport: Viewport,
    /// Font family and style; the size is chosen per word
    pub font: FontSpec,
    /// Word orientation
    pub orientation: Orientation,
    /// Weight to font-size mapping
    pub scaling: ScalingMode,
    /// Smallest font size in pixels
    pub font_min: f64,
    /// Largest font size in pixels, before fitting
    pub font_max: f64,
    /// Size fitting pass
    pub fit: FitParams,
    /// Concept web mode: words at cluster points, unrotated
    pub web_mode: bool,
    /// Correlation wheel link budget
    pub num_links: usize,
    /// Number of distinct theme colours
    pub palette_size: usize,
    /// Correlation wheel dimensions
    pub wheel: WheelGeometry,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            font: FontSpec::default(),
            orientation: Orientation::default(),
            scaling: ScalingMode::default(),
            font_min: 8.0,
            font_max: 160.0,
            fit: FitParams::default(),
            web_mode: false,
            num_links: DEFAULT_NUM_LINKS,
            palette_size: 10,
            wheel: WheelGeometry::default(),
        }
    }
}

/// A word ready for the cloud layout engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSpec {
    /// Concept ID
    pub id: String,
    /// Text to draw
    pub name: String,
    /// Concept weight
    pub weight: f64,
    /// Font size for the cloud
    pub font_size: f64,
    /// Font size for the concept web
    pub web_font_size: f64,
    /// Rotation in degrees
    pub rotate: f64,
    /// Theme colour
    pub color: ThemeColor,
    /// Cluster x
    pub x: f64,
    /// Cluster y
    pub y: f64,
}

/// All views derived from one dataset
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedViews {
    /// Viewport the views were computed for
    pub viewport: Viewport,
    /// Words, heaviest first
    pub words: Vec<WordSpec>,
    /// `[min, max]` concept weight
    pub size_domain: [f64; 2],
    /// Weight distribution summary
    pub stats: Option<WeightStats>,
    /// Power-scale exponent
    pub scaling: ScalingDecision,
    /// Result of the size fitting pass
    pub fit: FitOutcome,
    /// Concept web segments
    pub spanning_tree: SpanningTree,
    /// Connected pieces of the spanning tree
    pub mst_components: usize,
    /// Inverse-prominence tree, when the dataset has prominence edges
    pub hierarchy: Option<ProminenceNode>,
    /// Correlation wheel
    pub wheel: WheelView,
}

/// Deterministic sample in [0, 1) derived from text
#[must_use]
pub fn stable_sample(text: &str) -> f64 {
    let digest = Sha256::digest(text.as_bytes());
    let bits = digest.iter().take(8).fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    (bits >> 11) as f64 / (1u64 << 53) as f64
}

/// Derive every view with a fresh scaling decision
pub fn derive_views<M>(dataset: &Dataset, params: &LayoutParams, measure: &M) -> DataResult<DerivedViews>
where
    M: TextMeasure + ?Sized,
{
    let mut cache = ScalingCache::default();
    derive_views_cached(dataset, params, measure, &mut cache)
}

/// Derive every view, reusing the scaling decision while its inputs match
pub fn derive_views_cached<M>(
    dataset: &Dataset,
    params: &LayoutParams,
    measure: &M,
    cache: &mut ScalingCache,
) -> DataResult<DerivedViews>
where
    M: TextMeasure + ?Sized,
{
    let layout = ClusterLayout::compute(dataset, params.viewport)?;

    let hierarchy = if dataset.prominence().is_empty() {
        None
    } else {
        Some(build_hierarchy(dataset.prominence(), |id| {
            dataset.name_of(id).map(str::to_owned)
        })?)
    };

    let weights = dataset.weights();
    let stats = WeightStats::from_weights(&weights);
    let scaling = cache.get_or_decide(&weights, &params.font, params.scaling);
    let domain = stats.map_or((0.0, 0.0), |s| (s.min, s.max));
    let scale = PowerScale::new(domain, (params.font_min, params.font_max), scaling.exponent);

    let concepts = dataset.concepts();
    let mut order: Vec<usize> = (0..concepts.len()).collect();
    order.sort_by(|&a, &b| concepts[b].weight.total_cmp(&concepts[a].weight));

    let fit = fit_ceiling(
        order.iter().map(|&i| (concepts[i].name.as_str(), concepts[i].weight)),
        &scale,
        &params.font,
        params.viewport,
        params.orientation,
        &params.fit,
        measure,
    );
    let scale = scale.with_ceiling(fit.ceiling);

    let palette = ThemePalette::assign(dataset.themes(), params.palette_size);
    let words = order
        .iter()
        .map(|&i| {
            let concept = &concepts[i];
            let point = layout.point(i).unwrap_or_default();
            let font_size = scale.scale(concept.weight);
            WordSpec {
                id: concept.id.clone(),
                name: concept.name.clone(),
                weight: concept.weight,
                font_size,
                web_font_size: web_font_size(font_size),
                rotate: if params.web_mode {
                    0.0
                } else {
                    params.orientation.rotation(stable_sample(&concept.name))
                },
                color: palette.color_of(concept),
                x: point.x,
                y: point.y,
            }
        })
        .collect();

    let spanning_tree = build_segments(dataset, &layout);
    let mst_components = ConceptGraph::from_dataset(dataset).component_count();
    if mst_components > 1 {
        debug!("Spanning tree has {} disconnected components", mst_components);
    }

    let wheel = build_wheel(dataset, params.viewport, &params.wheel, params.num_links);

    info!(
        "Derived views: {} words, {} segments, {} links, exponent {:.2}, ceiling {}",
        concepts.len(),
        spanning_tree.segments.len(),
        wheel.links.links.len(),
        scaling.exponent,
        fit.ceiling
    );

    Ok(DerivedViews {
        viewport: params.viewport,
        words,
        size_domain: [domain.0, domain.1],
        stats,
        scaling,
        fit,
        spanning_tree,
        mst_components,
        hierarchy,
        wheel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::scaling::CharWidthEstimate;
    use crate::types::{Concept, MstEdge, Position, ProminenceEdge, Theme};

    fn sample(prominence: Vec<ProminenceEdge>) -> Dataset {
        let mut a = Concept::new("1", "A", 10.0, Position { u: 0.0, v: 0.0 });
        a.mst_edges = vec![MstEdge { to: "2".into() }];
        a.theme_id = Some("t".into());
        let b = Concept::new("2", "B", 20.0, Position { u: 1.0, v: 1.0 });
        let theme = Theme {
            id: "t".into(),
            name: None,
            hue: None,
            connectivity: 1.0,
        };
        Dataset::from_parts(vec![a, b], vec![theme], prominence).unwrap()
    }

    #[test]
    fn test_end_to_end_segment() {
        let views = derive_views(&sample(vec![]), &LayoutParams::default(), &CharWidthEstimate::default()).unwrap();

        let segment = &views.spanning_tree.segments[0];
        assert_eq!((segment.x1, segment.y1, segment.x2, segment.y2), (0.0, 0.0, 450.0, 250.0));
        assert_eq!(segment.source_name, "A");
        assert_eq!(segment.target_name, "B");
        assert_eq!(views.mst_components, 1);
        assert!(views.hierarchy.is_none());
    }

    #[test]
    fn test_words_heaviest_first_with_sizes() {
        let views = derive_views(&sample(vec![]), &LayoutParams::default(), &CharWidthEstimate::default()).unwrap();

        assert_eq!(views.words[0].name, "B");
        assert_eq!(views.words[0].font_size, 160.0);
        assert_eq!(views.words[1].font_size, 8.0);
        assert_eq!(views.words[1].color, ThemeColor::Bucket(0));
        assert_eq!(views.words[0].color, ThemeColor::Inactive);
        assert_eq!(views.size_domain, [10.0, 20.0]);
        assert!(views.words.iter().all(|w| w.rotate == 0.0));
    }

    #[test]
    fn test_hierarchy_failure_is_fatal() {
        let prominence = vec![
            ProminenceEdge { from: "1".into(), to: "2".into(), weight: 1.0 },
            ProminenceEdge { from: "2".into(), to: "1".into(), weight: 1.0 },
        ];
        let err = derive_views(&sample(prominence), &LayoutParams::default(), &CharWidthEstimate::default())
            .unwrap_err();
        assert_eq!(err, DataError::NoRoot);
    }

    #[test]
    fn test_hierarchy_uses_display_names() {
        let prominence = vec![ProminenceEdge { from: "2".into(), to: "1".into(), weight: 0.3 }];
        let views = derive_views(&sample(prominence), &LayoutParams::default(), &CharWidthEstimate::default()).unwrap();
        let tree = views.hierarchy.unwrap();
        assert_eq!(tree.name, "B");
        assert_eq!(tree.children[0].name, "A");
    }

    #[test]
    fn test_narrow_viewport_lowers_ceiling() {
        let params = LayoutParams {
            viewport: Viewport { width: 100.0, height: 100.0 },
            ..LayoutParams::default()
        };
        let measure = |_: &str, font: &FontSpec| font.size_px;
        let views = derive_views(&sample(vec![]), &params, &measure).unwrap();
        assert_eq!(views.fit.ceiling, 90.0);
        assert_eq!(views.words[0].font_size, 90.0);
    }

    #[test]
    fn test_cached_decision_reused() {
        let ds = sample(vec![]);
        let mut cache = ScalingCache::default();
        let first = derive_views_cached(&ds, &LayoutParams::default(), &CharWidthEstimate::default(), &mut cache)
            .unwrap();
        let key = cache.key().map(str::to_string);
        let second = derive_views_cached(&ds, &LayoutParams::default(), &CharWidthEstimate::default(), &mut cache)
            .unwrap();
        assert_eq!(first.scaling, second.scaling);
        assert_eq!(cache.key().map(str::to_string), key);
    }

    #[test]
    fn test_stable_sample_range() {
        for text in ["", "river", "bank", "a much longer concept name"] {
            let s = stable_sample(text);
            assert!((0.0..1.0).contains(&s));
            assert_eq!(s, stable_sample(text));
        }
    }
}
