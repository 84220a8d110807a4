// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Adaptive font scaling
//!
//! Two stages decide how concept weights become font sizes:
//!
//! - a distribution heuristic picks the exponent of a power scale so that
//!   typical long-tailed weight lists render with a balanced spread;
//! - a fitting pass lowers the ceiling of the font-size range until the
//!   largest words fit inside the viewport, using a [`TextMeasure`]
//!   supplied by whatever draws the text.

use crate::types::{FontSpec, Orientation, ScalingMode, Viewport};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Lower clamp for the adaptive exponent
pub const EXPONENT_MIN: f64 = 0.80;
/// Upper clamp for the adaptive exponent
pub const EXPONENT_MAX: f64 = 2.00;
/// Weight spread the adaptive exponent normalises to
pub const TARGET_SPREAD: f64 = 330.0;
/// Spread below which a distribution counts as narrow
pub const NARROW_SPREAD: f64 = 100.0;
/// Highest below-mean fraction that still counts as top heavy
pub const BELOW_MEAN_LIMIT: f64 = 0.60;
/// Range fraction below which a narrow distribution is rescaled
pub const RANGE_FRACTION_LIMIT: f64 = 0.10;

// =============================================================================
// Distribution heuristic
// =============================================================================

/// Summary statistics of a weight list
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightStats {
    /// Smallest weight
    pub min: f64,
    /// Largest weight
    pub max: f64,
    /// Sum of weights
    pub total: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Number of weights
    pub count: usize,
    /// Number of weights strictly below the mean
    pub below_mean: usize,
}

impl WeightStats {
    /// Compute statistics; `None` for an empty list
    #[must_use]
    pub fn from_weights(weights: &[f64]) -> Option<Self> {
        let (&first, _) = weights.split_first()?;
        let (min, max, total) = weights
            .iter()
            .fold((first, first, 0.0), |(lo, hi, sum), &w| (lo.min(w), hi.max(w), sum + w));
        let mean = total / weights.len() as f64;
        let below_mean = weights.iter().filter(|w| **w < mean).count();

        Some(Self {
            min,
            max,
            total,
            mean,
            count: weights.len(),
            below_mean,
        })
    }

    /// `max - min`
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }

    /// Fraction of weights below the mean
    #[must_use]
    pub fn below_mean_fraction(&self) -> f64 {
        self.below_mean as f64 / self.count as f64
    }

    /// Spread relative to the total mass
    #[must_use]
    pub fn range_fraction(&self) -> f64 {
        if self.total > 0.0 {
            self.spread() / self.total
        } else {
            0.0
        }
    }
}

/// Exponent of the weight to font-size power scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingDecision {
    /// Power-scale exponent
    pub exponent: f64,
}

impl Default for ScalingDecision {
    fn default() -> Self {
        Self { exponent: 1.0 }
    }
}

/// Pick an exponent from the shape of the weight distribution
///
/// Stays linear unless the list is top heavy with a wide spread, the spread
/// is very wide, or the spread is narrow relative to the total mass. Then
/// the exponent is `TARGET_SPREAD / spread`, clamped.
#[must_use]
pub fn adaptive_exponent(stats: &WeightStats) -> ScalingDecision {
    let spread = stats.spread();
    let top_heavy = stats.below_mean_fraction() <= BELOW_MEAN_LIMIT && spread > NARROW_SPREAD;
    let too_wide = spread > TARGET_SPREAD;
    let too_flat = spread < NARROW_SPREAD && stats.range_fraction() < RANGE_FRACTION_LIMIT;

    if !(top_heavy || too_wide || too_flat) {
        return ScalingDecision::default();
    }

    let raw = if spread > 0.0 { TARGET_SPREAD / spread } else { f64::INFINITY };
    ScalingDecision {
        exponent: raw.clamp(EXPONENT_MIN, EXPONENT_MAX),
    }
}

/// Scaling decision for a weight list under a mode
#[must_use]
pub fn decide(weights: &[f64], mode: ScalingMode) -> ScalingDecision {
    match mode {
        ScalingMode::Linear => ScalingDecision { exponent: 1.0 },
        ScalingMode::Sqrt => ScalingDecision { exponent: 0.5 },
        ScalingMode::Adaptive => match WeightStats::from_weights(weights) {
            Some(stats) => {
                let decision = adaptive_exponent(&stats);
                debug!(
                    "Weight stats: min {} max {} mean {:.2}, below mean {:.2}, range {:.3} -> exponent {:.3}",
                    stats.min,
                    stats.max,
                    stats.mean,
                    stats.below_mean_fraction(),
                    stats.range_fraction(),
                    decision.exponent
                );
                decision
            }
            None => ScalingDecision::default(),
        },
    }
}

// =============================================================================
// Power scale
// =============================================================================

/// Power scale from a weight domain onto a font-size range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerScale {
    domain: (f64, f64),
    range: (f64, f64),
    exponent: f64,
}

impl PowerScale {
    /// Create a scale
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64), exponent: f64) -> Self {
        Self {
            domain,
            range,
            exponent,
        }
    }

    /// Map a weight to a font size; a degenerate domain maps to the range start
    #[must_use]
    pub fn scale(&self, weight: f64) -> f64 {
        let k = self.exponent;
        let lo = self.domain.0.powf(k);
        let hi = self.domain.1.powf(k);
        let span = hi - lo;
        if span == 0.0 || !span.is_finite() {
            return self.range.0;
        }
        let t = (weight.powf(k) - lo) / span;
        self.range.0 + (self.range.1 - self.range.0) * t
    }

    /// Same scale with a different range ceiling
    #[must_use]
    pub fn with_ceiling(&self, ceiling: f64) -> Self {
        Self {
            range: (self.range.0, ceiling),
            ..*self
        }
    }

    /// Output range
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Font size used by the concept web view
#[must_use]
pub fn web_font_size(size: f64) -> f64 {
    2.0 + 3.0 * size.max(0.0).sqrt()
}

// =============================================================================
// Size fitting
// =============================================================================

/// Measures rendered text; provided by the drawing layer
pub trait TextMeasure {
    /// Rendered width of `text` in pixels
    fn measure_text_width(&self, text: &str, font: &FontSpec) -> f64;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, &FontSpec) -> f64,
{
    fn measure_text_width(&self, text: &str, font: &FontSpec) -> f64 {
        self(text, font)
    }
}

/// Width estimate from an average glyph width, for hosts without a text engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharWidthEstimate {
    /// Average glyph width as a fraction of the font size
    pub em_ratio: f64,
}

impl Default for CharWidthEstimate {
    fn default() -> Self {
        Self { em_ratio: 0.6 }
    }
}

impl TextMeasure for CharWidthEstimate {
    fn measure_text_width(&self, text: &str, font: &FontSpec) -> f64 {
        let bold = if font.bold { 1.1 } else { 1.0 };
        text.chars().count() as f64 * font.size_px * self.em_ratio * bold
    }
}

/// Parameters of the fitting pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitParams {
    /// Lowest ceiling the pass may reach
    pub floor: f64,
    /// Ceiling decrement per attempt
    pub step: f64,
    /// Share of the viewport a word may occupy
    pub ratio: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            floor: 20.0,
            step: 10.0,
            ratio: 0.95,
        }
    }
}

/// Result of the fitting pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitOutcome {
    /// Font-size range ceiling to draw with
    pub ceiling: f64,
    /// Whether the pass stopped at the floor
    pub floor_reached: bool,
    /// Words measured before the pass finished
    pub words_checked: usize,
}

/// Lower the range ceiling until every word fits, largest words first
///
/// The ceiling only ever shrinks. Once it reaches the floor the pass stops
/// for all remaining words.
pub fn fit_ceiling<'a, M, I>(
    words: I,
    scale: &PowerScale,
    font: &FontSpec,
    viewport: Viewport,
    orientation: Orientation,
    params: &FitParams,
    measure: &M,
) -> FitOutcome
where
    M: TextMeasure + ?Sized,
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let limit = params.ratio
        * if orientation.is_horizontal() {
            viewport.width
        } else {
            viewport.height
        };
    let floor = params.floor.max(scale.range().0);
    let step = params.step.max(1.0);
    let mut ceiling = scale.range().1.max(floor);
    let mut words_checked = 0;

    for (text, weight) in words {
        words_checked += 1;
        loop {
            let size = scale.with_ceiling(ceiling).scale(weight);
            if measure.measure_text_width(text, &font.at_size(size)) <= limit {
                break;
            }
            ceiling = (ceiling - step).max(floor);
            if ceiling <= floor {
                debug!("Font ceiling hit floor {} at {:?}", floor, text);
                return FitOutcome {
                    ceiling: floor,
                    floor_reached: true,
                    words_checked,
                };
            }
        }
    }

    FitOutcome {
        ceiling,
        floor_reached: false,
        words_checked,
    }
}

// =============================================================================
// Decision cache
// =============================================================================

/// Fingerprint of the inputs a scaling decision depends on
#[must_use]
pub fn fingerprint(weights: &[f64], font: &FontSpec, mode: ScalingMode) -> String {
    let mut hasher = Sha256::new();
    for w in weights {
        hasher.update(w.to_bits().to_le_bytes());
    }
    hasher.update(font.family.as_bytes());
    hasher.update(mode.to_string().as_bytes());
    let hash = hex::encode(hasher.finalize());
    hash[..16].to_string()
}

/// Keeps the last decision until the dataset, font or mode changes
#[derive(Debug, Clone, Default)]
pub struct ScalingCache {
    entry: Option<(String, ScalingDecision)>,
}

impl ScalingCache {
    /// Cached decision, recomputed when the fingerprint changed
    pub fn get_or_decide(&mut self, weights: &[f64], font: &FontSpec, mode: ScalingMode) -> ScalingDecision {
        let key = fingerprint(weights, font, mode);
        if let Some((cached, decision)) = &self.entry {
            if *cached == key {
                debug!("Scaling decision cache hit ({})", key);
                return *decision;
            }
        }
        let decision = decide(weights, mode);
        self.entry = Some((key, decision));
        decision
    }

    /// Fingerprint of the cached decision
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.entry.as_ref().map(|(k, _)| k.as_str())
    }
}
