// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Cluster positioning - normalised concept positions into viewport space

use crate::error::{DataError, DataResult};
use crate::ingest::Dataset;
use crate::types::{Concept, Point, Viewport};
use serde::Serialize;

/// Map a concept's normalised position into centred viewport coordinates
///
/// `x = u * width / 2`, `y = v * height / 2`.
pub fn position(concept: &Concept, width: f64, height: f64) -> DataResult<Point> {
    let (u, v) = (concept.position.u, concept.position.v);
    if !u.is_finite() || !v.is_finite() {
        return Err(DataError::InvalidPosition(concept.id.clone()));
    }
    Ok(Point {
        x: u * width / 2.0,
        y: v * height / 2.0,
    })
}

/// Cluster coordinates for every concept of a dataset
///
/// Points are index-aligned with [`Dataset::concepts`].
#[derive(Debug, Clone, Serialize)]
pub struct ClusterLayout {
    viewport: Viewport,
    points: Vec<Point>,
}

impl ClusterLayout {
    /// Position all concepts for a viewport
    pub fn compute(dataset: &Dataset, viewport: Viewport) -> DataResult<Self> {
        let points = dataset
            .concepts()
            .iter()
            .map(|c| position(c, viewport.width, viewport.height))
            .collect::<DataResult<Vec<_>>>()?;
        Ok(Self { viewport, points })
    }

    /// Viewport the layout was computed for
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Point of the concept at `idx` in dataset order
    #[must_use]
    pub fn point(&self, idx: usize) -> Option<Point> {
        self.points.get(idx).copied()
    }

    /// Point of a concept by ID
    #[must_use]
    pub fn point_of(&self, dataset: &Dataset, id: &str) -> Option<Point> {
        dataset.index_of(id).and_then(|idx| self.point(idx))
    }

    /// All points in dataset order
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}
