// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Theme colour buckets
//!
//! Palettes hold a handful of colours. The best-connected themes get a
//! bucket each; every other theme, and every themeless concept, shares the
//! inactive colour.

use crate::types::{Concept, Theme};
use serde::Serialize;
use std::collections::HashMap;

/// Colour assignment for a theme or concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    /// Index into the active palette
    Bucket(usize),
    /// Shared colour for unranked themes
    Inactive,
}

/// Theme to bucket mapping for one dataset
#[derive(Debug, Clone, Default)]
pub struct ThemePalette {
    buckets: HashMap<String, usize>,
    ranked: Vec<String>,
}

impl ThemePalette {
    /// Rank themes by connectivity and hand out `palette_size` buckets
    #[must_use]
    pub fn assign(themes: &[Theme], palette_size: usize) -> Self {
        let mut ranked: Vec<&Theme> = themes.iter().collect();
        // stable: equal connectivity keeps theme order
        ranked.sort_by(|a, b| b.connectivity.total_cmp(&a.connectivity));

        let buckets = ranked
            .iter()
            .take(palette_size)
            .enumerate()
            .map(|(bucket, theme)| (theme.id.clone(), bucket))
            .collect();

        Self {
            buckets,
            ranked: ranked.into_iter().map(|t| t.id.clone()).collect(),
        }
    }

    /// Colour of a theme
    #[must_use]
    pub fn color_of_theme(&self, theme_id: &str) -> ThemeColor {
        self.buckets
            .get(theme_id)
            .map_or(ThemeColor::Inactive, |b| ThemeColor::Bucket(*b))
    }

    /// Colour of a concept, by its theme
    #[must_use]
    pub fn color_of(&self, concept: &Concept) -> ThemeColor {
        concept
            .theme_id
            .as_deref()
            .map_or(ThemeColor::Inactive, |t| self.color_of_theme(t))
    }

    /// Theme IDs, best connected first
    #[must_use]
    pub fn ranked(&self) -> &[String] {
        &self.ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn theme(id: &str, connectivity: f64) -> Theme {
        Theme {
            id: id.into(),
            name: None,
            hue: None,
            connectivity,
        }
    }

    #[test]
    fn test_top_themes_get_buckets() {
        let themes = vec![theme("1", 10.0), theme("2", 90.0), theme("3", 50.0)];
        let palette = ThemePalette::assign(&themes, 2);

        assert_eq!(palette.color_of_theme("2"), ThemeColor::Bucket(0));
        assert_eq!(palette.color_of_theme("3"), ThemeColor::Bucket(1));
        assert_eq!(palette.color_of_theme("1"), ThemeColor::Inactive);
        assert_eq!(palette.ranked(), &["2", "3", "1"]);
    }

    #[test]
    fn test_ties_keep_theme_order() {
        let themes = vec![theme("a", 5.0), theme("b", 5.0)];
        let palette = ThemePalette::assign(&themes, 1);
        assert_eq!(palette.color_of_theme("a"), ThemeColor::Bucket(0));
        assert_eq!(palette.color_of_theme("b"), ThemeColor::Inactive);
    }

    #[test]
    fn test_themeless_concept_inactive() {
        let palette = ThemePalette::assign(&[theme("1", 1.0)], 10);
        let concept = Concept::new("7", "word", 1.0, Position { u: 0.0, v: 0.0 });
        assert_eq!(palette.color_of(&concept), ThemeColor::Inactive);
    }
}
